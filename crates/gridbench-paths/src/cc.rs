//! Connected components under a movement model.

use gridbench_core::Point;

use crate::space::SearchSpace;
use crate::traits::Pather;

/// Label of a cell not reached by any flood fill.
pub(crate) const UNLABELLED: u32 = u32::MAX;

impl SearchSpace {
    /// Flood-fill the passable cells of the range, giving each connected
    /// component its own label, and return how many components there are.
    ///
    /// Connectivity follows `pather`'s neighbours. Query labels with
    /// [`component`](Self::component).
    pub fn label_components<P: Pather>(&mut self, pather: &P) -> usize {
        self.labels.fill(UNLABELLED);
        let mut count = 0u32;
        let mut nbuf = std::mem::take(&mut self.nbuf);

        for seed in self.rng.iter() {
            let Some(si) = self.idx(seed) else {
                continue;
            };
            if self.labels[si] != UNLABELLED || !pather.passable(seed) {
                continue;
            }
            self.labels[si] = count;
            self.flood.push(si);
            while let Some(ci) = self.flood.pop() {
                nbuf.clear();
                pather.neighbors(self.point(ci), &mut nbuf);
                for &np in &nbuf {
                    match self.idx(np) {
                        Some(ni) if self.labels[ni] == UNLABELLED => {
                            self.labels[ni] = count;
                            self.flood.push(ni);
                        }
                        _ => {}
                    }
                }
            }
            count += 1;
        }

        self.nbuf = nbuf;
        count as usize
    }

    /// Component of `p` as of the last
    /// [`label_components`](Self::label_components).
    ///
    /// `None` for blocked cells and points outside the range.
    pub fn component(&self, p: Point) -> Option<usize> {
        match self.labels[self.idx(p)?] {
            UNLABELLED => None,
            label => Some(label as usize),
        }
    }
}
