use std::f64::consts::SQRT_2;

use gridbench_core::Point;

/// Octile distance: the exact cost between two points on an empty
/// 8-connected grid with unit straight moves and `SQRT_2` diagonal moves.
#[inline]
pub fn octile(a: Point, b: Point) -> f64 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let diagonal = dx.min(dy);
    let straight = dx.max(dy) - diagonal;
    straight as f64 + SQRT_2 * diagonal as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octile_mixes_straight_and_diagonal() {
        let o = Point::new(0, 0);
        assert_eq!(octile(o, o), 0.0);
        assert_eq!(octile(o, Point::new(5, 0)), 5.0);
        assert_eq!(octile(o, Point::new(0, -2)), 2.0);
        assert!((octile(o, Point::new(3, 3)) - 3.0 * SQRT_2).abs() < 1e-12);
        assert!((octile(Point::new(4, 1), Point::new(0, 3)) - (2.0 + 2.0 * SQRT_2)).abs() < 1e-12);
    }

    #[test]
    fn octile_is_symmetric() {
        let a = Point::new(7, -2);
        let b = Point::new(-3, 9);
        assert_eq!(octile(a, b), octile(b, a));
    }
}
