//! **gridbench-movingai**: map and scenario loading.
//!
//! Maps use the octile text format ([`load_map`]); queries come from the
//! companion `.map.scen` file ([`ScenarioFile`]) or, by policy, from a seeded
//! random sampler ([`Sampler`]). [`ScenarioSource`] picks between the two.

mod error;
mod map;
mod sample;
mod scen;
mod source;

pub use error::LoadError;
pub use map::{MAX_CELLS, load_map, parse_map, save_map, to_map_string};
pub use sample::{SampleIter, SampleSpec, Sampler};
pub use scen::{Scenario, ScenarioFile, ScenarioIter, scen_path};
pub use source::{ParsePolicyError, ScenarioPolicy, ScenarioSource, Scenarios};
