#![forbid(unsafe_code)]

pub mod model;
pub mod shuffle;
pub mod time;

pub use shuffle::{question_seed, shuffle};
pub use time::Clock;
