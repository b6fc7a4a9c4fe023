//! Domain models for the transit simulation.

pub mod line;
pub mod station;
pub mod timestamp;
pub mod train;
pub mod turnstile;

#[cfg(test)]
pub(crate) mod testing;

pub use line::Line;
pub use station::{ArrivalEvent, Station};
pub use timestamp::TimestampKey;
pub use train::{Train, TrainStatus};
pub use turnstile::{Turnstile, TurnstileEvent};
