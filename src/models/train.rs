//! Train identity and service status.

use std::fmt;

/// Operating status of a train, as reported in arrival events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainStatus {
    OutOfService,
    InService,
    BrokenDown,
}

impl TrainStatus {
    /// Stable name used in event payloads.
    pub fn name(&self) -> &'static str {
        match self {
            TrainStatus::OutOfService => "out_of_service",
            TrainStatus::InService => "in_service",
            TrainStatus::BrokenDown => "broken_down",
        }
    }
}

/// A train moving through the network.
///
/// Stations keep a copy of this as a record of the last train seen; holding
/// one does not own the train's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Train {
    pub train_id: String,
    pub status: TrainStatus,
}

impl Train {
    pub fn new(train_id: impl Into<String>, status: TrainStatus) -> Self {
        Train {
            train_id: train_id.into(),
            status,
        }
    }
}

impl fmt::Display for Train {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.train_id, self.status.name())
    }
}
