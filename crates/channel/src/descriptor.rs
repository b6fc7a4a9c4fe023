//! Channel descriptors.

use crate::error::{ChannelError, Result};

/// Identifies a channel and the parameters it is created with.
#[derive(Debug, Clone)]
pub struct ChannelDescriptor {
    name: String,
    partitions: i32,
    replicas: i32,
}

impl ChannelDescriptor {
    /// Build a descriptor, rejecting non-positive partition or replica counts.
    pub fn new(name: impl Into<String>, partitions: i32, replicas: i32) -> Result<Self> {
        let name = name.into();
        if partitions < 1 {
            return Err(ChannelError::Creation {
                channel: name,
                reason: format!("invalid partition count: {partitions}"),
            });
        }
        if replicas < 1 {
            return Err(ChannelError::Creation {
                channel: name,
                reason: format!("invalid replica count: {replicas}"),
            });
        }
        Ok(ChannelDescriptor {
            name,
            partitions,
            replicas,
        })
    }

    /// Fully qualified channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Partition count requested at creation.
    pub fn partitions(&self) -> i32 {
        self.partitions
    }

    /// Replica count requested at creation.
    pub fn replicas(&self) -> i32 {
        self.replicas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_accepts_valid_counts() {
        let descriptor = ChannelDescriptor::new("org.chicago.cta.turnstiles.v1", 1, 1).unwrap();
        assert_eq!(descriptor.name(), "org.chicago.cta.turnstiles.v1");
        assert_eq!(descriptor.partitions(), 1);
        assert_eq!(descriptor.replicas(), 1);
    }

    #[test]
    fn test_descriptor_rejects_zero_partitions() {
        assert!(ChannelDescriptor::new("t", 0, 1).is_err());
    }

    #[test]
    fn test_descriptor_rejects_zero_replicas() {
        assert!(ChannelDescriptor::new("t", 1, 0).is_err());
    }
}
