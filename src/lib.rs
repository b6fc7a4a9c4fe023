//! Transit status simulator library.
//!
//! Simulates a CTA "L" line and publishes its state changes to
//! schema-governed Kafka channels:
//!
//! - Train arrivals: each station owns a channel named
//!   `org.chicago.cta.station.<station>.arrival.v1` and publishes an
//!   arrival event whenever a train reaches it in either direction
//! - Rider entries: every station's turnstile publishes to the shared
//!   `org.chicago.cta.turnstiles.v1` channel
//!
//! Message keys carry a millisecond timestamp; keys and values are validated
//! against the channel's declared schema pair before anything reaches the
//! Kafka client.
//!
//! # Crates
//!
//! - `transit-schema` - runtime `.proto` parsing and record encoding
//! - `transit-channel` - naming, idempotent creation, and publishing
//! - this crate - domain models, the simulation driver, and the CLI binary

use clap::Parser;

pub mod models;
pub mod simulation;

/// Command-line options for the simulator binary.
#[derive(Parser, Clone)]
pub struct SimulatorOpts {
    /// Kafka bootstrap servers
    #[arg(long, default_value = "localhost:9092", env = "KAFKA_BROKERS")]
    pub kafka_brokers: String,

    /// Number of simulation ticks to run before shutting down
    #[arg(long, default_value = "60")]
    pub ticks: u64,

    /// Delay between simulation ticks in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_interval_ms: u64,
}
