//! Command-line entry point for the transit status simulator.
//!
//! ```bash
//! # Run against a local broker for 60 ticks
//! transit-simulator --kafka-brokers localhost:9092 --ticks 60
//!
//! # Brokers can also come from the environment
//! KAFKA_BROKERS=kafka0:9092 transit-simulator --tick-interval-ms 500
//! ```

use clap::Parser;
use transit_status::{simulation, SimulatorOpts};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let opts = SimulatorOpts::parse();

    match simulation::run(&opts).await {
        Ok(_) => tracing::info!("Simulation finished"),
        Err(e) => {
            eprintln!("Error: {e:?}");
            std::process::exit(1);
        }
    }
}
