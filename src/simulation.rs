//! Simulation driver: moves trains along a line and publishes the
//! resulting arrival and rider-entry events.

use crate::models::{Line, Station, Train, TrainStatus};
use crate::SimulatorOpts;
use anyhow::Context;
use rand::Rng;
use std::time::Duration;

/// Station layout for the simulated Red Line segment: (id, name), ordered
/// south to north. Direction "a" runs toward the end of the list, "b" back
/// toward the start.
const RED_LINE: &[(i32, &str)] = &[
    (40540, "Wilson"),
    (40770, "Lawrence"),
    (41200, "Argyle"),
    (40340, "Berwyn"),
    (41380, "Bryn Mawr"),
    (40760, "Granville"),
    (41300, "Loyola"),
    (40100, "Morse"),
    (41190, "Jarvis"),
    (40900, "Howard"),
];

/// Number of trains shuttling along the segment.
const TRAIN_COUNT: usize = 3;

struct TrainRun {
    train: Train,
    position: usize,
    heading_a: bool,
}

/// Owns the stations and trains for one simulated line.
pub struct Simulation {
    stations: Vec<Station>,
    trains: Vec<TrainRun>,
}

impl Simulation {
    /// Build the Red Line stations and a handful of in-service trains.
    pub fn new(opts: &SimulatorOpts) -> anyhow::Result<Self> {
        let mut stations = Vec::with_capacity(RED_LINE.len());
        for (i, (station_id, name)) in RED_LINE.iter().enumerate() {
            let dir_a = RED_LINE.get(i + 1).map(|(_, next)| next.to_string());
            let dir_b = if i > 0 {
                Some(RED_LINE[i - 1].1.to_string())
            } else {
                None
            };

            let station = Station::new(
                &opts.kafka_brokers,
                *station_id,
                *name,
                Line::Red,
                dir_a,
                dir_b,
            )
            .with_context(|| format!("Failed to set up station '{name}'"))?;
            stations.push(station);
        }

        let trains = (0..TRAIN_COUNT)
            .map(|i| TrainRun {
                train: Train::new(format!("RL{:03}", i + 1), TrainStatus::InService),
                position: (i * RED_LINE.len()) / TRAIN_COUNT,
                heading_a: i % 2 == 0,
            })
            .collect();

        Ok(Simulation { stations, trains })
    }

    /// Advance every train one station and publish the resulting events.
    pub async fn tick(&mut self) -> anyhow::Result<()> {
        for run in &mut self.trains {
            let prev_station_id = self.stations[run.position].station_id();
            let prev_direction = if run.heading_a { "a" } else { "b" };

            // Reverse at the termini
            if run.heading_a && run.position + 1 == self.stations.len() {
                run.heading_a = false;
            } else if !run.heading_a && run.position == 0 {
                run.heading_a = true;
            }

            run.position = if run.heading_a {
                run.position + 1
            } else {
                run.position - 1
            };

            let station = &mut self.stations[run.position];
            if run.heading_a {
                station
                    .arrive_a(&run.train, prev_station_id, prev_direction)
                    .await?;
            } else {
                station
                    .arrive_b(&run.train, prev_station_id, prev_direction)
                    .await?;
            }
            tracing::info!("{}", station.describe());
        }

        for station in &self.stations {
            // The rng handle is scoped so the tick future stays Send
            let riders = {
                let mut rng = rand::rng();
                rng.random_range(0..5u32)
            };
            station.turnstile().run(riders).await?;
        }

        Ok(())
    }

    /// Close every station, returning the first failure after trying all.
    pub async fn close(&mut self) -> anyhow::Result<()> {
        let mut first_error = None;
        for station in &mut self.stations {
            if let Err(e) = station.close().await {
                tracing::warn!("Failed to close station '{}': {e}", station.name());
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

/// Run the full simulation loop described by `opts`.
pub async fn run(opts: &SimulatorOpts) -> anyhow::Result<()> {
    let mut simulation = Simulation::new(opts)?;

    let mut outcome = Ok(());
    for tick in 0..opts.ticks {
        tracing::debug!("Simulation tick {tick}");
        if let Err(e) = simulation.tick().await {
            outcome = Err(e).with_context(|| format!("Simulation tick {tick} failed"));
            break;
        }
        tokio::time::sleep(Duration::from_millis(opts.tick_interval_ms)).await;
    }

    // Stations close even when a tick failed, so buffered events still flush
    let closed = simulation.close().await;
    outcome.and(closed)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Client construction is lazy, so building and closing the simulation
    // touches no broker.
    #[tokio::test]
    async fn test_simulation_builds_and_closes() {
        let opts = SimulatorOpts {
            kafka_brokers: "localhost:9092".to_string(),
            ticks: 0,
            tick_interval_ms: 0,
        };

        let mut simulation = Simulation::new(&opts).unwrap();
        assert_eq!(simulation.stations.len(), RED_LINE.len());
        assert_eq!(simulation.trains.len(), TRAIN_COUNT);

        simulation.close().await.unwrap();
        // Closing again is a no-op per station
        simulation.close().await.unwrap();
    }
}
