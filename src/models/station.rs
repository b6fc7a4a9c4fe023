//! Station model and its directional arrival state machine.

use crate::models::line::Line;
use crate::models::timestamp::TimestampKey;
use crate::models::train::Train;
use crate::models::turnstile::Turnstile;
use std::fmt;
use std::sync::OnceLock;
use transit_channel::{channel_name, ChannelDescriptor, ChannelProducer, EventChannel, Result};
use transit_schema::{EventRecord, Record, SchemaPair};

const ARRIVAL_KEY_PROTO: &str = include_str!("../../schemas/timestamp_key.proto");
const ARRIVAL_VALUE_PROTO: &str = include_str!("../../schemas/arrival_value.proto");

/// Arrival schemas are parsed once per process and shared by every station.
fn arrival_schemas() -> transit_schema::Result<&'static SchemaPair> {
    static SCHEMAS: OnceLock<SchemaPair> = OnceLock::new();
    if let Some(pair) = SCHEMAS.get() {
        return Ok(pair);
    }
    let pair = SchemaPair::parse(
        ARRIVAL_KEY_PROTO,
        "TimestampKey",
        ARRIVAL_VALUE_PROTO,
        "ArrivalEvent",
    )?;
    Ok(SCHEMAS.get_or_init(|| pair))
}

/// A train arrival, as published on the station's channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalEvent {
    pub station_id: i32,
    pub train_id: String,
    pub direction: String,
    pub line: String,
    pub train_status: String,
    pub prev_station_id: i32,
    pub prev_direction: String,
}

impl EventRecord for ArrivalEvent {
    fn to_record(&self) -> Record {
        Record::new("ArrivalEvent")
            .field("station_id", self.station_id)
            .field("train_id", self.train_id.as_str())
            .field("direction", self.direction.as_str())
            .field("line", self.line.as_str())
            .field("train_status", self.train_status.as_str())
            .field("prev_station_id", self.prev_station_id)
            .field("prev_direction", self.prev_direction.as_str())
    }
}

/// A single station on a line.
///
/// Tracks the last train seen in each direction and publishes an
/// [`ArrivalEvent`] whenever one arrives. Occupancy is overwritten by the
/// next arrival in the same direction; there is no departure transition.
pub struct Station {
    station_id: i32,
    name: String,
    color: Line,
    dir_a: Option<String>,
    dir_b: Option<String>,
    a_train: Option<Train>,
    b_train: Option<Train>,
    channel: Box<dyn EventChannel>,
    turnstile: Turnstile,
    closed: bool,
}

impl Station {
    /// Create a station with its own arrival channel and turnstile.
    ///
    /// `direction_a`/`direction_b` name the neighboring stations trains
    /// depart toward in each direction, when one exists.
    pub fn new(
        brokers: &str,
        station_id: i32,
        name: impl Into<String>,
        color: Line,
        direction_a: Option<String>,
        direction_b: Option<String>,
    ) -> Result<Self> {
        let name = name.into();
        let descriptor =
            ChannelDescriptor::new(channel_name("station", &name, "arrival", 1), 1, 1)?;
        let schemas = arrival_schemas()?.clone();
        let channel = ChannelProducer::create(brokers, descriptor, schemas)?;
        let turnstile = Turnstile::new(brokers, station_id, &name, color)?;

        Ok(Self::with_channel(
            station_id,
            name,
            color,
            direction_a,
            direction_b,
            Box::new(channel),
            turnstile,
        ))
    }

    /// Assemble a station around an existing channel handle.
    pub fn with_channel(
        station_id: i32,
        name: impl Into<String>,
        color: Line,
        direction_a: Option<String>,
        direction_b: Option<String>,
        channel: Box<dyn EventChannel>,
        turnstile: Turnstile,
    ) -> Self {
        Station {
            station_id,
            name: name.into(),
            color,
            dir_a: direction_a,
            dir_b: direction_b,
            a_train: None,
            b_train: None,
            channel,
            turnstile,
            closed: false,
        }
    }

    pub fn station_id(&self) -> i32 {
        self.station_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The station's rider-entry event source.
    pub fn turnstile(&self) -> &Turnstile {
        &self.turnstile
    }

    /// Note a train arriving in the "a" direction.
    pub async fn arrive_a(
        &mut self,
        train: &Train,
        prev_station_id: i32,
        prev_direction: &str,
    ) -> Result<()> {
        // Occupancy is updated before the publish so readers always see the
        // train that triggered the most recent event.
        self.a_train = Some(train.clone());
        self.publish_arrival(train, "a", prev_station_id, prev_direction)
            .await
    }

    /// Note a train arriving in the "b" direction.
    pub async fn arrive_b(
        &mut self,
        train: &Train,
        prev_station_id: i32,
        prev_direction: &str,
    ) -> Result<()> {
        self.b_train = Some(train.clone());
        self.publish_arrival(train, "b", prev_station_id, prev_direction)
            .await
    }

    async fn publish_arrival(
        &self,
        train: &Train,
        direction: &str,
        prev_station_id: i32,
        prev_direction: &str,
    ) -> Result<()> {
        let event = ArrivalEvent {
            station_id: self.station_id,
            train_id: train.train_id.clone(),
            direction: direction.to_string(),
            line: self.color.name().to_string(),
            train_status: train.status.name().to_string(),
            prev_station_id,
            prev_direction: prev_direction.to_string(),
        };

        self.channel
            .publish(TimestampKey::now().to_record(), event.to_record())
            .await
    }

    /// Render the current occupancy of both directions.
    pub fn describe(&self) -> String {
        format!(
            "Station | {:^5} | {:<30} | Direction A: | {:^5} | departing to {:<30} | Direction B: | {:^5} | departing to {:<30} |",
            self.station_id,
            self.name,
            self.a_train.as_ref().map(|t| t.train_id.as_str()).unwrap_or("---"),
            self.dir_a.as_deref().unwrap_or("---"),
            self.b_train.as_ref().map(|t| t.train_id.as_str()).unwrap_or("---"),
            self.dir_b.as_deref().unwrap_or("---"),
        )
    }

    /// Shut the station down: turnstile first, then the arrival channel.
    ///
    /// Both closes always run; the first failure is kept and returned once
    /// every step has been attempted. Closing an already-closed station is a
    /// no-op.
    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut first_error = None;

        if let Err(e) = self.turnstile.close().await {
            tracing::warn!("Turnstile close failed at '{}': {e}", self.name);
            first_error.get_or_insert(e);
        }

        if let Err(e) = self.channel.close().await {
            tracing::warn!("Channel close failed at '{}': {e}", self.name);
            first_error.get_or_insert(e);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
