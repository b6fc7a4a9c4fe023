//! Turnstile rider-entry event source.

use crate::models::line::Line;
use crate::models::timestamp::TimestampKey;
use std::sync::OnceLock;
use transit_channel::{ChannelDescriptor, ChannelProducer, EventChannel, Result};
use transit_schema::{EventRecord, Record, SchemaPair};

const TURNSTILE_KEY_PROTO: &str = include_str!("../../schemas/timestamp_key.proto");
const TURNSTILE_VALUE_PROTO: &str = include_str!("../../schemas/turnstile_value.proto");

/// Every station's turnstile publishes to this shared channel, so producer
/// instances across stations target the same name and creation is
/// deduplicated by the process-wide registry.
const TURNSTILE_CHANNEL: &str = "org.chicago.cta.turnstiles.v1";

/// Turnstile schemas are parsed once per process and shared by every station.
fn turnstile_schemas() -> transit_schema::Result<&'static SchemaPair> {
    static SCHEMAS: OnceLock<SchemaPair> = OnceLock::new();
    if let Some(pair) = SCHEMAS.get() {
        return Ok(pair);
    }
    let pair = SchemaPair::parse(
        TURNSTILE_KEY_PROTO,
        "TimestampKey",
        TURNSTILE_VALUE_PROTO,
        "TurnstileEvent",
    )?;
    Ok(SCHEMAS.get_or_init(|| pair))
}

/// A rider passing through a station's turnstile.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnstileEvent {
    pub station_id: i32,
    pub station_name: String,
    pub line: String,
}

impl EventRecord for TurnstileEvent {
    fn to_record(&self) -> Record {
        Record::new("TurnstileEvent")
            .field("station_id", self.station_id)
            .field("station_name", self.station_name.as_str())
            .field("line", self.line.as_str())
    }
}

/// Per-station rider-entry producer on the shared turnstile channel.
pub struct Turnstile {
    station_id: i32,
    station_name: String,
    line: Line,
    channel: Box<dyn EventChannel>,
}

impl Turnstile {
    /// Create a turnstile bound to the shared turnstile channel.
    pub fn new(brokers: &str, station_id: i32, station_name: &str, line: Line) -> Result<Self> {
        let descriptor = ChannelDescriptor::new(TURNSTILE_CHANNEL, 1, 1)?;
        let schemas = turnstile_schemas()?.clone();
        let channel = ChannelProducer::create(brokers, descriptor, schemas)?;

        Ok(Self::with_channel(
            station_id,
            station_name,
            line,
            Box::new(channel),
        ))
    }

    /// Assemble a turnstile around an existing channel handle.
    pub fn with_channel(
        station_id: i32,
        station_name: impl Into<String>,
        line: Line,
        channel: Box<dyn EventChannel>,
    ) -> Self {
        Turnstile {
            station_id,
            station_name: station_name.into(),
            line,
            channel,
        }
    }

    /// Publish one entry event per rider.
    pub async fn run(&self, riders: u32) -> Result<()> {
        for _ in 0..riders {
            let event = TurnstileEvent {
                station_id: self.station_id,
                station_name: self.station_name.clone(),
                line: self.line.name().to_string(),
            };
            self.channel
                .publish(TimestampKey::now().to_record(), event.to_record())
                .await?;
        }
        Ok(())
    }

    /// Close the turnstile's channel. Safe to call more than once.
    pub async fn close(&self) -> Result<()> {
        self.channel.close().await
    }
}
