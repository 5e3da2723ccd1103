use serde::{Deserialize, Serialize};

use crate::Event;

/// Envelope for an event, carrying the stream it belongs to and its position.
///
/// - `stream` names the aggregate stream (a ledger label).
/// - `sequence_number` is 1-based and monotonically increasing per stream.
/// - `event_type` / `schema_version` let readers pick a decoder before
///   touching `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    stream: String,
    sequence_number: u64,
    event_type: String,
    schema_version: u32,
    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        stream: impl Into<String>,
        sequence_number: u64,
        event_type: impl Into<String>,
        schema_version: u32,
        payload: E,
    ) -> Self {
        Self {
            stream: stream.into(),
            sequence_number,
            event_type: event_type.into(),
            schema_version,
            payload,
        }
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap a typed event, taking type name and schema version from the event.
    pub fn wrap(stream: impl Into<String>, sequence_number: u64, payload: E) -> Self {
        let event_type = payload.event_type();
        let schema_version = payload.version();
        Self::new(stream, sequence_number, event_type, schema_version, payload)
    }
}
