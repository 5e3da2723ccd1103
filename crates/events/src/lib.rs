//! Domain events and the envelopes that order them within a stream.

pub mod envelope;
pub mod event;

pub use envelope::EventEnvelope;
pub use event::Event;
