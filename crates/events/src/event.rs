use chrono::{DateTime, Utc};

/// A fact recorded on an event stream.
///
/// Implementors are plain data: once emitted an event is never edited, and a
/// change to its shape bumps `version`.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted type name, `<module>.<entity>.<fact>` (e.g. "inventory.stock.added").
    fn event_type(&self) -> &'static str;

    /// Schema version of this event's payload.
    fn version(&self) -> u32;

    /// Business time of the fact.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// `event_type` qualified with its schema version, e.g. "inventory.stock.added/v1".
    fn qualified_type(&self) -> String {
        format!("{}/v{}", self.event_type(), self.version())
    }
}
