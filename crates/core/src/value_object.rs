//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity of their own; two instances holding the
/// same attributes are interchangeable. A stock category is the typical
/// example: `"goldfish"` is `"goldfish"` wherever it appears.
///
/// Implementors should be immutable. To "change" one, build a new value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
