//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Two value objects holding the same attribute values are equal; they carry
/// no identity. To "modify" one, build a new one with the new values.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
