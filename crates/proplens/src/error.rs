//! Error types for view construction and property access.

use thiserror::Error;

/// Errors surfaced by views, accessor tables, and the default-value provider.
///
/// All failures are synchronous and reported directly to the caller; nothing
/// is retried internally. `MissingMember` and `IndexOutOfRange` are only
/// raised while a view's `throw_on_missing` policy is enabled — with the
/// policy disabled those conditions degrade to an absent value, an empty
/// pair, or a no-op. Every other variant propagates regardless of policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// A property name was referenced that has no usable accessor.
    #[error("type `{type_name}` has no usable accessor for member `{member}`")]
    MissingMember {
        /// Type of the wrapped instance.
        type_name: &'static str,
        /// The offending member name.
        member: String,
    },

    /// Positional access outside `[0, len)`.
    #[error("index {index} is out of range for type `{type_name}` with {len} properties")]
    IndexOutOfRange {
        /// Type of the wrapped instance.
        type_name: &'static str,
        /// The requested position.
        index: usize,
        /// Number of entries in the accessor table.
        len: usize,
    },

    /// Attempted to wrap an instance that is itself a view facade.
    #[error("the instance is already a dynamic view")]
    AlreadyWrapped,

    /// No zero value is known for the requested type.
    #[error("no default value is known for type `{type_name}`")]
    UnconstructableDefault {
        /// The type a default was requested for.
        type_name: String,
    },

    /// A type enumerated the same property name twice.
    #[error("type `{type_name}` declares property `{property}` more than once")]
    DuplicateProperty {
        /// The declaring type.
        type_name: &'static str,
        /// The colliding property name.
        property: &'static str,
    },

    /// A compiled accessor was handed an instance of the wrong type.
    #[error("accessor for `{property}` was invoked on an instance that is not a `{expected}`")]
    InstanceType {
        /// The property whose accessor was invoked.
        property: String,
        /// The declaring type the accessor was compiled for.
        expected: &'static str,
    },

    /// A value could not be narrowed to the property's value type.
    #[error("value for `{property}` is not a `{expected}`")]
    ValueType {
        /// The property being read or written.
        property: String,
        /// The expected value type.
        expected: &'static str,
    },
}
