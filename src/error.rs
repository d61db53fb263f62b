use crate::util::Address;

/// The layout of the inspected heap could not be resolved.
///
/// Views never fall back to zero when the layout is missing: a zero capacity would
/// let a caller conclude that a generation is full.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutResolutionError {
    /// The layout table was used before [`crate::LayoutTable::initialize`] succeeded.
    #[error("heap layout is not initialized")]
    NotInitialized,
    /// The type database has no type with this name.
    #[error("type {type_name} not found in the type database")]
    TypeNotFound { type_name: String },
    /// The type exists but has no field with this name.
    #[error("field {type_name}::{field_name} not found in the type database")]
    FieldNotFound {
        type_name: String,
        field_name: String,
    },
}

/// Errors from querying a heap view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] LayoutResolutionError),
    /// The target memory has no bytes at this address.
    #[error("address {0} is not mapped in the target")]
    UnmappedAddress(Address),
    /// A space read from the target does not satisfy `bottom <= top <= end`.
    #[error("space at {space} has invalid bounds [{bottom}, {top}, {end})")]
    InvalidSpaceBounds {
        space: Address,
        bottom: Address,
        top: Address,
        end: Address,
    },
    /// A `MemRegion` read from the target does not fit in the address space.
    #[error("memory region at {region} starting at {start} with {word_size} words overflows the address space")]
    InvalidMemRegion {
        region: Address,
        start: Address,
        word_size: usize,
    },
    /// A heap's pointer to one of its generations is null.
    #[error("{field} of the heap at {heap} is null")]
    NullGeneration { heap: Address, field: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
