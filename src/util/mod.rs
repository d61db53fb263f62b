//! Utilities used by the heap views.

/// Address of the inspected process, and the byte size type.
pub mod address;
/// Size constants.
pub mod constants;
/// Calculation, conversion and formatting of sizes.
pub mod conversions;
/// The builtin logger.
pub mod logger;
/// Runtime options.
pub mod options;

pub(crate) mod print;

#[cfg(test)]
pub(crate) mod test_util;

pub use self::address::{Address, ByteSize};
