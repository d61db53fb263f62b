//! The interfaces an embedder implements to let heapview look into a process.
//!
//! heapview does not attach to processes itself. A debugger, a core-file reader or a
//! test provides:
//! * [`TargetMemory`]: reads words from the address space of the inspected process.
//! * [`TypeDataBase`]: resolves the byte offset of a named field in a named type of
//!   the inspected VM (the layout resolver).
//!
//! [`SnapshotMemory`] and [`StaticTypeDataBase`] are ready-made implementations over
//! captured data.

use crate::error::{LayoutResolutionError, Result};
use crate::util::Address;

pub mod snapshot;
pub mod type_db;

pub use self::snapshot::SnapshotMemory;
pub use self::type_db::StaticTypeDataBase;

/// Read access to the memory of the inspected process.
///
/// Reads are only meaningful at a safepoint of the target: the caller must make
/// sure no mutator or collector thread is changing the heap while a view reads it.
/// Implementations do no locking of their own.
pub trait TargetMemory {
    /// Read one machine word at `addr`.
    /// Returns [`crate::Error::UnmappedAddress`] if the target has no memory there.
    fn read_word(&self, addr: Address) -> Result<usize>;

    /// Read one machine word at `addr` and interpret it as an address.
    fn read_address(&self, addr: Address) -> Result<Address> {
        self.read_word(addr).map(Address::from_usize)
    }
}

/// The layout resolver: byte offsets of fields in the inspected VM's types.
pub trait TypeDataBase {
    /// The offset of `field_name` from the start of an instance of `type_name`.
    fn field_offset(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> std::result::Result<usize, LayoutResolutionError>;
}

impl<T: TargetMemory + ?Sized> TargetMemory for &T {
    fn read_word(&self, addr: Address) -> Result<usize> {
        (**self).read_word(addr)
    }
}

impl<T: TypeDataBase + ?Sized> TypeDataBase for &T {
    fn field_offset(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> std::result::Result<usize, LayoutResolutionError> {
        (**self).field_offset(type_name, field_name)
    }
}
