//! heapview provides read-only views over the generations of a serial heap in an
//! inspected process: the copying young generation (eden plus two survivor spaces)
//! and the tenured old generation (one space inside a larger reservation).
//!
//! A view never dereferences the inspected process's memory directly. It reads words
//! through a [`TargetMemory`](vm::TargetMemory) implementation, at offsets resolved
//! once from a [`TypeDataBase`](vm::TypeDataBase):
//!
//! 1. Resolve the layout with [`LayoutTable::initialize`].
//! 2. Build a [`Target`] from the memory, the table and the [`Options`](util::options::Options).
//! 3. Open a [`SerialHeap`], or a single generation view, at an address of the target.
//!
//! Every query recomputes its answer from the target, so the views are only meaningful
//! while the target is stopped at a safepoint.

#[macro_use]
extern crate log;

mod error;
pub mod generation;
pub mod heap;
pub mod layout;
pub mod policy;
mod target;
pub mod util;
pub mod vm;

pub use crate::error::{Error, LayoutResolutionError, Result};
pub use crate::generation::{
    DefNewGeneration, Generation, GenerationKind, GenerationUsage, GenerationView,
    TenuredGeneration,
};
pub use crate::heap::{GenerationSummary, HeapSummary, SerialHeap};
pub use crate::layout::{LayoutTable, ResolvedLayout};
pub use crate::policy::{ContiguousSpace, MemRegion, SpaceBounds, VirtualSpace};
pub use crate::target::Target;
pub use crate::util::options::{Options, SizeUnit};
pub use crate::util::{Address, ByteSize};
pub use crate::vm::{SnapshotMemory, StaticTypeDataBase, TargetMemory, TypeDataBase};
