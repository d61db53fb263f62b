//! Field offsets of the inspected VM's heap types.
//!
//! Every view locates its fields through a [`ResolvedLayout`]. The layout is resolved
//! once from a [`TypeDataBase`] into a [`LayoutTable`], which is then shared read-only by
//! all views for the life of the inspection session.

use std::sync::OnceLock;

use crate::error::LayoutResolutionError;
use crate::vm::TypeDataBase;

/// Offsets of `Space` and `ContiguousSpace` fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpaceLayout {
    /// `Space::_bottom`
    pub bottom: usize,
    /// `Space::_end`
    pub end: usize,
    /// `ContiguousSpace::_top`
    pub top: usize,
}

/// Offsets of `VirtualSpace` fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VirtualSpaceLayout {
    pub low_boundary: usize,
    pub high_boundary: usize,
    pub low: usize,
    pub high: usize,
}

/// Offsets of `MemRegion` fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemRegionLayout {
    pub start: usize,
    pub word_size: usize,
}

/// Offsets of the fields every generation has. Both are embedded values, not pointers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationLayout {
    /// `Generation::_reserved`, a `MemRegion`.
    pub reserved: usize,
    /// `Generation::_virtual_space`, a `VirtualSpace`.
    pub virtual_space: usize,
}

/// Offsets of `DefNewGeneration` fields. Each one holds a pointer to a `ContiguousSpace`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefNewLayout {
    pub eden_space: usize,
    pub from_space: usize,
    pub to_space: usize,
}

/// Offsets of `TenuredGeneration` fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TenuredLayout {
    /// `TenuredGeneration::_the_space`, a pointer to a `ContiguousSpace`.
    pub the_space: usize,
}

/// Offsets of `GenCollectedHeap` fields. Each one holds a pointer to a generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapLayout {
    pub young_gen: usize,
    pub old_gen: usize,
}

/// All the field offsets heapview reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedLayout {
    pub space: SpaceLayout,
    pub virtual_space: VirtualSpaceLayout,
    pub mem_region: MemRegionLayout,
    pub generation: GenerationLayout,
    pub def_new: DefNewLayout,
    pub tenured: TenuredLayout,
    pub heap: HeapLayout,
}

/// Every `(type, field)` pair a [`ResolvedLayout`] is made of, in resolution order.
pub const REQUIRED_FIELDS: &[(&str, &str)] = &[
    ("Space", "_bottom"),
    ("Space", "_end"),
    ("ContiguousSpace", "_top"),
    ("VirtualSpace", "_low_boundary"),
    ("VirtualSpace", "_high_boundary"),
    ("VirtualSpace", "_low"),
    ("VirtualSpace", "_high"),
    ("MemRegion", "_start"),
    ("MemRegion", "_word_size"),
    ("Generation", "_reserved"),
    ("Generation", "_virtual_space"),
    ("DefNewGeneration", "_eden_space"),
    ("DefNewGeneration", "_from_space"),
    ("DefNewGeneration", "_to_space"),
    ("TenuredGeneration", "_the_space"),
    ("GenCollectedHeap", "_young_gen"),
    ("GenCollectedHeap", "_old_gen"),
];

impl ResolvedLayout {
    /// Look up every required field. Fails on the first one the database does not know.
    pub fn resolve(db: &dyn TypeDataBase) -> Result<Self, LayoutResolutionError> {
        let field = |type_name: &str, field_name: &str| {
            let offset = db.field_offset(type_name, field_name)?;
            trace!("{}::{} at offset {}", type_name, field_name, offset);
            Ok::<usize, LayoutResolutionError>(offset)
        };
        Ok(ResolvedLayout {
            space: SpaceLayout {
                bottom: field("Space", "_bottom")?,
                end: field("Space", "_end")?,
                top: field("ContiguousSpace", "_top")?,
            },
            virtual_space: VirtualSpaceLayout {
                low_boundary: field("VirtualSpace", "_low_boundary")?,
                high_boundary: field("VirtualSpace", "_high_boundary")?,
                low: field("VirtualSpace", "_low")?,
                high: field("VirtualSpace", "_high")?,
            },
            mem_region: MemRegionLayout {
                start: field("MemRegion", "_start")?,
                word_size: field("MemRegion", "_word_size")?,
            },
            generation: GenerationLayout {
                reserved: field("Generation", "_reserved")?,
                virtual_space: field("Generation", "_virtual_space")?,
            },
            def_new: DefNewLayout {
                eden_space: field("DefNewGeneration", "_eden_space")?,
                from_space: field("DefNewGeneration", "_from_space")?,
                to_space: field("DefNewGeneration", "_to_space")?,
            },
            tenured: TenuredLayout {
                the_space: field("TenuredGeneration", "_the_space")?,
            },
            heap: HeapLayout {
                young_gen: field("GenCollectedHeap", "_young_gen")?,
                old_gen: field("GenCollectedHeap", "_old_gen")?,
            },
        })
    }
}

/// The init-once home of a [`ResolvedLayout`].
///
/// Create one per inspection session, [`initialize`](LayoutTable::initialize) it once the
/// type database of the target is available, and pass it to [`crate::Target::new`].
#[derive(Default, Debug)]
pub struct LayoutTable {
    resolved: OnceLock<ResolvedLayout>,
}

impl LayoutTable {
    /// An unresolved table. Any use before `initialize` fails with
    /// [`LayoutResolutionError::NotInitialized`].
    pub const fn new() -> Self {
        Self {
            resolved: OnceLock::new(),
        }
    }

    /// Resolve the layout from `db`. Once a call succeeds the table never changes, and
    /// later calls return the existing layout without consulting `db`. A failed call
    /// leaves the table unresolved.
    pub fn initialize(&self, db: &dyn TypeDataBase) -> Result<&ResolvedLayout, LayoutResolutionError> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(resolved);
        }
        let layout = ResolvedLayout::resolve(db)?;
        debug!("Resolved heap layout: {:?}", layout);
        Ok(self.resolved.get_or_init(|| layout))
    }

    pub fn is_initialized(&self) -> bool {
        self.resolved.get().is_some()
    }

    pub fn get(&self) -> Result<&ResolvedLayout, LayoutResolutionError> {
        self.resolved
            .get()
            .ok_or(LayoutResolutionError::NotInitialized)
    }
}
