//! Views of the memory regions a generation is built from.

/// Contiguous, bump-allocated spaces.
pub mod space;
/// Virtual memory reservations and the regions they describe.
pub mod virtual_space;

pub use self::space::{ContiguousSpace, SpaceBounds};
pub use self::virtual_space::{MemRegion, VirtualSpace};
