//! Generations of a serial heap.
//!
//! A serial heap is split into a young generation ([`DefNewGeneration`]: eden plus two
//! survivor spaces) and an old generation ([`TenuredGeneration`]: one contiguous space
//! inside a larger reservation). Both offer the same query and iteration contract,
//! [`GenerationView`], so heap-level code can treat them alike; [`Generation`] is the
//! closed set of variants.
//!
//! All views are read-only and recompute everything from the target on each call. The
//! caller must only query at a safepoint of the target, where no mutator or collector
//! is changing the spaces. Visitors passed to `space_iterate` and
//! `live_regions_iterate` must not change space boundaries of the target while the
//! iteration runs.

use std::io;

use crate::error::Result;
use crate::policy::space::ContiguousSpace;
use crate::policy::virtual_space::{MemRegion, VirtualSpace};
use crate::target::Target;
use crate::util::conversions;
use crate::util::print;
use crate::util::{Address, ByteSize};

pub mod def_new;
pub mod tenured;

pub use self::def_new::DefNewGeneration;
pub use self::tenured::TenuredGeneration;

/// The kind of a generation, for callers that need to special-case a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum GenerationKind {
    /// The copying young generation.
    DefNew,
    /// The mark-sweep-compact old generation.
    MarkSweepCompact,
    /// Any generation kind heapview does not model.
    Other,
}

/// Capacity and usage of a generation, read together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationUsage {
    pub capacity: ByteSize,
    pub used: ByteSize,
}

impl GenerationUsage {
    /// Derived, never stored: `capacity - used`, or 0 when unverified bounds report
    /// more used than capacity.
    pub fn free(&self) -> ByteSize {
        self.capacity.saturating_sub(self.used)
    }

    /// Both figures of `self` and `other` added, saturating.
    pub fn combined(&self, other: GenerationUsage) -> GenerationUsage {
        GenerationUsage {
            capacity: self.capacity.saturating_add(other.capacity),
            used: self.used.saturating_add(other.used),
        }
    }
}

mod sealed {
    use std::io;

    /// The per-space lines of a generation's `print_on`. Implemented by the generations of
    /// this crate only.
    pub trait PrintSpaces {
        fn try_print_spaces_on(&self, sink: &mut dyn io::Write) -> io::Result<()>;
    }
}

pub(crate) use self::sealed::PrintSpaces;

/// The query and iteration contract shared by all generations.
///
/// The trait is sealed: [`Generation`] is the closed set of generations.
pub trait GenerationView<'a>: sealed::PrintSpaces {
    fn target(&self) -> Target<'a>;

    /// The address of the generation object in the target.
    fn address(&self) -> Address;

    fn kind(&self) -> GenerationKind;

    fn name(&self) -> &'static str;

    /// Capacity and usage of the spaces this generation accounts for.
    fn usage(&self) -> Result<GenerationUsage>;

    /// The largest allocation this generation can satisfy right now without a collection.
    fn contiguous_available(&self) -> Result<ByteSize>;

    /// Visit the spaces of this generation in their fixed order. With `used_only`, spaces
    /// that are not in active service are skipped.
    fn space_iterate<F: FnMut(&ContiguousSpace<'a>)>(&self, used_only: bool, f: F) -> Result<()>;

    /// Visit only the spaces that can hold live data.
    fn live_regions_iterate<F: FnMut(&ContiguousSpace<'a>)>(&self, f: F) -> Result<()>;

    fn capacity(&self) -> Result<ByteSize> {
        self.usage().map(|u| u.capacity)
    }

    fn used(&self) -> Result<ByteSize> {
        self.usage().map(|u| u.used)
    }

    fn free(&self) -> Result<ByteSize> {
        self.usage().map(|u| u.free())
    }

    /// The address range reserved for this generation.
    fn reserved(&self) -> Result<MemRegion<'a>> {
        let target = self.target();
        let offset = target.layout().generation.reserved;
        Ok(MemRegion::new(target, target.field_address(self.address(), offset)?))
    }

    /// The virtual memory reservation backing this generation.
    fn virtual_space(&self) -> Result<VirtualSpace<'a>> {
        let target = self.target();
        let offset = target.layout().generation.virtual_space;
        Ok(VirtualSpace::new(target, target.field_address(self.address(), offset)?))
    }

    fn is_in_reserved(&self, addr: Address) -> Result<bool> {
        self.reserved()?.contains(addr)
    }

    /// Is `addr` inside one of this generation's spaces, including spaces that are out
    /// of service?
    fn is_in(&self, addr: Address) -> Result<bool> {
        self.space_containing(addr).map(|s| s.is_some())
    }

    /// The space whose committed extent contains `addr`.
    fn space_containing(&self, addr: Address) -> Result<Option<ContiguousSpace<'a>>> {
        let mut found = None;
        let mut error = None;
        self.space_iterate(false, |space| {
            if found.is_some() || error.is_some() {
                return;
            }
            match space.contains(addr) {
                Ok(true) => found = Some(*space),
                Ok(false) => {}
                Err(e) => error = Some(e),
            }
        })?;
        match error {
            Some(e) => Err(e),
            None => Ok(found),
        }
    }

    /// Write a summary line for the generation followed by one indented line per
    /// space. Failures are logged, not returned.
    fn print_on(&self, sink: &mut dyn io::Write) {
        print::best_effort(self.name(), try_print_generation(self, sink));
    }
}

fn try_print_generation<'a, G: GenerationView<'a> + ?Sized>(
    gen: &G,
    sink: &mut dyn io::Write,
) -> io::Result<()> {
    let unit = gen.target().options().print_size_unit;
    let usage = gen.usage().map_err(print::read_failed)?;
    let vs = gen.virtual_space().map_err(print::read_failed)?;
    writeln!(
        sink,
        "{} total {}, used {} [{}, {})",
        gen.name(),
        conversions::bytes_to_formatted_string(usage.capacity, unit),
        conversions::bytes_to_formatted_string(usage.used, unit),
        vs.low_boundary().map_err(print::read_failed)?,
        vs.high_boundary().map_err(print::read_failed)?,
    )?;
    gen.try_print_spaces_on(sink)
}

/// A generation of a serial heap.
#[derive(Clone, Copy, Debug)]
pub enum Generation<'a> {
    Young(DefNewGeneration<'a>),
    Old(TenuredGeneration<'a>),
}

impl<'a> Generation<'a> {
    pub fn as_young(&self) -> Option<&DefNewGeneration<'a>> {
        match self {
            Generation::Young(gen) => Some(gen),
            Generation::Old(_) => None,
        }
    }

    pub fn as_old(&self) -> Option<&TenuredGeneration<'a>> {
        match self {
            Generation::Young(_) => None,
            Generation::Old(gen) => Some(gen),
        }
    }
}

impl<'a> From<DefNewGeneration<'a>> for Generation<'a> {
    fn from(gen: DefNewGeneration<'a>) -> Self {
        Generation::Young(gen)
    }
}

impl<'a> From<TenuredGeneration<'a>> for Generation<'a> {
    fn from(gen: TenuredGeneration<'a>) -> Self {
        Generation::Old(gen)
    }
}

impl<'a> GenerationView<'a> for Generation<'a> {
    fn target(&self) -> Target<'a> {
        match self {
            Generation::Young(gen) => gen.target(),
            Generation::Old(gen) => gen.target(),
        }
    }

    fn address(&self) -> Address {
        match self {
            Generation::Young(gen) => gen.address(),
            Generation::Old(gen) => gen.address(),
        }
    }

    fn kind(&self) -> GenerationKind {
        match self {
            Generation::Young(gen) => gen.kind(),
            Generation::Old(gen) => gen.kind(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Generation::Young(gen) => gen.name(),
            Generation::Old(gen) => gen.name(),
        }
    }

    fn usage(&self) -> Result<GenerationUsage> {
        match self {
            Generation::Young(gen) => gen.usage(),
            Generation::Old(gen) => gen.usage(),
        }
    }

    fn contiguous_available(&self) -> Result<ByteSize> {
        match self {
            Generation::Young(gen) => gen.contiguous_available(),
            Generation::Old(gen) => gen.contiguous_available(),
        }
    }

    fn space_iterate<F: FnMut(&ContiguousSpace<'a>)>(&self, used_only: bool, f: F) -> Result<()> {
        match self {
            Generation::Young(gen) => gen.space_iterate(used_only, f),
            Generation::Old(gen) => gen.space_iterate(used_only, f),
        }
    }

    fn live_regions_iterate<F: FnMut(&ContiguousSpace<'a>)>(&self, f: F) -> Result<()> {
        match self {
            Generation::Young(gen) => gen.live_regions_iterate(f),
            Generation::Old(gen) => gen.live_regions_iterate(f),
        }
    }

    fn is_in(&self, addr: Address) -> Result<bool> {
        match self {
            Generation::Young(gen) => gen.is_in(addr),
            Generation::Old(gen) => gen.is_in(addr),
        }
    }
}

impl sealed::PrintSpaces for Generation<'_> {
    fn try_print_spaces_on(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        match self {
            Generation::Young(gen) => gen.try_print_spaces_on(sink),
            Generation::Old(gen) => gen.try_print_spaces_on(sink),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_util::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn kind_names() {
        assert_eq!(GenerationKind::DefNew.to_string(), "DefNew");
        assert_eq!(GenerationKind::MarkSweepCompact.to_string(), "MarkSweepCompact");
        assert_eq!(GenerationKind::Other.to_string(), "Other");
    }

    #[test]
    fn usage_saturates() {
        let overfull = GenerationUsage {
            capacity: 2000,
            used: 2700,
        };
        assert_eq!(overfull.free(), 0);
        let huge = GenerationUsage {
            capacity: usize::MAX,
            used: usize::MAX - 1,
        };
        let total = huge.combined(overfull);
        assert_eq!(total.capacity, usize::MAX);
        assert_eq!(total.used, usize::MAX);
        assert_eq!(total.free(), 0);
    }

    #[test]
    fn dispatch_by_kind() {
        let mut heap = FakeHeap::new();
        let young = heap.add_def_new(space(1000, 300), space(1000, 200), space(1000, 0));
        let old = heap.add_tenured(space(2000, 1500), 500);
        heap.with_target(|target| {
            let gens: [Generation; 2] = [
                DefNewGeneration::new(target, young.addr).into(),
                TenuredGeneration::new(target, old.addr).into(),
            ];
            assert_eq!(gens[0].kind(), GenerationKind::DefNew);
            assert_eq!(gens[1].kind(), GenerationKind::MarkSweepCompact);
            assert!(gens[0].as_young().is_some() && gens[0].as_old().is_none());
            assert!(gens[1].as_old().is_some() && gens[1].as_young().is_none());
            assert_eq!(gens[0].capacity().unwrap(), 2000);
            assert_eq!(gens[1].capacity().unwrap(), 2000);
            assert_eq!(gens[0].contiguous_available().unwrap(), 700);
            assert_eq!(gens[1].contiguous_available().unwrap(), 1000);
        });
    }

    // free() == capacity() - used() for random states of both variants, including
    // random from/to role assignments.
    #[test]
    fn accounting_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        for _ in 0..64 {
            let mut heap = FakeHeap::new();
            let random_space = |rng: &mut ChaCha8Rng| {
                let capacity = rng.random_range(0..1 << 20);
                space(capacity, rng.random_range(0..=capacity))
            };
            let eden = random_space(&mut rng);
            let from = random_space(&mut rng);
            let to = random_space(&mut rng);
            let the_space = random_space(&mut rng);
            let mut young = heap.add_def_new(eden, from, to);
            if rng.random_bool(0.5) {
                heap.swap_survivors(&mut young);
            }
            let old = heap.add_tenured(the_space, rng.random_range(0..1 << 20));
            heap.with_target(|target| {
                let gens: [Generation; 2] = [
                    DefNewGeneration::new(target, young.addr).into(),
                    TenuredGeneration::new(target, old.addr).into(),
                ];
                for gen in gens {
                    let capacity = gen.capacity().unwrap();
                    let used = gen.used().unwrap();
                    assert!(used <= capacity);
                    assert_eq!(gen.free().unwrap(), capacity - used);
                }
            });
        }
    }

    #[test]
    fn space_containing() {
        let mut heap = FakeHeap::new();
        let young = heap.add_def_new(space(1000, 300), space(1000, 200), space(1000, 0));
        let to_bottom = heap.space_bottom(young.to);
        let eden_bottom = heap.space_bottom(young.eden);
        heap.with_target(|target| {
            let gen = Generation::from(DefNewGeneration::new(target, young.addr));
            let found = gen.space_containing(to_bottom).unwrap().unwrap();
            assert_eq!(found.address(), young.to);
            let found = gen.space_containing(eden_bottom + 999usize).unwrap().unwrap();
            assert_eq!(found.address(), young.eden);
            assert!(gen.space_containing(eden_bottom + 3000usize).unwrap().is_none());
            assert!(!gen.is_in(eden_bottom + 3000usize).unwrap());
            assert!(gen.is_in_reserved(to_bottom).unwrap());
            assert!(!gen.is_in_reserved(eden_bottom + 3000usize).unwrap());
        });
    }
}
