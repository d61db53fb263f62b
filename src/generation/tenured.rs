use std::io;

use super::{GenerationKind, GenerationUsage, GenerationView, PrintSpaces};
use crate::error::Result;
use crate::policy::space::ContiguousSpace;
use crate::target::Target;
use crate::util::{Address, ByteSize};

/// A view of a `TenuredGeneration`, the old generation: a single contiguous space that
/// commits a prefix of the generation's virtual memory reservation.
#[derive(Clone, Copy, Debug)]
pub struct TenuredGeneration<'a> {
    target: Target<'a>,
    addr: Address,
}

impl<'a> TenuredGeneration<'a> {
    pub const NAME: &'static str = "tenured generation";

    pub fn new(target: Target<'a>, addr: Address) -> Self {
        TenuredGeneration { target, addr }
    }

    pub fn the_space(&self) -> Result<ContiguousSpace<'a>> {
        let offset = self.target.layout().tenured.the_space;
        let space = self.target.read_field_address(self.addr, offset)?;
        trace!("{} at {}: the space -> {}", Self::NAME, self.addr, space);
        Ok(ContiguousSpace::new(self.target, space))
    }
}

impl<'a> GenerationView<'a> for TenuredGeneration<'a> {
    fn target(&self) -> Target<'a> {
        self.target
    }

    fn address(&self) -> Address {
        self.addr
    }

    fn kind(&self) -> GenerationKind {
        GenerationKind::MarkSweepCompact
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn usage(&self) -> Result<GenerationUsage> {
        let bounds = self.the_space()?.bounds()?;
        Ok(GenerationUsage {
            capacity: bounds.capacity(),
            used: bounds.used(),
        })
    }

    /// The space's free bytes plus what the reservation can still commit: the
    /// generation can grow in place before it needs a full collection.
    fn contiguous_available(&self) -> Result<ByteSize> {
        let free = self.the_space()?.free()?;
        let uncommitted = self.virtual_space()?.uncommitted_size()?;
        Ok(free.saturating_add(uncommitted))
    }

    fn space_iterate<F: FnMut(&ContiguousSpace<'a>)>(&self, _used_only: bool, mut f: F) -> Result<()> {
        f(&self.the_space()?);
        Ok(())
    }

    fn live_regions_iterate<F: FnMut(&ContiguousSpace<'a>)>(&self, mut f: F) -> Result<()> {
        f(&self.the_space()?);
        Ok(())
    }

    /// Only the committed part of the space counts. Addresses in the uncommitted tail of
    /// the reservation are not in this generation.
    fn is_in(&self, addr: Address) -> Result<bool> {
        self.the_space()?.contains(addr)
    }
}

impl PrintSpaces for TenuredGeneration<'_> {
    fn try_print_spaces_on(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        sink.write_all(b"  old ")?;
        self.the_space()
            .map_err(crate::util::print::read_failed)?
            .try_print_on(sink)?;
        writeln!(sink)
    }
}
