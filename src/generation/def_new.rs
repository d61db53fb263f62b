use std::io;

use super::{GenerationKind, GenerationUsage, GenerationView, PrintSpaces};
use crate::error::Result;
use crate::policy::space::ContiguousSpace;
use crate::target::Target;
use crate::util::{Address, ByteSize};

/// A view of a `DefNewGeneration`, the copying young generation.
///
/// It owns three spaces: `eden`, where mutators bump-allocate, and two survivor spaces.
/// `from` holds the survivors of the last scavenge; `to` is the copy destination of the
/// next one. A scavenge swaps the two roles, so the survivor pointers are re-read on
/// every call.
///
/// Outside a scavenge the content of `to` is unspecified. It is never counted in
/// [`usage`](GenerationView::usage), would otherwise double the apparent room of the
/// generation, and is only visited when a caller asks for every space.
#[derive(Clone, Copy, Debug)]
pub struct DefNewGeneration<'a> {
    target: Target<'a>,
    addr: Address,
}

impl<'a> DefNewGeneration<'a> {
    pub const NAME: &'static str = "default new generation";

    pub fn new(target: Target<'a>, addr: Address) -> Self {
        DefNewGeneration { target, addr }
    }

    fn space_at(&self, offset: usize) -> Result<ContiguousSpace<'a>> {
        let space = self.target.read_field_address(self.addr, offset)?;
        trace!("{} at {}: space field +{} -> {}", Self::NAME, self.addr, offset, space);
        Ok(ContiguousSpace::new(self.target, space))
    }

    pub fn eden(&self) -> Result<ContiguousSpace<'a>> {
        self.space_at(self.target.layout().def_new.eden_space)
    }

    pub fn from(&self) -> Result<ContiguousSpace<'a>> {
        self.space_at(self.target.layout().def_new.from_space)
    }

    pub fn to(&self) -> Result<ContiguousSpace<'a>> {
        self.space_at(self.target.layout().def_new.to_space)
    }
}

impl<'a> GenerationView<'a> for DefNewGeneration<'a> {
    fn target(&self) -> Target<'a> {
        self.target
    }

    fn address(&self) -> Address {
        self.addr
    }

    fn kind(&self) -> GenerationKind {
        GenerationKind::DefNew
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    /// eden + from. `to` is only used during a scavenge.
    fn usage(&self) -> Result<GenerationUsage> {
        let eden = self.eden()?.bounds()?;
        let from = self.from()?.bounds()?;
        let eden = GenerationUsage {
            capacity: eden.capacity(),
            used: eden.used(),
        };
        Ok(eden.combined(GenerationUsage {
            capacity: from.capacity(),
            used: from.used(),
        }))
    }

    /// Only eden's free space: mutators allocate by bumping eden, and the survivor spaces
    /// are not available to them.
    fn contiguous_available(&self) -> Result<ByteSize> {
        self.eden()?.free()
    }

    /// eden, from, then to unless `used_only`.
    fn space_iterate<F: FnMut(&ContiguousSpace<'a>)>(&self, used_only: bool, mut f: F) -> Result<()> {
        f(&self.eden()?);
        f(&self.from()?);
        if !used_only {
            f(&self.to()?);
        }
        Ok(())
    }

    /// eden, then from. `to` never holds live data between scavenges.
    fn live_regions_iterate<F: FnMut(&ContiguousSpace<'a>)>(&self, mut f: F) -> Result<()> {
        f(&self.eden()?);
        f(&self.from()?);
        Ok(())
    }
}

impl PrintSpaces for DefNewGeneration<'_> {
    fn try_print_spaces_on(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        use crate::util::print::read_failed;
        for (label, space) in [
            ("  eden", self.eden()),
            ("  from", self.from()),
            ("  to  ", self.to()),
        ] {
            sink.write_all(label.as_bytes())?;
            space.map_err(read_failed)?.try_print_on(sink)?;
            writeln!(sink)?;
        }
        Ok(())
    }
}
