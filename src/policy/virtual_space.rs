use std::ops::Range;

use crate::error::{Error, Result};
use crate::target::Target;
use crate::util::conversions;
use crate::util::{Address, ByteSize};

/// A view of a `VirtualSpace`: an address range reserved up front, of which the prefix
/// `[low, high)` is committed.
///
/// `low_boundary <= low <= high <= high_boundary`.
#[derive(Clone, Copy, Debug)]
pub struct VirtualSpace<'a> {
    target: Target<'a>,
    addr: Address,
}

impl<'a> VirtualSpace<'a> {
    pub fn new(target: Target<'a>, addr: Address) -> Self {
        VirtualSpace { target, addr }
    }

    pub fn low_boundary(&self) -> Result<Address> {
        let offset = self.target.layout().virtual_space.low_boundary;
        self.target.read_field_address(self.addr, offset)
    }

    pub fn high_boundary(&self) -> Result<Address> {
        let offset = self.target.layout().virtual_space.high_boundary;
        self.target.read_field_address(self.addr, offset)
    }

    pub fn low(&self) -> Result<Address> {
        let offset = self.target.layout().virtual_space.low;
        self.target.read_field_address(self.addr, offset)
    }

    pub fn high(&self) -> Result<Address> {
        let offset = self.target.layout().virtual_space.high;
        self.target.read_field_address(self.addr, offset)
    }

    /// `high - low`
    pub fn committed_size(&self) -> Result<ByteSize> {
        Ok(self.high()?.as_usize().saturating_sub(self.low()?.as_usize()))
    }

    /// `high_boundary - low_boundary`
    pub fn reserved_size(&self) -> Result<ByteSize> {
        Ok(self
            .high_boundary()?
            .as_usize()
            .saturating_sub(self.low_boundary()?.as_usize()))
    }

    /// The part of the reservation that can still be committed.
    pub fn uncommitted_size(&self) -> Result<ByteSize> {
        Ok(self.reserved_size()?.saturating_sub(self.committed_size()?))
    }

    /// Is `addr` committed? (`low <= addr < high`)
    pub fn contains(&self, addr: Address) -> Result<bool> {
        Ok(self.low()? <= addr && addr < self.high()?)
    }
}

/// A view of a `MemRegion`: `word_size` words starting at `start`.
#[derive(Clone, Copy, Debug)]
pub struct MemRegion<'a> {
    target: Target<'a>,
    addr: Address,
}

impl<'a> MemRegion<'a> {
    pub fn new(target: Target<'a>, addr: Address) -> Self {
        MemRegion { target, addr }
    }

    pub fn start(&self) -> Result<Address> {
        let offset = self.target.layout().mem_region.start;
        self.target.read_field_address(self.addr, offset)
    }

    pub fn word_size(&self) -> Result<usize> {
        let offset = self.target.layout().mem_region.word_size;
        self.target.read_field_word(self.addr, offset)
    }

    fn invalid(&self, start: Address, word_size: usize) -> Error {
        Error::InvalidMemRegion {
            region: self.addr,
            start,
            word_size,
        }
    }

    pub fn byte_size(&self) -> Result<ByteSize> {
        let word_size = self.word_size()?;
        match conversions::words_to_bytes(word_size) {
            Some(bytes) => Ok(bytes),
            None => Err(self.invalid(self.start()?, word_size)),
        }
    }

    /// `start + byte_size`. Fails with [`Error::InvalidMemRegion`] if the region runs past
    /// the end of the address space.
    pub fn end(&self) -> Result<Address> {
        let start = self.start()?;
        let word_size = self.word_size()?;
        conversions::words_to_bytes(word_size)
            .and_then(|bytes| start.checked_add(bytes))
            .ok_or_else(|| self.invalid(start, word_size))
    }

    pub fn range(&self) -> Result<Range<Address>> {
        Ok(self.start()?..self.end()?)
    }

    pub fn contains(&self, addr: Address) -> Result<bool> {
        self.range().map(|r| r.contains(&addr))
    }
}
