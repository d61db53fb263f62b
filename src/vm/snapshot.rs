use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::util::constants::BYTES_IN_WORD;
use crate::util::conversions;
use crate::util::Address;
use crate::vm::TargetMemory;

/// Target memory captured as a set of byte regions, e.g. from a core file or a
/// test that lays out a heap by hand.
///
/// Regions must not overlap. A word read must fall entirely inside one region.
#[derive(Default, Clone)]
pub struct SnapshotMemory {
    regions: BTreeMap<Address, Vec<u8>>,
}

impl SnapshotMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region of captured bytes starting at `start`.
    pub fn add_region(&mut self, start: Address, bytes: Vec<u8>) {
        let end = start + bytes.len();
        debug_assert!(
            self.regions
                .range(..end)
                .next_back()
                .map_or(true, |(s, b)| *s + b.len() <= start),
            "region {}..{} overlaps an existing region",
            start,
            end
        );
        self.regions.insert(start, bytes);
    }

    /// Add a zero-filled region of `size` bytes starting at `start`.
    pub fn add_zeroed_region(&mut self, start: Address, size: usize) {
        self.add_region(start, vec![0u8; size]);
    }

    /// Overwrite one word inside an existing region.
    pub fn write_word(&mut self, addr: Address, value: usize) -> Result<()> {
        let (offset, bytes) = self.locate_mut(addr)?;
        bytes[offset..offset + BYTES_IN_WORD].copy_from_slice(bytemuck::bytes_of(&value));
        Ok(())
    }

    /// Overwrite one word inside an existing region with an address.
    pub fn write_address(&mut self, addr: Address, value: Address) -> Result<()> {
        self.write_word(addr, value.as_usize())
    }

    fn locate(&self, addr: Address) -> Result<(usize, &[u8])> {
        match self.regions.range(..=addr).next_back() {
            Some((start, bytes))
                if addr
                    .checked_add(BYTES_IN_WORD)
                    .is_some_and(|end| end <= *start + bytes.len()) =>
            {
                Ok((addr - *start, bytes.as_slice()))
            }
            _ => Err(Error::UnmappedAddress(addr)),
        }
    }

    fn locate_mut(&mut self, addr: Address) -> Result<(usize, &mut Vec<u8>)> {
        match self.regions.range_mut(..=addr).next_back() {
            Some((start, bytes))
                if addr
                    .checked_add(BYTES_IN_WORD)
                    .is_some_and(|end| end <= *start + bytes.len()) =>
            {
                Ok((addr - *start, bytes))
            }
            _ => Err(Error::UnmappedAddress(addr)),
        }
    }
}

impl TargetMemory for SnapshotMemory {
    fn read_word(&self, addr: Address) -> Result<usize> {
        // Words of the VM's objects are always aligned. An unaligned read comes from a
        // garbage pointer.
        if !conversions::is_address_aligned(addr) {
            return Err(Error::UnmappedAddress(addr));
        }
        let (offset, bytes) = self.locate(addr)?;
        let word: usize = bytemuck::pod_read_unaligned(&bytes[offset..offset + BYTES_IN_WORD]);
        trace!("read {} = {:#x}", addr, word);
        Ok(word)
    }
}
