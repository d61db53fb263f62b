use crate::error::{Error, Result};
use crate::layout::{LayoutTable, ResolvedLayout};
use crate::util::options::Options;
use crate::util::Address;
use crate::vm::TargetMemory;

/// Everything a view needs to read the inspected heap: the target's memory, its
/// resolved layout and the options. Views keep a copy of the `Target` they were made
/// from and re-read the target on every query.
#[derive(Clone, Copy)]
pub struct Target<'a> {
    memory: &'a dyn TargetMemory,
    layout: &'a ResolvedLayout,
    options: &'a Options,
}

impl<'a> Target<'a> {
    /// Fails with [`crate::LayoutResolutionError::NotInitialized`] if `layout` has not been
    /// initialized. No view can exist without a `Target`, so this is the only place a
    /// missing layout needs to be checked.
    pub fn new(
        memory: &'a dyn TargetMemory,
        layout: &'a LayoutTable,
        options: &'a Options,
    ) -> Result<Self> {
        let layout = layout.get()?;
        Ok(Target {
            memory,
            layout,
            options,
        })
    }

    pub fn layout(&self) -> &'a ResolvedLayout {
        self.layout
    }

    pub fn options(&self) -> &'a Options {
        self.options
    }

    pub fn read_word(&self, addr: Address) -> Result<usize> {
        self.memory.read_word(addr)
    }

    pub fn read_address(&self, addr: Address) -> Result<Address> {
        self.memory.read_address(addr)
    }

    /// The address of the field at `offset` in the object at `base`. When `base` is so high
    /// that the field would lie past the end of the address space, `base` is unmapped.
    pub fn field_address(&self, base: Address, offset: usize) -> Result<Address> {
        base.checked_add(offset).ok_or(Error::UnmappedAddress(base))
    }

    pub fn read_field_word(&self, base: Address, offset: usize) -> Result<usize> {
        self.read_word(self.field_address(base, offset)?)
    }

    pub fn read_field_address(&self, base: Address, offset: usize) -> Result<Address> {
        self.read_address(self.field_address(base, offset)?)
    }
}

impl std::fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("layout", self.layout)
            .field("options", self.options)
            .finish_non_exhaustive()
    }
}
