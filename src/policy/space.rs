use std::io;
use std::ops::Range;

use crate::error::{Error, Result};
use crate::target::Target;
use crate::util::conversions;
use crate::util::print;
use crate::util::{Address, ByteSize};

/// The bounds of a contiguous space, read together in one go.
///
/// `bottom <= top <= end`: `[bottom, top)` holds allocated data and `[top, end)` is
/// free for bump allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpaceBounds {
    pub bottom: Address,
    pub top: Address,
    pub end: Address,
}

impl SpaceBounds {
    pub fn capacity(&self) -> ByteSize {
        self.end.as_usize().saturating_sub(self.bottom.as_usize())
    }

    pub fn used(&self) -> ByteSize {
        self.top.as_usize().saturating_sub(self.bottom.as_usize())
    }

    /// Always `capacity() - used()`.
    pub fn free(&self) -> ByteSize {
        self.capacity().saturating_sub(self.used())
    }

    pub fn contains(&self, addr: Address) -> bool {
        self.bottom <= addr && addr < self.end
    }

    fn is_well_formed(&self) -> bool {
        self.bottom <= self.top && self.top <= self.end
    }
}

/// A view of a `ContiguousSpace` in the target: a `[bottom, end)` extent that is
/// allocated by bumping `top`.
///
/// The view holds no state of its own. Each query reads the space's fields from the
/// target, so every call sees the space as it is at that moment.
#[derive(Clone, Copy, Debug)]
pub struct ContiguousSpace<'a> {
    target: Target<'a>,
    addr: Address,
}

impl<'a> ContiguousSpace<'a> {
    /// A view of the space object at `addr`.
    pub fn new(target: Target<'a>, addr: Address) -> Self {
        ContiguousSpace { target, addr }
    }

    /// The address of the space object itself (not of the memory it manages).
    pub fn address(&self) -> Address {
        self.addr
    }

    pub fn bottom(&self) -> Result<Address> {
        self.target
            .read_field_address(self.addr, self.target.layout().space.bottom)
    }

    pub fn top(&self) -> Result<Address> {
        self.target
            .read_field_address(self.addr, self.target.layout().space.top)
    }

    pub fn end(&self) -> Result<Address> {
        self.target
            .read_field_address(self.addr, self.target.layout().space.end)
    }

    /// Read `bottom`, `top` and `end`. With the `verify_space_bounds` option on, bounds that
    /// are out of order are reported as [`Error::InvalidSpaceBounds`].
    pub fn bounds(&self) -> Result<SpaceBounds> {
        let bounds = SpaceBounds {
            bottom: self.bottom()?,
            top: self.top()?,
            end: self.end()?,
        };
        if self.target.options().verify_space_bounds && !bounds.is_well_formed() {
            return Err(Error::InvalidSpaceBounds {
                space: self.addr,
                bottom: bounds.bottom,
                top: bounds.top,
                end: bounds.end,
            });
        }
        Ok(bounds)
    }

    pub fn capacity(&self) -> Result<ByteSize> {
        self.bounds().map(|b| b.capacity())
    }

    pub fn used(&self) -> Result<ByteSize> {
        self.bounds().map(|b| b.used())
    }

    pub fn free(&self) -> Result<ByteSize> {
        self.bounds().map(|b| b.free())
    }

    /// Is `addr` inside the committed extent `[bottom, end)`?
    pub fn contains(&self, addr: Address) -> Result<bool> {
        self.bounds().map(|b| b.contains(addr))
    }

    /// `[bottom, top)`
    pub fn used_region(&self) -> Result<Range<Address>> {
        self.bounds().map(|b| b.bottom..b.top)
    }

    /// Write ` space capacity = <capacity>, <percent>% used [<bottom>,<top>,<end>)`, without
    /// a line break. Failures are logged, not returned.
    pub fn print_on(&self, sink: &mut dyn io::Write) {
        print::best_effort(self.addr, self.try_print_on(sink));
    }

    pub(crate) fn try_print_on(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        let bounds = self.bounds().map_err(print::read_failed)?;
        write!(
            sink,
            " space capacity = {}, {:.1}% used [{},{},{})",
            conversions::bytes_to_formatted_string(
                bounds.capacity(),
                self.target.options().print_size_unit
            ),
            conversions::percentage(bounds.used(), bounds.capacity()),
            bounds.bottom,
            bounds.top,
            bounds.end
        )
    }
}

impl PartialEq for ContiguousSpace<'_> {
    /// Two views are equal if they look at the same space object.
    fn eq(&self, other: &Self) -> bool {
        self.addr == other.addr
    }
}

impl Eq for ContiguousSpace<'_> {}
