//! A view of the whole serial heap (`GenCollectedHeap` with a young and an old
//! generation), aggregating the generation views.

use std::fmt;
use std::io;

use crate::error::{Error, Result};
use crate::generation::{
    DefNewGeneration, Generation, GenerationKind, GenerationUsage, GenerationView,
    TenuredGeneration,
};
use crate::policy::space::ContiguousSpace;
use crate::target::Target;
use crate::util::{Address, ByteSize};

#[derive(Clone, Copy, Debug)]
pub struct SerialHeap<'a> {
    addr: Address,
    young: DefNewGeneration<'a>,
    old: TenuredGeneration<'a>,
}

impl<'a> SerialHeap<'a> {
    /// Open a view of the heap object at `addr`. The generation pointers are read once:
    /// generations live as long as the heap.
    pub fn new(target: Target<'a>, addr: Address) -> Result<Self> {
        let layout = target.layout().heap;
        let young = target.read_field_address(addr, layout.young_gen)?;
        if young.is_zero() {
            return Err(Error::NullGeneration {
                heap: addr,
                field: "_young_gen",
            });
        }
        let old = target.read_field_address(addr, layout.old_gen)?;
        if old.is_zero() {
            return Err(Error::NullGeneration {
                heap: addr,
                field: "_old_gen",
            });
        }
        debug!("Serial heap at {}: young gen {}, old gen {}", addr, young, old);
        Ok(SerialHeap {
            addr,
            young: DefNewGeneration::new(target, young),
            old: TenuredGeneration::new(target, old),
        })
    }

    pub fn address(&self) -> Address {
        self.addr
    }

    pub fn young_gen(&self) -> DefNewGeneration<'a> {
        self.young
    }

    pub fn old_gen(&self) -> TenuredGeneration<'a> {
        self.old
    }

    /// Young first, then old.
    pub fn generations(&self) -> [Generation<'a>; 2] {
        [self.young.into(), self.old.into()]
    }

    pub fn usage(&self) -> Result<GenerationUsage> {
        let mut total = GenerationUsage {
            capacity: 0,
            used: 0,
        };
        for gen in self.generations() {
            total = total.combined(gen.usage()?);
        }
        Ok(total)
    }

    pub fn capacity(&self) -> Result<ByteSize> {
        self.usage().map(|u| u.capacity)
    }

    pub fn used(&self) -> Result<ByteSize> {
        self.usage().map(|u| u.used)
    }

    pub fn free(&self) -> Result<ByteSize> {
        self.usage().map(|u| u.free())
    }

    pub fn generation_containing(&self, addr: Address) -> Result<Option<Generation<'a>>> {
        for gen in self.generations() {
            if gen.is_in(addr)? {
                return Ok(Some(gen));
            }
        }
        Ok(None)
    }

    pub fn is_in(&self, addr: Address) -> Result<bool> {
        self.generation_containing(addr).map(|g| g.is_some())
    }

    /// Visit every space of every generation, young to old.
    pub fn space_iterate<F: FnMut(&ContiguousSpace<'a>)>(&self, used_only: bool, mut f: F) -> Result<()> {
        for gen in self.generations() {
            gen.space_iterate(used_only, &mut f)?;
        }
        Ok(())
    }

    pub fn summary(&self) -> Result<HeapSummary> {
        let generations = self
            .generations()
            .iter()
            .map(|gen| {
                let usage = gen.usage()?;
                Ok(GenerationSummary {
                    name: gen.name(),
                    kind: gen.kind(),
                    capacity: usage.capacity,
                    used: usage.used,
                    free: usage.free(),
                    contiguous_available: gen.contiguous_available()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(HeapSummary { generations })
    }

    /// Print every generation, young to old. Failures are logged, not returned.
    pub fn print_on(&self, sink: &mut dyn io::Write) {
        for gen in self.generations() {
            gen.print_on(sink);
        }
    }
}

/// Figures of one generation at the time the summary was taken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationSummary {
    pub name: &'static str,
    pub kind: GenerationKind,
    pub capacity: ByteSize,
    pub used: ByteSize,
    pub free: ByteSize,
    pub contiguous_available: ByteSize,
}

/// A point-in-time copy of the heap's figures, young generation first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeapSummary {
    pub generations: Vec<GenerationSummary>,
}

impl HeapSummary {
    pub fn capacity(&self) -> ByteSize {
        self.generations
            .iter()
            .fold(0, |total: ByteSize, g| total.saturating_add(g.capacity))
    }

    pub fn used(&self) -> ByteSize {
        self.generations
            .iter()
            .fold(0, |total: ByteSize, g| total.saturating_add(g.used))
    }

    pub fn free(&self) -> ByteSize {
        self.capacity().saturating_sub(self.used())
    }
}

impl fmt::Display for HeapSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for gen in &self.generations {
            writeln!(
                f,
                "{} ({}): capacity = {}, used = {}, free = {}, contiguous available = {}",
                gen.name, gen.kind, gen.capacity, gen.used, gen.free, gen.contiguous_available
            )?;
        }
        write!(
            f,
            "total: capacity = {}, used = {}, free = {}",
            self.capacity(),
            self.used(),
            self.free()
        )
    }
}
