//! Fake serial heaps for unit tests.
//!
//! A [`FakeHeap`] lays out VM objects (spaces, generations, a heap) in a
//! [`SnapshotMemory`], using the offsets of [`fake_type_db`]. The memory the spaces
//! manage is only described by addresses and has no bytes behind it.

use std::io;

use crate::layout::LayoutTable;
use crate::target::Target;
use crate::util::constants::BYTES_IN_WORD;
use crate::util::conversions;
use crate::util::options::Options;
use crate::util::Address;
use crate::vm::{SnapshotMemory, StaticTypeDataBase};

const OBJECT_SIZE: usize = 0x100;
const OBJECT_BASE: Address = Address::from_usize(0x10_0000);
const DATA_BASE: Address = Address::from_usize(0x1000_0000);
const DATA_ALIGN: usize = 0x1_0000;

const SPACE_BOTTOM: usize = 0x8;
const SPACE_END: usize = 0x10;
const SPACE_TOP: usize = 0x28;
const VS_LOW_BOUNDARY: usize = 0x0;
const VS_HIGH_BOUNDARY: usize = 0x8;
const VS_LOW: usize = 0x10;
const VS_HIGH: usize = 0x18;
const MR_START: usize = 0x0;
const MR_WORD_SIZE: usize = 0x8;
const GEN_RESERVED: usize = 0x10;
const GEN_VIRTUAL_SPACE: usize = 0x20;
const DEF_NEW_EDEN: usize = 0x60;
const DEF_NEW_FROM: usize = 0x68;
const DEF_NEW_TO: usize = 0x70;
const TENURED_THE_SPACE: usize = 0x60;
const HEAP_YOUNG_GEN: usize = 0x18;
const HEAP_OLD_GEN: usize = 0x20;

/// A type database with the offsets [`FakeHeap`] writes objects with.
pub fn fake_type_db() -> StaticTypeDataBase {
    let mut db = StaticTypeDataBase::new();
    db.add_field("Space", "_bottom", SPACE_BOTTOM)
        .add_field("Space", "_end", SPACE_END)
        .add_field("ContiguousSpace", "_top", SPACE_TOP)
        .add_field("VirtualSpace", "_low_boundary", VS_LOW_BOUNDARY)
        .add_field("VirtualSpace", "_high_boundary", VS_HIGH_BOUNDARY)
        .add_field("VirtualSpace", "_low", VS_LOW)
        .add_field("VirtualSpace", "_high", VS_HIGH)
        .add_field("MemRegion", "_start", MR_START)
        .add_field("MemRegion", "_word_size", MR_WORD_SIZE)
        .add_field("Generation", "_reserved", GEN_RESERVED)
        .add_field("Generation", "_virtual_space", GEN_VIRTUAL_SPACE)
        .add_field("DefNewGeneration", "_eden_space", DEF_NEW_EDEN)
        .add_field("DefNewGeneration", "_from_space", DEF_NEW_FROM)
        .add_field("DefNewGeneration", "_to_space", DEF_NEW_TO)
        .add_field("TenuredGeneration", "_the_space", TENURED_THE_SPACE)
        .add_field("GenCollectedHeap", "_young_gen", HEAP_YOUNG_GEN)
        .add_field("GenCollectedHeap", "_old_gen", HEAP_OLD_GEN);
    db
}

/// Capacity and used bytes of a fake space.
#[derive(Clone, Copy, Debug)]
pub struct SpaceState {
    pub capacity: usize,
    pub used: usize,
}

pub const fn space(capacity: usize, used: usize) -> SpaceState {
    SpaceState { capacity, used }
}

/// Addresses of a fake `DefNewGeneration` and its spaces, as laid out.
#[derive(Clone, Copy, Debug)]
pub struct FakeDefNew {
    pub addr: Address,
    pub eden: Address,
    pub from: Address,
    pub to: Address,
}

/// Addresses of a fake `TenuredGeneration` and its space.
#[derive(Clone, Copy, Debug)]
pub struct FakeTenured {
    pub addr: Address,
    pub the_space: Address,
}

pub struct FakeHeap {
    pub memory: SnapshotMemory,
    pub table: LayoutTable,
    next_object: Address,
    next_data: Address,
}

impl FakeHeap {
    pub fn new() -> Self {
        let table = LayoutTable::new();
        table
            .initialize(&fake_type_db())
            .expect("the fake type database is complete");
        FakeHeap {
            memory: SnapshotMemory::new(),
            table,
            next_object: OBJECT_BASE,
            next_data: DATA_BASE,
        }
    }

    pub fn with_target<R>(&self, f: impl FnOnce(Target<'_>) -> R) -> R {
        self.with_target_options(&Options::builtin(), f)
    }

    pub fn with_target_options<R>(
        &self,
        options: &Options,
        f: impl FnOnce(Target<'_>) -> R,
    ) -> R {
        f(Target::new(&self.memory, &self.table, options).unwrap())
    }

    pub fn write(&mut self, addr: Address, value: usize) {
        self.memory.write_word(addr, value).unwrap();
    }

    pub fn write_address(&mut self, addr: Address, value: Address) {
        self.write(addr, value.as_usize());
    }

    /// A zeroed VM object.
    pub fn alloc_object(&mut self) -> Address {
        let addr = self.next_object;
        self.memory.add_zeroed_region(addr, OBJECT_SIZE);
        self.next_object = addr + OBJECT_SIZE;
        addr
    }

    /// Reserve `size` bytes of (unbacked) managed memory.
    fn alloc_data(&mut self, size: usize) -> Address {
        let addr = self.next_data;
        self.next_data = (addr + size).align_up(DATA_ALIGN) + DATA_ALIGN;
        addr
    }

    /// A space in its own fresh range of managed memory.
    pub fn add_space(&mut self, capacity: usize, used: usize) -> Address {
        let bottom = self.alloc_data(capacity);
        self.add_space_at(bottom, space(capacity, used))
    }

    pub fn add_space_at(&mut self, bottom: Address, state: SpaceState) -> Address {
        let addr = self.alloc_object();
        self.write_address(addr + SPACE_BOTTOM, bottom);
        self.write_address(addr + SPACE_TOP, bottom + state.used);
        self.write_address(addr + SPACE_END, bottom + state.capacity);
        addr
    }

    pub fn space_bottom(&self, space: Address) -> Address {
        use crate::vm::TargetMemory;
        self.memory.read_address(space + SPACE_BOTTOM).unwrap()
    }

    pub fn set_space_top(&mut self, space: Address, top: Address) {
        self.write_address(space + SPACE_TOP, top);
    }

    pub fn set_space_used(&mut self, space: Address, used: usize) {
        let bottom = self.space_bottom(space);
        self.set_space_top(space, bottom + used);
    }

    fn write_reserved(&mut self, gen: Address, start: Address, bytes: usize) {
        let region = gen + GEN_RESERVED;
        self.write_address(region + MR_START, start);
        self.write(
            region + MR_WORD_SIZE,
            conversions::raw_align_up(bytes, BYTES_IN_WORD) / BYTES_IN_WORD,
        );
    }

    fn write_virtual_space(
        &mut self,
        gen: Address,
        low_boundary: Address,
        high_boundary: Address,
        committed: usize,
    ) {
        let vs = gen + GEN_VIRTUAL_SPACE;
        self.write_address(vs + VS_LOW_BOUNDARY, low_boundary);
        self.write_address(vs + VS_HIGH_BOUNDARY, high_boundary);
        self.write_address(vs + VS_LOW, low_boundary);
        self.write_address(vs + VS_HIGH, low_boundary + committed);
    }

    /// A young generation with eden, from and to laid out back to back, fully committed.
    pub fn add_def_new(&mut self, eden: SpaceState, from: SpaceState, to: SpaceState) -> FakeDefNew {
        let total = eden.capacity + from.capacity + to.capacity;
        let bottom = self.alloc_data(total);
        let eden_space = self.add_space_at(bottom, eden);
        let from_space = self.add_space_at(bottom + eden.capacity, from);
        let to_space = self.add_space_at(bottom + eden.capacity + from.capacity, to);

        let addr = self.alloc_object();
        self.write_reserved(addr, bottom, total);
        self.write_virtual_space(addr, bottom, bottom + total, total);
        self.write_address(addr + DEF_NEW_EDEN, eden_space);
        self.write_address(addr + DEF_NEW_FROM, from_space);
        self.write_address(addr + DEF_NEW_TO, to_space);
        FakeDefNew {
            addr,
            eden: eden_space,
            from: from_space,
            to: to_space,
        }
    }

    /// Flip the survivor roles the way a scavenge does.
    pub fn swap_survivors(&mut self, gen: &mut FakeDefNew) {
        std::mem::swap(&mut gen.from, &mut gen.to);
        self.write_address(gen.addr + DEF_NEW_FROM, gen.from);
        self.write_address(gen.addr + DEF_NEW_TO, gen.to);
    }

    /// An old generation whose space commits `the_space.capacity` bytes of a reservation
    /// that is `uncommitted` bytes larger.
    pub fn add_tenured(&mut self, the_space: SpaceState, uncommitted: usize) -> FakeTenured {
        let reserved = the_space.capacity + uncommitted;
        let bottom = self.alloc_data(reserved);
        let space_addr = self.add_space_at(bottom, the_space);

        let addr = self.alloc_object();
        self.write_reserved(addr, bottom, reserved);
        self.write_virtual_space(addr, bottom, bottom + reserved, the_space.capacity);
        self.write_address(addr + TENURED_THE_SPACE, space_addr);
        FakeTenured {
            addr,
            the_space: space_addr,
        }
    }

    /// A `GenCollectedHeap` pointing at the given generations.
    pub fn add_heap(&mut self, young: Address, old: Address) -> Address {
        let addr = self.alloc_object();
        self.write_address(addr + HEAP_YOUNG_GEN, young);
        self.write_address(addr + HEAP_OLD_GEN, old);
        addr
    }
}

/// A sink whose every write fails.
pub struct FailingSink;

impl io::Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
