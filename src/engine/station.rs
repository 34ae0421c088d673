// Copyright (c) 2024 Mudit Bhargava
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//

// station.rs
//
// The scheduling window and execution resources: reservation stations,
// function-unit banks, and result-bus slots.
//
// Reservation stations are referenced from the schedule queue, a
// function-unit bank, and a result bus at once, and the sweep phase must
// drop the exact station a bus came from. Rather than threading `Rc`
// handles through all three, stations live in a `Tag`-keyed arena
// (`Tomasulo::stations`): a station's `target_tag` is allocated once, is
// unique for the station's lifetime, and never collides with another live
// station's tag, so it doubles as a stable identity -- the arena key and
// the wakeup key are the same value.

use super::types::{ClockCycle, RegNo, Tag};

/// A reservation station: one in-flight instruction awaiting its sources.
pub struct ReservationStation {
    pub fired: bool,
    pub target_tag: Tag,
    pub source_tags: Vec<Tag>,
    pub sources_ready: Vec<bool>,
    /// Index into the engine's instruction arena.
    pub instr_index: usize,
}

impl ReservationStation {
    pub fn all_sources_ready(&self) -> bool {
        self.sources_ready.iter().all(|ready| *ready)
    }
}

/// A unit currently occupying a function-unit bank slot.
pub struct FunctionUnitEntry {
    pub latency: u16,
    pub enter_cycle: ClockCycle,
    pub station_tag: Tag,
}

impl FunctionUnitEntry {
    pub fn is_retirable_at(&self, cycle: ClockCycle) -> bool {
        cycle - self.enter_cycle >= self.latency as u64
    }
}

/// One of the `K` banks of identical-latency function units. Capacity is
/// `function_units_count[bank]`; firing into a full bank is a no-op stall,
/// never an error.
pub struct FunctionUnitBank {
    pub capacity: usize,
    pub latency: u16,
    pub entries: Vec<FunctionUnitEntry>,
}

impl FunctionUnitBank {
    pub fn new(capacity: usize, latency: u16) -> Self {
        Self {
            capacity,
            latency,
            entries: Vec::new(),
        }
    }

    pub fn has_room(&self) -> bool {
        self.entries.len() < self.capacity
    }
}

/// A populated result-bus slot: one producer's tag and destination
/// register, broadcast to every waiting consumer in the cycle it's
/// created. `tag` alone identifies the producing station in the arena, so
/// no separate station handle is carried here.
#[derive(Clone, Copy)]
pub struct ResultBusSlot {
    pub reg: RegNo,
    pub tag: Tag,
}
