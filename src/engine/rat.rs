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

// rat.rs
//
// Register alias table: a dense array of tag slots, one per architectural
// register. A slot holds the tag of its in-flight producer, or NO_TAG if
// the value is resident in the (unmodeled) register file.

use super::types::{RegNo, Tag, NO_TAG};

#[derive(Debug, Clone)]
pub struct RegisterAliasTable {
    slots: Vec<Tag>,
}

impl RegisterAliasTable {
    pub fn new(register_count: usize) -> Self {
        Self {
            slots: vec![NO_TAG; register_count],
        }
    }

    pub fn tag_of(&self, reg: RegNo) -> Tag {
        if reg < 0 {
            NO_TAG
        } else {
            self.slots[reg as usize]
        }
    }

    /// Overwrites the destination slot unconditionally — the newest
    /// producer of a register always owns it.
    pub fn set_producer(&mut self, reg: RegNo, tag: Tag) {
        if reg >= 0 {
            self.slots[reg as usize] = tag;
        }
    }

    /// Clears the slot only if it still names `tag` (stale-producer guard):
    /// a result bus from an earlier, overwritten producer must not clobber
    /// a later producer's claim on the register.
    pub fn clear_if_matches(&mut self, reg: RegNo, tag: Tag) {
        if reg >= 0 && self.slots[reg as usize] == tag {
            self.slots[reg as usize] = NO_TAG;
        }
    }

    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = NO_TAG);
    }
}
