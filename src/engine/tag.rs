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

// tag.rs
//
// Monotonic tag allocator. Tags identify a dynamic producer and are the
// sole identity used by wakeup matching, so the same value must never be
// live for two in-flight producers at once; a 64-bit counter makes
// wraparound unreachable for any trace this simulator could run in a human
// lifetime, while still resetting the way the reference implementation does.

use super::types::Tag;

pub struct TagAllocator {
    current_tag: Tag,
}

impl TagAllocator {
    pub fn new() -> Self {
        Self { current_tag: 1 }
    }

    /// Returns the current tag, then advances it. Wraps back to 1 at
    /// `Tag::MAX` without ever returning a non-positive tag.
    pub fn new_tag(&mut self) -> Tag {
        let tag = self.current_tag;
        self.current_tag = if self.current_tag == Tag::MAX {
            1
        } else {
            self.current_tag + 1
        };
        tag
    }

    pub fn reset(&mut self) {
        self.current_tag = 1;
    }
}

impl Default for TagAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_increasing_positive_tags() {
        let mut alloc = TagAllocator::new();
        assert_eq!(alloc.new_tag(), 1);
        assert_eq!(alloc.new_tag(), 2);
        assert_eq!(alloc.new_tag(), 3);
    }

    #[test]
    fn wraps_to_one_skipping_zero() {
        let mut alloc = TagAllocator { current_tag: Tag::MAX };
        assert_eq!(alloc.new_tag(), Tag::MAX);
        assert_eq!(alloc.new_tag(), 1);
    }

    #[test]
    fn reset_restarts_at_one() {
        let mut alloc = TagAllocator::new();
        alloc.new_tag();
        alloc.new_tag();
        alloc.reset();
        assert_eq!(alloc.new_tag(), 1);
    }
}
