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

// predictor.rs
//
// Gselect dynamic branch predictor: a global history register indexes into
// a per-address row of saturating counters. `predict` is pure; `update`
// mutates the counter the prediction was read from, then advances the GHR.

/// Two-level gselect predictor.
pub struct Gselect {
    ghr_bits: u32,
    ghr_val: u64,
    pred_bits: u32,
    pred_vals: Vec<Vec<u64>>,
}

impl Gselect {
    /// `ghr_bits`/`pred_bits` must be in `1..=31` (a caller-enforced
    /// precondition; the engine does not itself re-validate settings).
    pub fn new(
        ghr_bits: u32,
        ghr_init_val: u64,
        pred_bits: u32,
        pred_init_val: u64,
        pred_table_size: usize,
    ) -> Self {
        let ghr_mask = (1u64 << ghr_bits) - 1;
        let pred_mask = (1u64 << pred_bits) - 1;
        let num_preds = 1usize << ghr_bits;

        let pred_vals = vec![vec![pred_init_val & pred_mask; num_preds]; pred_table_size];

        Self {
            ghr_bits,
            ghr_val: ghr_init_val & ghr_mask,
            pred_bits,
            pred_vals,
        }
    }

    /// Predict a direction for `hash`. Does not mutate predictor state.
    pub fn predict(&self, hash: u64) -> bool {
        let row = (hash as usize) % self.pred_vals.len();
        let counter = self.pred_vals[row][self.ghr_val as usize];
        counter >= (1u64 << (self.pred_bits - 1))
    }

    /// Record the resolved outcome for `hash` at the `(row, ghr)` cell that
    /// `predict` would have read, then shift the GHR.
    pub fn update(&mut self, hash: u64, taken: bool) {
        let row = (hash as usize) % self.pred_vals.len();
        let max_val = (1u64 << self.pred_bits) - 1;
        let counter = &mut self.pred_vals[row][self.ghr_val as usize];

        if taken && *counter < max_val {
            *counter += 1;
        } else if !taken && *counter > 0 {
            *counter -= 1;
        }

        let ghr_mask = (1u64 << self.ghr_bits) - 1;
        self.ghr_val = ((self.ghr_val << 1) | (taken as u64)) & ghr_mask;
    }
}

/// `hash(address) = address >> 2`. Used identically for predict and update
/// lookups so that repeated branches at the same address land in the same
/// predictor cell.
pub fn hash_address(address: u64) -> u64 {
    address >> 2
}
