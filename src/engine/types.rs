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

// types.rs
//
// Data model shared by the whole engine: the architectural register number
// type, the dynamic-producer tag type, the per-instruction life record, the
// instruction itself, processor settings, and run statistics.

use serde::{Deserialize, Serialize};

/// Architectural register index. Negative means "no register" / "not used".
pub type RegNo = i32;

/// Cycle counter.
pub type ClockCycle = u64;

/// Identifies a dynamic instance of an instruction's result. `0` and
/// negative values are reserved; `-1` conventionally means "none / ready".
pub type Tag = i64;

pub const NO_TAG: Tag = -1;

/// The cycle at which an instruction entered each of the five pipeline
/// stages. Populated once per field, in stage order, by the engine; read
/// externally once `Tomasulo::run` returns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionLife {
    pub fetch_cycle: ClockCycle,
    pub dispatch_cycle: ClockCycle,
    pub schedule_cycle: ClockCycle,
    pub execute_cycle: ClockCycle,
    pub state_update_cycle: ClockCycle,
}

/// A single dynamic instruction instance flowing through the pipeline.
///
/// Everything but `life` is immutable once the instruction is ingested;
/// `life` is written exactly once per field as the instruction advances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// 1-based ingestion index (order the trace was read in).
    pub number: u64,

    pub address: u64,
    /// Selects a function-unit bank. A trace value of `-1` is normalized to
    /// `1` at ingestion (spec: func_type == -1 means func_type = 1).
    pub func_type: i32,

    /// `-1` means "no destination register".
    pub dst_reg: RegNo,
    /// Source register operands; a negative entry is not a real dependency.
    pub src_regs: Vec<RegNo>,

    pub is_branch: bool,
    pub branch_taken: bool,
    pub branch_address: u64,

    pub life: InstructionLife,
}

impl Instruction {
    /// Construct a non-branch instruction. `func_type == -1` normalizes to
    /// `1`, matching the original trace-ingestion convention.
    pub fn new(number: u64, address: u64, func_type: i32, dst_reg: RegNo, src_regs: Vec<RegNo>) -> Self {
        Self {
            number,
            address,
            func_type: if func_type == -1 { 1 } else { func_type },
            dst_reg,
            src_regs,
            is_branch: false,
            branch_taken: false,
            branch_address: 0,
            life: InstructionLife::default(),
        }
    }

    /// Construct a branch instruction.
    pub fn new_branch(
        number: u64,
        address: u64,
        func_type: i32,
        dst_reg: RegNo,
        src_regs: Vec<RegNo>,
        branch_address: u64,
        branch_taken: bool,
    ) -> Self {
        let mut instr = Self::new(number, address, func_type, dst_reg, src_regs);
        instr.is_branch = true;
        instr.branch_taken = branch_taken;
        instr.branch_address = branch_address;
        instr
    }
}

/// Settings the engine is configured with. Every field here is named and
/// governed exactly as in the settings schema (engine README / spec).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorSettings {
    /// Max retires (result-bus broadcasts) per cycle.
    pub result_bus_count: u64,
    /// Max fetches AND max dispatches per cycle.
    pub fetch_rate: u64,

    /// Capacity of function-unit bank `k`.
    pub function_units_count: Vec<u16>,
    /// Cycles from fire to retirable in bank `k`.
    pub function_units_latency: Vec<u16>,

    /// Length of the register alias table.
    pub register_count: u64,

    /// Global history register width, in bits.
    pub ghr_bits: u32,
    /// Initial GHR value, masked to `ghr_bits`.
    pub ghr_init_val: u64,
    /// Saturating-counter width, in bits.
    pub predictor_bits: u32,
    /// Initial counter value, masked to `predictor_bits`.
    pub predictor_init_val: u64,
    /// Rows in the gselect predictor table.
    pub predictor_table_size: usize,
}

/// Aggregate statistics populated over the course of a `run`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub instructions: u64,
    pub clock_cycles: ClockCycle,

    pub instr_dispatched: u64,
    pub instr_scheduled: u64,
    pub instr_fired: u64,
    pub instr_executed: u64,
    pub instr_retired: u64,

    pub peak_dispatch_size: u64,
    pub dispatch_size_sum: u64,

    pub branches: u64,
    pub correct_branches: u64,
}
