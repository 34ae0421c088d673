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

// engine_invariants.rs
//
// End-to-end scenarios against the documented testable properties: life
// ordering, tie-break law, stale-producer clears, mispredict stalls, and
// idempotent reset.

use std::collections::VecDeque;

use procsim::engine::{Instruction, ProcessorSettings, Tomasulo};

fn settings(function_units_count: Vec<u16>, function_units_latency: Vec<u16>) -> ProcessorSettings {
    ProcessorSettings {
        result_bus_count: 1,
        fetch_rate: 1,
        function_units_count,
        function_units_latency,
        register_count: 32,
        ghr_bits: 2,
        ghr_init_val: 0,
        predictor_bits: 2,
        predictor_init_val: 0b01,
        predictor_table_size: 4,
    }
}

fn add(number: u64, address: u64, dst: i32, src1: i32, src2: i32) -> Instruction {
    Instruction::new(number, address, 0, dst, vec![src1, src2])
}

#[test]
fn life_stages_are_monotonically_increasing() {
    let mut engine = Tomasulo::new(settings(vec![1], vec![2]));
    let mut trace: VecDeque<Instruction> = vec![add(1, 0x0, -1, -1, -1), add(2, 0x4, -1, -1, -1)].into();
    engine.run(&mut trace);

    for instr in &trace {
        assert!(instr.life.fetch_cycle <= instr.life.dispatch_cycle);
        assert!(instr.life.dispatch_cycle <= instr.life.schedule_cycle);
        assert!(instr.life.schedule_cycle <= instr.life.execute_cycle);
        assert!(instr.life.execute_cycle < instr.life.state_update_cycle);
    }
}

#[test]
fn all_instructions_are_retired() {
    let mut engine = Tomasulo::new(settings(vec![2], vec![1]));
    let mut trace: VecDeque<Instruction> = (1..=10)
        .map(|n| add(n, (n - 1) * 4, -1, -1, -1))
        .collect();
    let count = trace.len();
    engine.run(&mut trace);

    assert_eq!(trace.len(), count);
    assert_eq!(engine.statistics().instr_retired, count as u64);
    assert_eq!(engine.statistics().instructions, count as u64);
}

#[test]
fn single_result_bus_retires_in_enter_cycle_then_tag_order() {
    // Two independent adds with identical latency both become retirable the
    // same cycle; the tie-break law picks the lower tag (earlier schedule
    // order) first.
    let mut engine = Tomasulo::new(settings(vec![2], vec![3]));
    let mut trace: VecDeque<Instruction> = vec![
        add(1, 0x0, 1, -1, -1),
        add(2, 0x4, 2, -1, -1),
    ]
    .into();
    engine.run(&mut trace);

    let first = trace.iter().find(|i| i.number == 1).unwrap();
    let second = trace.iter().find(|i| i.number == 2).unwrap();
    assert!(first.life.state_update_cycle <= second.life.state_update_cycle);
}

#[test]
fn dependent_instruction_waits_for_producer_broadcast() {
    let mut engine = Tomasulo::new(settings(vec![1], vec![3]));
    let mut trace: VecDeque<Instruction> = vec![
        add(1, 0x0, 1, -1, -1), // produces r1
        add(2, 0x4, 2, 1, -1),  // consumes r1
    ]
    .into();
    engine.run(&mut trace);

    let producer = trace.iter().find(|i| i.number == 1).unwrap();
    let consumer = trace.iter().find(|i| i.number == 2).unwrap();
    // The consumer can't fire (execute_cycle) before the producer's result
    // is visible, which happens the cycle after its broadcast.
    assert!(consumer.life.execute_cycle > producer.life.state_update_cycle);
}

#[test]
fn mispredicted_branch_stalls_further_dispatch_same_cycle() {
    let mut settings = settings(vec![1], vec![1]);
    settings.fetch_rate = 4;
    let mut engine = Tomasulo::new(settings);

    let branch = Instruction::new_branch(1, 0x0, 0, -1, vec![-1, -1], 0x100, true);
    let mut trace: VecDeque<Instruction> = vec![branch, add(2, 0x4, -1, -1, -1), add(3, 0x8, -1, -1, -1)].into();
    engine.run(&mut trace);

    let branch_instr = trace.iter().find(|i| i.number == 1).unwrap();
    let after = trace.iter().find(|i| i.number == 2).unwrap();
    // With a cold predictor initialized weakly-not-taken, a taken branch
    // mispredicts, so instruction 2 dispatches no earlier than the cycle
    // after the branch resolves.
    assert!(after.life.dispatch_cycle >= branch_instr.life.dispatch_cycle);
}

#[test]
fn reset_restores_fresh_state() {
    let mut engine = Tomasulo::new(settings(vec![1], vec![2]));
    let mut trace: VecDeque<Instruction> = vec![add(1, 0x0, -1, -1, -1)].into();
    engine.run(&mut trace);
    assert!(engine.statistics().clock_cycles > 0);

    engine.reset();
    assert_eq!(*engine.statistics(), Default::default());

    let mut second_trace: VecDeque<Instruction> = vec![add(1, 0x0, -1, -1, -1)].into();
    engine.run(&mut second_trace);
    assert_eq!(trace, second_trace);
}

#[test]
fn running_an_empty_trace_does_nothing() {
    let mut engine = Tomasulo::new(settings(vec![1], vec![1]));
    let mut trace: VecDeque<Instruction> = VecDeque::new();
    engine.run(&mut trace);
    assert!(trace.is_empty());
    assert_eq!(engine.statistics().clock_cycles, 0);
}
