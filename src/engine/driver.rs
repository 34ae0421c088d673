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

// driver.rs
//
// The Tomasulo pipeline driver: the per-cycle orchestrator. Advances
// instructions fetch -> dispatch -> schedule -> execute -> state-update ->
// retire, arbitrating function units and result buses and steering dispatch
// stalls off the gselect predictor. The nine-phase cycle order below is
// contractual (see module docs in lib.rs) -- reordering two phases changes
// observable output.

use std::collections::{HashMap, VecDeque};

use log::trace;

use super::predictor::{hash_address, Gselect};
use super::rat::RegisterAliasTable;
use super::station::{FunctionUnitBank, ReservationStation, ResultBusSlot};
use super::tag::TagAllocator;
use super::types::{ClockCycle, Instruction, ProcessorSettings, Statistics, Tag, NO_TAG};

pub struct Tomasulo {
    settings: ProcessorSettings,
    stats: Statistics,

    predictor: Gselect,
    register_file: RegisterAliasTable,
    tags: TagAllocator,

    /// Arena of every instruction ingested so far this run, indexed by
    /// `number - 1`. Doubles as the ingestion-ordered output once `run`
    /// returns.
    instructions: Vec<Instruction>,

    /// Arena of live reservation stations, keyed by `target_tag`.
    stations: HashMap<Tag, ReservationStation>,

    fetch_q: VecDeque<usize>,
    dispatch_q: VecDeque<usize>,
    /// Insertion-ordered list of live station tags.
    schedule_q: Vec<Tag>,
    function_units: Vec<FunctionUnitBank>,

    busy_result_buses: Vec<ResultBusSlot>,
    retire_buffer: Vec<ResultBusSlot>,

    schedule_q_limit: usize,
    current_clock: ClockCycle,
    /// Number of the dispatched-but-unresolved mispredicted branch, if any.
    bad_branch_instr: Option<u64>,
}

impl Tomasulo {
    pub fn new(settings: ProcessorSettings) -> Self {
        let predictor = Self::build_predictor(&settings);
        let register_file = RegisterAliasTable::new(settings.register_count as usize);
        let function_units = Self::build_banks(&settings);
        let schedule_q_limit = Self::schedule_q_limit(&settings);

        Self {
            settings,
            stats: Statistics::default(),
            predictor,
            register_file,
            tags: TagAllocator::new(),
            instructions: Vec::new(),
            stations: HashMap::new(),
            fetch_q: VecDeque::new(),
            dispatch_q: VecDeque::new(),
            schedule_q: Vec::new(),
            function_units,
            busy_result_buses: Vec::new(),
            retire_buffer: Vec::new(),
            schedule_q_limit,
            current_clock: 0,
            bad_branch_instr: None,
        }
    }

    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Resets all mutable engine state to the condition a freshly
    /// constructed `Tomasulo` with the same settings would have.
    pub fn reset(&mut self) {
        self.stats = Statistics::default();
        self.current_clock = 0;
        self.tags.reset();
        self.predictor = Self::build_predictor(&self.settings);
        self.register_file = RegisterAliasTable::new(self.settings.register_count as usize);
        self.instructions.clear();
        self.stations.clear();
        self.fetch_q.clear();
        self.dispatch_q.clear();
        self.schedule_q.clear();
        self.function_units = Self::build_banks(&self.settings);
        self.busy_result_buses.clear();
        self.retire_buffer.clear();
        self.bad_branch_instr = None;
    }

    fn build_predictor(settings: &ProcessorSettings) -> Gselect {
        Gselect::new(
            settings.ghr_bits,
            settings.ghr_init_val,
            settings.predictor_bits,
            settings.predictor_init_val,
            settings.predictor_table_size,
        )
    }

    fn build_banks(settings: &ProcessorSettings) -> Vec<FunctionUnitBank> {
        settings
            .function_units_count
            .iter()
            .zip(settings.function_units_latency.iter())
            .map(|(&count, &latency)| FunctionUnitBank::new(count as usize, latency))
            .collect()
    }

    fn schedule_q_limit(settings: &ProcessorSettings) -> usize {
        2 * settings
            .function_units_count
            .iter()
            .map(|&c| c as usize)
            .sum::<usize>()
    }

    /// Runs the pipeline to completion over `trace`, which is consumed and
    /// replaced with the ingestion-ordered sequence of instructions, each
    /// carrying its populated `life`.
    pub fn run(&mut self, trace: &mut VecDeque<Instruction>) {
        while !trace.is_empty() || !self.pipeline_is_empty() {
            self.current_clock += 1;
            trace!("cycle {} begin", self.current_clock);

            self.update_state();
            std::mem::swap(&mut self.busy_result_buses, &mut self.retire_buffer);

            self.retire_instructions();
            self.fire_instructions();
            self.schedule_instructions();
            self.dispatch_instructions();
            self.fetch_instructions(trace);

            self.sweep_retirement_buffer();

            self.stats.clock_cycles += 1;
        }

        // Correct the off-by-one introduced by the final drain cycle. An
        // empty trace never enters the loop above, so there is no trailing
        // cycle to undo -- guard against underflow on the u64 counters.
        if self.stats.clock_cycles > 0 {
            self.current_clock -= 1;
            self.stats.clock_cycles -= 1;
        }

        trace.extend(self.instructions.drain(..));
    }

    fn pipeline_is_empty(&self) -> bool {
        self.fetch_q.is_empty()
            && self.dispatch_q.is_empty()
            && self.schedule_q.is_empty()
            && self.busy_result_buses.is_empty()
    }

    // -- Phase 2: updateState -------------------------------------------

    fn update_state(&mut self) {
        for bus in &self.busy_result_buses {
            self.register_file.clear_if_matches(bus.reg, bus.tag);

            for &tag in &self.schedule_q {
                let station = self
                    .stations
                    .get_mut(&tag)
                    .expect("schedule_q tag must have a live station");
                for i in 0..station.source_tags.len() {
                    if station.source_tags[i] == bus.tag {
                        station.sources_ready[i] = true;
                    }
                }
            }
        }
    }

    // -- Phase 4: retireInstructions --------------------------------------

    fn retire_instructions(&mut self) {
        debug_assert!(
            self.busy_result_buses.is_empty(),
            "busy_result_buses must be empty before retire (guaranteed by the prior swap)"
        );

        let mut retirable: Vec<(ClockCycle, Tag, usize)> = Vec::new();
        for (bank_idx, bank) in self.function_units.iter().enumerate() {
            for entry in &bank.entries {
                if entry.is_retirable_at(self.current_clock) {
                    retirable.push((entry.enter_cycle, entry.station_tag, bank_idx));
                }
            }
        }
        // Tie-break law: (enter_cycle ASC, target_tag ASC).
        retirable.sort_by_key(|&(enter_cycle, tag, _)| (enter_cycle, tag));

        let winners: Vec<(Tag, usize)> = retirable
            .into_iter()
            .take(self.settings.result_bus_count as usize)
            .map(|(_, tag, bank_idx)| (tag, bank_idx))
            .collect();

        for (tag, bank_idx) in winners {
            let instr_index = self.stations.get(&tag).expect("winning station must exist").instr_index;

            let dst_reg = self.instructions[instr_index].dst_reg;
            self.busy_result_buses.push(ResultBusSlot { reg: dst_reg, tag });
            self.instructions[instr_index].life.state_update_cycle = self.current_clock;

            let bank = &mut self.function_units[bank_idx];
            let pos = bank
                .entries
                .iter()
                .position(|e| e.station_tag == tag)
                .expect("retiring unit must exist in its bank");
            bank.entries.remove(pos);

            self.stats.instr_executed += 1;

            let instr = &self.instructions[instr_index];
            if instr.is_branch {
                self.predictor
                    .update(hash_address(instr.address), instr.branch_taken);

                if self.bad_branch_instr == Some(instr.number) {
                    self.bad_branch_instr = None;
                }
            }
        }
    }

    // -- Phase 5: fireInstructions -----------------------------------------

    fn fire_instructions(&mut self) {
        for &tag in &self.schedule_q {
            let (fired, bank_idx, all_ready, instr_index) = {
                let station = &self.stations[&tag];
                let instr_index = station.instr_index;
                let bank_idx = self.instructions[instr_index].func_type as usize;
                (station.fired, bank_idx, station.all_sources_ready(), instr_index)
            };

            if fired {
                continue;
            }
            if !self.function_units[bank_idx].has_room() {
                continue;
            }
            if !all_ready {
                continue;
            }

            let latency = self.function_units[bank_idx].latency;
            self.function_units[bank_idx]
                .entries
                .push(super::station::FunctionUnitEntry {
                    latency,
                    enter_cycle: self.current_clock,
                    station_tag: tag,
                });

            self.stations.get_mut(&tag).unwrap().fired = true;
            self.instructions[instr_index].life.execute_cycle = self.current_clock;
            self.stats.instr_fired += 1;
        }
    }

    // -- Phase 6: scheduleInstructions --------------------------------------

    fn schedule_instructions(&mut self) {
        while self.schedule_q.len() < self.schedule_q_limit && !self.dispatch_q.is_empty() {
            let instr_index = self.dispatch_q.pop_front().unwrap();
            self.instructions[instr_index].life.schedule_cycle = self.current_clock;

            // Read sources first: a self-referencing destination must see
            // the *prior* producer, not the tag we're about to allocate.
            let mut source_tags = Vec::with_capacity(self.instructions[instr_index].src_regs.len());
            let mut sources_ready = Vec::with_capacity(source_tags.capacity());
            for i in 0..self.instructions[instr_index].src_regs.len() {
                let src_reg = self.instructions[instr_index].src_regs[i];
                let producer = self.register_file.tag_of(src_reg);
                if src_reg < 0 || producer == NO_TAG {
                    source_tags.push(NO_TAG);
                    sources_ready.push(true);
                } else {
                    source_tags.push(producer);
                    sources_ready.push(false);
                }
            }

            let target_tag = self.tags.new_tag();
            let dst_reg = self.instructions[instr_index].dst_reg;
            if dst_reg >= 0 {
                self.register_file.set_producer(dst_reg, target_tag);
            }

            self.stations.insert(
                target_tag,
                ReservationStation {
                    fired: false,
                    target_tag,
                    source_tags,
                    sources_ready,
                    instr_index,
                },
            );
            self.schedule_q.push(target_tag);

            self.stats.instr_scheduled += 1;
        }
    }

    // -- Phase 7: dispatchInstructions ---------------------------------------

    fn dispatch_instructions(&mut self) {
        for _ in 0..self.settings.fetch_rate {
            if self.bad_branch_instr.is_some() || self.fetch_q.is_empty() {
                break;
            }
            let instr_index = self.fetch_q.pop_front().unwrap();
            self.instructions[instr_index].life.dispatch_cycle = self.current_clock;

            if self.instructions[instr_index].is_branch {
                self.stats.branches += 1;

                let address = self.instructions[instr_index].address;
                let branch_taken = self.instructions[instr_index].branch_taken;
                let predicted = self.predictor.predict(hash_address(address));

                if predicted != branch_taken {
                    self.bad_branch_instr = Some(self.instructions[instr_index].number);
                } else {
                    self.stats.correct_branches += 1;
                }
            }

            self.dispatch_q.push_back(instr_index);
            self.stats.instr_dispatched += 1;
        }

        let dispatch_size = self.dispatch_q.len() as u64;
        self.stats.peak_dispatch_size = self.stats.peak_dispatch_size.max(dispatch_size);
        self.stats.dispatch_size_sum += dispatch_size;
    }

    // -- Phase 8: fetchInstructions ------------------------------------------

    fn fetch_instructions(&mut self, trace: &mut VecDeque<Instruction>) {
        for _ in 0..self.settings.fetch_rate {
            let Some(mut instr) = trace.pop_front() else {
                break;
            };
            instr.life.fetch_cycle = self.current_clock;

            let instr_index = self.instructions.len();
            self.instructions.push(instr);
            self.fetch_q.push_back(instr_index);

            self.stats.instructions += 1;
        }
    }

    // -- Phase 9: sweepRetirementBuffer --------------------------------------

    fn sweep_retirement_buffer(&mut self) {
        for bus in self.retire_buffer.drain(..) {
            let pos = self
                .schedule_q
                .iter()
                .position(|&tag| tag == bus.tag)
                .expect("a swept station must exist in schedule_q");
            self.schedule_q.remove(pos);
            self.stations.remove(&bus.tag);

            self.stats.instr_retired += 1;
        }
    }
}
