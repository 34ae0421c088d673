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

// report.rs
//
// Renders a completed run: one row per instruction's life, plus the
// aggregate statistics block, in text, CSV, or JSON.

use std::fmt::Write as _;

use colored::Colorize;

use crate::engine::{Instruction, Statistics};
use crate::shell::cli::ReportFormat;

pub fn render_lives(instructions: &[Instruction], format: ReportFormat) -> String {
    match format {
        ReportFormat::Text => render_lives_text(instructions),
        ReportFormat::Csv => render_lives_csv(instructions),
        ReportFormat::Json => serde_json::to_string_pretty(instructions).expect("Instruction serializes"),
    }
}

pub fn render_statistics(stats: &Statistics, format: ReportFormat) -> String {
    match format {
        ReportFormat::Text => render_statistics_text(stats),
        ReportFormat::Csv => render_statistics_csv(stats),
        ReportFormat::Json => serde_json::to_string_pretty(stats).expect("Statistics serializes"),
    }
}

fn render_lives_text(instructions: &[Instruction]) -> String {
    let mut out = String::new();
    let header = format!(
        "{:>6} {:>10} {:>7} {:>9} {:>9} {:>8} {:>8}",
        "instr", "address", "fetch", "dispatch", "schedule", "execute", "retire"
    );
    let _ = writeln!(out, "{}", header.bold());

    for instr in instructions {
        let row = format!(
            "{:>6} {:>#10x} {:>7} {:>9} {:>9} {:>8} {:>8}",
            instr.number,
            instr.address,
            instr.life.fetch_cycle,
            instr.life.dispatch_cycle,
            instr.life.schedule_cycle,
            instr.life.execute_cycle,
            instr.life.state_update_cycle,
        );
        if instr.is_branch {
            let _ = writeln!(out, "{}", row.cyan());
        } else {
            let _ = writeln!(out, "{}", row);
        }
    }
    out
}

fn render_lives_csv(instructions: &[Instruction]) -> String {
    let mut out = String::from("number,address,fetch,dispatch,schedule,execute,retire\n");
    for instr in instructions {
        let _ = writeln!(
            out,
            "{},{:#x},{},{},{},{},{}",
            instr.number,
            instr.address,
            instr.life.fetch_cycle,
            instr.life.dispatch_cycle,
            instr.life.schedule_cycle,
            instr.life.execute_cycle,
            instr.life.state_update_cycle,
        );
    }
    out
}

fn render_statistics_text(stats: &Statistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "simulation statistics".bold().green());
    let _ = writeln!(out, "  instructions:        {}", stats.instructions);
    let _ = writeln!(out, "  clock cycles:        {}", stats.clock_cycles);
    let _ = writeln!(out, "  dispatched:          {}", stats.instr_dispatched);
    let _ = writeln!(out, "  scheduled:           {}", stats.instr_scheduled);
    let _ = writeln!(out, "  fired:               {}", stats.instr_fired);
    let _ = writeln!(out, "  executed:            {}", stats.instr_executed);
    let _ = writeln!(out, "  retired:             {}", stats.instr_retired);
    let _ = writeln!(out, "  peak dispatch width: {}", stats.peak_dispatch_size);
    if stats.clock_cycles > 0 {
        let avg_dispatch = stats.dispatch_size_sum as f64 / stats.clock_cycles as f64;
        let avg_fired = stats.instr_fired as f64 / stats.clock_cycles as f64;
        let avg_retired = stats.instr_retired as f64 / stats.clock_cycles as f64;
        let ipc = stats.instructions as f64 / stats.clock_cycles as f64;
        let _ = writeln!(out, "  avg dispatch width:  {:.3}", avg_dispatch);
        let _ = writeln!(out, "  avg fired/cycle:     {:.3}", avg_fired);
        let _ = writeln!(out, "  avg retired/cycle:   {:.3}", avg_retired);
        let _ = writeln!(out, "  IPC:                 {:.3}", ipc);
    }
    if stats.branches > 0 {
        let accuracy = stats.correct_branches as f64 / stats.branches as f64 * 100.0;
        let _ = writeln!(out, "  branches:            {}", stats.branches);
        let _ = writeln!(out, "  correct branches:    {}", stats.correct_branches);
        let _ = writeln!(out, "  prediction accuracy: {:.2}%", accuracy);
    }
    out
}

fn render_statistics_csv(stats: &Statistics) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "instructions,clock_cycles,dispatched,scheduled,fired,executed,retired,peak_dispatch,branches,correct_branches"
    );
    let _ = writeln!(
        out,
        "{},{},{},{},{},{},{},{},{},{}",
        stats.instructions,
        stats.clock_cycles,
        stats.instr_dispatched,
        stats.instr_scheduled,
        stats.instr_fired,
        stats.instr_executed,
        stats.instr_retired,
        stats.peak_dispatch_size,
        stats.branches,
        stats.correct_branches,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Instruction;

    #[test]
    fn text_report_has_header_and_one_row_per_instruction() {
        let instructions = vec![
            Instruction::new(1, 0x100, 0, 1, vec![2, 3]),
            Instruction::new(2, 0x104, 0, 4, vec![1, 5]),
        ];
        let text = render_lives_text(&instructions);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn csv_report_round_trips_field_count() {
        let instructions = vec![Instruction::new(1, 0x100, 0, 1, vec![2, 3])];
        let csv = render_lives_csv(&instructions);
        let data_line = csv.lines().nth(1).unwrap();
        assert_eq!(data_line.split(',').count(), 7);
    }

    #[test]
    fn json_report_is_parseable() {
        let instructions = vec![Instruction::new(1, 0x100, 0, 1, vec![2, 3])];
        let json = render_lives(&instructions, ReportFormat::Json);
        let parsed: Vec<Instruction> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn statistics_text_includes_ipc_when_cycles_elapsed() {
        let stats = Statistics {
            instructions: 10,
            clock_cycles: 5,
            ..Statistics::default()
        };
        let text = render_statistics_text(&stats);
        assert!(text.contains("IPC"));
    }

    #[test]
    fn statistics_text_includes_avg_fired_and_retired_per_cycle() {
        let stats = Statistics {
            instructions: 10,
            clock_cycles: 5,
            instr_fired: 10,
            instr_retired: 10,
            ..Statistics::default()
        };
        let text = render_statistics_text(&stats);
        assert!(text.contains("avg fired/cycle:     2.000"));
        assert!(text.contains("avg retired/cycle:   2.000"));
    }
}
