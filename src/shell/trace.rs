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

// trace.rs
//
// Parses the line-oriented trace format external tools feed this simulator:
//   addr_hex func_type_dec dst_dec src1_dec src2_dec [branch_target_hex branch_taken_01]
// A 5-field line is non-branch; a 7-field line is a branch.

use std::collections::VecDeque;
use std::io::BufRead;

use log::debug;

use crate::engine::Instruction;
use crate::errors::ShellError;

/// Parses every line of `reader` into an ingestion-ordered queue of
/// instructions. 1-based `number`s are assigned in read order.
pub fn parse_trace<R: BufRead>(reader: R) -> Result<VecDeque<Instruction>, ShellError> {
    let mut instructions = VecDeque::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let instr = parse_line(trimmed, (instructions.len() + 1) as u64).ok_or_else(|| ShellError::Trace {
            line: line_no + 1,
            text: line.clone(),
        })?;
        instructions.push_back(instr);
    }

    debug!("parsed {} instructions from trace", instructions.len());
    Ok(instructions)
}

fn parse_line(line: &str, number: u64) -> Option<Instruction> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 5 && fields.len() != 7 {
        return None;
    }

    let address = u64::from_str_radix(fields[0].trim_start_matches("0x"), 16).ok()?;
    let func_type: i32 = fields[1].parse().ok()?;
    let dst_reg: i32 = fields[2].parse().ok()?;
    let src1: i32 = fields[3].parse().ok()?;
    let src2: i32 = fields[4].parse().ok()?;

    if fields.len() == 7 {
        let branch_address = u64::from_str_radix(fields[5].trim_start_matches("0x"), 16).ok()?;
        let branch_taken = match fields[6] {
            "0" => false,
            "1" => true,
            _ => return None,
        };
        Some(Instruction::new_branch(
            number,
            address,
            func_type,
            dst_reg,
            vec![src1, src2],
            branch_address,
            branch_taken,
        ))
    } else {
        Some(Instruction::new(number, address, func_type, dst_reg, vec![src1, src2]))
    }
}
