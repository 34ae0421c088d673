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

// cli.rs
//
// Command-line surface and settings resolution. Settings come from defaults,
// optionally overridden wholesale by a JSON config file, then validated once
// before the engine ever sees them.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::engine::ProcessorSettings;
use crate::errors::ShellError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Csv,
    Json,
}

/// A cycle-accurate out-of-order pipeline simulator built on Tomasulo's
/// algorithm with gselect branch prediction.
#[derive(Parser, Debug)]
#[command(name = "procsim", version, about)]
pub struct Cli {
    /// Path to the instruction trace file.
    pub trace: PathBuf,

    /// Load processor settings from a JSON file, overriding all defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Result buses per cycle (max retires/cycle).
    #[arg(long, default_value_t = 1)]
    pub result_bus_count: u64,

    /// Max fetches and dispatches per cycle.
    #[arg(long, default_value_t = 4)]
    pub fetch_rate: u64,

    /// Architectural register count.
    #[arg(long, default_value_t = 128)]
    pub register_count: u64,

    /// Global history register width, in bits.
    #[arg(long, default_value_t = 3)]
    pub ghr_bits: u32,

    /// Initial GHR value.
    #[arg(long, default_value_t = 0)]
    pub ghr_init_val: u64,

    /// Saturating-counter width, in bits.
    #[arg(long, default_value_t = 2)]
    pub predictor_bits: u32,

    /// Initial saturating-counter value (0b01 = weakly not-taken).
    #[arg(long, default_value_t = 0b01)]
    pub predictor_init_val: u64,

    /// Rows in the gselect predictor table.
    #[arg(long, default_value_t = 128)]
    pub predictor_table_size: usize,

    /// Report output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

impl Cli {
    /// Resolve final `ProcessorSettings`: CLI/default values, wholesale
    /// overridden by `--config` if given, then validated.
    pub fn resolve_settings(&self) -> Result<ProcessorSettings, ShellError> {
        let settings = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                serde_json::from_str(&text)?
            },
            None => ProcessorSettings {
                result_bus_count: self.result_bus_count,
                fetch_rate: self.fetch_rate,
                function_units_count: vec![1, 1, 1],
                function_units_latency: vec![1, 2, 4],
                register_count: self.register_count,
                ghr_bits: self.ghr_bits,
                ghr_init_val: self.ghr_init_val,
                predictor_bits: self.predictor_bits,
                predictor_init_val: self.predictor_init_val,
                predictor_table_size: self.predictor_table_size,
            },
        };

        validate_settings(&settings)?;
        Ok(settings)
    }
}

fn validate_settings(settings: &ProcessorSettings) -> Result<(), ShellError> {
    if settings.result_bus_count == 0 {
        return Err(ShellError::InvalidSettings("result_bus_count must be nonzero".into()));
    }
    if settings.fetch_rate == 0 {
        return Err(ShellError::InvalidSettings("fetch_rate must be nonzero".into()));
    }
    if settings.function_units_count.len() != settings.function_units_latency.len() {
        return Err(ShellError::InvalidSettings(
            "function_units_count and function_units_latency must have the same length".into(),
        ));
    }
    if settings.function_units_count.is_empty() {
        return Err(ShellError::InvalidSettings("at least one function unit bank is required".into()));
    }
    if settings.register_count == 0 {
        return Err(ShellError::InvalidSettings("register_count must be nonzero".into()));
    }
    if !(1..=31).contains(&settings.ghr_bits) {
        return Err(ShellError::InvalidSettings("ghr_bits must be between 1 and 31".into()));
    }
    if !(1..=31).contains(&settings.predictor_bits) {
        return Err(ShellError::InvalidSettings("predictor_bits must be between 1 and 31".into()));
    }
    if settings.predictor_table_size == 0 {
        return Err(ShellError::InvalidSettings("predictor_table_size must be nonzero".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> ProcessorSettings {
        ProcessorSettings {
            result_bus_count: 1,
            fetch_rate: 4,
            function_units_count: vec![1, 1],
            function_units_latency: vec![1, 2],
            register_count: 32,
            ghr_bits: 3,
            ghr_init_val: 0,
            predictor_bits: 2,
            predictor_init_val: 1,
            predictor_table_size: 128,
        }
    }

    #[test]
    fn accepts_valid_settings() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn rejects_zero_ghr_bits() {
        let mut settings = valid_settings();
        settings.ghr_bits = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_mismatched_function_unit_vectors() {
        let mut settings = valid_settings();
        settings.function_units_latency.push(8);
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_zero_fetch_rate() {
        let mut settings = valid_settings();
        settings.fetch_rate = 0;
        assert!(validate_settings(&settings).is_err());
    }
}
