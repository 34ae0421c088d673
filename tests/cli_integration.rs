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

// cli_integration.rs
//
// Drives the actual `procsim` binary against trace files on disk.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_trace(dir: &std::path::Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("trace.txt");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn runs_a_small_trace_and_prints_statistics() {
    let dir = tempdir().unwrap();
    let trace = write_trace(&dir, "0x0 0 1 2 3\n0x4 0 4 1 2\n0x8 1 -1 4 1\n");

    let mut cmd = Command::cargo_bin("procsim").unwrap();
    cmd.arg(&trace);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("simulation statistics"))
        .stdout(predicate::str::contains("retired"));
}

#[test]
fn csv_format_emits_a_header_row() {
    let dir = tempdir().unwrap();
    let trace = write_trace(&dir, "0x0 0 1 2 3\n");

    let mut cmd = Command::cargo_bin("procsim").unwrap();
    cmd.arg(&trace).arg("--format").arg("csv");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("number,address,fetch"));
}

#[test]
fn missing_trace_file_fails_cleanly() {
    let mut cmd = Command::cargo_bin("procsim").unwrap();
    cmd.arg("/nonexistent/trace.txt");
    cmd.assert().failure().stderr(predicate::str::contains("procsim:"));
}

#[test]
fn malformed_trace_line_is_reported_with_its_line_number() {
    let dir = tempdir().unwrap();
    let trace = write_trace(&dir, "0x0 0 1 2 3\nnonsense\n");

    let mut cmd = Command::cargo_bin("procsim").unwrap();
    cmd.arg(&trace);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}
