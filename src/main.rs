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

// main.rs
//
// Entry point: resolve settings, read a trace, run it through the engine,
// then print per-instruction lives followed by aggregate statistics.

use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use procsim::engine::Tomasulo;
use procsim::shell::{cli::Cli, report, trace};

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("procsim: {}", err);
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> Result<(), procsim::ShellError> {
    let settings = cli.resolve_settings()?;

    let file = File::open(&cli.trace)?;
    let mut instrs = trace::parse_trace(BufReader::new(file))?;

    let mut engine = Tomasulo::new(settings);
    engine.run(&mut instrs);

    let finished: Vec<_> = instrs.into_iter().collect();
    println!("{}", report::render_lives(&finished, cli.format));
    println!("{}", report::render_statistics(engine.statistics(), cli.format));

    Ok(())
}
