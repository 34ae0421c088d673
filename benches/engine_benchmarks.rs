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

// engine_benchmarks.rs
//
// Throughput of the pipeline driver over synthetic traces of increasing
// length, with a mix of independent and chained (register-dependent)
// instructions and an occasional branch.

use std::collections::VecDeque;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use procsim::engine::{Instruction, ProcessorSettings, Tomasulo};

fn settings() -> ProcessorSettings {
    ProcessorSettings {
        result_bus_count: 2,
        fetch_rate: 4,
        function_units_count: vec![3, 2, 1],
        function_units_latency: vec![1, 3, 5],
        register_count: 32,
        ghr_bits: 4,
        ghr_init_val: 0,
        predictor_bits: 2,
        predictor_init_val: 0b01,
        predictor_table_size: 64,
    }
}

fn synthetic_trace(len: usize) -> VecDeque<Instruction> {
    let mut trace = VecDeque::with_capacity(len);
    for i in 0..len {
        let number = i as u64 + 1;
        let address = i as u64 * 4;
        let func_type = (i % 3) as i32;
        let dst = (i % 32) as i32;

        if i % 16 == 15 {
            trace.push_back(Instruction::new_branch(
                number,
                address,
                func_type,
                -1,
                vec![-1, -1],
                address + 64,
                i % 32 < 16,
            ));
        } else {
            let src1 = if i > 0 { ((i - 1) % 32) as i32 } else { -1 };
            trace.push_back(Instruction::new(number, address, func_type, dst, vec![src1, -1]));
        }
    }
    trace
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("tomasulo_run");
    for &len in &[100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| {
                let mut engine = Tomasulo::new(settings());
                let mut trace = synthetic_trace(len);
                engine.run(&mut trace);
                black_box(trace);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_run);
criterion_main!(benches);
