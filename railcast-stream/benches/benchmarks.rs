// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0


use criterion::{criterion_group, criterion_main};
use parallel_bench::bench_parallel_sequential;
use replay_bench::bench_replay_fanout;

criterion_group!(stream_benches, bench_replay_fanout, bench_parallel_sequential);
criterion_main!(stream_benches);
