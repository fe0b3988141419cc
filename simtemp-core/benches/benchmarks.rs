// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::delivery_bench::bench_delivery;
use crate::tick_bench::bench_tick;
use criterion::{criterion_group, criterion_main};


criterion_group!(benches, bench_tick, bench_delivery);
criterion_main!(benches);
