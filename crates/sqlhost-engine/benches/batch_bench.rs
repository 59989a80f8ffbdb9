//! Batch insert throughput.
//!
//! Run with: cargo bench --package sqlhost-engine

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rusqlite::Connection;
use sqlhost_core::config::SqlHostConfig;
use sqlhost_core::types::{BatchCommand, Value};
use sqlhost_engine::batch::execute_batch;
use sqlhost_engine::Runtime;

fn rows(n: usize) -> Vec<Vec<Value>> {
    (0..n as i64)
        .map(|i| vec![Value::Integer(i), Value::Text(format!("row-{i}"))])
        .collect()
}

fn bench_batch_direct(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_insert");
    for size in [100usize, 1_000, 10_000] {
        let command = BatchCommand::with_param_sets("INSERT INTO t (n, label) VALUES (?, ?)", rows(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &command, |b, command| {
            let conn = Connection::open_in_memory().unwrap();
            conn.execute_batch("CREATE TABLE t (n INTEGER, label TEXT)").unwrap();
            b.iter(|| {
                let result = execute_batch(&conn, std::slice::from_ref(command)).unwrap();
                conn.execute_batch("DELETE FROM t").unwrap();
                black_box(result)
            });
        });
    }
    group.finish();
}

fn bench_batch_async(c: &mut Criterion) {
    let (rt, host) = Runtime::install(SqlHostConfig::default()).unwrap();
    rt.open("bench", Some(":memory:")).unwrap();
    rt.execute("bench", "CREATE TABLE t (n INTEGER, label TEXT)", &[]).unwrap();
    let commands = vec![BatchCommand::with_param_sets(
        "INSERT INTO t (n, label) VALUES (?, ?)",
        rows(1_000),
    )];

    c.bench_function("batch_insert_async_1000", |b| {
        b.iter(|| {
            let pending = rt.execute_batch_async("bench", commands.clone()).unwrap();
            black_box(pending.wait(&host, Duration::from_secs(10)).unwrap())
        });
    });
}

criterion_group!(benches, bench_batch_direct, bench_batch_async);
criterion_main!(benches);
