//! Benchmarks for the periodic-commit driver over the in-memory engine.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use graphbatch::{
    MemoryEngine, MemoryTransaction, QueryContext, Row, Schema, Session, Transaction,
    UpdateStream,
};

/// Creates `remaining` bare nodes, one per unit.
struct CreateNodes {
    remaining: u64,
}

impl<'a> UpdateStream<MemoryTransaction<'a>> for CreateNodes {
    fn schema(&self) -> Arc<Schema> {
        Arc::new(Schema::empty())
    }

    fn next_unit(
        &mut self,
        tx: &mut MemoryTransaction<'a>,
    ) -> Option<graphbatch::Result<Vec<Row>>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(tx.create_node(&[]).map(|_| Vec::new()).map_err(Into::into))
    }
}

fn bench_batched_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("periodic_commit");
    let writes = 10_000u64;

    for batch_size in [100u64, 1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &batch_size,
            |b, &batch_size| {
                b.iter(|| {
                    let session = Session::new(MemoryEngine::new());
                    let query = format!("USING PERIODIC COMMIT {batch_size} CREATE ...");
                    let ctx = QueryContext::new().with_updates(true);
                    session
                        .execute(&query, ctx, CreateNodes { remaining: writes })
                        .expect("execution failed");
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_batched_writes);
criterion_main!(benches);
