use arrow::array::ListArray;
use arrow::datatypes::Int32Type;
use criterion::{Criterion, criterion_group, criterion_main};
use rdfutils::column::TakeColumn;
use rdfutils::result_array::ResultHandle;
use rdfutils::shape::{all_same_length, is_ragged};
use std::hint::black_box;

fn regular_rows(rows: usize, width: i32) -> Vec<Vec<i32>> {
    (0..rows).map(|row| (0..width).map(|v| v + row as i32).collect()).collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ShapePredicates");
    let rows = regular_rows(100_000, 8);
    let list = ListArray::from_iter_primitive::<Int32Type, _, _>(
        rows.iter()
            .map(|row| Some(row.iter().copied().map(Some).collect::<Vec<_>>())),
    );
    group.bench_function("is_ragged_vec", |b| b.iter(|| is_ragged(black_box(&rows))));
    group.bench_function("all_same_length_vec", |b| {
        b.iter(|| all_same_length(black_box(&rows)))
    });
    group.bench_function("is_ragged_list_array", |b| {
        b.iter(|| is_ragged(black_box(&list)))
    });
    group.bench_function("take_column_from_list_array", |b| {
        b.iter(|| {
            TakeColumn::from_arrow_list::<Int32Type, _>(
                black_box(&list),
                Some(ResultHandle::new(())),
            )
        })
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
