use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use nbclean_core::{check_notebook, clean_notebook, CleanConfig, Notebook};

fn large_notebook(cells: usize) -> Notebook {
    let cells: Vec<serde_json::Value> = (0..cells)
        .map(|i| {
            json!({
                "cell_type": "code",
                "execution_count": i,
                "metadata": {"tags": ["bench"], "collapsed": false},
                "outputs": [{
                    "output_type": "stream",
                    "name": "stdout",
                    "text": [format!("line {}\n", i)]
                }],
                "source": if i % 10 == 0 { json!("") } else { json!(["x = 1\n", "x + 1"]) }
            })
        })
        .collect();
    Notebook::from_value(json!({
        "cells": cells,
        "metadata": {"language_info": {"name": "python", "version": "3.12.1"}},
        "nbformat": 4,
        "nbformat_minor": 5
    }))
    .expect("valid notebook")
}

fn bench_clean(c: &mut Criterion) {
    let nb = large_notebook(2_000);
    let config = CleanConfig::new().with_remove_empty_cells(true);

    c.bench_function("clean_notebook 2000 cells", |b| {
        b.iter(|| clean_notebook(black_box(&nb), black_box(&config)))
    });
    c.bench_function("check_notebook 2000 cells", |b| {
        b.iter(|| check_notebook(black_box(&nb), black_box(&config)))
    });
}

criterion_group!(benches, bench_clean);
criterion_main!(benches);
