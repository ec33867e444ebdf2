use climate_heatmap::{ChartConfig, Dataset, HeatmapChart, MonthlyVariance};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_dataset() -> Dataset {
    let monthly_variance = (1753..=2015)
        .flat_map(|year| {
            (1..=12u32).map(move |month| MonthlyVariance {
                year,
                month,
                variance: ((year - 1753) as f64 / 100.0) + (month as f64 * 0.37).sin(),
            })
        })
        .collect();
    Dataset {
        base_temperature: 8.66,
        monthly_variance,
    }
}

fn bench_render(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    c.bench_function("chart_cells", |b| {
        b.iter(|| {
            let chart = HeatmapChart::new(black_box(&dataset), ChartConfig::default()).unwrap();
            chart.cells()
        })
    });
    c.bench_function("render_page", |b| {
        let chart = HeatmapChart::new(&dataset, ChartConfig::default()).unwrap();
        b.iter(|| chart.render_page().unwrap())
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
