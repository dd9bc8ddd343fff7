//! Benchmarks for rmink conversion performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks convert synthetic notebooks of handwriting-like strokes
//! and text boxes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rmink::scene::{
    DecodedItem, DecodedLayer, DecodedLine, DecodedNotebook, DecodedPage, DecodedPoint, DecodedRun,
    DecodedText,
};
use rmink::{ConvertOptions, OutputFormat, ReverseBuilder, SceneBuilder};

/// Creates a synthetic notebook with the given number of pages.
fn create_test_notebook(page_count: usize, strokes_per_page: usize) -> DecodedNotebook {
    let pages = (0..page_count)
        .map(|p| {
            let mut layer = DecodedLayer::new("Layer 1");
            for s in 0..strokes_per_page {
                let points = (0..40)
                    .map(|i| {
                        let t = i as f32 / 4.0;
                        DecodedPoint::new(
                            -600.0 + (s % 20) as f32 * 60.0 + t.sin() * 10.0 + i as f32,
                            200.0 + (s / 20) as f32 * 80.0 + t.cos() * 20.0,
                            64.0 + ((i * 13) % 192) as f32,
                        )
                        .with_motion(10.0, 40.0)
                    })
                    .collect();
                let tool = [15, 17, 18, 12][s % 4];
                layer = layer.with_item(DecodedItem::Line(
                    DecodedLine::new(tool, 0, 2.0).with_points(points),
                ));
            }

            let text = DecodedText::new(-468.0, 94.0, 936.0)
                .with_run(DecodedRun::new(format!("Page {} heading", p + 1)).with_break())
                .with_run(DecodedRun::new(
                    "Benchmark text content for rmink performance measurement. ".repeat(4),
                ));
            DecodedPage::new().with_root_text(text).with_layer(layer)
        })
        .collect();
    DecodedNotebook::new(pages)
}

/// Benchmark the Model Builder.
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for page_count in [1, 5, 10].iter() {
        let notebook = create_test_notebook(*page_count, 100);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| SceneBuilder::new().build(black_box(&notebook)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark every output format on the same notebook.
fn bench_convert_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    let notebook = create_test_notebook(5, 100);

    for format in OutputFormat::ALL {
        let options = ConvertOptions::new().with_format(format);
        group.bench_function(format.extension(), |b| {
            b.iter(|| rmink::convert(black_box(&notebook), &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark sequential versus batch conversion.
fn bench_batch(c: &mut Criterion) {
    let notebooks: Vec<_> = (0..8).map(|_| create_test_notebook(2, 100)).collect();
    let options = ConvertOptions::new().with_format(OutputFormat::Svg);

    c.bench_function("batch_8_notebooks", |b| {
        b.iter(|| rmink::convert_batch(black_box(&notebooks), &options));
    });
}

/// Benchmark the reverse builder.
fn bench_reverse(c: &mut Criterion) {
    let text = (0..8)
        .map(|i| format!("Paragraph {} with a line\nand a second line that is a little longer", i))
        .collect::<Vec<_>>()
        .join("\n\n");

    c.bench_function("reverse_build", |b| {
        b.iter(|| ReverseBuilder::new().build(black_box(&text)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_convert_formats,
    bench_batch,
    bench_reverse,
);
criterion_main!(benches);
