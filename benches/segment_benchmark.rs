//! Benchmarks for line grouping and paragraph segmentation.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pdf2epub::layout::{group_words_into_lines, paragraphs_from_words, segment_paragraphs};
use pdf2epub::{SegmentConfig, Word};

/// Synthetic page: 45 lines of 10 words, every fifth line indented, with a
/// running header and a page number in the margin.
fn synthetic_page(lines: usize) -> Vec<Word> {
    let mut words = Vec::new();
    for line in 0..lines {
        let top = 72.0 + line as f32 * 14.0;
        let indent = if line % 5 == 0 { 60.0 } else { 30.0 };
        for w in 0..10 {
            words.push(Word::new(format!("word{}", w), indent + w as f32 * 40.0, top));
        }
    }
    words.push(Word::new("HEADER", 250.0, 30.0));
    words.push(Word::new("42", 300.0, 760.0));
    words
}

fn bench_group_lines(c: &mut Criterion) {
    let words = synthetic_page(45);
    c.bench_function("group_words_into_lines", |b| {
        b.iter(|| group_words_into_lines(black_box(&words)))
    });
}

fn bench_segment(c: &mut Criterion) {
    let config = SegmentConfig::default();
    let mut group = c.benchmark_group("segment_paragraphs");

    for lines in [10, 45, 200] {
        let page = group_words_into_lines(&synthetic_page(lines));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &page, |b, page| {
            b.iter(|| segment_paragraphs(black_box(page), &config))
        });
    }
    group.finish();
}

fn bench_full_page(c: &mut Criterion) {
    let words = synthetic_page(45);
    let config = SegmentConfig::default();
    c.bench_function("paragraphs_from_words", |b| {
        b.iter(|| paragraphs_from_words(black_box(&words), &config))
    });
}

criterion_group!(benches, bench_group_lines, bench_segment, bench_full_page);
criterion_main!(benches);
