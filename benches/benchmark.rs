//! パフォーマンスベンチマーク
//!
//! このモジュールは、wondergridクレートのデコード性能を測定するためのベンチマークを提供します。
//!
//! 実装するベンチマーク:
//! - スパン付きレスポンスの解析と復元（行数別）
//! - 独立した複数レスポンスの並列復元
//! - 期間集合の生成と和集合

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;
use wondergrid::{CalendarMonth, DecoderBuilder, OutputFormat, PeriodSet, Year};

/// 州 > 年の2段グルーピングを持つレスポンスを生成
///
/// 各州のラベルは`years`行にまたがります。
fn generate_response(states: usize, years: usize) -> String {
    let mut xml = String::from(r#"<?xml version="1.0"?><page><response><data-table>"#);
    for s in 0..states {
        for y in 0..years {
            xml.push_str("<r>");
            if y == 0 {
                xml.push_str(&format!(r#"<c l="State {}" r="{}"/>"#, s, years));
            }
            xml.push_str(&format!(
                r#"<c l="{}"/><c v="{}"/><c v="4,903,185"/><c v="25.2"/>"#,
                1999 + y,
                (s * years + y) * 1_000
            ));
            xml.push_str("</r>");
        }
    }
    xml.push_str("</data-table></response></page>");
    xml
}

/// レスポンスの解析と復元
fn benchmark_decode(c: &mut Criterion) {
    let decoder = DecoderBuilder::new()
        .with_groupings(["State", "Year"])
        .build()
        .unwrap();

    let mut group = c.benchmark_group("decode");

    for states in [10, 100, 1_000] {
        let xml = generate_response(states, 20);
        group.throughput(Throughput::Bytes(xml.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(states * 20), &xml, |b, xml| {
            b.iter(|| decoder.decode_str(black_box(xml)).unwrap());
        });
    }

    group.finish();
}

/// Markdown/CSV/JSONへの変換
fn benchmark_convert(c: &mut Criterion) {
    let xml = generate_response(100, 20);

    let mut group = c.benchmark_group("convert");
    group.throughput(Throughput::Bytes(xml.len() as u64));

    for (name, format) in [
        ("markdown", OutputFormat::Markdown),
        ("csv", OutputFormat::Csv),
        ("json", OutputFormat::Json),
    ] {
        let decoder = DecoderBuilder::new()
            .with_groupings(["State", "Year"])
            .with_output_format(format)
            .build()
            .unwrap();

        group.bench_function(name, |b| {
            b.iter(|| {
                let mut output = Vec::new();
                decoder
                    .convert(Cursor::new(black_box(xml.as_bytes())), &mut output)
                    .unwrap();
                black_box(output)
            });
        });
    }

    group.finish();
}

/// 独立した複数レスポンスの並列復元
fn benchmark_decode_all(c: &mut Criterion) {
    let inputs: Vec<String> = (0..50).map(|_| generate_response(100, 20)).collect();
    let decoder = DecoderBuilder::new().build().unwrap();

    let mut group = c.benchmark_group("decode_all");
    group.sample_size(10); // 50レスポンス分の処理のため、10回のサンプル

    group.bench_function("sequential_50", |b| {
        b.iter(|| {
            for xml in &inputs {
                black_box(decoder.decode_str(xml).unwrap());
            }
        });
    });

    group.bench_function("parallel_50", |b| {
        b.iter(|| black_box(decoder.decode_all(&inputs).unwrap()));
    });

    group.finish();
}

/// 期間集合の生成と和集合
fn benchmark_periods(c: &mut Criterion) {
    c.bench_function("period_range_century", |b| {
        b.iter(|| PeriodSet::range(black_box(Year::new(1900)), black_box(Year::new(1999))).unwrap());
    });

    let a = PeriodSet::range(
        CalendarMonth::new(1, 1950).unwrap(),
        CalendarMonth::new(12, 1999).unwrap(),
    )
    .unwrap();
    let b_set = PeriodSet::range(Year::new(1980), Year::new(2020)).unwrap();

    c.bench_function("period_union", |b| {
        b.iter(|| PeriodSet::union(black_box(&a), black_box(&b_set)));
    });
}

criterion_group!(
    benches,
    benchmark_decode,
    benchmark_convert,
    benchmark_decode_all,
    benchmark_periods
);
criterion_main!(benches);
