//! Benchmarks for parameter value conversion and encoding.

#![allow(clippy::unwrap_used, missing_docs)]

use bytes::BytesMut;
use chrono::{FixedOffset, TimeZone};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use mssql_types::{SqlValue, ToSql, TypedValue, encode_typed, encode_value};
use std::hint::black_box;

/// Benchmark ToSql conversions (Rust → SqlValue).
fn bench_to_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_sql");

    let int_val: i32 = 12345;
    group.bench_function("i32", |b| {
        b.iter(|| black_box(&int_val).to_sql().unwrap())
    });

    let string_val = "test string value".to_string();
    group.bench_function("String", |b| {
        b.iter(|| black_box(&string_val).to_sql().unwrap())
    });

    let opt_none: Option<i32> = None;
    group.bench_function("Option_i32_None", |b| {
        b.iter(|| black_box(&opt_none).to_sql().unwrap())
    });

    group.finish();
}

/// Benchmark marker encodings (TypedValue → ParamDescriptor).
fn bench_typed(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_typed");

    let short = TypedValue::varchar("Hello");
    group.bench_function("varchar_short", |b| {
        b.iter(|| encode_typed(black_box(&short)).unwrap())
    });

    let long_text = "Lorem ipsum dolor sit amet. ".repeat(400);
    group.throughput(Throughput::Bytes(long_text.len() as u64));
    let long = TypedValue::varchar(long_text);
    group.bench_function("varchar_max", |b| {
        b.iter(|| encode_typed(black_box(&long)).unwrap())
    });

    let zone = FixedOffset::west_opt(5 * 3600).unwrap();
    let dt = zone.with_ymd_and_hms(2024, 7, 1, 13, 45, 30).unwrap();

    let legacy = TypedValue::datetime1(dt);
    group.bench_function("datetime1", |b| {
        b.iter(|| encode_typed(black_box(&legacy)).unwrap())
    });

    let dto = TypedValue::datetime_offset(dt);
    group.bench_function("datetimeoffset", |b| {
        b.iter(|| encode_typed(black_box(&dto)).unwrap())
    });

    group.finish();
}

/// Benchmark plain value encodings and the full wire write.
fn bench_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_value");

    let int = SqlValue::Int(12345);
    group.bench_function("int", |b| b.iter(|| encode_value(black_box(&int)).unwrap()));

    let text = SqlValue::String("日本語テスト文字列 émoji et accénts".to_string());
    group.bench_function("nvarchar", |b| {
        b.iter(|| encode_value(black_box(&text)).unwrap())
    });

    let param = encode_value(&text).unwrap();
    group.bench_function("wire_write", |b| {
        b.iter(|| {
            let mut buf = BytesMut::with_capacity(128);
            black_box(&param).encode("@p1", &mut buf).unwrap();
            black_box(buf)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_to_sql, bench_typed, bench_value);

criterion_main!(benches);
