use clmm_price_utils::pool::fee_tier::FeeTier;
use clmm_price_utils::pool::position::TickRange;
use clmm_price_utils::{
    MAX_TICK, MIN_TICK, Q96, decode_sqrt_price, encode_sqrt_price,
    encode_sqrt_price_from_amounts, nearest_usable_tick, price_to_tick, tick_to_price,
};
use criterion::{BenchmarkId, Criterion};
use std::hint::black_box;

const TICKS: [i32; 5] = [MIN_TICK, -100_000, 0, 100_000, MAX_TICK];

pub fn bench_sqrt_price_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqrt_price_math");

    group.bench_function("encode_sqrt_price_equal", |b| {
        b.iter(|| encode_sqrt_price(black_box("100"), black_box("100")))
    });
    group.bench_function("encode_sqrt_price_decimal", |b| {
        b.iter(|| encode_sqrt_price(black_box("2.5"), black_box("1000.75")))
    });
    group.bench_function("encode_sqrt_price_from_amounts", |b| {
        b.iter(|| {
            encode_sqrt_price_from_amounts(
                black_box(4_000_000_000_000_000_000_000),
                black_box(1_000_000_000_000_000_000),
            )
        })
    });
    group.bench_function("decode_sqrt_price", |b| {
        b.iter(|| decode_sqrt_price(black_box(Q96)))
    });

    group.finish();
}

pub fn bench_price_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_math");

    for price in [1e-30, 0.5, 1.0, 2.0, 1e30] {
        group.bench_with_input(BenchmarkId::new("price_to_tick", price), &price, |b, &p| {
            b.iter(|| price_to_tick(black_box(p)))
        });
    }
    for tick in TICKS {
        group.bench_with_input(BenchmarkId::new("tick_to_price", tick), &tick, |b, &t| {
            b.iter(|| tick_to_price(black_box(t)))
        });
    }

    group.finish();
}

pub fn bench_tick_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_math");

    for tier in FeeTier::ALL {
        let spacing = tier.tick_spacing();
        group.bench_with_input(
            BenchmarkId::new("nearest_usable_tick", spacing),
            &spacing,
            |b, &s| {
                b.iter(|| {
                    for tick in TICKS {
                        let _ = nearest_usable_tick(black_box(tick), black_box(s));
                    }
                })
            },
        );
    }

    group.finish();
}

pub fn bench_position(c: &mut Criterion) {
    let mut group = c.benchmark_group("position");

    group.bench_function("around_price", |b| {
        b.iter(|| TickRange::around_price(black_box(1.5), FeeTier::Medium, black_box(0.1)))
    });
    group.bench_function("full_range", |b| {
        b.iter(|| TickRange::full_range(black_box(FeeTier::High.tick_spacing())))
    });

    group.finish();
}
