use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use accrue_accrual::{mul_div, multiplier, AccountBalance, StakingPool, UserStake};
use accrue_types::{LpTokenId, ReserveRatio, Timestamp};

const YEAR: u64 = 365 * 86_400;

fn funded_balance(value: u128) -> AccountBalance {
    let mut b = AccountBalance::new();
    b.advance(Timestamp::new(0)).unwrap();
    b.credit(value).unwrap();
    b
}

fn bench_base_pending_reward(c: &mut Criterion) {
    let mut group = c.benchmark_group("base_pending_reward");

    for checkpoints in [1u64, 10, 100] {
        let mut balance = funded_balance(1_000_000_000_000_000_000_000);
        for i in 1..=checkpoints {
            balance.advance(Timestamp::new(i * 1_000)).unwrap();
            balance.credit(1_000).unwrap();
        }
        let now = Timestamp::new(YEAR);

        group.bench_with_input(
            BenchmarkId::new("pending_reward", checkpoints),
            &checkpoints,
            |b, _| {
                b.iter(|| black_box(balance.pending_reward(black_box(now), black_box(1_000))));
            },
        );
    }

    group.finish();
}

fn bench_stake_pending_reward(c: &mut Criterion) {
    let pool = StakingPool {
        lp_token: LpTokenId::new("lp"),
        multiplier_max: 3_000_000,
        time_threshold: YEAR,
        active: true,
    };
    let mut stake = UserStake::new();
    stake.advance(Timestamp::new(0)).unwrap();
    stake
        .deposit(5_000_000_000_000_000_000_000, Timestamp::new(0))
        .unwrap();
    let ratio = ReserveRatio::new(
        2_000_000_000_000_000_000_000_000,
        1_000_000_000_000_000_000_000_000,
    );

    c.bench_function("stake_pending_reward", |b| {
        b.iter(|| {
            black_box(stake.pending_reward(
                black_box(&pool),
                black_box(ratio),
                black_box(Timestamp::new(YEAR / 2)),
                black_box(1_000),
            ))
        });
    });
}

fn bench_multiplier(c: &mut Criterion) {
    c.bench_function("cubic_multiplier", |b| {
        b.iter(|| black_box(multiplier(black_box(2_000_000), black_box(YEAR), black_box(YEAR / 3))));
    });
}

fn bench_mul_div(c: &mut Criterion) {
    let mut group = c.benchmark_group("mul_div");
    group.bench_function("narrow", |b| {
        b.iter(|| black_box(mul_div(black_box(1 << 60), black_box(1 << 60), black_box(3))));
    });
    group.bench_function("wide", |b| {
        b.iter(|| black_box(mul_div(black_box(u128::MAX / 3), black_box(7), black_box(6))));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_base_pending_reward,
    bench_stake_pending_reward,
    bench_multiplier,
    bench_mul_div,
);
criterion_main!(benches);
