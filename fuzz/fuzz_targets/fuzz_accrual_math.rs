#![no_main]

use libfuzzer_sys::fuzz_target;

use accrue_accrual::{mul_div, multiplier};
use accrue_types::MULTIPLIER_SCALE;

#[derive(Debug, arbitrary::Arbitrary)]
struct Input {
    a: u128,
    b: u128,
    divisor: u128,
    multiplier_max: u128,
    time_threshold: u64,
    time_staked: u64,
}

// The fixed-point helpers must never panic, and the curve must stay
// between 1.0x and its maximum.
fuzz_target!(|input: Input| {
    let _ = mul_div(input.a, input.b, input.divisor);

    let max = input.multiplier_max.max(MULTIPLIER_SCALE);
    let m = multiplier(max, input.time_threshold, input.time_staked);
    assert!(m >= MULTIPLIER_SCALE);
    assert!(m <= max);
    if input.time_threshold > 0 && input.time_staked >= input.time_threshold {
        assert_eq!(m, max);
    }
});
