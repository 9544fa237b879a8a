//! Widening fixed-point arithmetic.
//!
//! Reward formulas multiply several large quantities (balance × seconds ×
//! rate × multiplier) before dividing. `mul_div` keeps the full 256-bit
//! product so intermediate results never wrap; only the final quotient has to
//! fit in a `u128`.

const LOW_MASK: u128 = u64::MAX as u128;

/// Full 256-bit product of two `u128`s as `(high, low)` words.
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    let (a_hi, a_lo) = (a >> 64, a & LOW_MASK);
    let (b_hi, b_lo) = (b >> 64, b & LOW_MASK);

    let lo_lo = a_lo * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_lo = a_hi * b_lo;
    let hi_hi = a_hi * b_hi;

    // < 3 × 2^64, cannot overflow.
    let middle = (lo_lo >> 64) + (lo_hi & LOW_MASK) + (hi_lo & LOW_MASK);

    let low = (lo_lo & LOW_MASK) | (middle << 64);
    let high = hi_hi + (lo_hi >> 64) + (hi_lo >> 64) + (middle >> 64);
    (high, low)
}

/// Compute `a × b / divisor`, truncating, with a 256-bit intermediate.
///
/// Returns `None` when `divisor` is zero or the quotient does not fit in a
/// `u128`.
pub fn mul_div(a: u128, b: u128, divisor: u128) -> Option<u128> {
    if divisor == 0 {
        return None;
    }
    let (high, low) = widening_mul(a, b);
    if high == 0 {
        return Some(low / divisor);
    }
    if high >= divisor {
        return None;
    }

    // Restoring long division of (high:low) by divisor, one bit at a time.
    // `rem < divisor` holds before every step.
    let mut rem = high;
    let mut quotient: u128 = 0;
    for bit in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((low >> bit) & 1);
        quotient <<= 1;
        if carry == 1 || rem >= divisor {
            rem = rem.wrapping_sub(divisor);
            quotient |= 1;
        }
    }
    Some(quotient)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_match_native() {
        assert_eq!(mul_div(6, 7, 2), Some(21));
        assert_eq!(mul_div(10, 10, 3), Some(33));
        assert_eq!(mul_div(0, u128::MAX, 1), Some(0));
    }

    #[test]
    fn zero_divisor_is_none() {
        assert_eq!(mul_div(1, 1, 0), None);
    }

    #[test]
    fn wide_intermediate_does_not_wrap() {
        // (2^127) × 4 / 8 = 2^126, the product needs 130 bits.
        let a = 1u128 << 127;
        assert_eq!(mul_div(a, 4, 8), Some(1u128 << 126));
        assert_eq!(mul_div(u128::MAX, u128::MAX, u128::MAX), Some(u128::MAX));
    }

    #[test]
    fn quotient_overflow_is_none() {
        assert_eq!(mul_div(u128::MAX, 2, 1), None);
    }

    #[test]
    fn truncates_toward_zero() {
        let a = u128::MAX / 3;
        // a × 3 / 3 must give back a exactly.
        assert_eq!(mul_div(a, 3, 3), Some(a));
        // a × 7 / 6 overflows 128 bits in the product but not in the result.
        let expected = a + a / 6;
        assert_eq!(mul_div(a, 7, 6), Some(expected));
    }
}
