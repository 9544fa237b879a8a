//! Human-readable formatting for amounts, rates, multipliers and durations.

use accrue_types::{BPS_SCALE, MULTIPLIER_SCALE, TOKEN_UNIT};

/// Format a duration in seconds, e.g. `"3d 4h"`.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3_600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86_400 {
        format!("{}h {}m", secs / 3_600, (secs % 3_600) / 60)
    } else {
        format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3_600)
    }
}

/// Format a fixed-point multiplier (1_000_000 = 1.0x) with six decimals.
pub fn format_multiplier(multiplier: u128) -> String {
    format!(
        "{}.{:06}x",
        multiplier / MULTIPLIER_SCALE,
        multiplier % MULTIPLIER_SCALE
    )
}

/// Format a rate in basis points as a percentage, e.g. `1050` → `"10.50%"`.
pub fn format_bps(bps: u32) -> String {
    let scale = (BPS_SCALE / 100) as u32;
    format!("{}.{:02}%", bps / scale, bps % scale)
}

/// Format a smallest-unit amount as whole tokens, trimming trailing zeros.
pub fn format_amount(amount: u128) -> String {
    let whole = amount / TOKEN_UNIT;
    let frac = amount % TOKEN_UNIT;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:018}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m 1s");
        assert_eq!(format_duration(7_260), "2h 1m");
        assert_eq!(format_duration(90_000), "1d 1h");
    }

    #[test]
    fn multipliers() {
        assert_eq!(format_multiplier(1_000_000), "1.000000x");
        assert_eq!(format_multiplier(1_125_000), "1.125000x");
        assert_eq!(format_multiplier(2_500_001), "2.500001x");
    }

    #[test]
    fn rates() {
        assert_eq!(format_bps(1_000), "10.00%");
        assert_eq!(format_bps(1_050), "10.50%");
        assert_eq!(format_bps(5), "0.05%");
    }

    #[test]
    fn amounts() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(3 * TOKEN_UNIT), "3");
        assert_eq!(format_amount(TOKEN_UNIT + TOKEN_UNIT / 4), "1.25");
        assert_eq!(format_amount(1), "0.000000000000000001");
    }
}
