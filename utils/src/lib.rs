//! Shared utilities for the accrue yield ledger.

pub mod format;
pub mod logging;

pub use format::{format_amount, format_bps, format_duration, format_multiplier};
pub use logging::init_tracing;
