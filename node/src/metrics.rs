//! Prometheus metrics for the accrue node.
//!
//! Counters track commands and ledger events; gauges track the size of the
//! ledger. Amounts are not exported: they exceed what a Prometheus sample
//! can hold exactly.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

use accrue_ledger::LedgerEvent;

/// Central collection of all node-level Prometheus metrics.
pub struct NodeMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub commands_applied: IntCounter,
    pub commands_rejected: IntCounter,
    /// Reward realizations that minted a nonzero amount.
    pub rewards_realized: IntCounter,
    pub mints: IntCounter,
    pub burns: IntCounter,
    pub transfers: IntCounter,
    pub stakes: IntCounter,
    pub unstakes: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub account_count: IntGauge,
    pub active_stakers: IntGauge,
    pub pool_count: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time spent applying one command under the write lock, in milliseconds.
    pub command_apply_time_ms: Histogram,
}

impl NodeMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let counter = |name: &str, help: &str| {
            register_int_counter_with_registry!(Opts::new(name, help), registry)
                .expect("failed to register counter")
        };
        let gauge = |name: &str, help: &str| {
            register_int_gauge_with_registry!(Opts::new(name, help), registry)
                .expect("failed to register gauge")
        };

        let commands_applied = counter("accrue_commands_applied_total", "Commands applied");
        let commands_rejected = counter("accrue_commands_rejected_total", "Commands rejected");
        let rewards_realized = counter(
            "accrue_rewards_realized_total",
            "Reward realizations that minted tokens",
        );
        let mints = counter("accrue_mints_total", "Explicit mints");
        let burns = counter("accrue_burns_total", "Burns");
        let transfers = counter("accrue_transfers_total", "Transfers");
        let stakes = counter("accrue_stakes_total", "Stake deposits");
        let unstakes = counter("accrue_unstakes_total", "Stake withdrawals");

        let account_count = gauge("accrue_account_count", "Accounts known to the ledger");
        let active_stakers = gauge("accrue_active_stakers", "Accounts with a nonzero stake");
        let pool_count = gauge("accrue_pool_count", "Registered staking pools");

        // 0.01 ms → ~160 ms.
        let command_apply_time_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "accrue_command_apply_time_ms",
                "Command apply time in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(0.01, 2.0, 15).unwrap()),
            registry
        )
        .expect("failed to register command_apply_time_ms histogram");

        Self {
            registry,
            commands_applied,
            commands_rejected,
            rewards_realized,
            mints,
            burns,
            transfers,
            stakes,
            unstakes,
            account_count,
            active_stakers,
            pool_count,
            command_apply_time_ms,
        }
    }

    /// Count one ledger event.
    pub fn observe(&self, event: &LedgerEvent) {
        match event {
            LedgerEvent::RewardsRealized { .. } => self.rewards_realized.inc(),
            LedgerEvent::Minted { .. } => self.mints.inc(),
            LedgerEvent::Burned { .. } => self.burns.inc(),
            LedgerEvent::Transferred { .. } => self.transfers.inc(),
            LedgerEvent::Staked { .. } => self.stakes.inc(),
            LedgerEvent::Unstaked { .. } => self.unstakes.inc(),
            _ => {}
        }
    }

    /// Render every metric in the Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buf = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buf) {
            tracing::warn!(error = %e, "failed to encode metrics");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}
