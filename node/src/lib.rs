//! accrue node: hosts one yield ledger behind a serialized command interface.
//!
//! The node:
//! - Builds the ledger, price feed and LP escrow from a TOML config
//! - Applies stamped commands one at a time under a write lock
//! - Replays JSON-lines command logs deterministically
//! - Serves consistent read-only queries concurrently
//! - Exposes Prometheus counters for commands and ledger events

pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod service;

pub use command::{read_command_log, write_command_log, Command, LoggedCommand, Outcome};
pub use config::{NodeConfig, PoolConfig, QuoteConfig, WalletConfig};
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use node::AccrueNode;
pub use service::{LedgerService, ReplaySummary};
