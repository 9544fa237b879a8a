//! The node struct: builds a ledger from config and wires its collaborators.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use accrue_ledger::{Ledger, LedgerError};
use accrue_oracle::{EscrowBook, EscrowSnapshot, StaticPriceFeed};
use accrue_store::{LedgerStore, StoreError};
use accrue_store_lmdb::environment::DEFAULT_MAP_SIZE;
use accrue_store_lmdb::{LmdbEnvironment, LmdbLedgerStore};
use accrue_types::{AccountId, Clock, LpTokenId};

use crate::command::read_command_log;
use crate::config::NodeConfig;
use crate::metrics::NodeMetrics;
use crate::service::{LedgerService, ReplaySummary};
use crate::NodeError;

/// Meta key of the serialized [`EscrowSnapshot`] stored next to the ledger.
const META_ESCROW: &[u8] = b"escrow_book";

/// A running ledger together with the in-process price feed and escrow it
/// was built with. Quotes and wallets stay reachable so callers can move
/// prices or fund stakers after startup.
pub struct AccrueNode {
    pub config: NodeConfig,
    pub service: LedgerService,
    pub feed: Arc<StaticPriceFeed>,
    pub escrow: Arc<EscrowBook>,
    pub metrics: Arc<NodeMetrics>,
    store: Option<LmdbLedgerStore>,
}

impl AccrueNode {
    /// Build the ledger described by `config`: parameters, minters, pools,
    /// price quotes and funded LP wallets. A snapshot in `snapshot_dir`
    /// takes precedence over the bootstrap settings, wallets included.
    pub fn new(config: NodeConfig, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        let feed = Arc::new(StaticPriceFeed::from_quotes(
            config
                .quotes
                .iter()
                .map(|q| (q.lp_token.clone(), q.to_quote())),
        ));

        let escrow = Arc::new(EscrowBook::new());

        let store = match &config.snapshot_dir {
            Some(dir) => Some(LmdbLedgerStore::new(LmdbEnvironment::open(
                dir,
                DEFAULT_MAP_SIZE,
            )?)),
            None => None,
        };

        let restored = match &store {
            Some(store) => match Ledger::load_from_store(store, feed.clone(), escrow.clone()) {
                Ok(ledger) => {
                    restore_escrow(store, &ledger, &config, &escrow)?;
                    Some(ledger)
                }
                Err(LedgerError::Store(StoreError::NotFound(_))) => None,
                Err(e) => return Err(e.into()),
            },
            None => None,
        };

        let ledger = match restored {
            Some(ledger) => {
                tracing::info!(
                    accounts = ledger.account_count(),
                    pools = ledger.pool_count(),
                    resume_at = ?ledger.latest_activity(),
                    "ledger restored from snapshot"
                );
                ledger
            }
            None => {
                fund_wallets(&config, &escrow)?;
                bootstrap(&config, feed.clone(), escrow.clone())?
            }
        };

        let metrics = Arc::new(NodeMetrics::new());
        let service = LedgerService::new(ledger, clock, Arc::clone(&metrics));
        Ok(Self {
            config,
            service,
            feed,
            escrow,
            metrics,
            store,
        })
    }

    /// Replay the command log named in the config, if any.
    pub async fn replay_configured_log(&self) -> Result<Option<ReplaySummary>, NodeError> {
        let Some(path) = &self.config.command_log else {
            return Ok(None);
        };
        let entries = read_command_log(BufReader::new(File::open(path)?))?;
        tracing::info!(path = %path.display(), entries = entries.len(), "replaying command log");
        Ok(Some(self.service.replay(entries).await))
    }

    /// Write the current ledger state and escrow book to the snapshot store.
    /// Returns `false` when no `snapshot_dir` is configured.
    pub async fn save_snapshot(&self) -> Result<bool, NodeError> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        self.service
            .read(|ledger| -> Result<(), NodeError> {
                ledger.save_to_store(store)?;
                store.put_meta(META_ESCROW, &bincode::serialize(&self.escrow.snapshot())?)?;
                Ok(())
            })
            .await?;
        tracing::info!("ledger snapshot saved");
        Ok(true)
    }
}

fn fund_wallets(config: &NodeConfig, escrow: &EscrowBook) -> Result<(), NodeError> {
    for wallet in &config.lp_wallets {
        escrow.fund(&wallet.lp_token, &wallet.account, wallet.amount)?;
    }
    Ok(())
}

/// Load the escrow book saved with the ledger. For a snapshot without one,
/// custody is rebuilt from the restored stakes and each configured wallet
/// is funded with whatever its owner has not staked.
fn restore_escrow(
    store: &LmdbLedgerStore,
    ledger: &Ledger,
    config: &NodeConfig,
    escrow: &EscrowBook,
) -> Result<(), NodeError> {
    if let Some(bytes) = store.get_meta(META_ESCROW)? {
        let snapshot: EscrowSnapshot = bincode::deserialize(&bytes)?;
        escrow.restore(snapshot);
        return Ok(());
    }
    tracing::warn!("snapshot has no escrow book, rebuilding custody from stakes");

    let mut wallets: BTreeMap<(&LpTokenId, &AccountId), u128> = BTreeMap::new();
    for wallet in &config.lp_wallets {
        let slot = wallets.entry((&wallet.lp_token, &wallet.account)).or_insert(0);
        *slot = slot.saturating_add(wallet.amount);
    }
    for ((lp_token, account), funded) in wallets {
        let staked = ledger
            .pools()
            .filter(|(_, pool)| &pool.lp_token == lp_token)
            .fold(0u128, |total, (id, _)| {
                total.saturating_add(ledger.staked_balance(id, account))
            });
        let free = funded.saturating_sub(staked);
        if free > 0 {
            escrow.fund(lp_token, account, free)?;
        }
    }
    for (id, pool) in ledger.pools() {
        let staked = ledger.total_staked(id);
        if staked > 0 {
            escrow.hold(&pool.lp_token, staked)?;
        }
    }
    Ok(())
}

fn bootstrap(
    config: &NodeConfig,
    feed: Arc<StaticPriceFeed>,
    escrow: Arc<EscrowBook>,
) -> Result<Ledger, NodeError> {
    let mut ledger = Ledger::new(config.ledger.clone(), config.admin.clone(), feed, escrow)?;
    for minter in &config.minters {
        ledger.grant_minter(&config.admin, minter)?;
    }
    for pool in &config.pools {
        ledger.add_pool(
            &config.admin,
            pool.lp_token.clone(),
            pool.multiplier_max,
            pool.time_threshold_secs,
        )?;
    }
    tracing::info!(
        admin = %config.admin,
        minters = config.minters.len(),
        pools = config.pools.len(),
        quotes = config.quotes.len(),
        "ledger bootstrapped from config"
    );
    Ok(ledger)
}
