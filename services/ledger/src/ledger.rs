//! Pool ledger: the sole mutator of pool reserves
//!
//! Each pool has its own commit lock. A swap's read, compute and write all run
//! inside that lock, so two swaps on the same pool always observe each other
//! and swaps on different pools never wait on one another.

use crate::error::{LedgerError, Result};
use crate::store::{Authority, InMemoryPoolStore, PoolRecord, PoolStore, ReserveUpdate};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use swapline_amm::ConstantProduct;
use swapline_config::LedgerSettings;
use tracing::{debug, info, warn};
use types::{Direction, PairKey, PoolReserves, SwapEvent, SwapReceipt, TokenId};

/// Ledger counters
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub pools: usize,
    pub swaps_committed: u64,
    pub swaps_rejected: u64,
    pub last_update_ns: u64,
    /// Events not delivered because a subscriber's buffer was full
    pub events_dropped: u64,
}

/// Authoritative pool reserves with per-pool serialised commits
pub struct PoolLedger {
    store: Arc<dyn PoolStore>,

    /// One commit lock per pool
    commit_locks: DashMap<PairKey, Arc<Mutex<()>>>,

    /// Token -> pools that contain it
    token_index: DashMap<TokenId, Vec<PairKey>>,

    lock_timeout: Duration,
    event_buffer: usize,

    stats: Arc<RwLock<LedgerStats>>,

    /// Swap event subscribers; disconnected receivers are pruned on send
    subscribers: Mutex<Vec<Sender<SwapEvent>>>,
}

impl Default for PoolLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolLedger {
    /// In-memory ledger with default settings
    pub fn new() -> Self {
        Self::from_settings(&LedgerSettings::default())
    }

    pub fn from_settings(settings: &LedgerSettings) -> Self {
        Self::build(Arc::new(InMemoryPoolStore::new()), settings)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self::from_settings(&LedgerSettings {
            commit_lock_timeout_ms: lock_timeout.as_millis() as u64,
            ..LedgerSettings::default()
        })
    }

    /// Ledger over an existing store, indexing the pools it already holds
    pub fn with_store(store: Arc<dyn PoolStore>, settings: &LedgerSettings) -> Result<Self> {
        let ledger = Self::build(store, settings);

        let pairs = ledger.store.pairs()?;
        for pair in &pairs {
            ledger
                .commit_locks
                .insert(pair.clone(), Arc::new(Mutex::new(())));
            ledger.index_pair(pair);
        }
        ledger.stats.write().pools = pairs.len();

        info!("Initialized PoolLedger with {} existing pools", pairs.len());
        Ok(ledger)
    }

    fn build(store: Arc<dyn PoolStore>, settings: &LedgerSettings) -> Self {
        Self {
            store,
            commit_locks: DashMap::new(),
            token_index: DashMap::new(),
            lock_timeout: settings.commit_lock_timeout(),
            event_buffer: settings.event_buffer.max(1),
            stats: Arc::new(RwLock::new(LedgerStats::default())),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a new pool
    ///
    /// Fails with `DuplicatePool` when the pair already has a pool, leaving the
    /// existing pool untouched.
    pub fn create_pool(
        &self,
        pair: PairKey,
        reserve_a: u64,
        reserve_b: u64,
        fee_bps: u32,
        authority: Authority,
    ) -> Result<PoolRecord> {
        if reserve_a == 0 || reserve_b == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        ConstantProduct::fee_multiplier(fee_bps)?;

        let now = now_ns();
        let record = PoolRecord {
            pair: pair.clone(),
            reserve_a,
            reserve_b,
            fee_bps,
            authority,
            created_at_ns: now,
            last_update_ns: now,
            swap_count: 0,
        };

        // The store decides duplicates; no map shard is held across the call
        if !self.store.insert_pool(record.clone())? {
            return Err(LedgerError::DuplicatePool { pair });
        }
        self.commit_locks
            .entry(pair.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())));
        self.index_pair(&pair);

        {
            let mut stats = self.stats.write();
            stats.pools += 1;
            stats.last_update_ns = now;
        }

        info!(
            pair = %pair,
            reserve_a,
            reserve_b,
            fee_bps,
            authority = %record.authority,
            "Pool created"
        );
        Ok(record)
    }

    /// Current reserves and fee of a pool
    pub fn get_reserves(&self, pair: &PairKey) -> Result<PoolReserves> {
        Ok(self.pool(pair)?.reserves())
    }

    /// Full record of a pool
    pub fn pool(&self, pair: &PairKey) -> Result<PoolRecord> {
        self.store
            .read_pool(pair)?
            .ok_or_else(|| LedgerError::PoolNotFound { pair: pair.clone() })
    }

    /// Every pool in the ledger
    pub fn pools(&self) -> Result<Vec<PoolRecord>> {
        let mut records = Vec::new();
        for pair in self.store.pairs()? {
            if let Some(record) = self.store.read_pool(&pair)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Pools containing a token
    pub fn pairs_with_token(&self, token: &TokenId) -> Vec<PairKey> {
        self.token_index
            .get(token)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Apply an already-computed swap to a pool
    ///
    /// Rejects a commit that would drain the output reserve, overflow the input
    /// reserve, or lower `k`. Most callers want
    /// [`SlippageGuard::execute_swap`](crate::SlippageGuard::execute_swap),
    /// which computes the output under the same lock.
    pub fn commit_swap(
        &self,
        pair: &PairKey,
        direction: Direction,
        amount_in: u64,
        amount_out: u64,
    ) -> Result<SwapReceipt> {
        self.transact(pair, |txn| txn.commit(direction, amount_in, amount_out))
    }

    pub fn stats(&self) -> LedgerStats {
        self.stats.read().clone()
    }

    /// Receive a [`SwapEvent`] for every swap committed from now on
    ///
    /// Each subscriber gets a bounded buffer. Commits never wait on a slow
    /// reader; events that do not fit are dropped and counted in
    /// [`LedgerStats::events_dropped`].
    pub fn subscribe(&self) -> Receiver<SwapEvent> {
        let (tx, rx) = crossbeam_channel::bounded(self.event_buffer);
        self.subscribers.lock().push(tx);
        rx
    }

    /// Run `f` as the pool's critical section
    ///
    /// `f` sees a fresh snapshot and stages at most one commit; the staged
    /// reserves are written only if `f` returns `Ok`.
    pub(crate) fn transact<T, F>(&self, pair: &PairKey, f: F) -> Result<T>
    where
        F: FnOnce(&mut PoolTxn) -> Result<T>,
    {
        let lock = self.commit_lock(pair)?;
        let _guard = lock.try_lock_for(self.lock_timeout).ok_or_else(|| {
            warn!(pair = %pair, timeout = ?self.lock_timeout, "Commit lock not acquired");
            LedgerError::CommitContention {
                pair: pair.clone(),
                waited_ms: self.lock_timeout.as_millis() as u64,
            }
        })?;

        let record = self
            .store
            .read_pool(pair)?
            .ok_or_else(|| LedgerError::PoolNotFound { pair: pair.clone() })?;

        let mut txn = PoolTxn {
            record,
            staged: None,
        };
        let value = f(&mut txn)?;

        if let Some(staged) = txn.staged {
            self.apply(&txn.record, staged)?;
        }
        Ok(value)
    }

    pub(crate) fn record_rejection(&self) {
        self.stats.write().swaps_rejected += 1;
    }

    fn apply(&self, record: &PoolRecord, staged: StagedSwap) -> Result<()> {
        let now = now_ns();
        self.store.write_pool(
            &record.pair,
            ReserveUpdate {
                reserve_a: record.reserve_a,
                reserve_b: record.reserve_b,
                updated_ns: now,
            },
        )?;

        {
            let mut stats = self.stats.write();
            stats.swaps_committed += 1;
            stats.last_update_ns = now;
        }

        info!(
            pair = %record.pair,
            direction = %staged.direction,
            amount_in = staged.amount_in,
            amount_out = staged.amount_out,
            reserve_a = record.reserve_a,
            reserve_b = record.reserve_b,
            "Swap committed"
        );

        self.publish(SwapEvent {
            pair: record.pair.clone(),
            direction: staged.direction,
            amount_in: staged.amount_in,
            amount_out: staged.amount_out,
            timestamp_ns: now,
        });
        Ok(())
    }

    fn publish(&self, event: SwapEvent) {
        let mut full = 0;
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                full += 1;
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });

        let dropped = before - subscribers.len();
        drop(subscribers);
        if dropped > 0 {
            debug!("Dropped {} disconnected swap event subscribers", dropped);
        }
        if full > 0 {
            self.stats.write().events_dropped += full;
            warn!(
                pair = %event.pair,
                subscribers = full,
                "Swap event not delivered, subscriber buffer full"
            );
        }
    }

    fn commit_lock(&self, pair: &PairKey) -> Result<Arc<Mutex<()>>> {
        if let Some(lock) = self.commit_locks.get(pair) {
            return Ok(lock.value().clone());
        }

        // Pool written to the store behind the ledger's back
        if self.store.read_pool(pair)?.is_none() {
            return Err(LedgerError::PoolNotFound { pair: pair.clone() });
        }
        let lock = self
            .commit_locks
            .entry(pair.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        self.index_pair(pair);
        Ok(lock)
    }

    fn index_pair(&self, pair: &PairKey) {
        for token in [pair.token_a(), pair.token_b()] {
            let mut pairs = self.token_index.entry(token.clone()).or_default();
            if !pairs.contains(pair) {
                pairs.push(pair.clone());
            }
        }
    }
}

/// A swap staged inside a critical section
#[derive(Debug, Clone, Copy)]
struct StagedSwap {
    direction: Direction,
    amount_in: u64,
    amount_out: u64,
}

/// View of one pool inside its critical section
pub(crate) struct PoolTxn {
    record: PoolRecord,
    staged: Option<StagedSwap>,
}

impl PoolTxn {
    pub(crate) fn reserves(&self) -> PoolReserves {
        self.record.reserves()
    }

    /// Stage a swap against the snapshot
    pub(crate) fn commit(
        &mut self,
        direction: Direction,
        amount_in: u64,
        amount_out: u64,
    ) -> Result<SwapReceipt> {
        debug_assert!(self.staged.is_none(), "one swap per transaction");

        if amount_in == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let reserves = self.record.reserves();
        let (reserve_in, reserve_out) = reserves.oriented(direction);

        if amount_out >= reserve_out {
            return Err(LedgerError::InsufficientLiquidity {
                reserve_in,
                reserve_out,
            });
        }

        let new_reserve_in = reserve_in
            .checked_add(amount_in)
            .ok_or(LedgerError::MathOverflow {
                context: "reserve_in + amount_in",
            })?;
        let new_reserve_out = reserve_out - amount_out;

        let k_before = reserves.invariant();
        let k_after = ConstantProduct::invariant(new_reserve_in, new_reserve_out);
        if k_after < k_before {
            return Err(LedgerError::InvariantViolation { k_before, k_after });
        }

        match direction {
            Direction::AToB => {
                self.record.reserve_a = new_reserve_in;
                self.record.reserve_b = new_reserve_out;
            }
            Direction::BToA => {
                self.record.reserve_b = new_reserve_in;
                self.record.reserve_a = new_reserve_out;
            }
        }
        self.staged = Some(StagedSwap {
            direction,
            amount_in,
            amount_out,
        });

        Ok(SwapReceipt {
            amount_in,
            amount_out,
            new_reserve_in,
            new_reserve_out,
        })
    }
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn sol_usdt() -> PairKey {
        PairKey::from_strs("SOL", "USDT").unwrap()
    }

    fn ledger_with_pool(reserve_a: u64, reserve_b: u64, fee_bps: u32) -> PoolLedger {
        let ledger = PoolLedger::new();
        ledger
            .create_pool(sol_usdt(), reserve_a, reserve_b, fee_bps, Authority::new("admin"))
            .unwrap();
        ledger
    }

    #[test]
    fn test_create_and_read_pool() {
        let ledger = ledger_with_pool(1_000_000_000_000, 50_000_000_000, 30);

        let reserves = ledger.get_reserves(&sol_usdt()).unwrap();
        assert_eq!(reserves.reserve_a, 1_000_000_000_000);
        assert_eq!(reserves.reserve_b, 50_000_000_000);
        assert_eq!(reserves.fee_bps, 30);

        let record = ledger.pool(&sol_usdt()).unwrap();
        assert_eq!(record.authority, Authority::new("admin"));
        assert_eq!(record.swap_count, 0);
        assert_eq!(ledger.stats().pools, 1);
    }

    #[test]
    fn test_duplicate_pool_keeps_original() {
        let ledger = ledger_with_pool(1_000, 2_000, 30);

        // Reversed token order names the same pool
        let same_pair = PairKey::from_strs("USDT", "SOL").unwrap();
        let err = ledger
            .create_pool(same_pair, 5, 5, 0, Authority::new("other"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicatePool { .. }));

        let reserves = ledger.get_reserves(&sol_usdt()).unwrap();
        assert_eq!((reserves.reserve_a, reserves.reserve_b), (1_000, 2_000));
        assert_eq!(ledger.stats().pools, 1);
    }

    #[test]
    fn test_create_rejects_bad_inputs() {
        let ledger = PoolLedger::new();
        let admin = Authority::new("admin");

        assert_eq!(
            ledger.create_pool(sol_usdt(), 0, 10, 30, admin.clone()),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(
            ledger.create_pool(sol_usdt(), 10, 10, 10_000, admin.clone()),
            Err(LedgerError::InvalidFee { fee_bps: 10_000 })
        );
        assert!(matches!(
            ledger.get_reserves(&sol_usdt()),
            Err(LedgerError::PoolNotFound { .. })
        ));
        assert_eq!(ledger.stats().pools, 0);
    }

    #[test]
    fn test_commit_swap_updates_reserves_and_emits_event() {
        let ledger = ledger_with_pool(1_000, 2_000, 30);
        let events = ledger.subscribe();

        let receipt = ledger
            .commit_swap(&sol_usdt(), Direction::AToB, 100, 180)
            .unwrap();
        assert_eq!(receipt.new_reserve_in, 1_100);
        assert_eq!(receipt.new_reserve_out, 1_820);

        let record = ledger.pool(&sol_usdt()).unwrap();
        assert_eq!((record.reserve_a, record.reserve_b), (1_100, 1_820));
        assert_eq!(record.swap_count, 1);

        let event = events.try_recv().unwrap();
        assert_eq!(event.pair, sol_usdt());
        assert_eq!(event.direction, Direction::AToB);
        assert_eq!((event.amount_in, event.amount_out), (100, 180));
        assert!(events.try_recv().is_err());

        assert_eq!(ledger.stats().swaps_committed, 1);
    }

    #[test]
    fn test_commit_swap_b_to_a_orientation() {
        let ledger = ledger_with_pool(1_000, 2_000, 0);

        ledger
            .commit_swap(&sol_usdt(), Direction::BToA, 200, 90)
            .unwrap();

        let reserves = ledger.get_reserves(&sol_usdt()).unwrap();
        assert_eq!((reserves.reserve_a, reserves.reserve_b), (910, 2_200));
    }

    #[test]
    fn test_commit_rejects_draining_and_overflow() {
        let ledger = ledger_with_pool(u64::MAX - 10, 1_000, 0);
        let pair = sol_usdt();

        assert!(matches!(
            ledger.commit_swap(&pair, Direction::BToA, 1, u64::MAX - 10),
            Err(LedgerError::InsufficientLiquidity { .. })
        ));
        assert_eq!(
            ledger.commit_swap(&pair, Direction::AToB, 11, 1),
            Err(LedgerError::MathOverflow {
                context: "reserve_in + amount_in"
            })
        );

        let reserves = ledger.get_reserves(&pair).unwrap();
        assert_eq!((reserves.reserve_a, reserves.reserve_b), (u64::MAX - 10, 1_000));
        assert_eq!(ledger.stats().swaps_committed, 0);
    }

    #[test]
    fn test_commit_rejects_invariant_decrease() {
        let ledger = ledger_with_pool(1_000, 1_000, 0);

        let err = ledger
            .commit_swap(&sol_usdt(), Direction::AToB, 1, 500)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvariantViolation { .. }));
        assert_eq!(ledger.pool(&sol_usdt()).unwrap().swap_count, 0);
    }

    #[test]
    fn test_failed_transaction_writes_nothing() {
        let ledger = ledger_with_pool(1_000, 2_000, 30);
        let events = ledger.subscribe();

        let result: Result<()> = ledger.transact(&sol_usdt(), |txn| {
            txn.commit(Direction::AToB, 100, 180)?;
            Err(LedgerError::InvalidAmount)
        });
        assert_eq!(result, Err(LedgerError::InvalidAmount));

        let reserves = ledger.get_reserves(&sol_usdt()).unwrap();
        assert_eq!((reserves.reserve_a, reserves.reserve_b), (1_000, 2_000));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_contention_is_bounded() {
        let ledger = Arc::new(PoolLedger::with_lock_timeout(Duration::from_millis(20)));
        let pair = sol_usdt();
        ledger
            .create_pool(pair.clone(), 1_000, 2_000, 30, Authority::new("admin"))
            .unwrap();

        let (entered_tx, entered_rx) = crossbeam_channel::bounded::<()>(0);
        let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);

        let holder = {
            let ledger = Arc::clone(&ledger);
            let pair = pair.clone();
            thread::spawn(move || {
                ledger.transact(&pair, |_txn| {
                    entered_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    Ok(())
                })
            })
        };

        entered_rx.recv().unwrap();
        let err = ledger
            .commit_swap(&pair, Direction::AToB, 100, 180)
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(
            err,
            LedgerError::CommitContention {
                pair: pair.clone(),
                waited_ms: 20
            }
        );

        release_tx.send(()).unwrap();
        holder.join().unwrap().unwrap();

        // Lock released: the same commit now goes through
        ledger
            .commit_swap(&pair, Direction::AToB, 100, 180)
            .unwrap();
    }

    #[test]
    fn test_token_index() {
        let ledger = PoolLedger::new();
        let admin = Authority::new("admin");
        let sol_usdc = PairKey::from_strs("SOL", "USDC").unwrap();

        ledger
            .create_pool(sol_usdt(), 10, 10, 30, admin.clone())
            .unwrap();
        ledger
            .create_pool(sol_usdc.clone(), 10, 10, 30, admin)
            .unwrap();

        let sol = TokenId::new("SOL").unwrap();
        let mut with_sol = ledger.pairs_with_token(&sol);
        with_sol.sort();
        assert_eq!(with_sol, vec![sol_usdc, sol_usdt()]);

        let usdt = TokenId::new("USDT").unwrap();
        assert_eq!(ledger.pairs_with_token(&usdt), vec![sol_usdt()]);
        assert_eq!(ledger.pools().unwrap().len(), 2);
    }

    #[test]
    fn test_with_store_adopts_existing_pools() {
        let store = Arc::new(InMemoryPoolStore::new());
        store
            .insert_pool(PoolRecord {
                pair: sol_usdt(),
                reserve_a: 1_000,
                reserve_b: 2_000,
                fee_bps: 30,
                authority: Authority::new("migrated"),
                created_at_ns: 0,
                last_update_ns: 0,
                swap_count: 7,
            })
            .unwrap();

        let ledger = PoolLedger::with_store(store.clone(), &LedgerSettings::default()).unwrap();
        assert_eq!(ledger.stats().pools, 1);

        ledger
            .commit_swap(&sol_usdt(), Direction::AToB, 100, 180)
            .unwrap();
        assert_eq!(store.read_pool(&sol_usdt()).unwrap().unwrap().swap_count, 8);

        let err = ledger
            .create_pool(sol_usdt(), 1, 1, 0, Authority::new("admin"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicatePool { .. }));
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let ledger = ledger_with_pool(1_000, 2_000, 0);
        let kept = ledger.subscribe();
        drop(ledger.subscribe());

        ledger
            .commit_swap(&sol_usdt(), Direction::AToB, 10, 1)
            .unwrap();

        assert!(kept.try_recv().is_ok());
        assert_eq!(ledger.subscribers.lock().len(), 1);
    }

    #[test]
    fn test_slow_subscriber_does_not_block_commits() {
        let ledger = PoolLedger::from_settings(&LedgerSettings {
            event_buffer: 2,
            ..LedgerSettings::default()
        });
        ledger
            .create_pool(sol_usdt(), 1_000_000, 2_000_000, 30, Authority::new("admin"))
            .unwrap();
        let lagging = ledger.subscribe();

        for _ in 0..5 {
            ledger
                .commit_swap(&sol_usdt(), Direction::AToB, 100, 150)
                .unwrap();
        }

        let stats = ledger.stats();
        assert_eq!(stats.swaps_committed, 5);
        assert_eq!(stats.events_dropped, 3);
        assert_eq!(lagging.len(), 2);

        // Still subscribed once it catches up
        while lagging.try_recv().is_ok() {}
        ledger
            .commit_swap(&sol_usdt(), Direction::BToA, 100, 40)
            .unwrap();
        assert_eq!(lagging.try_recv().unwrap().direction, Direction::BToA);
        assert_eq!(ledger.subscribers.lock().len(), 1);
    }

    /// Store whose inserts wait until the test lets them through
    struct GatedStore {
        inner: InMemoryPoolStore,
        entered: Sender<()>,
        release: Receiver<()>,
    }

    impl PoolStore for GatedStore {
        fn read_pool(&self, pair: &PairKey) -> Result<Option<PoolRecord>> {
            self.inner.read_pool(pair)
        }

        fn insert_pool(&self, record: PoolRecord) -> Result<bool> {
            self.entered.send(()).unwrap();
            self.release.recv().unwrap();
            self.inner.insert_pool(record)
        }

        fn write_pool(&self, pair: &PairKey, update: ReserveUpdate) -> Result<()> {
            self.inner.write_pool(pair, update)
        }

        fn pairs(&self) -> Result<Vec<PairKey>> {
            self.inner.pairs()
        }
    }

    #[test]
    fn test_slow_store_insert_does_not_block_swaps() {
        let (entered_tx, entered_rx) = crossbeam_channel::bounded::<()>(0);
        let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);
        let store = Arc::new(GatedStore {
            inner: InMemoryPoolStore::new(),
            entered: entered_tx,
            release: release_rx,
        });
        let ledger = Arc::new(PoolLedger::with_store(store, &LedgerSettings::default()).unwrap());

        let creator = {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                ledger.create_pool(sol_usdt(), 1_000, 2_000, 30, Authority::new("admin"))
            })
        };
        entered_rx.recv().unwrap();

        // Insert in flight: a swap on the same pair answers instead of waiting
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                let result = ledger.commit_swap(&sol_usdt(), Direction::AToB, 100, 180);
                done_tx.send(result).unwrap();
            });
        }
        let result = done_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(result, Err(LedgerError::PoolNotFound { .. })));

        release_tx.send(()).unwrap();
        creator.join().unwrap().unwrap();

        ledger
            .commit_swap(&sol_usdt(), Direction::AToB, 100, 180)
            .unwrap();
        assert_eq!(ledger.stats().pools, 1);
    }
}
