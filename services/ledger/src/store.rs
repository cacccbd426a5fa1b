//! Pool record storage
//!
//! [`PoolStore`] is the ledger-access seam: the ledger reads and writes pool
//! records only through it, so an external persistence layer can replace the
//! in-memory map without touching swap logic. Each method is a single atomic
//! step; read-compute-write atomicity is the ledger's job, not the store's.

use crate::error::{LedgerError, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use types::{PairKey, PoolReserves};

/// Opaque identity of the party that created a pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authoritative state of one pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub pair: PairKey,
    pub reserve_a: u64,
    pub reserve_b: u64,
    /// Fixed at creation
    pub fee_bps: u32,
    pub authority: Authority,
    pub created_at_ns: u64,
    pub last_update_ns: u64,
    pub swap_count: u64,
}

impl PoolRecord {
    pub fn reserves(&self) -> PoolReserves {
        PoolReserves {
            reserve_a: self.reserve_a,
            reserve_b: self.reserve_b,
            fee_bps: self.fee_bps,
        }
    }
}

/// New reserves for an existing pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveUpdate {
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub updated_ns: u64,
}

/// Ledger-access collaborator
pub trait PoolStore: Send + Sync {
    /// Snapshot of a pool, `None` when the pair has no pool
    fn read_pool(&self, pair: &PairKey) -> Result<Option<PoolRecord>>;

    /// Insert a new pool; `false` when one already exists for the pair
    fn insert_pool(&self, record: PoolRecord) -> Result<bool>;

    /// Replace a pool's reserves and count one committed swap
    fn write_pool(&self, pair: &PairKey, update: ReserveUpdate) -> Result<()>;

    /// Every stored pool key
    fn pairs(&self) -> Result<Vec<PairKey>>;
}

/// Process-local store backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryPoolStore {
    pools: DashMap<PairKey, PoolRecord>,
}

impl InMemoryPoolStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl PoolStore for InMemoryPoolStore {
    fn read_pool(&self, pair: &PairKey) -> Result<Option<PoolRecord>> {
        Ok(self.pools.get(pair).map(|entry| entry.value().clone()))
    }

    fn insert_pool(&self, record: PoolRecord) -> Result<bool> {
        match self.pools.entry(record.pair.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(true)
            }
        }
    }

    fn write_pool(&self, pair: &PairKey, update: ReserveUpdate) -> Result<()> {
        let mut record = self
            .pools
            .get_mut(pair)
            .ok_or_else(|| LedgerError::PoolNotFound { pair: pair.clone() })?;

        record.reserve_a = update.reserve_a;
        record.reserve_b = update.reserve_b;
        record.last_update_ns = update.updated_ns;
        record.swap_count += 1;
        Ok(())
    }

    fn pairs(&self) -> Result<Vec<PairKey>> {
        Ok(self.pools.iter().map(|entry| entry.key().clone()).collect())
    }
}
