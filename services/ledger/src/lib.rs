//! # Pool Ledger - Authoritative Reserve State
//!
//! ## Purpose
//!
//! Owns the reserves of every constant-product pool and is the only component
//! allowed to change them. Swaps are computed and committed inside a per-pool
//! critical section, so concurrent swaps on one pool behave exactly as if they
//! had run one after another, and a failed swap changes nothing.
//!
//! ## Integration Points
//!
//! - **Input**: [`SwapRequest`](types::SwapRequest)s via [`SlippageGuard`],
//!   pool creation from an administrative caller
//! - **Storage**: any [`PoolStore`] implementation, [`InMemoryPoolStore`] by default
//! - **Output**: [`SwapReceipt`](types::SwapReceipt)s to callers,
//!   [`SwapEvent`](types::SwapEvent)s to subscribers
//! - **Readers**: the route aggregator's local venue reads reserves without locking
//!
//! ## Architecture Role
//!
//! ```text
//! SwapRequest → [SlippageGuard] ──lock(pair)──→ [PoolLedger] ──→ [PoolStore]
//!                     ↓                              ↓
//!              ConstantProduct               SwapEvent subscribers
//!              minimum_amount_out check      LedgerStats
//! ```
//!
//! ## Concurrency
//!
//! One `parking_lot::Mutex` per pool, acquired with a bounded wait. Pools never
//! share a lock and no operation holds two pool locks, so there is no lock
//! ordering to get wrong. A wait that exceeds `commit_lock_timeout_ms` fails
//! with [`LedgerError::CommitContention`] instead of blocking indefinitely.

pub mod error;
pub mod guard;
pub mod ledger;
pub mod store;

pub use error::{LedgerError, Result};
pub use guard::SlippageGuard;
pub use ledger::{LedgerStats, PoolLedger};
pub use store::{Authority, InMemoryPoolStore, PoolRecord, PoolStore, ReserveUpdate};
