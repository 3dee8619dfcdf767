//! # custodex-engine
//!
//! **Custodial exchange engine**: a custody ledger of per-(account, asset)
//! balances, an append-only order book of advisory exchange commitments,
//! and an atomic flash-loan primitive over the engine's idle inventory,
//! with every committed state transition recorded in a hash-chained audit
//! log.
//!
//! ## Architecture
//!
//! One [`Exchange`] instance owns:
//! 1. **[`CustodyLedger`]**: the balances the engine holds per account
//! 2. **[`OrderBook`]**: orders with a monotonic ID counter, never deleted
//! 3. **[`EventLog`]**: the append-only audit trail
//!
//! The external asset ledger ([`custodex_assets::AssetBank`]) is passed
//! `&mut` into the operations that cross the custody boundary (deposit,
//! withdraw, flash loan); purely internal operations (orders, fills) never
//! touch it.
//!
//! ## Execution model
//!
//! Single-writer and synchronous: the host runs each public operation to
//! completion with no interleaving. Every operation is all-or-nothing: on
//! any failure no mutation persists and no event is recorded. A
//! multi-threaded host must serialize access to the engine (one dispatcher
//! or a per-engine mutex held across each whole operation).

pub mod audit;
pub mod book;
pub mod custody;
pub mod engine;
pub mod flash;

pub use audit::{EventLog, EventRecord};
pub use book::OrderBook;
pub use custody::CustodyLedger;
pub use engine::Exchange;
pub use flash::FlashLoanReceiver;
