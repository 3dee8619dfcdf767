//! # custodex-assets
//!
//! The **Asset Ledger** collaborator of the Custodex engine: an in-memory
//! multi-asset fungible ledger with standard balance / transfer / approve /
//! delegated-transfer semantics.
//!
//! The engine never mutates this ledger directly: it only invokes the
//! ledger's own operations (pulling deposits in via [`AssetBank::transfer_from`],
//! pushing withdrawals out via [`AssetBank::transfer`]) and reads balances.
//! The per-asset snapshot/restore pair exists solely for the engine's
//! flash-loan transactional wrapper.

pub mod bank;

pub use bank::{AssetBank, AssetMeta, AssetSnapshot};
