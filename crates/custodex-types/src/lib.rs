//! # custodex-types
//!
//! Shared types, errors, and configuration for the **Custodex** custodial
//! exchange engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`OrderId`], [`Asset`]
//! - **Order model**: [`Order`], [`OrderStatus`]
//! - **Event model**: [`ExchangeEvent`]
//! - **Configuration**: [`ExchangeConfig`]
//! - **Errors**: [`ExchangeError`] with `CX_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod order;

// Re-export all primary types at crate root for ergonomic imports:
//   use custodex_types::{AccountId, Order, ExchangeEvent, ...};

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use order::*;

// Constants are accessed via `custodex_types::constants::FOO`
// (not re-exported to avoid name collisions).
