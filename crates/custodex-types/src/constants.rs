//! System-wide constants for the Custodex engine.

/// Denominator for integer percentage fees (fee = amount * percent / 100).
pub const PERCENT_DENOMINATOR: u32 = 100;

/// Fill fee percentage of the reference deployment.
pub const DEFAULT_FEE_PERCENT: u32 = 10;

/// The ID assigned to the first order ever created.
pub const FIRST_ORDER_ID: u64 = 1;

/// Decimal places of the reference asset deployments (smallest-unit scale).
pub const DEFAULT_ASSET_DECIMALS: u32 = 18;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Custodex";
