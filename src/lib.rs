//! Ajo - savings circle contract client
//!
//! Client library for an ajo (rotating savings circle) smart contract:
//! typed wire codec, address reconciliation, domain normalization, read
//! queries, swap estimation, and multi-step transaction flows with
//! confirmation polling.
//!
//! ## Architecture
//!
//! Reads go `rpc` → `contract` → `query`, funneling every limb pair and
//! tagged enum through `codec` before domain code sees it. Writes are
//! driven by `flow`, which owns the approve → (swap →) execute state
//! machine and polls the wallet connector for inclusion. The connector
//! itself is an injected capability; this crate never touches keys.

// Wire format: u256 limb pairs, tagged-union enums, fixed-point amounts
pub mod codec;

// Wallet address normalization across hex/decimal/padded forms
pub mod address;

// Domain entities and closed wire enums
pub mod types;

// Derived fields: cadence labels, statuses, tiers, tags, deadlines
pub mod normalize;

// Structured error taxonomy
pub mod errors;

// JSON-RPC transport
pub mod rpc;

// Contract ABI bindings and the caller/wallet seams
pub mod contract;

// Read-only queries with bounded discovery and fault-tolerant batching
pub mod query;

// Swap quoting with static fallback rates
pub mod swap;

// Transaction flow state machine
pub mod flow;

// Two-key wallet session store
pub mod session;

// CLI/env/TOML configuration
pub mod config;
