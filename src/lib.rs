pub mod account;
pub mod basket;
pub mod broadcast;
pub mod chain;
pub mod cli;
pub mod endpoint;
pub mod error;
pub mod keys;
pub mod msg;
pub mod query;
pub mod txs;
pub mod utils;

pub type Result<O> = anyhow::Result<O>;

/// BIP-44 coin type used when a chain entry does not set one.
pub const DEFAULT_COIN_TYPE: u64 = 330;
