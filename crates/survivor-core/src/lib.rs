//! Core machinery for the Loot Survivor leaderboard pipeline: crawl game
//! events from a Starknet RPC provider, decode them into typed records,
//! and reduce the resulting event log into player leaderboards.

pub mod abi;
pub mod crawler;
pub mod deployment;
pub mod error;
pub mod events;
pub mod felt;
pub mod leaderboard;
pub mod provider;
pub mod stream;

pub use error::Error;
