//! samtracker: discretionary portfolio tracker.
//!
//! Replays a trade log against a cash/positions ledger one trading day at a
//! time and compares the result with a buy-and-hold benchmark.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
