//! Application layer orchestrating transfers.
//!
//! `TransferCoordinator` serializes every transfer behind one lock and applies the
//! wait-then-retry policy. `TransferEngine` resolves requests against the account
//! store and runs each transfer as its own `tokio` task.

pub mod coordinator;
pub mod engine;
pub mod scenario;
