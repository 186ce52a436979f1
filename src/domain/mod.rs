//! Domain types: money, ledger entries, accounts and transfers.

pub mod account;
pub mod ledger;
pub mod money;
pub mod ports;
pub mod transfer;
