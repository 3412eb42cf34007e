//! XRPL Escrow Lab
//!
//! Demonstration crate for the XRP Ledger's native time-locked escrow,
//! driven against the public testnet:
//! - provision two faucet-funded accounts (manual-credential fallback)
//! - create an escrow finishable after a short delay
//! - wait for the validated ledger to pass the release time
//! - discover the escrow object and finish it
//! - report balances before and after
//!
//! Signing and the canonical binary transaction format stay on the node
//! side (sign-and-submit JSON-RPC mode); this crate only sequences the
//! calls.
//!
//! ## Running
//! ```bash
//! cargo run --bin escrow-demo
//! ```

pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod time;
pub mod tx;
pub mod wallet;

pub use client::{JsonRpcClient, LedgerClient};
pub use config::{DemoConfig, Endpoints};
pub use demo::{DemoOutcome, EscrowDemo};
pub use error::DemoError;
pub use tx::{
    escrow_records, first_escrow, AccountObjectRecord, LedgerSummary, Operation,
    TransactionDetail, TransactionResult, ESCROW_OBJECT_TYPE,
};
pub use wallet::{FaucetProvisioner, Identity, IdentityProvisioner};

pub fn print_header(title: &str) {
    println!("\n=== {} ===\n", title);
}
