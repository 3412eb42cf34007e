//! Runs the escrow demonstration against the XRP Ledger testnet.
//!
//! Invoked with no arguments; configuration lives in `DemoConfig::testnet()`.
//! Each phase has its own error boundary: failures are printed and the
//! process still exits 0.

use std::io;

use tracing_subscriber::EnvFilter;

use xrpl_escrow_lab::{print_header, DemoConfig, EscrowDemo, FaucetProvisioner, JsonRpcClient};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DemoConfig::testnet();
    let client = match JsonRpcClient::new(config.endpoints.testnet.as_str(), &config) {
        Ok(client) => client,
        Err(e) => {
            println!("Failed to build ledger client: {e}");
            return;
        }
    };
    let provisioner = match FaucetProvisioner::new(&config, client.clone()) {
        Ok(provisioner) => provisioner,
        Err(e) => {
            println!("Failed to build faucet provisioner: {e}");
            return;
        }
    };
    let mut demo = EscrowDemo::new(client, provisioner, config, io::stdout());

    print_header("Ledger Check");
    if let Err(e) = demo.inspect_latest_ledger().await {
        println!("\nError checking transactions: {e}");
    }

    print_header("Escrow Demonstration");
    match demo.run().await {
        Ok(_) => print_header("Escrow demonstration complete"),
        Err(e) => {
            println!("\nEscrow demonstration failed: {e}");
            if e.is_insufficient_funds() {
                println!("Please ensure your test wallet has enough XRP (try the faucet again)");
            }
        }
    }
}
