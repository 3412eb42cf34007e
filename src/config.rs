//! Demonstration configuration.
//!
//! The RPC endpoints and every tunable live in values passed into the client
//! and orchestrator explicitly; nothing is process-global.

use std::time::Duration;

pub const TESTNET_URL: &str = "https://s.altnet.rippletest.net:51234/";
pub const MAINNET_URL: &str = "https://xrplcluster.com/";
pub const TESTNET_FAUCET_URL: &str = "https://faucet.altnet.rippletest.net/accounts";

/// The preconfigured RPC endpoints. Only the testnet (and its faucet) is
/// exercised by the demonstration flow.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub testnet: String,
    pub mainnet: String,
    pub faucet: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            testnet: TESTNET_URL.to_string(),
            mainnet: MAINNET_URL.to_string(),
            faucet: TESTNET_FAUCET_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub endpoints: Endpoints,
    /// Delay from now until the escrow becomes finishable.
    pub escrow_delay: Duration,
    /// Margin past the release time before attempting EscrowFinish.
    pub maturity_grace: Duration,
    /// Escrowed amount in drops.
    pub escrow_amount: u64,
    /// Sleep between polls of the validated ledger.
    pub poll_interval: Duration,
    /// Bound on waiting for ledger close time to pass the release time.
    pub wait_timeout: Duration,
    /// Bound on waiting for a submitted transaction to validate.
    pub confirm_timeout: Duration,
    /// Per-HTTP-request timeout.
    pub request_timeout: Duration,
    /// Bound on waiting for faucet funding to validate.
    pub funding_timeout: Duration,
}

impl DemoConfig {
    /// Defaults for the public testnet: 1 XRP escrow, 30 s release delay.
    pub fn testnet() -> Self {
        Self {
            endpoints: Endpoints::default(),
            escrow_delay: Duration::from_secs(30),
            maturity_grace: Duration::from_secs(5),
            escrow_amount: 1_000_000,
            poll_interval: Duration::from_secs(2),
            wait_timeout: Duration::from_secs(120),
            confirm_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(30),
            funding_timeout: Duration::from_secs(60),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::testnet()
    }
}
