//! Identity provisioning.
//!
//! `FaucetProvisioner` asks the testnet faucet to generate and fund a fresh
//! account, then waits for the funding to validate. If the faucet is down,
//! the operator can hand in credentials at an interactive prompt instead.

use std::io::{self, Write as _};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::client::LedgerClient;
use crate::config::DemoConfig;
use crate::error::DemoError;

/// A funded ledger identity: classic address, family seed, and the sequence
/// counter used for transaction ordering. Held in memory for the duration of
/// the demonstration, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub address: String,
    pub seed: String,
    pub sequence: u32,
}

/// Produces funded identities for the demonstration.
#[async_trait]
pub trait IdentityProvisioner: Send + Sync {
    /// Return a usable identity or fail the whole demonstration; there is no
    /// partial success here, the flow cannot proceed without one.
    async fn provision(&self, label: &str) -> Result<Identity, DemoError>;
}

#[derive(Debug, Deserialize)]
struct FaucetAccount {
    #[serde(rename = "classicAddress")]
    classic_address: Option<String>,
    address: Option<String>,
    secret: String,
}

#[derive(Debug, Deserialize)]
struct FaucetResponse {
    account: FaucetAccount,
}

/// Testnet faucet provisioner with an interactive manual fallback.
pub struct FaucetProvisioner<C> {
    faucet_url: String,
    http: Client,
    ledger: C,
    funding_timeout: Duration,
    poll_interval: Duration,
}

impl<C: LedgerClient> FaucetProvisioner<C> {
    /// `ledger` is used to watch the faucet's funding payment validate.
    pub fn new(config: &DemoConfig, ledger: C) -> Result<Self, DemoError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DemoError::Provisioning(format!("http client: {e}")))?;
        Ok(Self {
            faucet_url: config.endpoints.faucet.clone(),
            http,
            ledger,
            funding_timeout: config.funding_timeout,
            poll_interval: config.poll_interval,
        })
    }

    async fn request_funding(&self, label: &str) -> Result<Identity, DemoError> {
        debug!(label, "requesting faucet funding");
        let resp = self
            .http
            .post(&self.faucet_url)
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| DemoError::Provisioning(format!("faucet request: {e}")))?
            .error_for_status()
            .map_err(|e| DemoError::Provisioning(format!("faucet rejected request: {e}")))?;
        let funded: FaucetResponse = resp
            .json()
            .await
            .map_err(|e| DemoError::Provisioning(format!("faucet response: {e}")))?;
        let address = funded
            .account
            .classic_address
            .or(funded.account.address)
            .ok_or_else(|| {
                DemoError::Provisioning("faucet response carries no account address".into())
            })?;
        let identity = Identity {
            address,
            seed: funded.account.secret,
            sequence: 0,
        };
        self.wait_for_funding(&identity.address).await?;
        Ok(identity)
    }

    /// Poll the account balance until the faucet payment validates.
    /// `account_info` errors with `actNotFound` until then, so query
    /// failures count as "not yet".
    async fn wait_for_funding(&self, address: &str) -> Result<(), DemoError> {
        let started = Instant::now();
        loop {
            match self.ledger.balance(address).await {
                Ok(drops) if drops > 0 => {
                    debug!(address, drops, "faucet funding validated");
                    return Ok(());
                }
                Ok(_) | Err(DemoError::Query(_)) => {}
                Err(e) => return Err(e),
            }
            if started.elapsed() > self.funding_timeout {
                return Err(DemoError::Provisioning(format!(
                    "faucet funding for {address} never validated"
                )));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Interactive fallback: read a seed and address from the operator.
    /// The address is prompted for as well because the crate carries no key
    /// derivation of its own.
    fn manual_fallback(&self, label: &str) -> Result<Identity, DemoError> {
        println!("\nFaucet failed for {label}. Please input credentials manually.");
        let seed = prompt(&format!("Enter seed for {label}: "))?;
        if seed.is_empty() {
            return Err(DemoError::Provisioning(format!(
                "no seed provided for {label}"
            )));
        }
        let address = prompt(&format!("Enter address for {label}: "))?;
        if address.is_empty() {
            return Err(DemoError::Provisioning(format!(
                "no address provided for {label}"
            )));
        }
        Ok(Identity {
            address,
            seed,
            sequence: 0,
        })
    }
}

#[async_trait]
impl<C: LedgerClient> IdentityProvisioner for FaucetProvisioner<C> {
    async fn provision(&self, label: &str) -> Result<Identity, DemoError> {
        match self.request_funding(label).await {
            Ok(identity) => Ok(identity),
            Err(e) => {
                warn!(label, err = %e, "faucet provisioning failed");
                println!("\nFaucet error for {label}: {e}");
                self.manual_fallback(label)
            }
        }
    }
}

fn prompt(text: &str) -> Result<String, DemoError> {
    print!("{text}");
    io::stdout()
        .flush()
        .map_err(|e| DemoError::Provisioning(e.to_string()))?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| DemoError::Provisioning(e.to_string()))?;
    Ok(line.trim().to_string())
}
