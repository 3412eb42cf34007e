//! Error taxonomy for the escrow demonstration.
//!
//! "No escrow found" is deliberately not here: it is a normal terminal
//! outcome of the demonstration, reported as `DemoOutcome::NoEscrowFound`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    /// Faucet funding failed and the manual fallback produced nothing usable.
    #[error("provisioning failed: {0}")]
    Provisioning(String),

    /// The ledger engine rejected a submitted operation.
    #[error("submission rejected ({engine_result}): {message}")]
    Submission {
        engine_result: String,
        message: String,
    },

    /// A read operation (ledger, tx, account_objects, balance) failed.
    #[error("query failed: {0}")]
    Query(String),

    /// A bounded wait elapsed before the expected condition held.
    #[error("timed out: {0}")]
    Timeout(String),
}

impl DemoError {
    /// True when the failure looks like the source account ran out of XRP,
    /// so the operator should hit the faucet again.
    pub fn is_insufficient_funds(&self) -> bool {
        match self {
            Self::Submission {
                engine_result,
                message,
            } => {
                engine_result.starts_with("tecUNFUNDED")
                    || engine_result == "terINSUF_FEE_B"
                    || message.to_ascii_lowercase().contains("insufficient")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for DemoError {
    fn from(e: reqwest::Error) -> Self {
        Self::Query(e.to_string())
    }
}
