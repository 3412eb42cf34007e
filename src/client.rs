//! Ledger access.
//!
//! `LedgerClient` is the narrow contract the demonstration needs from an XRP
//! Ledger node; `JsonRpcClient` implements it over the public JSON-RPC API.
//! Submission uses the node's sign-and-submit mode, so signing and the
//! canonical binary transaction format stay on the node side.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::config::DemoConfig;
use crate::error::DemoError;
use crate::tx::{
    account_object_records, balance_from_result, ledger_summary_from_result,
    sequence_from_tx_result, transaction_detail_from_result, AccountObjectRecord, LedgerSummary,
    Operation, TransactionDetail, TransactionResult, ESCROW_OBJECT_TYPE,
};
use crate::wallet::Identity;

/// What the escrow demonstration needs from a ledger node.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Sign (node-side), submit, and block until the network reports the
    /// operation validated or rejected.
    async fn submit_and_confirm(
        &self,
        op: &Operation,
        signer: &Identity,
    ) -> Result<TransactionResult, DemoError>;

    /// Current spendable balance in drops.
    async fn balance(&self, address: &str) -> Result<u64, DemoError>;

    /// Every ledger object owned by the address, with escrow sequences
    /// resolved.
    async fn account_objects(
        &self,
        address: &str,
    ) -> Result<Vec<AccountObjectRecord>, DemoError>;

    /// Latest validated ledger with its transaction id list.
    async fn latest_validated_ledger(&self) -> Result<LedgerSummary, DemoError>;

    /// Detail for a single transaction by hash.
    async fn transaction(&self, hash: &str) -> Result<TransactionDetail, DemoError>;
}

/// JSON-RPC client for a single rippled endpoint.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    url: String,
    http: Client,
    poll_interval: Duration,
    confirm_timeout: Duration,
}

impl JsonRpcClient {
    /// Build a client for `url` with the configured per-request timeout.
    pub fn new(url: impl Into<String>, config: &DemoConfig) -> Result<Self, DemoError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DemoError::Query(format!("http client: {e}")))?;
        Ok(Self {
            url: url.into(),
            http,
            poll_interval: config.poll_interval,
            confirm_timeout: config.confirm_timeout,
        })
    }

    /// Issue one JSON-RPC call and return the `result` object, mapping an
    /// error status to `DemoError::Query`.
    async fn request(&self, method: &str, params: Value) -> Result<Value, DemoError> {
        let body = json!({ "method": method, "params": [params] });
        debug!(method, "ledger rpc request");
        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| {
                error!(method, err = %e, "ledger rpc http failure");
                DemoError::Query(format!("{method}: {e}"))
            })?;
        let envelope: Value = resp.json().await?;
        let result = envelope
            .get("result")
            .cloned()
            .ok_or_else(|| DemoError::Query(format!("{method}: response missing result")))?;
        if result["status"].as_str() == Some("error") {
            let msg = result["error_message"]
                .as_str()
                .or_else(|| result["error"].as_str())
                .unwrap_or("unknown ledger error");
            error!(method, msg, "ledger rpc error");
            return Err(DemoError::Query(format!("{method}: {msg}")));
        }
        Ok(result)
    }

    /// Poll `tx` until the hash shows up validated, bounded by the
    /// confirmation timeout. `txnNotFound` is expected while the network is
    /// still closing ledgers.
    async fn wait_for_validation(
        &self,
        hash: &str,
        engine_result: String,
        message: String,
    ) -> Result<TransactionResult, DemoError> {
        let started = Instant::now();
        loop {
            match self.request("tx", json!({ "transaction": hash })).await {
                Ok(tx) => {
                    if tx["validated"].as_bool() == Some(true) {
                        let final_result = tx["meta"]["TransactionResult"]
                            .as_str()
                            .unwrap_or(&engine_result)
                            .to_string();
                        if final_result != "tesSUCCESS" {
                            return Err(DemoError::Submission {
                                engine_result: final_result,
                                message,
                            });
                        }
                        return Ok(TransactionResult {
                            hash: hash.to_string(),
                            engine_result: final_result,
                            engine_result_message: message,
                            validated: true,
                        });
                    }
                }
                Err(DemoError::Query(msg)) if msg.contains("txnNotFound") => {}
                Err(e) => return Err(e),
            }
            if started.elapsed() > self.confirm_timeout {
                return Err(DemoError::Timeout(format!(
                    "transaction {hash} not validated within {:?}",
                    self.confirm_timeout
                )));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl LedgerClient for JsonRpcClient {
    async fn submit_and_confirm(
        &self,
        op: &Operation,
        signer: &Identity,
    ) -> Result<TransactionResult, DemoError> {
        let params = json!({ "tx_json": op, "secret": signer.seed });
        let result = self.request("submit", params).await?;

        let engine_result = result["engine_result"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let message = result["engine_result_message"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        // ter* codes are retriable by the network itself; anything else
        // besides tesSUCCESS is a hard rejection.
        if engine_result != "tesSUCCESS" && !engine_result.starts_with("ter") {
            return Err(DemoError::Submission {
                engine_result,
                message,
            });
        }
        let hash = result["tx_json"]["hash"]
            .as_str()
            .or_else(|| result["hash"].as_str())
            .ok_or_else(|| DemoError::Query("submit: response missing tx hash".into()))?
            .to_string();
        debug!(
            tx_type = op.transaction_type(),
            %hash,
            "submitted, awaiting validation"
        );
        self.wait_for_validation(&hash, engine_result, message).await
    }

    async fn balance(&self, address: &str) -> Result<u64, DemoError> {
        let result = self
            .request(
                "account_info",
                json!({ "account": address, "ledger_index": "validated" }),
            )
            .await?;
        balance_from_result(&result)
    }

    async fn account_objects(
        &self,
        address: &str,
    ) -> Result<Vec<AccountObjectRecord>, DemoError> {
        let result = self
            .request("account_objects", json!({ "account": address }))
            .await?;
        let mut records = account_object_records(&result);
        // Escrow entries do not carry their creating sequence; the ledger
        // assigned it, so recover it from the entry's previous transaction.
        for record in &mut records {
            if record.kind == ESCROW_OBJECT_TYPE && record.sequence.is_none() {
                if let Some(prev) = record.previous_txn_id.clone() {
                    let tx = self.request("tx", json!({ "transaction": prev })).await?;
                    record.sequence = sequence_from_tx_result(&tx);
                }
            }
        }
        Ok(records)
    }

    async fn latest_validated_ledger(&self) -> Result<LedgerSummary, DemoError> {
        let result = self
            .request(
                "ledger",
                json!({ "ledger_index": "validated", "transactions": true }),
            )
            .await?;
        ledger_summary_from_result(&result)
    }

    async fn transaction(&self, hash: &str) -> Result<TransactionDetail, DemoError> {
        let result = self.request("tx", json!({ "transaction": hash })).await?;
        Ok(transaction_detail_from_result(&result, hash))
    }
}
