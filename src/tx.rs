//! XRPL operation payloads and query result records.
//!
//! `Operation` serializes to the ledger's canonical JSON field names; the
//! node's sign-and-submit mode handles signing and the binary transaction
//! format. The `*_from_result` helpers decode JSON-RPC results into the
//! plain records the orchestrator works with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DemoError;

/// Type discriminator for escrow entries in an account's owned-object set.
/// `AccountObjectRecord::kind` is normalized to lowercase at ingestion.
pub const ESCROW_OBJECT_TYPE: &str = "escrow";

/// A submittable ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "TransactionType")]
pub enum Operation {
    /// Lock `amount` drops from `account` toward `destination`, finishable
    /// once the ledger close time passes `finish_after` (ripple time).
    EscrowCreate {
        #[serde(rename = "Account")]
        account: String,
        #[serde(rename = "Destination")]
        destination: String,
        #[serde(rename = "Amount")]
        amount: String,
        #[serde(rename = "FinishAfter")]
        finish_after: u32,
    },
    /// Release the escrow created by `owner` under `offer_sequence`.
    EscrowFinish {
        #[serde(rename = "Account")]
        account: String,
        #[serde(rename = "Owner")]
        owner: String,
        #[serde(rename = "OfferSequence")]
        offer_sequence: u32,
    },
}

impl Operation {
    pub fn escrow_create(
        account: impl Into<String>,
        destination: impl Into<String>,
        amount_drops: u64,
        finish_after: u32,
    ) -> Self {
        Self::EscrowCreate {
            account: account.into(),
            destination: destination.into(),
            amount: amount_drops.to_string(),
            finish_after,
        }
    }

    pub fn escrow_finish(
        account: impl Into<String>,
        owner: impl Into<String>,
        offer_sequence: u32,
    ) -> Self {
        Self::EscrowFinish {
            account: account.into(),
            owner: owner.into(),
            offer_sequence,
        }
    }

    pub fn transaction_type(&self) -> &'static str {
        match self {
            Self::EscrowCreate { .. } => "EscrowCreate",
            Self::EscrowFinish { .. } => "EscrowFinish",
        }
    }
}

/// Outcome of a signed, submitted, and validated operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub hash: String,
    pub engine_result: String,
    pub engine_result_message: String,
    pub validated: bool,
}

impl TransactionResult {
    pub fn is_success(&self) -> bool {
        self.validated && self.engine_result == "tesSUCCESS"
    }
}

/// One entry of an account's owned-object set, reduced to the fields the
/// demonstration cares about. `sequence` is the creating transaction's
/// sequence number; the ledger assigns it, so for escrow entries it may
/// still need resolving through `previous_txn_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountObjectRecord {
    pub kind: String,
    pub sequence: Option<u32>,
    pub destination: Option<String>,
    pub amount: Option<String>,
    pub finish_after: Option<u32>,
    pub previous_txn_id: Option<String>,
}

/// Summary of a validated ledger and its transaction id list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub ledger_index: u32,
    /// Close time in ripple time.
    pub close_time: u32,
    pub transactions: Vec<String>,
}

/// Detail of a single transaction, for the ledger-inspection diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub hash: String,
    pub transaction_type: String,
    pub account: Option<String>,
    pub amount: Option<String>,
}

/// All records whose type discriminator is exactly `escrow`.
pub fn escrow_records(objects: &[AccountObjectRecord]) -> Vec<&AccountObjectRecord> {
    objects
        .iter()
        .filter(|o| o.kind == ESCROW_OBJECT_TYPE)
        .collect()
}

/// First escrow record, if any.
pub fn first_escrow(objects: &[AccountObjectRecord]) -> Option<&AccountObjectRecord> {
    objects.iter().find(|o| o.kind == ESCROW_OBJECT_TYPE)
}

/// Decode the object list of an `account_objects` result.
///
/// `LedgerEntryType` is lowercased into `kind`. Escrow entries do not carry
/// their creating sequence, so `sequence` stays `None` here and the client
/// resolves it through `previous_txn_id`.
pub fn account_object_records(result: &Value) -> Vec<AccountObjectRecord> {
    let objects = result["account_objects"].as_array();
    objects
        .into_iter()
        .flatten()
        .map(|obj| AccountObjectRecord {
            kind: obj["LedgerEntryType"]
                .as_str()
                .unwrap_or_default()
                .to_ascii_lowercase(),
            sequence: obj["Sequence"].as_u64().map(|s| s as u32),
            destination: obj["Destination"].as_str().map(str::to_string),
            amount: obj["Amount"].as_str().map(str::to_string),
            finish_after: obj["FinishAfter"].as_u64().map(|t| t as u32),
            previous_txn_id: obj["PreviousTxnID"].as_str().map(str::to_string),
        })
        .collect()
}

/// Decode the spendable balance (drops) out of an `account_info` result.
pub fn balance_from_result(result: &Value) -> Result<u64, DemoError> {
    result["account_data"]["Balance"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| DemoError::Query("account_info: missing or malformed Balance".into()))
}

/// Decode a `ledger` result into a summary.
///
/// The ledger index arrives as a number at the result level and as a string
/// inside the ledger header; accept either.
pub fn ledger_summary_from_result(result: &Value) -> Result<LedgerSummary, DemoError> {
    let ledger = &result["ledger"];
    let ledger_index = result["ledger_index"]
        .as_u64()
        .or_else(|| ledger["ledger_index"].as_u64())
        .or_else(|| {
            ledger["ledger_index"]
                .as_str()
                .and_then(|s| s.parse::<u64>().ok())
        })
        .ok_or_else(|| DemoError::Query("ledger: missing ledger_index".into()))?;
    let close_time = ledger["close_time"]
        .as_u64()
        .ok_or_else(|| DemoError::Query("ledger: missing close_time".into()))?;
    let transactions = ledger["transactions"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|t| t.as_str().map(str::to_string))
        .collect();
    Ok(LedgerSummary {
        ledger_index: ledger_index as u32,
        close_time: close_time as u32,
        transactions,
    })
}

/// Decode a `tx` result into a detail record.
///
/// API v2 nests the transaction under `tx_json`; v1 puts the fields at the
/// result level. `fallback_hash` covers servers that omit the hash.
pub fn transaction_detail_from_result(result: &Value, fallback_hash: &str) -> TransactionDetail {
    let tx = if result["tx_json"].is_object() {
        &result["tx_json"]
    } else {
        result
    };
    let hash = result["hash"]
        .as_str()
        .or_else(|| tx["hash"].as_str())
        .unwrap_or(fallback_hash)
        .to_string();
    TransactionDetail {
        hash,
        transaction_type: tx["TransactionType"]
            .as_str()
            .unwrap_or("Unknown")
            .to_string(),
        account: tx["Account"].as_str().map(str::to_string),
        amount: tx["Amount"].as_str().map(str::to_string),
    }
}

/// Pull the creating sequence number out of a `tx` result.
pub fn sequence_from_tx_result(result: &Value) -> Option<u32> {
    let tx = if result["tx_json"].is_object() {
        &result["tx_json"]
    } else {
        result
    };
    tx["Sequence"].as_u64().map(|s| s as u32)
}
