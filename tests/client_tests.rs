//! Wire-shape and time-codec tests on canned JSON-RPC fixtures.
//!
//! These pin the field names the node expects (operations) and the shapes
//! this crate accepts back (queries), for both API v1 (flat) and v2
//! (`tx_json`-nested) transaction responses.

use chrono::{TimeZone, Utc};
use serde_json::json;
use xrpl_escrow_lab::time::{
    ripple_time_now, to_ripple_time, to_unix_seconds, RIPPLE_EPOCH_OFFSET,
};
use xrpl_escrow_lab::tx::{
    account_object_records, balance_from_result, ledger_summary_from_result,
    sequence_from_tx_result, transaction_detail_from_result,
};
use xrpl_escrow_lab::Operation;

// ─── Operation payloads ─────────────────────────────────────

mod operations {
    use super::*;

    #[test]
    fn escrow_create_uses_canonical_field_names() {
        let op = Operation::escrow_create("rAlice", "rBob", 1_000_000, 694_310_400);
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(
            value,
            json!({
                "TransactionType": "EscrowCreate",
                "Account": "rAlice",
                "Destination": "rBob",
                "Amount": "1000000",
                "FinishAfter": 694_310_400,
            })
        );
    }

    #[test]
    fn escrow_finish_uses_canonical_field_names() {
        let op = Operation::escrow_finish("rAlice", "rAlice", 7);
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(
            value,
            json!({
                "TransactionType": "EscrowFinish",
                "Account": "rAlice",
                "Owner": "rAlice",
                "OfferSequence": 7,
            })
        );
    }

    #[test]
    fn amount_is_string_encoded_drops() {
        let op = Operation::escrow_create("rAlice", "rBob", 42, 0);
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["Amount"], json!("42"));
    }
}

// ─── Query result decoding ──────────────────────────────────

mod decoding {
    use super::*;

    #[test]
    fn account_objects_lowercases_types_and_keeps_escrow_fields() {
        let result = json!({
            "account": "rAlice",
            "account_objects": [
                {
                    "LedgerEntryType": "Escrow",
                    "Account": "rAlice",
                    "Destination": "rBob",
                    "Amount": "1000000",
                    "FinishAfter": 694310400,
                    "PreviousTxnID": "DEADBEEF",
                },
                {
                    "LedgerEntryType": "Offer",
                    "Sequence": 9,
                },
            ],
            "status": "success",
        });
        let records = account_object_records(&result);
        assert_eq!(records.len(), 2);

        let escrow = &records[0];
        assert_eq!(escrow.kind, "escrow");
        assert_eq!(escrow.sequence, None, "ledger entries carry no sequence");
        assert_eq!(escrow.destination.as_deref(), Some("rBob"));
        assert_eq!(escrow.amount.as_deref(), Some("1000000"));
        assert_eq!(escrow.finish_after, Some(694_310_400));
        assert_eq!(escrow.previous_txn_id.as_deref(), Some("DEADBEEF"));

        assert_eq!(records[1].kind, "offer");
        assert_eq!(records[1].sequence, Some(9));
    }

    #[test]
    fn missing_object_list_decodes_to_empty() {
        assert!(account_object_records(&json!({ "status": "success" })).is_empty());
    }

    #[test]
    fn balance_comes_from_account_data() {
        let result = json!({
            "account_data": { "Account": "rAlice", "Balance": "10000000", "Sequence": 5 },
            "status": "success",
        });
        assert_eq!(balance_from_result(&result).unwrap(), 10_000_000);
    }

    #[test]
    fn malformed_balance_is_a_query_error() {
        let result = json!({ "account_data": { "Balance": 10 } });
        let err = balance_from_result(&result).unwrap_err();
        assert!(err.to_string().contains("Balance"));
    }

    #[test]
    fn ledger_summary_accepts_numeric_and_string_indices() {
        let numeric = json!({
            "ledger_index": 95_000_000,
            "ledger": {
                "close_time": 694310405,
                "transactions": ["AAA", "BBB"],
            },
        });
        let summary = ledger_summary_from_result(&numeric).unwrap();
        assert_eq!(summary.ledger_index, 95_000_000);
        assert_eq!(summary.close_time, 694_310_405);
        assert_eq!(summary.transactions, vec!["AAA", "BBB"]);

        let stringy = json!({
            "ledger": {
                "ledger_index": "95000001",
                "close_time": 694310410,
            },
        });
        let summary = ledger_summary_from_result(&stringy).unwrap();
        assert_eq!(summary.ledger_index, 95_000_001);
        assert!(summary.transactions.is_empty());
    }

    #[test]
    fn transaction_detail_handles_flat_and_nested_shapes() {
        let v1 = json!({
            "hash": "AAA",
            "TransactionType": "Payment",
            "Account": "rAlice",
            "Amount": "1000000",
            "validated": true,
        });
        let detail = transaction_detail_from_result(&v1, "fallback");
        assert_eq!(detail.hash, "AAA");
        assert_eq!(detail.transaction_type, "Payment");
        assert_eq!(detail.account.as_deref(), Some("rAlice"));
        assert_eq!(detail.amount.as_deref(), Some("1000000"));

        let v2 = json!({
            "hash": "BBB",
            "tx_json": {
                "TransactionType": "EscrowCreate",
                "Account": "rAlice",
                "Sequence": 7,
            },
        });
        let detail = transaction_detail_from_result(&v2, "fallback");
        assert_eq!(detail.hash, "BBB");
        assert_eq!(detail.transaction_type, "EscrowCreate");
        assert_eq!(sequence_from_tx_result(&v2), Some(7));

        let flat_sequence = json!({ "Sequence": 9 });
        assert_eq!(sequence_from_tx_result(&flat_sequence), Some(9));
    }

    #[test]
    fn missing_fields_fall_back_gracefully() {
        let bare = json!({});
        let detail = transaction_detail_from_result(&bare, "FALLBACK");
        assert_eq!(detail.hash, "FALLBACK");
        assert_eq!(detail.transaction_type, "Unknown");
        assert_eq!(detail.account, None);
        assert_eq!(sequence_from_tx_result(&bare), None);
    }
}

// ─── Ripple time ────────────────────────────────────────────

mod ripple_time {
    use super::*;

    #[test]
    fn epoch_offset_is_the_ledger_epoch() {
        assert_eq!(RIPPLE_EPOCH_OFFSET, 946_684_800);
        let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(epoch.timestamp(), RIPPLE_EPOCH_OFFSET);
        assert_eq!(to_ripple_time(epoch), 0);
    }

    #[test]
    fn known_instant_encodes_correctly() {
        let at = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_ripple_time(at), 694_310_400);
        assert_eq!(to_unix_seconds(694_310_400), at.timestamp());
    }

    #[test]
    fn round_trip_is_exact_at_second_resolution() {
        let now = Utc::now();
        let encoded = to_ripple_time(now);
        assert_eq!(to_unix_seconds(encoded), now.timestamp());
    }

    #[test]
    fn delayed_release_time_decodes_to_now_plus_delay() {
        let delay = 30;
        let before = Utc::now().timestamp();
        let release = ripple_time_now() + delay;
        let after = Utc::now().timestamp();
        let decoded = to_unix_seconds(release);
        assert!(decoded >= before + i64::from(delay));
        assert!(decoded <= after + i64::from(delay));
    }

    #[test]
    fn pre_epoch_instants_clamp_to_zero() {
        let at = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(to_ripple_time(at), 0);
    }
}
