//! Property-based tests for the submission lifecycle.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tppb_shared::config::CustomsConfig;

use super::service::SubmissionService;
use super::state::{SubmissionStateMachine, Transition};
use super::types::{
    DocumentStatus, NewItem, NewPackage, NewSubmission, SubmissionPatch, SubmissionType,
};

fn arb_status() -> impl Strategy<Value = DocumentStatus> {
    prop_oneof![
        Just(DocumentStatus::Pengajuan),
        Just(DocumentStatus::Approved),
        Just(DocumentStatus::Rejected),
    ]
}

fn arb_packages() -> impl Strategy<Value = Vec<NewPackage>> {
    let item = (1i64..10_000, 0i64..1_000_000).prop_map(|(qty, value)| NewItem {
        name: "Barang".to_string(),
        serial_number: String::new(),
        quantity: Decimal::new(qty, 1),
        unit: "pcs".to_string(),
        condition: String::new(),
        value: Decimal::new(value, 0),
    });
    prop::collection::vec(
        prop::collection::vec(item, 1..4).prop_map(|items| NewPackage {
            package_number: "P".to_string(),
            items,
        }),
        1..4,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Whatever sequence of statuses is requested, at most one transition
    /// fires side effects and the status never leaves a terminal state.
    #[test]
    fn prop_at_most_one_side_effect(requests in prop::collection::vec(arb_status(), 0..12)) {
        let id = tppb_shared::types::SubmissionId::new();
        let mut status = DocumentStatus::Pengajuan;
        let mut fired = 0;
        for to in requests {
            if let Ok(transition) = SubmissionStateMachine::transition(id, status, to) {
                if transition.has_side_effects() {
                    fired += 1;
                }
                if transition != Transition::NoOp {
                    prop_assert!(!status.is_terminal());
                }
                status = to;
            }
        }
        prop_assert!(fired <= 1);
    }

    /// Approval opens one record per item holding exactly that item's quantity.
    #[test]
    fn prop_approval_stock_equals_item_quantities(packages in arb_packages()) {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        let submission = SubmissionService::build(
            NewSubmission {
                submission_type: SubmissionType::Inbound,
                customer: "PT A".to_string(),
                packages,
            },
            now,
        )
        .unwrap();
        let plan = SubmissionService::apply_patch(
            &submission,
            SubmissionPatch {
                document_status: Some(DocumentStatus::Approved),
                bc_document_number: Some("BC23-001".to_string()),
                ..SubmissionPatch::default()
            },
            now,
        )
        .unwrap();
        let effects =
            SubmissionService::approval_effects(&plan.submission, &CustomsConfig::default(), now)
                .unwrap();

        prop_assert_eq!(effects.inventory.len(), submission.items().count());
        let stock: Decimal = effects.inventory.iter().map(|(r, _)| r.current_stock).sum();
        prop_assert_eq!(stock, submission.total_quantity());
        prop_assert_eq!(effects.transaction_log.quantity, submission.total_quantity());
    }
}
