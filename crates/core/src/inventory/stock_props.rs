//! Property-based tests for stock movements.

use chrono::{NaiveDate, NaiveTime, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::stock::{RecordSeed, StockLedger};
use super::types::{MovementType, NewMovement};
use crate::error::DomainError;

fn movement(movement_type: MovementType, quantity: Decimal) -> NewMovement {
    NewMovement {
        date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        quantity,
        movement_type,
        origin: String::new(),
        destination: "gudang".to_string(),
        condition: String::new(),
        pic: String::new(),
        notes: None,
    }
}

fn arb_movement() -> impl Strategy<Value = (MovementType, Decimal)> {
    (
        prop_oneof![Just(MovementType::In), Just(MovementType::Out)],
        (1i64..500).prop_map(Decimal::from),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// After any accepted sequence of movements the counter equals the fold,
    /// the last remaining stock, and is never negative.
    #[test]
    fn prop_counter_matches_fold(
        initial in (1i64..500).prop_map(Decimal::from),
        moves in prop::collection::vec(arb_movement(), 0..30),
    ) {
        let seed = RecordSeed {
            submission_id: None,
            item_name: "Panel".to_string(),
            serial_number: String::new(),
            unit: "pcs".to_string(),
        };
        let (mut record, _) =
            StockLedger::open_record(seed, movement(MovementType::In, initial), Utc::now()).unwrap();
        let mut logs = 1usize;

        for (movement_type, qty) in moves {
            match StockLedger::apply_movement(&record, movement(movement_type, qty), Utc::now()) {
                Ok((updated, log)) => {
                    prop_assert_eq!(&log.movement, updated.movements.last().unwrap());
                    record = updated;
                    logs += 1;
                }
                Err(DomainError::InsufficientStock { requested, available, .. }) => {
                    prop_assert_eq!(movement_type, MovementType::Out);
                    prop_assert!(requested > available);
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }

            prop_assert_eq!(record.current_stock, StockLedger::folded_stock(&record.movements));
            prop_assert!(record.current_stock >= Decimal::ZERO);
            prop_assert!(StockLedger::verify(&record).is_ok());
        }

        prop_assert_eq!(record.movements.len(), logs);
        let sequences: Vec<u32> = record.movements.iter().map(|m| m.sequence).collect();
        let expected: Vec<u32> = (1..=u32::try_from(logs).unwrap()).collect();
        prop_assert_eq!(sequences, expected);
    }
}
