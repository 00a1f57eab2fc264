//! Tests for scheduled transactions.

use chrono::{NaiveDate, NaiveDateTime};
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;

use finaizen_shared::types::{Currency, Money, UserId};

use super::error::TransactionError;
use super::types::{CreateScheduledTransactionInput, ScheduledTransaction, TransactionKind};
use crate::recurrence::{Recurrence, RecurrenceError, TimeOfDay, WeekdaySet};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

#[fixture]
fn salary_input() -> CreateScheduledTransactionInput {
    CreateScheduledTransactionInput {
        user_id: UserId::new(),
        kind: TransactionKind::Income,
        amount: Money::new(dec!(18500.00), Currency::Mxn),
        description: "  Quincena  ".to_string(),
        category: "Salary".to_string(),
        recurrence: Recurrence::monthly(15).unwrap(),
        time_of_day: TimeOfDay::new(9, 0).unwrap(),
    }
}

#[rstest]
fn test_new_seeds_next_occurrence(salary_input: CreateScheduledTransactionInput) {
    let tx = ScheduledTransaction::new(salary_input, at(2026, 3, 10, 12, 0)).unwrap();

    assert!(tx.schedule.active);
    assert_eq!(tx.schedule.next_occurrence, Some(at(2026, 3, 15, 9, 0)));
    assert_eq!(tx.description, "Quincena");
    assert_eq!(tx.created_at, at(2026, 3, 10, 12, 0));
}

#[rstest]
#[case::zero(dec!(0))]
#[case::negative(dec!(-120.50))]
fn test_new_rejects_non_positive_amount(
    mut salary_input: CreateScheduledTransactionInput,
    #[case] amount: rust_decimal::Decimal,
) {
    salary_input.amount = Money::new(amount, Currency::Mxn);
    let result = ScheduledTransaction::new(salary_input, at(2026, 3, 10, 12, 0));
    assert_eq!(result, Err(TransactionError::NonPositiveAmount));
}

#[rstest]
fn test_new_rejects_blank_description(mut salary_input: CreateScheduledTransactionInput) {
    salary_input.description = "   ".to_string();
    let result = ScheduledTransaction::new(salary_input, at(2026, 3, 10, 12, 0));
    assert_eq!(result, Err(TransactionError::EmptyDescription));
}

#[rstest]
fn test_new_rejects_empty_weekly_schedule(mut salary_input: CreateScheduledTransactionInput) {
    salary_input.recurrence = Recurrence::Weekly {
        weekdays: WeekdaySet::empty(),
    };
    let result = ScheduledTransaction::new(salary_input, at(2026, 3, 10, 12, 0));
    assert_eq!(
        result,
        Err(TransactionError::Recurrence(
            RecurrenceError::NoQualifyingWeekday
        ))
    );
}

#[rstest]
fn test_execute_materializes_history_and_advances(salary_input: CreateScheduledTransactionInput) {
    let tx = ScheduledTransaction::new(salary_input, at(2026, 3, 10, 12, 0)).unwrap();
    let now = at(2026, 3, 15, 9, 5);

    let execution = tx.execute(now).unwrap();

    assert_eq!(execution.entry.scheduled_transaction_id, tx.id);
    assert_eq!(execution.entry.user_id, tx.user_id);
    assert_eq!(execution.entry.occurred_at, at(2026, 3, 15, 9, 0));
    assert_eq!(execution.entry.recorded_at, now);
    assert_eq!(execution.entry.amount, tx.amount);
    assert_eq!(execution.entry.signed_amount().amount, dec!(18500.00));

    assert_eq!(execution.transaction.id, tx.id);
    assert_eq!(
        execution.transaction.schedule.next_occurrence,
        Some(at(2026, 4, 15, 9, 0))
    );
    assert!(!execution.transaction.is_due(now));
    assert_eq!(
        tx.schedule.next_occurrence,
        Some(at(2026, 3, 15, 9, 0)),
        "original left untouched"
    );
}

#[rstest]
fn test_execute_before_due_fails(salary_input: CreateScheduledTransactionInput) {
    let tx = ScheduledTransaction::new(salary_input, at(2026, 3, 10, 12, 0)).unwrap();
    assert_eq!(
        tx.execute(at(2026, 3, 15, 8, 59)),
        Err(TransactionError::NotDue)
    );
}

#[rstest]
fn test_one_off_expense_fires_once(mut salary_input: CreateScheduledTransactionInput) {
    salary_input.kind = TransactionKind::Expense;
    salary_input.amount = Money::new(dec!(2300), Currency::Mxn);
    salary_input.recurrence = Recurrence::OneOff {
        date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
    };
    let now = at(2026, 3, 10, 12, 0);
    let tx = ScheduledTransaction::new(salary_input, now).unwrap();
    assert!(tx.is_due(now), "past one-off is due immediately");
    assert_eq!(tx.signed_amount().amount, dec!(-2300));

    let execution = tx.execute(now).unwrap();
    assert_eq!(execution.entry.signed_amount().amount, dec!(-2300));
    assert!(!execution.transaction.schedule.active);
    assert_eq!(
        execution.transaction.execute(at(2027, 1, 1, 0, 0)),
        Err(TransactionError::Inactive)
    );
}

#[rstest]
fn test_reschedule_reactivates_and_recomputes(mut salary_input: CreateScheduledTransactionInput) {
    salary_input.recurrence = Recurrence::OneOff {
        date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
    };
    let now = at(2026, 3, 10, 12, 0);
    let spent = ScheduledTransaction::new(salary_input, now)
        .unwrap()
        .execute(now)
        .unwrap()
        .transaction;

    let weekdays: WeekdaySet = [chrono::Weekday::Fri].into_iter().collect();
    let rescheduled = spent
        .reschedule(
            Recurrence::weekly(weekdays).unwrap(),
            TimeOfDay::new(20, 0).unwrap(),
            now,
        )
        .unwrap();

    assert_eq!(rescheduled.id, spent.id);
    assert!(rescheduled.schedule.active);
    // 2026-03-10 is a Tuesday.
    assert_eq!(
        rescheduled.schedule.next_occurrence,
        Some(at(2026, 3, 13, 20, 0))
    );
}

#[rstest]
fn test_upcoming_preview(salary_input: CreateScheduledTransactionInput) {
    let tx = ScheduledTransaction::new(salary_input, at(2026, 3, 10, 12, 0)).unwrap();
    let preview: Vec<_> = tx.upcoming(at(2026, 3, 10, 12, 0), 3).collect();
    assert_eq!(
        preview,
        vec![
            at(2026, 3, 15, 9, 0),
            at(2026, 4, 15, 9, 0),
            at(2026, 5, 15, 9, 0)
        ]
    );
}

#[rstest]
fn test_json_round_trip_preserves_schedule(salary_input: CreateScheduledTransactionInput) {
    let tx = ScheduledTransaction::new(salary_input, at(2026, 3, 10, 12, 0)).unwrap();
    let json = serde_json::to_string(&tx).unwrap();
    let back: ScheduledTransaction = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tx);
}
