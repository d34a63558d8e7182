//! Reconciliation business logic.
//!
//! Pairs the actual and estimate reports for a (school, date) key and
//! maintains the materialized `authority_report` row. The engine is a pure
//! function of the two current report rows, never of history: re-running it
//! after either side changes overwrites the prior pairing deterministically,
//! and a missing side dissolves the pairing instead of leaving a stale row.
//!
//! Callers in the write path (submit, update, delete) invoke `reconcile`
//! inside their own transaction, so the engine always sees the committed
//! value of the other side and no lost update is possible across the two
//! flags of one key.

use crate::{
    entities::{AuthorityReport, Report, authority_report, report},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{Set, prelude::*};
use tracing::{debug, warn};

/// Baseline discrepancy rule: the two student counts disagree.
///
/// Item-set divergence never affects the flag; it stays visible to the
/// authority through the two item lists.
#[must_use]
pub const fn is_discrepant(actual_count: i32, estimate_count: i32) -> bool {
    actual_count != estimate_count
}

/// Re-derives the pairing state for one (school, date) key.
///
/// Both sides present: upserts the `authority_report` row with a recomputed
/// discrepancy flag and points the estimate's `actual_report_id` at the
/// actual. Either side absent: deletes any row for the key and clears a
/// dangling estimate link. Idempotent in both directions.
pub async fn reconcile<C>(conn: &C, school_id: i64, for_date: NaiveDate) -> Result<()>
where
    C: ConnectionTrait,
{
    let actual = find_side(conn, school_id, for_date, true).await?;
    let estimate = find_side(conn, school_id, for_date, false).await?;

    match (actual, estimate) {
        (Some(actual), Some(estimate)) => {
            let discrepant = is_discrepant(actual.student_count, estimate.student_count);
            let actual_count = actual.student_count;
            let estimate_count = estimate.student_count;

            if estimate.actual_report_id != Some(actual.id) {
                let mut linked: report::ActiveModel = estimate.clone().into();
                linked.actual_report_id = Set(Some(actual.id));
                linked.update(conn).await?;
            }

            upsert_pairing(conn, school_id, for_date, actual.id, estimate.id, discrepant).await?;

            if discrepant {
                // Delivery to the authority is stubbed; the event is the contract.
                warn!(
                    school_id,
                    for_date = %for_date,
                    actual = actual_count,
                    estimate = estimate_count,
                    "discrepant meal counts"
                );
            } else {
                debug!(school_id, for_date = %for_date, "reports reconciled without discrepancy");
            }
        }
        (_, estimate) => {
            // Pair dissolved or never formed. The materialized row's lifetime
            // is bound to both sides being live.
            AuthorityReport::delete_many()
                .filter(authority_report::Column::SchoolId.eq(school_id))
                .filter(authority_report::Column::ForDate.eq(for_date))
                .exec(conn)
                .await?;

            if let Some(estimate) = estimate {
                if estimate.actual_report_id.is_some() {
                    let mut unlinked: report::ActiveModel = estimate.into();
                    unlinked.actual_report_id = Set(None);
                    unlinked.update(conn).await?;
                }
            }
        }
    }

    Ok(())
}

/// Looks up the materialized pairing for a (school, date) key, if any.
pub async fn get_pairing<C>(
    conn: &C,
    school_id: i64,
    for_date: NaiveDate,
) -> Result<Option<authority_report::Model>>
where
    C: ConnectionTrait,
{
    AuthorityReport::find()
        .filter(authority_report::Column::SchoolId.eq(school_id))
        .filter(authority_report::Column::ForDate.eq(for_date))
        .one(conn)
        .await
        .map_err(Into::into)
}

async fn find_side<C>(
    conn: &C,
    school_id: i64,
    for_date: NaiveDate,
    added_by_school: bool,
) -> Result<Option<report::Model>>
where
    C: ConnectionTrait,
{
    Report::find()
        .filter(report::Column::SchoolId.eq(school_id))
        .filter(report::Column::ForDate.eq(for_date))
        .filter(report::Column::AddedBySchool.eq(added_by_school))
        .one(conn)
        .await
        .map_err(Into::into)
}

async fn upsert_pairing<C>(
    conn: &C,
    school_id: i64,
    for_date: NaiveDate,
    actual_id: i64,
    estimate_id: i64,
    discrepant: bool,
) -> Result<()>
where
    C: ConnectionTrait,
{
    match get_pairing(conn, school_id, for_date).await? {
        Some(existing) => {
            let mut row: authority_report::ActiveModel = existing.into();
            row.actual_id = Set(actual_id);
            row.estimate_id = Set(estimate_id);
            row.is_discrepant = Set(discrepant);
            row.update(conn).await?;
        }
        None => {
            authority_report::ActiveModel {
                school_id: Set(school_id),
                for_date: Set(for_date),
                actual_id: Set(actual_id),
                estimate_id: Set(estimate_id),
                is_discrepant: Set(discrepant),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
    }
    Ok(())
}
