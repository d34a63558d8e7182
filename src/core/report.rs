//! Report store business logic.
//!
//! Owns the Report and ReportItem lifecycle: submission, full-replacement
//! update, deletion, and read queries. Every multi-row write runs inside one
//! database transaction together with the report's scalar fields, and
//! reconciliation runs inside that same transaction, so a saved report and
//! its pairing state are never visible out of step. Item updates are
//! delete-all-then-recreate, never diffed.

use crate::{
    core::reconcile,
    entities::{Report, ReportItem, School, report, report_item},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, SqlErr, TransactionTrait, prelude::*};

/// Submits a new report for a school and date.
///
/// Fails with `DuplicateReport` when a report with the same
/// (school, date, flag) already exists. The caller must use
/// `update_report` instead; the conflict is never retried here.
pub async fn submit_report(
    db: &DatabaseConnection,
    school_id: i64,
    for_date: NaiveDate,
    student_count: i32,
    added_by_school: bool,
    items: Vec<String>,
) -> Result<report::Model> {
    let items = validate_report_input(student_count, items)?;

    let txn = db.begin().await?;

    School::find_by_id(school_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "school",
            key: school_id.to_string(),
        })?;

    if find_by_key(&txn, school_id, for_date, added_by_school)
        .await?
        .is_some()
    {
        return Err(Error::DuplicateReport {
            school_id,
            for_date,
            added_by_school,
        });
    }

    let model = report::ActiveModel {
        school_id: Set(school_id),
        student_count: Set(student_count),
        for_date: Set(for_date),
        on_datetime: Set(chrono::Utc::now()),
        added_by_school: Set(added_by_school),
        actual_report_id: Set(None),
        ..Default::default()
    };

    // The unique index is the serialization point for concurrent submissions
    // of the same key; the race loser surfaces the same conflict as the
    // pre-check above.
    let saved = match model.insert(&txn).await {
        Ok(saved) => saved,
        Err(err) => {
            return Err(match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateReport {
                    school_id,
                    for_date,
                    added_by_school,
                },
                _ => err.into(),
            });
        }
    };

    insert_items(&txn, saved.id, &items).await?;
    reconcile::reconcile(&txn, school_id, for_date).await?;

    // Reconciliation may have linked an estimate to its actual; return the
    // row as committed.
    let saved = refetch(&txn, saved.id).await?;
    txn.commit().await?;

    Ok(saved)
}

/// Updates a report's count, date, and items as one atomic replacement.
///
/// Only the owning school may update. Items are replaced wholesale, and
/// reconciliation re-runs for the old and (if the date moved) the new key so
/// the pairing state tracks the report.
pub async fn update_report(
    db: &DatabaseConnection,
    report_id: i64,
    requesting_school_id: i64,
    student_count: i32,
    for_date: NaiveDate,
    items: Vec<String>,
) -> Result<report::Model> {
    let items = validate_report_input(student_count, items)?;

    let txn = db.begin().await?;

    let existing = Report::find_by_id(report_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "report",
            key: report_id.to_string(),
        })?;

    if existing.school_id != requesting_school_id {
        return Err(Error::NotOwner {
            report_id,
            school_id: requesting_school_id,
        });
    }

    let school_id = existing.school_id;
    let added_by_school = existing.added_by_school;
    let old_date = existing.for_date;

    if for_date != old_date {
        let collision = find_by_key(&txn, school_id, for_date, added_by_school)
            .await?
            .is_some_and(|other| other.id != report_id);
        if collision {
            return Err(Error::DuplicateReport {
                school_id,
                for_date,
                added_by_school,
            });
        }
    }

    let mut active: report::ActiveModel = existing.into();
    active.student_count = Set(student_count);
    active.for_date = Set(for_date);
    // Any pair link is re-derived below for the report's current key.
    active.actual_report_id = Set(None);
    if let Err(err) = active.update(&txn).await {
        return Err(match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateReport {
                school_id,
                for_date,
                added_by_school,
            },
            _ => err.into(),
        });
    }

    ReportItem::delete_many()
        .filter(report_item::Column::ReportId.eq(report_id))
        .exec(&txn)
        .await?;
    insert_items(&txn, report_id, &items).await?;

    reconcile::reconcile(&txn, school_id, old_date).await?;
    if for_date != old_date {
        reconcile::reconcile(&txn, school_id, for_date).await?;
    }

    let updated = refetch(&txn, report_id).await?;
    txn.commit().await?;

    Ok(updated)
}

/// Deletes a report together with its items.
///
/// Only the owning school may delete. A previously matched counterpart
/// degrades to single-sided: reconciliation dissolves the pairing instead of
/// leaving it pointing at a dead row.
pub async fn delete_report(
    db: &DatabaseConnection,
    report_id: i64,
    requesting_school_id: i64,
) -> Result<()> {
    let txn = db.begin().await?;

    let existing = Report::find_by_id(report_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "report",
            key: report_id.to_string(),
        })?;

    if existing.school_id != requesting_school_id {
        return Err(Error::NotOwner {
            report_id,
            school_id: requesting_school_id,
        });
    }

    let school_id = existing.school_id;
    let for_date = existing.for_date;

    // References into the doomed row must go first: the counterpart
    // estimate's link and the materialized pairing.
    if existing.added_by_school {
        if let Some(estimate) = find_by_key(&txn, school_id, for_date, false).await? {
            if estimate.actual_report_id == Some(report_id) {
                let mut unlinked: report::ActiveModel = estimate.into();
                unlinked.actual_report_id = Set(None);
                unlinked.update(&txn).await?;
            }
        }
    }
    crate::entities::AuthorityReport::delete_many()
        .filter(crate::entities::authority_report::Column::SchoolId.eq(school_id))
        .filter(crate::entities::authority_report::Column::ForDate.eq(for_date))
        .exec(&txn)
        .await?;

    ReportItem::delete_many()
        .filter(report_item::Column::ReportId.eq(report_id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;

    reconcile::reconcile(&txn, school_id, for_date).await?;

    txn.commit().await?;
    Ok(())
}

/// Lists all reports submitted by a school, ordered by (date, flag) for
/// stable output.
pub async fn list_reports_for_school(
    db: &DatabaseConnection,
    school_id: i64,
) -> Result<Vec<report::Model>> {
    Report::find()
        .filter(report::Column::SchoolId.eq(school_id))
        .order_by_asc(report::Column::ForDate)
        .order_by_asc(report::Column::AddedBySchool)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a report by its unique ID.
pub async fn get_report(
    db: &DatabaseConnection,
    report_id: i64,
) -> Result<Option<report::Model>> {
    Report::find_by_id(report_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns a report's item names, sorted ascending.
pub async fn items_of<C>(conn: &C, report_id: i64) -> Result<Vec<String>>
where
    C: ConnectionTrait,
{
    let rows = ReportItem::find()
        .filter(report_item::Column::ReportId.eq(report_id))
        .order_by_asc(report_item::Column::Item)
        .all(conn)
        .await?;

    Ok(rows.into_iter().map(|row| row.item).collect())
}

/// Validates count and item names, returning the trimmed item list.
/// Runs before any write so a rejected submission leaves no trace.
fn validate_report_input(student_count: i32, items: Vec<String>) -> Result<Vec<String>> {
    if student_count < 0 {
        return Err(Error::Validation {
            field: "student_count",
            message: format!("Student count cannot be negative, got {student_count}"),
        });
    }

    let mut trimmed = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim().to_string();
        if item.is_empty() {
            return Err(Error::Validation {
                field: "items",
                message: "Menu item name cannot be empty".to_string(),
            });
        }
        if trimmed.contains(&item) {
            return Err(Error::Validation {
                field: "items",
                message: format!("Duplicate menu item `{item}`"),
            });
        }
        trimmed.push(item);
    }

    Ok(trimmed)
}

async fn find_by_key<C>(
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

async fn insert_items<C>(conn: &C, report_id: i64, items: &[String]) -> Result<()>
where
    C: ConnectionTrait,
{
    for item in items {
        report_item::ActiveModel {
            report_id: Set(report_id),
            item: Set(item.clone()),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

async fn refetch<C>(conn: &C, report_id: i64) -> Result<report::Model>
where
    C: ConnectionTrait,
{
    Report::find_by_id(report_id)
        .one(conn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "report",
            key: report_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::reconcile::get_pairing;
    use crate::entities::school;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_submit_report_validation_rejects_before_any_query() -> Result<()> {
        // A bare mock connection: validation must fail before any query runs
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = submit_report(&db, 1, test_date(), -5, true, vec![]).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "student_count",
                ..
            }
        ));

        let result = submit_report(&db, 1, test_date(), 10, false, vec![String::new()]).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "items", .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_report_school_not_found_mock() -> Result<()> {
        // Configure MockDatabase to return no school (simulating not found)
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<school::Model>::new()])
            .into_connection();

        let result = submit_report(&db, 999, test_date(), 10, true, vec![]).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "school",
                ..
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_report_validation() -> Result<()> {
        let (db, _district, school) = setup_with_school().await?;

        let result = submit_report(&db, school.id, test_date(), -1, true, vec![]).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "student_count",
                ..
            }
        ));

        let result = submit_report(
            &db,
            school.id,
            test_date(),
            10,
            true,
            vec!["idly".to_string(), "  ".to_string()],
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "items", .. }
        ));

        let result = submit_report(
            &db,
            school.id,
            test_date(),
            10,
            true,
            vec!["idly".to_string(), "idly".to_string()],
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "items", .. }
        ));

        // Nothing was written
        assert!(list_reports_for_school(&db, school.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_report_unknown_school() -> Result<()> {
        let db = setup_test_db().await?;

        let result = submit_report(&db, 999, test_date(), 10, true, vec![]).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "school",
                ..
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_report_persists_items() -> Result<()> {
        let (db, _district, school) = setup_with_school().await?;

        let report = submit_actual(&db, school.id, test_date(), 45, &["idly", "dosa"]).await?;
        assert_eq!(report.student_count, 45);
        assert_eq!(report.for_date, test_date());
        assert!(report.added_by_school);

        let items = items_of(&db, report.id).await?;
        assert_eq!(items, vec!["dosa".to_string(), "idly".to_string()]);

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_duplicate_report_conflicts() -> Result<()> {
        let (db, _district, school) = setup_with_school().await?;
        let date = test_date();

        submit_actual(&db, school.id, date, 45, &[]).await?;
        let result = submit_actual(&db, school.id, date, 50, &[]).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateReport {
                added_by_school: true,
                ..
            }
        ));

        // The estimate flag is a different key and still free
        submit_estimate(&db, school.id, date, 45, &[]).await?;
        let result = submit_estimate(&db, school.id, date, 45, &[]).await;
        assert!(matches!(result.unwrap_err(), Error::DuplicateReport { .. }));

        // A second date is also free
        submit_actual(&db, school.id, date.succ_opt().unwrap(), 45, &[]).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_items_wholesale() -> Result<()> {
        let (db, _district, school) = setup_with_school().await?;

        let report = submit_actual(&db, school.id, test_date(), 45, &["idly", "dosa"]).await?;
        update_report(
            &db,
            report.id,
            school.id,
            45,
            test_date(),
            vec!["idly".to_string()],
        )
        .await?;

        let items = items_of(&db, report.id).await?;
        assert_eq!(items, vec!["idly".to_string()]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_requires_ownership() -> Result<()> {
        let (db, district, school) = setup_with_school().await?;
        let other = create_test_school(&db, district.id, "PSBB").await?;

        let report = submit_actual(&db, school.id, test_date(), 45, &[]).await?;
        let result =
            update_report(&db, report.id, other.id, 50, test_date(), vec![]).await;
        assert!(matches!(result.unwrap_err(), Error::NotOwner { .. }));

        // Untouched
        let unchanged = get_report(&db, report.id).await?.unwrap();
        assert_eq!(unchanged.student_count, 45);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_report_is_not_found() -> Result<()> {
        let (db, _district, school) = setup_with_school().await?;

        let result = update_report(&db, 999, school.id, 45, test_date(), vec![]).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "report",
                ..
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_date_collision_conflicts() -> Result<()> {
        let (db, _district, school) = setup_with_school().await?;
        let monday = test_date();
        let tuesday = monday.succ_opt().unwrap();

        submit_actual(&db, school.id, monday, 45, &[]).await?;
        let movable = submit_actual(&db, school.id, tuesday, 40, &[]).await?;

        let result = update_report(&db, movable.id, school.id, 40, monday, vec![]).await;
        assert!(matches!(result.unwrap_err(), Error::DuplicateReport { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_count_recomputes_discrepancy() -> Result<()> {
        let (db, _district, school) = setup_with_school().await?;
        let date = test_date();

        submit_actual(&db, school.id, date, 45, &[]).await?;
        let estimate = submit_estimate(&db, school.id, date, 45, &[]).await?;
        assert!(!get_pairing(&db, school.id, date).await?.unwrap().is_discrepant);

        update_report(&db, estimate.id, school.id, 20, date, vec![]).await?;
        assert!(get_pairing(&db, school.id, date).await?.unwrap().is_discrepant);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_moving_date_reconciles_both_keys() -> Result<()> {
        let (db, _district, school) = setup_with_school().await?;
        let monday = test_date();
        let tuesday = monday.succ_opt().unwrap();

        let actual = submit_actual(&db, school.id, monday, 45, &[]).await?;
        let estimate = submit_estimate(&db, school.id, monday, 45, &[]).await?;
        assert!(get_pairing(&db, school.id, monday).await?.is_some());

        // Move the actual away: the Monday pairing dissolves and the estimate
        // loses its link.
        update_report(&db, actual.id, school.id, 45, tuesday, vec![]).await?;
        assert!(get_pairing(&db, school.id, monday).await?.is_none());
        assert!(get_pairing(&db, school.id, tuesday).await?.is_none());
        let estimate = get_report(&db, estimate.id).await?.unwrap();
        assert_eq!(estimate.actual_report_id, None);

        // Move the estimate after it: the Tuesday pairing forms.
        update_report(&db, estimate.id, school.id, 45, tuesday, vec![]).await?;
        let pairing = get_pairing(&db, school.id, tuesday).await?.unwrap();
        assert!(!pairing.is_discrepant);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() -> Result<()> {
        let (db, district, school) = setup_with_school().await?;
        let other = create_test_school(&db, district.id, "PSBB").await?;

        let report = submit_actual(&db, school.id, test_date(), 45, &[]).await?;
        let result = delete_report(&db, report.id, other.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotOwner { .. }));
        assert!(get_report(&db, report.id).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_dissolves_pairing() -> Result<()> {
        let (db, _district, school) = setup_with_school().await?;
        let date = test_date();

        let actual = submit_actual(&db, school.id, date, 45, &["idly"]).await?;
        let estimate = submit_estimate(&db, school.id, date, 45, &["idly"]).await?;
        assert!(get_pairing(&db, school.id, date).await?.is_some());

        delete_report(&db, actual.id, school.id).await?;

        assert!(get_report(&db, actual.id).await?.is_none());
        assert!(items_of(&db, actual.id).await?.is_empty());
        assert!(get_pairing(&db, school.id, date).await?.is_none());
        let estimate = get_report(&db, estimate.id).await?.unwrap();
        assert_eq!(estimate.actual_report_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_reports_for_school_ordered() -> Result<()> {
        let (db, district, school) = setup_with_school().await?;
        let other = create_test_school(&db, district.id, "PSBB").await?;
        let monday = test_date();
        let tuesday = monday.succ_opt().unwrap();

        submit_actual(&db, school.id, tuesday, 40, &[]).await?;
        submit_actual(&db, school.id, monday, 45, &[]).await?;
        submit_estimate(&db, school.id, monday, 50, &[]).await?;
        submit_actual(&db, other.id, monday, 30, &[]).await?;

        let reports = list_reports_for_school(&db, school.id).await?;
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].for_date, monday);
        assert!(!reports[0].added_by_school);
        assert_eq!(reports[1].for_date, monday);
        assert!(reports[1].added_by_school);
        assert_eq!(reports[2].for_date, tuesday);

        Ok(())
    }
}
