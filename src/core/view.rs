//! Authority view projection.
//!
//! Read-side assembly of a school's actual and estimate reports into one
//! comparable record per (school, date) for the overseeing authority. The
//! view is always renderable: an absent side contributes a zero count and an
//! empty item list, never a null. Projection is recomputed from the live
//! report rows on every read; it is never independently mutable.

use crate::{
    core::{reconcile, report as report_store},
    entities::{Authority, Report, School, report, school},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, prelude::*};
use std::collections::BTreeMap;
use tracing::error;

/// One (school, date) entry served to an authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityView {
    /// School the entry belongs to
    pub school_id: i64,
    /// Denormalized school name for display
    pub school_name: String,
    /// Date the counts are reported for
    pub for_date: NaiveDate,
    /// Actual student count, 0 when no actual report exists
    pub actual_student_count: i32,
    /// Actual menu items, empty when no actual report exists
    pub actual_items: Vec<String>,
    /// Estimated student count, 0 when no estimate report exists
    pub estimate_student_count: i32,
    /// Estimated menu items, empty when no estimate report exists
    pub estimate_items: Vec<String>,
    /// True only when both sides exist and their counts disagree
    pub is_discrepant: bool,
}

/// Lists one view per (school, date) with at least one report, for every
/// school on the authority's roster, ordered by (school, date) ascending.
pub async fn list_views_for_authority(
    db: &DatabaseConnection,
    authority_id: i64,
) -> Result<Vec<AuthorityView>> {
    Authority::find_by_id(authority_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "authority",
            key: authority_id.to_string(),
        })?;

    let roster = School::find()
        .filter(school::Column::AuthorityId.eq(authority_id))
        .order_by_asc(school::Column::Id)
        .all(db)
        .await?;

    let mut views = Vec::new();
    for school in roster {
        let reports = Report::find()
            .filter(report::Column::SchoolId.eq(school.id))
            .all(db)
            .await?;

        let mut by_date: BTreeMap<NaiveDate, Vec<report::Model>> = BTreeMap::new();
        for r in reports {
            by_date.entry(r.for_date).or_default().push(r);
        }

        for (for_date, group) in by_date {
            views.push(project_pair(db, &school, for_date, &group).await?);
        }
    }

    Ok(views)
}

/// Builds one view from the reports sharing a (school, date) key.
///
/// The grouping key makes a mismatched pair structurally impossible, but the
/// invariant is asserted anyway: a disagreeing or duplicated side is an
/// internal `InconsistentPair`, logged here and never repaired.
async fn project_pair(
    db: &DatabaseConnection,
    school: &school::Model,
    for_date: NaiveDate,
    group: &[report::Model],
) -> Result<AuthorityView> {
    let mut actual: Option<&report::Model> = None;
    let mut estimate: Option<&report::Model> = None;

    for r in group {
        if r.school_id != school.id || r.for_date != for_date {
            // Internal invariant violation: logged and propagated, never
            // silently repaired.
            error!(
                school_id = school.id,
                for_date = %for_date,
                report_id = r.id,
                "report pair disagrees on school or date"
            );
            return Err(Error::InconsistentPair {
                school_id: school.id,
                for_date,
            });
        }
        let side = if r.added_by_school {
            &mut actual
        } else {
            &mut estimate
        };
        if side.replace(r).is_some() {
            error!(
                school_id = school.id,
                for_date = %for_date,
                report_id = r.id,
                "duplicate report flag within one school and date"
            );
            return Err(Error::InconsistentPair {
                school_id: school.id,
                for_date,
            });
        }
    }

    let (actual_student_count, actual_items) = match actual {
        Some(r) => (r.student_count, report_store::items_of(db, r.id).await?),
        None => (0, Vec::new()),
    };
    let (estimate_student_count, estimate_items) = match estimate {
        Some(r) => (r.student_count, report_store::items_of(db, r.id).await?),
        None => (0, Vec::new()),
    };

    let is_discrepant = actual.is_some()
        && estimate.is_some()
        && reconcile::is_discrepant(actual_student_count, estimate_student_count);

    Ok(AuthorityView {
        school_id: school.id,
        school_name: school.name.clone(),
        for_date,
        actual_student_count,
        actual_items,
        estimate_student_count,
        estimate_items,
        is_discrepant,
    })
}
