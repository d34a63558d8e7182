//! Schedule resolution business logic.
//!
//! Maps a district and a calendar date to the set of menu items expected on
//! that day. Weekdays use the Monday=0 through Friday=4 convention; weekend
//! dates resolve to the empty set because schools are closed, and callers must
//! treat that as a normal result rather than an error.

use crate::{
    entities::{Schedule, schedule},
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Converts a calendar date into a schedule weekday index.
///
/// Returns `Some(0..=4)` for Monday through Friday and `None` for weekends.
#[must_use]
pub fn weekday_index(date: NaiveDate) -> Option<i32> {
    let index = date.weekday().num_days_from_monday();
    // Cast safety: num_days_from_monday is always in 0..=6.
    #[allow(clippy::cast_possible_wrap)]
    let index = index as i32;
    (index <= 4).then_some(index)
}

/// Resolves the expected menu items for a district on a given date.
///
/// Items are returned sorted ascending for deterministic output. A weekend
/// date yields an empty vec, as does a district with no schedule rows for
/// that weekday.
pub async fn items_for<C>(conn: &C, district_id: i64, date: NaiveDate) -> Result<Vec<String>>
where
    C: ConnectionTrait,
{
    let Some(day) = weekday_index(date) else {
        return Ok(Vec::new());
    };

    let rows = Schedule::find()
        .filter(schedule::Column::DistrictId.eq(district_id))
        .filter(schedule::Column::Day.eq(day))
        .order_by_asc(schedule::Column::Item)
        .all(conn)
        .await?;

    Ok(rows.into_iter().map(|row| row.item).collect())
}

/// Adds one menu item to a district's weekly schedule.
///
/// Validates the weekday index and item name, and rejects an item already
/// scheduled for the same district and weekday.
pub async fn add_schedule_item<C>(
    conn: &C,
    district_id: i64,
    day: i32,
    item: &str,
) -> Result<schedule::Model>
where
    C: ConnectionTrait,
{
    if !(0..=4).contains(&day) {
        return Err(Error::Validation {
            field: "day",
            message: format!("Weekday must be 0 (Monday) to 4 (Friday), got {day}"),
        });
    }

    let item = item.trim();
    if item.is_empty() {
        return Err(Error::Validation {
            field: "item",
            message: "Menu item cannot be empty".to_string(),
        });
    }

    let duplicate = Schedule::find()
        .filter(schedule::Column::DistrictId.eq(district_id))
        .filter(schedule::Column::Day.eq(day))
        .filter(schedule::Column::Item.eq(item))
        .one(conn)
        .await?
        .is_some();
    if duplicate {
        return Err(Error::Validation {
            field: "item",
            message: format!("Item `{item}` is already scheduled for that weekday"),
        });
    }

    let row = schedule::ActiveModel {
        district_id: Set(district_id),
        day: Set(day),
        item: Set(item.to_string()),
        ..Default::default()
    };

    row.insert(conn).await.map_err(Into::into)
}
