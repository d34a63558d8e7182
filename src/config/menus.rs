//! Menu seed configuration loading from menus.toml
//!
//! The weekly menus for each district are declared in a TOML file and used to
//! seed the database on startup. Seeding is idempotent: districts and schedule
//! rows that already exist are left alone, so the binary can be restarted
//! against the same database without duplicating menu rows.

use crate::entities::{District, Schedule, district, schedule};
use crate::errors::{Error, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire menus.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of districts with their weekly menus
    pub districts: Vec<DistrictConfig>,
}

/// Seed configuration for a single district
#[derive(Debug, Deserialize, Clone)]
pub struct DistrictConfig {
    /// District name, unique across the system
    pub name: String,
    /// Weekly menu rows for the district
    pub menus: Vec<MenuConfig>,
}

/// Menu items for one weekday
#[derive(Debug, Deserialize, Clone)]
pub struct MenuConfig {
    /// Weekday index, Monday=0 through Friday=4
    pub day: i32,
    /// Menu items expected on that weekday
    pub items: Vec<String>,
}

/// Loads menu configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or required fields are missing.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read menu config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse menus.toml: {e}"),
    })
}

/// Loads menu configuration from the default location (./menus.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("menus.toml")
}

/// Seeds districts and schedule rows from the configuration.
///
/// Returns the number of schedule rows inserted. Existing districts are
/// reused and existing (district, day, item) rows are skipped.
pub async fn seed_menus(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    let mut inserted = 0;

    for district_config in &config.districts {
        let name = district_config.name.trim();
        if name.is_empty() {
            return Err(Error::Config {
                message: "District name in menus.toml cannot be empty".to_string(),
            });
        }

        let district = match District::find()
            .filter(district::Column::Name.eq(name))
            .one(db)
            .await?
        {
            Some(existing) => existing,
            None => {
                district::ActiveModel {
                    name: Set(name.to_string()),
                    ..Default::default()
                }
                .insert(db)
                .await?
            }
        };

        for menu in &district_config.menus {
            if !(0..=4).contains(&menu.day) {
                return Err(Error::Config {
                    message: format!(
                        "Invalid weekday {} for district {name}: expected 0 (Monday) to 4 (Friday)",
                        menu.day
                    ),
                });
            }

            for item in &menu.items {
                let item = item.trim();
                if item.is_empty() {
                    return Err(Error::Config {
                        message: format!("Empty menu item for district {name}"),
                    });
                }

                let exists = Schedule::find()
                    .filter(schedule::Column::DistrictId.eq(district.id))
                    .filter(schedule::Column::Day.eq(menu.day))
                    .filter(schedule::Column::Item.eq(item))
                    .one(db)
                    .await?
                    .is_some();
                if exists {
                    continue;
                }

                schedule::ActiveModel {
                    district_id: Set(district.id),
                    day: Set(menu.day),
                    item: Set(item.to_string()),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                inserted += 1;
            }
        }
    }

    Ok(inserted)
}
