//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod authority;
pub mod authority_report;
pub mod district;
pub mod report;
pub mod report_item;
pub mod schedule;
pub mod school;

// Re-export specific types to avoid conflicts
pub use authority::{Column as AuthorityColumn, Entity as Authority, Model as AuthorityModel};
pub use authority_report::{
    Column as AuthorityReportColumn, Entity as AuthorityReport, Model as AuthorityReportModel,
};
pub use district::{Column as DistrictColumn, Entity as District, Model as DistrictModel};
pub use report::{Column as ReportColumn, Entity as Report, Model as ReportModel};
pub use report_item::{
    Column as ReportItemColumn, Entity as ReportItem, Model as ReportItemModel,
};
pub use schedule::{Column as ScheduleColumn, Entity as Schedule, Model as ScheduleModel};
pub use school::{Column as SchoolColumn, Entity as School, Model as SchoolModel};
