//! Monthly spending and savings reports.

mod endpoints;
mod monthly;

pub use endpoints::get_monthly_reports_endpoint;
pub use monthly::{MonthlyReport, UNKNOWN_CATEGORY, build_monthly_reports};
