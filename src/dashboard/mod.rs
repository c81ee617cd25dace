//! Dashboard module
//!
//! Provides a snapshot of the current month's spending, savings and net worth.

mod handlers;
mod snapshot;

pub use handlers::get_dashboard_endpoint;
pub use snapshot::{DashboardSnapshot, build_dashboard_snapshot};
