//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{expense_id}', use [format_endpoint].

use std::fmt::Display;

/// The root route which serves the HTML shell.
pub const ROOT: &str = "/";

/// The route for listing and upserting config entries.
pub const CONFIG: &str = "/api/config";
/// The route for a single config entry.
pub const CONFIG_ENTRY: &str = "/api/config/{key}";
/// The route for listing and creating categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route for deleting a category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route for listing and creating expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route for a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route for listing and creating investments.
pub const INVESTMENTS: &str = "/api/investments";
/// The route for updating and deleting an investment.
pub const INVESTMENT: &str = "/api/investments/{investment_id}";
/// The route for listing and creating debts.
pub const DEBTS: &str = "/api/debts";
/// The route for updating and deleting a debt.
pub const DEBT: &str = "/api/debts/{debt_id}";
/// The route for the current month's statistics.
pub const DASHBOARD: &str = "/api/dashboard";
/// The route for this month's fixed-expense suggestions.
pub const FIXED_EXPENSE_SUGGESTIONS: &str = "/api/fixed-expense-suggestions";
/// The route that logs this month's missing fixed expenses.
pub const APPLY_FIXED_EXPENSES: &str = "/api/apply-fixed-expenses";
/// The route for the monthly reports of a year.
pub const MONTHLY_REPORTS: &str = "/api/reports/monthly";
/// The route for downloading all expenses as CSV.
pub const EXPORT: &str = "/api/export";

/// Replace the parameter in `endpoint_path` with `value`.
///
/// A parameter starts with a left brace and ends with a right brace, e.g.
/// '{expense_id}' in '/api/expenses/{expense_id}'.
///
/// This function assumes that an endpoint path contains at most one parameter.
/// If no parameter is found in `endpoint_path`, the original path is returned.
pub fn format_endpoint(endpoint_path: &str, value: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::CONFIG,
            endpoints::CATEGORIES,
            endpoints::EXPENSES,
            endpoints::INVESTMENTS,
            endpoints::DEBTS,
            endpoints::DASHBOARD,
            endpoints::FIXED_EXPENSE_SUGGESTIONS,
            endpoints::APPLY_FIXED_EXPENSES,
            endpoints::MONTHLY_REPORTS,
            endpoints::EXPORT,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn formatted_endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::CONFIG_ENTRY, "monthly_salary"));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::CATEGORY, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::EXPENSE, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::INVESTMENT, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DEBT, 1));
    }

    #[test]
    fn replaces_parameter() {
        assert_eq!(format_endpoint(endpoints::EXPENSE, 42), "/api/expenses/42");
        assert_eq!(
            format_endpoint(endpoints::CONFIG_ENTRY, "base_investments"),
            "/api/config/base_investments"
        );
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        assert_eq!(format_endpoint(endpoints::EXPENSES, 1), endpoints::EXPENSES);
    }

    #[test]
    fn parameter_in_middle() {
        assert_eq!(format_endpoint("/hello/{id}/world", 1), "/hello/1/world");
    }

    #[test]
    fn unterminated_parameter_consumes_rest_of_path() {
        assert_eq!(format_endpoint("/hello/{id", 1), "/hello/1");
    }
}
