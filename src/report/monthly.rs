use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    Error,
    config::{DEFAULT_MONTHLY_SALARY, MONTHLY_SALARY_KEY, get_config_value_or},
    expense::{Expense, ExpenseFilter, get_expenses},
    savings::{Savings, SavingsStatus},
};

/// The name reported for expenses whose category no longer exists.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Spending and savings for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub year: i32,
    /// The month of the year, 1 to 12.
    pub month: u8,
    pub month_name: String,
    pub salary: f64,
    pub total_expenses: f64,
    pub savings: f64,
    pub savings_rate: f64,
    pub status: SavingsStatus,
    /// Total spent per category name.
    pub expenses_by_category: BTreeMap<String, f64>,
}

/// Build a report for each month of `year` that has at least one expense,
/// in calendar order.
///
/// Every month is measured against the current monthly salary.
pub fn build_monthly_reports(
    year: i32,
    connection: &Connection,
) -> Result<Vec<MonthlyReport>, Error> {
    let salary = get_config_value_or(MONTHLY_SALARY_KEY, DEFAULT_MONTHLY_SALARY, connection)?;

    let filter = ExpenseFilter {
        year: Some(year),
        ..Default::default()
    };

    // Keyed by month number since `Month` has no ordering.
    let mut expenses_by_month: BTreeMap<u8, (Month, Vec<Expense>)> = BTreeMap::new();
    for expense in get_expenses(&filter, connection)? {
        let month = expense.date.month();
        expenses_by_month
            .entry(month.into())
            .or_insert_with(|| (month, Vec::new()))
            .1
            .push(expense);
    }

    let reports = expenses_by_month
        .into_values()
        .map(|(month, expenses)| build_report(year, month, salary, &expenses))
        .collect();

    Ok(reports)
}

fn build_report(year: i32, month: Month, salary: f64, expenses: &[Expense]) -> MonthlyReport {
    let mut expenses_by_category = BTreeMap::new();
    let mut total_expenses = 0.0;

    for expense in expenses {
        let category_name = expense
            .category_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_owned());

        *expenses_by_category.entry(category_name).or_insert(0.0) += expense.amount;
        total_expenses += expense.amount;
    }

    let savings = Savings::new(salary, total_expenses);

    MonthlyReport {
        year,
        month: month.into(),
        month_name: month.to_string(),
        salary,
        total_expenses,
        savings: savings.remaining,
        savings_rate: savings.rounded_rate(),
        status: savings.status,
        expenses_by_category,
    }
}
