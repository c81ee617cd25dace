//! Builds the dashboard statistics for the current month.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    config::{
        BASE_INVESTMENTS_KEY, DEFAULT_BASE_INVESTMENTS, DEFAULT_MONTHLY_SALARY,
        MONTHLY_SALARY_KEY, get_config_value_or,
    },
    debt::get_total_debt_remaining,
    expense::{ExpenseFilter, get_expenses},
    investment::get_investment_totals,
    savings::{Savings, SavingsStatus},
};

/// Spending, savings and net worth as of a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub monthly_salary: f64,
    /// The sum of this month's expenses.
    pub total_expenses: f64,
    pub remaining_balance: f64,
    /// Percentage of the salary left over, rounded to two decimals.
    pub savings_rate: f64,
    pub status: SavingsStatus,
    /// Total investments minus total debts.
    pub net_worth: f64,
    /// The base investments plus deposits and dividends, minus withdrawals.
    pub total_investments: f64,
    pub total_debts: f64,
    /// The month and year of the snapshot, e.g. "March 2025".
    pub current_month: String,
    /// The month of the snapshot as a number from 1 to 12.
    pub month: u8,
    pub year: i32,
    pub fixed_expenses: f64,
    pub variable_expenses: f64,
}

/// Compute the dashboard statistics for the month containing `today`.
///
/// Missing salary and base investment config entries fall back to their
/// defaults.
pub fn build_dashboard_snapshot(
    today: Date,
    connection: &Connection,
) -> Result<DashboardSnapshot, Error> {
    let monthly_salary =
        get_config_value_or(MONTHLY_SALARY_KEY, DEFAULT_MONTHLY_SALARY, connection)?;
    let base_investments =
        get_config_value_or(BASE_INVESTMENTS_KEY, DEFAULT_BASE_INVESTMENTS, connection)?;

    let expenses = get_expenses(&ExpenseFilter::month_of(today), connection)?;
    let total_expenses: f64 = expenses.iter().map(|expense| expense.amount).sum();
    let fixed_expenses: f64 = expenses
        .iter()
        .filter(|expense| expense.is_fixed)
        .map(|expense| expense.amount)
        .sum();

    let savings = Savings::new(monthly_salary, total_expenses);

    let total_investments = base_investments + get_investment_totals(connection)?.net();
    let total_debts = get_total_debt_remaining(connection)?;

    Ok(DashboardSnapshot {
        monthly_salary,
        total_expenses,
        remaining_balance: savings.remaining,
        savings_rate: savings.rounded_rate(),
        status: savings.status,
        net_worth: total_investments - total_debts,
        total_investments,
        total_debts,
        current_month: format!("{} {}", today.month(), today.year()),
        month: today.month().into(),
        year: today.year(),
        fixed_expenses,
        variable_expenses: total_expenses - fixed_expenses,
    })
}
