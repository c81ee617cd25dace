use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{
    Error,
    category::{CategoryId, get_fixed_expense_categories},
    expense::{NewExpense, create_expense, has_fixed_expense_in_month},
};

/// A fixed category's default amount, and whether it has been logged this month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedExpenseSuggestion {
    pub category_id: CategoryId,
    pub category_name: String,
    pub suggested_amount: f64,
    /// Whether a fixed expense for the category already exists this month.
    pub already_logged: bool,
}

/// The outcome of applying the fixed expenses for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyFixedExpensesResult {
    pub message: String,
    /// Names of the categories an expense was created for.
    pub applied: Vec<String>,
    /// Names of the categories that were already logged this month.
    pub skipped: Vec<String>,
}

/// List a suggestion for every fixed category with a positive default amount.
pub fn get_fixed_expense_suggestions(
    today: Date,
    connection: &Connection,
) -> Result<Vec<FixedExpenseSuggestion>, Error> {
    get_fixed_expense_categories(connection)?
        .into_iter()
        .map(|category| {
            Ok(FixedExpenseSuggestion {
                already_logged: has_fixed_expense_in_month(category.id, today, connection)?,
                category_id: category.id,
                category_name: category.name.to_string(),
                suggested_amount: category.default_amount,
            })
        })
        .collect()
}

/// Create this month's expense for every fixed category that has not been
/// logged yet.
///
/// New expenses are dated the first of the month of `today`. All inserts
/// happen in one transaction, so on error no expenses are created.
pub fn apply_fixed_expenses(
    today: Date,
    connection: &Connection,
) -> Result<ApplyFixedExpensesResult, Error> {
    let transaction = connection.unchecked_transaction()?;

    let first_of_month = today - Duration::days(i64::from(today.day()) - 1);
    let note = format!("Auto-applied for {}", today.month());

    let mut applied = Vec::new();
    let mut skipped = Vec::new();

    for category in get_fixed_expense_categories(&transaction)? {
        if has_fixed_expense_in_month(category.id, today, &transaction)? {
            skipped.push(category.name.to_string());
            continue;
        }

        create_expense(
            NewExpense::new(first_of_month, category.default_amount, category.id)
                .fixed(true)
                .notes(&note),
            &transaction,
        )?;
        applied.push(category.name.to_string());
    }

    transaction.commit()?;

    Ok(ApplyFixedExpensesResult {
        message: format!("Applied {} fixed expenses", applied.len()),
        applied,
        skipped,
    })
}
