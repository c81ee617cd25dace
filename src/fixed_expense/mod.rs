//! Suggesting and applying the recurring expenses of fixed categories.

mod apply;
mod endpoints;

pub use apply::{
    ApplyFixedExpensesResult, FixedExpenseSuggestion, apply_fixed_expenses,
    get_fixed_expense_suggestions,
};
pub use endpoints::{apply_fixed_expenses_endpoint, get_fixed_expense_suggestions_endpoint};
