//! Expense records and the endpoints for managing them.

mod db;
mod endpoints;

pub use db::{
    Expense, ExpenseFilter, ExpenseId, ExpenseUpdate, NewExpense, create_expense,
    create_expense_table, delete_expense, get_all_expenses, get_expense, get_expenses,
    has_fixed_expense_in_month, update_expense,
};
pub use endpoints::{
    create_expense_endpoint, delete_expense_endpoint, get_expense_endpoint,
    get_expenses_endpoint, update_expense_endpoint,
};
