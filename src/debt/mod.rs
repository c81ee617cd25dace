//! Debts such as loans and credit cards.

mod db;
mod endpoints;

pub use db::{
    Debt, DebtId, DebtUpdate, NewDebt, create_debt, create_debt_table, delete_debt, get_all_debts,
    get_total_debt_remaining, update_debt,
};
pub use endpoints::{
    create_debt_endpoint, delete_debt_endpoint, get_debts_endpoint, update_debt_endpoint,
};
