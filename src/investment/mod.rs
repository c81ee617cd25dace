//! Investment deposits, withdrawals and dividends.

mod db;
mod endpoints;

pub use db::{
    Investment, InvestmentFilter, InvestmentId, InvestmentKind, InvestmentUpdate, NewInvestment,
    create_investment, create_investment_table, delete_investment, get_investment_totals,
    get_investments, update_investment,
};
pub use endpoints::{
    create_investment_endpoint, delete_investment_endpoint, get_investments_endpoint,
    update_investment_endpoint,
};
