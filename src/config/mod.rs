//! Numeric application settings stored by key, e.g. the monthly salary.

mod db;
mod endpoints;

pub use db::{
    BASE_INVESTMENTS_KEY, ConfigEntry, DEFAULT_BASE_INVESTMENTS, DEFAULT_MONTHLY_SALARY,
    MONTHLY_SALARY_KEY, create_config_table, get_all_config, get_config, get_config_value_or,
    update_config_value, upsert_config,
};
pub use endpoints::{
    get_all_config_endpoint, get_config_endpoint, update_config_endpoint, upsert_config_endpoint,
};
