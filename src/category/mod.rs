//! Categories that expenses are filed under.

mod db;
mod endpoints;

pub use db::{
    Category, CategoryId, CategoryName, NewCategory, category_exists, create_category,
    create_category_table, delete_category, get_all_categories, get_fixed_expense_categories,
};
pub use endpoints::{create_category_endpoint, delete_category_endpoint, get_categories_endpoint};
