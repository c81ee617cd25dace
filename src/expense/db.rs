//! Expense types and database operations.

use rusqlite::{Connection, Row, ToSql, params};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    category::{CategoryId, category_exists},
    database_id::DatabaseId,
    deserialize_some,
};

/// Database identifier for an expense.
pub type ExpenseId = DatabaseId;

/// Money spent on a given date, filed under a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub date: Date,
    pub amount: f64,
    pub category_id: CategoryId,
    /// Whether this is a recurring expense, e.g. rent.
    pub is_fixed: bool,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// The name of the category, `None` if the category row no longer exists.
    pub category_name: Option<String>,
}

/// The data needed to create an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    /// The day the money was spent.
    pub date: Date,
    /// The amount spent.
    pub amount: f64,
    /// The category the expense belongs to, must exist.
    pub category_id: CategoryId,
    /// Whether the expense is one of the month's fixed expenses.
    #[serde(default)]
    pub is_fixed: bool,
    /// Free text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewExpense {
    /// A variable expense with no notes.
    pub fn new(date: Date, amount: f64, category_id: CategoryId) -> Self {
        Self {
            date,
            amount,
            category_id,
            is_fixed: false,
            notes: None,
        }
    }

    /// Set whether the expense is a fixed expense.
    pub fn fixed(mut self, is_fixed: bool) -> Self {
        self.is_fixed = is_fixed;
        self
    }

    /// Set the notes for the expense.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_owned());
        self
    }
}

/// The fields to change on an existing expense.
///
/// Fields that are `None` are left unchanged. `notes` can be cleared by
/// sending an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    #[serde(default)]
    pub date: Option<Date>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub is_fixed: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

/// Optional filters for listing expenses. All filters that are set must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    /// The month of the year, 1 to 12.
    pub month: Option<u8>,
    pub year: Option<i32>,
    pub category_id: Option<CategoryId>,
}

impl ExpenseFilter {
    /// Expenses in the month and year of `date`.
    pub fn month_of(date: Date) -> Self {
        Self {
            month: Some(date.month().into()),
            year: Some(date.year()),
            category_id: None,
        }
    }
}

const SELECT_EXPENSE: &str = "SELECT expense.id, expense.date, expense.amount, \
    expense.category_id, expense.is_fixed, expense.notes, expense.created_at, expense.updated_at, \
    category.name FROM expense LEFT JOIN category ON expense.category_id = category.id";

/// Create an expense and return it with its generated ID and category name.
///
/// # Errors
/// Returns [Error::InvalidCategory] if `category_id` does not refer to a category.
pub fn create_expense(expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    if !category_exists(expense.category_id, connection)? {
        return Err(Error::InvalidCategory(expense.category_id));
    }

    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO expense (date, amount, category_id, is_fixed, notes, created_at, updated_at) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            expense.date,
            expense.amount,
            expense.category_id,
            expense.is_fixed,
            expense.notes,
            now,
            now
        ],
    )?;

    let id = connection.last_insert_rowid();

    get_expense(id, connection)
}

/// Retrieve a single expense by ID.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(&format!("{SELECT_EXPENSE} WHERE expense.id = :id"))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(Error::from)
}

/// Retrieve the expenses matching `filter`, most recent first.
///
/// # Errors
/// Returns [Error::InvalidMonth] if the month filter is not between 1 and 12.
pub fn get_expenses(
    filter: &ExpenseFilter,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let mut clauses = Vec::new();
    let mut query_params: Vec<(&str, &dyn ToSql)> = Vec::new();

    if let Some(month) = &filter.month {
        if !(1..=12).contains(month) {
            return Err(Error::InvalidMonth(*month));
        }

        clauses.push("CAST(strftime('%m', expense.date) AS INTEGER) = :month");
        query_params.push((":month", month));
    }

    if let Some(year) = &filter.year {
        clauses.push("CAST(strftime('%Y', expense.date) AS INTEGER) = :year");
        query_params.push((":year", year));
    }

    if let Some(category_id) = &filter.category_id {
        clauses.push("expense.category_id = :category_id");
        query_params.push((":category_id", category_id));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    // Sort by date, and then ID to keep the order stable after updates
    let query =
        format!("{SELECT_EXPENSE} {where_clause} ORDER BY expense.date DESC, expense.id DESC");

    connection
        .prepare(&query)?
        .query_map(query_params.as_slice(), map_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Retrieve every expense in the order they were created.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(&format!("{SELECT_EXPENSE} ORDER BY expense.id ASC"))?
        .query_map([], map_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Whether a fixed expense for `category_id` has been recorded in the month of `date`.
pub fn has_fixed_expense_in_month(
    category_id: CategoryId,
    date: Date,
    connection: &Connection,
) -> Result<bool, Error> {
    let month = format!("{:04}-{:02}", date.year(), u8::from(date.month()));

    connection
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM expense
                WHERE category_id = ?1 AND is_fixed = 1 AND strftime('%Y-%m', date) = ?2
            )",
            params![category_id, month],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Apply `update` to the expense with `id` and stamp the update time.
///
/// # Errors
/// Returns [Error::UpdateMissingExpense] if the expense does not exist, or
/// [Error::InvalidCategory] if the new category does not exist.
pub fn update_expense(
    id: ExpenseId,
    update: ExpenseUpdate,
    connection: &Connection,
) -> Result<Expense, Error> {
    let existing = get_expense(id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingExpense,
        error => error,
    })?;

    if let Some(category_id) = update.category_id
        && !category_exists(category_id, connection)?
    {
        return Err(Error::InvalidCategory(category_id));
    }

    let notes = match update.notes {
        Some(notes) => notes,
        None => existing.notes,
    };

    connection.execute(
        "UPDATE expense SET date = ?1, amount = ?2, category_id = ?3, is_fixed = ?4, notes = ?5, \
        updated_at = ?6 WHERE id = ?7",
        params![
            update.date.unwrap_or(existing.date),
            update.amount.unwrap_or(existing.amount),
            update.category_id.unwrap_or(existing.category_id),
            update.is_fixed.unwrap_or(existing.is_fixed),
            notes,
            OffsetDateTime::now_utc(),
            id
        ],
    )?;

    get_expense(id, connection)
}

/// Delete an expense by ID.
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if the expense does not exist.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Initialize the expense table and indexes.
///
/// `category_id` has no foreign key constraint. It is checked by
/// [create_expense] and [update_expense] instead, so expenses can outlive a
/// category removed outside of [crate::category::delete_category].
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            amount REAL NOT NULL,
            category_id INTEGER NOT NULL,
            is_fixed INTEGER NOT NULL DEFAULT 0,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);
        CREATE INDEX IF NOT EXISTS idx_expense_category_id ON expense(category_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: row.get(2)?,
        category_id: row.get(3)?,
        is_fixed: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        category_name: row.get(8)?,
    })
}
