//! Debt types and database operations.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::DatabaseId};

/// Database identifier for a debt.
pub type DebtId = DatabaseId;

/// Money owed, e.g. a car loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: DebtId,
    pub name: String,
    /// The amount originally borrowed.
    pub principal: f64,
    /// The amount still owed.
    pub remaining: f64,
    pub interest_rate: f64,
    pub monthly_payment: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The data needed to create a debt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDebt {
    /// A label for the debt, e.g. "Car loan".
    pub name: String,
    /// The amount originally borrowed.
    pub principal: f64,
    /// The amount still owed, counted against net worth.
    pub remaining: f64,
    /// The annual interest rate as a percentage.
    #[serde(default)]
    pub interest_rate: f64,
    /// The amount paid each month.
    #[serde(default)]
    pub monthly_payment: f64,
}

/// The fields to change on an existing debt. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub principal: Option<f64>,
    #[serde(default)]
    pub remaining: Option<f64>,
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub monthly_payment: Option<f64>,
}

const SELECT_DEBT: &str = "SELECT id, name, principal, remaining, interest_rate, monthly_payment, \
    created_at, updated_at FROM debt";

/// Create a debt and return it with its generated ID.
pub fn create_debt(debt: NewDebt, connection: &Connection) -> Result<Debt, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO debt (name, principal, remaining, interest_rate, monthly_payment, \
        created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            debt.name,
            debt.principal,
            debt.remaining,
            debt.interest_rate,
            debt.monthly_payment,
            now,
            now
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Debt {
        id,
        name: debt.name,
        principal: debt.principal,
        remaining: debt.remaining,
        interest_rate: debt.interest_rate,
        monthly_payment: debt.monthly_payment,
        created_at: now,
        updated_at: now,
    })
}

/// Retrieve a single debt by ID.
pub fn get_debt(id: DebtId, connection: &Connection) -> Result<Debt, Error> {
    connection
        .prepare(&format!("{SELECT_DEBT} WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(Error::from)
}

/// Retrieve all debts in the order they were created.
pub fn get_all_debts(connection: &Connection) -> Result<Vec<Debt>, Error> {
    connection
        .prepare(&format!("{SELECT_DEBT} ORDER BY id ASC"))?
        .query_map([], map_row)?
        .map(|maybe_debt| maybe_debt.map_err(Error::from))
        .collect()
}

/// Get the total amount still owed across all debts.
pub fn get_total_debt_remaining(connection: &Connection) -> Result<f64, Error> {
    let mut stmt = connection.prepare("SELECT COALESCE(SUM(remaining), 0) FROM debt")?;

    let total: f64 = stmt.query_row([], |row| row.get(0))?;

    Ok(total)
}

/// Apply `update` to the debt with `id` and stamp the update time.
///
/// # Errors
/// Returns [Error::UpdateMissingDebt] if the debt does not exist.
pub fn update_debt(id: DebtId, update: DebtUpdate, connection: &Connection) -> Result<Debt, Error> {
    let existing = get_debt(id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingDebt,
        error => error,
    })?;

    let updated = Debt {
        name: update.name.unwrap_or(existing.name),
        principal: update.principal.unwrap_or(existing.principal),
        remaining: update.remaining.unwrap_or(existing.remaining),
        interest_rate: update.interest_rate.unwrap_or(existing.interest_rate),
        monthly_payment: update.monthly_payment.unwrap_or(existing.monthly_payment),
        updated_at: OffsetDateTime::now_utc(),
        ..existing
    };

    connection.execute(
        "UPDATE debt SET name = ?1, principal = ?2, remaining = ?3, interest_rate = ?4, \
        monthly_payment = ?5, updated_at = ?6 WHERE id = ?7",
        params![
            updated.name,
            updated.principal,
            updated.remaining,
            updated.interest_rate,
            updated.monthly_payment,
            updated.updated_at,
            id
        ],
    )?;

    Ok(updated)
}

/// Delete a debt by ID.
///
/// # Errors
/// Returns [Error::DeleteMissingDebt] if the debt does not exist.
pub fn delete_debt(id: DebtId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM debt WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingDebt);
    }

    Ok(())
}

/// Initialize the debt table.
pub fn create_debt_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS debt (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            principal REAL NOT NULL,
            remaining REAL NOT NULL,
            interest_rate REAL NOT NULL DEFAULT 0,
            monthly_payment REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Debt, rusqlite::Error> {
    Ok(Debt {
        id: row.get(0)?,
        name: row.get(1)?,
        principal: row.get(2)?,
        remaining: row.get(3)?,
        interest_rate: row.get(4)?,
        monthly_payment: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
