//! Investment types and database operations.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, database_id::DatabaseId, deserialize_some};

/// Database identifier for an investment.
pub type InvestmentId = DatabaseId;

/// How an investment record changes the investment balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentKind {
    /// Money put into investments, adds to the balance.
    Deposit,
    /// Money taken out of investments, subtracts from the balance.
    Withdrawal,
    /// Income paid out by investments, adds to the balance.
    Dividend,
}

impl InvestmentKind {
    fn as_str(&self) -> &'static str {
        match self {
            InvestmentKind::Deposit => "deposit",
            InvestmentKind::Withdrawal => "withdrawal",
            InvestmentKind::Dividend => "dividend",
        }
    }
}

impl Display for InvestmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvestmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(InvestmentKind::Deposit),
            "withdrawal" => Ok(InvestmentKind::Withdrawal),
            "dividend" => Ok(InvestmentKind::Dividend),
            other => Err(format!("unknown investment type \"{other}\"")),
        }
    }
}

impl ToSql for InvestmentKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for InvestmentKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// A change to the investment balance on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: InvestmentId,
    pub date: Date,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: InvestmentKind,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The data needed to create an investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvestment {
    /// The day of the transaction.
    pub date: Date,
    /// The amount moved, always positive. The kind decides the sign.
    pub amount: f64,
    /// Sent as `type` in JSON.
    #[serde(rename = "type")]
    pub kind: InvestmentKind,
    /// Free text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// The fields to change on an existing investment.
///
/// Fields that are `None` are left unchanged. `description` can be cleared by
/// sending an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentUpdate {
    #[serde(default)]
    pub date: Option<Date>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, rename = "type")]
    pub kind: Option<InvestmentKind>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

/// Optional filters for listing investments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentFilter {
    pub year: Option<i32>,
    #[serde(rename = "type")]
    pub kind: Option<InvestmentKind>,
}

/// The summed amounts of each kind of investment record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InvestmentTotals {
    pub deposits: f64,
    pub withdrawals: f64,
    pub dividends: f64,
}

impl InvestmentTotals {
    /// The change to the investment balance: deposits and dividends minus withdrawals.
    pub fn net(&self) -> f64 {
        self.deposits - self.withdrawals + self.dividends
    }
}

const SELECT_INVESTMENT: &str =
    "SELECT id, date, amount, type, description, created_at, updated_at FROM investment";

/// Create an investment and return it with its generated ID.
pub fn create_investment(
    investment: NewInvestment,
    connection: &Connection,
) -> Result<Investment, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO investment (date, amount, type, description, created_at, updated_at) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            investment.date,
            investment.amount,
            investment.kind,
            investment.description,
            now,
            now
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Investment {
        id,
        date: investment.date,
        amount: investment.amount,
        kind: investment.kind,
        description: investment.description,
        created_at: now,
        updated_at: now,
    })
}

/// Retrieve a single investment by ID.
pub fn get_investment(id: InvestmentId, connection: &Connection) -> Result<Investment, Error> {
    connection
        .prepare(&format!("{SELECT_INVESTMENT} WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(Error::from)
}

/// Retrieve the investments matching `filter`, most recent first.
pub fn get_investments(
    filter: &InvestmentFilter,
    connection: &Connection,
) -> Result<Vec<Investment>, Error> {
    let mut clauses = Vec::new();
    let mut query_params: Vec<(&str, &dyn ToSql)> = Vec::new();

    if let Some(year) = &filter.year {
        clauses.push("CAST(strftime('%Y', date) AS INTEGER) = :year");
        query_params.push((":year", year));
    }

    if let Some(kind) = &filter.kind {
        clauses.push("type = :type");
        query_params.push((":type", kind));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    let query = format!("{SELECT_INVESTMENT} {where_clause} ORDER BY date DESC, id DESC");

    connection
        .prepare(&query)?
        .query_map(query_params.as_slice(), map_row)?
        .map(|maybe_investment| maybe_investment.map_err(Error::from))
        .collect()
}

/// Sum the amounts of all investments by kind.
pub fn get_investment_totals(connection: &Connection) -> Result<InvestmentTotals, Error> {
    let mut totals = InvestmentTotals::default();

    let rows = connection
        .prepare("SELECT type, COALESCE(SUM(amount), 0) FROM investment GROUP BY type")?
        .query_map([], |row| {
            Ok((row.get::<_, InvestmentKind>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for (kind, total) in rows {
        match kind {
            InvestmentKind::Deposit => totals.deposits = total,
            InvestmentKind::Withdrawal => totals.withdrawals = total,
            InvestmentKind::Dividend => totals.dividends = total,
        }
    }

    Ok(totals)
}

/// Apply `update` to the investment with `id` and stamp the update time.
///
/// # Errors
/// Returns [Error::UpdateMissingInvestment] if the investment does not exist.
pub fn update_investment(
    id: InvestmentId,
    update: InvestmentUpdate,
    connection: &Connection,
) -> Result<Investment, Error> {
    let existing = get_investment(id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingInvestment,
        error => error,
    })?;

    let updated = Investment {
        date: update.date.unwrap_or(existing.date),
        amount: update.amount.unwrap_or(existing.amount),
        kind: update.kind.unwrap_or(existing.kind),
        description: update.description.unwrap_or(existing.description),
        updated_at: OffsetDateTime::now_utc(),
        ..existing
    };

    connection.execute(
        "UPDATE investment SET date = ?1, amount = ?2, type = ?3, description = ?4, \
        updated_at = ?5 WHERE id = ?6",
        params![
            updated.date,
            updated.amount,
            updated.kind,
            updated.description,
            updated.updated_at,
            id
        ],
    )?;

    Ok(updated)
}

/// Delete an investment by ID.
///
/// # Errors
/// Returns [Error::DeleteMissingInvestment] if the investment does not exist.
pub fn delete_investment(id: InvestmentId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM investment WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingInvestment);
    }

    Ok(())
}

/// Initialize the investment table.
pub fn create_investment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS investment (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            amount REAL NOT NULL,
            type TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Investment, rusqlite::Error> {
    Ok(Investment {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: row.get(2)?,
        kind: row.get(3)?,
        description: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
