//! Database operations for config entries.

use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::DatabaseId};

/// The config key for the user's monthly salary.
pub const MONTHLY_SALARY_KEY: &str = "monthly_salary";
/// The config key for the investment balance before any recorded investments.
pub const BASE_INVESTMENTS_KEY: &str = "base_investments";

/// The salary used when [MONTHLY_SALARY_KEY] is missing.
pub const DEFAULT_MONTHLY_SALARY: f64 = 100_000.0;
/// The base investments used when [BASE_INVESTMENTS_KEY] is missing.
pub const DEFAULT_BASE_INVESTMENTS: f64 = 200_000.0;

/// A numeric setting identified by a unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub id: DatabaseId,
    pub key: String,
    pub value: f64,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Retrieve every config entry.
pub fn get_all_config(connection: &Connection) -> Result<Vec<ConfigEntry>, Error> {
    connection
        .prepare("SELECT id, key, value, description, updated_at FROM config ORDER BY id ASC")?
        .query_map([], map_row)?
        .map(|maybe_entry| maybe_entry.map_err(Error::from))
        .collect()
}

/// Retrieve a config entry by its key.
///
/// # Errors
/// Returns [Error::ConfigKeyNotFound] if there is no entry for `key`.
pub fn get_config(key: &str, connection: &Connection) -> Result<ConfigEntry, Error> {
    connection
        .prepare("SELECT id, key, value, description, updated_at FROM config WHERE key = ?1")?
        .query_row([key], map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::ConfigKeyNotFound(key.to_owned()),
            error => error.into(),
        })
}

/// Get the value for `key`, or `default` if the key has not been set.
pub fn get_config_value_or(key: &str, default: f64, connection: &Connection) -> Result<f64, Error> {
    let value = connection
        .query_row("SELECT value FROM config WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;

    Ok(value.unwrap_or(default))
}

/// Set the value of an existing config entry and stamp the update time.
///
/// The update time changes even when `value` is the same as the stored value.
///
/// # Errors
/// Returns [Error::ConfigKeyNotFound] if there is no entry for `key`.
pub fn update_config_value(
    key: &str,
    value: f64,
    connection: &Connection,
) -> Result<ConfigEntry, Error> {
    let rows_affected = connection.execute(
        "UPDATE config SET value = ?1, updated_at = ?2 WHERE key = ?3",
        params![value, OffsetDateTime::now_utc(), key],
    )?;

    if rows_affected == 0 {
        return Err(Error::ConfigKeyNotFound(key.to_owned()));
    }

    get_config(key, connection)
}

/// Create the entry for `key`, or overwrite its value if it already exists.
///
/// An existing description is kept when `description` is `None`.
pub fn upsert_config(
    key: &str,
    value: f64,
    description: Option<&str>,
    connection: &Connection,
) -> Result<ConfigEntry, Error> {
    connection.execute(
        "INSERT INTO config (key, value, description, updated_at) VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            description = COALESCE(excluded.description, config.description),
            updated_at = excluded.updated_at",
        params![key, value, description, OffsetDateTime::now_utc()],
    )?;

    get_config(key, connection)
}

/// Initialize the config table.
pub fn create_config_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS config (
            id INTEGER PRIMARY KEY,
            key TEXT NOT NULL UNIQUE,
            value REAL NOT NULL,
            description TEXT,
            updated_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<ConfigEntry, rusqlite::Error> {
    Ok(ConfigEntry {
        id: row.get(0)?,
        key: row.get(1)?,
        value: row.get(2)?,
        description: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use std::{thread::sleep, time::Duration};

    use rusqlite::Connection;

    use crate::Error;

    use super::{
        create_config_table, get_all_config, get_config, get_config_value_or,
        update_config_value, upsert_config,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_config_table(&connection).expect("Could not create config table");
        connection
    }

    #[test]
    fn upsert_creates_entry() {
        let connection = get_test_connection();

        let entry = upsert_config("monthly_salary", 5000.0, Some("Salary"), &connection).unwrap();

        assert!(entry.id > 0);
        assert_eq!(entry.key, "monthly_salary");
        assert_eq!(entry.value, 5000.0);
        assert_eq!(entry.description.as_deref(), Some("Salary"));
    }

    #[test]
    fn upsert_overwrites_value_and_keeps_description() {
        let connection = get_test_connection();
        let original =
            upsert_config("monthly_salary", 5000.0, Some("Salary"), &connection).unwrap();

        let updated = upsert_config("monthly_salary", 6000.0, None, &connection).unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.value, 6000.0);
        assert_eq!(updated.description.as_deref(), Some("Salary"));
        assert_eq!(get_all_config(&connection).unwrap().len(), 1);
    }

    #[test]
    fn get_missing_key_returns_config_key_not_found() {
        let connection = get_test_connection();

        let result = get_config("nope", &connection);

        assert_eq!(result, Err(Error::ConfigKeyNotFound("nope".to_owned())));
    }

    #[test]
    fn get_config_value_or_falls_back_to_default() {
        let connection = get_test_connection();

        assert_eq!(get_config_value_or("nope", 42.0, &connection), Ok(42.0));

        upsert_config("yep", 7.0, None, &connection).unwrap();
        assert_eq!(get_config_value_or("yep", 42.0, &connection), Ok(7.0));
    }

    #[test]
    fn update_missing_key_returns_config_key_not_found() {
        let connection = get_test_connection();

        let result = update_config_value("nope", 1.0, &connection);

        assert_eq!(result, Err(Error::ConfigKeyNotFound("nope".to_owned())));
    }

    #[test]
    fn update_with_same_value_only_changes_timestamp() {
        let connection = get_test_connection();
        let original = upsert_config("base_investments", 200.0, None, &connection).unwrap();
        sleep(Duration::from_millis(5));

        let first = update_config_value("base_investments", 200.0, &connection).unwrap();
        sleep(Duration::from_millis(5));
        let second = update_config_value("base_investments", 200.0, &connection).unwrap();

        assert_eq!(first.value, original.value);
        assert_eq!(second.value, original.value);
        assert!(first.updated_at > original.updated_at);
        assert!(second.updated_at > first.updated_at);
    }
}
