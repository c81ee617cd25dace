//! Implements a struct that holds the state of the REST server.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

use crate::{
    Error,
    db::{initialize, seed_database},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Used to decide what "today" and "this month" mean.
    pub local_timezone: String,

    /// Where the CSV export is written before it is sent to the client.
    pub export_path: PathBuf,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the
    /// domain models and seeding the default config and categories if the
    /// database is empty.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or seeded.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        export_path: impl Into<PathBuf>,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        if seed_database(&db_connection)? {
            tracing::info!("Seeded the database with the default config and categories");
        }

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            export_path: export_path.into(),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{AppState, category::get_all_categories, config::get_all_config};

    #[test]
    fn new_initializes_and_seeds_database() {
        let connection = Connection::open_in_memory().unwrap();

        let state = AppState::new(connection, "Etc/UTC", "export.csv").unwrap();

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_all_config(&connection).unwrap().len(), 2);
        assert_eq!(get_all_categories(&connection).unwrap().len(), 12);
    }
}
