//! Route handlers for reading and writing config entries.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    config::{ConfigEntry, get_all_config, get_config, update_config_value, upsert_config},
    extract::{JsonBody, PathParam},
};

/// The state needed to read and write config entries.
#[derive(Debug, Clone)]
pub struct ConfigState {
    /// The database connection for managing config entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ConfigState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for changing the value of an existing key.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub value: f64,
}

/// The request body for creating or overwriting a key.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigUpsert {
    pub key: String,
    pub value: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// A route handler for listing every config entry.
pub async fn get_all_config_endpoint(
    State(state): State<ConfigState>,
) -> Result<Json<Vec<ConfigEntry>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_config(&connection).map(Json)
}

/// A route handler for getting a single config entry by key.
pub async fn get_config_endpoint(
    State(state): State<ConfigState>,
    PathParam(key): PathParam<String>,
) -> Result<Json<ConfigEntry>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_config(&key, &connection).map(Json)
}

/// A route handler for changing the value of an existing config entry.
pub async fn update_config_endpoint(
    State(state): State<ConfigState>,
    PathParam(key): PathParam<String>,
    JsonBody(update): JsonBody<ConfigUpdate>,
) -> Result<Json<ConfigEntry>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_config_value(&key, update.value, &connection).map(Json)
}

/// A route handler for creating a config entry or overwriting an existing one.
pub async fn upsert_config_endpoint(
    State(state): State<ConfigState>,
    JsonBody(upsert): JsonBody<ConfigUpsert>,
) -> Result<Json<ConfigEntry>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    upsert_config(
        &upsert.key,
        upsert.value,
        upsert.description.as_deref(),
        &connection,
    )
    .map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use rusqlite::Connection;

    use crate::{
        Error,
        config::create_config_table,
        extract::{JsonBody, PathParam},
    };

    use super::{
        ConfigState, ConfigUpdate, ConfigUpsert, get_config_endpoint, update_config_endpoint,
        upsert_config_endpoint,
    };

    fn get_test_state() -> ConfigState {
        let connection = Connection::open_in_memory().unwrap();
        create_config_table(&connection).unwrap();

        ConfigState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn upsert_then_get() {
        let state = get_test_state();

        let Json(created) = upsert_config_endpoint(
            State(state.clone()),
            JsonBody(ConfigUpsert {
                key: "monthly_salary".to_owned(),
                value: 1234.5,
                description: None,
            }),
        )
        .await
        .unwrap();

        let Json(got) = get_config_endpoint(State(state), PathParam("monthly_salary".to_owned()))
            .await
            .unwrap();

        assert_eq!(created, got);
    }

    #[tokio::test]
    async fn update_missing_key_fails() {
        let state = get_test_state();

        let result = update_config_endpoint(
            State(state),
            PathParam("monthly_salary".to_owned()),
            JsonBody(ConfigUpdate { value: 1.0 }),
        )
        .await;

        assert_eq!(
            result.map(|Json(entry)| entry),
            Err(Error::ConfigKeyNotFound("monthly_salary".to_owned()))
        );
    }
}
