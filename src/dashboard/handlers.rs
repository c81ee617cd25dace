//! Dashboard HTTP handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dashboard::{DashboardSnapshot, build_dashboard_snapshot},
    timezone::get_local_today,
};

/// The state needed for the dashboard.
///
/// Contains the database connection and timezone information required
/// to decide which month is the current month.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading expenses, investments and debts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Respond with the dashboard statistics for the current month.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
) -> Result<Json<DashboardSnapshot>, Error> {
    let today = get_local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    build_dashboard_snapshot(today, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;

    use crate::{
        Error,
        db::{initialize, seed_database},
        savings::SavingsStatus,
    };

    use super::{DashboardState, get_dashboard_endpoint};

    fn get_test_state(local_timezone: &str) -> DashboardState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        seed_database(&connection).unwrap();

        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: local_timezone.to_owned(),
        }
    }

    #[tokio::test]
    async fn responds_with_snapshot() {
        let state = get_test_state("Etc/UTC");

        let snapshot = get_dashboard_endpoint(State(state)).await.unwrap().0;

        assert_eq!(snapshot.monthly_salary, 100_000.0);
        assert_eq!(snapshot.status, SavingsStatus::Rich);
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let state = get_test_state("Not/AZone");

        let result = get_dashboard_endpoint(State(state)).await;

        assert_eq!(
            result.map(|json| json.0),
            Err(Error::InvalidTimezoneError("Not/AZone".to_owned()))
        );
    }
}
