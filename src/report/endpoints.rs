use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    extract::QueryParams,
    report::{MonthlyReport, build_monthly_reports},
    timezone::get_local_today,
};

/// The state needed for building reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// Used to pick the current year when none is given.
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Query parameters for the monthly reports.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Defaults to the current year.
    pub year: Option<i32>,
}

/// A route handler for the monthly reports of a year.
pub async fn get_monthly_reports_endpoint(
    State(state): State<ReportState>,
    QueryParams(query): QueryParams<ReportQuery>,
) -> Result<Json<Vec<MonthlyReport>>, Error> {
    let year = match query.year {
        Some(year) => year,
        None => get_local_today(&state.local_timezone)?.year(),
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    build_monthly_reports(year, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use time::{OffsetDateTime, macros::date};

    use crate::{
        NewExpense, create_expense,
        db::{initialize, seed_database},
        extract::QueryParams,
    };

    use super::{ReportQuery, ReportState, get_monthly_reports_endpoint};

    fn get_test_state() -> ReportState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        seed_database(&connection).unwrap();

        ReportState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn uses_requested_year() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_expense(NewExpense::new(date!(2023 - 04 - 01), 10.0, 1), &connection).unwrap();
        }

        let reports = get_monthly_reports_endpoint(
            State(state),
            QueryParams(ReportQuery { year: Some(2023) }),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].year, 2023);
        assert_eq!(reports[0].month, 4);
    }

    #[tokio::test]
    async fn defaults_to_current_year() {
        let state = get_test_state();
        let today = OffsetDateTime::now_utc().date();
        {
            let connection = state.db_connection.lock().unwrap();
            create_expense(NewExpense::new(today, 10.0, 1), &connection).unwrap();
        }

        let reports =
            get_monthly_reports_endpoint(State(state), QueryParams(ReportQuery::default()))
                .await
                .unwrap()
                .0;

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].year, today.year());
    }
}
