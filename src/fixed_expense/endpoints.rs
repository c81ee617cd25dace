use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    fixed_expense::{
        ApplyFixedExpensesResult, FixedExpenseSuggestion, apply_fixed_expenses,
        get_fixed_expense_suggestions,
    },
    timezone::get_local_today,
};

/// The state needed to suggest and apply fixed expenses.
#[derive(Debug, Clone)]
pub struct FixedExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for FixedExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler listing this month's fixed-expense suggestions.
pub async fn get_fixed_expense_suggestions_endpoint(
    State(state): State<FixedExpenseState>,
) -> Result<Json<Vec<FixedExpenseSuggestion>>, Error> {
    let today = get_local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_fixed_expense_suggestions(today, &connection).map(Json)
}

/// A route handler that logs this month's missing fixed expenses.
pub async fn apply_fixed_expenses_endpoint(
    State(state): State<FixedExpenseState>,
) -> Result<Json<ApplyFixedExpensesResult>, Error> {
    let today = get_local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let result = apply_fixed_expenses(today, &connection)?;
    tracing::info!(
        "Applied fixed expenses for {}: {} applied, {} skipped",
        today.month(),
        result.applied.len(),
        result.skipped.len()
    );

    Ok(Json(result))
}
