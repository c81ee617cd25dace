//! Route handlers for debts.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, Message,
    extract::{JsonBody, PathParam},
    debt::{Debt, DebtId, DebtUpdate, NewDebt, create_debt, delete_debt, get_all_debts, update_debt},
};

/// The state needed to manage debts.
#[derive(Debug, Clone)]
pub struct DebtState {
    /// The database connection for managing debts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DebtState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing all debts.
pub async fn get_debts_endpoint(State(state): State<DebtState>) -> Result<Json<Vec<Debt>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_debts(&connection).map(Json)
}

/// A route handler for recording a debt, responds with the new debt.
pub async fn create_debt_endpoint(
    State(state): State<DebtState>,
    JsonBody(new_debt): JsonBody<NewDebt>,
) -> Result<Json<Debt>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    create_debt(new_debt, &connection).map(Json)
}

/// A route handler for changing the supplied fields of a debt.
pub async fn update_debt_endpoint(
    State(state): State<DebtState>,
    PathParam(debt_id): PathParam<DebtId>,
    JsonBody(update): JsonBody<DebtUpdate>,
) -> Result<Json<Debt>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_debt(debt_id, update, &connection).map(Json)
}

/// A route handler for deleting a debt.
pub async fn delete_debt_endpoint(
    State(state): State<DebtState>,
    PathParam(debt_id): PathParam<DebtId>,
) -> Result<Json<Message>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_debt(debt_id, &connection)?;

    Ok(Message::new("Debt deleted"))
}
