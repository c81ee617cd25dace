//! Route handlers for expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, Message,
    extract::{JsonBody, PathParam, QueryParams},
    expense::{
        Expense, ExpenseFilter, ExpenseId, ExpenseUpdate, NewExpense, create_expense,
        delete_expense, get_expense, get_expenses, update_expense,
    },
};

/// The state needed to manage expenses.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing expenses, optionally filtered by month, year and category.
pub async fn get_expenses_endpoint(
    State(state): State<ExpenseState>,
    QueryParams(filter): QueryParams<ExpenseFilter>,
) -> Result<Json<Vec<Expense>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_expenses(&filter, &connection).map(Json)
}

/// A route handler for getting a single expense.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    PathParam(expense_id): PathParam<ExpenseId>,
) -> Result<Json<Expense>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_expense(expense_id, &connection).map(Json)
}

/// A route handler for creating an expense, responds with the new expense.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    JsonBody(new_expense): JsonBody<NewExpense>,
) -> Result<Json<Expense>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    create_expense(new_expense, &connection).map(Json)
}

/// A route handler for changing the supplied fields of an expense.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    PathParam(expense_id): PathParam<ExpenseId>,
    JsonBody(update): JsonBody<ExpenseUpdate>,
) -> Result<Json<Expense>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_expense(expense_id, update, &connection).map(Json)
}

/// A route handler for deleting an expense.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    PathParam(expense_id): PathParam<ExpenseId>,
) -> Result<Json<Message>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_expense(expense_id, &connection)?;

    Ok(Message::new("Expense deleted"))
}
