//! Route handlers for investments.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, Message,
    extract::{JsonBody, PathParam, QueryParams},
    investment::{
        Investment, InvestmentFilter, InvestmentId, InvestmentUpdate, NewInvestment,
        create_investment, delete_investment, get_investments, update_investment,
    },
};

/// The state needed to manage investments.
#[derive(Debug, Clone)]
pub struct InvestmentState {
    /// The database connection for managing investments.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for InvestmentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing investments, optionally filtered by year and type.
pub async fn get_investments_endpoint(
    State(state): State<InvestmentState>,
    QueryParams(filter): QueryParams<InvestmentFilter>,
) -> Result<Json<Vec<Investment>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_investments(&filter, &connection).map(Json)
}

/// A route handler for recording an investment, responds with the new investment.
pub async fn create_investment_endpoint(
    State(state): State<InvestmentState>,
    JsonBody(new_investment): JsonBody<NewInvestment>,
) -> Result<Json<Investment>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    create_investment(new_investment, &connection).map(Json)
}

/// A route handler for changing the supplied fields of an investment.
pub async fn update_investment_endpoint(
    State(state): State<InvestmentState>,
    PathParam(investment_id): PathParam<InvestmentId>,
    JsonBody(update): JsonBody<InvestmentUpdate>,
) -> Result<Json<Investment>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_investment(investment_id, update, &connection).map(Json)
}

/// A route handler for deleting an investment.
pub async fn delete_investment_endpoint(
    State(state): State<InvestmentState>,
    PathParam(investment_id): PathParam<InvestmentId>,
) -> Result<Json<Message>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_investment(investment_id, &connection)?;

    Ok(Message::new("Investment deleted"))
}
