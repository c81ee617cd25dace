//! fintrack is a local, single-user personal finance tracker.
//!
//! This library provides a JSON API over a SQLite database for recording
//! expenses, investments and debts, and for deriving dashboard and report
//! statistics from them. A small HTML shell served at the root path acts as
//! the user interface.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod category;
mod config;
mod dashboard;
mod database_id;
mod db;
mod debt;
mod endpoints;
mod expense;
mod export;
mod extract;
mod fixed_expense;
mod investment;
mod logging;
mod report;
mod routing;
mod savings;
mod shell;
#[cfg(test)]
mod test_utils;
mod timezone;

pub use app_state::AppState;
pub use category::{Category, CategoryId, CategoryName, NewCategory, create_category};
pub use config::{BASE_INVESTMENTS_KEY, MONTHLY_SALARY_KEY};
pub use db::{initialize as initialize_db, seed_database};
pub use debt::{NewDebt, create_debt};
pub use expense::{NewExpense, create_expense};
pub use investment::{InvestmentKind, NewInvestment, create_investment};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// There is no config entry with the given key.
    #[error("Config '{0}' not found")]
    ConfigKeyNotFound(String),

    /// The category ID used to create or update an expense did not match a
    /// category in the database.
    #[error("Category not found")]
    InvalidCategory(CategoryId),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The specified category name already exists in the database.
    #[error("Category already exists")]
    DuplicateCategoryName,

    /// The category cannot be deleted because expenses still refer to it.
    #[error("Cannot delete category with expenses")]
    CategoryInUse(CategoryId),

    /// A month filter outside of 1-12 was given.
    #[error("{0} is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// The request path, query string or body could not be parsed into the
    /// expected shape.
    #[error("{0}")]
    InvalidRequest(String),

    /// Tried to delete a category that does not exist
    #[error("Category not found")]
    DeleteMissingCategory,

    /// Tried to update an expense that does not exist
    #[error("Expense not found")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("Expense not found")]
    DeleteMissingExpense,

    /// Tried to update an investment that does not exist
    #[error("Investment not found")]
    UpdateMissingInvestment,

    /// Tried to delete an investment that does not exist
    #[error("Investment not found")]
    DeleteMissingInvestment,

    /// Tried to update a debt that does not exist
    #[error("Debt not found")]
    UpdateMissingDebt,

    /// Tried to delete a debt that does not exist
    #[error("Debt not found")]
    DeleteMissingDebt,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The CSV export file could not be written or read back.
    ///
    /// Callers should pass in the original error as a string.
    #[error("could not export expenses: {0}")]
    ExportError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("category.name") =>
            {
                Error::DuplicateCategoryName
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound
            | Error::ConfigKeyNotFound(_)
            | Error::InvalidCategory(_)
            | Error::DeleteMissingCategory
            | Error::UpdateMissingExpense
            | Error::DeleteMissingExpense
            | Error::UpdateMissingInvestment
            | Error::DeleteMissingInvestment
            | Error::UpdateMissingDebt
            | Error::DeleteMissingDebt => StatusCode::NOT_FOUND,
            Error::DuplicateCategoryName | Error::CategoryInUse(_) => StatusCode::BAD_REQUEST,
            Error::EmptyCategoryName | Error::InvalidMonth(_) | Error::InvalidRequest(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::ExportError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

/// The JSON body sent to the client after a successful delete.
#[derive(Debug, Serialize, serde::Deserialize, PartialEq)]
pub(crate) struct Message {
    pub message: String,
}

impl Message {
    pub(crate) fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Deserialize a field that may be absent, `null`, or a value.
///
/// Use with `#[serde(default, deserialize_with = "deserialize_some")]` on an
/// `Option<Option<T>>` so that an absent field is `None` and an explicit
/// `null` is `Some(None)`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn not_found_errors_map_to_404() {
        for error in [
            Error::NotFound,
            Error::ConfigKeyNotFound("foo".to_owned()),
            Error::InvalidCategory(3),
            Error::UpdateMissingExpense,
            Error::DeleteMissingDebt,
        ] {
            assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn conflicts_map_to_400() {
        assert_eq!(
            Error::DuplicateCategoryName.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::CategoryInUse(1).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn validation_errors_map_to_422() {
        assert_eq!(
            Error::EmptyCategoryName.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::InvalidMonth(13).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::InvalidRequest("bad body".to_owned())
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn internal_errors_map_to_500() {
        assert_eq!(
            Error::DatabaseLockError.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn query_returned_no_rows_becomes_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
