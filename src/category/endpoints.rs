//! Route handlers for listing, creating and deleting categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, Message,
    extract::{JsonBody, PathParam},
    category::{
        Category, CategoryId, CategoryName, NewCategory, create_category, delete_category,
        get_all_categories,
    },
};

use super::db::DEFAULT_ICON;

/// The state needed to manage categories.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn default_icon() -> String {
    DEFAULT_ICON.to_owned()
}

/// The request body for creating a category.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub default_amount: f64,
}

impl TryFrom<CategoryForm> for NewCategory {
    type Error = Error;

    fn try_from(form: CategoryForm) -> Result<Self, Self::Error> {
        Ok(NewCategory {
            name: CategoryName::new(&form.name)?,
            icon: form.icon,
            is_fixed: form.is_fixed,
            default_amount: form.default_amount,
        })
    }
}

/// A route handler for listing all categories.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_categories(&connection).map(Json)
}

/// A route handler for creating a category, responds with the new category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    JsonBody(form): JsonBody<CategoryForm>,
) -> Result<Json<Category>, Error> {
    let new_category = NewCategory::try_from(form)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    create_category(new_category, &connection).map(Json)
}

/// A route handler for deleting a category that no expense refers to.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    PathParam(category_id): PathParam<CategoryId>,
) -> Result<Json<Message>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_category(category_id, &connection)
        .inspect_err(|error| tracing::debug!("Could not delete category {category_id}: {error}"))?;

    Ok(Message::new("Category deleted"))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        extract::{JsonBody, PathParam},
    };

    use super::{
        CategoryForm, CategoryState, create_category_endpoint, delete_category_endpoint,
        get_categories_endpoint,
    };

    fn get_test_state() -> CategoryState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn form(name: &str) -> CategoryForm {
        serde_json::from_value(serde_json::json!({ "name": name })).unwrap()
    }

    #[test]
    fn form_defaults() {
        let form = form("Food");

        assert_eq!(form.icon, "package");
        assert!(!form.is_fixed);
        assert_eq!(form.default_amount, 0.0);
    }

    #[tokio::test]
    async fn create_then_list() {
        let state = get_test_state();

        let Json(created) = create_category_endpoint(State(state.clone()), JsonBody(form(" Food ")))
            .await
            .unwrap();
        let Json(categories) = get_categories_endpoint(State(state)).await.unwrap();

        assert_eq!(created.name.as_ref(), "Food");
        assert_eq!(categories, vec![created]);
    }

    #[tokio::test]
    async fn create_with_blank_name_fails() {
        let state = get_test_state();

        let result = create_category_endpoint(State(state), JsonBody(form("   "))).await;

        assert_eq!(result.map(|Json(c)| c), Err(Error::EmptyCategoryName));
    }

    #[tokio::test]
    async fn delete_missing_category_fails() {
        let state = get_test_state();

        let result = delete_category_endpoint(State(state), PathParam(42)).await;

        assert_eq!(result.map(|Json(m)| m), Err(Error::DeleteMissingCategory));
    }
}
