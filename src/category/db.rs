//! Category types and database operations.

use std::fmt::Display;

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::DatabaseId};

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// The icon used when a category is created without one.
pub const DEFAULT_ICON: &str = "package";

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or only
    /// whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for grouping expenses (e.g., 'Rent', 'Groceries').
///
/// Fixed categories with a positive `default_amount` are candidates for the
/// monthly fixed-expense suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The unique, trimmed name of the category.
    pub name: CategoryName,
    /// The name of the icon shown next to the category in the UI.
    pub icon: String,
    /// Whether the category is a candidate for the monthly fixed expenses.
    pub is_fixed: bool,
    /// The amount logged when the fixed expense is applied.
    pub default_amount: f64,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The data needed to create a category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The name of the category, must not already exist.
    pub name: CategoryName,
    /// The name of the icon shown in the UI.
    pub icon: String,
    /// Whether the category is a candidate for the monthly fixed expenses.
    pub is_fixed: bool,
    /// The amount logged when the fixed expense is applied.
    pub default_amount: f64,
}

impl NewCategory {
    /// A variable (not fixed) category with no default amount.
    ///
    /// The caller should ensure that `name` is not empty.
    pub fn new_unchecked(name: &str, icon: &str) -> Self {
        Self {
            name: CategoryName::new_unchecked(name),
            icon: icon.to_owned(),
            is_fixed: false,
            default_amount: 0.0,
        }
    }
}

/// Create a category and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateCategoryName] if a category with the same name exists.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO category (name, icon, is_fixed, default_amount, created_at) \
        VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            category.name.as_ref(),
            category.icon,
            category.is_fixed,
            category.default_amount,
            created_at
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name: category.name,
        icon: category.icon,
        is_fixed: category.is_fixed,
        default_amount: category.default_amount,
        created_at,
    })
}

/// Retrieve all categories in the order they were created.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, icon, is_fixed, default_amount, created_at \
            FROM category ORDER BY id ASC",
        )?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the fixed categories that have a positive default amount.
pub fn get_fixed_expense_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, icon, is_fixed, default_amount, created_at \
            FROM category WHERE is_fixed = 1 AND default_amount > 0 ORDER BY id ASC",
        )?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Whether a category with `category_id` exists.
pub fn category_exists(category_id: CategoryId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM category WHERE id = ?1)",
            [category_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Delete a category by ID.
///
/// # Errors
/// Returns [Error::DeleteMissingCategory] if the category does not exist, or
/// [Error::CategoryInUse] if any expense still refers to it.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    if !category_exists(category_id, connection)? {
        return Err(Error::DeleteMissingCategory);
    }

    let in_use: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM expense WHERE category_id = ?1)",
        [category_id],
        |row| row.get(0),
    )?;

    if in_use {
        return Err(Error::CategoryInUse(category_id));
    }

    connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    Ok(())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            icon TEXT NOT NULL,
            is_fixed INTEGER NOT NULL DEFAULT 0,
            default_amount REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Category {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&raw_name),
        icon: row.get(2)?,
        is_fixed: row.get(3)?,
        default_amount: row.get(4)?,
        created_at: row.get(5)?,
    })
}


#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{
            CategoryName, NewCategory, category_exists, create_category, delete_category,
            get_all_categories, get_fixed_expense_categories,
        },
        db::initialize,
        expense::{NewExpense, create_expense},
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn fixed_category(name: &str, default_amount: f64) -> NewCategory {
        NewCategory {
            name: CategoryName::new_unchecked(name),
            icon: "home".to_owned(),
            is_fixed: true,
            default_amount,
        }
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_connection();
        let new_category = fixed_category("Rent", 1500.0);

        let category = create_category(new_category.clone(), &connection)
            .expect("Could not create category");

        assert!(category.id > 0);
        assert_eq!(category.name, new_category.name);
        assert_eq!(category.icon, "home");
        assert!(category.is_fixed);
        assert_eq!(category.default_amount, 1500.0);
    }

    #[test]
    fn create_category_with_duplicate_name_fails() {
        let connection = get_test_connection();
        create_category(NewCategory::new_unchecked("Food", "utensils"), &connection).unwrap();

        let result = create_category(NewCategory::new_unchecked("Food", "pizza"), &connection);

        assert_eq!(result, Err(Error::DuplicateCategoryName));
    }

    #[test]
    fn get_all_categories_in_creation_order() {
        let connection = get_test_connection();
        let inserted = vec![
            create_category(NewCategory::new_unchecked("Zebra", "package"), &connection).unwrap(),
            create_category(NewCategory::new_unchecked("Alpha", "package"), &connection).unwrap(),
        ];

        let selected = get_all_categories(&connection).unwrap();

        assert_eq!(inserted, selected);
    }

    #[test]
    fn fixed_expense_categories_need_positive_default_amount() {
        let connection = get_test_connection();
        create_category(NewCategory::new_unchecked("Food", "utensils"), &connection).unwrap();
        create_category(fixed_category("Gym", 0.0), &connection).unwrap();
        let rent = create_category(fixed_category("Rent", 1500.0), &connection).unwrap();

        let got = get_fixed_expense_categories(&connection).unwrap();

        assert_eq!(got, vec![rent]);
    }

    #[test]
    fn delete_category_succeeds() {
        let connection = get_test_connection();
        let category =
            create_category(NewCategory::new_unchecked("Foo", "package"), &connection).unwrap();

        assert_eq!(delete_category(category.id, &connection), Ok(()));
        assert_eq!(category_exists(category.id, &connection), Ok(false));
    }

    #[test]
    fn delete_missing_category_fails() {
        let connection = get_test_connection();

        assert_eq!(
            delete_category(999, &connection),
            Err(Error::DeleteMissingCategory)
        );
    }

    #[test]
    fn delete_category_with_expenses_fails() {
        let connection = get_test_connection();
        let category =
            create_category(NewCategory::new_unchecked("Food", "utensils"), &connection).unwrap();
        create_expense(
            NewExpense::new(date!(2025 - 03 - 04), 12.5, category.id),
            &connection,
        )
        .unwrap();

        let result = delete_category(category.id, &connection);

        assert_eq!(result, Err(Error::CategoryInUse(category.id)));
        assert_eq!(category_exists(category.id, &connection), Ok(true));
    }
}
