/*! Creates the application's tables and seeds a fresh database. */

use rusqlite::{Connection, TransactionBehavior};

use crate::{
    Error,
    category::{NewCategory, create_category, create_category_table},
    config::{
        BASE_INVESTMENTS_KEY, DEFAULT_BASE_INVESTMENTS, DEFAULT_MONTHLY_SALARY,
        MONTHLY_SALARY_KEY, create_config_table, upsert_config,
    },
    debt::create_debt_table,
    expense::create_expense_table,
    investment::create_investment_table,
};

/// The categories every new database starts with as (name, icon) pairs.
const DEFAULT_CATEGORIES: [(&str, &str); 12] = [
    ("Rent", "home"),
    ("Utilities", "zap"),
    ("Gym", "dumbbell"),
    ("Groceries", "shopping-cart"),
    ("Family", "users"),
    ("Loan", "landmark"),
    ("Food", "utensils"),
    ("Transport", "car"),
    ("Entertainment", "film"),
    ("Shopping", "shopping-bag"),
    ("Healthcare", "heart-pulse"),
    ("Other", "package"),
];

/// Create the tables for all the domain models if they do not already exist.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    create_config_table(&transaction)?;
    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_investment_table(&transaction)?;
    create_debt_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Insert the default config entries and categories if the config table is empty.
///
/// Returns `true` if the database was seeded, `false` if it already had data.
/// Everything is inserted in a single transaction, so a failure leaves the
/// database untouched and the error is returned to the caller.
///
/// # Errors
/// Returns an error if the tables have not been created or there is an SQL error.
pub fn seed_database(connection: &Connection) -> Result<bool, Error> {
    let transaction =
        rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let has_config: bool =
        transaction.query_row("SELECT EXISTS(SELECT 1 FROM config)", [], |row| row.get(0))?;

    if has_config {
        return Ok(false);
    }

    upsert_config(
        MONTHLY_SALARY_KEY,
        DEFAULT_MONTHLY_SALARY,
        Some("Monthly salary"),
        &transaction,
    )?;
    upsert_config(
        BASE_INVESTMENTS_KEY,
        DEFAULT_BASE_INVESTMENTS,
        Some("Initial investments"),
        &transaction,
    )?;

    for (name, icon) in DEFAULT_CATEGORIES {
        create_category(NewCategory::new_unchecked(name, icon), &transaction)?;
    }

    transaction.commit()?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        Error,
        category::get_all_categories,
        config::{MONTHLY_SALARY_KEY, get_all_config, get_config},
    };

    use super::{initialize, seed_database};

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        assert_eq!(initialize(&connection), Ok(()));
        assert_eq!(initialize(&connection), Ok(()));
    }

    #[test]
    fn seeds_empty_database() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let seeded = seed_database(&connection);

        assert_eq!(seeded, Ok(true));
        let salary = get_config(MONTHLY_SALARY_KEY, &connection).unwrap();
        assert_eq!(salary.value, 100_000.0);
        let categories = get_all_categories(&connection).unwrap();
        assert_eq!(categories.len(), 12);
        assert!(categories.iter().all(|category| !category.is_fixed));
        assert_eq!(categories.last().unwrap().name.as_ref(), "Other");
    }

    #[test]
    fn seeding_twice_does_nothing_the_second_time() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        seed_database(&connection).unwrap();

        let seeded = seed_database(&connection);

        assert_eq!(seeded, Ok(false));
        assert_eq!(get_all_config(&connection).unwrap().len(), 2);
        assert_eq!(get_all_categories(&connection).unwrap().len(), 12);
    }

    #[test]
    fn seeding_failure_is_reported_and_rolled_back() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        // A pre-existing category with a default name makes the seed fail part way through.
        connection
            .execute(
                "INSERT INTO category (name, icon, is_fixed, default_amount, created_at) \
                VALUES ('Other', 'package', 0, 0.0, ?1)",
                (OffsetDateTime::now_utc(),),
            )
            .unwrap();

        let seeded = seed_database(&connection);

        assert_eq!(seeded, Err(Error::DuplicateCategoryName));
        assert_eq!(get_all_config(&connection).unwrap().len(), 0);
        assert_eq!(get_all_categories(&connection).unwrap().len(), 1);
    }
}
