use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use fintrack::{
    CategoryName, InvestmentKind, NewCategory, NewDebt, NewExpense, NewInvestment,
    create_category, create_debt, create_expense, create_investment, initialize_db,
    seed_database,
};

/// A utility for creating a test database for the fintrack server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Variable expenses logged each month as (category ID, day of month, amount, notes).
const MONTHLY_EXPENSES: [(i64, u8, f64, &str); 6] = [
    (2, 5, 3_200.0, "Power and water"),
    (4, 7, 6_500.0, "Weekly shop"),
    (4, 21, 5_900.0, "Weekly shop"),
    (7, 12, 2_400.0, "Dinner out"),
    (8, 3, 1_800.0, "Fuel"),
    (9, 18, 1_200.0, "Cinema"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;
    seed_database(&conn)?;

    println!("Creating fixed categories...");
    let mortgage = create_category(
        NewCategory {
            name: CategoryName::new("Mortgage")?,
            icon: "home".to_owned(),
            is_fixed: true,
            default_amount: 35_000.0,
        },
        &conn,
    )?;
    create_category(
        NewCategory {
            name: CategoryName::new("Internet")?,
            icon: "zap".to_owned(),
            is_fixed: true,
            default_amount: 1_200.0,
        },
        &conn,
    )?;

    println!("Creating expenses for the last three months...");
    let today = OffsetDateTime::now_utc().date();
    let mut month_start = today.replace_day(1)?;

    for _ in 0..3 {
        month_start = previous_month_start(month_start)?;

        create_expense(
            NewExpense::new(month_start, mortgage.default_amount, mortgage.id)
                .fixed(true)
                .notes("Monthly mortgage payment"),
            &conn,
        )?;

        for (category_id, day, amount, notes) in MONTHLY_EXPENSES {
            create_expense(
                NewExpense::new(month_start.replace_day(day)?, amount, category_id).notes(notes),
                &conn,
            )?;
        }
    }

    println!("Creating investments...");
    for (kind, amount, description) in [
        (InvestmentKind::Deposit, 25_000.0, "Index fund top up"),
        (InvestmentKind::Dividend, 1_350.0, "Quarterly dividend"),
        (InvestmentKind::Withdrawal, 5_000.0, "Holiday fund"),
    ] {
        create_investment(
            NewInvestment {
                date: month_start,
                amount,
                kind,
                description: Some(description.to_owned()),
            },
            &conn,
        )?;
    }

    println!("Creating debts...");
    create_debt(
        NewDebt {
            name: "Car loan".to_owned(),
            principal: 600_000.0,
            remaining: 420_000.0,
            interest_rate: 9.5,
            monthly_payment: 14_000.0,
        },
        &conn,
    )?;

    println!("Success!");

    Ok(())
}

fn previous_month_start(month_start: Date) -> Result<Date, time::error::ComponentRange> {
    (month_start - Duration::days(1)).replace_day(1)
}
