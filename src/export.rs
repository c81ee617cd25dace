//! Exporting every expense as a CSV file.

use std::{
    io::Write,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::format_description::well_known::Rfc3339;

use crate::{
    AppState, Error,
    expense::{Expense, get_all_expenses},
    report::UNKNOWN_CATEGORY,
};

/// The file name suggested to the client for the download.
pub const EXPORT_FILE_NAME: &str = "finance_export.csv";

const HEADER: [&str; 7] = [
    "ID",
    "Date",
    "Amount",
    "Category",
    "Is Fixed",
    "Notes",
    "Created At",
];

/// The state needed to export expenses.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where the CSV file is written before it is sent.
    pub export_path: PathBuf,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            export_path: state.export_path.clone(),
        }
    }
}

/// Write `expenses` as CSV rows, preceded by a header row.
pub fn write_expenses_csv<W: Write>(expenses: &[Expense], writer: W) -> Result<(), Error> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(HEADER).map_err(export_error)?;

    for expense in expenses {
        let created_at = expense.created_at.format(&Rfc3339).map_err(export_error)?;

        writer
            .write_record([
                expense.id.to_string(),
                expense.date.to_string(),
                expense.amount.to_string(),
                expense
                    .category_name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_owned()),
                expense.is_fixed.to_string(),
                expense.notes.clone().unwrap_or_default(),
                created_at,
            ])
            .map_err(export_error)?;
    }

    writer.flush().map_err(export_error)?;

    Ok(())
}

fn export_error(error: impl ToString) -> Error {
    Error::ExportError(error.to_string())
}

/// A route handler that writes all expenses to the export file and sends it
/// as a CSV download.
///
/// The response body is the CSV produced by this request, never a re-read of
/// the export file.
pub async fn export_expenses_endpoint(
    State(state): State<ExportState>,
) -> Result<Response, Error> {
    let contents = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let expenses = get_all_expenses(&connection)?;
        let mut contents = Vec::new();
        write_expenses_csv(&expenses, &mut contents)?;
        std::fs::write(&state.export_path, &contents).map_err(export_error)?;

        tracing::info!(
            "Exported {} expenses to {}",
            expenses.len(),
            state.export_path.display()
        );

        contents
    };

    Ok((
        [
            (CONTENT_TYPE, "text/csv".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        contents,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{body::to_bytes, extract::State};
    use time::macros::date;

    use crate::{
        NewExpense, create_expense,
        expense::get_all_expenses,
        test_utils::{assert_content_type, assert_status_ok, get_header, get_seeded_connection},
    };

    use super::{ExportState, export_expenses_endpoint, write_expenses_csv};

    #[test]
    fn empty_export_has_only_header() {
        let mut buffer = Vec::new();

        write_expenses_csv(&[], &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "ID,Date,Amount,Category,Is Fixed,Notes,Created At\n"
        );
    }

    #[test]
    fn writes_one_row_per_expense() {
        let connection = get_seeded_connection();
        create_expense(
            NewExpense::new(date!(2025 - 03 - 01), 25_000.5, 1)
                .fixed(true)
                .notes("March, rent"),
            &connection,
        )
        .unwrap();
        create_expense(NewExpense::new(date!(2025 - 03 - 04), 42.0, 12), &connection).unwrap();
        connection
            .execute("DELETE FROM category WHERE id = 12", ())
            .unwrap();
        let expenses = get_all_expenses(&connection).unwrap();
        let mut buffer = Vec::new();

        write_expenses_csv(&expenses, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(
            lines[1].starts_with("1,2025-03-01,25000.5,Rent,true,\"March, rent\","),
            "got {}",
            lines[1]
        );
        assert!(
            lines[2].starts_with("2,2025-03-04,42,Unknown,false,,"),
            "got {}",
            lines[2]
        );
    }

    #[tokio::test]
    async fn endpoint_writes_file_and_sends_attachment() {
        let connection = get_seeded_connection();
        create_expense(NewExpense::new(date!(2025 - 03 - 04), 42.0, 4), &connection).unwrap();
        let export_path = std::env::temp_dir().join(format!(
            "fintrack_export_test_{}.csv",
            std::process::id()
        ));
        let state = ExportState {
            db_connection: Arc::new(Mutex::new(connection)),
            export_path: export_path.clone(),
        };

        let response = export_expenses_endpoint(State(state)).await.unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/csv");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"finance_export.csv\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let on_disk = std::fs::read(&export_path).unwrap();
        assert_eq!(body.as_ref(), on_disk.as_slice());
        assert!(String::from_utf8(on_disk).unwrap().contains(",Groceries,"));

        std::fs::remove_file(export_path).unwrap();
    }

    #[tokio::test]
    async fn concurrent_exports_send_complete_files() {
        let connection = get_seeded_connection();
        for day in 1..=28 {
            create_expense(
                NewExpense::new(date!(2025 - 02 - 01).replace_day(day).unwrap(), 10.0, 4)
                    .notes("Weekly shop"),
                &connection,
            )
            .unwrap();
        }
        let mut expected = Vec::new();
        write_expenses_csv(&get_all_expenses(&connection).unwrap(), &mut expected).unwrap();
        let export_path = std::env::temp_dir().join(format!(
            "fintrack_concurrent_export_test_{}.csv",
            std::process::id()
        ));
        let state = ExportState {
            db_connection: Arc::new(Mutex::new(connection)),
            export_path: export_path.clone(),
        };

        let exports: Vec<_> = (0..4)
            .map(|_| tokio::spawn(export_expenses_endpoint(State(state.clone()))))
            .collect();

        for export in exports {
            let response = export.await.unwrap().unwrap();
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(body.as_ref(), expected.as_slice());
        }

        std::fs::remove_file(export_path).unwrap();
    }
}
