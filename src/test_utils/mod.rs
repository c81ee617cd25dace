#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;

use rusqlite::Connection;

use crate::db::{initialize, seed_database};

pub(crate) use html::{assert_valid_html, parse_html_document};
pub(crate) use http::{assert_content_type, assert_status_ok, get_header};

/// An in-memory database with every table created and the defaults seeded.
pub(crate) fn get_seeded_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory");
    initialize(&connection).expect("Could not initialize database");
    seed_database(&connection).expect("Could not seed database");
    connection
}
