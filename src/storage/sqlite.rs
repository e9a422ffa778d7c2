use crate::model::{BookingRecord, StorageError};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, Row, params};

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the booking ledger, creating the schema on first use.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS bookings (
                reference TEXT PRIMARY KEY,
                hotel_id INTEGER NOT NULL,
                hotel_name TEXT NOT NULL,
                city TEXT NOT NULL DEFAULT '',
                guest_name TEXT NOT NULL,
                guest_email TEXT NOT NULL,
                check_in TEXT,
                check_out TEXT,
                rooms_summary TEXT NOT NULL DEFAULT '',
                nights INTEGER NOT NULL,
                total_amount REAL NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL
            );
            ",
        )?;

        // Additive migrations for ledgers created by older builds.
        Self::migrate_add_column_if_missing(&conn, "bookings", "city", "TEXT NOT NULL DEFAULT ''")?;
        Self::migrate_add_column_if_missing(
            &conn,
            "bookings",
            "rooms_summary",
            "TEXT NOT NULL DEFAULT ''",
        )?;

        Ok(Self { conn })
    }

    /// Adds the column when it is absent; existing rows keep the default.
    fn migrate_add_column_if_missing(
        conn: &Connection,
        table: &str,
        column: &str,
        column_def: &str,
    ) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let existing_columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        if !existing_columns.iter().any(|c| c == column) {
            let alter_sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def);
            conn.execute(&alter_sql, [])?;
        }

        Ok(())
    }

    /// Inserts or refreshes a booking under its reference.
    pub fn save_booking(&self, record: &BookingRecord) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO bookings (
                reference, hotel_id, hotel_name, city,
                guest_name, guest_email, check_in, check_out,
                rooms_summary, nights, total_amount, status, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                &record.reference,
                &record.hotel_id,
                &record.hotel_name,
                &record.city,
                &record.guest_name,
                &record.guest_email,
                &record.check_in.map(|d| d.format("%Y-%m-%d").to_string()),
                &record.check_out.map(|d| d.format("%Y-%m-%d").to_string()),
                &record.rooms_summary,
                &record.nights,
                &record.total_amount,
                &record.status,
                &record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_booking(&self, reference: &str) -> Result<Option<BookingRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT reference, hotel_id, hotel_name, city, guest_name, guest_email,
                    check_in, check_out, rooms_summary, nights, total_amount, status, created_at
             FROM bookings WHERE reference = ?1",
        )?;

        let mut rows = stmt.query(params![reference])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::map_booking(row)?))
        } else {
            Ok(None)
        }
    }

    /// Admin listing, most recent first.
    pub fn list_bookings(&self) -> Result<Vec<BookingRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT reference, hotel_id, hotel_name, city, guest_name, guest_email,
                    check_in, check_out, rooms_summary, nights, total_amount, status, created_at
             FROM bookings ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map([], |row| Self::map_booking(row))?;
        let mut bookings = Vec::new();
        for booking in rows {
            bookings.push(booking?);
        }

        Ok(bookings)
    }

    /// Flips a booking's status; `NotFound` when the reference is unknown.
    pub fn set_status(&self, reference: &str, status: &str) -> Result<(), StorageError> {
        let updated = self.conn.execute(
            "UPDATE bookings SET status = ?2 WHERE reference = ?1",
            params![reference, status],
        )?;
        if updated == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    fn map_booking(row: &Row) -> Result<BookingRecord, rusqlite::Error> {
        let check_in: Option<String> = row.get(6)?;
        let check_out: Option<String> = row.get(7)?;
        let created_at_str: String = row.get(12)?;
        let created_at: DateTime<Utc> = created_at_str.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(12, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(BookingRecord {
            reference: row.get(0)?,
            hotel_id: row.get(1)?,
            hotel_name: row.get(2)?,
            city: row.get(3)?,
            guest_name: row.get(4)?,
            guest_email: row.get(5)?,
            check_in: check_in.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
            check_out: check_out.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
            rooms_summary: row.get(8)?,
            nights: row.get(9)?,
            total_amount: row.get(10)?,
            status: row.get(11)?,
            created_at,
        })
    }
}
