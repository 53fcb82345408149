use converter_core::{Category, ConversionRecord, ConverterError, Result, Unit};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::{debug, info};

const CREATE_HISTORY_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS history (
        category TEXT,
        from_unit TEXT,
        to_unit TEXT,
        input_value REAL,
        result_value REAL
    )
";

/// Local mirror of accepted conversions. One connection is held for the
/// lifetime of the store and closed when it is dropped.
pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(store_error)?;
        let store = Self { conn };
        store.ensure_schema()?;
        info!("History store ready at {:?}", path);
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(store_error)?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Safe to call any number of times.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(CREATE_HISTORY_TABLE)
            .map_err(store_error)
    }

    /// Write one record in its own transaction. Any early return rolls the
    /// transaction back when it is dropped.
    pub fn insert(&mut self, record: &ConversionRecord) -> Result<()> {
        let tx = self.conn.transaction().map_err(store_error)?;
        tx.execute(
            "INSERT INTO history (category, from_unit, to_unit, input_value, result_value)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.category().name(),
                record.from().name(),
                record.to().name(),
                record.input(),
                record.result(),
            ],
        )
        .map_err(store_error)?;
        tx.commit().map_err(store_error)?;

        debug!("Stored conversion: {}", record.summary());
        Ok(())
    }

    /// Every stored row in insertion order.
    pub fn records(&self) -> Result<Vec<ConversionRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT category, from_unit, to_unit, input_value, result_value
                 FROM history ORDER BY rowid",
            )
            .map_err(store_error)?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                ))
            })
            .map_err(store_error)?;

        let mut records = Vec::new();
        for row in rows {
            let (category, from, to, input, result) = row.map_err(store_error)?;
            let category: Category = category.parse()?;
            let from: Unit = from.parse()?;
            let to: Unit = to.parse()?;
            records.push(ConversionRecord::from_parts(category, from, to, input, result)?);
        }
        Ok(records)
    }

    pub fn count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM history", [], |row| row.get::<_, i64>(0))
            .map(|n| n as u64)
            .map_err(store_error)
    }
}

fn store_error(err: rusqlite::Error) -> ConverterError {
    ConverterError::StoreError(err.to_string())
}
