use crate::entities::TaxRate;
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Data access for sales tax rates
#[async_trait]
pub trait TaxRateStore: Send + Sync {
    /// All rates with active = true, in stable store order
    async fn get_all_active(&self) -> Result<Vec<TaxRate>>;

    /// Active rate for a country + postal code, if any
    async fn get_by_location(&self, country: &str, postal_code: &str) -> Result<Option<TaxRate>>;

    /// Insert a rate; returns false if the id already exists
    async fn create(&self, rate: TaxRate) -> Result<bool>;

    /// Mark a rate inactive
    async fn archive(&self, id: &str) -> Result<()>;
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS tax_rates (
            id TEXT PRIMARY KEY NOT NULL,
            country TEXT NOT NULL,
            state TEXT,
            postal_code TEXT NOT NULL,
            rate REAL NOT NULL,
            active INTEGER NOT NULL DEFAULT 1,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tax_rates_location ON tax_rates(country, postal_code)",
        [],
    )?;

    Ok(())
}

const SELECT_COLUMNS: &str = "SELECT id, country, state, postal_code, rate, active FROM tax_rates";

fn row_to_tax_rate(row: &Row<'_>) -> rusqlite::Result<TaxRate> {
    Ok(TaxRate {
        id: row.get(0)?,
        country: row.get(1)?,
        state: row.get(2)?,
        postal_code: row.get(3)?,
        rate: row.get(4)?,
        active: row.get(5)?,
    })
}

// ============================================================================
// SYNCHRONOUS QUERIES
// ============================================================================

pub fn get_all_active_tax_rates(conn: &Connection) -> Result<Vec<TaxRate>> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE active = 1 ORDER BY country, state, postal_code, id",
        SELECT_COLUMNS
    ))?;

    let rates = stmt
        .query_map([], row_to_tax_rate)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rates)
}

pub fn get_tax_rate_by_location(
    conn: &Connection,
    country: &str,
    postal_code: &str,
) -> Result<Option<TaxRate>> {
    let rate = conn
        .query_row(
            &format!(
                "{} WHERE active = 1 AND country = ?1 AND postal_code = ?2 ORDER BY id LIMIT 1",
                SELECT_COLUMNS
            ),
            params![country.trim().to_uppercase(), postal_code.trim()],
            row_to_tax_rate,
        )
        .optional()?;

    Ok(rate)
}

pub fn insert_tax_rate(conn: &Connection, rate: &TaxRate) -> Result<bool> {
    rate.validate()?;

    let changed = conn.execute(
        "INSERT OR IGNORE INTO tax_rates (id, country, state, postal_code, rate, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            rate.id,
            rate.country,
            rate.state,
            rate.postal_code,
            rate.rate,
            rate.active
        ],
    )?;

    Ok(changed > 0)
}

/// Insert a batch of rates; returns (inserted, duplicates)
pub fn insert_tax_rates(conn: &mut Connection, rates: &[TaxRate]) -> Result<(usize, usize)> {
    let tx = conn.transaction()?;
    let mut inserted = 0;
    let mut duplicates = 0;

    for rate in rates {
        if insert_tax_rate(&tx, rate)? {
            inserted += 1;
        } else {
            duplicates += 1;
        }
    }

    tx.commit()?;
    Ok((inserted, duplicates))
}

pub fn archive_tax_rate(conn: &Connection, id: &str) -> Result<()> {
    let changed = conn.execute("UPDATE tax_rates SET active = 0 WHERE id = ?1", params![id])?;

    if changed == 0 {
        return Err(CatalogError::NotFound(format!("tax rate {}", id)));
    }

    Ok(())
}

pub fn count_tax_rates(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM tax_rates", [], |row| row.get(0))?;

    Ok(count)
}

// ============================================================================
// CSV IMPORT
// ============================================================================

/// Load tax rates from an operator CSV file.
/// Columns: id,country,state,postal_code,rate (id may be empty).
pub fn load_csv(csv_path: &Path) -> Result<Vec<TaxRate>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)?;

    let mut rates = Vec::new();

    for result in rdr.deserialize() {
        let mut rate: TaxRate = result?;
        rate.ensure_id();
        rate.normalize();
        rate.validate()?;
        rates.push(rate);
    }

    Ok(rates)
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// SQLite-backed store. Queries run on tokio's blocking pool.
#[derive(Clone)]
pub struct SqliteTaxRateStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTaxRateStore {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteTaxRateStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| CatalogError::StoreUnavailable("connection lock poisoned".to_string()))?;
            op(&mut guard)
        })
        .await
        .map_err(|e| CatalogError::StoreUnavailable(format!("store task failed: {}", e)))?
    }

    /// Batch import used by the operator CLI
    pub async fn import(&self, rates: Vec<TaxRate>) -> Result<(usize, usize)> {
        self.with_conn(move |conn| insert_tax_rates(conn, &rates)).await
    }

    pub async fn count(&self) -> Result<i64> {
        self.with_conn(|conn| count_tax_rates(conn)).await
    }
}

#[async_trait]
impl TaxRateStore for SqliteTaxRateStore {
    async fn get_all_active(&self) -> Result<Vec<TaxRate>> {
        self.with_conn(|conn| get_all_active_tax_rates(conn)).await
    }

    async fn get_by_location(&self, country: &str, postal_code: &str) -> Result<Option<TaxRate>> {
        let country = country.to_string();
        let postal_code = postal_code.to_string();
        self.with_conn(move |conn| get_tax_rate_by_location(conn, &country, &postal_code))
            .await
    }

    async fn create(&self, mut rate: TaxRate) -> Result<bool> {
        rate.ensure_id();
        rate.normalize();
        self.with_conn(move |conn| insert_tax_rate(conn, &rate)).await
    }

    async fn archive(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.with_conn(move |conn| archive_tax_rate(conn, &id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_rates() -> Vec<TaxRate> {
        vec![
            TaxRate::new("txr_ny", "US", Some("NY"), "10001", 8.875),
            TaxRate::new("txr_ca", "US", Some("CA"), "90210", 9.5),
            TaxRate::new("txr_de", "DE", None, "10115", 19.0),
        ]
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let (inserted1, dup1) = insert_tax_rates(&mut conn, &sample_rates()).unwrap();
        let (inserted2, dup2) = insert_tax_rates(&mut conn, &sample_rates()).unwrap();

        assert_eq!((inserted1, dup1), (3, 0));
        assert_eq!((inserted2, dup2), (0, 3));
        assert_eq!(count_tax_rates(&conn).unwrap(), 3);
    }

    #[test]
    fn test_active_rates_in_store_order() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        insert_tax_rates(&mut conn, &sample_rates()).unwrap();

        let ids: Vec<String> = get_all_active_tax_rates(&conn)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();

        assert_eq!(ids, vec!["txr_de", "txr_ca", "txr_ny"]);
    }

    #[test]
    fn test_archive_hides_rate() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        insert_tax_rates(&mut conn, &sample_rates()).unwrap();

        archive_tax_rate(&conn, "txr_ca").unwrap();

        let active = get_all_active_tax_rates(&conn).unwrap();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|r| r.id != "txr_ca"));
        assert!(get_tax_rate_by_location(&conn, "US", "90210").unwrap().is_none());

        // Archived rows are kept
        assert_eq!(count_tax_rates(&conn).unwrap(), 3);

        assert!(matches!(
            archive_tax_rate(&conn, "missing"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_lookup_by_location_normalizes_input() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        insert_tax_rates(&mut conn, &sample_rates()).unwrap();

        let rate = get_tax_rate_by_location(&conn, " us", "10001 ").unwrap().unwrap();
        assert_eq!(rate.id, "txr_ny");
        assert_eq!(rate.state.as_deref(), Some("NY"));
    }

    #[test]
    fn test_invalid_rate_rejected_on_insert() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let bad = TaxRate::new("txr_bad", "US", None, "10001", 150.0);
        assert!(matches!(
            insert_tax_rate(&conn, &bad),
            Err(CatalogError::InvalidTaxRate(_))
        ));
        assert_eq!(count_tax_rates(&conn).unwrap(), 0);
    }

    #[test]
    fn test_load_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,country,state,postal_code,rate").unwrap();
        writeln!(file, "txr_1,us,ny,10001,8.875").unwrap();
        writeln!(file, ",DE,,10115,19").unwrap();
        file.flush().unwrap();

        let rates = load_csv(file.path()).unwrap();

        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].id, "txr_1");
        assert_eq!(rates[0].country, "US");
        assert_eq!(rates[0].state.as_deref(), Some("NY"));
        assert!(rates[0].active);
        assert!(!rates[1].id.is_empty());
        assert_eq!(rates[1].state, None);
    }

    #[test]
    fn test_load_csv_rejects_bad_rate() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,country,state,postal_code,rate").unwrap();
        writeln!(file, "txr_1,US,NY,10001,-3").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            load_csv(file.path()),
            Err(CatalogError::InvalidTaxRate(_))
        ));
    }

    #[tokio::test]
    async fn test_sqlite_store_roundtrip() {
        let store = SqliteTaxRateStore::open_in_memory().unwrap();

        let (inserted, _) = store.import(sample_rates()).await.unwrap();
        assert_eq!(inserted, 3);

        let created = store
            .create(TaxRate::new("", "gb", None, "SW1A 1AA", 20.0))
            .await
            .unwrap();
        assert!(created);
        assert_eq!(store.count().await.unwrap(), 4);

        store.archive("txr_ny").await.unwrap();
        let active = store.get_all_active().await.unwrap();
        assert_eq!(active.len(), 3);

        let gb = store.get_by_location("GB", "SW1A 1AA").await.unwrap().unwrap();
        assert_eq!(gb.rate, 20.0);

        assert!(store.archive("missing").await.is_err());
    }
}
