use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::normalizer::extract::ProcessedProductContent;

pub const DB_PATH: &str = "data/products.sqlite";

pub fn connect(path: &str) -> Result<Connection> {
    if let Some(dir) = std::path::Path::new(path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS raw_products (
            id          INTEGER PRIMARY KEY,
            slug        TEXT UNIQUE NOT NULL,
            source      TEXT,
            raw         TEXT NOT NULL,
            imported_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS processed_products (
            raw_id        INTEGER PRIMARY KEY REFERENCES raw_products(id),
            slug          TEXT NOT NULL,
            content       TEXT NOT NULL,
            spec_count    INTEGER NOT NULL DEFAULT 0,
            feature_count INTEGER NOT NULL DEFAULT 0,
            review_count  INTEGER NOT NULL DEFAULT 0,
            synthetic     BOOLEAN NOT NULL DEFAULT 0,
            has_shipping  BOOLEAN NOT NULL DEFAULT 0,
            processed_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_processed_slug ON processed_products(slug);
        ",
    )?;
    Ok(())
}

// ── Import ──

pub struct RawRow {
    pub slug: String,
    pub source: Option<String>,
    pub raw: String,
}

pub fn insert_raw(conn: &Connection, rows: &[RawRow]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt =
            tx.prepare("INSERT OR IGNORE INTO raw_products (slug, source, raw) VALUES (?1, ?2, ?3)")?;
        for r in rows {
            count += stmt.execute(rusqlite::params![r.slug, r.source, r.raw])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

// ── Processing ──

pub struct RawProduct {
    pub id: i64,
    pub slug: String,
    pub raw: String,
}

pub fn fetch_unprocessed(conn: &Connection, limit: Option<usize>) -> Result<Vec<RawProduct>> {
    let sql = format!(
        "SELECT r.id, r.slug, r.raw
         FROM raw_products r
         LEFT JOIN processed_products p ON p.raw_id = r.id
         WHERE p.raw_id IS NULL
         ORDER BY r.id{}",
        match limit {
            Some(n) => format!(" LIMIT {}", n),
            None => String::new(),
        }
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RawProduct {
                id: row.get(0)?,
                slug: row.get(1)?,
                raw: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub struct ProcessedRow {
    pub raw_id: i64,
    pub slug: String,
    pub content: ProcessedProductContent,
}

pub fn save_processed(conn: &Connection, rows: &[ProcessedRow]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO processed_products
             (raw_id, slug, content, spec_count, feature_count, review_count, synthetic, has_shipping)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for r in rows {
            let c = &r.content;
            let reviews = c.extracted_reviews.as_deref().unwrap_or_default();
            stmt.execute(rusqlite::params![
                r.raw_id,
                r.slug,
                serde_json::to_string(c)?,
                c.specifications.len() as i64,
                c.features.len() as i64,
                reviews.len() as i64,
                reviews.iter().any(|x| x.synthetic),
                c.shipping_info.is_some(),
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub fn fetch_processed(conn: &Connection, slug: &str) -> Result<Option<ProcessedProductContent>> {
    let json: Option<String> = conn
        .query_row(
            "SELECT content FROM processed_products WHERE slug = ?1",
            [slug],
            |row| row.get(0),
        )
        .optional()?;
    match json {
        Some(j) => Ok(Some(serde_json::from_str(&j)?)),
        None => Ok(None),
    }
}

// ── Stats ──

pub struct Stats {
    pub imported: i64,
    pub processed: i64,
    pub pending: i64,
    pub with_reviews: i64,
    pub synthetic: i64,
    pub with_shipping: i64,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let imported: i64 = conn.query_row("SELECT COUNT(*) FROM raw_products", [], |r| r.get(0))?;
    let (processed, with_reviews, synthetic, with_shipping): (i64, i64, i64, i64) = conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(review_count > 0), 0),
                COALESCE(SUM(synthetic), 0),
                COALESCE(SUM(has_shipping), 0)
         FROM processed_products",
        [],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
    )?;
    Ok(Stats {
        imported,
        processed,
        pending: imported - processed,
        with_reviews,
        synthetic,
        with_shipping,
    })
}
