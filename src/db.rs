//! SQLite persistence. One `provisions` table with a category column,
//! upserted by natural key so re-ingesting a document is idempotent.

use std::path::Path;

use rusqlite::Connection;

use crate::pipeline::PipelineError;
use crate::provision::{Jurisdiction, Provision};

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Store { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, PipelineError> {
        let store = Store {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), PipelineError> {
        // The natural key tolerates a missing secondary number: IFNULL
        // folds NULL to 0 so re-ingested rows still collide and replace.
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS provisions (
                id            INTEGER PRIMARY KEY,
                jurisdiction  TEXT NOT NULL,
                identifier    TEXT NOT NULL,
                number        INTEGER NOT NULL,
                superseded    INTEGER,
                category      TEXT NOT NULL,
                title         TEXT NOT NULL,
                body          TEXT NOT NULL,
                repealed      BOOLEAN NOT NULL DEFAULT 0,
                source_file   TEXT NOT NULL,
                extracted_at  TEXT NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_provisions_key
                ON provisions(jurisdiction, identifier, IFNULL(superseded, 0));
            CREATE INDEX IF NOT EXISTS idx_provisions_category ON provisions(category);
            CREATE INDEX IF NOT EXISTS idx_provisions_number ON provisions(number);
            ",
        )?;
        Ok(())
    }

    // ── Persistence ──

    /// Upsert provisions one statement at a time under autocommit. On
    /// failure the rows already written stay written; the caller gets the
    /// underlying statement error.
    pub fn save(&self, provisions: &[Provision]) -> Result<usize, PipelineError> {
        let mut stmt = self.conn.prepare(
            "INSERT OR REPLACE INTO provisions
             (jurisdiction, identifier, number, superseded, category, title, body,
              repealed, source_file, extracted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        let mut count = 0;
        for p in provisions {
            count += stmt.execute(rusqlite::params![
                p.jurisdiction.code(),
                p.identifier,
                p.number,
                p.superseded,
                p.category,
                p.title,
                p.body,
                p.repealed,
                p.source_file,
                p.extracted_at.to_rfc3339(),
            ])?;
        }
        Ok(count)
    }

    // ── Queries ──

    pub fn list(&self, filter: &ListFilter) -> Result<Vec<ProvisionRow>, PipelineError> {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(category) = filter.category {
            conditions.push(format!("category = ?{}", params.len() + 1));
            params.push(Box::new(category.to_string()));
        }
        if let Some(jurisdiction) = filter.jurisdiction {
            conditions.push(format!("jurisdiction = ?{}", params.len() + 1));
            params.push(Box::new(jurisdiction.code().to_string()));
        }
        if let Some(repealed) = filter.repealed {
            conditions.push(format!("repealed = ?{}", params.len() + 1));
            params.push(Box::new(repealed));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT jurisdiction, identifier, number, superseded, category, title,
                    repealed, source_file
             FROM provisions{}
             ORDER BY jurisdiction, number, identifier
             LIMIT {}",
            where_clause, filter.limit
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                Ok(ProvisionRow {
                    jurisdiction: row.get(0)?,
                    identifier: row.get(1)?,
                    number: row.get(2)?,
                    superseded: row.get(3)?,
                    category: row.get(4)?,
                    title: row.get(5)?,
                    repealed: row.get(6)?,
                    source_file: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Stats ──

    pub fn total(&self) -> Result<usize, PipelineError> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM provisions", [], |r| r.get(0))?;
        Ok(n)
    }

    pub fn category_counts(&self) -> Result<Vec<CategoryCount>, PipelineError> {
        let mut stmt = self.conn.prepare(
            "SELECT jurisdiction, category, COUNT(*), SUM(repealed)
             FROM provisions
             GROUP BY jurisdiction, category
             ORDER BY jurisdiction, category",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CategoryCount {
                    jurisdiction: row.get(0)?,
                    category: row.get(1)?,
                    total: row.get(2)?,
                    repealed: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[derive(Debug)]
pub struct ListFilter<'a> {
    pub category: Option<&'a str>,
    pub jurisdiction: Option<Jurisdiction>,
    pub repealed: Option<bool>,
    pub limit: usize,
}

#[derive(Debug)]
pub struct ProvisionRow {
    pub jurisdiction: String,
    pub identifier: String,
    pub number: i64,
    pub superseded: Option<i64>,
    pub category: String,
    pub title: String,
    pub repealed: bool,
    pub source_file: String,
}

#[derive(Debug)]
pub struct CategoryCount {
    pub jurisdiction: String,
    pub category: String,
    pub total: usize,
    pub repealed: usize,
}

// ── Tests ──────────────────────────────────────────────────────────
