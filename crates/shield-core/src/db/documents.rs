//! Collection-scoped JSON documents

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};

/// Most collections reported by [`Database::list_collections`]
const MAX_LISTED_COLLECTIONS: usize = 10;

/// Kinds of stored documents, named after the record type they hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    FinancialProfile,
    Transaction,
    AnalysisResult,
    Alert,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinancialProfile => "financialprofile",
            Self::Transaction => "transaction",
            Self::AnalysisResult => "analysisresult",
            Self::Alert => "alert",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "financialprofile" => Ok(Self::FinancialProfile),
            "transaction" => Ok(Self::Transaction),
            "analysisresult" => Ok(Self::AnalysisResult),
            "alert" => Ok(Self::Alert),
            _ => Err(format!("Unknown collection: {}", s)),
        }
    }
}

/// A stored document with its storage metadata
#[derive(Debug, Clone, Serialize)]
pub struct StoredDocument {
    pub id: i64,
    pub collection: Collection,
    pub user_email: Option<String>,
    pub body: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Number of documents in one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionCount {
    pub name: String,
    pub count: i64,
}

impl Database {
    /// Store a document and return its id
    pub fn insert_document<T: Serialize + ?Sized>(
        &self,
        collection: Collection,
        user_email: &str,
        document: &T,
    ) -> Result<i64> {
        let body = serde_json::to_string(document)?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO documents (collection, user_email, body) VALUES (?, ?, ?)",
            params![collection.as_str(), user_email, body],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List documents in a collection in insertion order, optionally for one user
    pub fn list_documents(
        &self,
        collection: Collection,
        user_email: Option<&str>,
    ) -> Result<Vec<StoredDocument>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_email, body, created_at
            FROM documents
            WHERE collection = ?1 AND (?2 IS NULL OR user_email = ?2)
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map(params![collection.as_str(), user_email], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, user_email, body, created_at) = row?;
            documents.push(StoredDocument {
                id,
                collection,
                user_email,
                body: serde_json::from_str(&body)?,
                created_at: parse_datetime(&created_at),
            });
        }
        Ok(documents)
    }

    /// Collections that hold documents, with their sizes
    pub fn list_collections(&self) -> Result<Vec<CollectionCount>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT collection, COUNT(*)
            FROM documents
            GROUP BY collection
            ORDER BY collection
            LIMIT ?
            "#,
        )?;

        let counts = stmt
            .query_map(params![MAX_LISTED_COLLECTIONS as i64], |row| {
                Ok(CollectionCount {
                    name: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(counts)
    }

    /// Total number of stored documents
    pub fn count_documents(&self) -> Result<i64> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .map_err(Error::from)
    }
}
