//! Media document repository implementation.
//!
//! Every operation is a round-trip to PostgreSQL; nothing is cached, so
//! `get`/`list` always reflect the latest committed state at call time.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

use medialink_core::{
    DocumentRepository, Error, MediaDocument, MediaType, NewDocument, Removal, Result,
    UpdateDocumentRequest,
};

/// PostgreSQL implementation of [`DocumentRepository`].
pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row(row: &PgRow) -> Result<MediaDocument> {
    let raw_type: String = row.get("media_type");
    let media_type =
        MediaType::from_str(&raw_type).map_err(|_| Error::InvalidMediaType(raw_type))?;

    Ok(MediaDocument {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        media_url: row.get("media_url"),
        media_type,
        qr_url: row.get("qr_url"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn insert(&self, doc: NewDocument) -> Result<MediaDocument> {
        let id = Uuid::new_v4();

        let row = sqlx::query(
            "INSERT INTO media_documents (id, title, description, media_url, media_type)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, title, description, media_url, media_type, qr_url, created_at",
        )
        .bind(id)
        .bind(&doc.title)
        .bind(&doc.description)
        .bind(&doc.media_url)
        .bind(doc.media_type.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        map_row(&row)
    }

    async fn attach_code(&self, id: Uuid, code_locator: &str) -> Result<()> {
        let result = sqlx::query("UPDATE media_documents SET qr_url = $2 WHERE id = $1")
            .bind(id)
            .bind(code_locator)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::DocumentNotFound(id));
        }
        Ok(())
    }

    async fn update(&self, req: UpdateDocumentRequest) -> Result<MediaDocument> {
        let mut assignments = Vec::new();
        let mut param_idx = 1;
        if req.title.is_some() {
            assignments.push(format!("title = ${param_idx}"));
            param_idx += 1;
        }
        if req.description.is_some() {
            assignments.push(format!("description = ${param_idx}"));
            param_idx += 1;
        }

        // Nothing to change: report the current record.
        if assignments.is_empty() {
            return self.get(req.id).await;
        }

        let sql = format!(
            "UPDATE media_documents SET {} WHERE id = ${param_idx}
             RETURNING id, title, description, media_url, media_type, qr_url, created_at",
            assignments.join(", ")
        );

        let mut query = sqlx::query(&sql);
        if let Some(title) = &req.title {
            query = query.bind(title);
        }
        if let Some(description) = &req.description {
            query = query.bind(description);
        }
        query = query.bind(req.id);

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::DocumentNotFound(req.id))?;

        map_row(&row)
    }

    async fn get(&self, id: Uuid) -> Result<MediaDocument> {
        let row = sqlx::query(
            "SELECT id, title, description, media_url, media_type, qr_url, created_at
             FROM media_documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::DocumentNotFound(id))?;

        map_row(&row)
    }

    async fn list(&self) -> Result<Vec<MediaDocument>> {
        let rows = sqlx::query(
            "SELECT id, title, description, media_url, media_type, qr_url, created_at
             FROM media_documents
             ORDER BY created_at DESC, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(map_row).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<Removal> {
        let result = sqlx::query("DELETE FROM media_documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            Ok(Removal::Missing)
        } else {
            Ok(Removal::Removed)
        }
    }
}
