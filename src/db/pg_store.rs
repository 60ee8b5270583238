// src/db/pg_store.rs

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};

use super::document_store::{generate_id, Document, DocumentStore, Filter, StoredDocument};
use crate::common::error::AppError;

// Linha da tabela `documents`
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Document>,
}

impl From<DocumentRow> for StoredDocument {
    fn from(row: DocumentRow) -> Self {
        StoredDocument { id: row.id, data: row.data.0 }
    }
}

/// Store de documentos sobre Postgres: uma tabela JSONB, filtros por contenção (`@>`).
///
/// Para valores escalares (strings, números, booleanos) contenção equivale a
/// igualdade, que é tudo o que os repositórios usam.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Conecta e roda as migrações embutidas.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        sqlx::migrate!().run(&pool).await?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn add(&self, collection: &str, data: Document) -> Result<String, AppError> {
        let id = generate_id();
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(data))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Document, merge: bool) -> Result<(), AppError> {
        let sql = if merge {
            r#"
            INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET data = documents.data || EXCLUDED.data
            "#
        } else {
            r#"
            INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data
            "#
        };

        sqlx::query(sql)
            .bind(collection)
            .bind(id)
            .bind(Json(data))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(StoredDocument::from))
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(patch))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<StoredDocument>, AppError> {
        // Todos os filtros viram um único objeto: {"campo": valor, ...}
        let containment: Document = filters
            .iter()
            .map(|f| (f.field.clone(), f.value.clone()))
            .collect();

        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = $1 AND data @> $2 ORDER BY id",
        )
        .bind(collection)
        .bind(Json(Value::Object(containment)))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredDocument::from).collect())
    }
}
