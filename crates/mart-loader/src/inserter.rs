//! Batch inserters — where loaded rows go.
//!
//! [`ClickHouseInserter`] writes over the ClickHouse HTTP interface. Tests
//! provide their own [`BatchInserter`] so the loader can run without a server.

use clickhouse::{insert::Insert, Client};
use mart_core::config::ClickHouseSettings;
use serde::Serialize;

use crate::error::LoadError;
use crate::rows::TableBatch;

/// Destination for table batches.
#[allow(async_fn_in_trait)]
pub trait BatchInserter {
    /// Check the destination is reachable before anything is loaded.
    async fn ping(&self) -> Result<(), LoadError>;

    /// Insert every row of `batch` into its table in one call.
    async fn insert(&self, batch: &TableBatch) -> Result<(), LoadError>;
}

/// ClickHouse client held for one loader run.
pub struct ClickHouseInserter {
    client: Client,
    url: String,
}

impl ClickHouseInserter {
    pub fn new(settings: &ClickHouseSettings) -> Self {
        let url = settings.url();
        let mut client = Client::default()
            .with_url(&url)
            .with_database(&settings.database)
            .with_user(&settings.user);

        if !settings.password.is_empty() {
            client = client.with_password(&settings.password);
        }

        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn insert_rows<T>(&self, table: &str, rows: &[T]) -> Result<(), clickhouse::error::Error>
    where
        T: clickhouse::Row + Serialize + Send + Sync + 'static,
        for<'a> T: clickhouse::Row<Value<'a> = T>,
    {
        let mut insert: Insert<T> = self.client.insert(table).await?;

        for row in rows {
            insert.write(row).await?;
        }

        insert.end().await?;
        Ok(())
    }
}

impl BatchInserter for ClickHouseInserter {
    async fn ping(&self) -> Result<(), LoadError> {
        self.client
            .query("SELECT 1")
            .execute()
            .await
            .map_err(|e| LoadError::Connection {
                url: self.url.clone(),
                source: Box::new(e),
            })
    }

    async fn insert(&self, batch: &TableBatch) -> Result<(), LoadError> {
        let table = batch.table().name();
        let result = match batch {
            TableBatch::Users(rows) => self.insert_rows(table, rows).await,
            TableBatch::Courses(rows) => self.insert_rows(table, rows).await,
            TableBatch::Times(rows) => self.insert_rows(table, rows).await,
            TableBatch::Facts(rows) => self.insert_rows(table, rows).await,
        };
        result.map_err(|e| LoadError::Insert {
            table: table.to_string(),
            source: Box::new(e),
        })
    }
}
