use async_trait::async_trait;
use aws_sdk_dynamodb::{types::AttributeValue, Client as DynamoClient};
use serde_dynamo::aws_sdk_dynamodb_1::{from_items, to_item};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::types::User;

/// The remote users collection, reduced to the three calls the handlers make.
///
/// Implementations are shared between concurrent requests behind an `Arc`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Every record currently in the collection, in no particular order.
    async fn scan_all(&self) -> Result<Vec<User>, StoreError>;

    /// Insert or wholesale replace the record keyed by `user.id`.
    async fn put(&self, user: &User) -> Result<(), StoreError>;

    /// Remove the record keyed by `id`. A missing key is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// DynamoDB table with a single string partition key named `id`.
pub struct DynamoUserStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoUserStore {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl UserStore for DynamoUserStore {
    async fn scan_all(&self) -> Result<Vec<User>, StoreError> {
        let mut items: Vec<HashMap<String, AttributeValue>> = Vec::new();
        let mut start_key = None;

        // A single Scan page stops at 1 MB; keep going until the table is exhausted
        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(StoreError::request)?;

            items.extend(output.items.unwrap_or_default());

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!("Scanned {} items from {}", items.len(), self.table_name);
        let users: Vec<User> = from_items(items).map_err(StoreError::Unmarshal)?;
        Ok(users)
    }

    async fn put(&self, user: &User) -> Result<(), StoreError> {
        let item: HashMap<String, AttributeValue> = to_item(user).map_err(StoreError::Marshal)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(StoreError::request)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(StoreError::request)?;
        Ok(())
    }
}

/// Process-local collection with the same semantics as [`DynamoUserStore`].
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn scan_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn put(&self, user: &User) -> Result<(), StoreError> {
        self.users
            .write()
            .await
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.users.write().await.remove(id);
        Ok(())
    }
}
