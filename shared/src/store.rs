use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::SdkError,
    operation::{delete_item::DeleteItemError, get_item::GetItemError, put_item::PutItemError},
    types::AttributeValue,
    Client as DynamoClient,
};
use std::collections::HashMap;
use thiserror::Error;

/// Partition key attribute of the users table.
pub const USER_ID_KEY: &str = "user_id";

/// A record in DynamoDB's attribute representation.
pub type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("PutItem failed: {0}")]
    Put(#[from] SdkError<PutItemError>),
    #[error("GetItem failed: {0}")]
    Get(#[from] SdkError<GetItemError>),
    #[error("DeleteItem failed: {0}")]
    Delete(#[from] SdkError<DeleteItemError>),
}

// Kept as close as possible to the DynamoDB client calls the handlers make,
// so tests can swap in an in-memory table.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn put_item(&self, table_name: &str, item: Item) -> Result<(), StoreError>;

    /// Returns `None` when no item exists under `key`.
    async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Item>, StoreError>;

    async fn delete_item(&self, table_name: &str, key: Item) -> Result<(), StoreError>;
}

#[async_trait]
impl ItemStore for DynamoClient {
    async fn put_item(&self, table_name: &str, item: Item) -> Result<(), StoreError> {
        self.put_item()
            .table_name(table_name)
            .set_item(Some(item))
            .send()
            .await?;
        Ok(())
    }

    async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Item>, StoreError> {
        let result = self
            .get_item()
            .table_name(table_name)
            .set_key(Some(key))
            .send()
            .await?;
        Ok(result.item.filter(|item| !item.is_empty()))
    }

    async fn delete_item(&self, table_name: &str, key: Item) -> Result<(), StoreError> {
        self.delete_item()
            .table_name(table_name)
            .set_key(Some(key))
            .send()
            .await?;
        Ok(())
    }
}

/// Primary key for the user with the given id.
pub fn user_key(user_id: &str) -> Item {
    HashMap::from([(
        USER_ID_KEY.to_string(),
        AttributeValue::S(user_id.to_string()),
    )])
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory table that counts every call it receives.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        items: Mutex<HashMap<String, Item>>,
        calls: AtomicUsize,
        offline: bool,
    }

    impl MemoryStore {
        /// A store whose every call fails like an unreachable backend.
        pub(crate) fn offline() -> Self {
            Self {
                offline: true,
                ..Default::default()
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn insert_raw(&self, item: Item) {
            let id = id_of(&item);
            self.items.lock().unwrap().insert(id, item);
        }

        pub(crate) fn len(&self) -> usize {
            self.items.lock().unwrap().len()
        }
    }

    fn id_of(item: &Item) -> String {
        item.get(USER_ID_KEY)
            .and_then(|v| v.as_s().ok())
            .cloned()
            .unwrap_or_default()
    }

    #[async_trait]
    impl ItemStore for MemoryStore {
        async fn put_item(&self, _table_name: &str, item: Item) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(StoreError::Put(SdkError::construction_failure("store offline")));
            }
            self.insert_raw(item);
            Ok(())
        }

        async fn get_item(&self, _table_name: &str, key: Item) -> Result<Option<Item>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(StoreError::Get(SdkError::construction_failure("store offline")));
            }
            Ok(self.items.lock().unwrap().get(&id_of(&key)).cloned())
        }

        async fn delete_item(&self, _table_name: &str, key: Item) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(StoreError::Delete(SdkError::construction_failure("store offline")));
            }
            self.items.lock().unwrap().remove(&id_of(&key));
            Ok(())
        }
    }
}
