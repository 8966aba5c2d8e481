use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KeyValueStore;

#[derive(Default)]
pub struct InMemoryKeyValueStore {
    store: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Default::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let store = self.store.read().await;
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        let mut store = self.store.write().await;
        log::debug!("Writing {} bytes under key {}", value.len(), key);
        store.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_is_absent() {
        let store = InMemoryKeyValueStore::new();

        assert_eq!(store.get("records").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let store = InMemoryKeyValueStore::new();

        store.set("records", "[]".to_string()).await.unwrap();
        store.set("records", "[1]".to_string()).await.unwrap();

        assert_eq!(store.get("records").await.unwrap().as_deref(), Some("[1]"));
    }
}
