//! Order store implementations.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use trading_core::error::StorageError;
use trading_core::traits::OrderStore;
use trading_core::types::Order;

/// Keeps the latest state of every saved order in memory.
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Mutex<HashMap<String, Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.orders.lock().get(order_id).cloned()
    }

    pub fn all(&self) -> Vec<Order> {
        self.orders.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.orders.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.lock().is_empty()
    }
}

impl OrderStore for MemoryOrderStore {
    fn save_order(&self, order: &Order) -> Result<(), StorageError> {
        self.orders.lock().insert(order.id.clone(), order.clone());
        Ok(())
    }
}

/// Append-only JSON lines order journal.
///
/// Each save appends the full order state as one line. Replaying the file
/// keeps the last line per order ID, so repeated saves of the same state are
/// harmless.
pub struct JsonlOrderStore {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlOrderStore {
    /// Open (or create) the journal at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replay a journal into the latest state per order ID.
    pub fn load(path: impl AsRef<Path>) -> Result<HashMap<String, Order>, StorageError> {
        let file = File::open(path)?;
        let mut orders = HashMap::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let order: Order = serde_json::from_str(&line)?;
            orders.insert(order.id.clone(), order);
        }
        Ok(orders)
    }
}

impl OrderStore for JsonlOrderStore {
    fn save_order(&self, order: &Order) -> Result<(), StorageError> {
        let line = serde_json::to_string(order)?;
        let mut file = self.file.lock();
        writeln!(file, "{}", line)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use trading_core::types::{OrderStatus, Side};

    fn journal_path() -> PathBuf {
        std::env::temp_dir()
            .join("trading-engine-tests")
            .join(format!("{}.jsonl", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_memory_store_is_idempotent() {
        let store = MemoryOrderStore::new();
        let order = Order::market("alice", "SOL", Side::Buy, dec!(1)).with_id("o1");

        store.save_order(&order).unwrap();
        store.save_order(&order).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("o1"), Some(order));
    }

    #[test]
    fn test_jsonl_replay_keeps_latest_state() {
        let path = journal_path();
        let store = JsonlOrderStore::open(&path).unwrap();

        let mut order = Order::market("alice", "SOL", Side::Buy, dec!(3)).with_id("o1");
        store.save_order(&order).unwrap();
        order.transition(OrderStatus::Canceled);
        store.save_order(&order).unwrap();
        store.save_order(&order).unwrap();

        let other = Order::market("bob", "WIF", Side::Sell, dec!(7)).with_id("o2");
        store.save_order(&other).unwrap();

        let replayed = JsonlOrderStore::load(store.path()).unwrap();
        assert_eq!(replayed.len(), 2);
        assert_eq!(replayed["o1"].status, OrderStatus::Canceled);
        assert_eq!(replayed["o2"].quantity, dec!(7));

        std::fs::remove_file(&path).ok();
    }
}
