//! Record store helpers
//!
//! Every store is a private in-memory SQLite database, so tests never share
//! state.

use std::sync::Arc;

use core_kernel::{Table, TableName, TableStore};
use infra_db::SqliteTableStore;

/// Creates an empty in-memory store
pub async fn in_memory_store() -> Arc<SqliteTableStore> {
    Arc::new(
        SqliteTableStore::in_memory()
            .await
            .expect("in-memory store"),
    )
}

/// Creates an in-memory store holding `tables`
pub async fn seeded_store(tables: &[(TableName, &Table)]) -> Arc<SqliteTableStore> {
    let store = in_memory_store().await;
    for (name, table) in tables {
        store
            .replace_table(*name, table)
            .await
            .expect("table stored");
    }
    store
}
