//! Table context
//!
//! The hosting app keeps the scanned table in session storage under
//! `tableId`, `tableName` and `franchiseId`. Values are opaque: only
//! presence is checked, blank strings count as absent.

use std::collections::HashMap;

/// Which table (and franchise) this session is seated at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableContext {
    pub table_id: Option<String>,
    pub table_name: Option<String>,
    pub franchise_id: Option<String>,
}

impl TableContext {
    pub fn new(table_id: impl Into<String>) -> Self {
        Self {
            table_id: non_blank(Some(table_id.into())),
            ..Self::default()
        }
    }

    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = non_blank(Some(name.into()));
        self
    }

    pub fn with_franchise_id(mut self, id: impl Into<String>) -> Self {
        self.franchise_id = non_blank(Some(id.into()));
        self
    }

    /// Read the session-storage keys from a key/value snapshot
    pub fn from_storage(storage: &HashMap<String, String>) -> Self {
        let get = |key: &str| non_blank(storage.get(key).cloned());
        Self {
            table_id: get("tableId"),
            table_name: get("tableName"),
            franchise_id: get("franchiseId"),
        }
    }

    /// Read `STOREFRONT_TABLE_ID`, `STOREFRONT_TABLE_NAME`, `STOREFRONT_FRANCHISE_ID`
    pub fn from_env() -> Self {
        let get = |key: &str| non_blank(std::env::var(key).ok());
        Self {
            table_id: get("STOREFRONT_TABLE_ID"),
            table_name: get("STOREFRONT_TABLE_NAME"),
            franchise_id: get("STOREFRONT_FRANCHISE_ID"),
        }
    }

    /// Seated at a table, i.e. in-dining ordering is available
    pub fn is_seated(&self) -> bool {
        self.table_id.is_some()
    }

    pub fn table_id(&self) -> Option<&str> {
        self.table_id.as_deref()
    }

    /// Name for display, falling back to the id
    pub fn display_name(&self) -> Option<&str> {
        self.table_name.as_deref().or(self.table_id.as_deref())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
