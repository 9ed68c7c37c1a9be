//! Provider lookup
//!
//! Providers are only a join key for claims. The directory exposes the
//! source data's `PotentialFraud` flag next to scored claims; it never feeds
//! into the score.

use std::collections::HashMap;
use tracing::warn;

use core_kernel::{ProviderId, Table, Value};

use crate::claim::columns;

#[derive(Debug, Clone, Default)]
pub struct ProviderDirectory {
    flags: HashMap<ProviderId, Option<bool>>,
}

impl ProviderDirectory {
    /// Builds the directory from the providers table
    ///
    /// A table without a `Provider` column yields an empty directory.
    pub fn from_table(table: &Table) -> Self {
        let Some(id_position) = table.schema().position(columns::PROVIDER) else {
            warn!(column = columns::PROVIDER, "providers table has no identifier column");
            return Self::default();
        };
        let flag_position = table.schema().position(columns::POTENTIAL_FRAUD);
        if flag_position.is_none() {
            warn!(column = columns::POTENTIAL_FRAUD, "providers table has no fraud flag column");
        }

        let flags = table
            .rows()
            .iter()
            .filter_map(|row| {
                let id = row.get(id_position).and_then(ProviderId::from_value)?;
                let flag = flag_position
                    .and_then(|position| row.get(position))
                    .and_then(parse_flag);
                Some((id, flag))
            })
            .collect();

        Self { flags }
    }

    /// The provider's fraud flag; `None` when unknown or unlisted
    pub fn potential_fraud(&self, provider: &ProviderId) -> Option<bool> {
        self.flags.get(provider).copied().flatten()
    }

    pub fn contains(&self, provider: &ProviderId) -> bool {
        self.flags.contains_key(provider)
    }

    pub fn flagged_count(&self) -> usize {
        self.flags.values().filter(|flag| **flag == Some(true)).count()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Text(text) => match text.to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" => Some(true),
            "no" | "n" | "false" => Some(false),
            _ => None,
        },
        Value::Integer(1) => Some(true),
        Value::Integer(0) => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_flags() {
        let mut table = Table::new(["Provider", "PotentialFraud"]).unwrap();
        table.push_row(vec![Value::text("PRV51001"), Value::text("No")]).unwrap();
        table.push_row(vec![Value::text("PRV51003"), Value::text("Yes")]).unwrap();
        table.push_row(vec![Value::text("PRV51004"), Value::Unknown]).unwrap();

        let directory = ProviderDirectory::from_table(&table);
        assert_eq!(directory.len(), 3);
        assert_eq!(directory.potential_fraud(&ProviderId::new("PRV51001")), Some(false));
        assert_eq!(directory.potential_fraud(&ProviderId::new("PRV51003")), Some(true));
        assert_eq!(directory.potential_fraud(&ProviderId::new("PRV51004")), None);
        assert_eq!(directory.potential_fraud(&ProviderId::new("PRV99999")), None);
        assert_eq!(directory.flagged_count(), 1);
    }

    #[test]
    fn test_missing_identifier_column_yields_empty_directory() {
        let table = Table::new(["PotentialFraud"]).unwrap();
        assert!(ProviderDirectory::from_table(&table).is_empty());
    }
}
