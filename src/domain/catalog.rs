//! Selectable operator/machine/operation names and their ordering

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The three option lists an entry selects from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Operator,
    Machine,
    Operation,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Operator, Category::Machine, Category::Operation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Operator => "operator",
            Category::Machine => "machine",
            Category::Operation => "operation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "operator" | "operators" => Ok(Category::Operator),
            "machine" | "machines" => Ok(Category::Machine),
            "operation" | "operations" => Ok(Category::Operation),
            _ => Err(format!(
                "Invalid category: '{}'. Valid categories are: operator, machine, operation",
                s
            )),
        }
    }
}

/// Option lists as published by the list provider.
///
/// Plural and singular keys are both accepted; the plural wins when both exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCatalog")]
pub struct Catalog {
    pub operators: Vec<String>,
    pub machines: Vec<String>,
    pub operations: Vec<String>,
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    operators: Option<Vec<String>>,
    #[serde(default)]
    operator: Option<Vec<String>>,
    #[serde(default)]
    machines: Option<Vec<String>>,
    #[serde(default)]
    machine: Option<Vec<String>>,
    #[serde(default)]
    operations: Option<Vec<String>>,
    #[serde(default)]
    operation: Option<Vec<String>>,
}

impl From<RawCatalog> for Catalog {
    fn from(raw: RawCatalog) -> Self {
        Catalog {
            operators: raw.operators.or(raw.operator).unwrap_or_default(),
            machines: raw.machines.or(raw.machine).unwrap_or_default(),
            operations: raw.operations.or(raw.operation).unwrap_or_default(),
        }
    }
}

/// Per-name usage counts for each category
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Frequency {
    #[serde(default)]
    pub operators: HashMap<String, u64>,
    #[serde(default)]
    pub machines: HashMap<String, u64>,
    #[serde(default)]
    pub operations: HashMap<String, u64>,
}

impl Frequency {
    pub fn counts(&self, category: Category) -> &HashMap<String, u64> {
        match category {
            Category::Operator => &self.operators,
            Category::Machine => &self.machines,
            Category::Operation => &self.operations,
        }
    }
}

impl Catalog {
    pub fn list(&self, category: Category) -> &[String] {
        match category {
            Category::Operator => &self.operators,
            Category::Machine => &self.machines,
            Category::Operation => &self.operations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty() && self.machines.is_empty() && self.operations.is_empty()
    }

    /// Options for display: most used first, ties in list order, optionally
    /// narrowed by a case-insensitive substring.
    pub fn options(
        &self,
        category: Category,
        frequency: Option<&Frequency>,
        filter: Option<&str>,
    ) -> Vec<String> {
        let needle = filter
            .map(|f| f.trim().to_lowercase())
            .filter(|f| !f.is_empty());

        let mut options: Vec<String> = self
            .list(category)
            .iter()
            .filter(|item| {
                needle
                    .as_ref()
                    .is_none_or(|n| item.to_lowercase().contains(n.as_str()))
            })
            .cloned()
            .collect();

        if let Some(freq) = frequency {
            let counts = freq.counts(category);
            // Stable sort keeps list order among equal counts
            options.sort_by(|a, b| {
                let ca = counts.get(a).copied().unwrap_or(0);
                let cb = counts.get(b).copied().unwrap_or(0);
                cb.cmp(&ca)
            });
        }

        options
    }

    /// Map a typed value onto the canonical list entry.
    ///
    /// Returns `None` when the category has entries and none match. An empty
    /// list (provider unavailable) accepts any non-blank value as given.
    pub fn resolve(&self, category: Category, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        let list = self.list(category);
        if list.is_empty() {
            return Some(value.to_string());
        }

        list.iter()
            .find(|item| item.eq_ignore_ascii_case(value))
            .cloned()
    }
}
