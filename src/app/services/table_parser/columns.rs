//! Column resolution: noisy labels to canonical semantic fields
//!
//! Resolution is driven by an explicit, declaratively ordered list of
//! `(canonical key, predicate)` pairs evaluated in fixed order. Predicates
//! are pure functions over normalized label text so they can be unit-tested
//! in isolation, and declaration order breaks any real-world ambiguity.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::values::normalize_label;

/// Well-known canonical column keys
pub mod canonical {
    pub const DELAY: &str = "delay";
    pub const DRIVER_NAME: &str = "driver_name";
    pub const PLATE: &str = "plate";
    pub const ROUTE_NAME: &str = "route_name";
    pub const ROUTE_NUMBER: &str = "route_number";
    pub const PLANNED_TIME: &str = "planned_time";
    pub const ASSIGNED_TIME: &str = "assigned_time";
    pub const DEPARTURE_TIME: &str = "departure_time";
    pub const SHIFT_DATE: &str = "shift_date";
    pub const TTN_NUMBER: &str = "ttn_number";
    pub const TTN_DATE: &str = "ttn_date";
    pub const WAITING_PERIOD: &str = "waiting_period";
}

/// A normalized semantic field name, independent of the source label
pub type CanonicalColumn = String;

/// A pure predicate over a normalized column label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LabelPredicate {
    /// Label contains the given substring
    Contains(String),
    /// Label equals the given text exactly (after normalization)
    Equals(String),
    /// All sub-predicates hold (empty list always holds)
    AllOf(Vec<LabelPredicate>),
    /// At least one sub-predicate holds (empty list never holds)
    AnyOf(Vec<LabelPredicate>),
}

impl LabelPredicate {
    pub fn contains(token: impl Into<String>) -> Self {
        Self::Contains(token.into())
    }

    pub fn equals(text: impl Into<String>) -> Self {
        Self::Equals(text.into())
    }

    pub fn all_of(predicates: impl IntoIterator<Item = LabelPredicate>) -> Self {
        Self::AllOf(predicates.into_iter().collect())
    }

    pub fn any_of(predicates: impl IntoIterator<Item = LabelPredicate>) -> Self {
        Self::AnyOf(predicates.into_iter().collect())
    }

    /// Conjunction of plain `Contains` tokens
    pub fn all_tokens(tokens: &[&str]) -> Self {
        Self::AllOf(tokens.iter().map(|t| Self::contains(*t)).collect())
    }

    /// Evaluate against already-normalized label text
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            LabelPredicate::Contains(token) => normalized.contains(token.as_str()),
            LabelPredicate::Equals(text) => normalized == text,
            LabelPredicate::AllOf(preds) => preds.iter().all(|p| p.matches(normalized)),
            LabelPredicate::AnyOf(preds) => preds.iter().any(|p| p.matches(normalized)),
        }
    }
}

/// One resolution rule: the first unbound column satisfying `predicate`
/// binds to `key`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRule {
    pub key: CanonicalColumn,
    pub predicate: LabelPredicate,
}

impl ColumnRule {
    pub fn new(key: impl Into<CanonicalColumn>, predicate: LabelPredicate) -> Self {
        Self {
            key: key.into(),
            predicate,
        }
    }
}

/// Mapping from canonical keys to the original column labels of one table
///
/// At most one original column binds each canonical key; a key with no
/// satisfying column is simply absent, never an error.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    bindings: HashMap<CanonicalColumn, String>,
}

impl ColumnMap {
    /// Original label bound to a canonical key, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.bindings.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Resolver holding an ordered rule list
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    rules: Vec<ColumnRule>,
}

impl ColumnResolver {
    pub fn new(rules: Vec<ColumnRule>) -> Self {
        Self { rules }
    }

    /// Resolve canonical keys against a table's column labels
    ///
    /// Rules are evaluated in declaration order; for each rule, columns are
    /// scanned in table order and the first match that is not already bound
    /// to another key wins. A column never satisfies two keys.
    pub fn resolve(&self, labels: &[String]) -> ColumnMap {
        let normalized: Vec<String> = labels.iter().map(|l| normalize_label(l)).collect();
        let mut bound_columns = vec![false; labels.len()];
        let mut bindings = HashMap::new();

        for rule in &self.rules {
            if bindings.contains_key(&rule.key) {
                continue;
            }
            for (index, norm) in normalized.iter().enumerate() {
                if bound_columns[index] {
                    continue;
                }
                if rule.predicate.matches(norm) {
                    debug!(
                        key = %rule.key,
                        label = %labels[index],
                        "resolved canonical column"
                    );
                    bound_columns[index] = true;
                    bindings.insert(rule.key.clone(), labels[index].clone());
                    break;
                }
            }
        }

        ColumnMap { bindings }
    }
}
