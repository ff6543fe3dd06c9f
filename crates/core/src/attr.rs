// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic attribute-map representation of stored items

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One attribute value in its stored scalar form
///
/// Numbers are carried as strings, matching the wire representation of
/// the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    /// String
    S(String),
    /// Number, carried as a string
    N(String),
    /// String set
    Ss(BTreeSet<String>),
    /// Boolean
    Bool(bool),
}

impl AttrValue {
    pub fn s(v: impl Into<String>) -> Self {
        Self::S(v.into())
    }

    pub fn n(v: i64) -> Self {
        Self::N(v.to_string())
    }

    pub fn ss<I, T>(vals: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::Ss(vals.into_iter().map(Into::into).collect())
    }

    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric value, if this is a parseable number
    pub fn as_n(&self) -> Option<i64> {
        match self {
            Self::N(v) => v.parse().ok(),
            _ => None,
        }
    }

    pub fn as_ss(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Ss(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

/// One stored item: attribute name to value
pub type Item = BTreeMap<String, AttrValue>;

#[cfg(test)]
#[path = "attr_tests.rs"]
mod tests;
