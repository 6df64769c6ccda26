//! Cipher key and legend types

use std::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};
use crate::types::RelationKeyword;

/// Session-scoped substitution of every keyword by a nonsense token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherMap {
    entries: BTreeMap<RelationKeyword, String>,
}

impl CipherMap {
    /// Build from explicit pairs. Callers guarantee one token per keyword.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (RelationKeyword, String)>) -> Self {
        Self {
            entries: pairs.into_iter().collect(),
        }
    }

    /// Token for a keyword, if mapped
    pub fn token(&self, keyword: RelationKeyword) -> Option<&str> {
        self.entries.get(&keyword).map(String::as_str)
    }

    /// Every keyword mapped exactly once and no token shared
    pub fn is_bijection(&self) -> bool {
        let tokens: BTreeSet<&String> = self.entries.values().collect();
        self.entries.len() == RelationKeyword::ALL.len()
            && RelationKeyword::ALL.iter().all(|k| self.entries.contains_key(k))
            && tokens.len() == self.entries.len()
    }

    /// Restrict to the keywords a round actually used
    pub fn legend_for(&self, used: &BTreeSet<RelationKeyword>) -> Legend {
        Legend {
            entries: used
                .iter()
                .filter_map(|k| self.token(*k).map(|t| (*k, t.to_string())))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RelationKeyword, &String)> {
        self.entries.iter()
    }
}

/// Text shown for a keyword: its cipher token, or the canonical word when
/// there is no active mapping.
pub fn display_token(cipher: Option<&CipherMap>, keyword: RelationKeyword) -> String {
    cipher
        .and_then(|c| c.token(keyword))
        .map(str::to_string)
        .unwrap_or_else(|| keyword.canonical().to_string())
}

/// The used-keys subset of a cipher, handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    pub entries: Vec<(RelationKeyword, String)>,
}

impl Legend {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn token(&self, keyword: RelationKeyword) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == keyword)
            .map(|(_, t)| t.as_str())
    }
}
