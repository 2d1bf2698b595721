use serde::Deserialize;
use std::collections::HashMap;

use crate::types::MemberId;

/// A raw member record as returned by the club members endpoint.
///
/// Every field is optional because the upstream API omits fields freely; the
/// index builder decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: Option<MemberId>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl MemberRecord {
    /// Resolves a display name: the explicit composite name when present,
    /// otherwise "firstName lastName" trimmed. Empty results count as absent.
    fn display_name(&self) -> Option<String> {
        if let Some(name) = self.name.as_deref() {
            if !name.trim().is_empty() {
                return Some(name.to_string());
            }
        }

        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        let combined = format!("{first} {last}").trim().to_string();

        if combined.is_empty() {
            None
        } else {
            Some(combined)
        }
    }
}

/// Lookup from member id to display name, built once per run.
///
/// Entries keep upstream order so that example listings and search results
/// are deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemberIndex {
    entries: Vec<(MemberId, String)>,
    by_id: HashMap<MemberId, usize>,
}

impl MemberIndex {
    /// Builds the index, skipping records without both a usable id and a
    /// usable name. Later duplicates of an id win, matching upstream order.
    pub fn from_records(records: &[MemberRecord]) -> Self {
        let mut index = Self::default();

        for record in records {
            let Some(id) = record.id.as_deref().filter(|id| !id.is_empty()) else {
                continue;
            };
            let Some(name) = record.display_name() else {
                continue;
            };

            match index.by_id.get(id) {
                Some(&position) => index.entries[position].1 = name,
                None => {
                    index.by_id.insert(id.to_string(), index.entries.len());
                    index.entries.push((id.to_string(), name));
                }
            }
        }

        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, member_id: &str) -> Option<&str> {
        self.by_id
            .get(member_id)
            .map(|&position| self.entries[position].1.as_str())
    }

    /// Resolves a member id to a name, synthesizing a placeholder for ids
    /// the index has never seen. Never fails.
    pub fn display_name(&self, member_id: &str) -> String {
        self.get(member_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unknown ({member_id})"))
    }

    /// Case-insensitive substring search over display names, in index order.
    pub fn search(&self, query: &str) -> Vec<(&str, &str)> {
        let query = query.to_lowercase();

        self.entries
            .iter()
            .filter(|(_, name)| name.to_lowercase().contains(&query))
            .map(|(id, name)| (id.as_str(), name.as_str()))
            .collect()
    }

    /// All names in index order, used for "did you mean" style listings.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, name)| name.as_str())
    }
}
