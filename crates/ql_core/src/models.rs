//! Result types produced by a parse pass.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Aggregate statistics for one match.
///
/// `players` keeps insertion order and may hold duplicates until the match
/// is finalized; `kills` holds signed scores (world kills subtract).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub total_kills: u32,
    pub players: Vec<String>,
    pub kills: BTreeMap<String, i32>,
}

/// Mapping from match identifier to [`MatchStats`], in match-creation order.
///
/// Serializes as a map (JSON object, MessagePack map) while preserving
/// insertion order, so `game_10` stays after `game_2` in rendered output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: Vec<(String, MatchStats)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the stats stored under `id`.
    pub fn insert(&mut self, id: String, stats: MatchStats) {
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some(entry) => entry.1 = stats,
            None => self.entries.push((id, stats)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&MatchStats> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, stats)| stats)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut MatchStats> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == id)
            .map(|(_, stats)| stats)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MatchStats)> {
        self.entries.iter().map(|(id, stats)| (id.as_str(), stats))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ResultSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, stats) in &self.entries {
            map.serialize_entry(id, stats)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResultSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ResultSetVisitor;

        impl<'de> Visitor<'de> for ResultSetVisitor {
            type Value = ResultSet;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of match identifiers to match statistics")
            }

            fn visit_map<A>(self, mut access: A) -> Result<ResultSet, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, stats)) = access.next_entry::<String, MatchStats>()? {
                    entries.push((id, stats));
                }
                Ok(ResultSet { entries })
            }
        }

        deserializer.deserialize_map(ResultSetVisitor)
    }
}
