//! Match lifecycle state machine.
//!
//! Consumes classified events and accumulates scoring state. The tracker is
//! created per parse pass and handed through by exclusive ownership; there
//! is no process-wide singleton.

use crate::models::{MatchStats, ResultSet};
use std::collections::HashSet;

/// Sentinel identifier for environmental (non-player) kill causes. Never
/// added to player rosters and never scored.
pub const WORLD_PLAYER: &str = "<world>";

/// Match identifier prefix; full identifiers are `game_1`, `game_2`, ...
pub const MATCH_ID_PREFIX: &str = "game_";

#[derive(Debug, Default)]
pub struct MatchTracker {
    open: bool,
    index: usize,
    history: ResultSet,
}

impl MatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the most recently created match.
    ///
    /// Stays valid after the match is finalized; before any start event the
    /// index is 0 and no match exists under the returned identifier.
    pub fn current_match_id(&self) -> String {
        format!("{}{}", MATCH_ID_PREFIX, self.index)
    }

    /// Open a new match.
    ///
    /// A start event is never lost: an already-open match is finalized first,
    /// exactly as if its end event had arrived.
    pub fn on_start(&mut self) {
        if self.open {
            self.on_end();
        }
        self.open = true;
        self.index += 1;
        self.history
            .insert(self.current_match_id(), MatchStats::default());
    }

    /// Finalize the current match: close it and deduplicate its player
    /// roster in place (stable, first occurrence wins). `kills` and
    /// `total_kills` stay untouched. Idempotent: a second call with no
    /// intervening start is a no-op.
    pub fn on_end(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        let id = self.current_match_id();
        if let Some(stats) = self.history.get_mut(&id) {
            dedup_first_occurrence(&mut stats.players);
        }
    }

    /// Record a player joining the current match.
    ///
    /// Dropped silently when the name is empty, names the world
    /// pseudo-player, or no match is open (join lines can precede the first
    /// start marker in truncated logs).
    pub fn on_player_joined(&mut self, name: &str) {
        if name.is_empty() || name == WORLD_PLAYER || !self.open {
            return;
        }
        let id = self.current_match_id();
        if let Some(stats) = self.history.get_mut(&id) {
            stats.players.push(name.to_string());
            stats.kills.entry(name.to_string()).or_insert(0);
        }
    }

    /// Record a kill against the most recent match, open or finalized.
    ///
    /// `total_kills` always increments. A self-inflicted kill changes no
    /// score; a world kill decrements the victim; otherwise the killer is
    /// incremented. Scores default to zero on first involvement, and the
    /// world pseudo-player never receives an entry. Kills arriving before
    /// the first start event have no match to land in and are dropped.
    pub fn on_kill(&mut self, killer: &str, victim: &str) {
        let id = self.current_match_id();
        let Some(stats) = self.history.get_mut(&id) else {
            return;
        };

        stats.total_kills += 1;
        if killer == victim {
            return;
        }
        if killer == WORLD_PLAYER {
            *stats.kills.entry(victim.to_string()).or_insert(0) -= 1;
        } else {
            *stats.kills.entry(killer.to_string()).or_insert(0) += 1;
        }
    }

    pub fn history(&self) -> &ResultSet {
        &self.history
    }

    /// Consume the tracker, yielding the accumulated history.
    pub fn into_results(self) -> ResultSet {
        self.history
    }
}

fn dedup_first_occurrence(players: &mut Vec<String>) {
    let mut seen = HashSet::new();
    players.retain(|player| seen.insert(player.clone()));
}
