//! Line classification for Quake-style server logs.
//!
//! Classification is line-local and stateless: every fragile assumption
//! about the text format lives here, so the match lifecycle logic never
//! touches raw log text. A line that carries an event marker but fails the
//! structured grammar is an expected outcome, not an error: the parsers
//! return `None` and the line classifies as [`LogEvent::Ignored`].

const START_MARKER: &str = "InitGame";
const END_MARKER: &str = "ShutdownGame";
const JOIN_MARKER: &str = "ClientUserinfoChanged";
const KILL_MARKER: &str = "killed";

/// Typed event extracted from a single raw log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    MatchStart,
    MatchEnd,
    PlayerJoined(String),
    Kill { killer: String, victim: String },
    Ignored,
}

/// Classify one raw log line.
///
/// Start/end markers trigger on substring presence anywhere in the line;
/// join and kill lines must additionally satisfy their structured grammar.
pub fn classify(line: &str) -> LogEvent {
    if line.contains(START_MARKER) {
        LogEvent::MatchStart
    } else if line.contains(END_MARKER) {
        LogEvent::MatchEnd
    } else if line.contains(JOIN_MARKER) {
        match parse_join_line(line) {
            Some(name) => LogEvent::PlayerJoined(name),
            None => LogEvent::Ignored,
        }
    } else if line.contains(KILL_MARKER) {
        match parse_kill_line(line) {
            Some((killer, victim)) => LogEvent::Kill { killer, victim },
            None => LogEvent::Ignored,
        }
    } else {
        LogEvent::Ignored
    }
}

/// Extract `(killer, victim)` from a kill event line.
///
/// Expected shape:
/// ` 20:54 Kill: 1022 2 22: <world> killed Isgalamido by MOD_TRIGGER_HURT`
///
/// Names are bounded by the fixed ` killed ` and ` by ` delimiters; the
/// killer ends at the first ` killed `, the victim at the last ` by `, so
/// names containing spaces survive intact.
fn parse_kill_line(line: &str) -> Option<(String, String)> {
    let rest = strip_timestamp(line)?;

    // 4-character event tag terminated by ": "; a missing colon fails here.
    let (tag, rest) = rest.split_once(": ")?;
    if tag.len() != 4 || !tag.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    // Three numeric id fields terminated by ": ".
    let (ids, rest) = rest.split_once(": ")?;
    let mut field_count = 0;
    for field in ids.split(' ') {
        if field.is_empty() || !is_digits(field) {
            return None;
        }
        field_count += 1;
    }
    if field_count != 3 {
        return None;
    }

    let (killer, rest) = rest.split_once(" killed ")?;
    let (victim, cause) = rest.rsplit_once(" by ")?;
    if killer.is_empty() || victim.is_empty() {
        return None;
    }
    if !cause.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return None;
    }

    Some((killer.to_string(), victim.to_string()))
}

/// Extract the player name from a client-join line.
///
/// Expected shape:
/// ` 20:38 ClientUserinfoChanged: 2 n\Isgalamido\t\0\model\uriel/zael\...`
///
/// The name runs from the `n\` separator to the first `\t` escape sequence
/// (two literal characters, backslash then `t`).
fn parse_join_line(line: &str) -> Option<String> {
    let rest = strip_timestamp(line)?;
    let rest = rest.strip_prefix(JOIN_MARKER)?;
    let rest = rest.strip_prefix(':')?;

    let rest = rest.trim_start_matches(' ');
    let (client_id, rest) = rest.split_once(' ')?;
    if client_id.is_empty() || !is_digits(client_id) {
        return None;
    }

    let rest = rest.trim_start_matches(' ');
    let rest = rest.strip_prefix("n\\")?;
    let (name, _) = rest.split_once("\\t")?;

    Some(name.to_string())
}

/// Strip the leading ` MM:SS ` timestamp, returning the remainder.
fn strip_timestamp(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(' ');
    let (clock, rest) = rest.split_once(' ')?;
    let (minutes, seconds) = clock.split_once(':')?;
    if minutes.is_empty() || seconds.is_empty() {
        return None;
    }
    if !is_digits(minutes) || !is_digits(seconds) {
        return None;
    }
    Some(rest)
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_start_line() {
        let line = r"  0:00 InitGame: \sv_floodProtect\1\sv_maxPing\0\sv_minPing\0";
        assert_eq!(classify(line), LogEvent::MatchStart);
    }

    #[test]
    fn test_classify_end_line() {
        assert_eq!(classify(" 20:37 ShutdownGame:"), LogEvent::MatchEnd);
    }

    #[test]
    fn test_start_marker_matches_anywhere_in_line() {
        // Substring detection is unanchored.
        assert_eq!(classify("garbage InitGame garbage"), LogEvent::MatchStart);
    }

    #[test]
    fn test_classify_world_kill_line() {
        let line = " 21:07 Kill: 1022 2 22: <world> killed Isgalamido by MOD_TRIGGER_HURT";
        assert_eq!(
            classify(line),
            LogEvent::Kill {
                killer: "<world>".to_string(),
                victim: "Isgalamido".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_player_kill_line() {
        let line = " 22:06 Kill: 2 3 7: Isgalamido killed Mocinha by MOD_ROCKET_SPLASH";
        assert_eq!(
            classify(line),
            LogEvent::Kill {
                killer: "Isgalamido".to_string(),
                victim: "Mocinha".to_string(),
            }
        );
    }

    #[test]
    fn test_kill_names_may_contain_spaces() {
        let line = " 2:34 Kill: 4 5 7: Oootsimo killed Dono da Bola by MOD_ROCKET_SPLASH";
        assert_eq!(
            classify(line),
            LogEvent::Kill {
                killer: "Oootsimo".to_string(),
                victim: "Dono da Bola".to_string(),
            }
        );
    }

    #[test]
    fn test_kill_line_missing_colon_is_ignored() {
        let line = " 21:07 Kill 1022 2 22 <world> killed Isgalamido by MOD_TRIGGER_HURT";
        assert_eq!(classify(line), LogEvent::Ignored);
    }

    #[test]
    fn test_kill_line_with_two_id_fields_is_ignored() {
        let line = " 21:07 Kill: 1022 2: <world> killed Isgalamido by MOD_TRIGGER_HURT";
        assert_eq!(classify(line), LogEvent::Ignored);
    }

    #[test]
    fn test_classify_valid_join_line() {
        let line = r" 20:38 ClientUserinfoChanged: 2 n\Isgalamido\t\0\model\uriel/zael\hmodel\uriel/zael\g_redteam\g_blueteam\c1\5\c2\5\hc\100\w\0\l\0\tt\0\tl\0";
        assert_eq!(
            classify(line),
            LogEvent::PlayerJoined("Isgalamido".to_string())
        );
    }

    #[test]
    fn test_join_line_without_client_id_is_ignored() {
        let line = r" 20:38 ClientUserinfoChanged: Isgalamido\t\0\model\uriel/zael\hmodel\uriel/zael\g_redteam\g_blueteam\c1\5\c2\5\hc\100\w\0\l\0\tt\0\tl\0";
        assert_eq!(classify(line), LogEvent::Ignored);
    }

    #[test]
    fn test_unrelated_lines_are_ignored() {
        assert_eq!(classify(" 20:34 ClientConnect: 2"), LogEvent::Ignored);
        assert_eq!(
            classify("  0:00 ------------------------------------------------------------"),
            LogEvent::Ignored
        );
        assert_eq!(classify(""), LogEvent::Ignored);
    }
}
