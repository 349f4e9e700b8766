//! Room leaderboard
//!
//! Ranks the players of a room by score, highest first. Ties keep join
//! order, so the host wins a tie against anyone who joined later.

use serde::{Deserialize, Serialize};

/// A player in a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Wallet address
    pub id: String,
    pub nickname: String,
    pub score: u32,
    pub is_host: bool,
}

/// One leaderboard row
#[derive(Debug, Clone, Copy)]
pub struct Standing<'a> {
    /// 1-indexed
    pub rank: usize,
    pub player: &'a Player,
    pub is_me: bool,
}

/// Players sorted by score, descending
pub fn standings<'a>(players: &'a [Player], my_id: &str) -> Vec<Standing<'a>> {
    let mut sorted: Vec<&Player> = players.iter().collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, player)| Standing {
            rank: i + 1,
            player,
            is_me: player.id == my_id,
        })
        .collect()
}

/// Rank of player `id` (1-indexed), or None if not in the room
pub fn rank_of(players: &[Player], id: &str) -> Option<usize> {
    standings(players, id)
        .into_iter()
        .find(|s| s.is_me)
        .map(|s| s.rank)
}

/// `0x1234…abcd` form of an address
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

/// Format a leaderboard row for text output
pub fn format_row(standing: &Standing<'_>) -> String {
    let host = if standing.player.is_host { " ★" } else { "" };
    let me = if standing.is_me { " (you)" } else { "" };
    format!(
        "#{} {}{}{} [{}] {}",
        standing.rank,
        standing.player.nickname,
        host,
        me,
        short_address(&standing.player.id),
        standing.player.score
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, score: u32, is_host: bool) -> Player {
        Player {
            id: id.to_string(),
            nickname: id.to_uppercase(),
            score,
            is_host,
        }
    }

    #[test]
    fn test_standings_sorted_desc() {
        let players = vec![player("a", 10, true), player("b", 30, false), player("c", 20, false)];
        let rows = standings(&players, "c");
        let order: Vec<_> = rows.iter().map(|s| s.player.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert_eq!(rows[1].rank, 2);
        assert!(rows[1].is_me);
    }

    #[test]
    fn test_ties_keep_join_order() {
        let players = vec![player("host", 50, true), player("guest", 50, false)];
        assert_eq!(rank_of(&players, "host"), Some(1));
        assert_eq!(rank_of(&players, "guest"), Some(2));
        assert_eq!(rank_of(&players, "nobody"), None);
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0x0123456789abcdef0123456789abcdef01234567"),
            "0x0123…4567"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
    }

    #[test]
    fn test_format_row() {
        let players = vec![player("0x0123456789abcdef", 40, true)];
        let rows = standings(&players, "0x0123456789abcdef");
        assert_eq!(format_row(&rows[0]), "#1 0X0123456789ABCDEF ★ (you) [0x0123…cdef] 40");
    }
}
