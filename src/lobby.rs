//! Multiplayer room, mocked locally
//!
//! There is no server yet: opponents join on a timer and score on a timer
//! from the lobby's own seeded RNG. The local player plays a normal `Game`
//! whose score is mirrored into the room's player list.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::game::{Game, LoopToken};
use crate::leaderboard::{self, Player, Standing};
use crate::session::SessionStatus;
use crate::sim::HitOutcome;

/// Players per room
pub const ROOM_CAPACITY: usize = 4;
/// Gap between mock players joining (ms)
pub const JOIN_INTERVAL_MS: f64 = 1200.0;
/// Gap between opponent score updates (ms)
pub const OPPONENT_SCORE_INTERVAL_MS: f64 = 650.0;
/// Chance an opponent update is a collectible rather than a hazard
pub const OPPONENT_HIT_CHANCE: f64 = 0.75;
/// Room games always run this long
pub const ROOM_GAME_SECS: u32 = 45;
/// Winner overlay appears this long after the game ends (ms)
pub const WINNER_DELAY_MS: f64 = 500.0;
/// and stays up for this long (ms)
pub const WINNER_DISPLAY_MS: f64 = 2400.0;

const OPPONENT_GAIN: i32 = 10;
const OPPONENT_LOSS: i32 = -15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    Lobby,
    InGame,
    Ended,
}

/// Things the room UI reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyEvent {
    PlayerJoined { id: String, nickname: String },
    GameEnded { my_rank: usize },
}

/// Deterministic fake wallet address for mock player `seed`
pub fn mock_address(seed: u32) -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    let seed = seed as usize;
    let body: String = (0..40)
        .map(|i| HEX[(i * 7 + seed * 13) % 16] as char)
        .collect();
    format!("0x{body}")
}

#[derive(Debug, Clone)]
pub struct Lobby {
    pub room_id: String,
    pub phase: RoomPhase,
    pub players: Vec<Player>,
    my_id: String,
    game: Game,
    rng: Pcg32,
    next_join_at_ms: f64,
    next_score_at_ms: f64,
    ended_at_ms: Option<f64>,
    winner_dismissed: bool,
}

impl Lobby {
    /// Open a room with the local player as host
    pub fn new(room_id: &str, my_id: &str, nickname: &str, seed: u64, wall_ms: f64) -> Self {
        let me = Player {
            id: my_id.to_string(),
            nickname: nickname.to_string(),
            score: 0,
            is_host: true,
        };
        Self {
            room_id: room_id.to_string(),
            phase: RoomPhase::Lobby,
            players: vec![me],
            my_id: my_id.to_string(),
            game: Game::new(seed, ROOM_GAME_SECS),
            // Separate stream so opponents don't perturb spawns
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed_0bb0),
            next_join_at_ms: wall_ms + JOIN_INTERVAL_MS,
            next_score_at_ms: 0.0,
            ended_at_ms: None,
            winner_dismissed: false,
        }
    }

    pub fn my_id(&self) -> &str {
        &self.my_id
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// For the host's frame loop
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= ROOM_CAPACITY
    }

    fn i_am_host(&self) -> bool {
        self.players.iter().any(|p| p.id == self.my_id && p.is_host)
    }

    /// Host may start once the room is full
    pub fn can_start(&self) -> bool {
        self.phase == RoomPhase::Lobby && self.is_full() && self.i_am_host()
    }

    /// Advance the room timers (call from the coarse ~200ms timer)
    pub fn tick(&mut self, wall_ms: f64) -> Vec<LobbyEvent> {
        let mut events = Vec::new();
        match self.phase {
            RoomPhase::Lobby => self.admit_players(wall_ms, &mut events),
            RoomPhase::InGame => {
                self.game.countdown_tick(wall_ms);
                self.score_opponents(wall_ms);
                self.sync_my_score();

                let remaining = self.game.session.remaining_secs;
                if remaining == 0 || self.game.status() == SessionStatus::Ended {
                    self.finish(wall_ms, &mut events);
                }
            }
            RoomPhase::Ended => {}
        }
        events
    }

    fn admit_players(&mut self, wall_ms: f64, events: &mut Vec<LobbyEvent>) {
        while !self.is_full() && wall_ms >= self.next_join_at_ms {
            // Seat number, counting the host as 1
            let n = self.players.len() as u32 + 1;
            let player = Player {
                id: mock_address(n),
                nickname: format!("Player {n}"),
                score: 0,
                is_host: false,
            };
            log::info!(
                "{} joined room {} ({}/{})",
                player.nickname,
                self.room_id,
                n,
                ROOM_CAPACITY
            );
            events.push(LobbyEvent::PlayerJoined {
                id: player.id.clone(),
                nickname: player.nickname.clone(),
            });
            self.players.push(player);
            self.next_join_at_ms += JOIN_INTERVAL_MS;
        }
    }

    fn score_opponents(&mut self, wall_ms: f64) {
        while wall_ms >= self.next_score_at_ms {
            for player in self.players.iter_mut().filter(|p| p.id != self.my_id) {
                let delta = if self.rng.random::<f64>() < OPPONENT_HIT_CHANCE {
                    OPPONENT_GAIN
                } else {
                    OPPONENT_LOSS
                };
                player.score = (player.score as i64 + delta as i64).max(0) as u32;
            }
            self.next_score_at_ms += OPPONENT_SCORE_INTERVAL_MS;
        }
    }

    fn sync_my_score(&mut self) {
        let score = self.game.session.score;
        if let Some(me) = self.players.iter_mut().find(|p| p.id == self.my_id) {
            me.score = score;
        }
    }

    fn finish(&mut self, wall_ms: f64, events: &mut Vec<LobbyEvent>) {
        self.game.stop();
        self.game.runtime.items.clear();
        self.sync_my_score();
        self.phase = RoomPhase::Ended;
        self.ended_at_ms = Some(wall_ms);

        let my_rank = self.my_rank().unwrap_or(self.players.len());
        log::info!("Room {} game over, finished #{}", self.room_id, my_rank);
        events.push(LobbyEvent::GameEnded { my_rank });
    }

    /// Reset every score and start the embedded game
    pub fn start_game(&mut self, wall_ms: f64) -> Option<LoopToken> {
        if !self.can_start() {
            return None;
        }
        for player in &mut self.players {
            player.score = 0;
        }
        self.phase = RoomPhase::InGame;
        self.next_score_at_ms = wall_ms + OPPONENT_SCORE_INTERVAL_MS;
        self.ended_at_ms = None;
        self.winner_dismissed = false;
        log::info!("Room {} game started", self.room_id);
        Some(self.game.start(wall_ms))
    }

    /// Leave the running game early
    pub fn exit_game(&mut self, wall_ms: f64) {
        if self.phase == RoomPhase::InGame {
            let mut events = Vec::new();
            self.finish(wall_ms, &mut events);
        }
    }

    /// Click on the embedded game (arena coordinates)
    pub fn click(&mut self, point: Vec2, now_ms: f64) -> Option<HitOutcome> {
        if self.phase != RoomPhase::InGame {
            return None;
        }
        let hit = self.game.click(point, now_ms);
        self.sync_my_score();
        hit
    }

    pub fn standings(&self) -> Vec<Standing<'_>> {
        leaderboard::standings(&self.players, &self.my_id)
    }

    pub fn my_rank(&self) -> Option<usize> {
        leaderboard::rank_of(&self.players, &self.my_id)
    }

    /// Winner overlay is on screen
    pub fn winner_visible(&self, wall_ms: f64) -> bool {
        let Some(ended) = self.ended_at_ms else {
            return false;
        };
        if self.winner_dismissed || self.my_rank() != Some(1) {
            return false;
        }
        let shown_at = ended + WINNER_DELAY_MS;
        wall_ms >= shown_at && wall_ms < shown_at + WINNER_DISPLAY_MS
    }

    pub fn dismiss_winner(&mut self) {
        self.winner_dismissed = true;
    }
}
