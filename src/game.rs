//! Per-session game driver
//!
//! Owns one session, its runtime entity state and its RNG. The host calls
//! `frame` from whatever scheduler it has (requestAnimationFrame, a thread
//! loop, a test feeding synthetic timestamps) and `click` between frames.
//!
//! Every start/restart/stop invalidates the current `LoopToken`, so a frame
//! callback that was already queued cannot revive cleared state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::Arena;
use crate::session::{Session, SessionStatus};
use crate::sim::{Frame, FrameInput, HitOutcome, hit_test, place_item, place_text, tick};
use crate::tuning::{DifficultyTier, Tuning};

/// Ticket for one run of the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopToken(u64);

/// What the host should do after a frame
#[derive(Debug, Clone)]
pub enum FrameStep {
    /// Draw the frame and schedule another
    Continue(Frame),
    /// Session just ran out of time: draw the frame and stop scheduling
    Finished(Frame),
    /// Token is stale; nothing was touched
    Cancelled,
}

/// Notifications for the surrounding application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreDelta(i32),
    SessionEnded { score: u32 },
}

/// One concurrent game. A host running several games keeps one each.
#[derive(Debug, Clone)]
pub struct Game {
    pub session: Session,
    pub runtime: crate::sim::RuntimeState,
    pub arena: Arena,
    pub tuning: Tuning,
    seed: u64,
    rng: Pcg32,
    generation: u64,
    loop_active: bool,
    /// Frame time the summary view is pinned to once the loop stops
    frozen_at_ms: Option<f64>,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create an idle game with default balance
    pub fn new(seed: u64, duration_secs: u32) -> Self {
        Self::with_tuning(seed, duration_secs, Tuning::default())
    }

    pub fn with_tuning(seed: u64, duration_secs: u32, tuning: Tuning) -> Self {
        Self {
            session: Session::new(duration_secs),
            runtime: crate::sim::RuntimeState::new(),
            arena: Arena::default(),
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            generation: 0,
            loop_active: false,
            frozen_at_ms: None,
            events: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Switch the fall speed preset for items spawned from now on
    pub fn set_tier(&mut self, tier: DifficultyTier) {
        self.tuning.spawn.tier = tier;
    }

    /// Start the session and hand out a fresh loop token
    pub fn start(&mut self, wall_ms: f64) -> LoopToken {
        let token = self.cancel_loop();
        self.runtime.reset();
        self.frozen_at_ms = None;
        self.session.start(wall_ms);
        self.loop_active = true;
        token
    }

    /// Reset score, time and entities, then run again
    pub fn restart(&mut self, wall_ms: f64) -> LoopToken {
        let token = self.cancel_loop();
        self.runtime.reset();
        self.frozen_at_ms = None;
        self.session.restart(wall_ms);
        self.loop_active = true;
        token
    }

    /// End the session early. Items stay where the last frame put them.
    pub fn stop(&mut self) {
        self.cancel_loop();
        if self.frozen_at_ms.is_none() {
            self.frozen_at_ms = self.runtime.last_frame_ms;
        }
        self.finish_session();
    }

    /// Whether a frame loop for this game should currently be scheduled
    pub fn is_looping(&self) -> bool {
        self.loop_active
    }

    /// Advance one frame.
    ///
    /// Returns `Finished` exactly once, on the frame where the countdown is
    /// seen at zero; the active items are cleared on that frame.
    pub fn frame(&mut self, token: LoopToken, now_ms: f64) -> FrameStep {
        if !self.loop_active || token.0 != self.generation {
            return FrameStep::Cancelled;
        }

        let input = FrameInput {
            now_ms,
            spawning: self.session.is_live(),
        };
        let mut frame = tick(
            &mut self.runtime,
            &input,
            &self.arena,
            &self.tuning,
            &mut self.rng,
        );

        if self.session.is_expired() {
            self.runtime.items.clear();
            frame.items.clear();
            self.loop_active = false;
            self.frozen_at_ms = Some(now_ms);
            self.finish_session();
            return FrameStep::Finished(frame);
        }

        FrameStep::Continue(frame)
    }

    /// Handle a click at `point` (arena coordinates)
    pub fn click(&mut self, point: Vec2, now_ms: f64) -> Option<HitOutcome> {
        if !self.session.is_live() {
            return None;
        }
        let hit = hit_test(
            &mut self.runtime,
            point,
            now_ms,
            &self.arena,
            &self.tuning.scoring,
        )?;
        self.session.apply_delta(hit.delta);
        self.events.push(GameEvent::ScoreDelta(hit.delta));
        Some(hit)
    }

    /// Sample the countdown from the wall clock (~200ms external timer)
    pub fn countdown_tick(&mut self, wall_ms: f64) -> u32 {
        self.session.sample_countdown(wall_ms)
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Draw-ready view of the current state without advancing anything.
    ///
    /// While the loop runs this is the state at `now_ms`. Once it has
    /// stopped, the view stays pinned to the last frame time, so repaints
    /// of the summary (resize, late icon loads) show the same picture.
    /// A game stopped before its first frame has no such time and follows
    /// `now_ms`.
    pub fn snapshot(&self, now_ms: f64) -> Frame {
        let at = if self.loop_active {
            now_ms
        } else {
            self.frozen_at_ms.unwrap_or(now_ms)
        };
        Frame {
            now_ms: at,
            dt_ms: 0.0,
            items: self
                .runtime
                .items
                .iter()
                .filter_map(|item| place_item(item, at, &self.arena))
                .collect(),
            texts: self
                .runtime
                .texts
                .iter()
                .filter_map(|text| place_text(text, at))
                .collect(),
            danger_overlay: self.runtime.danger_overlay,
            spawned: None,
        }
    }

    fn cancel_loop(&mut self) -> LoopToken {
        self.generation += 1;
        self.loop_active = false;
        LoopToken(self.generation)
    }

    fn finish_session(&mut self) {
        if self.session.end() {
            self.events.push(GameEvent::SessionEnded {
                score: self.session.score,
            });
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FallingItem, ItemKind, TextCategory, item_placement};

    fn drop_item(game: &mut Game, kind: ItemKind, spawned_at_ms: f64) -> u32 {
        let id = game.runtime.next_entity_id();
        game.runtime.items.push(FallingItem {
            id,
            kind,
            x: 400.0,
            size: 60.0,
            spawned_at_ms,
            fall_duration_ms: 3000.0,
            consumed: false,
        });
        id
    }

    #[test]
    fn test_stale_token_is_cancelled() {
        let mut game = Game::new(1, 30);
        let first = game.start(0.0);
        assert!(matches!(game.frame(first, 16.0), FrameStep::Continue(_)));

        let second = game.restart(1_000.0);
        assert!(matches!(game.frame(first, 32.0), FrameStep::Cancelled));
        assert!(matches!(game.frame(second, 32.0), FrameStep::Continue(_)));

        game.stop();
        assert!(matches!(game.frame(second, 48.0), FrameStep::Cancelled));
        assert!(!game.is_looping());
    }

    #[test]
    fn test_idle_game_does_not_loop() {
        let mut game = Game::new(1, 30);
        let token = LoopToken(0);
        assert!(matches!(game.frame(token, 0.0), FrameStep::Cancelled));
    }

    #[test]
    fn test_click_applies_score_and_event() {
        let mut game = Game::new(1, 30);
        game.start(0.0);
        let id = drop_item(&mut game, ItemKind::Collectible, 0.0);
        let center = item_placement(&game.runtime.items[0], 1500.0, &game.arena).center;

        let hit = game.click(center, 1500.0).unwrap();
        assert_eq!(hit.item_id, id);
        assert_eq!(game.session.score, 10);
        assert_eq!(game.drain_events(), vec![GameEvent::ScoreDelta(10)]);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_click_ignored_unless_live() {
        let mut game = Game::new(1, 30);
        drop_item(&mut game, ItemKind::Collectible, 0.0);
        let center = item_placement(&game.runtime.items[0], 1500.0, &game.arena).center;
        assert!(game.click(center, 1500.0).is_none(), "idle");

        game.start(0.0);
        drop_item(&mut game, ItemKind::Collectible, 0.0);
        game.countdown_tick(30_000.0);
        assert!(game.click(center, 1500.0).is_none(), "no time left");
    }

    #[test]
    fn test_stop_notifies_once_and_freezes_items() {
        let mut game = Game::new(1, 30);
        game.start(0.0);
        drop_item(&mut game, ItemKind::Hazard, 0.0);
        game.stop();
        game.stop();

        assert_eq!(game.status(), SessionStatus::Ended);
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::SessionEnded { score: 0 }]
        );
        assert_eq!(game.snapshot(100.0).items.len(), 1);
    }

    #[test]
    fn test_summary_view_is_frozen_after_stop() {
        let mut game = Game::new(1, 30);
        let token = game.start(0.0);
        drop_item(&mut game, ItemKind::Collectible, 0.0);
        game.runtime
            .push_text("+10", Vec2::new(200.0, 300.0), TextCategory::Positive, 400.0);
        let FrameStep::Continue(last) = game.frame(token, 500.0) else {
            panic!("loop should be running");
        };
        // Already on the floor at 500ms
        let id = game.runtime.next_entity_id();
        game.runtime.items.push(FallingItem {
            id,
            kind: ItemKind::Hazard,
            x: 700.0,
            size: 60.0,
            spawned_at_ms: 0.0,
            fall_duration_ms: 300.0,
            consumed: false,
        });
        game.stop();

        let early = game.snapshot(600.0);
        let late = game.snapshot(10_000.0);
        assert_eq!(early.now_ms, 500.0);
        assert_eq!(early.items, late.items);
        assert_eq!(early.texts, late.texts);

        // Same picture as the last real frame
        assert_eq!(early.items, last.items);
        assert_eq!(early.texts, last.texts);
        assert!(early.texts[0].scale > 1.0);
    }

    #[test]
    fn test_snapshot_follows_clock_while_running() {
        let mut game = Game::new(1, 30);
        let token = game.start(0.0);
        drop_item(&mut game, ItemKind::Collectible, 0.0);
        game.frame(token, 500.0);
        let a = game.snapshot(600.0);
        let b = game.snapshot(900.0);
        assert!(b.items[0].center.y > a.items[0].center.y);
    }

    #[test]
    fn test_expiry_finishes_once() {
        let mut game = Game::new(5, 30);
        let token = game.start(0.0);
        let mut now = 0.0;
        for _ in 0..120 {
            now += 16.0;
            game.frame(token, now);
        }
        assert!(!game.runtime.items.is_empty());

        game.countdown_tick(30_000.0);
        match game.frame(token, now + 16.0) {
            FrameStep::Finished(frame) => assert!(frame.items.is_empty()),
            other => panic!("expected Finished, got {other:?}"),
        }
        assert!(game.runtime.items.is_empty());
        assert_eq!(game.status(), SessionStatus::Ended);
        assert!(matches!(game.frame(token, now + 32.0), FrameStep::Cancelled));

        let ended: Vec<_> = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::SessionEnded { .. }))
            .collect();
        assert_eq!(ended.len(), 1);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = Game::new(42, 30);
        let mut b = Game::new(42, 30);
        let ta = a.start(0.0);
        let tb = b.start(0.0);
        for i in 1..400 {
            let now = i as f64 * 16.6;
            a.frame(ta, now);
            b.frame(tb, now);
        }
        let xs_a: Vec<_> = a.runtime.items.iter().map(|i| (i.id, i.x.to_bits())).collect();
        let xs_b: Vec<_> = b.runtime.items.iter().map(|i| (i.id, i.x.to_bits())).collect();
        assert_eq!(xs_a, xs_b);
        assert_eq!(a.seed(), 42);
    }
}
