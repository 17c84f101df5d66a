//! Transport controls over a fixed trace
//!
//! The player never touches the trace itself; it only owns an index into it,
//! a play flag and at most one pending timer. The event loop drives the timer
//! by calling [`Player::tick`] with the current instant.

use std::time::{Duration, Instant};

pub const MIN_SPEED_MS: u64 = 50;
pub const MAX_SPEED_MS: u64 = 2_000;
pub const DEFAULT_SPEED_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
}

/// The single pending auto-advance deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    due: Instant,
}

#[derive(Debug, Clone)]
pub struct Player {
    index: usize,
    len: usize,
    state: PlayState,
    speed: Duration,
    timer: Option<Timer>,
}

impl Player {
    /// Create a stopped player over a trace of `len` steps
    pub fn new(len: usize, speed_ms: u64) -> Self {
        Player {
            index: 0,
            len: len.max(1),
            state: PlayState::Stopped,
            speed: Duration::from_millis(clamp_speed(speed_ms)),
            timer: None,
        }
    }

    /// A new trace replaced the old one
    pub fn load(&mut self, len: usize) {
        self.len = len.max(1);
        self.index = 0;
        self.stop();
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// `len` is never below 1, so this is always false
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed.as_millis() as u64
    }

    pub fn is_at_start(&self) -> bool {
        self.index == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.index + 1 >= self.len
    }

    /// Pending deadline, if playing
    pub fn next_tick(&self) -> Option<Instant> {
        self.timer.map(|t| t.due)
    }

    /// Manual step forward. Stops playback; at the last index this is a no-op.
    pub fn step_forward(&mut self) -> bool {
        self.stop();
        self.advance()
    }

    /// Manual step back. Stops playback; at index 0 this is a no-op.
    pub fn step_back(&mut self) -> bool {
        self.stop();
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.stop();
        self.index = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.stop();
        self.index = self.len - 1;
    }

    /// Flip between playing and stopped. Starting from the last step
    /// rewinds to the first one.
    pub fn toggle_play(&mut self, now: Instant) {
        match self.state {
            PlayState::Playing => {
                tracing::debug!(index = self.index, "playback paused");
                self.stop();
            }
            PlayState::Stopped => {
                if self.is_at_end() {
                    self.index = 0;
                }
                self.state = PlayState::Playing;
                self.arm(now);
                tracing::debug!(index = self.index, speed_ms = self.speed_ms(), "playback started");
            }
        }
    }

    /// Change the interval; the pending deadline keeps its old value
    pub fn set_speed(&mut self, ms: u64) {
        self.speed = Duration::from_millis(clamp_speed(ms));
    }

    /// Fire the timer if it is due. Returns whether the index advanced.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(timer) = self.timer else {
            return false;
        };
        if now < timer.due {
            return false;
        }

        let advanced = self.advance();
        if self.is_at_end() {
            tracing::debug!(index = self.index, "playback complete");
            self.stop();
        } else {
            self.arm(now);
        }
        advanced
    }

    fn advance(&mut self) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Replace any pending timer with a fresh one
    fn arm(&mut self, now: Instant) {
        self.timer = Some(Timer {
            due: now + self.speed,
        });
    }

    fn stop(&mut self) {
        self.state = PlayState::Stopped;
        self.timer = None;
    }
}

fn clamp_speed(ms: u64) -> u64 {
    ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let mut player = Player::new(3, 100);
        assert!(!player.step_back());
        assert!(player.step_forward());
        assert!(player.step_forward());
        assert!(!player.step_forward());
        assert_eq!(player.index(), 2);
    }

    #[test]
    fn test_empty_trace_length_is_raised_to_one() {
        let mut player = Player::new(0, 100);
        assert_eq!(player.len(), 1);
        assert!(!player.is_empty());
        player.load(0);
        assert!(!player.is_empty());
        assert!(player.is_at_end());
    }

    #[test]
    fn test_tick_waits_for_deadline() {
        let start = Instant::now();
        let mut player = Player::new(5, 100);
        player.toggle_play(start);

        assert!(!player.tick(start + Duration::from_millis(99)));
        assert!(player.tick(start + Duration::from_millis(100)));
        assert_eq!(player.index(), 1);
        assert_eq!(
            player.next_tick(),
            Some(start + Duration::from_millis(200))
        );
    }

    #[test]
    fn test_manual_step_cancels_timer() {
        let start = Instant::now();
        let mut player = Player::new(5, 100);
        player.toggle_play(start);
        player.step_forward();

        assert!(!player.is_playing());
        assert_eq!(player.next_tick(), None);
        assert!(!player.tick(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_speed_applies_to_next_timer() {
        let start = Instant::now();
        let mut player = Player::new(5, 100);
        player.toggle_play(start);
        player.set_speed(1_000);

        let first = start + Duration::from_millis(100);
        assert!(player.tick(first));
        assert_eq!(player.next_tick(), Some(first + Duration::from_millis(1_000)));
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut player = Player::new(2, 1);
        assert_eq!(player.speed_ms(), MIN_SPEED_MS);
        player.set_speed(u64::MAX);
        assert_eq!(player.speed_ms(), MAX_SPEED_MS);
    }

    #[test]
    fn test_play_from_end_rewinds() {
        let mut player = Player::new(4, 100);
        player.jump_to_end();
        player.toggle_play(Instant::now());
        assert_eq!(player.index(), 0);
        assert!(player.is_playing());
    }
}
