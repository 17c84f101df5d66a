// Property tests for the playback state machine

use algonote::player::{PlayState, Player, MAX_SPEED_MS, MIN_SPEED_MS};
use proptest::prelude::*;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
enum Action {
    Forward,
    Back,
    Reset,
    End,
    Toggle,
    Tick(u64),
    Speed(u64),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Forward),
        Just(Action::Back),
        Just(Action::Reset),
        Just(Action::End),
        Just(Action::Toggle),
        (0u64..3_000).prop_map(Action::Tick),
        (0u64..5_000).prop_map(Action::Speed),
    ]
}

fn apply(player: &mut Player, action: Action, clock: &mut Instant) {
    match action {
        Action::Forward => {
            player.step_forward();
        }
        Action::Back => {
            player.step_back();
        }
        Action::Reset => player.reset(),
        Action::End => player.jump_to_end(),
        Action::Toggle => player.toggle_play(*clock),
        Action::Tick(ms) => {
            *clock += Duration::from_millis(ms);
            player.tick(*clock);
        }
        Action::Speed(ms) => player.set_speed(ms),
    }
}

proptest! {
    #[test]
    fn index_stays_in_bounds(len in 1usize..40, actions in prop::collection::vec(action(), 0..200)) {
        let mut player = Player::new(len, 100);
        let mut clock = Instant::now();
        for action in actions {
            apply(&mut player, action, &mut clock);
            prop_assert!(player.index() < len);
            prop_assert!(player.speed_ms() >= MIN_SPEED_MS && player.speed_ms() <= MAX_SPEED_MS);
            // a timer is pending exactly while playing
            prop_assert_eq!(player.next_tick().is_some(), player.is_playing());
        }
    }

    #[test]
    fn playback_reaches_the_end_and_stops(len in 1usize..60, speed in 50u64..2_000) {
        let mut player = Player::new(len, speed);
        let mut clock = Instant::now();
        player.toggle_play(clock);

        let mut advances = 0;
        while player.is_playing() {
            clock += Duration::from_millis(speed);
            if player.tick(clock) {
                advances += 1;
            }
            prop_assert!(advances < len);
        }

        prop_assert_eq!(advances, len - 1);
        prop_assert_eq!(player.index(), len - 1);
        prop_assert_eq!(player.state(), PlayState::Stopped);
        prop_assert!(player.next_tick().is_none());
    }

    #[test]
    fn reset_is_idempotent(len in 1usize..40, actions in prop::collection::vec(action(), 0..50)) {
        let mut player = Player::new(len, 100);
        let mut clock = Instant::now();
        for action in actions {
            apply(&mut player, action, &mut clock);
        }

        player.reset();
        let once = (player.index(), player.state(), player.next_tick());
        player.reset();
        prop_assert_eq!((player.index(), player.state(), player.next_tick()), once);
        prop_assert_eq!(player.index(), 0);
        prop_assert_eq!(player.state(), PlayState::Stopped);
    }
}

#[test]
fn test_tick_before_deadline_does_nothing() {
    let mut player = Player::new(5, 500);
    let start = Instant::now();
    player.toggle_play(start);
    assert!(!player.tick(start + Duration::from_millis(499)));
    assert_eq!(player.index(), 0);
    assert!(player.tick(start + Duration::from_millis(500)));
    assert_eq!(player.index(), 1);
}

#[test]
fn test_one_advance_per_tick_even_when_late() {
    let mut player = Player::new(10, 100);
    let start = Instant::now();
    player.toggle_play(start);
    assert!(player.tick(start + Duration::from_secs(5)));
    assert_eq!(player.index(), 1);
}

#[test]
fn test_pause_clears_timer() {
    let mut player = Player::new(10, 100);
    let start = Instant::now();
    player.toggle_play(start);
    player.toggle_play(start);
    assert!(!player.is_playing());
    assert!(player.next_tick().is_none());
    assert!(!player.tick(start + Duration::from_secs(1)));
}
