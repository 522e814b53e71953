mod common;

use std::path::PathBuf;

use common::*;
use halcyon::entities::Vec2;
use halcyon::game::Cue;
use halcyon::highscore::Highscores;
use halcyon::platform::{Gesture, GestureKind, InputFrame, Key, Viewport};
use halcyon::screen::*;
use halcyon::screens::{ScreenKind, ScreenTag};
use halcyon::settings::Settings;

fn tags(stack: &ScreenStack) -> Vec<ScreenTag> {
    stack.screens().iter().map(|s| s.kind.tag()).collect()
}

fn transition(stack: &ScreenStack, id: ScreenId) -> &Transition {
    &stack.get(id).unwrap().transition
}

// ── Transition ────────────────────────────────────────────────────────────────

#[test]
fn transition_comes_on_then_goes_active() {
    let mut t = Transition::new(0.5, 0.5, false);
    assert_eq!(t.state, ScreenState::TransitionOn);
    assert_eq!(t.position, 1.0);

    t.update(0.25, false, false);
    assert_eq!(t.state, ScreenState::TransitionOn);
    assert!((t.position - 0.5).abs() < 1e-6);

    t.update(0.3, false, false);
    assert_eq!(t.state, ScreenState::Active);
    assert_eq!(t.position, 0.0);
    assert!(t.is_active());
}

#[test]
fn zero_time_transition_is_immediate() {
    let mut t = Transition::new(0.0, 0.0, false);
    t.update(DT, false, false);
    assert_eq!(t.state, ScreenState::Active);
    t.update(DT, false, true);
    assert_eq!(t.state, ScreenState::Hidden);
}

#[test]
fn covered_screen_hides() {
    let mut t = Transition::new(0.5, 0.5, false);
    t.update(1.0, false, false);
    t.update(0.25, false, true);
    assert_eq!(t.state, ScreenState::TransitionOff);
    t.update(0.5, false, true);
    assert_eq!(t.state, ScreenState::Hidden);
    assert_eq!(t.position, 1.0);
}

#[test]
fn exiting_transition_reports_done() {
    let mut t = Transition::new(0.5, 0.5, false);
    t.update(1.0, false, false);
    t.is_exiting = true;
    assert!(!t.update(0.25, false, false));
    assert_eq!(t.state, ScreenState::TransitionOff);
    assert!(t.update(0.5, false, false));
}

#[test]
fn focus_elsewhere_is_not_active() {
    let mut t = Transition::new(0.5, 0.5, true);
    t.update(1.0, true, false);
    assert_eq!(t.state, ScreenState::Active);
    assert!(!t.is_active());
}

// ── Stack bookkeeping ─────────────────────────────────────────────────────────

#[test]
fn popup_does_not_cover_what_is_beneath() {
    let mut stack = stack();
    let menu = stack.add(ScreenKind::main_menu()).unwrap();
    stack.add(ScreenKind::paused()).unwrap();
    stack.initialize().unwrap();

    let mut input = ScriptedInput::default();
    tick(&mut stack, &mut input, 30);

    let beneath = transition(&stack, menu);
    assert!(!beneath.covered_by_other_screen);
    assert!(beneath.other_screen_has_focus);
    assert_eq!(beneath.state, ScreenState::Active);
}

#[test]
fn full_screen_covers_what_is_beneath() {
    let mut stack = stack();
    let lower = stack.add(ScreenKind::main_menu()).unwrap();
    stack.add(ScreenKind::main_menu()).unwrap();
    stack.initialize().unwrap();

    let mut input = ScriptedInput::default();
    tick(&mut stack, &mut input, 1);
    assert!(transition(&stack, lower).covered_by_other_screen);

    tick(&mut stack, &mut input, 30);
    assert_eq!(transition(&stack, lower).state, ScreenState::Hidden);
}

#[test]
fn background_is_never_covered() {
    let mut stack = stack();
    let background = stack.add(ScreenKind::background()).unwrap();
    stack.add(ScreenKind::main_menu()).unwrap();
    stack.initialize().unwrap();

    let mut input = ScriptedInput::default();
    tick(&mut stack, &mut input, 30);

    assert!(!transition(&stack, background).covered_by_other_screen);
    assert_eq!(transition(&stack, background).state, ScreenState::Active);
}

#[test]
fn input_is_polled_once_per_tick() {
    let mut stack = stack();
    stack.add(ScreenKind::background()).unwrap();
    stack.add(ScreenKind::main_menu()).unwrap();
    stack.initialize().unwrap();

    let mut input = ScriptedInput::default();
    tick(&mut stack, &mut input, 5);
    assert_eq!(input.polls, 5);
}

#[test]
#[should_panic(expected = "initialized once")]
fn initializing_twice_panics() {
    let mut stack = stack();
    stack.initialize().unwrap();
    let _ = stack.initialize();
}

#[test]
fn failed_load_does_not_push() {
    let services = Services::new(
        Box::new(EmptyAssets),
        Viewport::PORTRAIT,
        Settings::default(),
        Highscores::in_memory(None),
        enemy_table(),
        seeded_rng(),
    );
    let mut stack = ScreenStack::new(services);
    stack.initialize().unwrap();
    assert!(stack.add(ScreenKind::main_menu()).is_err());
    assert!(stack.is_empty());
}

#[test]
fn remove_is_immediate_and_exit_waits() {
    let mut stack = stack();
    let a = stack.add(ScreenKind::background()).unwrap();
    let b = stack.add(ScreenKind::main_menu()).unwrap();
    stack.initialize().unwrap();

    stack.remove(a);
    assert_eq!(tags(&stack), vec![ScreenTag::MainMenu]);

    stack.exit(b);
    assert_eq!(stack.len(), 1);
    let mut input = ScriptedInput::default();
    tick(&mut stack, &mut input, 20);
    assert!(stack.is_empty());
}

#[test]
fn hidden_screens_are_not_drawn() {
    let mut stack = stack();
    stack.add(ScreenKind::main_menu()).unwrap();
    stack.add(ScreenKind::background()).unwrap();
    stack.initialize().unwrap();

    let mut input = ScriptedInput::default();
    let mut renderer = RecordingRenderer::default();
    stack.draw(&mut renderer).unwrap();
    assert!(renderer.texts().contains(&"Play"));

    // The starfield covers the menu beneath it.
    tick(&mut stack, &mut input, 1);
    stack.draw(&mut renderer).unwrap();
    assert!(!renderer.texts().contains(&"Play"));
    assert!(renderer.sprite_count() > 0);
    assert_eq!(renderer.frames, 2);
}

// ── Menus ─────────────────────────────────────────────────────────────────────

#[test]
fn menu_selection_wraps() {
    let mut stack = stack();
    let id = stack.add(ScreenKind::main_menu()).unwrap();
    stack.initialize().unwrap();

    let mut input = ScriptedInput::default();
    input.press(Key::Up);
    tick(&mut stack, &mut input, 1);

    let menu = stack.get(id).unwrap().kind.menu().unwrap();
    assert_eq!(menu.selected, menu.entries.len() - 1);
}

#[test]
fn quit_entry_requests_quit() {
    let mut stack = stack();
    stack.add(ScreenKind::main_menu()).unwrap();
    stack.initialize().unwrap();

    // Up from the first entry wraps to Quit.
    let mut input = ScriptedInput::default();
    input.press(Key::Up);
    input.press(Key::Select);
    tick(&mut stack, &mut input, 2);
    assert!(stack.quit_requested());
}

#[test]
fn tapping_an_entry_selects_it() {
    let mut stack = stack();
    let id = stack.add(ScreenKind::main_menu()).unwrap();
    stack.initialize().unwrap();

    let viewport = stack.services().viewport;
    let quit_row = stack.get(id).unwrap().kind.menu().unwrap().entry_bounds(3, viewport);
    let mut input = ScriptedInput::default();
    input.push(InputFrame {
        gestures: vec![Gesture {
            kind: GestureKind::Tap,
            position: Vec2::new(240.0, (quit_row.y + quit_row.height / 2) as f32),
        }],
        ..InputFrame::default()
    });
    tick(&mut stack, &mut input, 1);
    assert!(stack.quit_requested());
}

#[test]
fn quit_key_is_seen_by_the_stack() {
    let mut stack = stack();
    stack.add(ScreenKind::background()).unwrap();
    stack.initialize().unwrap();

    let mut input = ScriptedInput::default();
    input.press(Key::Quit);
    tick(&mut stack, &mut input, 1);
    assert!(stack.quit_requested());
}

#[test]
fn sound_cues_follow_the_setting() {
    let mut services = services();
    services.settings.sound_fx = false;
    services.emit(Cue::Sound(Default::default()));
    services.emit(Cue::Vibrate { seconds: 1.0 });
    assert_eq!(services.take_cues(), vec![Cue::Vibrate { seconds: 1.0 }]);

    services.settings.vibrate = false;
    services.emit(Cue::Vibrate { seconds: 1.0 });
    assert!(services.take_cues().is_empty());
}

// ── Scores and options ────────────────────────────────────────────────────────

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("halcyon_{}_{name}", std::process::id()))
}

fn labels(stack: &ScreenStack) -> Vec<String> {
    let menu = stack.top().unwrap().kind.menu().unwrap();
    menu.entries.iter().map(|e| e.label.clone()).collect()
}

/// Main menu on a starfield, with the menu moved to `entry` and selected.
fn open_from_main_menu(services: Services, entry: usize) -> (ScreenStack, ScriptedInput) {
    let mut stack = ScreenStack::new(services);
    stack.add(ScreenKind::background()).unwrap();
    stack.add(ScreenKind::main_menu()).unwrap();
    stack.initialize().unwrap();

    let mut input = ScriptedInput::default();
    for _ in 0..entry {
        input.press(Key::Down);
    }
    input.press(Key::Select);
    tick(&mut stack, &mut input, entry + 1);
    (stack, input)
}

#[test]
fn scores_shows_the_stored_best() {
    let (stack, _) = open_from_main_menu(services_with(Highscores::in_memory(Some(4321))), 1);
    assert_eq!(
        tags(&stack),
        vec![ScreenTag::Background, ScreenTag::MainMenu, ScreenTag::Scores]
    );
    let menu = stack.top().unwrap().kind.menu().unwrap();
    assert_eq!(menu.lines, vec!["Best: 4321".to_string()]);
}

#[test]
fn scores_shows_a_placeholder_when_offline() {
    let (stack, _) = open_from_main_menu(services_with(Highscores::offline()), 1);
    let menu = stack.top().unwrap().kind.menu().unwrap();
    assert_eq!(menu.lines, vec!["Best: --".to_string()]);
}

#[test]
fn scores_covers_the_menu_and_back_returns_to_it() {
    let (mut stack, mut input) = open_from_main_menu(services(), 1);
    tick(&mut stack, &mut input, 30);
    assert_eq!(stack.screens()[1].transition.state, ScreenState::Hidden);

    input.press(Key::Back);
    tick(&mut stack, &mut input, 30);
    assert_eq!(tags(&stack), vec![ScreenTag::Background, ScreenTag::MainMenu]);
    assert_eq!(stack.screens()[1].transition.state, ScreenState::Active);
}

#[test]
fn options_toggle_and_save_settings() {
    let path = temp_file("options.ini");
    let mut services = services();
    services.settings = Settings::with_path(&path);

    let (mut stack, mut input) = open_from_main_menu(services, 2);
    assert_eq!(stack.top().map(|s| s.kind.tag()), Some(ScreenTag::Options));
    assert_eq!(labels(&stack)[0], "Music: On");

    // Music, then Sound Fx.
    input.press(Key::Select);
    input.press(Key::Down);
    input.press(Key::Select);
    tick(&mut stack, &mut input, 3);

    assert!(!stack.services().settings.music);
    assert!(!stack.services().settings.sound_fx);
    assert_eq!(labels(&stack)[0], "Music: Off");
    assert_eq!(labels(&stack)[1], "Sound Fx: Off");

    let saved = Settings::load_or_default(&path);
    let _ = std::fs::remove_file(&path);
    assert!(!saved.music);
    assert!(!saved.sound_fx);
    assert!(saved.vibrate);
}

#[test]
fn options_volume_steps_and_wraps() {
    let path = temp_file("volume.ini");
    let mut services = services();
    services.settings = Settings::with_path(&path);

    let (mut stack, mut input) = open_from_main_menu(services, 2);
    for _ in 0..3 {
        input.press(Key::Down);
    }
    input.press(Key::Select);
    tick(&mut stack, &mut input, 4);
    assert_eq!(stack.services().settings.music_volume, 0.0);
    assert_eq!(labels(&stack)[3], "Music Volume: 0%");

    input.press(Key::Select);
    tick(&mut stack, &mut input, 1);
    let _ = std::fs::remove_file(&path);
    assert!((stack.services().settings.music_volume - 0.1).abs() < 1e-6);
    assert_eq!(labels(&stack)[3], "Music Volume: 10%");
}

// ── Context switches ──────────────────────────────────────────────────────────

#[test]
fn play_goes_through_loading_to_the_game() {
    let mut stack = stack();
    stack.add(ScreenKind::background()).unwrap();
    stack.add(ScreenKind::main_menu()).unwrap();
    stack.initialize().unwrap();

    let mut input = ScriptedInput::default();
    input.press(Key::Select);
    tick(&mut stack, &mut input, 1);
    assert_eq!(stack.top().map(|s| s.kind.tag()), Some(ScreenTag::Loading));

    tick(&mut stack, &mut input, 40);
    assert_eq!(tags(&stack), vec![ScreenTag::Background, ScreenTag::Game]);
    assert!(stack.game_session().is_some());
}

#[test]
fn pause_and_resume() {
    let mut stack = stack();
    stack.add(ScreenKind::background()).unwrap();
    stack.add(ScreenKind::game()).unwrap();
    stack.initialize().unwrap();

    let mut input = ScriptedInput::default();
    input.press(Key::Back);
    tick(&mut stack, &mut input, 1);
    assert_eq!(stack.top().map(|s| s.kind.tag()), Some(ScreenTag::Paused));
    assert!(stack.game_session().unwrap().is_paused());

    let score = stack.game_session().unwrap().score();
    tick(&mut stack, &mut input, 10);
    assert_eq!(stack.game_session().unwrap().score(), score);

    input.press(Key::Select);
    tick(&mut stack, &mut input, 1);
    assert!(!stack.game_session().unwrap().is_paused());

    tick(&mut stack, &mut input, 20);
    assert_eq!(tags(&stack), vec![ScreenTag::Background, ScreenTag::Game]);
}

fn finish_game(highscores: Highscores) -> ScreenStack {
    let mut stack = ScreenStack::new(services_with(highscores));
    stack.add(ScreenKind::background()).unwrap();
    stack.add(ScreenKind::game()).unwrap();
    stack.initialize().unwrap();

    let mut input = ScriptedInput::default();
    tick(&mut stack, &mut input, 1);

    let session = stack.game_session_mut().unwrap();
    session.player_mut().set_lives(0);
    let at = session.player().position();
    session.spawner_mut().insert(enemy_at(40.0, 25.0, at));
    session.resolve_player_collisions();
    session.apply_removals();

    tick(&mut stack, &mut input, 60);
    stack
}

#[test]
fn out_of_lives_below_best_shows_game_over() {
    let stack = finish_game(Highscores::in_memory(Some(1_000_000)));
    assert_eq!(stack.top().map(|s| s.kind.tag()), Some(ScreenTag::GameOver));
    assert!(stack.game_session().unwrap().is_paused());
}

#[test]
fn out_of_lives_above_best_shows_new_high_score() {
    let stack = finish_game(Highscores::in_memory(Some(10)));
    assert_eq!(stack.top().map(|s| s.kind.tag()), Some(ScreenTag::NewHighScore));
}

#[test]
fn unreachable_store_never_offers_a_record() {
    let stack = finish_game(Highscores::offline());
    assert_eq!(stack.top().map(|s| s.kind.tag()), Some(ScreenTag::GameOver));
    let menu = stack.top().unwrap().kind.menu().unwrap();
    assert!(menu.lines.iter().any(|l| l == "Best: --"));
}

#[test]
fn saving_a_record_moves_on_to_game_over() {
    let mut stack = finish_game(Highscores::in_memory(None));
    assert_eq!(stack.top().map(|s| s.kind.tag()), Some(ScreenTag::NewHighScore));

    let mut input = ScriptedInput::default();
    input.press(Key::Select);
    tick(&mut stack, &mut input, 1);

    assert!(stack.services().highscores.best().is_some());
    assert_eq!(stack.top().map(|s| s.kind.tag()), Some(ScreenTag::GameOver));
}
