mod common;

use common::*;
use halcyon::enemy::*;
use halcyon::entities::Vec2;
use halcyon::platform::Viewport;

fn loaded_spawner() -> EnemySpawner {
    let mut spawner = EnemySpawner::new(enemy_table());
    spawner.load_content(&mut catalog()).unwrap();
    spawner
}

// ── Table ─────────────────────────────────────────────────────────────────────

#[test]
fn builtin_table_has_nine_types() {
    let table = enemy_table();
    assert_eq!(table.types().len(), 9);
    assert_eq!(table.types()[0].health, 40.0);
    assert_eq!(table.experience_for("1"), Some(25.0));
    assert_eq!(table.experience_for("nope"), None);
}

#[test]
fn empty_or_malformed_table_is_an_error() {
    assert!(EnemyTable::from_json("[]").is_err());
    assert!(EnemyTable::from_json("{ not json").is_err());
}

#[test]
fn table_reads_exp_field() {
    let table = EnemyTable::from_json(r#"[{"health": 10, "exp": 3, "texture": "x"}]"#).unwrap();
    assert_eq!(table.types()[0].experience, 3.0);
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn seven_hundred_ms_spawns_one_batch_and_resets() {
    let mut spawner = loaded_spawner();
    let mut rng = seeded_rng();
    assert_eq!(spawner.spawn_time_ms, 700);
    assert_eq!(spawner.max_active, 8);

    spawner.update(0.7, Viewport::PORTRAIT, &mut rng);

    let spawned = spawner.enemies().len();
    assert!((2..=3).contains(&spawned), "spawned {spawned}");
    assert_eq!(spawner.active_count(), spawned);
    assert_eq!(spawner.elapsed_ms(), 0);
}

#[test]
fn below_spawn_time_nothing_spawns() {
    let mut spawner = loaded_spawner();
    spawner.update(0.5, Viewport::PORTRAIT, &mut seeded_rng());
    assert!(spawner.enemies().is_empty());
    assert_eq!(spawner.elapsed_ms(), 500);
}

#[test]
fn cap_blocks_batch_but_clock_still_resets() {
    let mut spawner = loaded_spawner();
    spawner.max_active = 0;
    spawner.update(0.7, Viewport::PORTRAIT, &mut seeded_rng());
    assert!(spawner.enemies().is_empty());
    assert_eq!(spawner.elapsed_ms(), 0);
}

#[test]
fn spawns_sit_just_above_the_playfield() {
    let mut spawner = loaded_spawner();
    spawner.update(0.7, Viewport::PORTRAIT, &mut seeded_rng());
    for enemy in spawner.enemies() {
        // Placed at 80 - 80 = 0, then moved one step down.
        assert_eq!(enemy.sprite.position.y, INITIAL_ENEMY_SPEED);
        assert!(enemy.sprite.position.x >= 40.0 && enemy.sprite.position.x < 400.0 + WEAVE_SPEED);
        assert_eq!(enemy.sprite.scale, ENEMY_SCALE);
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn enemy_bounces_off_side_margin() {
    let mut spawner = loaded_spawner();
    let mut enemy = enemy_at(40.0, 25.0, Vec2::new(10.0, 300.0));
    enemy.sprite.velocity = Vec2::new(WEAVE_SPEED, 6.0);
    spawner.insert(enemy);

    spawner.update(0.01, Viewport::PORTRAIT, &mut seeded_rng());

    let moved = &spawner.enemies()[0];
    assert_eq!(moved.sprite.velocity.x, -WEAVE_SPEED);
    assert_eq!(moved.sprite.position, Vec2::new(0.0, 306.0));
}

#[test]
fn enemy_below_the_screen_is_queued_not_removed() {
    let mut spawner = loaded_spawner();
    let mut enemy = enemy_at(40.0, 25.0, Vec2::new(240.0, 881.0));
    enemy.sprite.velocity = Vec2::new(0.0, 6.0);
    spawner.insert(enemy);
    assert_eq!(spawner.active_count(), 1);

    spawner.update(0.01, Viewport::PORTRAIT, &mut seeded_rng());

    assert_eq!(spawner.enemies().len(), 1);
    assert!(spawner.enemies().is_pending(0));
    assert_eq!(spawner.active_count(), 0);
    assert_eq!(spawner.apply_pending_removals(), 1);
    assert!(spawner.enemies().is_empty());
}

#[test]
fn queue_kill_counts_once() {
    let mut spawner = loaded_spawner();
    spawner.insert(enemy_at(40.0, 25.0, Vec2::new(100.0, 100.0)));
    spawner.insert(enemy_at(40.0, 25.0, Vec2::new(200.0, 100.0)));
    assert!(spawner.queue_kill(0));
    assert!(!spawner.queue_kill(0));
    assert_eq!(spawner.active_count(), 1);
    assert_eq!(spawner.queue_kill_all(), vec![1]);
    assert_eq!(spawner.active_count(), 0);
}

// ── Difficulty ramp ───────────────────────────────────────────────────────────

#[test]
fn ramp_steps_after_ten_seconds() {
    let mut spawner = loaded_spawner();
    spawner.ramp_difficulty(10.0, 0.0);
    assert_eq!(spawner.spawn_time_ms, 700);

    spawner.ramp_difficulty(0.5, 0.0);
    assert_eq!(spawner.spawn_time_ms, 675);
    assert!((spawner.enemy_speed - 6.1).abs() < 1e-5);
}

#[test]
fn ramp_stops_at_score_cap() {
    let mut spawner = loaded_spawner();
    spawner.ramp_difficulty(11.0, RAMP_SCORE_CAP);
    assert_eq!(spawner.spawn_time_ms, 700);
    assert_eq!(spawner.enemy_speed, INITIAL_ENEMY_SPEED);
}

#[test]
fn ramp_never_goes_below_floor() {
    let mut spawner = loaded_spawner();
    spawner.spawn_time_ms = 110;
    spawner.ramp_difficulty(11.0, 0.0);
    assert_eq!(spawner.spawn_time_ms, SPAWN_TIME_FLOOR_MS);
    spawner.ramp_difficulty(11.0, 0.0);
    assert_eq!(spawner.spawn_time_ms, SPAWN_TIME_FLOOR_MS);
}
