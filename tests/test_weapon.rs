use halcyon::entities::Vec2;
use halcyon::platform::TextureHandle;
use halcyon::weapon::*;

fn textures() -> ProjectileTextures {
    let handle = |id| TextureHandle {
        id,
        width: 16,
        height: 48,
    };
    ProjectileTextures {
        laser: handle(1),
        laser_green: handle(2),
        laser_red: handle(3),
        plasma: TextureHandle {
            id: 4,
            width: 32,
            height: 32,
        },
    }
}

const UP_THE_SCREEN: Vec2 = Vec2::new(0.0, 1.0);
const ORIGIN: Vec2 = Vec2::new(240.0, 600.0);

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ── Firing ────────────────────────────────────────────────────────────────────

#[test]
fn fresh_weapon_fires_exact_volley() {
    let cases = [
        (WeaponKind::Laser, 1),
        (WeaponKind::DoubleLaser, 2),
        (WeaponKind::TripleLaser, 3),
        (WeaponKind::Plasma, 3),
    ];
    for (kind, count) in cases {
        let mut weapon = Weapon::new(kind);
        let volley = weapon.fire(PlayerId(1), ORIGIN, UP_THE_SCREEN, &textures());
        assert_eq!(volley.len(), count, "{kind:?}");
        assert!(approx(weapon.cooldown(), kind.fire_delay()), "{kind:?}");
    }
}

#[test]
fn fire_while_cooling_down_produces_nothing() {
    let mut weapon = Weapon::new(WeaponKind::Laser);
    weapon.fire(PlayerId(1), ORIGIN, UP_THE_SCREEN, &textures());
    weapon.update(0.05);
    assert!(!weapon.is_ready());
    assert!(weapon.fire(PlayerId(1), ORIGIN, UP_THE_SCREEN, &textures()).is_empty());
}

#[test]
fn fires_again_once_cooldown_reaches_zero() {
    let mut weapon = Weapon::new(WeaponKind::TripleLaser);
    weapon.fire(PlayerId(1), ORIGIN, UP_THE_SCREEN, &textures());
    weapon.update(0.5);
    assert_eq!(weapon.cooldown(), 0.0);
    let volley = weapon.fire(PlayerId(1), ORIGIN, UP_THE_SCREEN, &textures());
    assert_eq!(volley.len(), 3);
    assert!(approx(weapon.cooldown(), 0.17));
}

#[test]
fn double_laser_is_offset_sideways() {
    let mut weapon = Weapon::new(WeaponKind::DoubleLaser);
    let volley = weapon.fire(PlayerId(1), ORIGIN, UP_THE_SCREEN, &textures());
    let xs: Vec<f32> = volley.iter().map(|p| p.sprite.position.x).collect();
    assert!(approx(xs[0], 232.0));
    assert!(approx(xs[1], 248.0));
    assert!(volley.iter().all(|p| p.sprite.position.y == ORIGIN.y));
}

/// Angle of each shot away from straight up, in degrees.
fn volley_angles(kind: WeaponKind) -> Vec<f32> {
    let mut weapon = Weapon::new(kind);
    let mut volley = weapon.fire(PlayerId(1), ORIGIN, UP_THE_SCREEN, &textures());
    for shot in volley.iter_mut() {
        assert!(shot.sprite.velocity.y > 0.0);
        shot.update(1.0 / 30.0);
        assert!(shot.sprite.position.y < ORIGIN.y);
    }
    volley
        .iter()
        .map(|p| p.sprite.velocity.x.atan2(p.sprite.velocity.y).to_degrees())
        .collect()
}

fn assert_fan(angles: &[f32], spread: f32) {
    assert_eq!(angles.len(), 3);
    assert!(angles[0].abs() < 1e-3);
    assert!((angles[1].abs() - spread).abs() < 1e-3, "side shot at {}", angles[1]);
    assert!((angles[2].abs() - spread).abs() < 1e-3, "side shot at {}", angles[2]);
    assert!(angles[1].signum() != angles[2].signum());
}

#[test]
fn triple_laser_fans_two_and_a_half_degrees() {
    assert_fan(&volley_angles(WeaponKind::TripleLaser), 2.5);
}

#[test]
fn plasma_fans_three_and_a_half_degrees() {
    assert_fan(&volley_angles(WeaponKind::Plasma), 3.5);
}

#[test]
fn projectile_carries_owner_and_damage() {
    let mut laser = Weapon::new(WeaponKind::Laser);
    let shot = laser.fire(PlayerId(7), ORIGIN, UP_THE_SCREEN, &textures()).remove(0);
    assert_eq!(shot.owner, PlayerId(7));
    assert_eq!(shot.damage, LASER_DAMAGE);
    assert_eq!(shot.sprite.scale, PROJECTILE_SCALE);

    let mut plasma = Weapon::new(WeaponKind::Plasma);
    let shot = plasma.fire(PlayerId(7), ORIGIN, UP_THE_SCREEN, &textures()).remove(0);
    assert_eq!(shot.damage, PLASMA_DAMAGE);
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[test]
fn projectile_travels_up_fifteen_units_per_tick() {
    let mut shot = Projectile::new(WeaponKind::Laser, PlayerId(1), textures().laser, ORIGIN, UP_THE_SCREEN);
    shot.update(1.0 / 30.0);
    assert_eq!(shot.sprite.position, Vec2::new(240.0, 585.0));
    assert!(shot.active);
}

#[test]
fn projectile_goes_inactive_above_the_top() {
    let start = Vec2::new(100.0, -9.0);
    let mut shot = Projectile::new(WeaponKind::Laser, PlayerId(1), textures().laser, start, UP_THE_SCREEN);
    // Width 16 at scale 0.5: inactive once y < -8.
    shot.update(1.0 / 30.0);
    assert!(!shot.active);
}

#[test]
fn on_hit_asks_for_two_tinted_impacts() {
    let shot = Projectile::new(WeaponKind::DoubleLaser, PlayerId(1), textures().laser_green, ORIGIN, UP_THE_SCREEN);
    let impact = shot.on_hit();
    assert_eq!(impact.count, IMPACTS_PER_HIT);
    assert_eq!(impact.position, ORIGIN);
    assert_eq!(impact.tint, shot.impact_tint());
    assert!(shot.active);
}

// ── Kinds ─────────────────────────────────────────────────────────────────────

#[test]
fn weapon_for_score_thresholds() {
    assert_eq!(WeaponKind::for_score(0.0), WeaponKind::Laser);
    assert_eq!(WeaponKind::for_score(4199.0), WeaponKind::Laser);
    assert_eq!(WeaponKind::for_score(4200.0), WeaponKind::DoubleLaser);
    assert_eq!(WeaponKind::for_score(12000.0), WeaponKind::TripleLaser);
    assert_eq!(WeaponKind::for_score(30000.0), WeaponKind::Plasma);
}

#[test]
fn spread_is_mirrored_around_straight_up() {
    let [left, right] = spread_directions(Vec2::UP, 0.1);
    assert!(approx(left.x, -right.x));
    assert!(approx(left.y, right.y));
    assert!(approx(left.length(), 1.0));
}
