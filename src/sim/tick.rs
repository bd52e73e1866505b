//! Per-frame simulation step
//!
//! Advances the run by one rendered frame. Movement and projectile speeds are
//! per frame; timers use the elapsed milliseconds (`dt_ms`) or the game clock
//! (`now_ms`) depending on their style (see `timer`).

use glam::Vec2;

use super::collision::{attempt_move, bounce_move, circles_overlap, is_position_blocked};
use super::level::place_extraction_zone;
use super::phase::{GamePhase, Outcome, PhaseEvent};
use super::spawn::{create_explosion, make_bullet, make_turret, spawn_enemy, spawn_scrap};
use super::state::{BulletSource, Enemy, EnemyKind, Entity, ExtractionZone, GameEvent, GameState, ReloadState};
use super::timer::Deadline;
use crate::consts::*;
use crate::{angle_to, direction, distance};

/// Held input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire button held
    pub fire: bool,
    pub reload: bool,
    /// Deploy turret
    pub gadget: bool,
    /// Pause toggle (edge-triggered)
    pub pause: bool,
    /// Pointer position in playfield coordinates
    pub pointer: Vec2,
}

impl TickInput {
    /// Unit-length movement direction, or zero
    pub fn move_direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Advance the game state by one frame of `dt_ms` milliseconds at game-clock
/// time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32, now_ms: f64) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.apply_phase_event(PhaseEvent::Pause);
                return;
            }
            GamePhase::Paused => {
                state.apply_phase_event(PhaseEvent::Resume);
            }
            _ => {}
        }
    }

    // Menus, pause and report freeze the world
    if !state.is_simulating() {
        return;
    }

    let prev_time = state.run_time_ms;
    state.run_time_ms += dt_ms as f64;

    state.screen_shake *= SHAKE_DECAY;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    update_countdown(state, dt_ms);
    update_extraction(state, dt_ms);

    move_player(state, input);
    update_reload(state, input, now_ms);
    fire_weapon(state, input, now_ms);
    deploy_gadget(state, input, now_ms);

    update_turrets(state, dt_ms, now_ms);
    update_scrap(state);
    update_bullets(state);
    spawn_enemies(state, prev_time);
    update_enemies(state);
    update_particles(state, dt_ms);

    resolve_bullet_hits(state);

    state.purge_dead();

    if state.player.health <= 0.0 {
        state.end_run(Outcome::Lost);
    }
}

/// Count down to extraction; open the zone on expiry
fn update_countdown(state: &mut GameState, dt_ms: f32) {
    if !state.countdown.advance(dt_ms / 1000.0) {
        return;
    }
    state.apply_phase_event(PhaseEvent::CountdownExpired);

    let radius = state.tuning.extraction_radius;
    let pos = place_extraction_zone(&mut state.rng, state.bounds, radius, &state.obstacles);
    state.extraction = Some(ExtractionZone {
        pos,
        radius,
        progress: 0.0,
    });
    state.events.push(GameEvent::ExtractionOpened { pos });
    log::info!("Extraction zone open at ({:.0}, {:.0})", pos.x, pos.y);
}

/// Fill hold progress while inside the zone, drain at half rate outside
fn update_extraction(state: &mut GameState, dt_ms: f32) {
    let hold_secs = state.tuning.extraction_secs;
    let player_pos = state.player.body.pos;
    let Some(zone) = state.extraction.as_mut() else {
        return;
    };

    let dt_secs = dt_ms / 1000.0;
    let inside = distance(player_pos, zone.pos) < zone.radius;
    if inside {
        zone.progress += dt_secs;
    } else {
        zone.progress = (zone.progress - dt_secs / 2.0).max(0.0);
    }
    let held = zone.progress >= hold_secs;

    if inside {
        state.apply_phase_event(PhaseEvent::EnterZone);
        if held {
            state.end_run(Outcome::Won);
        }
    } else if state.phase == GamePhase::Extracting {
        state.apply_phase_event(PhaseEvent::LeaveZone);
    }
}

fn move_player(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;
    player.body.vel = input.move_direction() * player.speed;
    let delta = player.body.vel;
    attempt_move(&mut player.body, delta, state.bounds, &state.obstacles);
    // Aim follows the pointer, independent of movement
    player.body.rotation = angle_to(player.body.pos, input.pointer);
}

fn update_reload(state: &mut GameState, input: &TickInput, now_ms: f64) {
    let reload_ms = state.tuning.reload_ms;
    let player = &mut state.player;

    match player.reload {
        ReloadState::Reloading { started_ms } => {
            if Deadline::after(started_ms, reload_ms).has_passed(now_ms) {
                player.ammo = player.max_ammo;
                player.reload = ReloadState::Ready;
                state.events.push(GameEvent::ReloadFinished);
                log::debug!("Reload complete");
            }
        }
        ReloadState::Ready => {
            let manual = input.reload && player.ammo < player.max_ammo;
            if manual || player.ammo == 0 {
                player.reload = ReloadState::Reloading { started_ms: now_ms };
                state.events.push(GameEvent::ReloadStarted);
                log::debug!("Reloading ({} rounds left)", player.ammo);
            }
        }
    }
}

fn fire_weapon(state: &mut GameState, input: &TickInput, now_ms: f64) {
    let player = &state.player;
    if !input.fire || player.is_reloading() || player.ammo == 0 || !player.next_shot.has_passed(now_ms) {
        return;
    }

    let angle = player.body.rotation;
    let origin = player.body.pos + direction(angle) * MUZZLE_OFFSET;
    let damage = state.tuning.base_damage * player.damage_multiplier;
    let interval = player.fire_interval_ms;

    let id = state.next_entity_id();
    let bullet = make_bullet(id, origin, angle, state.tuning.bullet_speed, damage, BulletSource::Player);
    state.bullets.push(bullet);

    let player = &mut state.player;
    player.ammo -= 1;
    player.next_shot = Deadline::after(now_ms, interval);
    state.screen_shake += SHOT_SHAKE;
    state.events.push(GameEvent::PlayerShot);
}

fn deploy_gadget(state: &mut GameState, input: &TickInput, now_ms: f64) {
    let pos = state.player.body.pos;
    if !input.gadget
        || !state.player.turret_ready.has_passed(now_ms)
        || is_position_blocked(pos, TURRET_RADIUS, &state.obstacles)
    {
        return;
    }

    let id = state.next_entity_id();
    let turret = make_turret(id, pos, state.player.body.rotation, state.tuning.turret_lifespan_ms);
    state.turrets.push(turret);
    state.player.turret_ready = Deadline::after(now_ms, state.tuning.turret_cooldown_ms);
    state.events.push(GameEvent::TurretDeployed { pos });
    log::debug!("Turret deployed at ({:.0}, {:.0})", pos.x, pos.y);
}

/// Nearest enemy strictly within `range` of `pos`
fn nearest_enemy(enemies: &[Enemy], pos: Vec2, range: f32) -> Option<&Enemy> {
    let mut best = None;
    let mut best_dist = range;
    for enemy in enemies {
        let d = distance(pos, enemy.body.pos);
        if d < best_dist {
            best_dist = d;
            best = Some(enemy);
        }
    }
    best
}

fn update_turrets(state: &mut GameState, dt_ms: f32, now_ms: f64) {
    let range = state.tuning.turret_range;
    let interval = state.tuning.turret_fire_interval_ms;

    // Shots are spawned after the loop (entity IDs need the whole state)
    let mut shots: Vec<(Vec2, f32)> = Vec::new();

    for turret in &mut state.turrets {
        turret.life.advance(dt_ms);
        if turret.life.is_expired() {
            turret.kill();
        }

        let target = nearest_enemy(&state.enemies, turret.body.pos, range);
        turret.target = target.map(|e| e.body.id);
        if let Some(enemy) = target {
            turret.body.rotation = angle_to(turret.body.pos, enemy.body.pos);
            if turret.next_shot.has_passed(now_ms) {
                shots.push((turret.body.pos, turret.body.rotation));
                turret.next_shot = Deadline::after(now_ms, interval);
            }
        }
    }

    let damage = state.tuning.base_damage * TURRET_DAMAGE_FACTOR;
    for (origin, angle) in shots {
        let id = state.next_entity_id();
        let bullet = make_bullet(id, origin, angle, state.tuning.bullet_speed, damage, BulletSource::Turret);
        state.bullets.push(bullet);
        state.events.push(GameEvent::TurretShot);
    }
}

fn update_scrap(state: &mut GameState) {
    let player_pos = state.player.body.pos;
    let player_radius = state.player.body.radius;

    for scrap in &mut state.scrap {
        scrap.body.vel *= SCRAP_DAMPING;
        bounce_move(&mut scrap.body, SCRAP_BOUNCE, &state.obstacles);

        let d = distance(scrap.body.pos, player_pos);
        if d < scrap.attract_radius {
            scrap.body.pos += (player_pos - scrap.body.pos) * SCRAP_MAGNET;
        }
        if d < player_radius + scrap.body.radius {
            scrap.kill();
            state.session_currency += scrap.value;
            state.events.push(GameEvent::ScrapCollected { value: scrap.value });
        }
    }
}

fn update_bullets(state: &mut GameState) {
    let bounds = state.bounds;
    for bullet in &mut state.bullets {
        bullet.body.pos += bullet.body.vel;
        let p = bullet.body.pos;
        // Bullets ignore obstacles
        if p.x < 0.0 || p.x > bounds.x || p.y < 0.0 || p.y > bounds.y {
            bullet.kill();
        }
    }
}

/// Spawn interval (ms) at the given score
pub fn spawn_interval_ms(base_ms: f32, score: u64) -> f32 {
    (base_ms - score as f32 * SPAWN_INTERVAL_PER_SCORE_MS).max(MIN_SPAWN_INTERVAL_MS)
}

/// Number of interval boundaries crossed between `prev_ms` and `now_ms`
pub fn spawns_due(prev_ms: f64, now_ms: f64, interval_ms: f32) -> u32 {
    let interval = interval_ms as f64;
    let before = (prev_ms / interval).floor();
    let after = (now_ms / interval).floor();
    (after - before).max(0.0) as u32
}

fn spawn_enemies(state: &mut GameState, prev_time: f64) {
    let interval = spawn_interval_ms(state.tuning.spawn_interval_ms, state.score);
    for _ in 0..spawns_due(prev_time, state.run_time_ms, interval) {
        spawn_enemy(state);
    }
}

fn update_enemies(state: &mut GameState) {
    let player_pos = state.player.body.pos;
    let player_radius = state.player.body.radius;

    for i in 0..state.enemies.len() {
        let pos = state.enemies[i].body.pos;
        let radius = state.enemies[i].body.radius;

        // Beeline for the player; obstacles only block, they don't steer
        let angle = angle_to(pos, player_pos);
        let mut vel = direction(angle) * state.enemies[i].speed;

        // Soft separation from overlapping neighbours
        for (j, other) in state.enemies.iter().enumerate() {
            if i == j {
                continue;
            }
            if circles_overlap(pos, radius, other.body.pos, other.body.radius) {
                vel += direction(angle_to(other.body.pos, pos)) * SEPARATION_PUSH;
            }
        }

        let enemy = &mut state.enemies[i];
        enemy.body.rotation = angle;
        enemy.body.vel = vel;
        attempt_move(&mut enemy.body, vel, state.bounds, &state.obstacles);

        // Continuous contact drain
        if circles_overlap(enemy.body.pos, enemy.body.radius, player_pos, player_radius) {
            state.player.apply_damage(CONTACT_DAMAGE);
            state.screen_shake += CONTACT_SHAKE;
        }
    }
}

fn update_particles(state: &mut GameState, dt_ms: f32) {
    for p in &mut state.particles {
        p.body.pos += p.body.vel;
        p.life -= dt_ms / (p.max_life * 1000.0);
        if let Some(spin) = p.spin {
            p.body.rotation += spin;
        }
        if p.life <= 0.0 {
            p.kill();
        }
    }
}

fn resolve_bullet_hits(state: &mut GameState) {
    let mut impacts: Vec<Vec2> = Vec::new();
    let mut kills: Vec<(Vec2, EnemyKind)> = Vec::new();

    for bullet in &mut state.bullets {
        if bullet.body.dead {
            continue;
        }
        for enemy in &mut state.enemies {
            if enemy.body.dead {
                continue;
            }
            if !circles_overlap(bullet.body.pos, bullet.body.radius, enemy.body.pos, enemy.body.radius) {
                continue;
            }

            enemy.health -= bullet.damage;
            bullet.kill();
            impacts.push(bullet.body.pos);
            if enemy.health <= 0.0 {
                enemy.kill();
                kills.push((enemy.body.pos, enemy.kind));
            }
            // Single use
            break;
        }
    }

    for pos in impacts {
        create_explosion(state, pos, IMPACT_INTENSITY);
    }
    for (pos, kind) in kills {
        state.score += kind.score();
        create_explosion(state, pos, kind.explosion());
        spawn_scrap(state, pos, kind.scrap_drop());
        state.events.push(GameEvent::EnemyKilled { kind });
        log::debug!("{:?} destroyed, score {}", kind, state.score);
    }
}
