//! Fixed-timestep simulation tick
//!
//! One call advances the world by one step in a fixed order: mode toggles,
//! player movement, enemies, the player's bullet, enemy contact, the leap
//! trigger, the flag overlay and finally the camera.

use glam::IVec2;

use super::actor::{ContactTrigger, PlayerContact};
use super::clock::oscillation_descending;
use super::collision::{StopOnContact, resolve_axis};
use super::enemy::{EnemyContext, ShotEvent};
use super::geom::{Axis, Rect};
use super::layout::LayoutVariant;
use super::projectile::{Bullet, BulletHit, BulletOwner, DespawnReason, advance, fire};
use super::state::{ExitReason, GameEvent, GameState, SessionPhase};

/// Input commands for a single tick (deterministic)
///
/// Movement fields are held-key state; the rest are edge-triggered presses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    /// Pause toggle
    pub pause: bool,
    pub god_mode: bool,
    pub invisible: bool,
    /// Leave to the menu
    pub menu_escape: bool,
    pub gravity_shift: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match state.session.phase {
        SessionPhase::Exited => return events,
        SessionPhase::Finished => {
            // Only way out of the finish popup
            if input.menu_escape {
                exit_to_menu(state, ExitReason::Escape, &mut events);
            }
            return events;
        }
        SessionPhase::Running | SessionPhase::Paused => {}
    }

    apply_toggles(state, input, &mut events);

    // Don't tick if paused or torn down
    if !state.session.running() {
        return events;
    }

    state.time_ticks += 1;

    move_player(state, input, &mut events);
    if state.session.is_over() {
        return events;
    }

    update_enemies(state, &mut events);
    if state.session.is_over() {
        return events;
    }

    update_player_bullet(state, input.shoot, &mut events);

    check_enemy_contact(state, &mut events);
    if state.session.is_over() {
        return events;
    }

    check_leap_trigger(state, &mut events);
    check_flag(state, &mut events);

    update_camera(state);

    events
}

fn update_camera(state: &mut GameState) {
    if let Some(offset) = state.camera_offset_for(state.player.rect.x) {
        state.layout_offset = offset;
    }
}

fn apply_toggles(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    let session = &mut state.session;

    if input.pause {
        match session.phase {
            SessionPhase::Running => {
                session.phase = SessionPhase::Paused;
                log::info!("Paused");
                events.push(GameEvent::Paused);
            }
            SessionPhase::Paused => {
                session.phase = SessionPhase::Running;
                log::info!("Resumed");
                events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    if input.god_mode {
        session.god_mode = !session.god_mode;
        log::debug!("God mode {}", if session.god_mode { "on" } else { "off" });
        events.push(GameEvent::GodModeToggled(session.god_mode));
    }

    if input.invisible {
        session.invisible = !session.invisible;
        log::debug!("Invisibility {}", if session.invisible { "on" } else { "off" });
        events.push(GameEvent::InvisibilityToggled(session.invisible));
    }

    if input.gravity_shift && state.player.can_gravity_shift {
        session.gravity_down = !session.gravity_down;
        state.player.can_gravity_shift = false;
        log::debug!("Gravity {}", if session.gravity_down { "down" } else { "up" });
        events.push(GameEvent::GravityShifted {
            gravity_down: session.gravity_down,
        });
    }

    if input.menu_escape {
        exit_to_menu(state, ExitReason::Escape, events);
    }
}

fn move_player(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    let tuning = &state.tuning;
    let gravity_down = state.session.gravity_down;
    let margin = tuning.edge_margin;
    let player = &mut state.player;

    if input.up && player.rect.y >= margin {
        player.jump(tuning.jump_impulse, gravity_down);
    }

    // Walls only stop the player while visible and with gravity down
    let walls = if state.session.invisible || !gravity_down {
        &[][..]
    } else {
        state.layout.blocks()
    };

    if input.left && player.rect.x >= margin {
        resolve_axis(&mut player.rect, Axis::X, -tuning.run_speed, walls, &mut StopOnContact);
        player.facing_right = false;
    }
    if input.right && player.rect.right() <= state.level_width - margin {
        resolve_axis(&mut player.rect, Axis::X, tuning.run_speed, walls, &mut StopOnContact);
        player.facing_right = true;
    }

    player.apply_gravity(tuning.gravity_step, tuning.max_fall_speed, gravity_down);

    let mut contact = PlayerContact::new(gravity_down);
    resolve_axis(
        &mut player.rect,
        Axis::Y,
        player.velocity.y,
        state.layout.blocks(),
        &mut contact,
    );
    if contact.halted {
        player.can_jump = true;
        player.can_gravity_shift = true;
    }

    // Checkpoints record the scroll for where the player is now
    update_camera(state);

    for trigger in contact.triggers {
        match trigger {
            ContactTrigger::Death => kill_player(state, events),
            ContactTrigger::Checkpoint { position } => save_checkpoint(state, position, events),
            ContactTrigger::Finish => finish(state, events),
        }
        if state.session.is_over() {
            return;
        }
    }

    let rect = state.player.rect;
    if rect.top() > state.level_height || rect.bottom() < 0 {
        log::debug!("Player left the level at y={}", rect.y);
        kill_player(state, events);
    }
}

fn update_enemies(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let ctx = EnemyContext {
        tuning: &state.tuning,
        blocks: state.layout.blocks(),
        player: state.player.rect,
        now: state.time_ticks,
        descending: oscillation_descending(state.time_ticks, state.tuning.oscillate_period_ticks()),
    };
    let boss_active = state.session.leap_triggered && !state.session.boss_dead;

    let mut player_hit = false;
    for enemy in state.enemies.iter_mut() {
        if enemy.boss && !boss_active {
            continue;
        }
        let Some(shot) = enemy.update(&ctx) else {
            continue;
        };
        let owner = BulletOwner::Enemy(enemy.id);
        match shot {
            ShotEvent::Fired => {
                log::debug!("Enemy {} fired", enemy.id.0);
                events.push(GameEvent::BulletFired { owner });
            }
            ShotEvent::Despawned { bullet, reason } => {
                events.push(despawned(&bullet, reason));
            }
            ShotEvent::HitPlayer { bullet } => {
                log::debug!("Enemy {} hit the player", enemy.id.0);
                events.push(despawned(&bullet, DespawnReason::Collision));
                player_hit = true;
            }
        }
    }

    if player_hit {
        kill_player(state, events);
    }
}

fn update_player_bullet(state: &mut GameState, shoot: bool, events: &mut Vec<GameEvent>) {
    let now = state.time_ticks;
    let tuning = &state.tuning;
    let player = &mut state.player;

    if player
        .bullet
        .as_ref()
        .is_some_and(|b| b.expired(now, tuning.player_bullet_timeout_ticks()))
    {
        if let Some(bullet) = player.bullet.take() {
            events.push(despawned(&bullet, DespawnReason::Timeout));
        }
    }

    if shoot {
        let direction = if player.facing_right { 1 } else { -1 };
        let origin = player.rect.position();
        let fired = fire(&mut player.bullet, || {
            Bullet::spawn(
                BulletOwner::Player,
                origin,
                IVec2::new(direction * tuning.bullet_speed, 0),
                tuning.bullet_size,
                now,
            )
        });
        if fired {
            log::debug!("Player fired {}", if direction > 0 { "right" } else { "left" });
            events.push(GameEvent::BulletFired {
                owner: BulletOwner::Player,
            });
        }
    }

    let Some(bullet) = player.bullet.as_mut() else {
        return;
    };
    let targets: Vec<Rect> = state.enemies.iter().map(|e| e.rect).collect();
    let velocity = bullet.velocity;
    let hit = advance(
        bullet,
        velocity,
        state.layout.blocks(),
        state.session.gravity_down,
        &targets,
    );

    match hit {
        None => {}
        Some(BulletHit::Block(_)) => {
            if let Some(bullet) = player.bullet.take() {
                events.push(despawned(&bullet, DespawnReason::Collision));
            }
        }
        Some(BulletHit::Target(idx)) => {
            if let Some(bullet) = player.bullet.take() {
                events.push(despawned(&bullet, DespawnReason::Collision));
            }
            hit_enemy(state, idx, events);
        }
    }
}

fn hit_enemy(state: &mut GameState, idx: usize, events: &mut Vec<GameEvent>) {
    let Some(enemy) = state.enemies.get_mut(idx) else {
        return;
    };
    let killed = enemy.take_hit();
    events.push(GameEvent::EnemyHit {
        id: enemy.id,
        lives_left: enemy.lives,
    });
    if !killed {
        return;
    }

    let mut enemy = state.enemies.remove(idx);
    if let Some(bullet) = enemy.take_bullet() {
        events.push(despawned(&bullet, DespawnReason::OwnerRemoved));
    }
    if enemy.boss {
        state.session.boss_dead = true;
        log::info!("Boss defeated");
    } else {
        log::info!("Enemy {} defeated", enemy.id.0);
    }
    events.push(GameEvent::EnemyKilled {
        id: enemy.id,
        visual: enemy.visual,
        boss: enemy.boss,
    });
}

fn check_enemy_contact(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player = state.player.rect;
    if state.enemies.iter().any(|e| e.rect.overlaps(&player)) {
        kill_player(state, events);
    }
}

fn check_leap_trigger(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if !state.session.leap_triggered && state.player.rect.x > state.tuning.leap_trigger_x {
        state.session.leap_triggered = true;
        swap_layout(state, LayoutVariant::Leap, events);
    }
}

fn check_flag(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.session.boss_dead && !state.session.flag_loaded {
        state.session.flag_loaded = true;
        swap_layout(state, LayoutVariant::Flag, events);
    }
}

fn swap_layout(state: &mut GameState, to: LayoutVariant, events: &mut Vec<GameEvent>) {
    let from = state.layout.variant;
    state.layout.swap(&state.level, to);
    events.push(GameEvent::LayoutSwapped { from, to });
}

/// Death handling: revert the leap overlay, respawn at the checkpoint, lose a life
fn kill_player(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.session.god_mode || !state.claim_death() {
        return;
    }

    if state.layout.variant == LayoutVariant::Leap {
        swap_layout(state, LayoutVariant::Base, events);
    }

    let session = &mut state.session;
    state.player.respawn_at(session.checkpoint_position);
    state.layout_offset = session.checkpoint_layout_offset;
    session.gravity_down = true;
    session.lives = session.lives.saturating_sub(1);
    log::info!("Player died, {} lives left", session.lives);
    events.push(GameEvent::PlayerDied {
        lives_left: session.lives,
    });

    if session.lives == 0 {
        exit_to_menu(state, ExitReason::OutOfLives, events);
    }
}

fn save_checkpoint(state: &mut GameState, position: IVec2, events: &mut Vec<GameEvent>) {
    let session = &mut state.session;
    if session.checkpoint_position == position && session.checkpoint_layout_offset == state.layout_offset {
        return;
    }
    session.checkpoint_position = position;
    session.checkpoint_layout_offset = state.layout_offset;
    log::info!("Checkpoint saved at ({}, {})", position.x, position.y);
    events.push(GameEvent::CheckpointSaved {
        position,
        layout_offset: state.layout_offset,
    });
}

fn finish(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.session.phase = SessionPhase::Finished;
    log::info!("Level finished after {} ticks", state.time_ticks);
    events.push(GameEvent::LevelFinished);
}

/// Tear the session down; the overlays revert to base
fn exit_to_menu(state: &mut GameState, reason: ExitReason, events: &mut Vec<GameEvent>) {
    if state.layout.variant != LayoutVariant::Base {
        swap_layout(state, LayoutVariant::Base, events);
    }
    state.session.phase = SessionPhase::Exited;
    log::info!("Returning to menu ({reason:?})");
    events.push(GameEvent::ReturnToMenu { reason });
}

fn despawned(bullet: &Bullet, reason: DespawnReason) -> GameEvent {
    log::debug!("Bullet from {:?} despawned ({reason:?})", bullet.owner);
    GameEvent::BulletDespawned {
        owner: bullet.owner,
        visual: bullet.visual,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{BehaviorSpec, EnemySpawn, Tuning};
    use crate::sim::enemy::EnemyId;
    use crate::sim::layout::LevelData;
    use proptest::prelude::*;

    const OPEN: &str = "0000000000";

    fn rows(floor: &str) -> Vec<String> {
        vec![OPEN.into(), OPEN.into(), OPEN.into(), floor.into()]
    }

    /// A 10x4 cell world whose player stands on row 3 at x=100
    fn world(base: Vec<String>, leap: Vec<String>, enemies: Vec<EnemySpawn>) -> GameState {
        let tuning = Tuning {
            player_start: IVec2::new(100, 139),
            enemies,
            ..Tuning::default()
        };
        let level = LevelData {
            flag: leap.clone(),
            base,
            leap,
        };
        GameState::new(tuning, level)
    }

    fn flat(floor: &str) -> GameState {
        world(rows(floor), rows(floor), Vec::new())
    }

    fn run(state: &mut GameState, input: &TickInput, ticks: usize) -> Vec<GameEvent> {
        (0..ticks).flat_map(|_| tick(state, input)).collect()
    }

    fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    fn aimer(x: i32, lives: u32, boss: bool) -> EnemySpawn {
        EnemySpawn {
            position: IVec2::new(x, 100),
            size: IVec2::new(100, 100),
            lives,
            // Too lazy to ever move its bullet
            behavior: BehaviorSpec::Aim { easiness: Some(1000) },
            boss,
        }
    }

    #[test]
    fn test_player_falls_and_lands() {
        let mut state = flat("1111111111");
        state.player.rect.y = 0;
        state.player.can_jump = false;
        run(&mut state, &TickInput::default(), 40);
        assert_eq!(state.player.rect.bottom(), 179);
        assert!(state.player.can_jump);
        assert_eq!(state.session.lives, 3);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let mut state = flat("1111111111");
        run(&mut state, &TickInput::default(), 5);
        let up = TickInput {
            up: true,
            ..Default::default()
        };
        tick(&mut state, &up);
        assert!(state.player.rect.bottom() < 179);
        assert!(state.player.velocity.y < 0);
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut state = flat("1111111111");
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let events = tick(&mut state, &pause);
        assert_eq!(events, vec![GameEvent::Paused]);
        assert_eq!(state.session.phase, SessionPhase::Paused);

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        let before = state.player.rect;
        run(&mut state, &right, 10);
        assert_eq!(state.player.rect, before);
        assert_eq!(state.time_ticks, 0);

        // Toggles still apply while paused
        let god = TickInput {
            god_mode: true,
            ..Default::default()
        };
        tick(&mut state, &god);
        assert!(state.session.god_mode);

        assert_eq!(tick(&mut state, &pause), vec![GameEvent::Resumed]);
        tick(&mut state, &right);
        assert_eq!(state.player.rect.x, before.x + 5);
    }

    #[test]
    fn test_wall_stops_player() {
        let mut base = rows("1111111111");
        base[2] = "0001000000".into();
        let mut state = world(base.clone(), base, Vec::new());
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        run(&mut state, &right, 30);
        assert_eq!(state.player.rect.right(), 180);
        assert!(state.player.facing_right);
    }

    #[test]
    fn test_invisible_walks_through_walls() {
        let mut base = rows("1111111111");
        base[2] = "0001000000".into();
        let mut state = world(base.clone(), base, Vec::new());
        state.session.invisible = true;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        run(&mut state, &right, 30);
        assert!(state.player.rect.left() > 240);
        // Still standing on the floor
        assert_eq!(state.player.rect.bottom(), 179);
    }

    #[test]
    fn test_inverted_gravity_walks_through_walls() {
        let mut base = rows("1111111111");
        base[0] = "1111111111".into();
        base[1] = "0001000000".into();
        let mut state = world(base.clone(), base, Vec::new());
        state.session.gravity_down = false;
        state.player.rect.y = 61;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        run(&mut state, &right, 30);
        assert!(state.player.rect.left() > 240);
        // Still standing on the ceiling
        assert_eq!(state.player.rect.top(), 61);
    }

    #[test]
    fn test_ceiling_bump_rearms_jump() {
        let mut base = rows("1111111111");
        base[1] = "1111111111".into();
        let mut state = world(base.clone(), base, Vec::new());
        let up = TickInput {
            up: true,
            ..Default::default()
        };
        tick(&mut state, &up);
        assert_eq!(state.player.rect.top(), 120);
        assert!(state.player.can_jump);
        assert!(state.player.can_gravity_shift);
    }

    #[test]
    fn test_checkpoint_records_current_scroll() {
        let wide = || {
            let open = "0".repeat(40);
            vec![open.clone(), open.clone(), open, "c".repeat(40)]
        };
        let mut state = world(wide(), wide(), Vec::new());
        state.player.rect.x = 1000;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        // Settles onto the floor on the second tick, having walked 10 units
        let events = run(&mut state, &right, 2);
        assert_eq!(state.session.checkpoint_layout_offset, -370);
        assert!(events.contains(&GameEvent::CheckpointSaved {
            position: IVec2::new(1010, 139),
            layout_offset: -370
        }));
    }

    #[test]
    fn test_death_floor_drains_lives_then_exits_once() {
        let mut state = flat("xxxxxxxxxx");
        let events = run(&mut state, &TickInput::default(), 300);

        let deaths: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PlayerDied { lives_left } => Some(*lives_left),
                _ => None,
            })
            .collect();
        assert_eq!(deaths, vec![2, 1, 0]);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::ReturnToMenu { .. })), 1);
        assert_eq!(state.session.phase, SessionPhase::Exited);
        assert_eq!(state.session.lives, 0);
    }

    #[test]
    fn test_god_mode_prevents_death() {
        let mut state = flat("xxxxxxxxxx");
        state.session.god_mode = true;
        let events = run(&mut state, &TickInput::default(), 100);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::PlayerDied { .. })), 0);
        assert_eq!(state.session.lives, 3);
    }

    #[test]
    fn test_death_respawns_at_checkpoint_with_gravity_down() {
        let mut state = flat("1111111111");
        state.session.checkpoint_position = IVec2::new(300, 139);
        state.session.checkpoint_layout_offset = -42;
        state.session.gravity_down = false;
        state.player.velocity.y = -7;
        kill_player(&mut state, &mut Vec::new());
        assert_eq!(state.player.rect.position(), IVec2::new(300, 139));
        assert_eq!(state.player.velocity, IVec2::ZERO);
        assert_eq!(state.layout_offset, -42);
        assert!(state.session.gravity_down);
        assert_eq!(state.session.lives, 2);

        // A second death in the same tick is ignored
        kill_player(&mut state, &mut Vec::new());
        assert_eq!(state.session.lives, 2);
    }

    #[test]
    fn test_checkpoint_saves_once() {
        let mut state = flat("cccccccccc");
        state.player.rect.x = 250;
        let events = run(&mut state, &TickInput::default(), 30);
        assert_eq!(state.session.checkpoint_position, IVec2::new(250, 139));
        assert_eq!(count(&events, |e| matches!(e, GameEvent::CheckpointSaved { .. })), 1);
    }

    #[test]
    fn test_finish_block_ends_level() {
        let mut state = flat("!!!!!!!!!!");
        let events = run(&mut state, &TickInput::default(), 10);
        assert_eq!(count(&events, |e| *e == GameEvent::LevelFinished), 1);
        assert_eq!(state.session.phase, SessionPhase::Finished);

        // Frozen until the player leaves; pause does not resume it
        let ticks = state.time_ticks;
        run(&mut state, &TickInput::default(), 10);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        assert!(tick(&mut state, &pause).is_empty());
        assert_eq!(state.session.phase, SessionPhase::Finished);
        assert_eq!(state.time_ticks, ticks);

        let escape = TickInput {
            menu_escape: true,
            ..Default::default()
        };
        let events = tick(&mut state, &escape);
        assert!(events.contains(&GameEvent::ReturnToMenu {
            reason: ExitReason::Escape
        }));
        assert!(tick(&mut state, &escape).is_empty());
    }

    #[test]
    fn test_gravity_shift_needs_ground() {
        let mut state = flat("1111111111");
        let shift = TickInput {
            gravity_shift: true,
            ..Default::default()
        };
        let events = tick(&mut state, &shift);
        assert!(events.contains(&GameEvent::GravityShifted { gravity_down: false }));
        assert!(!state.player.can_gravity_shift);

        // No ceiling: the player rises out of the level and dies
        let mut died = false;
        for _ in 0..200 {
            let events = tick(&mut state, &shift);
            // Airborne: further presses do nothing
            assert!(!events.iter().any(|e| matches!(e, GameEvent::GravityShifted { .. })));
            if events.iter().any(|e| matches!(e, GameEvent::PlayerDied { .. })) {
                died = true;
                break;
            }
        }
        assert!(died);
        assert!(state.session.gravity_down);
        assert_eq!(state.session.lives, 2);
    }

    #[test]
    fn test_enemy_contact_kills() {
        let spawn = EnemySpawn {
            position: IVec2::new(110, 139),
            size: IVec2::new(30, 40),
            lives: 1,
            behavior: BehaviorSpec::Oscillate,
            boss: false,
        };
        let mut state = world(rows("1111111111"), rows("1111111111"), vec![spawn]);
        let events = tick(&mut state, &TickInput::default());
        assert!(events.contains(&GameEvent::PlayerDied { lives_left: 2 }));
    }

    #[test]
    fn test_enemy_killed_frees_its_slot() {
        let mut state = world(rows("1111111111"), rows("1111111111"), vec![aimer(300, 1, false)]);
        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        let events = run(&mut state, &shoot, 25);

        assert!(events.contains(&GameEvent::BulletFired {
            owner: BulletOwner::Enemy(EnemyId(0))
        }));
        assert!(events.contains(&GameEvent::EnemyHit {
            id: EnemyId(0),
            lives_left: 0
        }));
        assert_eq!(
            count(&events, |e| matches!(
                e,
                GameEvent::BulletDespawned {
                    owner: BulletOwner::Enemy(_),
                    reason: DespawnReason::OwnerRemoved,
                    ..
                }
            )),
            1
        );
        assert!(state.enemies.is_empty());
        assert!(state.bullet(BulletOwner::Enemy(EnemyId(0))).is_none());
    }

    #[test]
    fn test_leap_then_flag_once_each() {
        let mut leap = rows("1111111111");
        leap[0] = "0000000001".into();
        let mut state = world(rows("1111111111"), leap, vec![aimer(300, 1, true)]);
        state.tuning.leap_trigger_x = 50;
        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        let events = run(&mut state, &shoot, 200);

        let swaps: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::LayoutSwapped { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(
            swaps,
            vec![
                (LayoutVariant::Base, LayoutVariant::Leap),
                (LayoutVariant::Leap, LayoutVariant::Flag)
            ]
        );
        assert!(state.session.boss_dead);
        assert!(state.session.flag_loaded);
        assert!(events.iter().any(|e| matches!(e, GameEvent::EnemyKilled { boss: true, .. })));
    }

    #[test]
    fn test_boss_dormant_before_leap() {
        let mut state = world(rows("1111111111"), rows("1111111111"), vec![aimer(300, 5, true)]);
        state.tuning.leap_trigger_x = 10_000;
        let events = run(&mut state, &TickInput::default(), 20);
        assert!(events.is_empty());
        assert!(state.boss().and_then(|b| b.bullet()).is_none());
    }

    #[test]
    fn test_death_in_leap_reverts_and_stays_one_shot() {
        let mut state = world(rows("1111111111"), rows("xxxxxxxxxx"), Vec::new());
        state.tuning.leap_trigger_x = 50;
        let events = run(&mut state, &TickInput::default(), 100);

        let swaps: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::LayoutSwapped { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        assert_eq!(
            swaps,
            vec![
                (LayoutVariant::Base, LayoutVariant::Leap),
                (LayoutVariant::Leap, LayoutVariant::Base)
            ]
        );
        assert_eq!(state.layout.variant, LayoutVariant::Base);
        assert_eq!(state.session.lives, 2);
        assert!(state.session.leap_triggered);
    }

    #[test]
    fn test_player_bullet_times_out() {
        let mut state = flat("1111111111");
        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        tick(&mut state, &shoot);
        // Fly right through the open air above the floor, then stop on nothing
        state.player.bullet.as_mut().unwrap().velocity = IVec2::ZERO;
        let timeout = state.tuning.player_bullet_timeout_ticks() as usize;
        let events = run(&mut state, &TickInput::default(), timeout + 1);
        assert!(events.contains(&GameEvent::BulletDespawned {
            owner: BulletOwner::Player,
            visual: None,
            reason: DespawnReason::Timeout
        }));
        assert!(state.player.bullet.is_none());
    }

    #[test]
    fn test_player_bullet_blocked_only_with_gravity_down() {
        let mut base = rows("1111111111");
        base[2] = "0000100000".into();
        let mut state = world(base.clone(), base, Vec::new());
        let bullet = Bullet::spawn(BulletOwner::Player, IVec2::new(230, 139), IVec2::new(10, 0), 7, 0);

        state.player.bullet = Some(bullet.clone());
        let mut events = Vec::new();
        update_player_bullet(&mut state, false, &mut events);
        assert!(state.player.bullet.is_none());
        assert!(matches!(
            events[..],
            [GameEvent::BulletDespawned {
                reason: DespawnReason::Collision,
                ..
            }]
        ));

        state.session.gravity_down = false;
        state.player.bullet = Some(bullet);
        update_player_bullet(&mut state, false, &mut Vec::new());
        assert_eq!(state.player.bullet.map(|b| b.rect.x), Some(240));
    }

    #[test]
    fn test_camera_follows_player() {
        let mut state = GameState::default();
        state.player.rect.x = 1000;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.layout_offset, -(1000 - 640));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_lives_bookkeeping(inputs in prop::collection::vec(any::<u16>(), 1..300)) {
            let mut state = GameState::default();
            let mut lives = state.session.lives;
            let mut exits = 0;

            for bits in inputs {
                let input = TickInput {
                    up: bits & 1 != 0,
                    left: bits & 2 != 0,
                    right: bits & 4 != 0,
                    shoot: bits & 8 != 0,
                    pause: bits & 0x0f00 == 0x0100,
                    god_mode: bits & 0x0f00 == 0x0200,
                    invisible: bits & 0x0f00 == 0x0300,
                    menu_escape: false,
                    gravity_shift: bits & 0x0f00 == 0x0400,
                };
                for event in tick(&mut state, &input) {
                    match event {
                        GameEvent::PlayerDied { lives_left } => {
                            prop_assert_eq!(lives_left + 1, lives);
                            lives = lives_left;
                        }
                        GameEvent::ReturnToMenu { .. } => exits += 1,
                        _ => {}
                    }
                }
                prop_assert_eq!(state.session.lives, lives);
                prop_assert!(exits <= 1);
                if lives == 0 {
                    prop_assert_eq!(state.session.phase, SessionPhase::Exited);
                    prop_assert_eq!(exits, 1);
                }
            }
        }
    }
}
