//! A play session: simulation plus its collaborators
//!
//! `Session` owns the `GameState`, forwards every tick's events to the
//! presenter, keeps visuals in step with the simulation and hands control to
//! the menu exactly once when the session ends.

use crate::error::ConfigError;
use crate::platform::{EntityDescriptor, EntityKind, InputSource, MenuExit, Presenter, StatusFlags};
use crate::settings::Tuning;
use crate::sim::{
    BulletOwner, ExitReason, FixedStep, GameEvent, GameState, LevelData, SessionPhase, TickInput,
    VisualHandle, tick,
};

/// Message shown when the finish block is reached
pub const FINISH_MESSAGE: &str = "Congratulations!";

pub struct Session<P: Presenter, M: MenuExit> {
    state: GameState,
    presenter: P,
    /// Taken when control returns to the menu
    menu: Option<M>,
    clock: FixedStep,
    block_visuals: Vec<VisualHandle>,
}

impl<P: Presenter, M: MenuExit> Session<P, M> {
    /// Validate configuration, build the world and realize it
    pub fn new(tuning: Tuning, level: LevelData, presenter: P, menu: M) -> Result<Self, ConfigError> {
        tuning.validate()?;
        level.validate()?;

        let state = GameState::new(tuning, level);
        log::info!(
            "Session started: {} blocks, {} enemies, {} lives, difficulty {}",
            state.layout.blocks().len(),
            state.enemies.len(),
            state.session.lives,
            state.tuning.difficulty.as_str()
        );

        let mut session = Self {
            state,
            presenter,
            menu: Some(menu),
            clock: FixedStep::new(),
            block_visuals: Vec::new(),
        };
        session.realize_world();
        Ok(session)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.session.phase
    }

    /// The session has been handed back to the menu
    pub fn is_exited(&self) -> bool {
        self.phase() == SessionPhase::Exited
    }

    /// Run one tick and present its outcome
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let events = tick(&mut self.state, input);
        for event in &events {
            self.apply(event);
        }
        if !self.is_exited() {
            self.sync_positions();
        }
        events
    }

    /// Feed frame time and run as many ticks as are due
    pub fn run_frame(&mut self, dt: f32, input: &mut impl InputSource) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..self.clock.advance(dt) {
            let tick_input = input.tick_input();
            events.extend(self.step(&tick_input));
        }
        events
    }

    fn realize_world(&mut self) {
        self.realize_blocks();

        let player = &mut self.state.player;
        player.visual = Some(self.presenter.realize(&EntityDescriptor {
            kind: EntityKind::Player,
            rect: player.rect,
        }));

        for enemy in &mut self.state.enemies {
            enemy.visual = Some(self.presenter.realize(&EntityDescriptor {
                kind: EntityKind::Enemy { boss: enemy.boss },
                rect: enemy.rect,
            }));
        }

        self.presenter.scroll_to(self.state.layout_offset);
        self.presenter.show_status(self.status());
    }

    fn realize_blocks(&mut self) {
        for handle in self.block_visuals.drain(..) {
            self.presenter.remove(handle);
        }
        for block in self.state.layout.blocks() {
            let handle = self.presenter.realize(&EntityDescriptor {
                kind: EntityKind::Block(block.kind),
                rect: block.rect,
            });
            self.block_visuals.push(handle);
        }
    }

    fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::LayoutSwapped { .. } => self.realize_blocks(),
            GameEvent::BulletFired { owner } => self.realize_bullet(*owner),
            GameEvent::BulletDespawned { visual, .. } | GameEvent::EnemyKilled { visual, .. } => {
                if let Some(handle) = visual {
                    self.presenter.remove(*handle);
                }
            }
            GameEvent::LevelFinished => self.presenter.show_popup(FINISH_MESSAGE),
            GameEvent::PlayerDied { .. }
            | GameEvent::Paused
            | GameEvent::Resumed
            | GameEvent::GodModeToggled(_)
            | GameEvent::InvisibilityToggled(_) => self.presenter.show_status(self.status()),
            GameEvent::ReturnToMenu { reason } => self.exit(*reason),
            GameEvent::EnemyHit { .. }
            | GameEvent::CheckpointSaved { .. }
            | GameEvent::GravityShifted { .. } => {}
        }
    }

    fn realize_bullet(&mut self, owner: BulletOwner) {
        // Already gone if it hit something on the tick it was fired
        let Some(bullet) = self.state.bullet_mut(owner) else {
            return;
        };
        bullet.visual = Some(self.presenter.realize(&EntityDescriptor {
            kind: EntityKind::Bullet { owner },
            rect: bullet.rect,
        }));
    }

    fn sync_positions(&mut self) {
        let state = &self.state;
        if let Some(handle) = state.player.visual {
            self.presenter.place(handle, state.player.rect.position());
        }
        for enemy in &state.enemies {
            if let Some(handle) = enemy.visual {
                self.presenter.place(handle, enemy.rect.position());
            }
        }
        for bullet in state.bullets() {
            if let Some(handle) = bullet.visual {
                self.presenter.place(handle, bullet.rect.position());
            }
        }
        self.presenter.scroll_to(state.layout_offset);
    }

    /// Discard every visual and hand control to the menu
    fn exit(&mut self, reason: ExitReason) {
        for handle in self.block_visuals.drain(..) {
            self.presenter.remove(handle);
        }
        let state = &mut self.state;
        let mut handles: Vec<VisualHandle> = state.player.visual.take().into_iter().collect();
        handles.extend(state.player.bullet.as_mut().and_then(|b| b.visual.take()));
        for enemy in &mut state.enemies {
            handles.extend(enemy.visual.take());
            handles.extend(enemy.bullet_mut().and_then(|b| b.visual.take()));
        }
        for handle in handles {
            self.presenter.remove(handle);
        }

        match self.menu.take() {
            Some(mut menu) => {
                log::info!("Handing control to the menu ({reason:?})");
                menu.return_to_menu(reason);
            }
            None => log::warn!("Menu already notified, ignoring {reason:?}"),
        }
    }

    fn status(&self) -> StatusFlags {
        let session = &self.state.session;
        StatusFlags {
            lives: session.lives,
            paused: session.phase == SessionPhase::Paused,
            god_mode: session.god_mode,
            invisible: session.invisible,
        }
    }
}
