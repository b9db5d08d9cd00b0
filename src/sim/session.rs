//! The game session: entity collections, score, lives and the phase machine.
//!
//! The session is the only writer of its collections. Entities report what
//! happened to them (a ship contact, a bolt hit or expiry) and the session
//! applies the consequences, keeping every asteroid and bolt listed both in
//! its own collection and in the draw order.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

use super::asteroid::{Asteroid, AsteroidTier, VARIANT_COUNT};
use super::laser::{BoltOutcome, LaserBolt};
use super::ship::{Ship, ShipHit};
use super::{Drawable, EntityId, FrameInput, Sprite, DT_SCALE, FIELD_SIZE, INITIAL_STEP};
use crate::scores::ScoreStore;

pub const STARTING_LIVES: i32 = 3;
/// Fewer live asteroids than this triggers a top-up.
const MIN_ASTEROIDS: usize = 3;
const MAX_TOP_UP: usize = 4;
const BACKDROP_ASTEROIDS: usize = 2;
/// Overlay pulse time added per frame.
const PULSE_STEP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Title,
    Playing,
    GameOver,
}

/// Entry in the draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityRef {
    Ship,
    Asteroid(EntityId),
    Bolt(EntityId),
}

pub struct GameSession<S> {
    bounds: Vec2,
    phase: GamePhase,
    score: u32,
    lives: i32,
    new_high_score: bool,
    simulation_step: f32,
    first_frame: bool,
    pulse_time: f32,
    ship: Ship,
    asteroids: Vec<Asteroid>,
    bolts: Vec<LaserBolt>,
    draw_order: Vec<EntityRef>,
    backdrop: Vec<Asteroid>,
    store: S,
    rng: StdRng,
    next_id: u64,
}

fn bump(counter: &mut u64) -> EntityId {
    *counter += 1;
    EntityId(*counter)
}

impl<S: ScoreStore> GameSession<S> {
    /// A session on the title screen over the standard field.
    pub fn new(store: S, rng: StdRng) -> Self {
        let mut session = Self {
            bounds: FIELD_SIZE,
            phase: GamePhase::Title,
            score: 0,
            lives: STARTING_LIVES,
            new_high_score: false,
            simulation_step: INITIAL_STEP,
            first_frame: true,
            pulse_time: 0.0,
            ship: Ship::new(FIELD_SIZE),
            asteroids: Vec::new(),
            bolts: Vec::new(),
            draw_order: vec![EntityRef::Ship],
            backdrop: Vec::new(),
            store,
            rng,
            next_id: 0,
        };
        session.roll_backdrop();
        session
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn high_score(&self) -> u32 {
        self.store.best()
    }

    /// Set when the last game ended above the previous best.
    pub fn new_high_score(&self) -> bool {
        self.new_high_score
    }

    #[cfg(test)]
    pub fn simulation_step(&self) -> f32 {
        self.simulation_step
    }

    /// Time driving the title and game-over text pulse.
    pub fn pulse_time(&self) -> f32 {
        self.pulse_time
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    #[cfg(test)]
    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    #[cfg(test)]
    pub fn bolts(&self) -> &[LaserBolt] {
        &self.bolts
    }

    /// What to draw this frame, in draw order.
    ///
    /// During play that is the ship followed by asteroids and bolts in the
    /// order they appeared; on the title and game-over screens it is the
    /// decorative backdrop.
    pub fn drawables(&self) -> Vec<Drawable> {
        if self.phase != GamePhase::Playing {
            return self.backdrop.iter().map(asteroid_drawable).collect();
        }
        self.draw_order
            .iter()
            .filter_map(|entry| match *entry {
                EntityRef::Ship => Some(Drawable::of(
                    Sprite::Ship {
                        flames: self.ship.flames(),
                    },
                    &self.ship.body,
                )),
                EntityRef::Asteroid(id) => self
                    .asteroids
                    .iter()
                    .find(|a| a.id == id)
                    .map(asteroid_drawable),
                EntityRef::Bolt(id) => self
                    .bolts
                    .iter()
                    .find(|b| b.id == id)
                    .map(|b| Drawable::of(Sprite::Laser, &b.body)),
            })
            .collect()
    }

    // ── Frame ──────────────────────────────────────────────────────────

    /// Advance one frame.
    pub fn tick(&mut self, input: &FrameInput) {
        match self.phase {
            GamePhase::Title | GamePhase::GameOver => {
                if input.start {
                    self.start();
                } else {
                    let dt = input.frame_secs * DT_SCALE;
                    for rock in &mut self.backdrop {
                        rock.tick(dt, self.bounds);
                    }
                    self.pulse_time += PULSE_STEP;
                }
            }
            GamePhase::Playing => self.play_frame(input),
        }
        debug_assert!(
            self.collections_in_lockstep(),
            "entity collections diverged from draw order"
        );
    }

    /// Reset everything for a new game and enter play.
    pub fn start(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.new_high_score = false;
        self.simulation_step = INITIAL_STEP;
        self.first_frame = true;
        self.asteroids.clear();
        self.bolts.clear();
        self.draw_order = vec![EntityRef::Ship];
        self.ship.reset_to_center();
        for _ in 0..MIN_ASTEROIDS {
            self.add_asteroid();
        }
        self.phase = GamePhase::Playing;
        log::info!("game started");
    }

    // input intents → ship → asteroids → bolts → top-up
    fn play_frame(&mut self, input: &FrameInput) {
        if self.first_frame {
            self.first_frame = false;
        } else {
            self.simulation_step = input.frame_secs;
        }
        let dt = self.simulation_step * DT_SCALE;

        if input.thrust {
            self.ship.set_thrust(true);
        }
        if input.turn_left {
            self.ship.turn_left();
        }
        if input.turn_right {
            self.ship.turn_right();
        }
        if input.fire {
            self.fire(input.now_ms);
        }

        if let Some(hit) = self.ship.tick(dt, self.bounds, &self.asteroids, &self.bolts) {
            if let ShipHit::Asteroid(id) = hit {
                self.destroy_asteroid(id, false);
            }
            // The rest of the frame is abandoned, as after any life loss.
            self.lose_life();
            return;
        }

        for rock in &mut self.asteroids {
            rock.tick(dt, self.bounds);
        }

        self.tick_bolts(dt, input.now_ms);
        self.top_up();
    }

    fn tick_bolts(&mut self, dt: f32, now_ms: u64) {
        let mut i = 0;
        while i < self.bolts.len() {
            let outcome = self.bolts[i].tick(dt, self.bounds, &self.asteroids, now_ms);
            let id = self.bolts[i].id;
            match outcome {
                BoltOutcome::Flying => i += 1,
                BoltOutcome::Hit(rock) => {
                    log::debug!("bolt {:?} hit asteroid {:?}", id, rock);
                    self.remove_bolt(id);
                    self.destroy_asteroid(rock, true);
                }
                BoltOutcome::Expired => self.remove_bolt(id),
            }
        }
    }

    fn top_up(&mut self) {
        if self.asteroids.len() >= MIN_ASTEROIDS {
            return;
        }
        // No upper cap: long sessions can accumulate rocks.
        let count = self.rng.gen_range(1..=MAX_TOP_UP);
        log::debug!("topping up field with {} asteroids", count);
        for _ in 0..count {
            self.add_asteroid();
        }
    }

    fn fire(&mut self, now_ms: u64) {
        let id = bump(&mut self.next_id);
        let bolt = LaserBolt::fire(id, &self.ship.body, now_ms);
        self.bolts.push(bolt);
        self.draw_order.push(EntityRef::Bolt(id));
    }

    fn lose_life(&mut self) {
        self.lives -= 1;
        log::debug!("life lost, {} left", self.lives);
        if self.lives < 0 {
            self.game_over();
            return;
        }
        let spent: Vec<EntityId> = self.bolts.iter().map(|b| b.id).collect();
        for id in spent {
            self.remove_bolt(id);
        }
        self.ship.reset_to_center();
    }

    #[cfg(test)]
    pub fn lose_last_life(&mut self) {
        self.lives = 0;
        self.lose_life();
    }

    fn game_over(&mut self) {
        let beat_best = self.score > self.store.best();
        self.new_high_score = match self.store.submit(self.score) {
            Ok(saved) => saved,
            Err(err) => {
                log::warn!("{}", err);
                beat_best
            }
        };
        self.phase = GamePhase::GameOver;
        self.roll_backdrop();
        log::info!(
            "game over with score {}{}",
            self.score,
            if self.new_high_score { " (new high score)" } else { "" }
        );
    }

    // ── Collection housekeeping ────────────────────────────────────────

    fn add_asteroid(&mut self) {
        let id = bump(&mut self.next_id);
        let variant = self.rng.gen_range(0..VARIANT_COUNT);
        let rock = Asteroid::spawn(&mut self.rng, id, AsteroidTier::Large, self.bounds, None, variant);
        self.push_asteroid(rock);
    }

    fn push_asteroid(&mut self, rock: Asteroid) {
        self.draw_order.push(EntityRef::Asteroid(rock.id));
        self.asteroids.push(rock);
    }

    /// Remove an asteroid, leave its fragments in its place, and credit the
    /// score when a laser did it.
    fn destroy_asteroid(&mut self, id: EntityId, scored_by_laser: bool) {
        let Some(idx) = self.asteroids.iter().position(|a| a.id == id) else {
            return;
        };
        let rock = self.asteroids.remove(idx);
        self.draw_order.retain(|e| *e != EntityRef::Asteroid(id));

        let next_id = &mut self.next_id;
        let fragments = rock.fragments(&mut self.rng, self.bounds, || bump(next_id));
        log::debug!(
            "asteroid {:?} (tier {}) destroyed, {} fragments",
            id,
            rock.tier.rank(),
            fragments.len()
        );
        for fragment in fragments {
            self.push_asteroid(fragment);
        }

        if scored_by_laser {
            self.score += rock.tier.points();
        }
    }

    fn remove_bolt(&mut self, id: EntityId) {
        self.bolts.retain(|b| b.id != id);
        self.draw_order.retain(|e| *e != EntityRef::Bolt(id));
    }

    fn roll_backdrop(&mut self) {
        self.pulse_time = 0.0;
        self.backdrop = (0..BACKDROP_ASTEROIDS)
            .map(|_| {
                let id = bump(&mut self.next_id);
                let variant = self.rng.gen_range(0..VARIANT_COUNT);
                Asteroid::spawn(&mut self.rng, id, AsteroidTier::Large, self.bounds, None, variant)
            })
            .collect();
    }

    /// Every asteroid and bolt appears exactly once in the draw order and
    /// nothing else does, besides the ship.
    fn collections_in_lockstep(&self) -> bool {
        let mut drawn_rocks = Vec::new();
        let mut drawn_bolts = Vec::new();
        let mut ships = 0;
        for entry in &self.draw_order {
            match *entry {
                EntityRef::Ship => ships += 1,
                EntityRef::Asteroid(id) => drawn_rocks.push(id),
                EntityRef::Bolt(id) => drawn_bolts.push(id),
            }
        }
        let mut rocks: Vec<EntityId> = self.asteroids.iter().map(|a| a.id).collect();
        let mut bolts: Vec<EntityId> = self.bolts.iter().map(|b| b.id).collect();
        drawn_rocks.sort();
        drawn_bolts.sort();
        rocks.sort();
        bolts.sort();
        let unique = rocks.windows(2).all(|w| w[0] != w[1]) && bolts.windows(2).all(|w| w[0] != w[1]);
        ships == 1 && unique && drawn_rocks == rocks && drawn_bolts == bolts
    }
}

fn asteroid_drawable(rock: &Asteroid) -> Drawable {
    Drawable::of(
        Sprite::Asteroid {
            tier: rock.tier,
            variant: rock.variant,
        },
        &rock.body,
    )
}
