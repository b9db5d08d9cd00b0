use glam::Vec2;

use super::asteroid::Asteroid;
use super::body::MovingBody;
use super::collision::collides;
use super::EntityId;

pub const LASER_SIZE: Vec2 = Vec2::new(5.0, 20.0);
/// Launch speed, independent of the ship's own velocity.
const LASER_SPEED: f32 = 100.0;
pub const LASER_LIFETIME_MS: u64 = 1000;

/// How a bolt's frame ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoltOutcome {
    Flying,
    /// Struck this asteroid; the bolt is spent.
    Hit(EntityId),
    /// Outlived its lifetime.
    Expired,
}

#[derive(Debug, Clone)]
pub struct LaserBolt {
    pub id: EntityId,
    pub body: MovingBody,
    fired_at_ms: u64,
    age_ms: u64,
}

impl LaserBolt {
    /// A bolt leaving the shooter's position along its heading.
    pub fn fire(id: EntityId, shooter: &MovingBody, now_ms: u64) -> Self {
        let body = MovingBody::new(
            shooter.position,
            shooter.direction() * LASER_SPEED,
            0.0,
            LASER_SIZE / 2.0,
        )
        .with_heading(shooter.heading());
        Self {
            id,
            body,
            fired_at_ms: now_ms,
            age_ms: 0,
        }
    }

    /// Milliseconds since firing, as of the bolt's last tick.
    pub fn age_ms(&self) -> u64 {
        self.age_ms
    }

    #[cfg(test)]
    pub fn set_age_ms(&mut self, age_ms: u64) {
        self.age_ms = age_ms;
    }

    /// Check for a hit, age the bolt, and move it if it is still live.
    ///
    /// The first overlapping asteroid in collection order takes the hit.
    pub fn tick(&mut self, dt_scaled: f32, bounds: Vec2, asteroids: &[Asteroid], now_ms: u64) -> BoltOutcome {
        let hit = asteroids.iter().find(|rock| collides(&self.body, &rock.body));

        self.age_ms = now_ms.saturating_sub(self.fired_at_ms);

        match hit {
            Some(rock) => BoltOutcome::Hit(rock.id),
            None if self.age_ms > LASER_LIFETIME_MS => BoltOutcome::Expired,
            None => {
                self.body.advance(dt_scaled, bounds);
                BoltOutcome::Flying
            }
        }
    }
}
