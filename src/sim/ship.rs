use glam::Vec2;

use super::asteroid::Asteroid;
use super::body::MovingBody;
use super::collision::collides;
use super::laser::LaserBolt;
use super::EntityId;

pub const SHIP_SIZE: Vec2 = Vec2::new(75.0, 75.0);
const THRUST_ACCEL: f32 = 5.0;
const DRAG: f32 = 0.4;
const TURN_RATE: f32 = 0.9;
/// A bolt younger than this cannot hit the ship that fired it.
pub const FRIENDLY_FIRE_GRACE_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Turn {
    #[default]
    None,
    Left,
    Right,
}

/// What the ship ran into this frame. The session decides what happens next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipHit {
    Asteroid(EntityId),
    Bolt(EntityId),
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub body: MovingBody,
    thrusting: bool,
    turn: Turn,
    flames: bool,
    home: Vec2,
}

impl Ship {
    /// A ship parked at the centre of `bounds`.
    pub fn new(bounds: Vec2) -> Self {
        let home = bounds / 2.0;
        Self {
            body: MovingBody::new(home, Vec2::ZERO, 0.0, SHIP_SIZE / 2.0),
            thrusting: false,
            turn: Turn::None,
            flames: false,
            home,
        }
    }

    pub fn set_thrust(&mut self, on: bool) {
        self.thrusting = on;
    }

    pub fn turn_left(&mut self) {
        self.turn = Turn::Left;
    }

    pub fn turn_right(&mut self) {
        self.turn = Turn::Right;
    }

    #[cfg(test)]
    pub fn turn(&self) -> Turn {
        self.turn
    }

    #[cfg(test)]
    pub fn is_thrusting(&self) -> bool {
        self.thrusting
    }

    /// Whether the last tick drew the thrust flame.
    pub fn flames(&self) -> bool {
        self.flames
    }

    pub fn reset_to_center(&mut self) {
        self.body.position = self.home;
        self.body.velocity = Vec2::ZERO;
        self.body.acceleration = Vec2::ZERO;
        self.body.angular_velocity = 0.0;
        self.body.set_heading(0.0);
        self.thrusting = false;
        self.turn = Turn::None;
        self.flames = false;
    }

    /// Apply this frame's intents, look for contacts, then integrate.
    ///
    /// Intents are cleared afterwards, so input must re-assert them every frame.
    pub fn tick(
        &mut self,
        dt_scaled: f32,
        bounds: Vec2,
        asteroids: &[Asteroid],
        bolts: &[LaserBolt],
    ) -> Option<ShipHit> {
        self.body.acceleration = if self.thrusting {
            self.body.direction() * THRUST_ACCEL
        } else if self.body.speed() > 0.0 {
            -self.body.velocity.normalize_or_zero() * DRAG
        } else {
            Vec2::ZERO
        };

        self.body.angular_velocity = match self.turn {
            Turn::Left => -TURN_RATE,
            Turn::Right => TURN_RATE,
            Turn::None => 0.0,
        };

        let hit = self.contact(asteroids, bolts);

        self.flames = self.thrusting;
        self.thrusting = false;
        self.turn = Turn::None;
        self.body.advance(dt_scaled, bounds);
        hit
    }

    // First asteroid in collection order wins; bolts only count once aged.
    fn contact(&self, asteroids: &[Asteroid], bolts: &[LaserBolt]) -> Option<ShipHit> {
        if let Some(rock) = asteroids.iter().find(|a| collides(&self.body, &a.body)) {
            return Some(ShipHit::Asteroid(rock.id));
        }
        bolts
            .iter()
            .find(|b| b.age_ms() > FRIENDLY_FIRE_GRACE_MS && collides(&self.body, &b.body))
            .map(|b| ShipHit::Bolt(b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::asteroid::AsteroidTier;
    use crate::sim::FIELD_SIZE;

    fn rock_at(id: u64, pos: Vec2) -> Asteroid {
        Asteroid::placed(EntityId(id), AsteroidTier::Large, pos, Vec2::ZERO, 0)
    }

    #[test]
    fn test_new_ship_is_centred_and_still() {
        let ship = Ship::new(FIELD_SIZE);
        assert_eq!(ship.body.position, Vec2::new(640.0, 360.0));
        assert_eq!(ship.body.velocity, Vec2::ZERO);
        assert_eq!(ship.body.heading(), 0.0);
    }

    #[test]
    fn test_thrust_accelerates_along_heading() {
        let mut ship = Ship::new(FIELD_SIZE);
        ship.set_thrust(true);
        ship.tick(0.1, FIELD_SIZE, &[], &[]);
        assert!((ship.body.acceleration - Vec2::new(0.0, -5.0)).length() < 1e-5);
        assert!((ship.body.velocity - Vec2::new(0.0, -0.5)).length() < 1e-5);
        assert!(ship.flames());
        assert!(!ship.is_thrusting());
    }

    #[test]
    fn test_drag_opposes_motion() {
        let mut ship = Ship::new(FIELD_SIZE);
        ship.body.velocity = Vec2::new(3.0, 4.0);
        ship.tick(0.1, FIELD_SIZE, &[], &[]);
        assert!((ship.body.acceleration - Vec2::new(-0.24, -0.32)).length() < 1e-5);
        assert!(ship.body.speed() < 5.0);
        assert!(ship.body.velocity.x > 0.0 && ship.body.velocity.y > 0.0);
        assert!(!ship.flames());
    }

    #[test]
    fn test_no_drag_when_stopped() {
        let mut ship = Ship::new(FIELD_SIZE);
        ship.tick(0.1, FIELD_SIZE, &[], &[]);
        assert_eq!(ship.body.acceleration, Vec2::ZERO);
        assert!(!ship.body.velocity.x.is_nan());
    }

    #[test]
    fn test_turn_intents_last_call_wins() {
        let mut ship = Ship::new(FIELD_SIZE);
        ship.turn_left();
        ship.turn_right();
        assert_eq!(ship.turn(), Turn::Right);
        ship.tick(0.1, FIELD_SIZE, &[], &[]);
        assert_eq!(ship.body.angular_velocity, 0.9);
        assert!(ship.body.heading() > 0.0);
        assert_eq!(ship.turn(), Turn::None);

        ship.turn_left();
        ship.tick(0.1, FIELD_SIZE, &[], &[]);
        assert_eq!(ship.body.angular_velocity, -0.9);
    }

    #[test]
    fn test_intents_must_be_reasserted() {
        let mut ship = Ship::new(FIELD_SIZE);
        ship.turn_right();
        ship.tick(0.1, FIELD_SIZE, &[], &[]);
        let heading = ship.body.heading();
        ship.tick(0.1, FIELD_SIZE, &[], &[]);
        assert_eq!(ship.body.angular_velocity, 0.0);
        assert_eq!(ship.body.heading(), heading);
    }

    #[test]
    fn test_reports_first_overlapping_asteroid() {
        let mut ship = Ship::new(FIELD_SIZE);
        let rocks = [
            rock_at(1, Vec2::new(100.0, 100.0)),
            rock_at(2, Vec2::new(650.0, 370.0)),
            rock_at(3, Vec2::new(630.0, 350.0)),
        ];
        let hit = ship.tick(0.1, FIELD_SIZE, &rocks, &[]);
        assert_eq!(hit, Some(ShipHit::Asteroid(EntityId(2))));
    }

    #[test]
    fn test_fresh_bolt_cannot_hit_ship() {
        let mut ship = Ship::new(FIELD_SIZE);
        let mut bolt = LaserBolt::fire(EntityId(9), &ship.body, 0);
        bolt.set_age_ms(FRIENDLY_FIRE_GRACE_MS);
        assert_eq!(ship.tick(0.0, FIELD_SIZE, &[], &[bolt.clone()]), None);

        bolt.set_age_ms(FRIENDLY_FIRE_GRACE_MS + 1);
        assert_eq!(
            ship.tick(0.0, FIELD_SIZE, &[], &[bolt]),
            Some(ShipHit::Bolt(EntityId(9)))
        );
    }

    #[test]
    fn test_reset_to_center_clears_motion_and_intents() {
        let mut ship = Ship::new(FIELD_SIZE);
        ship.set_thrust(true);
        ship.turn_left();
        ship.tick(1.0, FIELD_SIZE, &[], &[]);
        ship.set_thrust(true);
        ship.reset_to_center();
        assert_eq!(ship.body.position, FIELD_SIZE / 2.0);
        assert_eq!(ship.body.velocity, Vec2::ZERO);
        assert_eq!(ship.body.acceleration, Vec2::ZERO);
        assert_eq!(ship.body.heading(), 0.0);
        assert!(!ship.is_thrusting());
        assert_eq!(ship.turn(), Turn::None);
    }
}
