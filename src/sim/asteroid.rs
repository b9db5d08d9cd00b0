use glam::Vec2;
use rand::Rng;

use super::body::MovingBody;
use super::EntityId;

/// Half-width of the vertical band around the field centre where fresh
/// asteroids may not appear.
const NO_SPAWN_HALF_WIDTH: f32 = 150.0;

/// Number of asteroid images to pick from.
pub const VARIANT_COUNT: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AsteroidTier {
    Small = 1,
    Medium = 2,
    Large = 3,
}

impl AsteroidTier {
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Width and height of the sprite box.
    pub fn size(&self) -> Vec2 {
        match self {
            AsteroidTier::Large => Vec2::splat(200.0),
            AsteroidTier::Medium => Vec2::splat(150.0),
            AsteroidTier::Small => Vec2::splat(100.0),
        }
    }

    /// Integer speed range per axis; smaller rocks move faster.
    fn speed_range(&self) -> (u32, u32) {
        match self {
            AsteroidTier::Large => (5, 8),
            AsteroidTier::Medium => (7, 10),
            AsteroidTier::Small => (10, 13),
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            AsteroidTier::Large => 20,
            AsteroidTier::Medium => 50,
            AsteroidTier::Small => 100,
        }
    }

    pub fn split(&self) -> Option<AsteroidTier> {
        match self {
            AsteroidTier::Large => Some(AsteroidTier::Medium),
            AsteroidTier::Medium => Some(AsteroidTier::Small),
            AsteroidTier::Small => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub id: EntityId,
    pub tier: AsteroidTier,
    /// Which asteroid image to draw; children keep their parent's.
    pub variant: u8,
    pub body: MovingBody,
}

impl Asteroid {
    /// An asteroid with explicit kinematics and no spin.
    pub fn placed(id: EntityId, tier: AsteroidTier, position: Vec2, velocity: Vec2, variant: u8) -> Self {
        Self {
            id,
            tier,
            variant,
            body: MovingBody::new(position, velocity, 0.0, tier.size() / 2.0),
        }
    }

    /// Roll fresh initial conditions.
    ///
    /// `forced_position` pins a split child to its parent's spot; it is ignored
    /// for large asteroids, which always get a random position outside the
    /// no-spawn band.
    pub fn spawn<R: Rng>(
        rng: &mut R,
        id: EntityId,
        tier: AsteroidTier,
        bounds: Vec2,
        forced_position: Option<Vec2>,
        variant: u8,
    ) -> Self {
        let position = match forced_position {
            Some(pos) if tier != AsteroidTier::Large => pos,
            _ => spawn_position(rng, bounds),
        };
        let (lo, hi) = tier.speed_range();
        let velocity = Vec2::new(
            drift_speed(rng, lo, hi),
            drift_speed(rng, lo, hi),
        );
        let spin = random_sign(rng) / rng.gen_range(1..=10) as f32;

        let mut asteroid = Self::placed(id, tier, position, velocity, variant);
        asteroid.body.angular_velocity = spin;
        asteroid
    }

    /// The two children left behind when this asteroid breaks up, or none for
    /// the smallest tier. `next_id` hands out ids for them.
    pub fn fragments<R: Rng>(
        &self,
        rng: &mut R,
        bounds: Vec2,
        mut next_id: impl FnMut() -> EntityId,
    ) -> Vec<Asteroid> {
        let Some(child_tier) = self.tier.split() else {
            return Vec::new();
        };
        (0..2)
            .map(|_| {
                Asteroid::spawn(
                    rng,
                    next_id(),
                    child_tier,
                    bounds,
                    Some(self.body.position),
                    self.variant,
                )
            })
            .collect()
    }

    pub fn tick(&mut self, dt_scaled: f32, bounds: Vec2) {
        self.body.advance(dt_scaled, bounds);
    }
}

// The guard only looks at x: draws are rejected while x sits within the band
// around the centre column, whatever y is.
fn spawn_position<R: Rng>(rng: &mut R, bounds: Vec2) -> Vec2 {
    let centre_x = bounds.x / 2.0;
    let max_x = bounds.x as u32;
    let max_y = bounds.y as u32;
    loop {
        let x = rng.gen_range(0..=max_x) as f32;
        let y = rng.gen_range(0..=max_y) as f32;
        if !in_no_spawn_band(x, centre_x) {
            return Vec2::new(x, y);
        }
    }
}

fn in_no_spawn_band(x: f32, centre_x: f32) -> bool {
    centre_x - NO_SPAWN_HALF_WIDTH < x && x < centre_x + NO_SPAWN_HALF_WIDTH
}

// Integer speed plus, half the time, a 1/n jitter; random sign.
fn drift_speed<R: Rng>(rng: &mut R, lo: u32, hi: u32) -> f32 {
    let base = rng.gen_range(lo..=hi) as f32;
    let jitter = (1.0 / rng.gen_range(1..=10) as f32) * rng.gen_range(0..=1) as f32;
    random_sign(rng) * (base + jitter)
}

fn random_sign<R: Rng>(rng: &mut R) -> f32 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FIELD_SIZE;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xA57E_401D)
    }

    #[test]
    fn test_tier_points() {
        assert_eq!(AsteroidTier::Large.points(), 20);
        assert_eq!(AsteroidTier::Medium.points(), 50);
        assert_eq!(AsteroidTier::Small.points(), 100);
    }

    #[test]
    fn test_tier_split_chain() {
        assert_eq!(AsteroidTier::Large.split(), Some(AsteroidTier::Medium));
        assert_eq!(AsteroidTier::Medium.split(), Some(AsteroidTier::Small));
        assert_eq!(AsteroidTier::Small.split(), None);
        assert_eq!(AsteroidTier::Large.rank(), 3);
    }

    #[test]
    fn test_spawn_avoids_centre_column() {
        let mut rng = rng();
        for i in 0..500 {
            let rock = Asteroid::spawn(&mut rng, EntityId(i), AsteroidTier::Large, FIELD_SIZE, None, 0);
            let x = rock.body.position.x;
            assert!(x <= 490.0 || x >= 790.0, "spawned at x={x}");
            assert!((0.0..=FIELD_SIZE.y).contains(&rock.body.position.y));
        }
    }

    #[test]
    fn test_spawn_speeds_follow_tier() {
        let mut rng = rng();
        for (tier, lo, hi) in [
            (AsteroidTier::Large, 5.0, 9.0),
            (AsteroidTier::Medium, 7.0, 11.0),
            (AsteroidTier::Small, 10.0, 14.0),
        ] {
            for i in 0..200 {
                let rock = Asteroid::spawn(&mut rng, EntityId(i), tier, FIELD_SIZE, None, 0);
                for v in [rock.body.velocity.x, rock.body.velocity.y] {
                    assert!(v.abs() >= lo && v.abs() <= hi, "{tier:?} speed {v}");
                }
                let spin = rock.body.angular_velocity.abs();
                assert!((0.1..=1.0).contains(&spin), "spin {spin}");
            }
        }
    }

    #[test]
    fn test_forced_position_pins_children_only() {
        let mut rng = rng();
        let pin = Vec2::new(640.0, 360.0);
        let child = Asteroid::spawn(&mut rng, EntityId(1), AsteroidTier::Medium, FIELD_SIZE, Some(pin), 2);
        assert_eq!(child.body.position, pin);
        assert_eq!(child.variant, 2);

        let big = Asteroid::spawn(&mut rng, EntityId(2), AsteroidTier::Large, FIELD_SIZE, Some(pin), 0);
        assert_ne!(big.body.position, pin);
    }

    #[test]
    fn test_fragments_two_children_at_parent_position() {
        let mut rng = rng();
        let parent = Asteroid::placed(
            EntityId(1),
            AsteroidTier::Large,
            Vec2::new(200.0, 100.0),
            Vec2::new(5.0, 5.0),
            1,
        );
        let mut next = 10;
        let kids = parent.fragments(&mut rng, FIELD_SIZE, || {
            next += 1;
            EntityId(next)
        });
        assert_eq!(kids.len(), 2);
        for kid in &kids {
            assert_eq!(kid.tier, AsteroidTier::Medium);
            assert_eq!(kid.body.position, parent.body.position);
            assert_eq!(kid.variant, 1);
            assert_eq!(kid.body.half_extents, Vec2::splat(75.0));
        }
        assert_eq!(kids[0].id, EntityId(11));
        assert_eq!(kids[1].id, EntityId(12));
    }

    #[test]
    fn test_smallest_tier_leaves_nothing() {
        let mut rng = rng();
        let pebble = Asteroid::placed(EntityId(1), AsteroidTier::Small, Vec2::splat(50.0), Vec2::ZERO, 0);
        assert!(pebble.fragments(&mut rng, FIELD_SIZE, || EntityId(99)).is_empty());
    }
}
