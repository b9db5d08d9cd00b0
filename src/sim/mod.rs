//! Game simulation: kinematics, collisions, entity behaviour and the session
//! state machine. Nothing in here touches the terminal; the app feeds it one
//! [`FrameInput`] per frame and draws whatever [`GameSession::drawables`] returns.

pub mod asteroid;
pub mod body;
pub mod collision;
pub mod laser;
pub mod session;
pub mod ship;

use glam::Vec2;

pub use asteroid::AsteroidTier;
pub use body::MovingBody;
pub use session::{GamePhase, GameSession};

/// Logical field size. All speed constants are tuned for it.
pub const FIELD_SIZE: Vec2 = Vec2::new(1280.0, 720.0);

/// Frame seconds are multiplied by this before integration.
pub const DT_SCALE: f32 = 10.0;

/// Frame step used before the first measured frame.
pub const INITIAL_STEP: f32 = 0.01;

/// Stable handle for an asteroid or laser bolt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Everything the session needs from the outside for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub thrust: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Edge: fire one bolt.
    pub fire: bool,
    /// Edge: start from the title screen or restart after game over.
    pub start: bool,
    /// Wall-clock seconds of the previous frame.
    pub frame_secs: f32,
    /// Monotonic milliseconds since the app started.
    pub now_ms: u64,
}

/// Which image the renderer should use for an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sprite {
    Ship { flames: bool },
    Asteroid { tier: AsteroidTier, variant: u8 },
    Laser,
}

/// One entry of the per-frame draw list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    pub sprite: Sprite,
    pub position: Vec2,
    /// Radians clockwise from "up".
    pub heading: f32,
    pub half_extents: Vec2,
}

impl Drawable {
    pub fn of(sprite: Sprite, body: &MovingBody) -> Self {
        Self {
            sprite,
            position: body.position,
            heading: body.heading(),
            half_extents: body.half_extents,
        }
    }
}
