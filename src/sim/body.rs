use glam::Vec2;

/// Kinematic state shared by the ship, asteroids and laser bolts.
///
/// Heading is radians clockwise from "up" (screen y grows downward), so the
/// facing direction is `(sin h, -cos h)`. The direction is always derived
/// from the heading, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    heading: f32,
    pub angular_velocity: f32,
    /// Half width and half height of the unrotated bounding box.
    pub half_extents: Vec2,
}

impl MovingBody {
    pub fn new(position: Vec2, velocity: Vec2, angular_velocity: f32, half_extents: Vec2) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            heading: 0.0,
            angular_velocity,
            half_extents,
        }
    }

    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn set_heading(&mut self, heading: f32) {
        self.heading = heading;
    }

    /// Unit vector the body is facing.
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.heading.sin(), -self.heading.cos())
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Explicit Euler step followed by the screen wrap.
    ///
    /// `dt_scaled` is frame seconds already multiplied by [`super::DT_SCALE`].
    /// Position uses the velocity from before this step.
    pub fn advance(&mut self, dt_scaled: f32, bounds: Vec2) {
        self.position += self.velocity * dt_scaled;
        self.velocity += self.acceleration * dt_scaled;
        self.heading += self.angular_velocity * dt_scaled;
        self.wrap(bounds);
    }

    /// Toroidal wrap: leaving `[0, extent]` on an axis puts the body on the
    /// opposite boundary of that axis.
    pub fn wrap(&mut self, bounds: Vec2) {
        if self.position.x < 0.0 {
            self.position.x = bounds.x;
        } else if self.position.x > bounds.x {
            self.position.x = 0.0;
        }

        if self.position.y < 0.0 {
            self.position.y = bounds.y;
        } else if self.position.y > bounds.y {
            self.position.y = 0.0;
        }
    }

    /// Bounding box corners, clockwise from the top left.
    pub fn corners(&self) -> [Vec2; 4] {
        let Vec2 { x: hx, y: hy } = self.half_extents;
        let p = self.position;
        [
            Vec2::new(p.x - hx, p.y - hy),
            Vec2::new(p.x + hx, p.y - hy),
            Vec2::new(p.x + hx, p.y + hy),
            Vec2::new(p.x - hx, p.y + hy),
        ]
    }
}
