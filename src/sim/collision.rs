//! Point-in-box hit test.
//!
//! `collides(a, b)` checks `a`'s centre against `b`'s unrotated box. It is not
//! a box-box overlap and it is not symmetric: a small bolt inside a big
//! asteroid hits, the asteroid's centre is nowhere near the bolt's box.

use super::body::MovingBody;

/// True iff `a`'s centre lies strictly inside `b`'s axis-aligned box.
pub fn collides(a: &MovingBody, b: &MovingBody) -> bool {
    let [top_left, _, bottom_right, _] = b.corners();
    let p = a.position;
    top_left.x < p.x && p.x < bottom_right.x && top_left.y < p.y && p.y < bottom_right.y
}
