//! Pairwise collision detection and elastic response
//!
//! Two circles collide when their centers are closer than the sum of their
//! radii (minus a small tolerance). Response exchanges the velocity
//! components along the line of centers as a 1-D elastic collision, leaves
//! the tangential components alone, then pushes the pair apart.

use glam::DVec2;

use super::body::Body;
use crate::consts::MIN_SEPARATION;

/// What happened during one resolved collision
#[derive(Debug, Clone)]
pub struct Contact {
    /// Unit normal pointing from the first body toward the second
    pub normal: DVec2,
    /// Interpenetration depth including the tolerance margin
    pub depth: f64,
    /// Normal velocity components before the exchange (first, second)
    pub normal_before: (f64, f64),
    /// Normal velocity components after the exchange (first, second)
    pub normal_after: (f64, f64),
}

/// Euclidean distance between two body centers
#[inline]
pub fn distance(a: &Body, b: &Body) -> f64 {
    a.pos.distance(b.pos)
}

/// Check whether two bodies overlap by more than `eps`
///
/// Stricter than exact tangency so a freshly separated pair does not
/// re-trigger resolution on the next tick.
#[inline]
pub fn overlaps(a: &Body, b: &Body, eps: f64) -> bool {
    distance(a, b) + eps < a.radius() + b.radius()
}

/// 1-D elastic exchange of normal velocities `u1`, `u2` for masses `m1`, `m2`
#[inline]
pub fn elastic_exchange(m1: f64, u1: f64, m2: f64, u2: f64) -> (f64, f64) {
    let total = m1 + m2;
    let p1 = (u1 * (m1 - m2) + 2.0 * m2 * u2) / total;
    let p2 = (u2 * (m2 - m1) + 2.0 * m1 * u1) / total;
    (p1, p2)
}

/// Resolve a collision between two bodies in place
///
/// Updates both velocities and separates the centers so they end up
/// `a.radius() + b.radius() + eps` apart along the normal. Each body is pushed
/// by its radius share of the depth. Coincident centers have no defined
/// normal; the +x axis is used instead.
pub fn resolve(a: &mut Body, b: &mut Body, eps: f64) -> Contact {
    let delta = b.pos - a.pos;
    let dist = delta.length();

    let normal = if dist > MIN_SEPARATION {
        delta / dist
    } else {
        DVec2::X
    };
    let tangent = normal.perp();

    // Project onto the collision frame
    let u1 = a.vel.dot(normal);
    let u2 = b.vel.dot(normal);
    let t1 = a.vel.dot(tangent);
    let t2 = b.vel.dot(tangent);

    let (m1, m2) = (a.mass(), b.mass());
    let (p1, p2) = elastic_exchange(m1, u1, m2, u2);

    a.vel = tangent * t1 + normal * p1;
    b.vel = tangent * t2 + normal * p2;

    // Split the push by radius share
    let radius_sum = a.radius() + b.radius();
    let depth = radius_sum - dist + eps;
    let a_part = a.radius() / radius_sum;
    let b_part = b.radius() / radius_sum;

    a.pos -= normal * (depth * a_part);
    b.pos += normal * (depth * b_part);

    log::debug!(
        "collision {} <-> {}: depth {:.4}, normal velocity ({:.3}, {:.3}) -> ({:.3}, {:.3})",
        a.id(),
        b.id(),
        depth,
        u1,
        u2,
        p1,
        p2
    );

    Contact {
        normal,
        depth,
        normal_before: (u1, u2),
        normal_after: (p1, p2),
    }
}
