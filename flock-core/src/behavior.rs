//! Steering rules.
//!
//! Each rule reads the neighbor snapshot taken at the start of an agent's step
//! and returns one steering contribution. The agent combines them in
//! [`Agent::step`](crate::Agent::step).

use crate::agent::Neighbor;
use crate::vector::Vector2D;

/// Containment stays silent until an agent is this far out, as a fraction of
/// the containment radius. The jump from zero at this threshold is intended.
pub const CONTAINMENT_THRESHOLD: f32 = 0.9;

/// Neighbor count at which the density gradient saturates.
pub const DENSITY_SATURATION: usize = 16;

/// Mean heading of the neighbors, or `heading` when there are none.
///
/// The mean is not renormalized, so disagreeing neighbors produce a shorter
/// vector.
pub fn alignment(heading: Vector2D, neighbors: &[Neighbor]) -> Vector2D {
    if neighbors.is_empty() {
        return heading;
    }

    let mut sum = Vector2D::zero();
    for neighbor in neighbors {
        sum += neighbor.heading;
    }
    sum / neighbors.len() as f32
}

/// Smoothed offset towards the neighbors' centroid.
///
/// `smoothing_velocity` carries the smoothing state between ticks.
pub fn cohesion(
    position: Vector2D,
    heading: Vector2D,
    neighbors: &[Neighbor],
    smoothing_velocity: &mut Vector2D,
    smooth_time: f32,
    dt: f32,
) -> Vector2D {
    if neighbors.is_empty() {
        return Vector2D::zero();
    }

    let mut centroid = Vector2D::zero();
    for neighbor in neighbors {
        centroid += neighbor.position;
    }
    centroid = centroid / neighbors.len() as f32;

    let offset = centroid - position;
    smooth_damp(heading, offset, smoothing_velocity, smooth_time, dt)
}

/// Mean repulsion from neighbors closer than the avoidance range.
///
/// Only neighbors with a squared distance strictly below
/// `square_avoidance_range` take part.
pub fn separation(
    position: Vector2D,
    neighbors: &[Neighbor],
    square_avoidance_range: f32,
) -> Vector2D {
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for neighbor in neighbors {
        if position.square_distance(&neighbor.position) < square_avoidance_range {
            sum += position - neighbor.position;
            count += 1;
        }
    }

    if count > 0 {
        sum / count as f32
    } else {
        Vector2D::zero()
    }
}

/// Pull back towards `center` once an agent is near the edge of the area.
///
/// Zero while `|center - position| / radius < 0.9`, then
/// `offset * t * t`, growing quadratically past the boundary.
pub fn containment(position: Vector2D, center: Vector2D, radius: f32) -> Vector2D {
    let offset = center - position;
    let t = offset.magnitude() / radius;

    if t < CONTAINMENT_THRESHOLD {
        return Vector2D::zero();
    }

    offset * t * t
}

/// Critically damped spring from `current` towards `target`.
///
/// Approaches the target over roughly `smooth_time` seconds without
/// overshooting it. `velocity` is the spring state and must be kept by the
/// caller between calls.
pub fn smooth_damp(
    current: Vector2D,
    target: Vector2D,
    velocity: &mut Vector2D,
    smooth_time: f32,
    dt: f32,
) -> Vector2D {
    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;

    // Polynomial fit of exp(-x), accurate for the step sizes a frame loop uses.
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * decay;
    let mut output = target + (change + temp) * decay;

    let target_from_current = target - current;
    let output_from_target = output - target;
    if target_from_current.dot(&output_from_target) > 0.0 {
        output = target;
        *velocity = Vector2D::zero();
    }

    output
}

/// Neighbor density mapped onto `[0, 1]` for coloring.
pub fn density_ratio(neighbor_count: usize) -> f32 {
    (neighbor_count as f32 / DENSITY_SATURATION as f32).clamp(0.0, 1.0)
}
