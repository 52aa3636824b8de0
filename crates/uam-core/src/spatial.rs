//! Planar geometry for vertiport positions and VTOL movement.

use serde::{Deserialize, Serialize};

/// A point on the simulation plane, in abstract distance units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Move at most `step` units toward `target`.
    ///
    /// Snaps exactly onto the target when it is within one step, so callers
    /// can test arrival with equality instead of a tolerance radius.
    pub fn step_towards(&self, target: Position, step: f64) -> Position {
        let dist = self.distance_to(target);
        if dist <= step || dist <= f64::EPSILON {
            return target;
        }
        let ratio = step / dist;
        Position {
            x: self.x + (target.x - self.x) * ratio,
            y: self.y + (target.y - self.y) * ratio,
        }
    }
}

/// Number of whole ticks needed to cover `distance` at `speed` units per tick.
pub fn ticks_to_cover(distance: f64, speed: f64) -> u64 {
    if speed <= 0.0 {
        return u64::MAX;
    }
    (distance / speed).ceil() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_known_triangle() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_snaps_when_within_reach() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 0.0);
        assert_eq!(a.step_towards(b, 4.0), b);
    }

    #[test]
    fn test_step_moves_by_speed() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(10.0, 0.0);
        let next = a.step_towards(b, 4.0);
        assert!((next.x - 4.0).abs() < 1e-9);
        assert_eq!(next.y, 0.0);
    }

    #[test]
    fn test_stepping_reaches_target_in_expected_ticks() {
        let target = Position::new(-40.0, 120.0);
        let mut pos = Position::new(0.0, 0.0);
        let mut ticks = 0;
        while pos != target {
            pos = pos.step_towards(target, 4.0);
            ticks += 1;
        }
        assert_eq!(ticks, ticks_to_cover(Position::default().distance_to(target), 4.0));
    }
}
