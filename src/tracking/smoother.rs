use serde::{Deserialize, Serialize};

use super::position::Position3D;

/// Per-axis damping applied on every accepted sample
///
/// Depth is damped harder than the screen-plane axes; the heuristic's depth
/// estimate is the noisiest signal and depth jitter reads as zooming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingFactors {
    pub planar: f32,
    pub depth: f32,
}

impl Default for SmoothingFactors {
    fn default() -> Self {
        Self {
            planar: 0.15,
            depth: 0.10,
        }
    }
}

/// One exponential smoothing step with a uniform factor
pub fn update(current: Position3D, target: Position3D, factor: f32) -> Position3D {
    Position3D::new(
        step(current.x, target.x, factor),
        step(current.y, target.y, factor),
        step(current.z, target.z, factor),
    )
}

#[inline]
fn step(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Owner of the tracked position
///
/// Single writer (the estimation step calls `update`/`reset`), single reader
/// (the render step copies `position()`); both run on the event-loop thread.
#[derive(Debug, Clone)]
pub struct Smoother {
    tracked: Position3D,
    factors: SmoothingFactors,
}

impl Smoother {
    pub fn new(initial: Position3D, factors: SmoothingFactors) -> Self {
        Self {
            tracked: initial,
            factors,
        }
    }

    pub fn position(&self) -> Position3D {
        self.tracked
    }

    /// Move the tracked position toward `target`; returns the new position
    pub fn update(&mut self, target: Position3D) -> Position3D {
        let planar = self.factors.planar;
        self.tracked = Position3D::new(
            step(self.tracked.x, target.x, planar),
            step(self.tracked.y, target.y, planar),
            step(self.tracked.z, target.z, self.factors.depth),
        );
        self.tracked
    }

    /// Snap to `neutral`, discarding history
    pub fn reset(&mut self, neutral: Position3D) {
        self.tracked = neutral;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_moves_fraction_of_gap() {
        let next = update(Position3D::new(0.0, 0.0, 0.0), Position3D::new(1.0, 2.0, 4.0), 0.25);
        assert_eq!(next, Position3D::new(0.25, 0.5, 1.0));
    }

    #[test]
    fn test_depth_uses_its_own_factor() {
        let mut smoother = Smoother::new(Position3D::neutral(3.0), SmoothingFactors::default());
        let p = smoother.update(Position3D::new(1.0, 1.0, 4.0));
        assert!((p.x - 0.15).abs() < 1e-6);
        assert!((p.y - 0.15).abs() < 1e-6);
        assert!((p.z - 3.1).abs() < 1e-6);
    }

    #[test]
    fn test_reset_overwrites() {
        let mut smoother = Smoother::new(Position3D::neutral(3.0), SmoothingFactors::default());
        smoother.update(Position3D::new(2.0, -2.0, 1.0));
        smoother.reset(Position3D::neutral(3.0));
        assert_eq!(smoother.position(), Position3D::neutral(3.0));
    }
}
