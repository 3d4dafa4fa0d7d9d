// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ops::{Add, Sub};

/// A point (or offset) in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset by `distance` along `angle_deg` (0° points along +x, angles grow clockwise on a
    /// y-down canvas).
    pub fn polar_offset(self, angle_deg: f64, distance: f64) -> Self {
        let angle = angle_deg.to_radians();
        Self {
            x: self.x + angle.cos() * distance,
            y: self.y + angle.sin() * distance,
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::Point;

    #[test]
    fn polar_offset_at_zero_and_ninety_degrees() {
        let origin = Point::new(10.0, 20.0);

        let east = origin.polar_offset(0.0, 150.0);
        assert!((east.x - 160.0).abs() < 1e-9);
        assert!((east.y - 20.0).abs() < 1e-9);

        let south = origin.polar_offset(90.0, 150.0);
        assert!((south.x - 10.0).abs() < 1e-9);
        assert!((south.y - 170.0).abs() < 1e-9);
    }

    #[test]
    fn scaled_and_subtracted_offsets() {
        let delta = Point::new(30.0, 50.0) - Point::new(10.0, 10.0);
        assert_eq!(delta.scaled(0.5), Point::new(10.0, 20.0));
    }
}
