// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Node, Point};

pub const MIN_SCALE: f64 = 0.3;
pub const MAX_SCALE: f64 = 3.0;
pub const ZOOM_STEP: f64 = 1.2;
/// Padding around the node bounds when fitting, in world units per side.
const FIT_MARGIN: f64 = 100.0;

/// Pan/zoom state of the canvas. `offset` is in screen units; `size` is the visible area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset: Point,
    pub size: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::ORIGIN,
            size: Point::new(800.0, 600.0),
        }
    }
}

impl Viewport {
    /// Sets pan and zoom. The scale is clamped to `[MIN_SCALE, MAX_SCALE]`; a non-finite scale
    /// is ignored.
    pub fn set(&mut self, scale: f64, offset: Point) {
        if scale.is_finite() {
            self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
        self.offset = offset;
    }

    pub fn zoom_in(&mut self) {
        self.scale = (self.scale * ZOOM_STEP).min(MAX_SCALE);
    }

    pub fn zoom_out(&mut self) {
        self.scale = (self.scale / ZOOM_STEP).max(MIN_SCALE);
    }

    /// Multiplies the scale by `factor` (wheel zoom), clamped.
    pub fn zoom_by(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Point::ORIGIN;
    }

    /// Screen position → world position.
    pub fn to_world(&self, screen: Point) -> Point {
        (screen - self.offset).scaled(1.0 / self.scale)
    }

    /// World position under the middle of the visible area.
    pub fn center(&self) -> Point {
        self.to_world(self.size.scaled(0.5))
    }

    /// Zooms out (never in past 1.0) and pans so every node is visible.
    pub fn fit(&mut self, nodes: &[Node]) {
        let Some(first) = nodes.first() else {
            return;
        };
        let (mut min, mut max) = (first.position(), first.position());
        for node in nodes {
            min = Point::new(min.x.min(node.x), min.y.min(node.y));
            max = Point::new(max.x.max(node.x), max.y.max(node.y));
        }

        let width = max.x - min.x + 2.0 * FIT_MARGIN;
        let height = max.y - min.y + 2.0 * FIT_MARGIN;
        let scale = (self.size.x / width).min(self.size.y / height).min(1.0);

        self.scale = scale;
        self.offset = Point::new(
            (self.size.x - width * scale) / 2.0 - min.x * scale + FIT_MARGIN * scale,
            (self.size.y - height * scale) / 2.0 - min.y * scale + FIT_MARGIN * scale,
        );
    }
}
