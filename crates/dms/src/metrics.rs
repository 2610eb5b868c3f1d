//! Per-frame metric samples and raw ratio helpers
//!
//! The perception layer hands over three scalars per frame. Ratios whose
//! horizontal reference collapses to zero are undefined; they are carried as
//! NaN and never count as a threshold crossing.

use serde::{Deserialize, Serialize};

use crate::config::MetricThresholds;

/// 2D landmark position (normalized image coordinates)
pub type Point = (f32, f32);

/// One frame of physiological metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Eye aspect ratio (average of both eyes)
    pub ear: f32,
    /// Mouth aspect ratio
    pub mar: f32,
    /// Head pitch in degrees, negative is nodding down
    pub pitch: f32,
}

/// Which channel conditions hold for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelConditions {
    pub eyes_closed: bool,
    pub yawning: bool,
    pub nodding: bool,
}

impl MetricSample {
    pub fn new(ear: f32, mar: f32, pitch: f32) -> Self {
        Self { ear, mar, pitch }
    }

    /// Build a sample from ratios that may be undefined
    pub fn from_ratios(ear: Option<f32>, mar: Option<f32>, pitch: f32) -> Self {
        Self {
            ear: ear.unwrap_or(f32::NAN),
            mar: mar.unwrap_or(f32::NAN),
            pitch,
        }
    }

    /// Evaluate each channel's threshold. Non-finite metrics never cross.
    pub fn conditions(&self, thresholds: &MetricThresholds) -> ChannelConditions {
        ChannelConditions {
            eyes_closed: self.ear.is_finite() && self.ear < thresholds.ear,
            yawning: self.mar.is_finite() && self.mar > thresholds.mar,
            nodding: self.pitch.is_finite() && self.pitch < thresholds.pitch,
        }
    }
}

fn distance(a: Point, b: Point) -> f32 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// Vertical over horizontal extent, `None` when the horizontal reference is degenerate
pub fn aspect_ratio(vertical: f32, horizontal: f32) -> Option<f32> {
    if !vertical.is_finite() || !horizontal.is_finite() || horizontal <= f32::EPSILON {
        return None;
    }
    Some(vertical / horizontal)
}

/// Eye aspect ratio from six contour points.
///
/// Points are ordered `[corner, upper1, upper2, corner, lower2, lower1]`,
/// so `p1-p5` and `p2-p4` are the vertical pairs and `p0-p3` the width.
pub fn eye_aspect_ratio(points: &[Point; 6]) -> Option<f32> {
    let vertical = distance(points[1], points[5]) + distance(points[2], points[4]);
    let horizontal = distance(points[0], points[3]);
    aspect_ratio(vertical, 2.0 * horizontal)
}

/// Mouth aspect ratio from the inner lip midpoints and mouth corners
pub fn mouth_aspect_ratio(top: Point, bottom: Point, left: Point, right: Point) -> Option<f32> {
    aspect_ratio(distance(top, bottom), distance(left, right))
}

/// Mean of whichever eye ratios are defined
pub fn average_ear(left: Option<f32>, right: Option<f32>) -> Option<f32> {
    match (left, right) {
        (Some(l), Some(r)) => Some((l + r) / 2.0),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}
