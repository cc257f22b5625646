//! Landmark synthesis from a face box.
//!
//! The points are fixed proportions of the box, not measurements: they
//! follow the box and carry no information of their own. Good enough to
//! anchor cosmetic overlays, not to locate real facial features.

use super::detection_result::{BoundingBox, Landmark, LandmarkKind};

/// Horizontal eye offset from the box centre, as a fraction of box width.
const EYE_OFFSET_X: f64 = 0.2;
/// Vertical position of the eyes, as a fraction of box height from the top.
const EYE_Y: f64 = 0.4;
const NOSE_Y: f64 = 0.5;
const MOUTH_Y: f64 = 0.75;

/// Returns `[left_eye, right_eye, nose, mouth]` for the given box, clamped
/// to `[0, frame_width] x [0, frame_height]`.
pub fn synthesize_landmarks(
    bounding_box: &BoundingBox,
    frame_width: f64,
    frame_height: f64,
) -> Vec<Landmark> {
    let (center_x, _) = bounding_box.center();
    let offset = bounding_box.width * EYE_OFFSET_X;
    let at = |kind: LandmarkKind, x: f64, fraction: f64| Landmark {
        x: x.clamp(0.0, frame_width),
        y: (bounding_box.top + bounding_box.height * fraction).clamp(0.0, frame_height),
        kind,
    };

    vec![
        at(LandmarkKind::LeftEye, center_x - offset, EYE_Y),
        at(LandmarkKind::RightEye, center_x + offset, EYE_Y),
        at(LandmarkKind::Nose, center_x, NOSE_Y),
        at(LandmarkKind::Mouth, center_x, MOUTH_Y),
    ]
}
