use serde::{Deserialize, Serialize};

/// Axis-aligned face box in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Builds a box from edge coordinates, clamping it inside
    /// `[0, frame_width] x [0, frame_height]`.
    ///
    /// Left/top are clamped first; width and height are then derived from
    /// the clamped right/bottom edges so the box never crosses the frame.
    pub fn from_edges_clamped(
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
        frame_width: f64,
        frame_height: f64,
    ) -> Self {
        let left = left.clamp(0.0, frame_width);
        let top = top.clamp(0.0, frame_height);
        let right = right.clamp(left, frame_width);
        let bottom = bottom.clamp(top, frame_height);
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LandmarkKind {
    LeftEye,
    RightEye,
    Nose,
    Mouth,
}

impl LandmarkKind {
    pub const ALL: [LandmarkKind; 4] = [
        LandmarkKind::LeftEye,
        LandmarkKind::RightEye,
        LandmarkKind::Nose,
        LandmarkKind::Mouth,
    ];

    pub fn is_eye(self) -> bool {
        matches!(self, LandmarkKind::LeftEye | LandmarkKind::RightEye)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub kind: LandmarkKind,
}

/// One detected face: its box plus typed landmark points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub bounding_box: BoundingBox,
    pub landmarks: Vec<Landmark>,
}

impl DetectionResult {
    pub fn new(bounding_box: BoundingBox, landmarks: Vec<Landmark>) -> Self {
        Self {
            bounding_box,
            landmarks,
        }
    }

    pub fn landmark(&self, kind: LandmarkKind) -> Option<&Landmark> {
        self.landmarks.iter().find(|l| l.kind == kind)
    }

    pub fn eyes(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter().filter(|l| l.kind.is_eye())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_edges_inside_frame_unchanged() {
        let b = BoundingBox::from_edges_clamped(10.0, 20.0, 50.0, 80.0, 100.0, 100.0);
        assert_eq!(b, BoundingBox::new(10.0, 20.0, 40.0, 60.0));
    }

    #[rstest]
    #[case::left_overhang(-15.0, 10.0, 40.0, 50.0, BoundingBox::new(0.0, 10.0, 40.0, 40.0))]
    #[case::top_overhang(10.0, -5.0, 40.0, 50.0, BoundingBox::new(10.0, 0.0, 30.0, 50.0))]
    #[case::right_overhang(60.0, 10.0, 130.0, 50.0, BoundingBox::new(60.0, 10.0, 40.0, 40.0))]
    #[case::bottom_overhang(10.0, 70.0, 40.0, 120.0, BoundingBox::new(10.0, 70.0, 30.0, 30.0))]
    #[case::everything(-10.0, -10.0, 200.0, 200.0, BoundingBox::new(0.0, 0.0, 100.0, 100.0))]
    fn test_edges_clamped(
        #[case] left: f64,
        #[case] top: f64,
        #[case] right: f64,
        #[case] bottom: f64,
        #[case] expected: BoundingBox,
    ) {
        let b = BoundingBox::from_edges_clamped(left, top, right, bottom, 100.0, 100.0);
        assert_eq!(b, expected);
        assert!(b.right() <= 100.0);
        assert!(b.bottom() <= 100.0);
    }

    #[test]
    fn test_box_entirely_outside_collapses_to_edge() {
        let b = BoundingBox::from_edges_clamped(150.0, 10.0, 180.0, 20.0, 100.0, 100.0);
        assert_relative_eq!(b.left, 100.0);
        assert_relative_eq!(b.width, 0.0);
    }

    #[test]
    fn test_center_and_contains() {
        let b = BoundingBox::new(10.0, 20.0, 40.0, 60.0);
        assert_eq!(b.center(), (30.0, 50.0));
        assert!(b.contains(30.0, 50.0));
        assert!(!b.contains(5.0, 50.0));
        assert_relative_eq!(b.area(), 2400.0);
    }

    #[test]
    fn test_landmark_lookup_by_kind() {
        let result = DetectionResult::new(
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            vec![
                Landmark { x: 2.0, y: 4.0, kind: LandmarkKind::LeftEye },
                Landmark { x: 8.0, y: 4.0, kind: LandmarkKind::RightEye },
                Landmark { x: 5.0, y: 5.0, kind: LandmarkKind::Nose },
            ],
        );
        assert_eq!(result.landmark(LandmarkKind::Nose).map(|l| l.x), Some(5.0));
        assert!(result.landmark(LandmarkKind::Mouth).is_none());
        assert_eq!(result.eyes().count(), 2);
    }

    #[test]
    fn test_serializes_with_browser_field_names() {
        let result = DetectionResult::new(
            BoundingBox::new(1.0, 2.0, 3.0, 4.0),
            vec![Landmark { x: 1.5, y: 2.5, kind: LandmarkKind::LeftEye }],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["boundingBox"]["left"], 1.0);
        assert_eq!(json["landmarks"][0]["type"], "leftEye");
    }
}
