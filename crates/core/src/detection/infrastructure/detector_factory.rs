use crate::detection::domain::detection_result::DetectionResult;
use crate::detection::domain::face_detector::{FaceDetector, PlatformFaceDetector};
use crate::detection::domain::heuristic_tuning::HeuristicTuning;
use crate::shared::frame::Frame;

use super::cooldown_detector::CooldownDetector;
use super::heuristic_face_detector::HeuristicFaceDetector;

/// Routes frames to the platform detector while it works, and to the
/// heuristic detector once it is missing or has failed.
///
/// The switch happens between calls: the frame on which the platform
/// backend fails yields no faces, the next one goes to the fallback.
pub struct FallbackFaceDetector {
    platform: Option<CooldownDetector>,
    fallback: HeuristicFaceDetector,
    announced_fallback: bool,
}

impl FallbackFaceDetector {
    pub fn new(platform: Option<CooldownDetector>, fallback: HeuristicFaceDetector) -> Self {
        Self {
            platform,
            fallback,
            announced_fallback: false,
        }
    }

    /// Name of the backend the next frame will be routed to.
    pub fn active_backend(&self) -> &'static str {
        match &self.platform {
            Some(p) if p.is_available() => p.name(),
            _ => self.fallback.name(),
        }
    }
}

impl FaceDetector for FallbackFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Vec<DetectionResult> {
        if let Some(platform) = self.platform.as_mut().filter(|p| p.is_available()) {
            return platform.detect(frame);
        }
        if self.platform.is_some() && !self.announced_fallback {
            log::info!("Switching to heuristic face detection");
            self.announced_fallback = true;
        }
        self.fallback.detect(frame)
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

/// Creates the best available detector, preferring the platform capability.
///
/// The heuristic detector is always constructed so a failing platform
/// backend can be replaced mid-session. Logs which backend is selected.
pub fn create_detector(
    platform: Option<Box<dyn PlatformFaceDetector>>,
    tuning: HeuristicTuning,
) -> Box<dyn FaceDetector> {
    let fallback = HeuristicFaceDetector::new(tuning);
    match platform {
        Some(inner) => {
            log::info!("Using platform face detector with heuristic fallback");
            Box::new(FallbackFaceDetector::new(
                Some(CooldownDetector::with_default_cooldown(inner)),
                fallback,
            ))
        }
        None => {
            log::info!("No platform face detector available, using heuristic detection");
            Box::new(fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection_result::BoundingBox;
    use crate::detection::domain::face_detector::PlatformError;

    struct ScriptedPlatform {
        responses: Vec<Result<Vec<DetectionResult>, &'static str>>,
    }

    impl PlatformFaceDetector for ScriptedPlatform {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<DetectionResult>, PlatformError> {
            if self.responses.is_empty() {
                return Ok(Vec::new());
            }
            self.responses.remove(0).map_err(Into::into)
        }
    }

    fn platform_face() -> DetectionResult {
        DetectionResult::new(BoundingBox::new(1.0, 1.0, 5.0, 5.0), Vec::new())
    }

    /// 160x120 frame with a pale skin patch the heuristic detector finds.
    fn skin_frame() -> Frame {
        let mut frame = Frame::filled(160, 120, [30, 30, 30], 0);
        {
            let mut arr = frame.as_ndarray_mut();
            for y in 30..90 {
                for x in 40..120 {
                    arr[[y, x, 0]] = 240;
                    arr[[y, x, 1]] = 228;
                    arr[[y, x, 2]] = 200;
                }
            }
        }
        frame
    }

    #[test]
    fn test_no_platform_uses_heuristic() {
        let mut detector = create_detector(None, HeuristicTuning::default());
        assert_eq!(detector.name(), "heuristic");
        assert_eq!(detector.detect(&skin_frame()).len(), 1);
    }

    #[test]
    fn test_platform_results_pass_through() {
        let platform = ScriptedPlatform {
            responses: vec![Ok(vec![platform_face()])],
        };
        let mut detector = create_detector(Some(Box::new(platform)), HeuristicTuning::default());
        assert_eq!(detector.name(), "fallback");
        assert_eq!(detector.detect(&skin_frame()), vec![platform_face()]);
    }

    #[test]
    fn test_platform_failure_switches_to_heuristic_on_next_frame() {
        let platform = ScriptedPlatform {
            responses: vec![Err("not allowed")],
        };
        let cooldown = CooldownDetector::with_default_cooldown(Box::new(platform));
        let mut detector =
            FallbackFaceDetector::new(Some(cooldown), HeuristicFaceDetector::default());
        assert_eq!(detector.active_backend(), "platform");

        assert!(detector.detect(&skin_frame()).is_empty());
        assert_eq!(detector.active_backend(), "heuristic");

        let faces = detector.detect(&skin_frame());
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].bounding_box, BoundingBox::new(24.0, 15.0, 112.0, 90.0));
    }

    #[test]
    fn test_without_platform_active_backend_is_heuristic() {
        let detector = FallbackFaceDetector::new(None, HeuristicFaceDetector::default());
        assert_eq!(detector.active_backend(), "heuristic");
    }
}
