use std::time::{Duration, Instant};

use crate::detection::domain::detection_result::DetectionResult;
use crate::detection::domain::face_detector::{FaceDetector, PlatformFaceDetector};
use crate::shared::constants::PLATFORM_DETECT_COOLDOWN_MS;
use crate::shared::frame::Frame;

/// Decorator that throttles a platform detector and disables it on failure.
///
/// Within `cooldown` of the last real detection the cached faces are
/// returned unchanged. The first backend error clears the cache and marks
/// the detector unavailable for the rest of the session.
pub struct CooldownDetector {
    inner: Box<dyn PlatformFaceDetector>,
    cooldown: Duration,
    last_detection: Option<Instant>,
    faces: Vec<DetectionResult>,
    available: bool,
}

impl CooldownDetector {
    pub fn new(inner: Box<dyn PlatformFaceDetector>, cooldown: Duration) -> Self {
        Self {
            inner,
            cooldown,
            last_detection: None,
            faces: Vec::new(),
            available: true,
        }
    }

    pub fn with_default_cooldown(inner: Box<dyn PlatformFaceDetector>) -> Self {
        Self::new(inner, Duration::from_millis(PLATFORM_DETECT_COOLDOWN_MS))
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Detection against an explicit clock reading.
    pub fn detect_at(&mut self, frame: &Frame, now: Instant) -> Vec<DetectionResult> {
        if !self.available || frame.width() == 0 || frame.height() == 0 {
            return self.faces.clone();
        }

        if let Some(last) = self.last_detection {
            if now.saturating_duration_since(last) < self.cooldown {
                return self.faces.clone();
            }
        }

        match self.inner.detect(frame) {
            Ok(faces) => {
                self.faces = faces;
                self.last_detection = Some(now);
            }
            Err(e) => {
                log::warn!("Platform face detection failed, disabling it: {e}");
                self.faces.clear();
                self.available = false;
            }
        }
        self.faces.clone()
    }
}

impl FaceDetector for CooldownDetector {
    fn detect(&mut self, frame: &Frame) -> Vec<DetectionResult> {
        self.detect_at(frame, Instant::now())
    }

    fn name(&self) -> &'static str {
        "platform"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection_result::BoundingBox;
    use crate::detection::domain::face_detector::PlatformError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Returns a box whose `left` equals the call number; fails on `fail_on`.
    struct CountingPlatform {
        calls: Arc<AtomicUsize>,
        fail_on: Option<usize>,
    }

    impl PlatformFaceDetector for CountingPlatform {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<DetectionResult>, PlatformError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if Some(n) == self.fail_on {
                return Err("capability revoked".into());
            }
            Ok(vec![DetectionResult::new(
                BoundingBox::new(n as f64, 0.0, 10.0, 10.0),
                Vec::new(),
            )])
        }
    }

    fn detector(fail_on: Option<usize>) -> (CooldownDetector, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = CountingPlatform {
            calls: calls.clone(),
            fail_on,
        };
        (
            CooldownDetector::new(Box::new(inner), Duration::from_millis(120)),
            calls,
        )
    }

    fn frame() -> Frame {
        Frame::filled(16, 16, [0, 0, 0], 0)
    }

    #[test]
    fn test_first_call_hits_backend() {
        let (mut d, calls) = detector(None);
        let faces = d.detect_at(&frame(), Instant::now());
        assert_eq!(faces.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_calls_within_cooldown_reuse_cache() {
        let (mut d, calls) = detector(None);
        let t0 = Instant::now();
        let first = d.detect_at(&frame(), t0);
        let second = d.detect_at(&frame(), t0 + Duration::from_millis(50));
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_call_after_cooldown_refreshes() {
        let (mut d, calls) = detector(None);
        let t0 = Instant::now();
        d.detect_at(&frame(), t0);
        let later = d.detect_at(&frame(), t0 + Duration::from_millis(120));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(later[0].bounding_box.left, 1.0);
    }

    #[test]
    fn test_failure_clears_and_disables() {
        let (mut d, calls) = detector(Some(1));
        let t0 = Instant::now();
        assert_eq!(d.detect_at(&frame(), t0).len(), 1);

        let failed = d.detect_at(&frame(), t0 + Duration::from_millis(200));
        assert!(failed.is_empty());
        assert!(!d.is_available());

        let after = d.detect_at(&frame(), t0 + Duration::from_millis(400));
        assert!(after.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_zero_sized_frame_skips_backend() {
        let (mut d, calls) = detector(None);
        let empty = Frame::new(Vec::new(), 0, 0, 3, 0);
        assert!(d.detect_at(&empty, Instant::now()).is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_default_cooldown() {
        let (d, _) = detector(None);
        let inner = d.inner;
        let d = CooldownDetector::with_default_cooldown(inner);
        assert_eq!(d.cooldown, Duration::from_millis(120));
    }
}
