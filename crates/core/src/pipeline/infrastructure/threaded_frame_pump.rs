use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};

use crate::cosmetics::domain::cosmetic_renderer::CosmeticRenderer;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::frame_pump::{FramePump, PumpConfig, PumpSummary};
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::FrameSource;

const DEFAULT_CHANNEL_CAPACITY: usize = 4;

type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Runs decoding and encoding on worker threads around the caller's thread.
///
/// Layout: `reader → main [detect + render] → writer`
///
/// Detection stays on the calling thread so the detector's state is
/// updated in frame order without synchronisation.
pub struct ThreadedFramePump {
    channel_capacity: usize,
}

impl ThreadedFramePump {
    pub fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            channel_capacity: channel_capacity.max(1),
        }
    }
}

impl Default for ThreadedFramePump {
    fn default() -> Self {
        Self::new()
    }
}

impl FramePump for ThreadedFramePump {
    fn run(
        &self,
        source: Box<dyn FrameSource>,
        sink: Box<dyn FrameSink>,
        detector: &mut dyn FaceDetector,
        renderer: &dyn CosmeticRenderer,
        metadata: &SourceMetadata,
        config: PumpConfig,
    ) -> Result<PumpSummary, Box<dyn std::error::Error>> {
        let cap = self.channel_capacity;
        let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Result<Frame, SendError>>(cap);
        let (write_tx, write_rx) = crossbeam_channel::bounded::<Frame>(cap);

        let reader_handle = spawn_reader(source, frame_tx, config.cancelled.clone());
        let writer_handle = spawn_writer(sink, write_rx);

        let mut summary = PumpSummary::default();
        let main_error = run_main_loop(
            frame_rx,
            &write_tx,
            detector,
            renderer,
            metadata.total_frames,
            &config,
            &mut summary,
        );

        if main_error.is_some() {
            config.cancelled.store(true, Ordering::Relaxed);
        }
        drop(write_tx);

        join_threads(reader_handle, writer_handle, main_error)?;
        log::info!(
            "Processed {} frames, {} with faces",
            summary.frames,
            summary.frames_with_faces
        );
        Ok(summary)
    }
}

fn spawn_reader(
    mut source: Box<dyn FrameSource>,
    frame_tx: Sender<Result<Frame, SendError>>,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<Box<dyn FrameSource>> {
    std::thread::spawn(move || {
        for frame_result in source.frames() {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let mapped = frame_result.map_err(|e| -> SendError { Box::new(e) });
            if frame_tx.send(mapped).is_err() {
                break;
            }
        }
        source
    })
}

fn spawn_writer(
    mut sink: Box<dyn FrameSink>,
    write_rx: Receiver<Frame>,
) -> JoinHandle<Result<Box<dyn FrameSink>, SendError>> {
    std::thread::spawn(move || {
        for frame in write_rx {
            sink.write(&frame)
                .map_err(|e| -> SendError { e.to_string().into() })?;
        }
        Ok(sink)
    })
}

/// Receives decoded frames, detects and renders them in order, and forwards
/// them to the writer. Returns the first error, if any.
fn run_main_loop(
    frame_rx: Receiver<Result<Frame, SendError>>,
    write_tx: &Sender<Frame>,
    detector: &mut dyn FaceDetector,
    renderer: &dyn CosmeticRenderer,
    total_frames: usize,
    config: &PumpConfig,
    summary: &mut PumpSummary,
) -> Option<Box<dyn std::error::Error>> {
    for frame_result in frame_rx {
        if config.cancelled.load(Ordering::Relaxed) {
            break;
        }

        let mut frame = match frame_result {
            Ok(frame) => frame,
            Err(e) => {
                let err: Box<dyn std::error::Error> = e;
                return Some(err);
            }
        };

        let faces = detector.detect(&frame);
        renderer.render(&mut frame, &faces);

        summary.frames += 1;
        summary.faces += faces.len();
        if !faces.is_empty() {
            summary.frames_with_faces += 1;
        }

        if write_tx.send(frame).is_err() {
            // The writer thread has stopped; its own error is reported on join.
            break;
        }

        if let Some(ref callback) = config.on_progress {
            if !callback(summary.frames, total_frames) {
                return Some("Cancelled".into());
            }
        }
    }
    None
}

/// Joins the worker threads and coalesces the first error encountered.
fn join_threads(
    reader_handle: JoinHandle<Box<dyn FrameSource>>,
    writer_handle: JoinHandle<Result<Box<dyn FrameSink>, SendError>>,
    mut first_error: Option<Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    fn set_if_none(slot: &mut Option<Box<dyn std::error::Error>>, err: Box<dyn std::error::Error>) {
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    match reader_handle.join() {
        Ok(mut source) => source.close(),
        Err(_) => set_if_none(&mut first_error, "Reader thread panicked".into()),
    }

    match writer_handle.join() {
        Ok(Ok(mut sink)) => {
            if let Err(e) = sink.close() {
                set_if_none(&mut first_error, e);
            }
        }
        Ok(Err(e)) => set_if_none(&mut first_error, e.to_string().into()),
        Err(_) => set_if_none(&mut first_error, "Writer thread panicked".into()),
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection_result::{BoundingBox, DetectionResult};
    use crate::video::domain::frame_source::FrameSourceError;
    use std::sync::Mutex;

    // ── Stubs ──

    struct StubSource {
        frames: Vec<Frame>,
        fail_at: Option<usize>,
        closed: Arc<Mutex<bool>>,
    }

    impl FrameSource for StubSource {
        fn open(&mut self) -> Result<SourceMetadata, FrameSourceError> {
            Ok(metadata(self.frames.len()))
        }

        fn frames(&mut self) -> Box<dyn Iterator<Item = Result<Frame, FrameSourceError>> + '_> {
            let fail_at = self.fail_at;
            Box::new(self.frames.drain(..).map(move |f| {
                if Some(f.index()) == fail_at {
                    Err(FrameSourceError::NotOpened)
                } else {
                    Ok(f)
                }
            }))
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    struct StubSink {
        written: Arc<Mutex<Vec<Frame>>>,
        closed: Arc<Mutex<bool>>,
        fail: bool,
    }

    impl FrameSink for StubSink {
        fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail {
                return Err("disk full".into());
            }
            self.written.lock().unwrap().push(frame.clone());
            Ok(())
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            *self.closed.lock().unwrap() = true;
            Ok(())
        }
    }

    /// Reports a face on even frames and records the order it saw.
    struct EvenFrameDetector {
        seen: Vec<usize>,
    }

    impl FaceDetector for EvenFrameDetector {
        fn detect(&mut self, frame: &Frame) -> Vec<DetectionResult> {
            self.seen.push(frame.index());
            if frame.index() % 2 == 0 {
                vec![DetectionResult::new(
                    BoundingBox::new(0.0, 0.0, 2.0, 2.0),
                    Vec::new(),
                )]
            } else {
                Vec::new()
            }
        }

        fn name(&self) -> &'static str {
            "even"
        }
    }

    /// Writes the face count into the first byte of the frame.
    struct MarkingRenderer;

    impl CosmeticRenderer for MarkingRenderer {
        fn render(&self, frame: &mut Frame, faces: &[DetectionResult]) {
            frame.data_mut()[0] = 100 + faces.len() as u8;
        }
    }

    fn metadata(total: usize) -> SourceMetadata {
        SourceMetadata {
            width: 4,
            height: 4,
            total_frames: total,
            source_path: None,
        }
    }

    fn frames(n: usize) -> Vec<Frame> {
        (0..n).map(|i| Frame::filled(4, 4, [0, 0, 0], i)).collect()
    }

    struct Harness {
        source: StubSource,
        sink: StubSink,
        written: Arc<Mutex<Vec<Frame>>>,
        source_closed: Arc<Mutex<bool>>,
        sink_closed: Arc<Mutex<bool>>,
    }

    fn harness(n: usize) -> Harness {
        let written = Arc::new(Mutex::new(Vec::new()));
        let source_closed = Arc::new(Mutex::new(false));
        let sink_closed = Arc::new(Mutex::new(false));
        Harness {
            source: StubSource {
                frames: frames(n),
                fail_at: None,
                closed: source_closed.clone(),
            },
            sink: StubSink {
                written: written.clone(),
                closed: sink_closed.clone(),
                fail: false,
            },
            written,
            source_closed,
            sink_closed,
        }
    }

    fn run(
        h: Harness,
        detector: &mut EvenFrameDetector,
        config: PumpConfig,
    ) -> (Result<PumpSummary, Box<dyn std::error::Error>>, Vec<Frame>, bool, bool) {
        let total = h.source.frames.len();
        let result = ThreadedFramePump::with_capacity(2).run(
            Box::new(h.source),
            Box::new(h.sink),
            detector,
            &MarkingRenderer,
            &metadata(total),
            config,
        );
        let written = h.written.lock().unwrap().clone();
        let source_closed = *h.source_closed.lock().unwrap();
        let sink_closed = *h.sink_closed.lock().unwrap();
        (result, written, source_closed, sink_closed)
    }

    // ── Happy path ──

    #[test]
    fn test_all_frames_rendered_and_written_in_order() {
        let mut detector = EvenFrameDetector { seen: Vec::new() };
        let (result, written, source_closed, sink_closed) =
            run(harness(7), &mut detector, PumpConfig::default());

        assert_eq!(
            result.unwrap(),
            PumpSummary {
                frames: 7,
                faces: 4,
                frames_with_faces: 4
            }
        );
        assert_eq!(detector.seen, (0..7).collect::<Vec<_>>());
        let indices: Vec<usize> = written.iter().map(|f| f.index()).collect();
        assert_eq!(indices, (0..7).collect::<Vec<_>>());
        assert_eq!(written[0].data()[0], 101);
        assert_eq!(written[1].data()[0], 100);
        assert!(source_closed);
        assert!(sink_closed);
    }

    #[test]
    fn test_empty_source() {
        let mut detector = EvenFrameDetector { seen: Vec::new() };
        let (result, written, _, sink_closed) =
            run(harness(0), &mut detector, PumpConfig::default());
        assert_eq!(result.unwrap(), PumpSummary::default());
        assert!(written.is_empty());
        assert!(sink_closed);
    }

    #[test]
    fn test_progress_reports_each_frame() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let calls_clone = calls.clone();
        let config = PumpConfig {
            on_progress: Some(Box::new(move |done: usize, total: usize| {
                calls_clone.lock().unwrap().push((done, total));
                true
            })),
            ..Default::default()
        };
        let mut detector = EvenFrameDetector { seen: Vec::new() };
        run(harness(3), &mut detector, config).0.unwrap();
        assert_eq!(*calls.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
    }

    // ── Cancellation and errors ──

    #[test]
    fn test_progress_false_cancels() {
        let config = PumpConfig {
            on_progress: Some(Box::new(|done: usize, _: usize| done < 2)),
            ..Default::default()
        };
        let mut detector = EvenFrameDetector { seen: Vec::new() };
        let (result, _, source_closed, sink_closed) = run(harness(10), &mut detector, config);
        assert_eq!(result.unwrap_err().to_string(), "Cancelled");
        assert_eq!(detector.seen.len(), 2);
        assert!(source_closed);
        assert!(sink_closed);
    }

    #[test]
    fn test_pre_cancelled_processes_nothing() {
        let config = PumpConfig::default();
        config.cancelled.store(true, Ordering::Relaxed);
        let mut detector = EvenFrameDetector { seen: Vec::new() };
        let (result, written, _, _) = run(harness(5), &mut detector, config);
        assert_eq!(result.unwrap().frames, 0);
        assert!(written.is_empty());
    }

    #[test]
    fn test_source_error_propagates() {
        let mut h = harness(5);
        h.source.fail_at = Some(2);
        let mut detector = EvenFrameDetector { seen: Vec::new() };
        let (result, written, _, _) = run(h, &mut detector, PumpConfig::default());
        assert!(result.is_err());
        assert_eq!(written.len(), 2);
        assert_eq!(detector.seen, vec![0, 1]);
    }

    #[test]
    fn test_sink_error_propagates() {
        let mut h = harness(5);
        h.sink.fail = true;
        let mut detector = EvenFrameDetector { seen: Vec::new() };
        let (result, _, _, _) = run(h, &mut detector, PumpConfig::default());
        assert!(result.unwrap_err().to_string().contains("disk full"));
    }
}
