#![allow(dead_code)]

use limn_base::Vec2;
use limn_pose::{EstimatorError, Pose, PoseCallback, PoseEstimator, Skeleton};
use limn_render::{Color, DrawList, Surface, TextStyle};
use limn_video::{
    CaptureError, CaptureSource, FrameReceiver, FrameResult, MediaStream, Track, VideoConstraints,
    VideoFrame,
};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Shared record of teardown events, in order.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub struct MockTrack {
    pub label: String,
    pub live: bool,
    pub log: EventLog,
}

impl Track for MockTrack {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.log.lock().unwrap().push(format!("track:{}", self.label));
        }
    }
}

/// Hands out one stream with `tracks` tracks, or the configured error.
pub struct MockSource {
    pub tracks: usize,
    pub error: Option<CaptureError>,
    pub log: EventLog,
    pub frames: Option<mpsc::Sender<FrameResult>>,
    pub requests: usize,
}

impl MockSource {
    pub fn new(tracks: usize, log: &EventLog) -> Self {
        Self {
            tracks,
            error: None,
            log: Arc::clone(log),
            frames: None,
            requests: 0,
        }
    }

    pub fn failing(error: CaptureError, log: &EventLog) -> Self {
        Self {
            error: Some(error),
            ..Self::new(0, log)
        }
    }
}

impl CaptureSource for MockSource {
    async fn request_stream(
        &mut self,
        constraints: &VideoConstraints,
    ) -> Result<MediaStream, CaptureError> {
        self.requests += 1;
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        let (tx, rx) = mpsc::channel(8);
        self.frames = Some(tx);
        let tracks: Vec<Box<dyn Track>> = (0..self.tracks)
            .map(|i| {
                Box::new(MockTrack {
                    label: i.to_string(),
                    live: true,
                    log: Arc::clone(&self.log),
                }) as Box<dyn Track>
            })
            .collect();
        let size = Vec2::new(constraints.width() as usize, constraints.height() as usize);
        Ok(MediaStream::new(size, rx, tracks))
    }
}

/// Handle the test keeps to drive a `MockEstimator`.
#[derive(Clone)]
pub struct EstimatorHandle {
    callback: Arc<Mutex<Option<PoseCallback>>>,
    frames: Arc<Mutex<Option<FrameReceiver>>>,
    pub starts: Arc<Mutex<usize>>,
}

impl EstimatorHandle {
    /// Deliver a detection, as the estimator's own task would.
    pub fn emit(&self, poses: Vec<Pose>) -> bool {
        match self.callback.lock().unwrap().as_mut() {
            Some(callback) => {
                callback(poses);
                true
            }
            None => false,
        }
    }

    pub fn latest_frame(&self) -> Option<Arc<VideoFrame>> {
        self.frames
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|rx| rx.borrow().clone())
    }

    pub fn starts(&self) -> usize {
        *self.starts.lock().unwrap()
    }
}

pub struct MockEstimator {
    skeleton: Skeleton,
    handle: EstimatorHandle,
    fail_start: bool,
    log: EventLog,
}

impl MockEstimator {
    pub fn new(skeleton: Skeleton, log: &EventLog) -> (Self, EstimatorHandle) {
        let handle = EstimatorHandle {
            callback: Arc::new(Mutex::new(None)),
            frames: Arc::new(Mutex::new(None)),
            starts: Arc::new(Mutex::new(0)),
        };
        let estimator = Self {
            skeleton,
            handle: handle.clone(),
            fail_start: false,
            log: Arc::clone(log),
        };
        (estimator, handle)
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }
}

impl PoseEstimator for MockEstimator {
    fn skeleton(&self) -> Skeleton {
        self.skeleton.clone()
    }

    fn detect_start(
        &mut self,
        frames: FrameReceiver,
        on_poses: PoseCallback,
    ) -> Result<(), EstimatorError> {
        if self.fail_start {
            return Err(EstimatorError::Protocol("detector went away".to_string()));
        }
        let mut starts = self.handle.starts.lock().unwrap();
        if *starts > 0 {
            return Err(EstimatorError::AlreadyStarted);
        }
        *starts += 1;
        *self.handle.callback.lock().unwrap() = Some(on_poses);
        *self.handle.frames.lock().unwrap() = Some(frames);
        Ok(())
    }

    fn detect_stop(&mut self) {
        self.handle.callback.lock().unwrap().take();
        self.log.lock().unwrap().push("estimator".to_string());
    }
}

/// A `DrawList` that also logs its release.
pub struct LoggedSurface {
    pub list: DrawList,
    log: EventLog,
}

impl LoggedSurface {
    pub fn new(log: &EventLog) -> Self {
        Self {
            list: DrawList::new(Vec2::new(640, 480)),
            log: Arc::clone(log),
        }
    }
}

impl Surface for LoggedSurface {
    fn size(&self) -> Vec2<usize> {
        self.list.size()
    }

    fn blit(&mut self, frame: &VideoFrame, at: Vec2<i32>) {
        self.list.blit(frame, at);
    }

    fn fill_ellipse(&mut self, center: Vec2<f32>, diameter: Vec2<f32>, color: Color) {
        self.list.fill_ellipse(center, diameter, color);
    }

    fn line(&mut self, from: Vec2<f32>, to: Vec2<f32>, weight: f32, color: Color) {
        self.list.line(from, to, weight, color);
    }

    fn text(&mut self, text: &str, at: Vec2<f32>, style: &TextStyle) {
        self.list.text(text, at, style);
    }

    fn release(&mut self) {
        if !self.list.is_released() {
            self.log.lock().unwrap().push("surface".to_string());
        }
        self.list.release();
    }
}

pub fn test_frame() -> VideoFrame {
    VideoFrame::filled(Vec2::new(640, 480), [30, 30, 30])
}
