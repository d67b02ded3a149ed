use crate::{DetectionFeed, SessionConfig, SessionError};
use limn_pose::{PoseEstimator, Skeleton};
use limn_render::{FrameRenderer, RenderStats, Surface};
use limn_video::{CaptureSource, FrameSender, MediaStream, VideoFrame, frame_channel};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Shows a rendered surface somewhere, e.g. a window.
pub trait Presenter<S: Surface + ?Sized> {
    /// `false` ends the render loop.
    fn is_open(&self) -> bool;

    fn present(&mut self, surface: &S) -> Result<(), SessionError>;
}

/// What teardown released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub estimator_stopped: bool,
    /// Tracks the stream held, all of which are now stopped.
    pub tracks: usize,
    /// Tracks that were still producing when stopped.
    pub live_tracks: usize,
    pub surface_released: bool,
}

/// A running camera + estimator + surface pipeline.
///
/// Teardown happens exactly once, on `shutdown` or on drop, and always in
/// the same order: the estimator stops, then every capture track, then the
/// surface is released.
pub struct Session<E: PoseEstimator, S: Surface> {
    estimator: E,
    stream: MediaStream,
    surface: S,
    feed: DetectionFeed,
    frames: FrameSender,
    frame: Option<Arc<VideoFrame>>,
    skeleton: Skeleton,
    renderer: FrameRenderer,
    frame_period: Duration,
    torn_down: bool,
}

impl<E: PoseEstimator, S: Surface> std::fmt::Debug for Session<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("stream", &self.stream)
            .field("detections", &self.feed.events())
            .field("has_frame", &self.frame.is_some())
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

impl<E: PoseEstimator, S: Surface> Session<E, S> {
    /// Request the camera and start detection on a loaded estimator.
    ///
    /// If the camera is refused or detection cannot start, everything acquired
    /// so far is released before the error is returned.
    pub async fn start<C: CaptureSource>(
        config: &SessionConfig,
        source: &mut C,
        mut estimator: E,
        mut surface: S,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let mut stream = match source.request_stream(&config.capture).await {
            Ok(stream) => stream,
            Err(e) => {
                log::error!("camera request failed: {}", e);
                estimator.detect_stop();
                surface.release();
                return Err(SessionError::Capture(e));
            }
        };
        log::info!(
            "camera granted: {}x{}, {} track(s)",
            stream.size().x,
            stream.size().y,
            stream.tracks().len()
        );

        let skeleton = estimator.skeleton();
        let (frames, frames_rx) = frame_channel();
        let feed = match DetectionFeed::attach(&mut estimator, frames_rx) {
            Ok(feed) => feed,
            Err(e) => {
                log::error!("failed to start detection: {}", e);
                estimator.detect_stop();
                stream.stop();
                surface.release();
                return Err(SessionError::Estimator(e));
            }
        };

        Ok(Self {
            estimator,
            stream,
            surface,
            feed,
            frames,
            frame: None,
            skeleton,
            renderer: FrameRenderer::new(config.overlay.policy()),
            frame_period: config.frame_period(),
            torn_down: false,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn feed(&self) -> &DetectionFeed {
        &self.feed
    }

    /// One display tick: take the newest frame, offer it to the estimator,
    /// then draw it with the latest poses.
    pub fn tick(&mut self) -> Result<RenderStats, SessionError> {
        if let Some(frame) = self.stream.try_latest()? {
            let frame = Arc::new(frame);
            self.frames.send_replace(Some(Arc::clone(&frame)));
            self.frame = Some(frame);
        }

        let detections = self.feed.latest();
        Ok(self.renderer.render(
            &mut self.surface,
            self.frame.as_deref(),
            &detections.poses,
            &self.skeleton,
        ))
    }

    /// Tick at the configured rate until the presenter closes or an error occurs.
    /// Teardown runs either way.
    pub async fn run<P: Presenter<S> + ?Sized>(
        mut self,
        presenter: &mut P,
    ) -> Result<TeardownReport, SessionError> {
        let mut interval = tokio::time::interval(self.frame_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut ticks = 0u64;
        while presenter.is_open() {
            interval.tick().await;
            if let Err(e) = self.step(presenter) {
                log::error!("session stopped after {} ticks: {}", ticks, e);
                self.teardown();
                return Err(e);
            }
            ticks += 1;
        }
        log::info!("presenter closed after {} ticks", ticks);
        Ok(self.shutdown())
    }

    fn step<P: Presenter<S> + ?Sized>(&mut self, presenter: &mut P) -> Result<(), SessionError> {
        self.tick()?;
        presenter.present(&self.surface)
    }

    pub fn shutdown(mut self) -> TeardownReport {
        self.teardown()
    }

    fn teardown(&mut self) -> TeardownReport {
        if self.torn_down {
            return TeardownReport::default();
        }
        self.torn_down = true;

        self.estimator.detect_stop();
        let live_tracks = self.stream.stop();
        self.surface.release();

        self.frame = None;
        self.frames.send_replace(None);

        let report = TeardownReport {
            estimator_stopped: true,
            tracks: self.stream.tracks().len(),
            live_tracks,
            surface_released: true,
        };
        log::info!(
            "session torn down: {} track(s) stopped, {} were live",
            report.tracks,
            report.live_tracks
        );
        report
    }
}

impl<E: PoseEstimator, S: Surface> Drop for Session<E, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
