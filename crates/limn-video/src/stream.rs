use crate::{CaptureError, VideoFrame};
use limn_base::Vec2;
use tokio::sync::mpsc::{self, error::TryRecvError};

pub type FrameResult = Result<VideoFrame, CaptureError>;

/// One producer of frames inside a `MediaStream`, typically a device worker.
pub trait Track: Send {
    fn label(&self) -> &str;

    /// `false` once the track has been stopped or its producer has exited.
    fn is_live(&self) -> bool;

    /// Stop producing and release the underlying hardware. Must be idempotent.
    fn stop(&mut self);
}

/// A live capture: decoded frames plus the tracks feeding them.
///
/// Dropping the stream stops every track.
pub struct MediaStream {
    size: Vec2<usize>,
    receiver: mpsc::Receiver<FrameResult>,
    tracks: Vec<Box<dyn Track>>,
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("size", &self.size)
            .field("tracks", &self.tracks.iter().map(|t| t.label()).collect::<Vec<_>>())
            .finish()
    }
}

impl MediaStream {
    pub fn new(
        size: Vec2<usize>,
        receiver: mpsc::Receiver<FrameResult>,
        tracks: Vec<Box<dyn Track>>,
    ) -> Self {
        Self {
            size,
            receiver,
            tracks,
        }
    }

    /// Frame size the source settled on.
    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn tracks(&self) -> &[Box<dyn Track>] {
        &self.tracks
    }

    pub fn live_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_live()).count()
    }

    /// Wait for the next frame.
    pub async fn recv(&mut self) -> FrameResult {
        self.receiver
            .recv()
            .await
            .unwrap_or_else(|| Err(CaptureError::Channel("stream ended".to_string())))
    }

    /// Drain everything buffered and keep only the newest frame.
    ///
    /// `Ok(None)` means no new frame arrived since the last call. A capture
    /// error anywhere in the backlog is returned immediately.
    pub fn try_latest(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(Ok(frame)) => latest = Some(frame),
                Ok(Err(e)) => return Err(e),
                Err(TryRecvError::Empty) => return Ok(latest),
                Err(TryRecvError::Disconnected) => {
                    return match latest {
                        Some(frame) => Ok(Some(frame)),
                        None => Err(CaptureError::Channel("stream ended".to_string())),
                    };
                }
            }
        }
    }

    /// Stop every track. Returns how many tracks were still live.
    pub fn stop(&mut self) -> usize {
        // close first so producers blocked on a full channel wake up
        self.receiver.close();

        let mut stopped = 0;
        for track in &mut self.tracks {
            if track.is_live() {
                stopped += 1;
            }
            track.stop();
            log::debug!("stopped track {}", track.label());
        }
        stopped
    }
}

impl Drop for MediaStream {
    fn drop(&mut self) {
        self.stop();
    }
}
