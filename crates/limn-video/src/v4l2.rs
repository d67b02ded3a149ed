use crate::{
    CaptureError, CaptureSource, FacingMode, FrameResult, MediaStream, Track, VideoConstraints,
    VideoFrame,
};
use limn_base::Vec2;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

// how many /dev/videoN nodes to scan when no device is pinned
const MAX_SCANNED_DEVICES: usize = 16;

/// V4L2 webcams, one MJPEG track per stream.
#[derive(Debug, Default)]
pub struct V4l2Source;

impl V4l2Source {
    pub fn new() -> Self {
        Self
    }
}

impl CaptureSource for V4l2Source {
    async fn request_stream(
        &mut self,
        constraints: &VideoConstraints,
    ) -> Result<MediaStream, CaptureError> {
        let path = match constraints.device() {
            Some(path) => path.to_string(),
            None => find_default_device()
                .ok_or_else(|| CaptureError::NotFound("no /dev/video* device".to_string()))?,
        };
        if constraints.facing_mode() != FacingMode::User {
            log::debug!("V4L2 has no facing mode, using {} as-is", path);
        }

        let buffer_count = constraints.buffer_count() as usize;
        let (tx, rx) = mpsc::channel(buffer_count);
        let cancel = Arc::new(AtomicBool::new(false));

        // The device is opened on the worker thread; the outcome comes back
        // through a oneshot so open failures reject the request itself.
        let (init_tx, init_rx) = oneshot::channel::<Result<(String, Vec2<usize>), CaptureError>>();
        let worker_cancel = Arc::clone(&cancel);
        let worker_constraints = constraints.clone();
        let worker_path = path.clone();
        let handle = thread::spawn(move || {
            let device = match open_device(&worker_path, &worker_constraints) {
                Ok((device, label, size)) => {
                    let _ = init_tx.send(Ok((label, size)));
                    device
                }
                Err(e) => {
                    let _ = init_tx.send(Err(e));
                    return;
                }
            };
            if let Err(e) = capture_loop(device, &tx, buffer_count, &worker_cancel) {
                log::error!("capture worker for {} failed: {}", worker_path, e);
                let _ = tx.blocking_send(Err(e));
            }
        });

        let (label, size) = init_rx
            .await
            .map_err(|_| CaptureError::Device("capture worker died during open".to_string()))??;
        log::info!("camera {} ({}) streaming at {}x{}", label, path, size.x, size.y);

        let track = WorkerTrack {
            label,
            cancel,
            handle: Some(handle),
        };
        Ok(MediaStream::new(size, rx, vec![Box::new(track)]))
    }
}

fn find_default_device() -> Option<String> {
    (0..MAX_SCANNED_DEVICES)
        .map(|idx| format!("/dev/video{idx}"))
        .find(|candidate| Path::new(candidate).exists())
}

fn open_device(
    path: &str,
    constraints: &VideoConstraints,
) -> Result<(Device, String, Vec2<usize>), CaptureError> {
    let device = Device::with_path(path)?;
    let label = device
        .query_caps()
        .map(|caps| caps.card)
        .unwrap_or_else(|_| path.to_string());

    // ask for MJPEG at the ideal size; the driver may pick a nearby one
    let requested = Format::new(constraints.width(), constraints.height(), FourCC::new(b"MJPG"));
    let format = Capture::set_format(&device, &requested)?;
    if format.fourcc != FourCC::new(b"MJPG") {
        return Err(CaptureError::Device(format!(
            "{} does not support MJPEG (offered {})",
            path, format.fourcc
        )));
    }

    let params = v4l::video::capture::Parameters::with_fps(constraints.fps());
    Capture::set_params(&device, &params)?;

    let size = Vec2::new(format.width as usize, format.height as usize);
    Ok((device, label, size))
}

fn capture_loop(
    device: Device,
    tx: &mpsc::Sender<FrameResult>,
    buffer_count: usize,
    cancel: &AtomicBool,
) -> Result<(), CaptureError> {
    let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffer_count as u32)?;

    while !cancel.load(Ordering::Relaxed) {
        let (buf, _meta) = CaptureStream::next(&mut stream)?;
        let frame = VideoFrame::decode_jpeg(buf)?;
        if tx.blocking_send(Ok(frame)).is_err() {
            // stream closed by the consumer
            break;
        }
    }
    Ok(())
}

/// The capture thread behind a V4L2 stream.
struct WorkerTrack {
    label: String,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Track for WorkerTrack {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_live(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn stop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            // device and mmap buffers are released when the thread returns
            let _ = handle.join();
        }
    }
}
