//! Pose estimation in a child process.
//!
//! The detector is any program speaking newline-delimited JSON on stdio:
//!
//! - host → child: `{"type":"config", ...}` once, then per frame a header
//!   `{"type":"frame","seq":n,"width":w,"height":h,"len":bytes}` followed by
//!   `len` bytes of RGB8.
//! - child → host: `{"type":"ready","skeleton":[[i,j],...]}` (skeleton optional)
//!   or `{"type":"error","message":...}` once the model has loaded or failed,
//!   then one detection line per inference.

use crate::{
    EstimatorConfig, EstimatorError, PoseCallback, PoseEstimator, Skeleton, poses_from_value,
};
use limn_video::{FrameReceiver, VideoFrame};
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Outgoing {
    Config(EstimatorConfig),
    Frame {
        seq: u64,
        width: usize,
        height: usize,
        len: usize,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Control {
    Ready {
        #[serde(default)]
        skeleton: Option<serde_json::Value>,
    },
    Error {
        message: String,
    },
}

impl Outgoing {
    /// The config as the detector should apply it, with the pose cap resolved.
    fn config(config: &EstimatorConfig) -> Self {
        Outgoing::Config(EstimatorConfig {
            max_poses: config.effective_max_poses(),
            ..config.clone()
        })
    }
}

type SharedCallback = Arc<Mutex<Option<PoseCallback>>>;

/// Runs an external detector program and relays its detections.
pub struct ProcessEstimator {
    program: String,
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<Lines<BufReader<ChildStdout>>>,
    skeleton: Skeleton,
    callback: SharedCallback,
    tasks: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for ProcessEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessEstimator")
            .field("program", &self.program)
            .field("skeleton", &self.skeleton.len())
            .field("running", &!self.tasks.is_empty())
            .finish()
    }
}

impl ProcessEstimator {
    /// Spawn `program`, send it `config` and wait until it reports the model as loaded.
    pub async fn load(
        program: &str,
        args: &[String],
        config: &EstimatorConfig,
    ) -> Result<Self, EstimatorError> {
        log::info!("starting pose detector {} {:?}", program, args);
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EstimatorError::Spawn(format!("{program}: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EstimatorError::Spawn("detector stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EstimatorError::Spawn("detector stdout unavailable".to_string()))?;
        let mut lines = BufReader::new(stdout).lines();

        write_message(&mut stdin, &Outgoing::config(config)).await?;

        let first = lines.next_line().await?.ok_or_else(|| {
            EstimatorError::ModelLoad("detector exited before reporting ready".to_string())
        })?;
        let skeleton = match serde_json::from_str::<Control>(&first)? {
            Control::Ready {
                skeleton: Some(value),
            } => Skeleton::from_json(&value)?,
            Control::Ready { skeleton: None } => Skeleton::for_model(config.model),
            Control::Error { message } => return Err(EstimatorError::ModelLoad(message)),
        };
        log::info!(
            "pose model ready: {:?} {:?}, {} bones",
            config.model,
            config.model_type,
            skeleton.len()
        );

        Ok(Self {
            program: program.to_string(),
            child,
            stdin: Some(stdin),
            stdout: Some(lines),
            skeleton,
            callback: Arc::new(Mutex::new(None)),
            tasks: Vec::new(),
        })
    }
}

impl PoseEstimator for ProcessEstimator {
    fn skeleton(&self) -> Skeleton {
        self.skeleton.clone()
    }

    fn detect_start(
        &mut self,
        frames: FrameReceiver,
        on_poses: PoseCallback,
    ) -> Result<(), EstimatorError> {
        let (Some(stdin), Some(lines)) = (self.stdin.take(), self.stdout.take()) else {
            return Err(EstimatorError::AlreadyStarted);
        };

        *self.callback.lock().unwrap_or_else(|e| e.into_inner()) = Some(on_poses);

        self.tasks.push(tokio::spawn(feed_frames(stdin, frames)));
        self.tasks
            .push(tokio::spawn(read_detections(lines, Arc::clone(&self.callback))));
        log::debug!("detection started on {}", self.program);
        Ok(())
    }

    fn detect_stop(&mut self) {
        // once the callback is gone, a reader mid-line has nothing to call
        self.callback
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if let Err(e) = self.child.start_kill() {
            // already exited
            log::debug!("detector {} not killed: {}", self.program, e);
        }
        log::debug!("detection stopped on {}", self.program);
    }
}

impl Drop for ProcessEstimator {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

async fn write_message(stdin: &mut ChildStdin, message: &Outgoing) -> Result<(), EstimatorError> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    stdin.write_all(&line).await?;
    Ok(())
}

async fn write_frame(stdin: &mut ChildStdin, seq: u64, frame: &VideoFrame) -> Result<(), EstimatorError> {
    let size = frame.size();
    let header = Outgoing::Frame {
        seq,
        width: size.x,
        height: size.y,
        len: frame.data().len(),
    };
    write_message(stdin, &header).await?;
    stdin.write_all(frame.data()).await?;
    stdin.flush().await?;
    Ok(())
}

async fn feed_frames(mut stdin: ChildStdin, mut frames: FrameReceiver) {
    let mut seq = 0u64;
    // frames replaced while a write is in flight are skipped
    while frames.changed().await.is_ok() {
        let Some(frame) = frames.borrow_and_update().clone() else {
            continue;
        };
        seq += 1;
        if let Err(e) = write_frame(&mut stdin, seq, &frame).await {
            log::warn!("stopped feeding frames to detector: {}", e);
            return;
        }
    }
}

async fn read_detections(mut lines: Lines<BufReader<ChildStdout>>, callback: SharedCallback) {
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                dispatch_line(&line, &callback);
            }
            Ok(None) => {
                log::warn!("detector closed its output");
                return;
            }
            Err(e) => {
                log::error!("failed to read detector output: {}", e);
                return;
            }
        }
    }
}

/// What a single output line turned out to be.
#[derive(Debug, PartialEq)]
enum LineOutcome {
    Detections(usize),
    Control,
    Skipped,
}

fn dispatch_line(line: &str, callback: &SharedCallback) -> LineOutcome {
    let line = line.trim();
    if line.is_empty() {
        return LineOutcome::Skipped;
    }

    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("ignoring detector output: {}", e);
            return LineOutcome::Skipped;
        }
    };

    // only a top-level ready/error tag is a control message
    if matches!(
        value.get("type").and_then(serde_json::Value::as_str),
        Some("ready" | "error")
    ) {
        match serde_json::from_value::<Control>(value) {
            Ok(Control::Error { message }) => log::error!("detector error: {}", message),
            Ok(Control::Ready { .. }) => log::debug!("detector reported ready again"),
            Err(e) => {
                log::warn!("unrecognized detector message: {}", e);
                return LineOutcome::Skipped;
            }
        }
        return LineOutcome::Control;
    }

    match poses_from_value(&value) {
        Ok(parsed) => {
            if parsed.rejected > 0 {
                log::warn!("dropped {} malformed pose entries", parsed.rejected);
            }
            let count = parsed.poses.len();
            log::trace!("detected {} poses", count);
            if let Some(on_poses) = callback.lock().unwrap_or_else(|e| e.into_inner()).as_mut() {
                on_poses(parsed.poses);
            }
            LineOutcome::Detections(count)
        }
        Err(e) => {
            log::warn!("ignoring detector output: {}", e);
            LineOutcome::Skipped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MoveNetType;

    fn recording_callback() -> (SharedCallback, Arc<Mutex<Vec<usize>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: PoseCallback =
            Box::new(move |poses: Vec<crate::Pose>| sink.lock().unwrap().push(poses.len()));
        (Arc::new(Mutex::new(Some(callback))), seen)
    }

    #[test]
    fn test_dispatch_detections() {
        let (callback, seen) = recording_callback();
        let outcome = dispatch_line(r#"[{"keypoints":[]},{"keypoints":[]}]"#, &callback);
        assert_eq!(outcome, LineOutcome::Detections(2));
        assert_eq!(*seen.lock().unwrap(), vec![2]);
    }

    #[test]
    fn test_dispatch_control_and_garbage() {
        let (callback, seen) = recording_callback();
        assert_eq!(
            dispatch_line(r#"{"type":"error","message":"oom"}"#, &callback),
            LineOutcome::Control
        );
        assert_eq!(dispatch_line("not json", &callback), LineOutcome::Skipped);
        assert_eq!(dispatch_line("   ", &callback), LineOutcome::Skipped);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dispatch_after_stop_is_silent() {
        let (callback, seen) = recording_callback();
        callback.lock().unwrap().take();
        assert_eq!(dispatch_line("[]", &callback), LineOutcome::Detections(0));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_frame_header_shape() {
        let header = Outgoing::Frame {
            seq: 3,
            width: 2,
            height: 1,
            len: 6,
        };
        let json: serde_json::Value = serde_json::to_value(&header).unwrap();
        assert_eq!(json["type"], "frame");
        assert_eq!(json["seq"], 3);
        assert_eq!(json["len"], 6);
    }

    #[test]
    fn test_config_message_is_tagged() {
        let config = EstimatorConfig::default();
        let json = serde_json::to_value(Outgoing::config(&config)).unwrap();
        assert_eq!(json["type"], "config");
        assert_eq!(json["model_type"], "MULTIPOSE_LIGHTNING");
        assert_eq!(json["enable_smoothing"], true);
        assert_eq!(json["max_poses"], 6);
    }

    #[test]
    fn test_config_message_caps_single_pose_models() {
        let config = EstimatorConfig {
            model_type: MoveNetType::SinglePoseThunder,
            max_poses: 6,
            ..EstimatorConfig::default()
        };
        let json = serde_json::to_value(Outgoing::config(&config)).unwrap();
        assert_eq!(json["model_type"], "SINGLEPOSE_THUNDER");
        assert_eq!(json["max_poses"], 1);
    }

    #[test]
    fn test_dispatch_envelope_mentioning_type() {
        let (callback, seen) = recording_callback();
        let named_type = r#"{"poses":[{"keypoints":[{"x":1,"y":2,"confidence":0.9,"name":"type"}]}]}"#;
        assert_eq!(dispatch_line(named_type, &callback), LineOutcome::Detections(1));

        let tagged = r#"{"type":"detections","poses":[{"keypoints":[]},{"keypoints":[]}]}"#;
        assert_eq!(dispatch_line(tagged, &callback), LineOutcome::Detections(2));

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_dispatch_bad_control_is_skipped() {
        let (callback, seen) = recording_callback();
        // error tag without a message
        assert_eq!(dispatch_line(r#"{"type":"error"}"#, &callback), LineOutcome::Skipped);
        assert_eq!(
            dispatch_line(r#"{"type":"ready","skeleton":[[0,1]]}"#, &callback),
            LineOutcome::Control
        );
        assert!(seen.lock().unwrap().is_empty());
    }
}
