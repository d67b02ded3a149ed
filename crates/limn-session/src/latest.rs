use limn_pose::Pose;
use std::sync::Arc;
use tokio::sync::watch;

/// The most recent pose sequence and how many sequences came before it.
///
/// `seq` is 0 with no poses until the first detection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detections {
    pub seq: u64,
    pub poses: Arc<Vec<Pose>>,
}

impl Detections {
    pub fn is_initial(&self) -> bool {
        self.seq == 0
    }
}

/// Replaces the latest-results slot.
#[derive(Debug)]
pub struct PoseWriter {
    tx: watch::Sender<Detections>,
}

/// Reads the latest-results slot. Every read sees one whole sequence.
#[derive(Debug, Clone)]
pub struct PoseReader {
    rx: watch::Receiver<Detections>,
}

/// Empty latest-results slot.
pub fn latest_poses() -> (PoseWriter, PoseReader) {
    let (tx, rx) = watch::channel(Detections::default());
    (PoseWriter { tx }, PoseReader { rx })
}

impl PoseWriter {
    /// Replace the slot with `poses`. Returns the new sequence number.
    pub fn publish(&self, poses: Vec<Pose>) -> u64 {
        let poses = Arc::new(poses);
        let mut seq = 0;
        self.tx.send_modify(|slot| {
            slot.seq += 1;
            slot.poses = poses;
            seq = slot.seq;
        });
        seq
    }

    pub fn subscribe(&self) -> PoseReader {
        PoseReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl PoseReader {
    pub fn snapshot(&self) -> Detections {
        self.rx.borrow().clone()
    }

    pub fn seq(&self) -> u64 {
        self.rx.borrow().seq
    }

    /// Wait for the next publish. Fails once the writer is gone.
    pub async fn changed(&mut self) -> Result<Detections, watch::error::RecvError> {
        self.rx.changed().await?;
        Ok(self.rx.borrow_and_update().clone())
    }
}
