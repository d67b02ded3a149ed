use crate::{Detections, PoseReader, latest_poses};
use limn_pose::{EstimatorError, Pose, PoseEstimator};
use limn_video::FrameReceiver;

/// Routes an estimator's detections into the latest-results slot.
///
/// Built once per session; building it is the one and only subscription
/// to the estimator's detection stream.
#[derive(Debug)]
pub struct DetectionFeed {
    reader: PoseReader,
}

impl DetectionFeed {
    /// Start `estimator` on `frames` and publish every pose sequence it emits.
    pub fn attach<E: PoseEstimator + ?Sized>(
        estimator: &mut E,
        frames: FrameReceiver,
    ) -> Result<Self, EstimatorError> {
        let (writer, reader) = latest_poses();
        estimator.detect_start(
            frames,
            Box::new(move |poses: Vec<Pose>| {
                let count = poses.len();
                let seq = writer.publish(poses);
                log::trace!("detection {}: {} poses", seq, count);
            }),
        )?;
        log::debug!("detection feed attached");
        Ok(Self { reader })
    }

    pub fn latest(&self) -> Detections {
        self.reader.snapshot()
    }

    /// Number of detection events received so far.
    pub fn events(&self) -> u64 {
        self.reader.seq()
    }

    pub fn reader(&self) -> PoseReader {
        self.reader.clone()
    }
}
