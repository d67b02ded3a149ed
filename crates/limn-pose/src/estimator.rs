use crate::{EstimatorError, Pose, Skeleton};
use limn_video::FrameReceiver;

/// Invoked with every pose sequence the estimator emits, from the estimator's own task.
pub type PoseCallback = Box<dyn FnMut(Vec<Pose>) + Send + 'static>;

/// An opaque pose detector.
///
/// Once started, the estimator reads the newest frame from `frames` whenever
/// it is ready for more work and reports results through the callback at
/// its own pace, independent of how often frames are rendered.
pub trait PoseEstimator: Send {
    /// Bone topology. Fixed for the estimator's lifetime.
    fn skeleton(&self) -> Skeleton;

    /// Begin continuous detection. Fails with `AlreadyStarted` on a second call.
    fn detect_start(
        &mut self,
        frames: FrameReceiver,
        on_poses: PoseCallback,
    ) -> Result<(), EstimatorError>;

    /// Stop emitting. After this returns the callback is not invoked again. Idempotent.
    fn detect_stop(&mut self);
}
