use crate::{OverlayPolicy, Surface};
use limn_base::Vec2;
use limn_pose::{Pose, Skeleton};
use limn_video::VideoFrame;

/// What one tick put on the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frame_drawn: bool,
    pub poses: usize,
    pub markers: usize,
    pub labels: usize,
    pub bones: usize,
}

/// Composes a display tick: the newest video frame, then the pose overlay.
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    policy: OverlayPolicy,
}

impl FrameRenderer {
    pub fn new(policy: OverlayPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &OverlayPolicy {
        &self.policy
    }

    /// Draw one tick. Until the first frame arrives nothing is drawn,
    /// not even poses that are already known.
    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        frame: Option<&VideoFrame>,
        poses: &[Pose],
        skeleton: &Skeleton,
    ) -> RenderStats {
        let Some(frame) = frame else {
            return RenderStats::default();
        };

        surface.blit(frame, Vec2::zero());
        let plan = self.policy.draw(poses, skeleton, surface);

        let stats = RenderStats {
            frame_drawn: true,
            poses: poses.len(),
            markers: plan.markers().count(),
            labels: plan.label_count(),
            bones: plan.bones().count(),
        };
        log::trace!("rendered {:?}", stats);
        stats
    }
}
