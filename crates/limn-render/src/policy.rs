use crate::{OverlayStyle, Surface};
use limn_base::Vec2;
use limn_pose::{Bone, Pose, Skeleton, Threshold};

/// A keypoint that passed the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub pose: usize,
    pub keypoint: usize,
    pub position: Vec2<f32>,
    pub label: Option<String>,
}

/// A bone whose two endpoints both passed the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneSegment {
    pub pose: usize,
    pub bone: Bone,
    pub from: Vec2<f32>,
    pub to: Vec2<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayItem {
    Marker(Marker),
    Bone(BoneSegment),
}

/// Everything one tick of overlay drawing will put on the surface, in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayPlan {
    items: Vec<OverlayItem>,
}

impl OverlayPlan {
    pub fn items(&self) -> &[OverlayItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.items.iter().filter_map(|item| match item {
            OverlayItem::Marker(marker) => Some(marker),
            OverlayItem::Bone(_) => None,
        })
    }

    pub fn bones(&self) -> impl Iterator<Item = &BoneSegment> {
        self.items.iter().filter_map(|item| match item {
            OverlayItem::Bone(segment) => Some(segment),
            OverlayItem::Marker(_) => None,
        })
    }

    pub fn label_count(&self) -> usize {
        self.markers().filter(|m| m.label.is_some()).count()
    }
}

/// Decides which keypoints and bones of the latest poses get drawn.
///
/// A keypoint is drawn when its confidence is strictly above the threshold.
/// A bone is drawn when both of its endpoints are; an endpoint index the pose
/// does not have counts as failing. The policy keeps no state between ticks.
#[derive(Debug, Clone)]
pub struct OverlayPolicy {
    threshold: Threshold,
    labels: bool,
    style: OverlayStyle,
}

impl Default for OverlayPolicy {
    fn default() -> Self {
        Self::new(Threshold::default())
    }
}

impl OverlayPolicy {
    pub fn new(threshold: Threshold) -> Self {
        Self {
            threshold,
            labels: true,
            style: OverlayStyle::default(),
        }
    }

    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn labels(&self) -> bool {
        self.labels
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Select what to draw. Per pose, markers come first, then bones.
    pub fn plan(&self, poses: &[Pose], skeleton: &Skeleton) -> OverlayPlan {
        let mut plan = OverlayPlan::default();

        for (pose_idx, pose) in poses.iter().enumerate() {
            for (kp_idx, kp) in pose.keypoints.iter().enumerate() {
                if !self.threshold.admits(kp) {
                    continue;
                }
                let label = if self.labels { kp.name.clone() } else { None };
                plan.items.push(OverlayItem::Marker(Marker {
                    pose: pose_idx,
                    keypoint: kp_idx,
                    position: kp.position,
                    label,
                }));
            }

            for &bone in skeleton.bones() {
                let (Some(a), Some(b)) = (pose.keypoint(bone.0), pose.keypoint(bone.1)) else {
                    continue;
                };
                if self.threshold.admits(a) && self.threshold.admits(b) {
                    plan.items.push(OverlayItem::Bone(BoneSegment {
                        pose: pose_idx,
                        bone,
                        from: a.position,
                        to: b.position,
                    }));
                }
            }
        }

        plan
    }

    /// Put a plan on `surface` using the configured style.
    pub fn paint<S: Surface + ?Sized>(&self, plan: &OverlayPlan, surface: &mut S) {
        let diameter = Vec2::new(self.style.marker_diameter, self.style.marker_diameter);
        let label_style = self.style.label_style();
        let label_offset = self.style.label_offset();

        for item in plan.items() {
            match item {
                OverlayItem::Marker(marker) => {
                    surface.fill_ellipse(marker.position, diameter, self.style.marker_color);
                    if let Some(label) = &marker.label {
                        surface.text(label, marker.position + label_offset, &label_style);
                    }
                }
                OverlayItem::Bone(segment) => {
                    surface.line(
                        segment.from,
                        segment.to,
                        self.style.bone_weight,
                        self.style.bone_color,
                    );
                }
            }
        }
    }

    /// Plan and paint in one go.
    pub fn draw<S: Surface + ?Sized>(
        &self,
        poses: &[Pose],
        skeleton: &Skeleton,
        surface: &mut S,
    ) -> OverlayPlan {
        let plan = self.plan(poses, skeleton);
        self.paint(&plan, surface);
        plan
    }
}
