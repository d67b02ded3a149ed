//! Validation of untyped estimator output.
//!
//! Accepted shapes, per detection message:
//! - a bare array of poses, or `{"poses": [...]}`
//! - a pose is `{"keypoints": [...], "score"?, "id"?}` or a bare keypoint array
//! - a keypoint is `{"x", "y", "confidence" | "score", "name"?}` or `[x, y, confidence]`
//!
//! Entries are never dropped from a keypoint list, since index meaning is
//! positional. Undefined entries become `Keypoint::missing()` instead.

use crate::{Keypoint, Pose, PoseError};
use limn_base::Vec2;
use serde_json::Value;

/// Poses read from one detection message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    pub poses: Vec<Pose>,
    /// Pose entries that were neither objects nor arrays.
    pub rejected: usize,
}

/// Parse one line of estimator output.
pub fn parse_detections(line: &str) -> Result<Parsed, PoseError> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| PoseError::Malformed(e.to_string()))?;
    poses_from_value(&value)
}

pub fn poses_from_value(value: &Value) -> Result<Parsed, PoseError> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("poses") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(PoseError::Malformed("object without a poses list".to_string())),
        },
        other => return Err(PoseError::Malformed(format!("unexpected {other}"))),
    };

    let mut parsed = Parsed::default();
    for entry in entries {
        match pose_from_value(entry) {
            Some(pose) => parsed.poses.push(pose),
            None => parsed.rejected += 1,
        }
    }
    Ok(parsed)
}

fn pose_from_value(value: &Value) -> Option<Pose> {
    match value {
        Value::Object(map) => {
            let keypoints = match map.get("keypoints") {
                Some(Value::Array(list)) => list.iter().map(keypoint_from_value).collect(),
                _ => Vec::new(),
            };
            Some(Pose {
                keypoints,
                score: map.get("score").and_then(Value::as_f64).map(|s| s as f32),
                id: map
                    .get("id")
                    .and_then(Value::as_u64)
                    .and_then(|id| u32::try_from(id).ok()),
            })
        }
        Value::Array(list) => Some(Pose::new(list.iter().map(keypoint_from_value).collect())),
        _ => None,
    }
}

fn keypoint_from_value(value: &Value) -> Keypoint {
    let (x, y, confidence, name) = match value {
        Value::Object(map) => (
            map.get("x").and_then(Value::as_f64),
            map.get("y").and_then(Value::as_f64),
            // both spellings are in circulation
            map.get("confidence")
                .and_then(Value::as_f64)
                .or_else(|| map.get("score").and_then(Value::as_f64)),
            map.get("name").and_then(Value::as_str).map(str::to_string),
        ),
        Value::Array(list) => (
            list.first().and_then(Value::as_f64),
            list.get(1).and_then(Value::as_f64),
            list.get(2).and_then(Value::as_f64),
            None,
        ),
        _ => return Keypoint::missing(),
    };

    match (x, y) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Keypoint {
            name,
            position: Vec2::new(x as f32, y as f32),
            confidence: sanitize_confidence(confidence),
        },
        // nowhere to draw it
        _ => Keypoint {
            name,
            ..Keypoint::missing()
        },
    }
}

fn sanitize_confidence(confidence: Option<f64>) -> f32 {
    match confidence {
        Some(c) if c.is_finite() => c.clamp(0.0, 1.0) as f32,
        _ => 0.0,
    }
}
