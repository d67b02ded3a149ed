use limn_base::Vec2;
use limn_pose::{Bone, EstimatorConfig, EstimatorError, Pose, PoseEstimator, ProcessEstimator, Skeleton};
use limn_video::{VideoFrame, frame_channel};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn sh(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

#[tokio::test]
async fn test_load_reports_model_error() {
    let script = r#"read cfg; echo '{"type":"error","message":"weights missing"}'"#;
    let result = ProcessEstimator::load("sh", &sh(script), &EstimatorConfig::default()).await;
    match result {
        Err(EstimatorError::ModelLoad(msg)) => assert_eq!(msg, "weights missing"),
        other => panic!("Expected ModelLoad, got {other:?}"),
    }
}

#[tokio::test]
async fn test_load_fails_when_detector_exits_silently() {
    let result = ProcessEstimator::load("sh", &sh("read cfg"), &EstimatorConfig::default()).await;
    assert!(matches!(result, Err(EstimatorError::ModelLoad(_))));
}

#[tokio::test]
async fn test_load_missing_program() {
    let result =
        ProcessEstimator::load("/nonexistent/limn-detector", &[], &EstimatorConfig::default()).await;
    assert!(matches!(result, Err(EstimatorError::Spawn(_))));
}

#[tokio::test]
async fn test_ready_without_skeleton_uses_model_topology() {
    let script = r#"read cfg; echo '{"type":"ready"}'; sleep 5"#;
    let estimator = ProcessEstimator::load("sh", &sh(script), &EstimatorConfig::default())
        .await
        .unwrap();
    assert_eq!(estimator.skeleton(), Skeleton::coco());
}

#[tokio::test]
async fn test_detections_reach_callback() {
    let script = r#"read cfg
echo '{"type":"ready","skeleton":[[0,1]]}'
echo '[{"keypoints":[{"x":1,"y":2,"confidence":0.9},{"x":3,"y":4,"confidence":0.1}]}]'
echo 'garbage'
echo '[]'
sleep 5"#;
    let mut estimator = ProcessEstimator::load("sh", &sh(script), &EstimatorConfig::default())
        .await
        .unwrap();
    assert_eq!(estimator.skeleton().bones(), &[Bone(0, 1)]);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let (_frames_tx, frames_rx) = frame_channel();
    estimator
        .detect_start(frames_rx, Box::new(move |poses: Vec<Pose>| {
            let _ = tx.send(poses);
        }))
        .unwrap();

    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].keypoints[1].position, Vec2::new(3.0, 4.0));

    // the garbage line is skipped, the empty sequence still arrives
    let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(second.is_empty());

    estimator.detect_stop();
}

#[tokio::test]
async fn test_frames_are_written_to_detector() {
    // echo one detection per received frame header, skipping the pixel bytes
    let script = r#"read cfg
echo '{"type":"ready"}'
while read header; do
  head -c 12 > /dev/null
  echo '[]'
done"#;
    let mut estimator = ProcessEstimator::load("sh", &sh(script), &EstimatorConfig::default())
        .await
        .unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let (frames_tx, frames_rx) = frame_channel();
    estimator
        .detect_start(frames_rx, Box::new(move |poses: Vec<Pose>| {
            let _ = tx.send(poses.len());
        }))
        .unwrap();

    frames_tx.send_replace(Some(Arc::new(VideoFrame::filled(Vec2::new(2, 2), [1, 2, 3]))));
    let got = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap();
    assert_eq!(got, Some(0));

    estimator.detect_stop();
}

#[tokio::test]
async fn test_detect_start_twice_fails() {
    let script = r#"read cfg; echo '{"type":"ready"}'; sleep 5"#;
    let mut estimator = ProcessEstimator::load("sh", &sh(script), &EstimatorConfig::default())
        .await
        .unwrap();

    let (_tx, rx) = frame_channel();
    estimator.detect_start(rx.clone(), Box::new(|_: Vec<Pose>| {})).unwrap();
    assert!(matches!(
        estimator.detect_start(rx, Box::new(|_: Vec<Pose>| {})),
        Err(EstimatorError::AlreadyStarted)
    ));
    estimator.detect_stop();
    // idempotent
    estimator.detect_stop();
}
