use limn_base::Vec2;
use limn_video::{CaptureError, VideoConstraints, VideoFrame, FacingMode, frame_channel};
use std::sync::Arc;

#[test]
fn test_video_frame_rejects_wrong_length() {
    let result = VideoFrame::new(Vec2::new(2, 2), vec![0u8; 11]);
    assert!(matches!(result, Err(CaptureError::Stream(_))));
}

#[test]
fn test_video_frame_pixel_access() {
    let mut data = vec![0u8; 2 * 2 * 3];
    data[9..12].copy_from_slice(&[10, 20, 30]); // (1, 1)
    let frame = VideoFrame::new(Vec2::new(2, 2), data).unwrap();

    assert_eq!(frame.pixel(1, 1), Some([10, 20, 30]));
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0]));
    assert_eq!(frame.pixel(2, 0), None);
}

#[test]
fn test_video_frame_filled() {
    let frame = VideoFrame::filled(Vec2::new(3, 2), [1, 2, 3]);
    assert_eq!(frame.data().len(), 18);
    assert_eq!(frame.pixel(2, 1), Some([1, 2, 3]));
}

#[test]
fn test_decode_jpeg_rejects_garbage() {
    let result = VideoFrame::decode_jpeg(&[0x00, 0x01, 0x02]);
    assert!(matches!(result, Err(CaptureError::Decode(_))));
}

#[test]
fn test_frame_channel_keeps_newest() {
    let (tx, rx) = frame_channel();
    assert!(rx.borrow().is_none());

    tx.send_replace(Some(Arc::new(VideoFrame::filled(Vec2::new(1, 1), [1, 1, 1]))));
    tx.send_replace(Some(Arc::new(VideoFrame::filled(Vec2::new(1, 1), [9, 9, 9]))));

    let newest = rx.borrow().clone().unwrap();
    assert_eq!(newest.pixel(0, 0), Some([9, 9, 9]));
}

#[test]
fn test_constraints_defaults_and_builder() {
    let constraints = VideoConstraints::default();
    assert_eq!(constraints.width(), 640);
    assert_eq!(constraints.height(), 480);
    assert_eq!(constraints.device(), None);
    assert_eq!(constraints.facing_mode(), FacingMode::User);

    let constraints = constraints
        .with_device("/dev/video2")
        .with_width(1280)
        .with_height(720)
        .with_facing_mode(FacingMode::Environment)
        .with_buffer_count(0);
    assert_eq!(constraints.device(), Some("/dev/video2"));
    assert_eq!(constraints.width(), 1280);
    assert_eq!(constraints.facing_mode(), FacingMode::Environment);
    // at least one buffer is always used
    assert_eq!(constraints.buffer_count(), 1);
}

#[test]
fn test_constraints_deserialize_partial() {
    let constraints: VideoConstraints =
        serde_json::from_str(r#"{"width": 320, "facing_mode": "environment"}"#).unwrap();
    assert_eq!(constraints.width(), 320);
    assert_eq!(constraints.height(), 480);
    assert_eq!(constraints.facing_mode(), FacingMode::Environment);
}
