use limn_base::Vec2;
use limn_pose::{Keypoint, Pose};
use limn_session::latest_poses;
use proptest::prelude::*;
use std::thread;

fn pose_with_id(id: u32, keypoints: usize) -> Pose {
    Pose {
        keypoints: vec![Keypoint::new(Vec2::new(id as f32, id as f32), 0.5); keypoints],
        score: None,
        id: Some(id),
    }
}

#[test]
fn test_empty_until_first_publish() {
    let (_writer, reader) = latest_poses();
    let snapshot = reader.snapshot();
    assert!(snapshot.is_initial());
    assert!(snapshot.poses.is_empty());
}

#[test]
fn test_publish_replaces_wholesale() {
    let (writer, reader) = latest_poses();
    writer.publish(vec![pose_with_id(1, 3), pose_with_id(2, 3)]);
    assert_eq!(writer.publish(vec![pose_with_id(3, 1)]), 2);

    let snapshot = reader.snapshot();
    assert_eq!(snapshot.seq, 2);
    assert_eq!(snapshot.poses.len(), 1);
    assert_eq!(snapshot.poses[0].id, Some(3));
}

#[test]
fn test_empty_sequence_clears_poses() {
    let (writer, reader) = latest_poses();
    writer.publish(vec![pose_with_id(1, 3)]);
    writer.publish(Vec::new());
    assert!(reader.snapshot().poses.is_empty());
    assert_eq!(reader.seq(), 2);
}

#[test]
fn test_slot_outlives_writer() {
    let (writer, reader) = latest_poses();
    writer.publish(vec![pose_with_id(9, 1)]);
    drop(writer);
    assert_eq!(reader.snapshot().poses[0].id, Some(9));
}

#[test]
fn test_readers_never_see_mixed_sequences() {
    let (writer, reader) = latest_poses();
    let publisher = thread::spawn(move || {
        for id in 1..=500u32 {
            writer.publish(vec![pose_with_id(id, 17), pose_with_id(id, 17)]);
        }
    });

    let mut last_seq = 0;
    for _ in 0..2000 {
        let snapshot = reader.snapshot();
        assert!(snapshot.seq >= last_seq);
        last_seq = snapshot.seq;
        for pose in snapshot.poses.iter() {
            assert_eq!(pose.id, Some(snapshot.seq as u32));
        }
    }
    publisher.join().unwrap();
    assert_eq!(reader.seq(), 500);
}

#[tokio::test]
async fn test_changed_wakes_reader() {
    let (writer, mut reader) = latest_poses();
    let waiter = tokio::spawn(async move { reader.changed().await.map(|d| d.seq) });
    tokio::task::yield_now().await;
    writer.publish(vec![pose_with_id(1, 1)]);
    assert_eq!(waiter.await.unwrap().unwrap(), 1);
}

proptest! {
    #[test]
    fn prop_last_write_wins(payloads in prop::collection::vec(prop::collection::vec(0u32..100, 0..5), 1..30)) {
        let (writer, reader) = latest_poses();
        for ids in &payloads {
            writer.publish(ids.iter().map(|&id| pose_with_id(id, 2)).collect());
        }

        let snapshot = reader.snapshot();
        let expected: Vec<Option<u32>> = payloads.last().unwrap().iter().map(|&id| Some(id)).collect();
        let got: Vec<Option<u32>> = snapshot.poses.iter().map(|p| p.id).collect();
        prop_assert_eq!(snapshot.seq, payloads.len() as u64);
        prop_assert_eq!(got, expected);
    }
}
