use limn_base::Vec2;

#[test]
fn test_vec2_arithmetic() {
    let a = Vec2::new(1.5f32, 2.0);
    let b = Vec2::new(0.5f32, -1.0);
    assert_eq!(a + b, Vec2::new(2.0, 1.0));
    assert_eq!(a - b, Vec2::new(1.0, 3.0));
    assert_eq!(a * 2.0, Vec2::new(3.0, 4.0));
}

#[test]
fn test_vec2_zero_and_area() {
    assert_eq!(Vec2::<usize>::zero(), Vec2::new(0, 0));
    assert_eq!(Vec2::new(640usize, 480).area(), 307_200);
}

#[test]
fn test_vec2_round_i32() {
    assert_eq!(Vec2::new(10.4f32, 10.6).round_i32(), Vec2::new(10, 11));
    assert_eq!(Vec2::new(-0.6f32, 0.4).round_i32(), Vec2::new(-1, 0));
}

#[test]
fn test_vec2_is_finite() {
    assert!(Vec2::new(1.0f32, 2.0).is_finite());
    assert!(!Vec2::new(f32::NAN, 2.0).is_finite());
    assert!(!Vec2::new(1.0, f32::INFINITY).is_finite());
}
