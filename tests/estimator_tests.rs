use parallax_portal::config::{EstimatorConfig, PointerConfig};
use parallax_portal::tracking::{
    ColorHeuristicEstimator, PointerEstimator, PointerSample, PositionEstimator, RawFrame,
};

const GRAY: [u8; 3] = [128, 128, 128];
const SKIN: [u8; 3] = [200, 150, 120];

#[test]
fn test_skin_square_centroid_within_stride() {
    let estimator = ColorHeuristicEstimator::new(EstimatorConfig::default());
    let stride = estimator.config().stride as f32;

    let mut frame = RawFrame::filled(320, 240, GRAY);
    let (x0, y0, size) = (100, 60, 64);
    frame.fill_rect(x0, y0, size, size, SKIN);

    let detection = estimator.detect(&frame).expect("square should be detected");
    let center_x = x0 as f32 + size as f32 / 2.0;
    let center_y = y0 as f32 + size as f32 / 2.0;
    assert!((detection.centroid_x - center_x).abs() <= stride);
    assert!((detection.centroid_y - center_y).abs() <= stride);
    assert_eq!(detection.samples, 16 * 16);
}

#[test]
fn test_uniform_gray_yields_none() {
    let estimator = ColorHeuristicEstimator::new(EstimatorConfig::default());
    assert!(estimator.estimate(&RawFrame::filled(320, 240, GRAY)).is_none());
}

#[test]
fn test_face_left_of_frame_moves_eye_right() {
    let estimator = ColorHeuristicEstimator::new(EstimatorConfig::default());
    let mut frame = RawFrame::filled(320, 240, GRAY);
    frame.fill_rect(0, 88, 64, 64, SKIN);

    let p = estimator.estimate(&frame).unwrap();
    assert!(p.x > 0.0);
    assert!(p.y.abs() < 0.1);
}

#[test]
fn test_thresholds_are_configurable() {
    let strict = EstimatorConfig {
        min_samples: 10_000,
        ..EstimatorConfig::default()
    };
    let mut frame = RawFrame::filled(320, 240, GRAY);
    frame.fill_rect(100, 60, 64, 64, SKIN);

    assert!(ColorHeuristicEstimator::new(EstimatorConfig::default()).detect(&frame).is_some());
    assert!(ColorHeuristicEstimator::new(strict).detect(&frame).is_none());
}

#[test]
fn test_pointer_center_is_neutral() {
    let estimator = PointerEstimator::new(PointerConfig::default(), 3.0);
    let p = estimator
        .estimate(&PointerSample {
            x: 400.0,
            y: 300.0,
            container_width: 800.0,
            container_height: 600.0,
        })
        .unwrap();
    assert_eq!((p.x, p.y, p.z), (0.0, 0.0, 3.0));
}
