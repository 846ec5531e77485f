//! Property and edge case tests for the obstacle classifier

use proptest::prelude::*;
use rover_eye::{
    classify, encode_png, frame_from_fn, solid_frame, Classifier, VisionConfig, VisionResult,
};

fn frame_from(width: u32, height: u32, pixels: &[u8]) -> opencv::core::Mat {
    frame_from_fn(width, height, |x, y| {
        let i = ((y * width + x) as usize * 3) % pixels.len();
        [pixels[i], pixels[(i + 1) % pixels.len()], pixels[(i + 2) % pixels.len()]]
    })
    .unwrap()
}

proptest! {
    #[test]
    fn test_classify_is_pure(
        width in 1u32..48,
        height in 1u32..48,
        pixels in prop::collection::vec(any::<u8>(), 3..256),
    ) {
        let frame = frame_from(width, height, &pixels);
        let first = classify(Some(&frame));
        prop_assert_eq!(first, classify(Some(&frame)));
    }

    #[test]
    fn test_count_bounded_by_corridor(
        width in 1u32..64,
        height in 1u32..64,
        pixels in prop::collection::vec(any::<u8>(), 3..256),
    ) {
        let frame = frame_from(width, height, &pixels);
        let result = classify(Some(&frame));
        let x0 = (width as f64 * 0.45) as u32;
        let x1 = (width as f64 * 0.55) as u32;
        let y0 = (height as f64 * 0.5) as u32;
        let area = (x1 - x0) * (height - y0);
        prop_assert!(result.center_pixel_count <= area);
        if result.obstacle_near {
            prop_assert!(result.center_pixel_count as f64 / area as f64 > 0.2);
        }
    }
}

#[test]
fn test_absent_frame_is_nothing() {
    assert_eq!(
        classify(None),
        VisionResult { obstacle_near: false, center_pixel_count: 0 }
    );
}

#[test]
fn test_solid_green_frame() {
    let frame = solid_frame(640, 480, [0, 255, 0]).unwrap();
    let result = classify(Some(&frame));
    assert!(result.obstacle_near);
    assert_eq!(result.center_pixel_count, 64 * 240);
}

#[test]
fn test_dim_green_is_ignored() {
    // right hue, value below the band
    let frame = solid_frame(640, 480, [0, 120, 0]).unwrap();
    assert_eq!(classify(Some(&frame)), VisionResult::NOTHING);
}

#[test]
fn test_encoded_frame_matches_decoded() {
    let frame = frame_from_fn(200, 100, |x, y| {
        if y >= 50 && (90..110).contains(&x) {
            [57, 255, 20]
        } else {
            [30, 30, 30]
        }
    })
    .unwrap();
    let classifier = Classifier::new(VisionConfig::default()).unwrap();
    let encoded = encode_png(&frame).unwrap();
    assert_eq!(
        classifier.classify_encoded(Some(encoded.as_str())),
        classifier.classify(Some(&frame))
    );
}
