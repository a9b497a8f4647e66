//! Bloom Tests
//!
//! Tests for:
//! - Ping-pong blur schedule and where its output lands
//! - Reduced target size
//! - Gaussian weights baked into the blur shader

use folio::renderer::plugins::bloom::scaled_size;
use folio::renderer::plugins::{BlurSource, BlurStep, blur_output, blur_schedule};
use folio::renderer::shaders::{BLUR_WEIGHTS, blur_fragment};

#[test]
fn first_pass_reads_threshold() {
    let steps = blur_schedule(10);
    assert_eq!(steps.len(), 10);
    assert_eq!(
        steps[0],
        BlurStep {
            mode: 0,
            source: BlurSource::Threshold,
            target: 0,
        }
    );
}

#[test]
fn passes_alternate_between_targets() {
    let steps = blur_schedule(10);
    for (i, step) in steps.iter().enumerate().skip(1) {
        assert_eq!(step.mode, (i % 2) as i32);
        assert_eq!(step.target, i % 2);
        assert_eq!(step.source, BlurSource::Target(1 - i % 2), "Pass {i} reads the other target");
    }
}

#[test]
fn output_is_last_target_written() {
    for iterations in 1..=6 {
        let last = blur_schedule(iterations).last().map(|s| BlurSource::Target(s.target));
        assert_eq!(Some(blur_output(iterations)), last);
    }
    assert_eq!(blur_output(10), BlurSource::Target(1));
}

#[test]
fn zero_iterations_blend_threshold_directly() {
    assert!(blur_schedule(0).is_empty());
    assert_eq!(blur_output(0), BlurSource::Threshold);
}

#[test]
fn targets_never_collapse() {
    assert_eq!(scaled_size(800, 600, 0.5), (400, 300));
    assert_eq!(scaled_size(1, 1, 0.5), (1, 1));
    assert_eq!(scaled_size(0, 10, 1.0), (1, 10));
}

#[test]
fn weights_sum_to_one() {
    let total = BLUR_WEIGHTS[0] + 2.0 * BLUR_WEIGHTS[1..].iter().sum::<f32>();
    assert!((total - 1.0).abs() < 1e-5);
}

#[test]
fn weights_baked_into_shader() {
    let source = blur_fragment();
    assert!(!source.contains("BLUR_WEIGHTS"));
    assert!(source.contains("0.227027"));
    assert!(source.contains("u_mode"));
}
