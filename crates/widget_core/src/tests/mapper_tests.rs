use super::*;

#[test]
fn linear_mapping_hits_endpoints() {
    assert_eq!(map_linear(0.0, 200.0, 0.0, 100.0), 0.0);
    assert_eq!(map_linear(200.0, 200.0, 0.0, 100.0), 100.0);
    assert_eq!(map_linear(100.0, 200.0, 0.0, 100.0), 50.0);
}

#[test]
fn linear_mapping_clamps_outside_the_track() {
    assert_eq!(map_linear(-40.0, 200.0, 0.0, 100.0), 0.0);
    assert_eq!(map_linear(900.0, 200.0, 0.0, 100.0), 100.0);
    assert_eq!(map_linear(-5.0, 200.0, -20.0, 20.0), -20.0);
}

#[test]
fn zero_width_track_is_treated_as_one_pixel() {
    assert_eq!(map_linear(0.0, 0.0, 0.0, 100.0), 0.0);
    assert_eq!(map_linear(1.0, 0.0, 0.0, 100.0), 100.0);
}

#[test]
fn linear_mapping_is_monotonic() {
    let mut previous = f64::MIN;
    for x in 0..=300 {
        let value = map_linear(x as f64, 300.0, 0.0, 100.0);
        assert!(value >= previous, "value dropped at x={x}");
        assert_eq!(value, value.round());
        previous = value;
    }
}

#[test]
fn half_values_round_up() {
    assert_eq!(round_half_up(2.5), 3.0);
    assert_eq!(round_half_up(-2.5), -2.0);
    assert_eq!(round_half_up(4.49), 4.0);
}

#[test]
fn pointer_angle_is_clockwise_from_top() {
    assert_eq!(pointer_angle(0.0, -10.0), 0.0);
    assert_eq!(pointer_angle(10.0, 0.0), 90.0);
    assert_eq!(pointer_angle(-10.0, 0.0), -90.0);
    assert_eq!(pointer_angle(0.0, 10.0), 180.0);
}

#[test]
fn sweep_bounds_map_to_domain_bounds() {
    let domain = ValueDomain::new(0.0, 100.0).with_step(1.0);
    assert_eq!(map_angle_to_domain(SWEEP_MIN_DEG, &domain), 0.0);
    assert_eq!(map_angle_to_domain(SWEEP_MAX_DEG, &domain), 100.0);
    assert_eq!(map_angle_to_domain(0.0, &domain), 50.0);
}

#[test]
fn dead_zone_angles_clamp_to_nearest_bound() {
    let domain = ValueDomain::new(0.0, 100.0).with_step(1.0);
    assert_eq!(map_angle_to_domain(170.0, &domain), 100.0);
    assert_eq!(map_angle_to_domain(-170.0, &domain), 0.0);
    assert_eq!(map_angle_to_domain(180.0, &domain), 100.0);
}

#[test]
fn knob_values_snap_to_step() {
    let domain = ValueDomain::new(0.0, 10.0).with_step(1.0);
    assert_eq!(domain.constrain(4.6), 5.0);
    // -11.6 degrees interpolates to 4.6 before quantization
    assert_eq!(map_angle_to_domain(-11.6, &domain), 5.0);
}

#[test]
fn quantization_never_leaves_the_range() {
    let domain = ValueDomain::new(0.0, 9.0).with_step(4.0);
    assert_eq!(domain.constrain(8.9), 8.0);
    assert_eq!(domain.constrain(9.0), 8.0);
    let coarse = ValueDomain::new(0.0, 10.0).with_step(8.0);
    assert_eq!(coarse.constrain(10.0), 8.0);
    assert_eq!(coarse.constrain(12.5), 10.0);
}

#[test]
fn fractional_steps_store_clean_decimals() {
    let domain = ValueDomain::new(0.0, 1.0).with_step(0.1);
    assert_eq!(domain.constrain(0.3), 0.3);
    assert_eq!(domain.constrain(0.7000001), 0.7);
    assert_eq!(map_angle_to_domain(-58.0, &domain), 0.3);

    let fine = ValueDomain::new(0.0, 1.0).with_step(0.05);
    assert_eq!(fine.constrain(0.149), 0.15);
}

#[test]
fn non_positive_step_disables_quantization() {
    let domain = ValueDomain::new(0.0, 10.0).with_step(0.0);
    assert_eq!(domain.constrain(4.6), 4.6);
    let negative = ValueDomain::new(0.0, 10.0).with_step(-1.0);
    assert_eq!(negative.constrain(4.6), 4.6);
}

#[test]
fn degenerate_range_draws_at_sweep_start() {
    let domain = ValueDomain::new(5.0, 5.0);
    assert_eq!(domain_to_angle(5.0, &domain), SWEEP_MIN_DEG);
}

#[test]
fn value_to_angle_covers_the_sweep() {
    let domain = ValueDomain::new(0.0, 100.0);
    assert_eq!(domain_to_angle(0.0, &domain), SWEEP_MIN_DEG);
    assert_eq!(domain_to_angle(100.0, &domain), SWEEP_MAX_DEG);
    assert_eq!(domain_to_angle(50.0, &domain), 0.0);
    assert_eq!(domain_to_angle(250.0, &domain), SWEEP_MAX_DEG);
}

#[test]
fn ratio_is_clamped() {
    let domain = ValueDomain::new(0.0, 100.0);
    assert_eq!(domain.ratio(25.0), 0.25);
    assert_eq!(domain.ratio(-10.0), 0.0);
    assert_eq!(domain.ratio(140.0), 1.0);
}

#[test]
fn arc_path_uses_large_arc_flag_past_half_circle() {
    let full = describe_arc(50.0, 50.0, 40.0, SWEEP_MIN_DEG, SWEEP_MAX_DEG);
    assert!(full.starts_with("M "));
    assert!(full.contains(" A 40 40 0 1 0 "), "unexpected path {full}");

    let quarter = describe_arc(50.0, 50.0, 40.0, 0.0, 90.0);
    assert!(quarter.starts_with("M 90 50 A 40 40 0 0 0 "), "unexpected path {quarter}");
    assert!(quarter.ends_with(" 10"), "unexpected path {quarter}");
}
