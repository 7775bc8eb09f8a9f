use super::*;

#[test]
fn default_period_is_sixteen_coords() {
    let t = EmitThrottle::default();
    assert!(!t.should_emit(2));
    assert!(!t.should_emit(14));
    assert!(t.should_emit(16));
    assert!(!t.should_emit(18));
    assert!(t.should_emit(32));
}

#[test]
fn zero_count_never_emits() {
    assert!(!EmitThrottle::default().should_emit(0));
    assert!(!EmitThrottle::new(2).should_emit(0));
}

#[test]
fn custom_period() {
    let t = EmitThrottle::new(6);
    assert!(t.should_emit(6));
    assert!(t.should_emit(12));
    assert!(!t.should_emit(8));
}

#[test]
fn tiny_period_clamps_to_every_point() {
    let t = EmitThrottle::new(0);
    assert!(t.should_emit(2));
    assert!(t.should_emit(4));
}
