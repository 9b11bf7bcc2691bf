//! Convergence behaviour of the spring integrator at the simulation tick rate

use receiver_math::Spring;

const DT: f32 = 1.0 / 60.0;

fn run(mut spring: Spring, ticks: usize) -> (Spring, f32) {
    let start = spring.state;
    let target = spring.target_state;
    let direction = (target - start).signum();
    let mut overshoot = 0.0f32;
    for _ in 0..ticks {
        spring.update(DT);
        overshoot = overshoot.max((spring.state - target) * direction);
    }
    (spring, overshoot)
}

#[test]
fn test_aim_spring_converges() {
    let (spring, overshoot) = run(Spring::new(0.0, 1.0, 100.0, 0.00001), 1000);
    assert!((spring.state - 1.0).abs() < 1e-4);
    assert!(spring.vel.abs() < 1e-3);
    assert!(overshoot < 0.25, "overshoot {} too large", overshoot);
}

#[test]
fn test_recoil_spring_converges() {
    let (spring, overshoot) = run(Spring::new(0.0, 1.0, 800.0, 0.000001), 1000);
    assert!((spring.state - 1.0).abs() < 1e-4);
    assert!(overshoot < 0.5, "overshoot {} too large", overshoot);
}

#[test]
fn test_converges_from_above() {
    let (spring, _) = run(Spring::new(1.0, 0.0, 100.0, 0.000001), 1000);
    assert!(spring.state.abs() < 1e-4);
    assert!(spring.is_settled_at_zero(0.01));
}

#[test]
fn test_error_envelope_shrinks() {
    let mut spring = Spring::new(0.0, 1.0, 100.0, 0.00001);
    let mut windows = Vec::new();
    for _ in 0..8 {
        let mut worst = 0.0f32;
        for _ in 0..60 {
            spring.update(DT);
            worst = worst.max((spring.state - 1.0).abs());
        }
        windows.push(worst);
    }
    for pair in windows.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-6, "error grew: {:?}", windows);
    }
}

/// `strength * error² + vel²` never grows once the spring has slowed down,
/// and each velocity reversal lands closer to the target than the last.
fn assert_settles_monotonically(mut spring: Spring, epsilon: f32) {
    let target = spring.target_state;
    let energy = |s: &Spring| s.strength * (s.state - target).powi(2) + s.vel * s.vel;

    let mut ticks = 0;
    while spring.vel.abs() >= epsilon || ticks == 0 {
        spring.update(DT);
        ticks += 1;
        assert!(ticks < 1000, "velocity never dropped below {}", epsilon);
    }

    let mut last_energy = energy(&spring);
    let mut last_reversal: Option<f32> = None;
    for tick in 0..1000 {
        let before = spring.vel;
        spring.update(DT);
        let now = energy(&spring);
        assert!(
            now <= last_energy * (1.0 + 1e-4) + 1e-8,
            "energy grew at tick {}: {} -> {}",
            tick,
            last_energy,
            now
        );
        last_energy = now;

        if before * spring.vel <= 0.0 {
            let error = (spring.state - target).abs();
            if let Some(previous) = last_reversal {
                assert!(
                    error <= previous + 1e-6,
                    "reversal at tick {} overshot further: {} -> {}",
                    tick,
                    previous,
                    error
                );
            }
            last_reversal = Some(error);
        }
    }
    assert!((spring.state - target).abs() < 1e-4);
}

#[test]
fn test_aim_spring_settles_once_slow() {
    assert_settles_monotonically(Spring::new(0.0, 1.0, 100.0, 0.00001), 1e-2);
}

#[test]
fn test_recoil_spring_settles_once_slow() {
    assert_settles_monotonically(Spring::new(0.0, 1.0, 800.0, 0.000001), 1e-2);
}

#[test]
fn test_spring_settles_from_above_once_slow() {
    assert_settles_monotonically(Spring::new(1.0, 0.0, 100.0, 0.000001), 1e-3);
}
