use mpintir::callbacks::{FileWriterCallback, SimpleCallback};
use mpintir::integrators::midpoint::{self, Traversal};
use mpintir::{Checkpoint, ConfigurationError, Error, IntegrationRequest};

use assert_approx_eq::assert_approx_eq;
use rand::Rng;
use rand_pcg::Pcg64;
use std::fs::read_to_string;
use tempfile::NamedTempFile;

/// The number of threads used where the thread count does not matter.
const CORES: usize = 4;

fn integrate(f: impl Fn(&[f64]) -> f64 + Send + Sync, request: &IntegrationRequest<f64>) -> f64 {
    midpoint::integrate(&f, request, CORES).unwrap()
}

#[test]
fn single_integral_one_var() {
    let request = IntegrationRequest::new(1, vec![0.0], vec![1.0], 1002.0);
    let value = integrate(|x| x[0].sin(), &request);

    assert_approx_eq!(value, 0.46, 1e-2);
    assert_approx_eq!(value, 1.0 - 1.0f64.cos(), 1e-6);
}

#[test]
fn single_integral_with_fixed_parameter() {
    // the second coordinate is not integrated over and keeps its seed value
    let request =
        IntegrationRequest::new(1, vec![-1.0], vec![5.0], 1012.0).with_seed(vec![0.0, 3.0]);
    let value = integrate(|x| (-x[0] + x[1]).exp(), &request);

    assert_eq!(value.round(), 54.0);
}

#[test]
fn double_integral_two_var() {
    let request = IntegrationRequest::new(2, vec![0.0, 0.0], vec![4.0, 2.0], 350.0);
    let value = integrate(|x| x[0] + 2.0 * x[1], &request);

    assert_eq!(value.round(), 32.0);
}

#[test]
fn double_integral_one_var() {
    let request = IntegrationRequest::new(2, vec![-10.0, 3.0], vec![10.0, 4.0], 405.0)
        .with_seed(vec![-17.0, 0.0]);
    let value = integrate(|x| 289.0 + x[1] * x[1], &request);

    assert_eq!(value.round(), 6027.0);
}

#[test]
fn triple_integral_three_var() {
    let request = IntegrationRequest::new(3, vec![-2.0, -2.0, 0.0], vec![4.0, 6.0, 3.0], 100.0);
    let value = integrate(|x| x[0] + x[1] + x[2], &request);

    assert_eq!(value.round(), 648.0);
}

#[test]
fn triple_integral_two_var() {
    let request = IntegrationRequest::new(3, vec![-2.0, 1.0, 0.0], vec![2.0, 4.0, 3.0], 180.0)
        .with_seed(vec![0.0, 5.0, 0.0]);
    let value = integrate(|x| x[0] * x[0] + x[1], &request);

    assert_eq!(value.round(), 138.0);
}

#[test]
fn triple_integral_one_var() {
    let request = IntegrationRequest::new(3, vec![0.0, 0.0, 0.0], vec![2.0, 1.0, 3.0], 100.0);
    let value = integrate(|x| x[0] + 5.0 - 10.0, &request);

    assert_eq!(value.round(), -24.0);
}

#[test]
fn triple_integral_three_var_high_acc() {
    let request = IntegrationRequest::new(3, vec![0.0; 3], vec![1.0; 3], 200.0);
    let value = integrate(|x| 1.0 / 3.0 * x[0] * x[1] * x[2], &request);

    assert_approx_eq!(value, 1.0 / 24.0, 1e-3);
}

#[test]
fn double_integral_two_var_high_acc() {
    let request = IntegrationRequest::new(2, vec![0.0; 2], vec![1.0; 2], 300.0);
    let value = integrate(|x| 1.0 / 9.0 * x[0] * x[1], &request);

    assert_approx_eq!(value, 1.0 / 36.0, 1e-3);
}

#[test]
fn separability_law() {
    // f(x) = g0(x0) + g1(x1) + g2(x2) with known antiderivatives
    let f = |x: &[f64]| x[0].sin() + x[1] * x[1] + (-x[2]).exp();
    let antiderivatives: [fn(f64) -> f64; 3] = [
        |t: f64| -t.cos(),
        |t: f64| t * t * t / 3.0,
        |t: f64| -(-t).exp(),
    ];

    let mut rng = Pcg64::new(0xcafef00dd15ea5e5, 0xa02bdbf7bb3c0a7ac28fa16a64abf96);
    let steps = 60.0;

    for _ in 0..5 {
        let lower = (0..3).map(|_| rng.gen_range(-2.0, 0.0)).collect::<Vec<f64>>();
        let upper = lower
            .iter()
            .map(|&l| l + rng.gen_range(0.5, 2.0))
            .collect::<Vec<f64>>();
        let widths = lower
            .iter()
            .zip(&upper)
            .map(|(l, u)| u - l)
            .collect::<Vec<_>>();
        let volume = widths.iter().product::<f64>();

        let exact = (0..3)
            .map(|i| {
                (antiderivatives[i](upper[i]) - antiderivatives[i](lower[i])) * volume / widths[i]
            })
            .sum::<f64>();

        let request = IntegrationRequest::new(3, lower, upper, steps);
        let value = midpoint::integrate(&f, &request, 1).unwrap();

        // the error of the midpoint rule is of order 1/n^2
        let max_width = widths.iter().cloned().fold(0.0, f64::max);
        let tolerance = volume * max_width * max_width / (steps * steps);
        assert!(
            (value - exact).abs() < tolerance,
            "{} vs {} (tolerance {})",
            value,
            exact,
            tolerance
        );
    }
}

#[test]
fn reduction_invariance() {
    let request = IntegrationRequest::new(3, vec![-2.0, -2.0, 0.0], vec![4.0, 6.0, 3.0], 50.0);
    let f = |x: &[f64]| (x[0] * x[1]).sin() + x[2];
    let reference = midpoint::integrate(&f, &request, 1).unwrap();

    for n_cores in 2..=8 {
        let value = midpoint::integrate(&f, &request, n_cores).unwrap();
        assert_approx_eq!(value, reference, 1e-9);
    }
}

#[test]
fn validation_rejects_malformed_input() {
    let f = |x: &[f64]| x[0];

    let zero_dim = IntegrationRequest::new(0, vec![0.0], vec![1.0], 10.0);
    assert!(matches!(
        midpoint::integrate(&f, &zero_dim, CORES),
        Err(Error::Configuration(ConfigurationError::ZeroDimension))
    ));

    let no_lower = IntegrationRequest::new(1, vec![], vec![1.0], 10.0);
    assert!(matches!(
        midpoint::integrate(&f, &no_lower, CORES),
        Err(Error::Configuration(ConfigurationError::EmptyLowerBounds))
    ));

    let no_upper = IntegrationRequest::new(1, vec![0.0], vec![], 10.0);
    assert!(matches!(
        midpoint::integrate(&f, &no_upper, CORES),
        Err(Error::Configuration(ConfigurationError::EmptyUpperBounds))
    ));

    let no_steps = IntegrationRequest::new(1, vec![0.0], vec![1.0], 0.0);
    assert!(matches!(
        midpoint::integrate(&f, &no_steps, CORES),
        Err(Error::Configuration(ConfigurationError::InvalidStepCount))
    ));
}

#[test]
fn monotone_refinement() {
    let f = |x: &[f64]| (x[0] + x[1]).exp();
    let exact = (1.0f64.exp() - 1.0).powi(2);

    let file = NamedTempFile::new().unwrap();
    let callback = FileWriterCallback::new(file.path());

    let request = IntegrationRequest::new(2, vec![0.0, 0.0], vec![1.0, 1.0], 1.0);
    let steps = [2.0, 4.0, 8.0, 16.0, 32.0, 64.0];

    let chkpts = midpoint::integrate_refinements(
        &f,
        &request,
        CORES,
        Traversal::Recursive,
        &steps,
        &callback,
    )
    .unwrap();

    assert_eq!(chkpts.len(), steps.len());

    let errors = chkpts
        .iter()
        .map(|c| (c.estimate() - exact).abs())
        .collect::<Vec<_>>();

    for (pair, chkpt) in errors.windows(2).zip(&chkpts[1..]) {
        assert!(pair[1] < pair[0]);
        // doubling the step count divides the error by about four
        assert!(pair[1] < 0.3 * pair[0], "error at n={} too large", chkpt.steps());
    }

    // the callback wrote the checkpoints of all runs
    let written: Vec<Checkpoint<f64>> =
        serde_json::from_str(&read_to_string(file.path()).unwrap()).unwrap();
    assert_eq!(written.len(), steps.len());

    for (w, c) in written.iter().zip(&chkpts) {
        assert_eq!(w.steps(), c.steps());
        assert_eq!(w.calls(), c.steps() * c.steps());
        assert_approx_eq!(w.estimate(), c.estimate(), 1e-12);
    }
}

#[test]
fn refinement_with_printing_callback() {
    let request = IntegrationRequest::new(1, vec![0.0], vec![1.0], 1.0);
    let chkpts = midpoint::integrate_refinements(
        &|x: &[f64]| x[0] * x[0],
        &request,
        2,
        Traversal::Odometer,
        &[10.0, 100.0],
        &SimpleCallback {},
    )
    .unwrap();

    assert_approx_eq!(chkpts[1].estimate(), 1.0 / 3.0, 1e-4);
    assert_eq!(chkpts[1].threads(), 2);
}
