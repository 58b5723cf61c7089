mod common;
use common::assert_float_eq;

use sessim_workload::frequency::{FrequencyFunction, PeriodicFrequencyFunction, PoissonFrequencyFunction};

fn sample_counts(f: &mut dyn FrequencyFunction, window_length: f64, trials: usize) -> Vec<f64> {
    (0..trials)
        .map(|i| f.count(i as f64 * window_length, window_length) as f64)
        .collect()
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn variance(samples: &[f64]) -> f64 {
    let m = mean(samples);
    samples.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (samples.len() - 1) as f64
}

#[test]
// The mean and the variance of a Poisson count both equal rate * L / unit.
fn test_poisson_moments() {
    let mut f = PoissonFrequencyFunction::new(100., 10., 123);
    let counts = sample_counts(&mut f, 100., 100_000);
    assert_float_eq(mean(&counts), 10.0, 0.1);
    assert_float_eq(variance(&counts), 10.0, 0.5);
}

#[test]
// unit = 100, rate = 10: windows of length 0.11, 1, 3 and 5.7 units carry
// 1.1, 10, 30 and 57 expected arrivals.
fn test_counts_scale_with_window_length() {
    for (window_length, expected) in [(11., 1.1), (100., 10.), (300., 30.), (570., 57.)] {
        let mut f = PoissonFrequencyFunction::new(100., 10., 47);
        let trials = 50_000;
        let counts = sample_counts(&mut f, window_length, trials);
        let tolerance = 5.0 * (expected / trials as f64).sqrt() + 0.01;
        assert_float_eq(mean(&counts), expected, tolerance);
    }
}

#[test]
fn test_zero_length_window_has_no_arrivals() {
    let mut f = PoissonFrequencyFunction::new(100., 10., 123);
    for i in 0..1000 {
        assert_eq!(f.count(i as f64, 0.), 0);
    }
}

#[test]
fn test_zero_rate_has_no_arrivals() {
    let mut f = PoissonFrequencyFunction::new(100., 0., 123);
    for i in 0..1000 {
        assert_eq!(f.count(i as f64 * 10., 10.), 0);
    }
}

#[test]
#[should_panic(expected = "Invalid period length")]
fn test_negative_window_length_is_rejected() {
    let mut f = PoissonFrequencyFunction::new(100., 10., 123);
    f.count(0., -1.);
}

#[test]
#[should_panic(expected = "Invalid period length")]
fn test_non_finite_window_length_is_rejected() {
    let mut f = PoissonFrequencyFunction::new(100., 10., 123);
    f.count(0., f64::NAN);
}

#[test]
#[should_panic(expected = "Invalid arrival rate")]
fn test_negative_rate_is_rejected() {
    PoissonFrequencyFunction::new(100., -10., 123);
}

#[test]
// With zero amplitude the periodic variant degenerates to a constant rate.
fn test_periodic_with_zero_amplitude_matches_constant_rate() {
    let mut f = PeriodicFrequencyFunction::new(100., 10., 0., 400., 0., 123);
    let counts = sample_counts(&mut f, 100., 50_000);
    assert_float_eq(mean(&counts), 10.0, 0.15);
}

#[test]
// base = amplitude: the rate touches zero at the sinusoid trough, so a
// window centered there never sees an arrival, while a window centered at
// the crest sees twice the base rate.
fn test_periodic_rate_modulation() {
    let mut f = PeriodicFrequencyFunction::new(100., 10., 10., 400., 0., 123);
    // trough: sin(2 * pi * 300 / 400) = -1
    for _ in 0..1000 {
        assert_eq!(f.count(295., 10.), 0);
    }
    // crest: sin(2 * pi * 100 / 400) = 1, rate 20, expectation 20 * 10 / 100
    let counts: Vec<f64> = (0..50_000).map(|_| f.count(95., 10.) as f64).collect();
    assert_float_eq(mean(&counts), 2.0, 0.05);
}
