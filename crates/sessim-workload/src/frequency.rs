//! Stochastic arrival-count models.

use std::f64::consts::PI;

use rand::prelude::*;
use rand_distr::Poisson;
use rand_pcg::Pcg64;

/// Samples the number of session arrivals within an arbitrary sub-interval
/// of simulated time. For a window of length L the expectation of the
/// sampled count is `rate * L / unit`.
pub trait FrequencyFunction {
    /// Number of arrivals within `[period_start, period_start + period_length)`.
    fn count(&mut self, period_start: f64, period_length: f64) -> u64;
    /// Time unit the nominal rate refers to.
    fn unit(&self) -> f64;
    /// Nominal number of arrivals per time unit.
    fn rate(&self) -> f64;
}

fn check_period(period_length: f64) {
    if !period_length.is_finite() || period_length < 0.0 {
        panic!("Invalid period length {}", period_length);
    }
}

fn sample_poisson(lambda: f64, rng: &mut Pcg64) -> u64 {
    if lambda <= 0.0 {
        return 0;
    }
    let sampled: f64 = rng.sample(Poisson::new(lambda).unwrap());
    sampled as u64
}

/// Constant-rate Poisson arrival process: over repeated sampling both the
/// mean and the variance of the count for a window of length L converge to
/// `rate * L / unit`.
pub struct PoissonFrequencyFunction {
    unit: f64,
    rate: f64,
    rng: Pcg64,
}

impl PoissonFrequencyFunction {
    pub fn new(unit: f64, rate: f64, seed: u64) -> Self {
        if !unit.is_finite() || unit <= 0.0 {
            panic!("Invalid time unit {}", unit);
        }
        if !rate.is_finite() || rate < 0.0 {
            panic!("Invalid arrival rate {}", rate);
        }
        Self {
            unit,
            rate,
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl FrequencyFunction for PoissonFrequencyFunction {
    fn count(&mut self, _period_start: f64, period_length: f64) -> u64 {
        check_period(period_length);
        sample_poisson(self.rate * period_length / self.unit, &mut self.rng)
    }

    fn unit(&self) -> f64 {
        self.unit
    }

    fn rate(&self) -> f64 {
        self.rate
    }
}

/// Poisson arrivals whose rate follows a sinusoid over simulated time,
/// modelling diurnal load swings. The effective rate at time t is
/// `base_rate + amplitude * sin(2 * pi * t / period + phase)`, clamped at
/// zero, evaluated at the middle of the sampled window.
pub struct PeriodicFrequencyFunction {
    unit: f64,
    base_rate: f64,
    amplitude: f64,
    period: f64,
    phase: f64,
    rng: Pcg64,
}

impl PeriodicFrequencyFunction {
    pub fn new(unit: f64, base_rate: f64, amplitude: f64, period: f64, phase: f64, seed: u64) -> Self {
        if !unit.is_finite() || unit <= 0.0 {
            panic!("Invalid time unit {}", unit);
        }
        if !base_rate.is_finite() || base_rate < 0.0 {
            panic!("Invalid arrival rate {}", base_rate);
        }
        if !period.is_finite() || period <= 0.0 {
            panic!("Invalid rate period {}", period);
        }
        Self {
            unit,
            base_rate,
            amplitude,
            period,
            phase,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    fn rate_at(&self, time: f64) -> f64 {
        (self.base_rate + self.amplitude * (2. * PI * time / self.period + self.phase).sin()).max(0.0)
    }
}

impl FrequencyFunction for PeriodicFrequencyFunction {
    fn count(&mut self, period_start: f64, period_length: f64) -> u64 {
        check_period(period_length);
        let rate = self.rate_at(period_start + period_length / 2.);
        sample_poisson(rate * period_length / self.unit, &mut self.rng)
    }

    fn unit(&self) -> f64 {
        self.unit
    }

    fn rate(&self) -> f64 {
        self.base_rate
    }
}
