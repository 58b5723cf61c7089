use rand::prelude::*;
use rand_pcg::Pcg64;

use crate::frequency::FrequencyFunction;
use crate::session::{Session, SessionGenerator};

/// Sessions arriving at one time instant.
pub struct ArrivalBatch {
    pub time: f64,
    pub sessions: Vec<Session>,
}

/// Decides how many sessions arrive within a scheduling tick and where in
/// the window they are placed. Called once per tick with non-decreasing
/// `window_start`; the result is sorted by ascending arrival time and is
/// fully materialized before return.
pub trait WorkloadGenerator {
    fn generate(&mut self, window_start: f64, window_length: f64) -> Vec<ArrivalBatch>;
}

fn check_window(window_length: f64) {
    if !window_length.is_finite() || window_length < 0.0 {
        panic!("Invalid window length {}", window_length);
    }
}

/// Emits a fixed number of sessions every tick, all anchored at the start
/// of the window.
pub struct ConstWorkloadGenerator {
    sessions_per_tick: u32,
    session_generator: Box<dyn SessionGenerator>,
}

impl ConstWorkloadGenerator {
    pub fn new(sessions_per_tick: u32, session_generator: Box<dyn SessionGenerator>) -> Self {
        Self {
            sessions_per_tick,
            session_generator,
        }
    }
}

impl WorkloadGenerator for ConstWorkloadGenerator {
    fn generate(&mut self, window_start: f64, window_length: f64) -> Vec<ArrivalBatch> {
        check_window(window_length);
        if self.sessions_per_tick == 0 {
            return Vec::new();
        }
        let sessions = (0..self.sessions_per_tick)
            .map(|_| self.session_generator.generate(window_start))
            .collect();
        vec![ArrivalBatch {
            time: window_start,
            sessions,
        }]
    }
}

/// Gates an inner generator by an optional activity interval and an
/// optional budget of generation calls. Inactive calls return an empty
/// result and leave the internal state untouched.
pub struct BoundedWorkloadGenerator {
    inner: Box<dyn WorkloadGenerator>,
    start_time: Option<f64>,
    end_time: Option<f64>,
    remaining: Option<u32>,
}

impl BoundedWorkloadGenerator {
    pub fn new(
        inner: Box<dyn WorkloadGenerator>,
        start_time: Option<f64>,
        end_time: Option<f64>,
        remaining: Option<u32>,
    ) -> Self {
        Self {
            inner,
            start_time,
            end_time,
            remaining,
        }
    }

    /// Remaining generation call budget, `None` when unbounded.
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    fn is_active(&self, window_start: f64) -> bool {
        if let Some(start) = self.start_time {
            if window_start < start {
                return false;
            }
        }
        if let Some(end) = self.end_time {
            if window_start > end {
                return false;
            }
        }
        self.remaining.map_or(true, |r| r > 0)
    }
}

impl WorkloadGenerator for BoundedWorkloadGenerator {
    fn generate(&mut self, window_start: f64, window_length: f64) -> Vec<ArrivalBatch> {
        check_window(window_length);
        if !self.is_active(window_start) {
            return Vec::new();
        }
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        self.inner.generate(window_start, window_length)
    }
}

/// Arrival placement strategy for sessions within the generation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrivalPlacement {
    /// Anchor every session at the window start instant.
    WindowStart,
    /// Draw arrival times uniformly across the window.
    UniformJitter,
}

/// Samples the arrival count from a frequency function and synthesizes
/// that many sessions per tick.
pub struct StatWorkloadGenerator {
    frequency: Box<dyn FrequencyFunction>,
    session_generator: Box<dyn SessionGenerator>,
    placement: ArrivalPlacement,
    rng: Pcg64,
}

impl StatWorkloadGenerator {
    pub fn new(frequency: Box<dyn FrequencyFunction>, session_generator: Box<dyn SessionGenerator>, seed: u64) -> Self {
        Self {
            frequency,
            session_generator,
            placement: ArrivalPlacement::WindowStart,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    pub fn with_placement(mut self, placement: ArrivalPlacement) -> Self {
        self.placement = placement;
        self
    }
}

impl WorkloadGenerator for StatWorkloadGenerator {
    fn generate(&mut self, window_start: f64, window_length: f64) -> Vec<ArrivalBatch> {
        check_window(window_length);
        let count = self.frequency.count(window_start, window_length);
        log::debug!(
            "{} arrivals sampled for window [{}, {}]",
            count,
            window_start,
            window_start + window_length
        );
        if count == 0 {
            return Vec::new();
        }
        match self.placement {
            ArrivalPlacement::WindowStart => {
                let sessions = (0..count).map(|_| self.session_generator.generate(window_start)).collect();
                vec![ArrivalBatch {
                    time: window_start,
                    sessions,
                }]
            }
            ArrivalPlacement::UniformJitter => {
                let mut arrivals = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    if window_length == 0.0 {
                        arrivals.push(window_start);
                    } else {
                        arrivals.push(self.rng.gen_range(window_start..window_start + window_length));
                    }
                }
                arrivals.sort_by(|a, b| a.total_cmp(b));
                let mut batches: Vec<ArrivalBatch> = Vec::new();
                for time in arrivals {
                    let session = self.session_generator.generate(time);
                    match batches.last_mut() {
                        Some(last) if last.time == time => last.sessions.push(session),
                        _ => batches.push(ArrivalBatch {
                            time,
                            sessions: vec![session],
                        }),
                    }
                }
                batches
            }
        }
    }
}
