//! Lazy generators of cloudlet streams.

use std::collections::VecDeque;

use rand::prelude::*;
use rand_distr::Normal;
use rand_pcg::Pcg64;

use crate::cloudlet::{Cloudlet, CloudletTier};
use crate::series::{self, SeriesTable};

/// A lazy, finite, non-restartable stream of cloudlets. Callers are
/// expected to check `has_next` before calling `next`; `next` past
/// exhaustion returns `None`, it never repeats old values.
pub trait CloudletGenerator {
    fn has_next(&self) -> bool;
    fn next(&mut self) -> Option<Cloudlet>;
    /// Number of cloudlets left in the stream.
    fn remaining(&self) -> usize;
}

/// Emits the same cloudlet shape a fixed number of times.
pub struct ConstCloudletGenerator {
    prototype: Cloudlet,
    remaining: usize,
}

impl ConstCloudletGenerator {
    pub fn new(prototype: Cloudlet, count: usize) -> Self {
        Self {
            prototype,
            remaining: count,
        }
    }
}

impl CloudletGenerator for ConstCloudletGenerator {
    fn has_next(&self) -> bool {
        self.remaining > 0
    }

    fn next(&mut self) -> Option<Cloudlet> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.prototype.clone())
    }

    fn remaining(&self) -> usize {
        self.remaining
    }
}

/// Generator backed by sampled empirical series. For every resource series
/// in the table one independently seeded sampler is built at construction,
/// and each per-step draw is centered on the value the table records for
/// that step. Jitter 0 replays the table exactly.
pub struct StatCloudletGenerator {
    cpu_length: Vec<f64>,
    ram: Vec<f64>,
    io_length: Option<Vec<f64>>,
    data_size: u64,
    tier: CloudletTier,
    step: usize,
    steps: usize,
}

impl StatCloudletGenerator {
    /// `jitter` is the standard deviation of a draw relative to the
    /// recorded value. The "Time" series is not sampled, it only drives
    /// deadline computation in session generators.
    pub fn new(table: &SeriesTable, tier: CloudletTier, data_size: u64, jitter: f64, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let cpu_values = table
            .get(series::CPU_LENGTH)
            .unwrap_or_else(|| panic!("Series table has no \"{}\" series", series::CPU_LENGTH));
        let ram_values = table
            .get(series::RAM)
            .unwrap_or_else(|| panic!("Series table has no \"{}\" series", series::RAM));
        Self {
            cpu_length: sample_series(cpu_values, jitter, &mut rng),
            ram: sample_series(ram_values, jitter, &mut rng),
            io_length: table.get(series::IO_LENGTH).map(|v| sample_series(v, jitter, &mut rng)),
            data_size,
            tier,
            step: 0,
            steps: table.step_count(),
        }
    }
}

/// One independently seeded sampler per series, unbiased around the
/// recorded values.
fn sample_series(values: &[f64], jitter: f64, rng: &mut Pcg64) -> Vec<f64> {
    let mut series_rng = Pcg64::seed_from_u64(rng.gen::<u64>());
    values
        .iter()
        .map(|&value| {
            let sigma = jitter * value.abs();
            if sigma == 0.0 {
                value
            } else {
                let sampled: f64 = series_rng.sample(Normal::new(value, sigma).unwrap());
                sampled.max(0.0)
            }
        })
        .collect()
}

impl CloudletGenerator for StatCloudletGenerator {
    fn has_next(&self) -> bool {
        self.step < self.steps
    }

    fn next(&mut self) -> Option<Cloudlet> {
        if self.step >= self.steps {
            return None;
        }
        let i = self.step;
        self.step += 1;
        Some(Cloudlet::new(
            self.cpu_length[i],
            self.ram[i].round() as u64,
            self.io_length.as_ref().map(|io| io[i]),
            self.data_size,
            self.tier,
            Vec::new(),
        ))
    }

    fn remaining(&self) -> usize {
        self.steps - self.step
    }
}

/// Aggregates several generators into a single stream, used to represent a
/// tier made of several concurrently active sub-components. Exhausts
/// exactly when its last member exhausts.
///
/// The stream can be consumed per step via `next_batch` or flattened via
/// the `CloudletGenerator` impl; the two modes must not be mixed.
pub struct CompositeCloudletGenerator {
    members: Vec<Box<dyn CloudletGenerator>>,
    buffer: VecDeque<Cloudlet>,
}

impl CompositeCloudletGenerator {
    pub fn new(members: Vec<Box<dyn CloudletGenerator>>) -> Self {
        Self {
            members,
            buffer: VecDeque::new(),
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Advances every live member one step and returns the collected
    /// cloudlets in member order. `None` once every member is exhausted.
    pub fn next_batch(&mut self) -> Option<Vec<Cloudlet>> {
        if !self.members.iter().any(|m| m.has_next()) {
            return None;
        }
        let mut batch = Vec::new();
        for member in self.members.iter_mut() {
            if let Some(cloudlet) = member.next() {
                batch.push(cloudlet);
            }
        }
        Some(batch)
    }
}

impl CloudletGenerator for CompositeCloudletGenerator {
    fn has_next(&self) -> bool {
        !self.buffer.is_empty() || self.members.iter().any(|m| m.has_next())
    }

    fn next(&mut self) -> Option<Cloudlet> {
        if self.buffer.is_empty() {
            if let Some(batch) = self.next_batch() {
                self.buffer.extend(batch);
            }
        }
        self.buffer.pop_front()
    }

    fn remaining(&self) -> usize {
        self.buffer.len() + self.members.iter().map(|m| m.remaining()).sum::<usize>()
    }
}
