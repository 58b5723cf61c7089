use rand::prelude::*;
use rand_pcg::Pcg64;

use crate::cloudlet::{Cloudlet, CloudletTier};
use crate::generator::{CloudletGenerator, CompositeCloudletGenerator, ConstCloudletGenerator, StatCloudletGenerator};
use crate::series::SeriesTable;

/// A client session: one app-tier and one DB-tier cloudlet stream anchored
/// at an arrival time. The generators are consumed by whoever owns the
/// session; everything else is fixed at creation.
pub struct Session {
    pub id: u64,
    pub user_id: u32,
    pub arrival_time: f64,
    /// Latest time by which both tiers are guaranteed exhausted.
    pub deadline: f64,
    /// Expected number of app-tier cloudlets.
    pub cloudlet_count: usize,
    pub metadata: Vec<String>,
    pub app_tier: Box<dyn CloudletGenerator>,
    pub db_tier: CompositeCloudletGenerator,
}

impl Session {
    pub fn is_exhausted(&self) -> bool {
        !self.app_tier.has_next() && !self.db_tier.has_next()
    }
}

/// Synthesizes one full session anchored at a given arrival time.
pub trait SessionGenerator {
    fn generate(&mut self, arrival_time: f64) -> Session;
}

/// Produces sessions of a fixed shape: both tiers emit caller-supplied
/// prototype cloudlets a fixed number of times.
pub struct ConstSessionGenerator {
    user_id: u32,
    cloudlet_count: usize,
    app_cloudlet: Cloudlet,
    db_cloudlet: Cloudlet,
    /// Nominal duration of one cloudlet, used to derive the deadline.
    cloudlet_duration: f64,
    /// Absolute deadline applied to every session instead of the derived one.
    deadline: Option<f64>,
    metadata: Vec<String>,
    next_id: u64,
}

impl ConstSessionGenerator {
    pub fn new(
        user_id: u32,
        cloudlet_count: usize,
        app_cloudlet: Cloudlet,
        db_cloudlet: Cloudlet,
        cloudlet_duration: f64,
        deadline: Option<f64>,
        metadata: Vec<String>,
    ) -> Self {
        Self {
            user_id,
            cloudlet_count,
            app_cloudlet,
            db_cloudlet,
            cloudlet_duration,
            deadline,
            metadata,
            next_id: 0,
        }
    }
}

impl SessionGenerator for ConstSessionGenerator {
    fn generate(&mut self, arrival_time: f64) -> Session {
        let id = self.next_id;
        self.next_id += 1;
        let app_tier = ConstCloudletGenerator::new(self.app_cloudlet.clone(), self.cloudlet_count);
        let db_tier = CompositeCloudletGenerator::new(vec![Box::new(ConstCloudletGenerator::new(
            self.db_cloudlet.clone(),
            self.cloudlet_count,
        )) as Box<dyn CloudletGenerator>]);
        let deadline = self
            .deadline
            .unwrap_or(arrival_time + self.cloudlet_count as f64 * self.cloudlet_duration);
        Session {
            id,
            user_id: self.user_id,
            arrival_time,
            deadline,
            cloudlet_count: self.cloudlet_count,
            metadata: self.metadata.clone(),
            app_tier: Box::new(app_tier),
            db_tier,
        }
    }
}

/// Builds sessions from empirical parameter tables, one statistical
/// generator per tier. The DB tier is a composite of `db_concurrency`
/// generators so that several DB calls can be active per logical step.
pub struct StatSessionGenerator {
    app_table: SeriesTable,
    db_table: SeriesTable,
    user_id: u32,
    /// Reference payload size attached to DB-tier cloudlets.
    data_size: u64,
    sampling_step: f64,
    jitter: f64,
    db_concurrency: usize,
    rng: Pcg64,
    next_id: u64,
}

impl StatSessionGenerator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        app_table: SeriesTable,
        db_table: SeriesTable,
        user_id: u32,
        data_size: u64,
        sampling_step: f64,
        jitter: f64,
        db_concurrency: usize,
        seed: u64,
    ) -> Self {
        if !sampling_step.is_finite() || sampling_step <= 0.0 {
            panic!("Invalid sampling step {}", sampling_step);
        }
        if db_concurrency == 0 {
            panic!("DB concurrency must be positive");
        }
        Self {
            app_table,
            db_table,
            user_id,
            data_size,
            sampling_step,
            jitter,
            db_concurrency,
            rng: Pcg64::seed_from_u64(seed),
            next_id: 0,
        }
    }
}

impl SessionGenerator for StatSessionGenerator {
    fn generate(&mut self, arrival_time: f64) -> Session {
        let id = self.next_id;
        self.next_id += 1;
        let app_tier = StatCloudletGenerator::new(&self.app_table, CloudletTier::App, 0, self.jitter, self.rng.gen());
        let mut members: Vec<Box<dyn CloudletGenerator>> = Vec::with_capacity(self.db_concurrency);
        for _ in 0..self.db_concurrency {
            members.push(Box::new(StatCloudletGenerator::new(
                &self.db_table,
                CloudletTier::Db,
                self.data_size,
                self.jitter,
                self.rng.gen(),
            )));
        }
        // The session must never need sampling past the last recorded point.
        let deadline = arrival_time + self.app_table.last_time().max(self.db_table.last_time()) + self.sampling_step;
        log::trace!("session #{} arrives at {} with deadline {}", id, arrival_time, deadline);
        Session {
            id,
            user_id: self.user_id,
            arrival_time,
            deadline,
            cloudlet_count: self.app_table.step_count(),
            metadata: Vec::new(),
            app_tier: Box::new(app_tier),
            db_tier: CompositeCloudletGenerator::new(members),
        }
    }
}
