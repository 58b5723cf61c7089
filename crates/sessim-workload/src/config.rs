//! Workload configuration.

use serde::{Deserialize, Serialize};

use crate::cloudlet::{Cloudlet, CloudletTier};
use crate::frequency::{FrequencyFunction, PeriodicFrequencyFunction, PoissonFrequencyFunction};
use crate::series::SeriesTable;
use crate::session::{ConstSessionGenerator, SessionGenerator, StatSessionGenerator};
use crate::workload::{
    ArrivalPlacement, BoundedWorkloadGenerator, ConstWorkloadGenerator, StatWorkloadGenerator, WorkloadGenerator,
};

fn default_one() -> usize {
    1
}

fn default_one_u32() -> u32 {
    1
}

/// Arrival-count model settings. A constant-rate Poisson process unless
/// `amplitude` and `period` request sinusoidal rate modulation.
#[derive(Clone, Serialize, Deserialize)]
pub struct RawFrequencyConfig {
    pub unit: f64,
    pub rate: f64,
    #[serde(default)]
    pub amplitude: Option<f64>,
    #[serde(default)]
    pub period: Option<f64>,
    #[serde(default)]
    pub phase: Option<f64>,
}

/// Fixed session shape.
#[derive(Clone, Serialize, Deserialize)]
pub struct RawConstSessionConfig {
    pub cloudlet_count: usize,
    pub cpu_length: f64,
    pub ram: u64,
    #[serde(default)]
    pub io_length: Option<f64>,
    #[serde(default)]
    pub data_size: u64,
    /// Nominal duration of one cloudlet, drives the session deadline.
    pub cloudlet_duration: f64,
    #[serde(default)]
    pub metadata: Vec<String>,
}

/// Table-driven session shape. Table paths point to YAML series tables.
#[derive(Clone, Serialize, Deserialize)]
pub struct RawStatSessionConfig {
    pub app_table: String,
    pub db_table: String,
    #[serde(default)]
    pub data_size: u64,
    pub sampling_step: f64,
    #[serde(default)]
    pub jitter: f64,
    #[serde(default = "default_one")]
    pub db_concurrency: usize,
}

/// YAML-serializable workload generator description. Exactly one of
/// `const_session` and `stat_session` must be set; `start_time`,
/// `end_time` and `budget` wrap the generator in a bounded one.
#[derive(Clone, Serialize, Deserialize)]
pub struct RawWorkloadConfig {
    /// One of "const", "stat".
    pub kind: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub user_id: u32,
    #[serde(default = "default_one_u32")]
    pub sessions_per_tick: u32,
    #[serde(default)]
    pub frequency: Option<RawFrequencyConfig>,
    #[serde(default)]
    pub const_session: Option<RawConstSessionConfig>,
    #[serde(default)]
    pub stat_session: Option<RawStatSessionConfig>,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
    /// Budget of generation calls, unbounded when absent.
    #[serde(default)]
    pub budget: Option<u32>,
    /// Spread arrivals uniformly across the window instead of anchoring
    /// them at the window start.
    #[serde(default)]
    pub jittered_arrivals: bool,
}

impl RawWorkloadConfig {
    /// Creates workload config by reading it from .yaml file.
    pub fn from_file(file_name: &str) -> Self {
        serde_yaml::from_str(
            &std::fs::read_to_string(file_name).unwrap_or_else(|_| panic!("Can't read file {}", file_name)),
        )
        .unwrap_or_else(|_| panic!("Can't parse YAML from file {}", file_name))
    }

    /// Resolves the config into a ready-to-use workload generator.
    pub fn build(&self) -> Box<dyn WorkloadGenerator> {
        let inner: Box<dyn WorkloadGenerator> = match self.kind.as_str() {
            "const" => Box::new(ConstWorkloadGenerator::new(
                self.sessions_per_tick,
                self.build_session_generator(),
            )),
            "stat" => {
                let mut generator = StatWorkloadGenerator::new(
                    self.build_frequency(),
                    self.build_session_generator(),
                    self.seed.wrapping_add(1),
                );
                if self.jittered_arrivals {
                    generator = generator.with_placement(ArrivalPlacement::UniformJitter);
                }
                Box::new(generator)
            }
            other => panic!("Unknown workload generator kind {}", other),
        };
        if self.start_time.is_some() || self.end_time.is_some() || self.budget.is_some() {
            Box::new(BoundedWorkloadGenerator::new(
                inner,
                self.start_time,
                self.end_time,
                self.budget,
            ))
        } else {
            inner
        }
    }

    fn build_session_generator(&self) -> Box<dyn SessionGenerator> {
        match (&self.const_session, &self.stat_session) {
            (Some(config), None) => {
                let app_cloudlet = Cloudlet::new(
                    config.cpu_length,
                    config.ram,
                    config.io_length,
                    config.data_size,
                    CloudletTier::App,
                    config.metadata.clone(),
                );
                let db_cloudlet = Cloudlet::new(
                    config.cpu_length,
                    config.ram,
                    config.io_length,
                    config.data_size,
                    CloudletTier::Db,
                    config.metadata.clone(),
                );
                Box::new(ConstSessionGenerator::new(
                    self.user_id,
                    config.cloudlet_count,
                    app_cloudlet,
                    db_cloudlet,
                    config.cloudlet_duration,
                    None,
                    config.metadata.clone(),
                ))
            }
            (None, Some(config)) => Box::new(StatSessionGenerator::new(
                SeriesTable::from_file(&config.app_table),
                SeriesTable::from_file(&config.db_table),
                self.user_id,
                config.data_size,
                config.sampling_step,
                config.jitter,
                config.db_concurrency,
                self.seed,
            )),
            _ => panic!("Exactly one of const_session and stat_session must be set"),
        }
    }

    fn build_frequency(&self) -> Box<dyn FrequencyFunction> {
        let config = self
            .frequency
            .as_ref()
            .unwrap_or_else(|| panic!("Workload generator kind {} requires a frequency config", self.kind));
        match (config.amplitude, config.period) {
            (Some(amplitude), Some(period)) => Box::new(PeriodicFrequencyFunction::new(
                config.unit,
                config.rate,
                amplitude,
                period,
                config.phase.unwrap_or(0.),
                self.seed,
            )),
            (None, None) => Box::new(PoissonFrequencyFunction::new(config.unit, config.rate, self.seed)),
            _ => panic!("Periodic frequency requires both amplitude and period"),
        }
    }
}
