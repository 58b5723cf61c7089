//! Tables of named empirical series driving statistical generators.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the series holding per-step timestamps.
pub const TIME: &str = "Time";
/// Name of the series holding per-step CPU lengths.
pub const CPU_LENGTH: &str = "CPULength";
/// Name of the series holding per-step memory requirements.
pub const RAM: &str = "RAM";
/// Name of the series holding per-step I/O lengths.
pub const IO_LENGTH: &str = "IOLength";

/// Insertion-ordered mapping from series name to one recorded value per
/// simulated step. All series in one table must have equal length, the
/// table does not validate this.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesTable {
    series: IndexMap<String, Vec<f64>>,
}

impl SeriesTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates series table by reading it from .yaml file.
    pub fn from_file(file_name: &str) -> Self {
        serde_yaml::from_str(
            &std::fs::read_to_string(file_name).unwrap_or_else(|_| panic!("Can't read file {}", file_name)),
        )
        .unwrap_or_else(|_| panic!("Can't parse YAML from file {}", file_name))
    }

    /// Builder-style insertion of one named series.
    pub fn with_series(mut self, name: &str, values: Vec<f64>) -> Self {
        self.insert(name, values);
        self
    }

    pub fn insert(&mut self, name: &str, values: Vec<f64>) {
        self.series.insert(name.to_string(), values);
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of simulated steps recorded in the table (the length of its
    /// first series, 0 for an empty table).
    pub fn step_count(&self) -> usize {
        self.series.first().map(|(_, v)| v.len()).unwrap_or(0)
    }

    /// Last recorded value of the named series.
    pub fn last(&self, name: &str) -> Option<f64> {
        self.series.get(name).and_then(|v| v.last().copied())
    }

    /// Last recorded timestamp. Tables driving sessions must carry a
    /// non-empty "Time" series.
    pub fn last_time(&self) -> f64 {
        self.last(TIME)
            .unwrap_or_else(|| panic!("Series table has no \"{}\" series", TIME))
    }

    pub fn is_empty(&self) -> bool {
        self.step_count() == 0
    }
}
