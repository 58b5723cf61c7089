use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Tier a cloudlet belongs to within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CloudletTier {
    App,
    Db,
}

impl Display for CloudletTier {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            CloudletTier::App => write!(f, "app"),
            CloudletTier::Db => write!(f, "db"),
        }
    }
}

/// A single unit of simulated work with declared resource demand.
/// Created once by a generator step and never mutated afterwards.
#[derive(Clone, Debug, Serialize)]
pub struct Cloudlet {
    pub cpu_length: f64,
    pub ram: u64,
    pub io_length: Option<f64>,
    /// Bytes of session data touched by this cloudlet, 0 when not applicable.
    pub data_size: u64,
    pub tier: CloudletTier,
    pub metadata: Vec<String>,
}

impl Cloudlet {
    pub fn new(
        cpu_length: f64,
        ram: u64,
        io_length: Option<f64>,
        data_size: u64,
        tier: CloudletTier,
        metadata: Vec<String>,
    ) -> Self {
        Self {
            cpu_length,
            ram,
            io_length,
            data_size,
            tier,
            metadata,
        }
    }
}
