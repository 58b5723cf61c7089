//! Virtual machine lifecycle status.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Status of a simulated virtual machine. The lifecycle is irreversible:
/// a VM moves from initializing to running to terminated, and may be
/// terminated early while still initializing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VmStatus {
    Initializing,
    Running,
    Terminated,
}

impl VmStatus {
    /// Whether a VM in this status may move to `to`. Self-transitions are
    /// invalid and terminated is a sink.
    pub fn is_valid_transition(&self, to: VmStatus) -> bool {
        matches!(
            (*self, to),
            (VmStatus::Initializing, VmStatus::Running)
                | (VmStatus::Initializing, VmStatus::Terminated)
                | (VmStatus::Running, VmStatus::Terminated)
        )
    }
}

/// The single authority any VM-owning entity must consult before
/// committing a status change. Holds no state and mutates nothing.
pub fn is_valid_next_state(from: VmStatus, to: VmStatus) -> bool {
    from.is_valid_transition(to)
}

impl Display for VmStatus {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            VmStatus::Initializing => write!(f, "initializing"),
            VmStatus::Running => write!(f, "running"),
            VmStatus::Terminated => write!(f, "terminated"),
        }
    }
}
