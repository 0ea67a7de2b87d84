//! How fast a single role can be retriggered.

use std::collections::BTreeMap;

use super::{Limb, Role};
use crate::event::TimeBase;

/// Minimum spacing per role, written against 960 ticks per beat.
fn reference_interval(role: Role) -> u64 {
    match (role.limb(), role) {
        (Limb::RightFoot, _) | (Limb::LeftFoot, _) => 80,
        (Limb::Hand, Role::Crash) => 120,
        (Limb::Hand, Role::Clap) => 60,
        (Limb::Hand, Role::Shaker) => 30,
        (Limb::Hand, _) => 40,
    }
}

/// Role → minimum allowed ticks between two hits on that role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintTable {
    intervals: BTreeMap<Role, u64>,
}

impl ConstraintTable {
    pub fn new(time_base: TimeBase) -> Self {
        let intervals = Role::ALL
            .into_iter()
            .map(|r| (r, time_base.rescale(reference_interval(r))))
            .collect();
        Self { intervals }
    }

    pub fn min_interval(&self, role: Role) -> u64 {
        self.intervals.get(&role).copied().unwrap_or(1)
    }

    /// Whether `unit_ticks` is shorter than the spacing of every given role.
    pub fn unit_too_short(&self, unit_ticks: u64, roles: impl IntoIterator<Item = Role>) -> bool {
        let mut any = false;
        for role in roles {
            any = true;
            if unit_ticks >= self.min_interval(role) {
                return false;
            }
        }
        any
    }
}

impl Default for ConstraintTable {
    fn default() -> Self {
        Self::new(TimeBase::default())
    }
}
