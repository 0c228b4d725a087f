//! Membership Registry
//!
//! Plain, single-owner record of registered endpoints plus the current range
//! assignment. It performs no I/O and no locking; the coordinator service wraps it
//! in a mutex and drives the broadcast.

use super::partitioner::assign_ranges;
use super::types::{Assignment, Endpoint, MembershipSnapshot, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Added,
    AlreadyRegistered,
    /// The learner slot was taken over; `previous` held the old address, if any.
    LearnerReplaced { previous: Option<String> },
}

#[derive(Debug, Default)]
pub struct MembershipRegistry {
    shard_processors: Vec<Endpoint>,
    validators: Vec<Endpoint>,
    learner: Option<Endpoint>,
    assignments: Vec<Assignment>,
    version: u64,
}

impl MembershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `address` under `role`. List roles ignore duplicates; the learner
    /// slot is always overwritten.
    pub fn register(&mut self, role: Role, address: &str) -> RegistrationOutcome {
        let endpoint = Endpoint::new(role, address);

        let members = match role {
            Role::ShardProcessor => &mut self.shard_processors,
            Role::Validator => &mut self.validators,
            Role::Aggregator => {
                let previous = self.learner.replace(endpoint).map(|old| old.address);
                return RegistrationOutcome::LearnerReplaced { previous };
            }
        };

        if members.contains(&endpoint) {
            tracing::info!("{} {} already registered", role, address);
            return RegistrationOutcome::AlreadyRegistered;
        }

        members.push(endpoint);
        RegistrationOutcome::Added
    }

    /// Recomputes every assignment from scratch and bumps the version.
    pub fn repartition(&mut self) -> &[Assignment] {
        let addresses: Vec<String> = self
            .shard_processors
            .iter()
            .map(|endpoint| endpoint.address.clone())
            .collect();

        self.version += 1;
        self.assignments = assign_ranges(&addresses);

        tracing::info!(
            "Assigned ranges to {} shard processor(s) (version {})",
            self.assignments.len(),
            self.version
        );

        &self.assignments
    }

    pub fn snapshot(&self) -> MembershipSnapshot {
        MembershipSnapshot {
            shard_processors: addresses(&self.shard_processors),
            validators: addresses(&self.validators),
            learner: self.learner.as_ref().map(|e| e.address.clone()),
            version: self.version,
        }
    }

    /// Everyone a membership broadcast goes to: processors, validators, then the learner.
    pub fn broadcast_targets(&self) -> Vec<Endpoint> {
        self.shard_processors
            .iter()
            .chain(self.validators.iter())
            .chain(self.learner.iter())
            .cloned()
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn members(&self, role: Role) -> Vec<Endpoint> {
        match role {
            Role::ShardProcessor => self.shard_processors.clone(),
            Role::Validator => self.validators.clone(),
            Role::Aggregator => self.learner.iter().cloned().collect(),
        }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    #[cfg(test)]
    pub(crate) fn version(&self) -> u64 {
        self.version
    }
}

fn addresses(endpoints: &[Endpoint]) -> Vec<String> {
    endpoints.iter().map(|e| e.address.clone()).collect()
}
