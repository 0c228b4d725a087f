use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

use super::protocol::{ENDPOINT_NODES, ENDPOINT_REGISTER, ENDPOINT_SET_RANGE, RegisterRequest, SetRangeRequest};
use super::registry::{MembershipRegistry, RegistrationOutcome};
use super::types::{Assignment, Endpoint, MembershipSnapshot, Role, endpoint_url};
use crate::error::{ClusterError, Result};
use crate::processor::protocol::{ENDPOINT_LINE, LineRequest};
use crate::sidecar::{Reply, Sidecar};

/// Coordinator: owns the membership registry and pushes assignments.
///
/// A registration keeps the registry locked until its pushes have finished, so
/// two registrations never interleave their partition and push steps. The lock
/// is carried by the background propagation task; the caller gets its answer as
/// soon as the registry itself is updated.
pub struct Coordinator {
    registry: Arc<Mutex<MembershipRegistry>>,
    sidecar: Sidecar,
}

impl Coordinator {
    pub fn new(sidecar: Sidecar) -> Arc<Self> {
        Arc::new(Self {
            registry: Arc::new(Mutex::new(MembershipRegistry::new())),
            sidecar,
        })
    }

    /// Validates a raw registration payload and registers it.
    pub async fn register_request(&self, req: RegisterRequest) -> Result<RegistrationOutcome> {
        let role = non_empty(req.role).ok_or(ClusterError::MissingField("role"))?;
        let address = non_empty(req.address).ok_or(ClusterError::MissingField("address"))?;
        let role: Role = role.parse()?;

        self.register(role, &address).await
    }

    /// Registers an endpoint and re-partitions, then pushes ranges and membership
    /// to every member from a background task that keeps the registry locked.
    ///
    /// Returns once the registry is updated. Use [`Coordinator::settle`] to wait
    /// for the pushes.
    pub async fn register(&self, role: Role, address: &str) -> Result<RegistrationOutcome> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ClusterError::MissingField("address"));
        }

        let mut registry = self.registry.clone().lock_owned().await;

        tracing::info!("Registering {} at {}", role, address);
        let outcome = registry.register(role, address);
        if let RegistrationOutcome::LearnerReplaced {
            previous: Some(previous),
        } = &outcome
            && previous != address
        {
            tracing::info!("Learner {} replaced by {}", previous, address);
        }

        let assignments = registry.repartition().to_vec();
        let snapshot = registry.snapshot();
        let targets = registry.broadcast_targets();

        tracing::info!(
            "Membership now: {} shard processor(s), {} validator(s), learner {:?}",
            snapshot.shard_processors.len(),
            snapshot.validators.len(),
            snapshot.learner
        );

        let sidecar = self.sidecar.clone();
        tokio::spawn(async move {
            propagate(&sidecar, assignments, targets, &snapshot).await;
            drop(registry);
        });

        Ok(outcome)
    }

    /// Waits until every registration accepted so far has finished its pushes.
    pub async fn settle(&self) {
        drop(self.registry.lock().await);
    }

    pub async fn snapshot(&self) -> MembershipSnapshot {
        self.registry.lock().await.snapshot()
    }

    pub async fn assignments(&self) -> Vec<Assignment> {
        self.registry.lock().await.assignments().to_vec()
    }

    /// Pushes every non-blank, trimmed line to every shard processor.
    ///
    /// The processor list is snapshotted first; each processor receives the lines
    /// in order from its own task. Returns the number of lines dispatched.
    pub async fn dispatch_lines<I, S>(&self, lines: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        let processors = self.snapshot().await.shard_processors;

        tracing::info!(
            "Dispatching {} line(s) to {} shard processor(s)",
            lines.len(),
            processors.len()
        );

        let lines = Arc::new(lines);
        let mut feeds = JoinSet::new();
        for address in processors {
            let sidecar = self.sidecar.clone();
            let lines = lines.clone();
            feeds.spawn(async move {
                let target = endpoint_url(&address, ENDPOINT_LINE);
                for line in lines.iter() {
                    let payload = LineRequest { text: line.clone() };
                    if let Err(e) = sidecar.send(&target, &payload).await {
                        tracing::warn!("Line not delivered: {}", e);
                    }
                }
            });
        }
        while let Some(joined) = feeds.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Dispatch task failed: {}", e);
            }
        }

        lines.len()
    }

    /// Reads `path` and dispatches its lines.
    pub async fn dispatch_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        tracing::info!("Processing file: {}", path.display());

        let text = tokio::fs::read_to_string(path).await?;
        tracing::info!("Read {} lines", text.lines().count());

        Ok(self.dispatch_lines(text.lines()).await)
    }
}

/// Sends every assigned range and the membership snapshot concurrently, all in
/// one batch, and waits for the whole batch.
async fn propagate(
    sidecar: &Sidecar,
    assignments: Vec<Assignment>,
    targets: Vec<Endpoint>,
    snapshot: &MembershipSnapshot,
) {
    let mut sends = JoinSet::new();

    for assignment in assignments {
        let Some(range) = assignment.range else {
            tracing::warn!("{} left without a range", assignment.address);
            continue;
        };
        tracing::info!("Assigned {} to {}", range, assignment.address);

        let sidecar = sidecar.clone();
        let target = endpoint_url(&assignment.address, ENDPOINT_SET_RANGE);
        let payload = SetRangeRequest {
            range: range.to_string(),
            version: Some(snapshot.version),
        };
        sends.spawn(async move { (sidecar.send(&target, &payload).await, target) });
    }

    tracing::debug!("Broadcasting membership to {} endpoint(s)", targets.len());
    for endpoint in targets {
        let sidecar = sidecar.clone();
        let target = endpoint.url(ENDPOINT_NODES);
        let snapshot = snapshot.clone();
        sends.spawn(async move { (sidecar.send(&target, &snapshot).await, target) });
    }

    drain(sends).await;
}

/// Announces `endpoint` to the coordinator at `coordinator_url`.
pub async fn announce(sidecar: &Sidecar, coordinator_url: &str, endpoint: &Endpoint) -> Result<Reply> {
    let target = endpoint_url(coordinator_url, ENDPOINT_REGISTER);
    let payload = RegisterRequest {
        role: Some(endpoint.role.to_string()),
        address: Some(endpoint.address.clone()),
    };
    sidecar.send(&target, &payload).await
}

async fn drain(mut sends: JoinSet<(Result<Reply>, String)>) {
    while let Some(joined) = sends.join_next().await {
        match joined {
            Ok((Ok(reply), target)) if !reply.is_success() => {
                tracing::warn!("{} rejected push ({}): {}", target, reply.status, reply.body);
            }
            Ok((Ok(_), _)) => {}
            Ok((Err(e), _)) => tracing::warn!("Push dropped: {}", e),
            Err(e) => tracing::error!("Push task failed: {}", e),
        }
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
