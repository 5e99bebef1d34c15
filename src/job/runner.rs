use async_trait::async_trait;

use super::{
    polling::{poll_until, Exhausted},
    stage::{RunResult, Stage},
};
use crate::{api::Resource, config::PollConfig, errors::ErrorInfo};

/// The create / submit / fetch operations of one resource kind.
#[async_trait]
pub trait Accessor: Send + Sync {
    type Input: Send + Sync;
    type Resource: Resource;

    /// Name used in logs and timeout messages, e.g. `"TIN verification"`.
    fn kind(&self) -> &'static str;

    async fn create(&self, input: &Self::Input) -> Result<Self::Resource, ErrorInfo>;

    /// Moves a created resource into processing. `None` means the kind
    /// has no separate submit phase and creation already started it.
    async fn submit(&self, _id: &str) -> Option<Result<Self::Resource, ErrorInfo>> {
        None
    }

    /// Idempotent read of the current state.
    async fn fetch(&self, id: &str) -> Result<Self::Resource, ErrorInfo>;

    /// Whether processing of `resource` has finished.
    fn is_terminal(&self, resource: &Self::Resource) -> bool;
}

/// Runs create → submit → wait-for-terminal for one [`Accessor`].
///
/// The runner keeps no per-run state, so one instance can drive any
/// number of concurrent runs.
#[derive(Clone, Debug)]
pub struct JobRunner<A> {
    accessor: A,
    poll: PollConfig,
}

impl<A: Accessor> JobRunner<A> {
    pub fn new(accessor: A) -> Self {
        Self {
            accessor,
            poll: PollConfig::default(),
        }
    }

    #[must_use]
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub const fn poll(&self) -> PollConfig {
        self.poll
    }

    pub const fn accessor(&self) -> &A {
        &self.accessor
    }

    /// Creates the resource, submits it when the kind has a submit phase
    /// and, when `synchronous`, waits for it to reach a terminal state.
    ///
    /// Every failure stops the run at the stage that produced it; later
    /// stages are never attempted.
    pub async fn run(&self, input: &A::Input, synchronous: bool) -> RunResult<A::Resource> {
        let kind = self.accessor.kind();

        let created = match self.accessor.create(input).await {
            Ok(created) => created,
            Err(error) => {
                log::warn!("Creating {kind} failed: {error}");
                return RunResult::failed(Stage::Create, error);
            }
        };
        let id = created.id().to_owned();
        log::debug!("Created {kind} {id}");

        let (stage, latest) = match self.accessor.submit(&id).await {
            None => (Stage::Create, created),
            Some(Ok(submitted)) => {
                log::debug!("Submitted {kind} {id}");
                (Stage::Submit, submitted)
            }
            Some(Err(error)) => {
                log::warn!("Submitting {kind} {id} failed: {error}");
                return RunResult::failed(Stage::Submit, error);
            }
        };

        if !synchronous {
            return RunResult::dispatched(stage, latest);
        }

        match self.wait_for(&id).await {
            Ok(resource) => {
                log::debug!("{kind} {id} finished processing");
                RunResult::complete(resource)
            }
            Err(Exhausted { error, last_seen }) => {
                RunResult::timed_out(error, last_seen.or(Some(latest)))
            }
        }
    }

    /// Polls an already running resource until it is terminal.
    ///
    /// # Errors
    ///
    /// Returns [`Exhausted`] when the poll budget runs out first.
    pub async fn wait_for(&self, id: &str) -> Result<A::Resource, Exhausted<A::Resource>> {
        let subject = format!("{} {id}", self.accessor.kind());
        poll_until(
            self.poll,
            &subject,
            || self.accessor.fetch(id),
            |resource| self.accessor.is_terminal(resource),
        )
        .await
    }
}
