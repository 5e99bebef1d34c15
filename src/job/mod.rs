//! Synchronous runs over the service's asynchronous jobs.
//!
//! A run creates a resource, submits it when its kind needs that, and then
//! polls it at a fixed interval until it reaches a terminal state or the
//! attempt budget is spent.

pub use self::{
    polling::{poll_until, Exhausted},
    runner::{Accessor, JobRunner},
    stage::{RunResult, Stage, StageError},
};

mod polling;
mod runner;
mod stage;
