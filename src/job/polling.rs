use std::{future::Future, time::Duration};

use backon::{ConstantBuilder, Retryable};
use tokio::time::Instant;

use crate::{config::PollConfig, errors::ErrorInfo};

/// Why an attempt did not end the wait.
enum Pending<R> {
    InProgress(R),
    Unavailable(ErrorInfo),
}

/// The attempt budget ran out before a terminal state was observed.
#[derive(Clone, Debug)]
pub struct Exhausted<R> {
    /// Always `ErrorInfo::Timeout`.
    pub error: ErrorInfo,
    /// Snapshot from the final attempt, if that fetch succeeded.
    pub last_seen: Option<R>,
}

/// Sleeps `config.interval`, fetches, and repeats until `is_terminal`
/// holds or `config.max_attempts` fetches were made.
///
/// The sleep comes before every fetch, the first one included. A failed
/// fetch only uses up an attempt; it never ends the wait early, so a
/// fetch that keeps failing shows up as the same timeout as a job that
/// keeps processing.
///
/// # Errors
///
/// Returns [`Exhausted`] once the budget is spent.
pub async fn poll_until<R, F, Fut, P>(
    config: PollConfig,
    subject: &str,
    mut fetch: F,
    is_terminal: P,
) -> Result<R, Exhausted<R>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R, ErrorInfo>>,
    P: Fn(&R) -> bool,
{
    let attempts = config.attempts();
    let started = Instant::now();
    let is_terminal = &is_terminal;

    let attempt = || {
        let fetched = fetch();
        async move {
            match fetched.await {
                Ok(resource) if is_terminal(&resource) => Ok(resource),
                Ok(resource) => Err(Pending::InProgress(resource)),
                Err(error) => Err(Pending::Unavailable(error)),
            }
        }
    };

    // backon only sleeps between attempts
    tokio::time::sleep(config.interval).await;
    let outcome = attempt
        .retry(
            ConstantBuilder::default()
                .with_delay(config.interval)
                .with_max_times(usize::try_from(attempts - 1).unwrap_or(usize::MAX)),
        )
        .sleep(tokio::time::sleep)
        .notify(|pending: &Pending<R>, delay: Duration| match pending {
            Pending::InProgress(_) => {
                log::debug!("{subject} didn't finish, checking again in {delay:?}");
            }
            Pending::Unavailable(error) => {
                log::warn!("Fetching {subject} failed, checking again in {delay:?}: {error}");
            }
        })
        .await;

    outcome.map_err(|pending| {
        let last_seen = match pending {
            Pending::InProgress(resource) => Some(resource),
            Pending::Unavailable(_) => None,
        };
        log::warn!("Gave up waiting for {subject} after {attempts} attempts");
        Exhausted {
            error: ErrorInfo::Timeout {
                subject: subject.to_owned(),
                attempts,
                waited: started.elapsed(),
            },
            last_seen,
        }
    })
}
