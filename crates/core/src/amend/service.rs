use crate::{
    error::{Error, Result},
    interfaces::Amender,
};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Delimiter between targets in the amend argument
pub const TARGET_DELIMITER: &str = ",";

/// Completion of one amend, observable by any number of callers
pub type AmendFuture = Shared<BoxFuture<'static, Result<()>>>;

/// Runs amends one at a time
///
/// There is no busy flag: the service is busy exactly while the last
/// recorded amend future has not resolved. Rejected requests are not queued.
pub struct AmendService {
    amender: Arc<dyn Amender>,
    ongoing: Mutex<Option<AmendFuture>>,
}

impl AmendService {
    pub fn new(amender: Arc<dyn Amender>) -> Self {
        Self {
            amender,
            ongoing: Mutex::new(None),
        }
    }

    pub fn is_amend_in_progress(&self) -> bool {
        self.ongoing.lock().as_ref().is_some_and(is_pending)
    }

    /// Start amending the project to `targets`.
    ///
    /// Returns `None`, without starting anything, while a previous amend is
    /// still running. Failing to launch the process is reported through the
    /// returned future, like any other failure.
    pub fn amend_all<I, T>(&self, targets: I) -> Option<AmendFuture>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let mut ongoing = self.ongoing.lock();
        if ongoing.as_ref().is_some_and(is_pending) {
            info!("Amend already in progress, rejecting request");
            return None;
        }

        let targets = join_targets(targets);
        debug!("Amending with targets {}", targets);

        let amend = match self.amender.start_amend(&targets) {
            Ok(pending) => pending,
            Err(e) => {
                warn!("Failed to start amend: {}", e);
                futures::future::ready(Err(e)).boxed()
            }
        }
        .shared();

        // Drive the amend to completion even if every caller drops its copy,
        // otherwise the slot would never be freed.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(amend.clone());
        }

        *ongoing = Some(amend.clone());
        Some(amend)
    }

    /// [`amend_all`](Self::amend_all) with the rejection as an error.
    pub fn try_amend_all<I, T>(&self, targets: I) -> Result<AmendFuture>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.amend_all(targets).ok_or(Error::AmendAlreadyInProgress)
    }
}

fn is_pending(amend: &AmendFuture) -> bool {
    amend.peek().is_none()
}

fn join_targets<I, T>(targets: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    targets
        .into_iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(TARGET_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::TargetAddress;
    use crate::interfaces::PendingAmend;
    use crate::test_support::FakeAmender;
    use std::time::Duration;

    fn failure(stderr: &str) -> Error {
        Error::ExternalProcessFailure {
            command: "fastpass amend".to_string(),
            code: Some(2),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    async fn wait_until_idle(service: &AmendService) {
        for _ in 0..200 {
            if !service.is_amend_in_progress() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("amend never completed");
    }

    #[tokio::test]
    async fn test_second_amend_is_rejected_until_first_completes() {
        let amender = FakeAmender::new();
        let service = AmendService::new(amender.clone());

        let first = service.amend_all(["a:x"]).unwrap();
        assert!(service.is_amend_in_progress());

        assert!(service.amend_all(["b:y"]).is_none());
        assert_eq!(amender.started(), vec!["a:x".to_string()]);

        amender.finish(0, Ok(()));
        first.await.unwrap();
        assert!(!service.is_amend_in_progress());

        let third = service.amend_all(["b:y", "c:z"]).unwrap();
        assert_eq!(amender.started().len(), 2);
        assert_eq!(amender.started()[1], "b:y,c:z");

        amender.finish(1, Ok(()));
        third.await.unwrap();
    }

    #[tokio::test]
    async fn test_rejection_is_distinguishable_from_failure() {
        let amender = FakeAmender::new();
        let service = AmendService::new(amender.clone());

        let _first = service.try_amend_all(["a:x"]).unwrap();
        let err = service.try_amend_all(["a:x"]).unwrap_err();
        assert!(matches!(err, Error::AmendAlreadyInProgress));
        assert!(err.is_rejection());
        assert_eq!(amender.started().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_amend_carries_stderr_and_frees_slot() {
        let amender = FakeAmender::new();
        let service = AmendService::new(amender.clone());

        let amend = service.amend_all(["a:x"]).unwrap();
        amender.finish(0, Err(failure("no such target")));

        let err = amend.await.unwrap_err();
        assert_eq!(err.stderr(), Some("no such target"));
        assert!(!err.is_rejection());
        assert!(!service.is_amend_in_progress());
        assert!(service.amend_all(["a:x"]).is_some());
    }

    #[tokio::test]
    async fn test_slot_frees_without_anyone_awaiting() {
        let amender = FakeAmender::new();
        let service = AmendService::new(amender.clone());

        drop(service.amend_all(["a:x"]));
        amender.finish(0, Ok(()));
        wait_until_idle(&service).await;
    }

    #[tokio::test]
    async fn test_targets_are_joined_in_canonical_form() {
        let amender = FakeAmender::new();
        let service = AmendService::new(amender.clone());

        let targets = ["src/a:", "src/b::", "src/c"].map(|s| TargetAddress::parse(s).unwrap());
        let _amend = service.amend_all(&targets).unwrap();
        assert_eq!(amender.started(), vec!["src/a:,src/b::,src/c:c".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_requests_accept_exactly_one() {
        let amender = FakeAmender::new();
        let service = Arc::new(AmendService::new(amender.clone()));

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.amend_all([format!("t:{i}")]) })
            })
            .collect();

        let mut accepted = Vec::new();
        for task in tasks {
            if let Some(amend) = task.await.unwrap() {
                accepted.push(amend);
            }
        }
        assert_eq!(accepted.len(), 1);
        assert_eq!(amender.started().len(), 1);

        amender.finish(0, Ok(()));
        accepted.remove(0).await.unwrap();
        assert!(service.amend_all(["t:again"]).is_some());
        assert_eq!(amender.started().len(), 2);
    }

    struct UnlaunchableAmender;

    impl Amender for UnlaunchableAmender {
        fn start_amend(&self, _targets: &str) -> Result<PendingAmend> {
            Err(Error::Other("fastpass not found".to_string()))
        }
    }

    #[tokio::test]
    async fn test_spawn_failure_resolves_the_future() {
        let service = AmendService::new(Arc::new(UnlaunchableAmender));

        let amend = service.amend_all(["a:x"]).unwrap();
        assert!(matches!(amend.await, Err(Error::Other(_))));
        assert!(!service.is_amend_in_progress());
    }
}
