//! Single-flight translation jobs.
//!
//! A [`TranslationWorker`] runs at most one job at a time. Starting a job
//! cancels the previous one, and a result is only delivered while its job
//! is still the current one. The identity check and job replacement share
//! one lock, so a superseded job can never deliver after its successor
//! has started.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;

use crate::{LanguageCode, TranslateError, Translation, Translator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u64);

impl JobId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl JobStatus {
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Cancelled | JobStatus::Failed
        )
    }
}

#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub id: JobId,
    pub source_word: String,
    pub target_language: LanguageCode,
    pub status: JobStatus,
    pub result_text: Option<String>,
}

/// Delivered to the listener once per finished, non-superseded job
#[derive(Debug)]
pub enum TranslationEvent {
    Completed {
        job: JobId,
        word: String,
        target_language: LanguageCode,
        text: String,
    },
    Failed {
        job: JobId,
        word: String,
        target_language: LanguageCode,
        error: TranslateError,
    },
}

impl TranslationEvent {
    pub fn job(&self) -> JobId {
        match self {
            TranslationEvent::Completed { job, .. } | TranslationEvent::Failed { job, .. } => *job,
        }
    }
}

/// Caller's view of a started job
#[derive(Debug, Clone)]
pub struct JobHandle {
    id: JobId,
    job: Arc<Mutex<TranslationJob>>,
}

impl JobHandle {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn status(&self) -> JobStatus {
        lock(&self.job).status
    }

    pub fn snapshot(&self) -> TranslationJob {
        lock(&self.job).clone()
    }
}

struct CurrentJob {
    id: JobId,
    job: Arc<Mutex<TranslationJob>>,
    cancel: CancellationToken,
}

impl CurrentJob {
    /// Running -> Cancelled; finished jobs keep their status
    fn cancel(&self) -> bool {
        self.cancel.cancel();

        let mut job = lock(&self.job);
        if job.status.is_finished() {
            return false;
        }
        job.status = JobStatus::Cancelled;
        true
    }
}

#[derive(Default)]
struct Slot {
    last_id: u64,
    current: Option<CurrentJob>,
}

pub struct TranslationWorker {
    translator: Arc<dyn Translator>,
    source_lang: LanguageCode,
    timeout: Duration,
    slot: Arc<Mutex<Slot>>,
    events: AsyncSender<TranslationEvent>,
}

impl TranslationWorker {
    /// Create a worker and the receiver its results are delivered to
    pub fn new(
        translator: Arc<dyn Translator>,
        source_lang: LanguageCode,
        timeout: Duration,
    ) -> (Self, AsyncReceiver<TranslationEvent>) {
        let (events, listener) = kanal::unbounded_async();

        let worker = Self {
            translator,
            source_lang,
            timeout,
            slot: Arc::new(Mutex::new(Slot::default())),
            events,
        };

        (worker, listener)
    }

    /// Start translating `word`, superseding any running job.
    /// Must be called from within a tokio runtime.
    pub fn start(&self, word: &str, target_language: &str) -> JobHandle {
        let mut slot = lock(&self.slot);

        if let Some(previous) = slot.current.take()
            && previous.cancel()
        {
            tracing::debug!("Translation job {} superseded", previous.id);
        }

        slot.last_id += 1;
        let id = JobId(slot.last_id);
        let job = Arc::new(Mutex::new(TranslationJob {
            id,
            source_word: word.to_string(),
            target_language: target_language.to_string(),
            status: JobStatus::Pending,
            result_text: None,
        }));
        let cancel = CancellationToken::new();

        lock(&job).status = JobStatus::Running;
        slot.current = Some(CurrentJob {
            id,
            job: job.clone(),
            cancel: cancel.clone(),
        });
        drop(slot);

        tracing::debug!("Translation job {id} started: {word} -> {target_language}");

        tokio::spawn(run_job(JobRun {
            id,
            word: word.to_string(),
            from: self.source_lang.clone(),
            to: target_language.to_string(),
            timeout: self.timeout,
            translator: self.translator.clone(),
            cancel,
            slot: self.slot.clone(),
            events: self.events.clone(),
        }));

        JobHandle { id, job }
    }

    /// Cancel the running job without starting another one
    pub fn cancel(&self) -> Option<JobId> {
        let slot = lock(&self.slot);
        let current = slot.current.as_ref()?;

        if current.cancel() {
            tracing::debug!("Translation job {} cancelled", current.id);
            Some(current.id)
        } else {
            None
        }
    }

    /// Id of the most recently started job
    pub fn current(&self) -> Option<JobId> {
        lock(&self.slot).current.as_ref().map(|c| c.id)
    }

    pub fn provider_name(&self) -> String {
        self.translator.metadata().name
    }
}

impl Drop for TranslationWorker {
    fn drop(&mut self) {
        if let Some(current) = lock(&self.slot).current.as_ref() {
            current.cancel();
        }
    }
}

struct JobRun {
    id: JobId,
    word: String,
    from: LanguageCode,
    to: LanguageCode,
    timeout: Duration,
    translator: Arc<dyn Translator>,
    cancel: CancellationToken,
    slot: Arc<Mutex<Slot>>,
    events: AsyncSender<TranslationEvent>,
}

async fn run_job(run: JobRun) {
    let outcome = tokio::select! {
        _ = run.cancel.cancelled() => {
            tracing::debug!("Translation job {} dropped in flight", run.id);
            return;
        }
        result = tokio::time::timeout(
            run.timeout,
            run.translator.translate(&run.word, run.from.clone(), run.to.clone()),
        ) => result.unwrap_or(Err(TranslateError::Timeout(run.timeout))),
    };

    deliver(&run, outcome);
}

/// Publish the outcome if the job is still current and running
fn deliver(run: &JobRun, outcome: Result<Translation, TranslateError>) {
    let slot = lock(&run.slot);

    let Some(current) = slot.current.as_ref().filter(|c| c.id == run.id) else {
        tracing::debug!("Discarding stale result of translation job {}", run.id);
        return;
    };

    let mut job = lock(&current.job);
    if job.status != JobStatus::Running {
        tracing::debug!(
            "Discarding result of translation job {} ({:?})",
            run.id,
            job.status
        );
        return;
    }

    let event = match outcome {
        Ok(translation) => {
            job.status = JobStatus::Completed;
            job.result_text = Some(translation.text.clone());
            TranslationEvent::Completed {
                job: run.id,
                word: run.word.clone(),
                target_language: run.to.clone(),
                text: translation.text,
            }
        }
        Err(error) => {
            tracing::warn!("Translation job {} failed: {}", run.id, error);
            job.status = JobStatus::Failed;
            TranslationEvent::Failed {
                job: run.id,
                word: run.word.clone(),
                target_language: run.to.clone(),
                error,
            }
        }
    };

    // Sent while holding the slot lock so no newer job can start in between
    match run.events.try_send(event) {
        Ok(true) => {}
        Ok(false) => tracing::warn!("Translation listener full, result of {} lost", run.id),
        Err(e) => tracing::warn!("Translation listener gone: {}", e),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::time::{sleep, timeout};

    use super::*;
    use crate::ProviderMetadata;

    /// Answers `<word>-<lang>` after a per-word delay; words in `failing` error out
    #[derive(Default)]
    struct FakeTranslator {
        delays: HashMap<String, Duration>,
        failing: Vec<String>,
    }

    impl FakeTranslator {
        fn with_delay(mut self, word: &str, delay_ms: u64) -> Self {
            self.delays
                .insert(word.to_string(), Duration::from_millis(delay_ms));
            self
        }

        fn failing(mut self, word: &str) -> Self {
            self.failing.push(word.to_string());
            self
        }
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn translate(
            &self,
            text: &str,
            from: LanguageCode,
            to: LanguageCode,
        ) -> Result<Translation, TranslateError> {
            if let Some(delay) = self.delays.get(text) {
                sleep(*delay).await;
            }

            if self.failing.iter().any(|w| w == text) {
                return Err(TranslateError::ApiError("provider down".to_string()));
            }

            Ok(Translation {
                text: format!("{text}-{to}"),
                from,
                to,
                provider: "fake".to_string(),
            })
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "fake".to_string(),
                requires_api_key: false,
            }
        }
    }

    fn worker(translator: FakeTranslator) -> (TranslationWorker, AsyncReceiver<TranslationEvent>) {
        TranslationWorker::new(
            Arc::new(translator),
            "en".to_string(),
            Duration::from_secs(2),
        )
    }

    async fn next_event(rx: &AsyncReceiver<TranslationEvent>) -> TranslationEvent {
        timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("Timeout - no translation event")
            .expect("listener closed")
    }

    async fn assert_quiet(rx: &AsyncReceiver<TranslationEvent>, ms: u64) {
        let result = timeout(Duration::from_millis(ms), rx.recv()).await;
        assert!(result.is_err(), "unexpected event: {:?}", result);
    }

    #[tokio::test]
    async fn completed_job_reaches_listener() {
        let (worker, rx) = worker(FakeTranslator::default());

        let handle = worker.start("cat", "fr");

        match next_event(&rx).await {
            TranslationEvent::Completed {
                job,
                word,
                target_language,
                text,
            } => {
                assert_eq!(job, handle.id());
                assert_eq!(word, "cat");
                assert_eq!(target_language, "fr");
                assert_eq!(text, "cat-fr");
            }
            other => panic!("Wrong event: {:?}", other),
        }

        let job = handle.snapshot();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result_text.as_deref(), Some("cat-fr"));
    }

    #[tokio::test]
    async fn superseded_job_never_delivers() {
        let translator = FakeTranslator::default()
            .with_delay("cat", 150)
            .with_delay("dog", 10);
        let (worker, rx) = worker(translator);

        let cat = worker.start("cat", "fr");
        let dog = worker.start("dog", "fr");

        assert_eq!(cat.status(), JobStatus::Cancelled);

        let event = next_event(&rx).await;
        assert_eq!(event.job(), dog.id());
        assert!(matches!(event, TranslationEvent::Completed { ref text, .. } if text == "dog-fr"));

        // Well past the point where "cat" would have finished
        assert_quiet(&rx, 300).await;
        assert_eq!(cat.status(), JobStatus::Cancelled);
        assert_eq!(dog.status(), JobStatus::Completed);
    }

    #[tokio::test]
    async fn slow_new_job_still_wins_over_fast_old_one() {
        let translator = FakeTranslator::default()
            .with_delay("cat", 30)
            .with_delay("dog", 120);
        let (worker, rx) = worker(translator);

        let _cat = worker.start("cat", "fr");
        let dog = worker.start("dog", "fr");

        let event = next_event(&rx).await;
        assert_eq!(event.job(), dog.id());
        assert_quiet(&rx, 100).await;
    }

    #[tokio::test]
    async fn job_ids_increase() {
        let (worker, _rx) = worker(FakeTranslator::default());

        let first = worker.start("a", "fr");
        let second = worker.start("b", "fr");

        assert!(second.id() > first.id());
        assert_eq!(worker.current(), Some(second.id()));
    }

    #[tokio::test]
    async fn provider_failure_is_reported() {
        let (worker, rx) = worker(FakeTranslator::default().failing("cat"));

        let handle = worker.start("cat", "de");

        match next_event(&rx).await {
            TranslationEvent::Failed { job, word, error, .. } => {
                assert_eq!(job, handle.id());
                assert_eq!(word, "cat");
                assert!(matches!(error, TranslateError::ApiError(_)));
            }
            other => panic!("Wrong event: {:?}", other),
        }
        assert_eq!(handle.status(), JobStatus::Failed);
    }

    #[tokio::test]
    async fn hung_provider_times_out() {
        let (worker, rx) = TranslationWorker::new(
            Arc::new(FakeTranslator::default().with_delay("cat", 5_000)),
            "en".to_string(),
            Duration::from_millis(50),
        );

        let handle = worker.start("cat", "fr");

        let event = next_event(&rx).await;
        assert!(matches!(
            event,
            TranslationEvent::Failed {
                error: TranslateError::Timeout(_),
                ..
            }
        ));
        assert_eq!(handle.status(), JobStatus::Failed);
    }

    #[tokio::test]
    async fn explicit_cancel_discards_result() {
        let (worker, rx) = worker(FakeTranslator::default().with_delay("cat", 50));

        let handle = worker.start("cat", "fr");
        assert_eq!(worker.cancel(), Some(handle.id()));
        assert_eq!(worker.cancel(), None);

        assert_quiet(&rx, 150).await;
        assert_eq!(handle.status(), JobStatus::Cancelled);
    }

    #[tokio::test]
    async fn finished_job_is_not_cancelled_by_successor() {
        let (worker, rx) = worker(FakeTranslator::default());

        let first = worker.start("cat", "fr");
        next_event(&rx).await;

        let second = worker.start("dog", "fr");
        next_event(&rx).await;

        assert_eq!(first.status(), JobStatus::Completed);
        assert_eq!(second.status(), JobStatus::Completed);
    }
}
