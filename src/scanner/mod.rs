//! Duration scanning.
//!
//! Every candidate file becomes one task. A task classifies its file, probes
//! it through the [`Dispatcher`] when it looks like video, adds the result to
//! the shared [`Aggregate`] and reports it according to the run's output
//! mode. The run ends once every task has finished; a failing file never
//! stops the others.

pub mod aggregate;
pub mod classifier;
pub mod dispatcher;
pub mod enumerate;

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};
use viddur_av::DurationProber;

use crate::config::RunConfig;
use crate::report::{LineSink, Renderer};

pub use aggregate::Aggregate;
pub use classifier::{classifier_for, Classification, MediaClassifier, MimeClassifier};
pub use dispatcher::Dispatcher;
pub use enumerate::{enumerate, Candidate};

/// What happened to one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeOutcome {
    /// Probed successfully; always strictly positive seconds.
    Duration(f64),
    /// Skipped by the classifier.
    NotMedia,
    /// The probe ran but produced no usable duration.
    ProbeFailed,
}

impl ProbeOutcome {
    /// Ordering key for sorted reports; anything without a duration is zero.
    pub fn sort_key(&self) -> f64 {
        match self {
            ProbeOutcome::Duration(seconds) => *seconds,
            ProbeOutcome::NotMedia | ProbeOutcome::ProbeFailed => 0.0,
        }
    }
}

/// Per-file result as seen by the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Probed or harmlessly skipped.
    Ok,
    /// The probe failed.
    Failed,
}

/// Totals of a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub files: usize,
    pub failed: usize,
    pub total: f64,
}

impl RunSummary {
    /// Successful only if at least one file was seen and none failed.
    pub fn is_success(&self) -> bool {
        self.files > 0 && self.failed == 0
    }
}

/// Shared state of one run, handed to every task.
pub struct Scanner {
    config: Arc<RunConfig>,
    classifier: Box<dyn MediaClassifier>,
    dispatcher: Dispatcher,
    aggregate: Arc<Aggregate>,
    renderer: Renderer,
    sink: Arc<dyn LineSink>,
}

impl Scanner {
    /// Build a scanner for `config`, probing with `prober` and writing report
    /// lines to `sink`.
    pub fn new(
        config: Arc<RunConfig>,
        prober: Arc<dyn DurationProber>,
        sink: Arc<dyn LineSink>,
    ) -> Self {
        Self {
            classifier: classifier_for(config.accept_all),
            dispatcher: Dispatcher::new(prober, config.semaphore),
            aggregate: Arc::new(Aggregate::new(config.defers_report())),
            renderer: Renderer::from_config(&config),
            sink,
            config,
        }
    }

    /// Replace the classification strategy.
    pub fn with_classifier(mut self, classifier: Box<dyn MediaClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    /// Classify, probe, aggregate and report a single candidate.
    pub async fn handle(&self, candidate: &Candidate) -> FileStatus {
        let path = candidate.path();

        if self.classifier.classify(candidate.location()) == Classification::NotMedia {
            debug!("Not media: {:?}", path);
            if self.config.is_verbose() {
                self.report(candidate, ProbeOutcome::NotMedia);
            }
            return FileStatus::Ok;
        }

        match self.dispatcher.dispatch(candidate.location()).await {
            outcome @ ProbeOutcome::Duration(seconds) => {
                self.aggregate.add(seconds);
                if self.config.is_verbose() {
                    self.report(candidate, outcome);
                }
                FileStatus::Ok
            }
            outcome => {
                if !self.config.is_quiet() {
                    self.report(candidate, outcome);
                }
                FileStatus::Failed
            }
        }
    }

    /// Print the outcome now, or keep it for the sorted report.
    fn report(&self, candidate: &Candidate, outcome: ProbeOutcome) {
        if self.aggregate.tracks_detail() {
            self.aggregate.record(candidate.path(), outcome);
        } else {
            self.sink
                .emit(&self.renderer.outcome_line(candidate.path(), outcome));
        }
    }

    /// Handle every candidate concurrently and wait for all of them.
    ///
    /// Sorted reports are emitted once everything has finished.
    pub async fn run(self: Arc<Self>, candidates: Vec<Candidate>) -> RunSummary {
        let files = candidates.len();
        let mut tasks = JoinSet::new();

        for candidate in candidates {
            let scanner = Arc::clone(&self);
            tasks.spawn(async move { scanner.handle(&candidate).await });
        }

        let mut failed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(FileStatus::Ok) => {}
                Ok(FileStatus::Failed) => failed += 1,
                Err(e) => {
                    warn!(error = %e, "Scan task panicked");
                    failed += 1;
                }
            }
        }

        if self.aggregate.tracks_detail() {
            for (path, outcome) in self.aggregate.sorted(self.config.sort) {
                self.sink.emit(&self.renderer.outcome_line(&path, outcome));
            }
        }

        RunSummary {
            files,
            failed,
            total: self.aggregate.total(),
        }
    }
}
