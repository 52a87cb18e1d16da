// PartialCTL: Checking CTL Properties on Partially Explored State Spaces
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Validation Manager
//!
//! Evaluates a set of named formulas against a single transition system. All evaluations share a
//! single [`CTLModelChecker`], and hence a single result cache: a subformula that is common to
//! several formulas is only computed once (or, in the parallel case, at most once per thread that
//! races on it, which yields the same result).
//!
//! The parallel validation spawns a pool of worker threads, which pull one formula after the other
//! from a shared queue. The batch fails as soon as a single evaluation fails, or if the timeout is
//! reached. In this case, all results computed so far are discarded. Evaluations that are already
//! running are not cancelled, but no worker will start a new one.

use crate::checker::{CTLModelChecker, CheckResult};
use crate::formula::Formula;
use crate::ts::TransitionSystem;
use crate::Error;

use log::*;
use std::any::Any;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread;
use std::time::{Duration, Instant};

/// Results of a validation, indexed by the name of the formula.
pub type ValidationResults = BTreeMap<String, CheckResult>;

type Job = (String, Formula);
type JobQueue = Arc<Mutex<VecDeque<Job>>>;
type JobResult = Result<(String, CheckResult), Error>;

/// # Validation Manager
///
/// ```
/// use partialctl::example_systems::*;
/// use partialctl::validation::ValidationManager;
/// use partialctl::Formula;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), partialctl::Error> {
/// let formulas = vec![
///     ("p".to_string(), Formula::atomic("p")),
///     ("next p".to_string(), Formula::exists_next(Formula::atomic("p"))),
/// ];
/// let manager = ValidationManager::new(TwoStates::system(), formulas)?;
///
/// let sequential = manager.validate_sequentially();
/// let parallel = manager.validate_parallel(Duration::from_secs(10))?;
/// assert_eq!(sequential, parallel);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ValidationManager {
    checker: Arc<CTLModelChecker>,
    formulas: Vec<Job>,
    num_threads: Option<usize>,
}

impl ValidationManager {
    /// Create a new manager, which creates its own checker for the system. Formula names must be
    /// unique.
    pub fn new<I>(system: TransitionSystem, formulas: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, Formula)>,
    {
        Self::with_checker(Arc::new(CTLModelChecker::new(system)), formulas)
    }

    /// Create a new manager that uses an existing checker (and its cache). Formula names must be
    /// unique.
    pub fn with_checker<I>(checker: Arc<CTLModelChecker>, formulas: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, Formula)>,
    {
        let mut names: HashSet<String> = HashSet::new();
        let mut jobs = Vec::new();
        for (name, formula) in formulas {
            if !names.insert(name.clone()) {
                return Err(Error::DuplicateFormula(name));
            }
            jobs.push((name, formula));
        }
        Ok(Self { checker, formulas: jobs, num_threads: None })
    }

    /// Set the number of worker threads for the parallel validation. By default, one thread per
    /// CPU is used.
    pub fn set_num_threads(&mut self, num_threads: usize) {
        self.num_threads = Some(num_threads);
    }

    /// Returns the shared checker
    pub fn checker(&self) -> &Arc<CTLModelChecker> {
        &self.checker
    }

    /// Returns the named formulas, in the order in which they were given.
    pub fn formulas(&self) -> impl Iterator<Item = (&str, &Formula)> {
        self.formulas.iter().map(|(n, f)| (n.as_str(), f))
    }

    /// Evaluate all formulas one after the other, in the order in which they were given.
    pub fn validate_sequentially(&self) -> ValidationResults {
        info!("Validating {} formulas sequentially", self.formulas.len());
        self.formulas
            .iter()
            .map(|(name, formula)| {
                debug!("Checking {}: {}", name, formula);
                (name.clone(), self.checker.check(formula))
            })
            .collect()
    }

    /// Evaluate all formulas using a pool of worker threads. The call fails with
    /// [`Error::Timeout`] if not all formulas were evaluated within `timeout`, and with
    /// [`Error::ExecutionError`] if the evaluation of any formula fails.
    pub fn validate_parallel(&self, timeout: Duration) -> Result<ValidationResults, Error> {
        self.run_parallel(timeout, |checker, formula| checker.check(formula))
    }

    /// Parallel validation, where each worker evaluates a formula with `eval`.
    pub(crate) fn run_parallel<F>(
        &self,
        timeout: Duration,
        eval: F,
    ) -> Result<ValidationResults, Error>
    where
        F: Fn(&CTLModelChecker, &Formula) -> CheckResult + Send + Sync + 'static,
    {
        let deadline = Instant::now() + timeout;
        let mut results = ValidationResults::new();
        if self.formulas.is_empty() {
            return Ok(results);
        }

        let queue: JobQueue = Arc::new(Mutex::new(self.formulas.iter().cloned().collect()));
        let stopper = Stopper::new();
        let (tx, rx) = mpsc::channel::<JobResult>();
        let eval = Arc::new(eval);

        let n_threads =
            self.num_threads.unwrap_or_else(num_cpus::get).max(1).min(self.formulas.len());
        info!("Spawning {} threads to validate {} formulas", n_threads, self.formulas.len());

        for _ in 0..n_threads {
            let q = queue.clone();
            let c = self.checker.clone();
            let t = tx.clone();
            let s = stopper.clone();
            let e = eval.clone();
            thread::spawn(move || worker(c, q, t, s, e));
        }
        drop(tx);

        while results.len() < self.formulas.len() {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(Ok((name, result))) => {
                    debug!("Finished {}", name);
                    results.insert(name, result);
                }
                Ok(Err(e)) => {
                    stopper.send_stop();
                    error!("Validation failed: {}", e);
                    return Err(e);
                }
                Err(RecvTimeoutError::Timeout) => {
                    stopper.send_stop();
                    error!(
                        "Validation timed out after {:?} with {} of {} formulas done",
                        timeout,
                        results.len(),
                        self.formulas.len()
                    );
                    return Err(Error::Timeout(timeout));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    let name = self
                        .formulas
                        .iter()
                        .map(|(n, _)| n)
                        .find(|n| !results.contains_key(*n))
                        .cloned()
                        .unwrap_or_default();
                    return Err(Error::ExecutionError {
                        name,
                        reason: "all workers terminated before the formula was evaluated"
                            .to_string(),
                    });
                }
            }
        }

        info!("Validated {} formulas", results.len());
        Ok(results)
    }
}

fn worker<F>(
    checker: Arc<CTLModelChecker>,
    queue: JobQueue,
    tx: Sender<JobResult>,
    stopper: Stopper,
    eval: Arc<F>,
) where
    F: Fn(&CTLModelChecker, &Formula) -> CheckResult,
{
    loop {
        if stopper.is_stop() {
            return;
        }
        let job = queue.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
        let (name, formula) = match job {
            Some(job) => job,
            None => return,
        };

        let evaluation = panic::catch_unwind(AssertUnwindSafe(|| (*eval)(&*checker, &formula)));
        let result = match evaluation {
            Ok(result) => Ok((name, result)),
            Err(cause) => Err(Error::ExecutionError { name, reason: panic_message(cause) }),
        };

        // the receiver is gone if the batch already failed
        if tx.send(result).is_err() {
            return;
        }
    }
}

fn panic_message(cause: Box<dyn Any + Send>) -> String {
    if let Some(s) = cause.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("evaluation panicked")
    }
}

/// Flag shared with the workers, telling them to stop picking up new formulas.
#[derive(Clone, Debug, Default)]
struct Stopper {
    b: Arc<RwLock<bool>>,
}

impl Stopper {
    fn new() -> Self {
        Self::default()
    }

    fn send_stop(&self) {
        *self.b.write().unwrap_or_else(PoisonError::into_inner) = true;
    }

    fn is_stop(&self) -> bool {
        *self.b.read().unwrap_or_else(PoisonError::into_inner)
    }
}
