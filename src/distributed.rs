//! Partition / reduce protocol across independent workers.
//!
//! A coordinator splits the x-domain into `N` equal-width slices and
//! talks to `N` worker threads over channels only:
//!
//! 1. **broadcast** the objective and search options to every worker;
//! 2. **broadcast** the N-fold partition of the y-domain;
//! 3. **scatter** one x-slice per worker;
//! 4. each worker runs the engine on its x-slice against every y-slice with
//!    its own [`SharedState`](crate::state::SharedState) and replies with a
//!    [`WorkerReport`];
//! 5. **reduce**: the global bound is the minimum of the workers' `min_ub`.
//!
//! Workers never share memory. Minimizer records stay with the worker that
//! found them; only counts and the scalar bound travel back.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, info, info_span};

use crate::engine::BranchAndBound;
use crate::error::{Result, SearchError};
use crate::interval::Interval;
use crate::types::{Objective, SearchOptions, SearchStats};

/// Configuration for a distributed run.
#[derive(Debug, Clone)]
pub struct DistributedOptions {
    /// Number of workers, and the number of slices per axis.
    pub workers: usize,
    /// Options for each worker's local search.
    pub search: SearchOptions,
}

impl Default for DistributedOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            search: SearchOptions::default(),
        }
    }
}

/// Coordinator to worker messages, in protocol order.
enum Command {
    Setup {
        objective: Objective,
        options: SearchOptions,
    },
    YSlices(Vec<Interval>),
    XSlice(Interval),
}

/// What one worker sends back at the reduce step.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerReport {
    pub rank: usize,
    pub x_slice: Interval,
    /// Best upper bound found on this worker's slice.
    pub min_ub: f64,
    /// Records surviving in this worker's local collection.
    pub minimizer_count: usize,
    pub stats: SearchStats,
}

/// Reduced outcome of a distributed run.
#[derive(Debug, Clone)]
pub struct DistributedResult {
    /// Minimum over all workers' `min_ub`.
    pub min_ub: f64,
    /// One report per worker, ordered by rank.
    pub reports: Vec<WorkerReport>,
}

impl DistributedResult {
    /// Sum of the workers' local minimizer counts.
    pub fn minimizer_count(&self) -> usize {
        self.reports.iter().map(|r| r.minimizer_count).sum()
    }

    /// Worker statistics combined.
    pub fn stats(&self) -> SearchStats {
        self.reports
            .iter()
            .fold(SearchStats::default(), |acc, r| acc.combine(&r.stats))
    }
}

impl fmt::Display for DistributedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of minimizers: {}", self.minimizer_count())?;
        write!(f, "Upper bound for minimum: {}", self.min_ub)
    }
}

/// Split `domain` into `n` contiguous equal-width slices.
///
/// Boundary `i` is `lo + (hi - lo) * i / n`, with the last pinned to `hi`,
/// so consecutive slices share endpoints and together tile `domain`.
///
/// # Errors
/// `InvalidArgs` if `n` is zero.
pub fn partition(domain: Interval, n: usize) -> Result<Vec<Interval>> {
    if n == 0 {
        return Err(SearchError::InvalidArgs(
            "cannot partition into zero slices".into(),
        ));
    }
    let (lo, hi) = (domain.lo(), domain.hi());
    let width = hi - lo;
    let boundary = |i: usize| -> f64 {
        if i == 0 {
            return lo;
        }
        if i == n {
            return hi;
        }
        let t = i as f64 / n as f64;
        if width.is_finite() {
            lo + width * t
        } else {
            // hi - lo overflowed
            lo - lo * t + hi * t
        }
    };
    Ok((0..n)
        .map(|i| Interval::new(boundary(i), boundary(i + 1)))
        .collect())
}

/// Run the partition / reduce protocol for `objective` over `x × y`.
///
/// # Errors
/// `InvalidArgs` for zero workers; the engine's validation errors for a bad
/// threshold or domain; `Worker` wrapping the first failing worker's error
/// (lowest rank); `ChannelClosed` if a worker disappears mid-protocol.
pub fn minimize_distributed(
    objective: Objective,
    x: Interval,
    y: Interval,
    options: &DistributedOptions,
) -> Result<DistributedResult> {
    let n = options.workers;
    if n == 0 {
        return Err(SearchError::InvalidArgs("worker count must be at least 1".into()));
    }
    BranchAndBound::from_objective(objective.clone(), options.search.clone()).validate(x, y)?;

    let x_slices = partition(x, n)?;
    let y_slices = partition(y, n)?;

    let span = info_span!("distributed", workers = n);
    let _enter = span.enter();
    info!(%x, %y, threshold = options.search.threshold, "starting distributed search");

    let (reply_tx, reply_rx) = mpsc::channel::<(usize, Result<WorkerReport>)>();

    let mut reports = thread::scope(|scope| -> Result<Vec<WorkerReport>> {
        let mut commands = Vec::with_capacity(n);
        let mut handles = Vec::with_capacity(n);
        for rank in 0..n {
            let (tx, rx) = mpsc::channel();
            let replies = reply_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("ibb-worker-{}", rank))
                .spawn_scoped(scope, move || {
                    let report = run_worker(rank, rx);
                    // The coordinator only stops listening after an error.
                    let _ = replies.send((rank, report));
                })
                .map_err(|e| SearchError::ThreadPool(e.to_string()))?;
            commands.push(tx);
            handles.push(handle);
        }
        drop(reply_tx);

        for tx in &commands {
            send(
                tx,
                Command::Setup {
                    objective: objective.clone(),
                    options: options.search.clone(),
                },
            )?;
        }
        for tx in &commands {
            send(tx, Command::YSlices(y_slices.clone()))?;
        }
        for (tx, &slice) in commands.iter().zip(&x_slices) {
            send(tx, Command::XSlice(slice))?;
        }
        drop(commands);

        let mut outcomes: Vec<(usize, Result<WorkerReport>)> = reply_rx.iter().collect();

        for (rank, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                outcomes.push((
                    rank,
                    Err(SearchError::ChannelClosed("worker panicked")),
                ));
            }
        }
        if outcomes.len() < n && outcomes.iter().all(|(_, r)| r.is_ok()) {
            return Err(SearchError::ChannelClosed("worker reply"));
        }

        outcomes.sort_by_key(|(rank, _)| *rank);
        outcomes
            .into_iter()
            .map(|(rank, outcome)| {
                outcome.map_err(|source| SearchError::Worker {
                    rank,
                    source: Box::new(source),
                })
            })
            .collect()
    })?;

    reports.sort_by_key(|r| r.rank);
    let min_ub = reports.iter().map(|r| r.min_ub).fold(f64::INFINITY, f64::min);
    info!(min_ub, workers = n, "distributed search finished");

    Ok(DistributedResult { min_ub, reports })
}

fn send(tx: &Sender<Command>, command: Command) -> Result<()> {
    tx.send(command)
        .map_err(|_| SearchError::ChannelClosed("worker command"))
}

fn recv(rx: &Receiver<Command>) -> Result<Command> {
    rx.recv()
        .map_err(|_| SearchError::ChannelClosed("coordinator command"))
}

fn protocol_error(rank: usize, expected: &str) -> SearchError {
    SearchError::InvalidArgs(format!(
        "worker {}: out-of-order message, expected {}",
        rank, expected
    ))
}

fn run_worker(rank: usize, rx: Receiver<Command>) -> Result<WorkerReport> {
    let span = info_span!("worker", rank);
    let _enter = span.enter();

    let Command::Setup { objective, options } = recv(&rx)? else {
        return Err(protocol_error(rank, "setup"));
    };
    let Command::YSlices(y_slices) = recv(&rx)? else {
        return Err(protocol_error(rank, "y-slices"));
    };
    let Command::XSlice(x_slice) = recv(&rx)? else {
        return Err(protocol_error(rank, "x-slice"));
    };

    let regions: Vec<(Interval, Interval)> = y_slices.iter().map(|&y| (x_slice, y)).collect();
    let bnb = BranchAndBound::from_objective(objective, options);
    let result = bnb.minimize_regions(&regions)?;

    debug!(
        rank,
        min_ub = result.min_ub,
        minimizers = result.minimizers.len(),
        evaluated = result.stats.boxes_evaluated,
        "worker finished"
    );

    Ok(WorkerReport {
        rank,
        x_slice,
        min_ub: result.min_ub,
        minimizer_count: result.minimizers.len(),
        stats: result.stats,
    })
}
