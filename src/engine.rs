//! Branch-and-bound search over a two-dimensional box.
//!
//! Each call evaluates the objective over the box as an interval, then:
//!
//! 1. **prune**: if the enclosure's lower bound exceeds the shared `min_ub`,
//!    the box cannot hold the global minimum;
//! 2. **improve**: if its upper bound is below `min_ub`, that bound becomes the
//!    new `min_ub` and every record with `lower_bound >= min_ub` is evicted
//!    (one critical section, see [`SharedState::improve`]);
//! 3. **leaf**: if the box's x-width is at most the threshold, record it;
//! 4. **split**: otherwise bisect both axes and recurse into the four
//!    quadrants, as parallel rayon tasks when enabled.
//!
//! Boxes are always split on both axes at once, so only the x-width is
//! checked for convergence. Recursion depth is bounded by
//! `log2(initial_width / threshold)`; once bisection can no longer shrink the
//! x-axis (the width has reached floating-point resolution) the box is
//! recorded as a leaf even if it is wider than the threshold.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, info, info_span, warn};

use crate::error::{Result, SearchError};
use crate::interval::Interval;
use crate::minimizer::Minimizer;
use crate::state::{Insertion, SharedState, StatsCounters};
use crate::trace::TraceWriter;
use crate::trace_write;
use crate::types::{IllFormedPolicy, Objective, SearchOptions, SearchResult, SearchStats};

/// Per-run shared context threaded through the recursion.
struct Context<'a> {
    state: &'a SharedState,
    counters: &'a StatsCounters,
    /// Set when a branch hits a fatal error; remaining branches return early.
    abort: &'a AtomicBool,
}

/// Branch-and-bound minimizer for a two-variable interval objective.
pub struct BranchAndBound {
    objective: Objective,
    options: SearchOptions,
    #[cfg_attr(not(feature = "trace"), allow(dead_code))]
    tracer: Option<Arc<TraceWriter>>,
}

impl BranchAndBound {
    /// Create a search for `objective` with the given options.
    pub fn new(
        objective: impl Fn(Interval, Interval) -> Interval + Send + Sync + 'static,
        options: SearchOptions,
    ) -> Self {
        Self::from_objective(Arc::new(objective), options)
    }

    /// Create a search from an already shared objective handle.
    pub fn from_objective(objective: Objective, options: SearchOptions) -> Self {
        Self {
            objective,
            options,
            tracer: None,
        }
    }

    /// Record engine events into `tracer` (requires the `trace` feature).
    pub fn with_tracer(mut self, tracer: Arc<TraceWriter>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Check the threshold and a search box before any evaluation.
    ///
    /// # Errors
    /// `InvalidThreshold` unless the threshold is finite and positive;
    /// `InvalidDomain` if either axis is empty, NaN-bearing or unbounded.
    pub fn validate(&self, x: Interval, y: Interval) -> Result<()> {
        let t = self.options.threshold;
        if !(t > 0.0) || !t.is_finite() {
            return Err(SearchError::InvalidThreshold(t));
        }
        for (axis, i) in [('x', x), ('y', y)] {
            if !i.is_well_formed() || !i.lo().is_finite() || !i.hi().is_finite() {
                return Err(SearchError::InvalidDomain {
                    axis,
                    lo: i.lo(),
                    hi: i.hi(),
                });
            }
        }
        Ok(())
    }

    /// Run a complete search over `x × y` from a fresh `(+∞, empty)` state.
    pub fn minimize(&self, x: Interval, y: Interval) -> Result<SearchResult> {
        self.minimize_regions(&[(x, y)])
    }

    /// Run the search over several boxes sharing one state.
    ///
    /// Used by distributed workers, which explore one x-slice against every
    /// y-slice. In parallel mode the boxes themselves are also explored
    /// concurrently.
    pub fn minimize_regions(&self, regions: &[(Interval, Interval)]) -> Result<SearchResult> {
        for &(x, y) in regions {
            self.validate(x, y)?;
        }

        let span = info_span!("search", regions = regions.len(), threshold = self.options.threshold);
        let _enter = span.enter();
        info!(parallel = self.options.parallel, threads = self.options.threads, "starting search");

        let state = SharedState::new();
        let counters = StatsCounters::new();
        let abort = AtomicBool::new(false);
        let ctx = Context {
            state: &state,
            counters: &counters,
            abort: &abort,
        };

        match self.thread_pool()? {
            Some(pool) => pool.install(|| {
                regions
                    .par_iter()
                    .try_for_each(|&(x, y)| self.explore(&ctx, x, y, 0))
            })?,
            None => {
                for &(x, y) in regions {
                    self.explore(&ctx, x, y, 0)?;
                }
            }
        }

        let stats = counters.snapshot();
        let (min_ub, minimizers) = state.into_parts();
        info!(
            min_ub,
            minimizers = minimizers.len(),
            evaluated = stats.boxes_evaluated,
            unresolved = stats.unresolved,
            "search finished"
        );

        Ok(SearchResult {
            min_ub,
            minimizers,
            stats,
        })
    }

    /// Explore `x × y` against an existing shared state.
    ///
    /// Several calls may share one `state`, concurrently or in sequence; the
    /// returned statistics cover this call only.
    pub fn search(&self, x: Interval, y: Interval, state: &SharedState) -> Result<SearchStats> {
        self.validate(x, y)?;

        let counters = StatsCounters::new();
        let abort = AtomicBool::new(false);
        let ctx = Context {
            state,
            counters: &counters,
            abort: &abort,
        };

        match self.thread_pool()? {
            Some(pool) => pool.install(|| self.explore(&ctx, x, y, 0))?,
            None => self.explore(&ctx, x, y, 0)?,
        }
        Ok(counters.snapshot())
    }

    fn thread_pool(&self) -> Result<Option<ThreadPool>> {
        if !self.options.parallel {
            return Ok(None);
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads)
            .thread_name(|i| format!("ibb-search-{}", i))
            .build()
            .map(Some)
            .map_err(|e| SearchError::ThreadPool(e.to_string()))
    }

    // ──────────────────────────────────────────────────────────────────────
    // Recursion
    // ──────────────────────────────────────────────────────────────────────

    fn explore(&self, ctx: &Context<'_>, x: Interval, y: Interval, depth: usize) -> Result<()> {
        if ctx.abort.load(Ordering::Relaxed) {
            return Ok(());
        }

        let fxy = (self.objective)(x, y);
        ctx.counters.evaluated(depth);

        if !fxy.is_well_formed() {
            return self.ill_formed(ctx, x, y, fxy, depth);
        }

        let min_ub = ctx.state.min_ub();
        if fxy.lo() > min_ub {
            ctx.counters.pruned();
            trace_write!(
                self.tracer,
                "TRACE PRUNE depth={} lo={} min_ub={}",
                depth,
                fxy.lo(),
                min_ub
            );
            return Ok(());
        }

        if fxy.hi() < min_ub {
            if let Some(evicted) = ctx.state.improve(fxy.hi()) {
                ctx.counters.improved(evicted);
                debug!(depth, ub = fxy.hi(), evicted, "upper bound improved");
                trace_write!(
                    self.tracer,
                    "TRACE IMPROVE depth={} ub={} evicted={}",
                    depth,
                    fxy.hi(),
                    evicted
                );
            }
        }

        if x.width() <= self.options.threshold || !is_splittable(&x) {
            let record = match Minimizer::new(x, y, fxy.lo(), fxy.hi()) {
                Ok(record) => record,
                Err(e) => return self.fail(ctx, e),
            };
            let insertion = ctx.state.insert(record);
            ctx.counters.leaf(insertion);
            match insertion {
                Insertion::Inserted => {
                    trace_write!(
                        self.tracer,
                        "TRACE LEAF depth={} x={} y={} lb={} ub={}",
                        depth,
                        x,
                        y,
                        fxy.lo(),
                        fxy.hi()
                    );
                }
                Insertion::Stale => {
                    trace_write!(self.tracer, "TRACE STALE depth={} lb={}", depth, fxy.lo());
                }
            }
            return Ok(());
        }

        let (xl, xr) = x.split();
        let (yl, yr) = y.split();
        let next = depth + 1;

        if self.options.parallel && x.width() >= self.options.min_parallel_width {
            let ((a, b), (c, d)) = rayon::join(
                || {
                    rayon::join(
                        || self.explore(ctx, xl, yl, next),
                        || self.explore(ctx, xl, yr, next),
                    )
                },
                || {
                    rayon::join(
                        || self.explore(ctx, xr, yl, next),
                        || self.explore(ctx, xr, yr, next),
                    )
                },
            );
            a.and(b).and(c).and(d)
        } else {
            self.explore(ctx, xl, yl, next)?;
            self.explore(ctx, xl, yr, next)?;
            self.explore(ctx, xr, yl, next)?;
            self.explore(ctx, xr, yr, next)
        }
    }

    fn ill_formed(
        &self,
        ctx: &Context<'_>,
        x: Interval,
        y: Interval,
        fxy: Interval,
        depth: usize,
    ) -> Result<()> {
        trace_write!(
            self.tracer,
            "TRACE UNRESOLVED depth={} x={} y={} f={:?}",
            depth,
            x,
            y,
            fxy
        );
        match self.options.ill_formed {
            IllFormedPolicy::Prune => {
                ctx.counters.unresolved();
                warn!(
                    depth,
                    %x,
                    %y,
                    lo = fxy.lo(),
                    hi = fxy.hi(),
                    "objective returned ill-formed enclosure; box dropped"
                );
                Ok(())
            }
            IllFormedPolicy::Fail => self.fail(
                ctx,
                SearchError::IllFormedEnclosure {
                    x: x.to_string(),
                    y: y.to_string(),
                    value: format!("[{}, {}]", fxy.lo(), fxy.hi()),
                },
            ),
        }
    }

    fn fail(&self, ctx: &Context<'_>, err: SearchError) -> Result<()> {
        ctx.abort.store(true, Ordering::Relaxed);
        Err(err)
    }
}

/// True if bisection yields strictly narrower halves.
#[inline]
fn is_splittable(i: &Interval) -> bool {
    let m = i.mid();
    i.lo() < m && m < i.hi()
}
