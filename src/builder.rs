//! Fluent front door for configuring and running a search.

use std::sync::Arc;

use crate::distributed::{minimize_distributed, DistributedOptions, DistributedResult};
use crate::engine::BranchAndBound;
use crate::error::Result;
use crate::functions::Problem;
use crate::interval::Interval;
use crate::trace::TraceWriter;
use crate::types::{IllFormedPolicy, Objective, SearchOptions, SearchResult};

/// Builder for a minimization run.
///
/// ```no_run
/// use interval_bnb::{Interval, MinimizeBuilder};
///
/// let booth = |x: Interval, y: Interval| {
///     (x + 2.0 * y - 7.0).pow(2) + (2.0 * x + y - 5.0).pow(2)
/// };
/// let domain = Interval::new(-10.0, 10.0);
/// let result = MinimizeBuilder::new(booth, domain, domain)
///     .threshold(1e-3)
///     .threads(4)
///     .minimize()
///     .unwrap();
/// println!("{}", result);
/// ```
pub struct MinimizeBuilder {
    objective: Objective,
    x: Interval,
    y: Interval,
    options: SearchOptions,
    tracer: Option<Arc<TraceWriter>>,
}

impl MinimizeBuilder {
    pub fn new(
        objective: impl Fn(Interval, Interval) -> Interval + Send + Sync + 'static,
        x: Interval,
        y: Interval,
    ) -> Self {
        Self::from_objective(Arc::new(objective), x, y)
    }

    pub fn from_objective(objective: Objective, x: Interval, y: Interval) -> Self {
        Self {
            objective,
            x,
            y,
            options: SearchOptions::default(),
            tracer: None,
        }
    }

    /// Start from a catalog problem and its initial box.
    pub fn from_problem(problem: &Problem) -> Self {
        Self::from_objective(problem.objective.clone(), problem.x, problem.y)
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.options.threshold = threshold;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.options.parallel = parallel;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.options.threads = threads;
        self
    }

    pub fn min_parallel_width(mut self, width: f64) -> Self {
        self.options.min_parallel_width = width;
        self
    }

    pub fn ill_formed(mut self, policy: IllFormedPolicy) -> Self {
        self.options.ill_formed = policy;
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Record engine events (single-process runs, `trace` feature only).
    pub fn tracer(mut self, tracer: Arc<TraceWriter>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Run the search in this process.
    pub fn minimize(self) -> Result<SearchResult> {
        let mut bnb = BranchAndBound::from_objective(self.objective, self.options);
        if let Some(tracer) = self.tracer {
            bnb = bnb.with_tracer(tracer);
        }
        bnb.minimize(self.x, self.y)
    }

    /// Run the partition / reduce protocol with `workers` workers.
    pub fn minimize_distributed(self, workers: usize) -> Result<DistributedResult> {
        let options = DistributedOptions {
            workers,
            search: self.options,
        };
        minimize_distributed(self.objective, self.x, self.y, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::functions;

    #[test]
    fn test_builder_options() {
        let b = MinimizeBuilder::new(|x, _y| x, Interval::point(0.0), Interval::point(0.0))
            .threshold(0.5)
            .parallel(false)
            .threads(2)
            .min_parallel_width(0.25)
            .ill_formed(IllFormedPolicy::Fail);
        assert_eq!(b.options.threshold, 0.5);
        assert!(!b.options.parallel);
        assert_eq!(b.options.threads, 2);
        assert_eq!(b.options.min_parallel_width, 0.25);
        assert_eq!(b.options.ill_formed, IllFormedPolicy::Fail);
    }

    #[test]
    fn test_builder_minimize_booth() {
        let problem = functions::lookup("booth").unwrap();
        let result = MinimizeBuilder::from_problem(&problem)
            .threshold(0.01)
            .parallel(false)
            .minimize()
            .unwrap();
        assert!(result.min_ub < 1e-2, "min_ub = {}", result.min_ub);
        assert!(result.minimizers.iter().any(|m| m.contains_point(1.0, 3.0)));
    }

    #[test]
    fn test_builder_distributed() {
        let problem = functions::lookup("booth").unwrap();
        let result = MinimizeBuilder::from_problem(&problem)
            .threshold(0.05)
            .parallel(false)
            .minimize_distributed(2)
            .unwrap();
        assert_eq!(result.reports.len(), 2);
        assert!(result.min_ub < 0.1, "min_ub = {}", result.min_ub);
    }

    #[test]
    fn test_builder_rejects_bad_threshold() {
        let err = MinimizeBuilder::new(|x, y| x + y, Interval::new(0.0, 1.0), Interval::new(0.0, 1.0))
            .threshold(-1.0)
            .minimize()
            .unwrap_err();
        assert_eq!(err, SearchError::InvalidThreshold(-1.0));
    }
}
