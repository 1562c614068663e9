//! # interval-bnb: certified global minimization with interval arithmetic
//!
//! Finds enclosures of the global minimum of a two-variable function over a
//! rectangular box by interval branch-and-bound. Every result is a proof, not
//! an estimate: the true minimum lies in `[min lower_bound, min_ub]`, and
//! every global minimizer lies inside one of the reported boxes.
//!
//! ## Overview
//!
//! - [`interval`]: closed intervals with outward-rounded `+ - *` and integer
//!   powers, built on pure directed-rounding primitives in [`rounding`]
//!   (no floating-point mode register, so any thread may evaluate any box).
//! - [`minimizer`]: candidate boxes with their bounds, kept in a collection
//!   ordered by lower bound.
//! - [`engine`]: the recursive prune / improve / leaf / split search, forking
//!   the four quadrants of each split on a rayon pool.
//! - [`distributed`]: partitions the domain across independent workers that
//!   communicate over channels and reduces their best bounds.
//! - [`functions`]: a small catalog of classic test objectives.
//!
//! ## Quick start
//!
//! ```no_run
//! use interval_bnb::{functions, MinimizeBuilder};
//!
//! let problem = functions::lookup("goldstein_price").unwrap();
//! let result = MinimizeBuilder::from_problem(&problem)
//!     .threshold(1e-3)
//!     .minimize()
//!     .unwrap();
//! for m in &result.minimizers {
//!     println!("{}", m);
//! }
//! println!("{}", result);
//! ```
//!
//! ## References
//!
//! - Moore, R.E. *Interval Analysis*. Prentice-Hall (1966).
//! - Hansen, E. & Walster, G.W. *Global Optimization Using Interval
//!   Analysis*, 2nd ed. Marcel Dekker (2004).

pub mod builder;
pub mod distributed;
pub mod engine;
pub mod error;
pub mod functions;
pub mod interval;
pub mod minimizer;
pub mod rounding;
pub mod state;
pub mod trace;
pub mod types;

// Re-export main types
pub use builder::MinimizeBuilder;
pub use distributed::{DistributedOptions, DistributedResult, WorkerReport};
pub use engine::BranchAndBound;
pub use error::{Result, SearchError};
pub use interval::Interval;
pub use minimizer::{Minimizer, MinimizerList};
pub use state::SharedState;
pub use trace::TraceWriter;
pub use types::{
    IllFormedPolicy, Objective, ObjectiveFn, SearchOptions, SearchResult, SearchStats,
    DEFAULT_THREADS, DEFAULT_THRESHOLD,
};
