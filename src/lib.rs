//! # u-foodsci
//!
//! Statistics for food-science experiments: sensory panel comparisons and
//! shelf-life prediction.
//!
//! The crate is a pure computation engine. It receives already-parsed
//! numbers and validated configuration, and returns immutable result
//! records; it performs no I/O and keeps no state between calls, so it can
//! be used from any number of threads at once.
//!
//! ## Modules
//!
//! - [`descriptive`]: n, mean, variance, SD, SE, median, range of a sample
//! - [`special`]: Gamma function and approximate F-test p-values
//! - [`testing`]: One-way ANOVA and Duncan-style letter grouping
//! - [`shelf_life`]: Q10, Arrhenius and water activity shelf-life models
//! - [`error`]: Error taxonomy shared by all analyses
//!
//! ## Design Philosophy
//!
//! - **Explicit failure**: insufficient data is an error, never a silent zero
//! - **Bounded approximations**: p-values and range-test critical values are
//!   engineering approximations with documented limits
//! - **Serializable results**: every record derives `serde` traits for the
//!   export and persistence layers that consume them

pub mod descriptive;
pub mod error;
pub mod shelf_life;
pub mod special;
pub mod testing;

pub use error::{AnalysisError, Result};
