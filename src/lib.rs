// lib.rs - kinmatch library root

//! # kinmatch - Kinship candidate search for STR genetic profiles
//!
//! Scores query profiles against a reference database of profiles and
//! returns, per query, the candidates most likely to be biological relatives.
//!
//! ## Features
//!
//! - **Per-locus classification**: shared allele, single-step mutation,
//!   possible dropout, exclusion or missing data
//! - **Combined likelihood ratio**: product of per-locus ratios with a
//!   posterior probability under a flat prior
//! - **Admissibility filters**: exclusion count, consistent loci and
//!   duplicate-identity detection
//! - **Parallel scans**: database partitions scored with rayon, partial
//!   top-K lists merged deterministically
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use kinmatch::prelude::*;
//!
//! let database = ProfileDatabase::from_file(std::path::Path::new("database.csv"), "PersonID")?;
//! let queries = ProfileDatabase::from_file(std::path::Path::new("queries.csv"), "PersonID")?;
//!
//! let engine = MatchEngine::new(MatchConfig::default())?;
//! for result in engine.match_all(&queries.profiles, &database.profiles) {
//!     println!("{}: {} candidates", result.query_id, result.top_candidates.len());
//! }
//! # Ok::<(), kinmatch::MatchError>(())
//! ```

pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{run_batch, score_candidate};
    pub use crate::core::{AlleleSet, Genotype, LocusOutcome};
    pub use crate::core::{CandidateScore, MatchConfig, MatchEngine, QueryResult, ScanStats};
    pub use crate::data::{Profile, ProfileDatabase, ProfileReader};
    pub use crate::error::{MatchError, ParseError};
    pub use crate::output::{write_results, OutputFormat};
}

// Re-export main types at the root level for convenience
pub use core::{CandidateScore, MatchConfig, MatchEngine, QueryResult};
pub use data::{Profile, ProfileDatabase};
pub use error::{MatchError, ParseError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!("kinmatch v{} - Kinship candidate search for STR profiles", VERSION)
}
