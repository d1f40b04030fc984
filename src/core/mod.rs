// mod.rs - Core matching module

pub mod alleles;
pub mod batch;
pub mod comparator;
pub mod params;
pub mod ranking;
pub mod scorer;

// Re-export main types for convenience
pub use alleles::{AlleleSet, Genotype};
pub use batch::{run_batch, CandidateError, MatchEngine, QueryResult, ScanStats};
pub use comparator::{compare_alleles, compare_genotypes, LocusComparison, LocusOutcome};
pub use params::MatchConfig;
pub use ranking::{select_top, TopCandidates};
pub use scorer::{score_candidate, CandidateScore, LocusTally, PreparedQuery, Rejection, Verdict};
