// batch.rs - Per-query database scans and batch driver

use crate::core::params::MatchConfig;
use crate::core::ranking::TopCandidates;
use crate::core::scorer::{CandidateScore, PreparedQuery, Rejection, Verdict};
use crate::data::loaders::ProfileReader;
use crate::data::profile::Profile;
use crate::error::{MatchError, Result};
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::io::Read;

/// Partitions per worker thread; keeps the tail of a scan balanced
const PARTITIONS_PER_THREAD: usize = 4;

/// Errored candidate comparisons kept per query; `ScanStats::errors` stays exact
pub const MAX_RECORDED_ERRORS: usize = 100;

/// Counters describing one query's scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub scanned: usize,
    pub admitted: usize,
    pub self_matches: usize,
    pub too_many_exclusions: usize,
    pub too_few_consistent: usize,
    pub duplicates: usize,
    pub errors: usize,
}

impl ScanStats {
    fn merge(&mut self, other: &ScanStats) {
        self.scanned += other.scanned;
        self.admitted += other.admitted;
        self.self_matches += other.self_matches;
        self.too_many_exclusions += other.too_many_exclusions;
        self.too_few_consistent += other.too_few_consistent;
        self.duplicates += other.duplicates;
        self.errors += other.errors;
    }
}

/// Genotype value that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateError {
    pub person_id: String,
    pub locus: String,
    pub message: String,
}

impl CandidateError {
    fn from_genotype_error(error: &MatchError) -> Option<Self> {
        match error {
            MatchError::Genotype {
                person_id, locus, ..
            } => Some(CandidateError {
                person_id: person_id.clone(),
                locus: locus.clone(),
                message: error.to_string(),
            }),
            _ => None,
        }
    }
}

/// Ranking and scan summary for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub query_id: String,
    pub top_candidates: Vec<CandidateScore>,
    pub stats: ScanStats,
    /// Unparseable query values, listed once however many rows they affect
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub query_errors: Vec<CandidateError>,
    /// First `MAX_RECORDED_ERRORS` candidates with unparseable values
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<CandidateError>,
}

/// Partial scan state, one per partition
#[derive(Debug, Clone)]
struct ScanAccumulator {
    top: TopCandidates,
    stats: ScanStats,
    errors: Vec<CandidateError>,
}

impl ScanAccumulator {
    fn new(capacity: usize) -> Self {
        Self {
            top: TopCandidates::new(capacity),
            stats: ScanStats::default(),
            errors: Vec::new(),
        }
    }

    fn observe(&mut self, candidate: &Profile, outcome: Result<Verdict>) {
        self.stats.scanned += 1;
        match outcome {
            Ok(Verdict::Admitted(score)) => {
                self.stats.admitted += 1;
                self.top.push(score);
            }
            Ok(Verdict::Rejected(reason)) => match reason {
                Rejection::SelfMatch => self.stats.self_matches += 1,
                Rejection::TooManyExclusions => self.stats.too_many_exclusions += 1,
                Rejection::TooFewConsistent => self.stats.too_few_consistent += 1,
                Rejection::Duplicate => self.stats.duplicates += 1,
            },
            Err(e) => {
                self.stats.errors += 1;
                // query-side failures are reported once by `finish`
                if self.errors.len() < MAX_RECORDED_ERRORS {
                    self.errors.extend(
                        CandidateError::from_genotype_error(&e)
                            .filter(|record| record.person_id == candidate.person_id),
                    );
                }
            }
        }
    }

    fn merge(mut self, other: ScanAccumulator) -> Self {
        self.top.merge(other.top);
        self.stats.merge(&other.stats);
        self.errors.extend(other.errors);
        self.errors.truncate(MAX_RECORDED_ERRORS);
        self
    }

    fn finish(self, query: &PreparedQuery) -> QueryResult {
        QueryResult {
            query_id: query.person_id().to_string(),
            top_candidates: self.top.into_vec(),
            stats: self.stats,
            query_errors: query
                .invalid_loci()
                .iter()
                .filter_map(CandidateError::from_genotype_error)
                .collect(),
            errors: self.errors,
        }
    }
}

/// Matching engine: scores queries against a read-only profile database
#[derive(Debug, Clone)]
pub struct MatchEngine {
    config: MatchConfig,
}

impl MatchEngine {
    /// Create an engine after checking the configuration
    pub fn new(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Scan the database for one query, partitioned across the rayon pool
    pub fn match_query(&self, query: &Profile, database: &[Profile]) -> QueryResult {
        self.match_query_with_progress(query, database, None)
    }

    fn match_query_with_progress(
        &self,
        query: &Profile,
        database: &[Profile],
        progress: Option<&ProgressBar>,
    ) -> QueryResult {
        let prepared = PreparedQuery::new(query, &self.config);
        let capacity = self.config.max_candidates;
        let chunk_size = partition_size(database.len());

        database
            .par_chunks(chunk_size)
            .map(|partition| {
                let mut acc = ScanAccumulator::new(capacity);
                for candidate in partition {
                    acc.observe(candidate, prepared.score(candidate, &self.config));
                }
                if let Some(pb) = progress {
                    pb.inc(partition.len() as u64);
                }
                acc
            })
            .reduce(|| ScanAccumulator::new(capacity), ScanAccumulator::merge)
            .finish(&prepared)
    }

    /// Single forward pass over any candidate source, on the calling thread
    pub fn match_query_streaming<I>(&self, query: &Profile, candidates: I) -> QueryResult
    where
        I: IntoIterator,
        I::Item: Borrow<Profile>,
    {
        let prepared = PreparedQuery::new(query, &self.config);
        let mut acc = ScanAccumulator::new(self.config.max_candidates);
        for candidate in candidates {
            let candidate = candidate.borrow();
            acc.observe(candidate, prepared.score(candidate, &self.config));
        }
        acc.finish(&prepared)
    }

    /// Scan a profile file without loading it; read errors abort the scan
    pub fn match_query_reader<R: Read>(
        &self,
        query: &Profile,
        reader: ProfileReader<R>,
    ) -> Result<QueryResult> {
        let prepared = PreparedQuery::new(query, &self.config);
        let mut acc = ScanAccumulator::new(self.config.max_candidates);
        for row in reader {
            let candidate = row?;
            acc.observe(&candidate, prepared.score(&candidate, &self.config));
        }
        Ok(acc.finish(&prepared))
    }

    /// Match every query, in parallel, returning results in query order
    pub fn match_all(&self, queries: &[Profile], database: &[Profile]) -> Vec<QueryResult> {
        self.match_all_with_progress(queries, database, None)
    }

    /// Like `match_all`, advancing `progress` by one per database row scanned
    pub fn match_all_with_progress(
        &self,
        queries: &[Profile],
        database: &[Profile],
        progress: Option<&ProgressBar>,
    ) -> Vec<QueryResult> {
        queries
            .par_iter()
            .map(|query| self.match_query_with_progress(query, database, progress))
            .collect()
    }

    /// Score one explicit pair, surfacing parse errors to the caller
    pub fn score_pair(&self, query: &Profile, candidate: &Profile) -> Result<Option<CandidateScore>> {
        match PreparedQuery::new(query, &self.config).score(candidate, &self.config)? {
            Verdict::Admitted(score) => Ok(Some(score)),
            Verdict::Rejected(_) => Ok(None),
        }
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self {
            config: MatchConfig::default(),
        }
    }
}

/// Rows per partition so each worker gets a few partitions
fn partition_size(rows: usize) -> usize {
    let partitions = rayon::current_num_threads().max(1) * PARTITIONS_PER_THREAD;
    rows.div_ceil(partitions).max(1)
}

/// Validate `config` and match every query against the database
pub fn run_batch(
    queries: &[Profile],
    database: &[Profile],
    config: MatchConfig,
) -> Result<Vec<QueryResult>> {
    let engine = MatchEngine::new(config)?;
    Ok(engine.match_all(queries, database))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCI: [&str; 6] = ["CSF1PO", "D13S317", "D16S539", "D18S51", "D21S11", "D3S1358"];

    fn profile(id: &str, values: [&str; 6]) -> Profile {
        LOCI.iter()
            .zip(values)
            .fold(Profile::new(id), |p, (locus, raw)| p.with_genotype(*locus, raw))
    }

    fn query() -> Profile {
        profile("Q1", ["10,12", "11,13", "9,12", "14,17", "29,30", "15,16"])
    }

    /// Relatives sharing one allele per locus; homozygous count raises the CLR
    fn database() -> Vec<Profile> {
        let mut db = vec![
            // the query itself
            query(),
            // identical genotypes under another id
            profile("DUP", ["10,12", "11,13", "9,12", "14,17", "29,30", "15,16"]),
            // unrelated: exclusions everywhere
            profile("U1", ["7,8", "7,8", "5,6", "20,21", "33,34", "11,12"]),
            // bad data
            profile("BAD", ["10,?", "11,13", "9,12", "14,17", "29,30", "15,16"]),
        ];
        for i in 0..14 {
            let homozygous = i % 4;
            let mut values = ["10,11", "13,14", "12,13", "17,18", "30,31", "15,17"];
            for value in values.iter_mut().take(homozygous) {
                let full: &'static str = *value;
                *value = full.split(',').next().unwrap_or(full);
            }
            db.push(profile(&format!("R{:02}", i), values));
        }
        db
    }

    #[test]
    fn test_match_query_ranking_properties() {
        let engine = MatchEngine::default();
        let result = engine.match_query(&query(), &database());

        assert_eq!(result.query_id, "Q1");
        assert!(result.top_candidates.len() <= 10);
        assert_eq!(result.top_candidates.len(), 10);
        assert!(result
            .top_candidates
            .windows(2)
            .all(|w| w[0].clr >= w[1].clr));
        assert!(result
            .top_candidates
            .iter()
            .all(|c| c.person_id != "Q1" && c.person_id != "DUP" && c.person_id != "U1"));
        assert!(result
            .top_candidates
            .iter()
            .all(|c| c.posterior >= 0.0 && c.posterior < 1.0));
        assert!(result.top_candidates.iter().all(|c| {
            c.consistent_loci + c.mutated_loci + c.inconclusive_loci <= LOCI.len()
        }));

        assert_eq!(result.stats.scanned, 18);
        assert_eq!(result.stats.self_matches, 1);
        assert_eq!(result.stats.duplicates, 1);
        assert_eq!(result.stats.too_many_exclusions, 1);
        assert_eq!(result.stats.admitted, 14);
        assert_eq!(result.stats.errors, 1);
        assert_eq!(result.errors[0].person_id, "BAD");
        assert_eq!(result.errors[0].locus, "CSF1PO");
        assert!(result.query_errors.is_empty());
    }

    #[test]
    fn test_bad_query_value_reported_once() {
        let engine = MatchEngine::default();
        let query = profile("QX", ["10,12", "11,13", "9,12", "14,17", "29,30", "nine"]);
        let db: Vec<Profile> = (0..250)
            .map(|i| {
                profile(
                    &format!("P{:03}", i),
                    ["10,11", "13,14", "12,13", "17,18", "30,31", "15,17"],
                )
            })
            .collect();

        let result = engine.match_query(&query, &db);
        assert_eq!(result.stats.scanned, 250);
        assert_eq!(result.stats.errors, 250);
        assert!(result.errors.is_empty());
        assert_eq!(result.query_errors.len(), 1);
        assert_eq!(result.query_errors[0].person_id, "QX");
        assert_eq!(result.query_errors[0].locus, "D3S1358");
    }

    #[test]
    fn test_candidate_errors_capped() {
        let engine = MatchEngine::default();
        let db: Vec<Profile> = (0..250)
            .map(|i| {
                profile(
                    &format!("B{:03}", i),
                    ["10,x", "11,13", "9,12", "14,17", "29,30", "15,16"],
                )
            })
            .collect();

        let parallel = engine.match_query(&query(), &db);
        assert_eq!(parallel.stats.errors, 250);
        assert_eq!(parallel.errors.len(), MAX_RECORDED_ERRORS);
        assert_eq!(parallel.errors[0].person_id, "B000");
        assert_eq!(parallel.errors[MAX_RECORDED_ERRORS - 1].person_id, "B099");

        let streamed = engine.match_query_streaming(&query(), &db);
        assert_eq!(parallel.errors, streamed.errors);
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let engine = MatchEngine::default();
        let result = engine.match_query(&query(), &database());
        // R03, R07, R11 share the highest homozygous count (3)
        let first: Vec<&str> = result.top_candidates[..3]
            .iter()
            .map(|c| c.person_id.as_str())
            .collect();
        assert_eq!(first, vec!["R03", "R07", "R11"]);
    }

    #[test]
    fn test_parallel_and_streaming_agree() {
        let engine = MatchEngine::default();
        let db = database();
        let parallel = engine.match_query(&query(), &db);
        let streamed = engine.match_query_streaming(&query(), db.iter().rev());
        assert_eq!(parallel.top_candidates, streamed.top_candidates);
        assert_eq!(parallel.stats, streamed.stats);
    }

    #[test]
    fn test_match_all_preserves_query_order() {
        let engine = MatchEngine::default();
        let queries = vec![
            query(),
            Profile::new("EMPTY"),
            profile("Q2", ["7,8", "7,8", "5,6", "20,21", "33,34", "11,12"]),
        ];
        let results = engine.match_all(&queries, &database());
        let ids: Vec<&str> = results.iter().map(|r| r.query_id.as_str()).collect();
        assert_eq!(ids, vec!["Q1", "EMPTY", "Q2"]);
        assert!(results[1].top_candidates.is_empty());
        assert_eq!(results[1].stats.errors, 0);
    }

    #[test]
    fn test_empty_database() {
        let engine = MatchEngine::default();
        let result = engine.match_query(&query(), &[]);
        assert!(result.top_candidates.is_empty());
        assert_eq!(result.stats.scanned, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MatchConfig {
            dropout_factor: 0.0,
            ..MatchConfig::default()
        };
        assert!(MatchEngine::new(config.clone()).is_err());
        assert!(run_batch(&[query()], &database(), config).is_err());
    }

    #[test]
    fn test_score_pair() {
        let engine = MatchEngine::default();
        let db = database();
        let relative = db.iter().find(|p| p.person_id == "R00").unwrap();
        assert!(engine.score_pair(&query(), relative).unwrap().is_some());
        let bad = db.iter().find(|p| p.person_id == "BAD").unwrap();
        assert!(engine.score_pair(&query(), bad).is_err());
    }
}
