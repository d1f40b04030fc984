// scorer.rs - Query/candidate profile scoring

use crate::core::alleles::Genotype;
use crate::core::comparator::{compare_genotypes, LocusComparison, LocusOutcome};
use crate::core::params::MatchConfig;
use crate::data::profile::Profile;
use crate::error::{MatchError, ParseError, Result};
use serde::{Deserialize, Serialize};

/// Candidate that passed every admissibility filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub person_id: String,
    pub clr: f64,
    pub posterior: f64,
    pub consistent_loci: usize,
    pub mutated_loci: usize,
    pub inconclusive_loci: usize,
}

/// Why a candidate was left out of the ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Same identifier as the query
    SelfMatch,
    TooManyExclusions,
    TooFewConsistent,
    /// Near-identical genotypes, taken to be the same person
    Duplicate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Admitted(CandidateScore),
    Rejected(Rejection),
}

/// Per-locus counters accumulated over one query/candidate pair
#[derive(Debug, Clone, PartialEq)]
pub struct LocusTally {
    pub clr: f64,
    pub consistent: usize,
    pub mutated: usize,
    pub inconclusive: usize,
    pub exclusions: usize,
    pub compared: usize,
    pub identity_matches: usize,
}

impl Default for LocusTally {
    fn default() -> Self {
        Self {
            clr: 1.0,
            consistent: 0,
            mutated: 0,
            inconclusive: 0,
            exclusions: 0,
            compared: 0,
            identity_matches: 0,
        }
    }
}

impl LocusTally {
    pub fn record(&mut self, comparison: &LocusComparison) {
        self.clr *= comparison.multiplier;
        match comparison.outcome {
            LocusOutcome::Match => self.consistent += 1,
            LocusOutcome::Mutation => self.mutated += 1,
            LocusOutcome::Dropout | LocusOutcome::Inconclusive => self.inconclusive += 1,
            LocusOutcome::Exclusion => self.exclusions += 1,
        }
        if comparison.compared() {
            self.compared += 1;
            if comparison.identical {
                self.identity_matches += 1;
            }
        }
    }

    pub fn loci_seen(&self) -> usize {
        self.consistent + self.mutated + self.inconclusive + self.exclusions
    }

    /// Fraction of compared loci with set-identical genotypes
    pub fn identity_fraction(&self) -> Option<f64> {
        if self.compared > 0 {
            Some(self.identity_matches as f64 / self.compared as f64)
        } else {
            None
        }
    }

    /// Apply the admissibility filters in order
    pub fn verdict(&self, person_id: &str, config: &MatchConfig) -> Verdict {
        if self.exclusions > config.max_exclusions {
            return Verdict::Rejected(Rejection::TooManyExclusions);
        }
        if self.consistent < config.min_consistent_loci {
            return Verdict::Rejected(Rejection::TooFewConsistent);
        }
        if let Some(fraction) = self.identity_fraction() {
            if fraction > config.identity_match_threshold {
                return Verdict::Rejected(Rejection::Duplicate);
            }
        }

        Verdict::Admitted(CandidateScore {
            person_id: person_id.to_string(),
            clr: self.clr,
            posterior: posterior(self.clr),
            consistent_loci: self.consistent,
            mutated_loci: self.mutated,
            inconclusive_loci: self.inconclusive,
        })
    }
}

/// Largest double below 1.0; `clr / (clr + 1)` rounds to 1.0 once clr exceeds 2^53
const MAX_POSTERIOR: f64 = 1.0 - f64::EPSILON / 2.0;

/// `clr / (clr + 1)`, zero for a non-positive ratio
pub fn posterior(clr: f64) -> f64 {
    if clr > 0.0 {
        (clr / (clr + 1.0)).min(MAX_POSTERIOR)
    } else {
        0.0
    }
}

/// Query profile parsed once and reused against every candidate
///
/// A query value that fails to parse is kept as an error and only aborts
/// comparisons against candidates that have a value at that locus.
#[derive(Debug, Clone)]
pub struct PreparedQuery<'q> {
    person_id: &'q str,
    loci: Vec<(&'q str, std::result::Result<Genotype, ParseError>)>,
    missing_marker: &'q str,
}

impl<'q> PreparedQuery<'q> {
    pub fn new(query: &'q Profile, config: &'q MatchConfig) -> Self {
        let loci = query
            .loci()
            .into_iter()
            .map(|locus| {
                let raw = query.genotype(locus).unwrap_or_default();
                (locus, Genotype::parse(raw, &config.missing_marker))
            })
            .collect();

        Self {
            person_id: query.person_id.as_str(),
            loci,
            missing_marker: config.missing_marker.as_str(),
        }
    }

    pub fn person_id(&self) -> &str {
        self.person_id
    }

    pub fn loci_count(&self) -> usize {
        self.loci.len()
    }

    /// Query loci whose value could not be parsed, in locus order
    pub fn invalid_loci(&self) -> Vec<MatchError> {
        self.loci
            .iter()
            .filter_map(|(locus, parsed)| {
                parsed
                    .as_ref()
                    .err()
                    .map(|e| genotype_error(self.person_id, locus, e.clone()))
            })
            .collect()
    }

    /// Compare every query locus against the candidate
    pub fn tally(&self, candidate: &Profile, config: &MatchConfig) -> Result<LocusTally> {
        let mut tally = LocusTally::default();

        for (locus, query_genotype) in &self.loci {
            let comparison = match (query_genotype, candidate.genotype(locus)) {
                (Ok(Genotype::Missing), _) | (_, None) => LocusComparison::inconclusive(),
                (query_genotype, Some(raw)) => {
                    let candidate_genotype = Genotype::parse(raw, self.missing_marker)
                        .map_err(|e| genotype_error(&candidate.person_id, locus, e))?;
                    match query_genotype {
                        Ok(query_genotype) => {
                            compare_genotypes(query_genotype, &candidate_genotype, config)
                        }
                        Err(_) if candidate_genotype.is_missing() => {
                            LocusComparison::inconclusive()
                        }
                        Err(e) => return Err(genotype_error(self.person_id, locus, e.clone())),
                    }
                }
            };
            tally.record(&comparison);
        }

        Ok(tally)
    }

    /// Score one candidate, skipping the query's own record
    pub fn score(&self, candidate: &Profile, config: &MatchConfig) -> Result<Verdict> {
        if candidate.person_id == self.person_id {
            return Ok(Verdict::Rejected(Rejection::SelfMatch));
        }
        let tally = self.tally(candidate, config)?;
        Ok(tally.verdict(&candidate.person_id, config))
    }
}

fn genotype_error(person_id: &str, locus: &str, source: ParseError) -> MatchError {
    MatchError::Genotype {
        person_id: person_id.to_string(),
        locus: locus.to_string(),
        source,
    }
}

/// Score a single pair without reusing the parsed query
pub fn score_candidate(
    query: &Profile,
    candidate: &Profile,
    config: &MatchConfig,
) -> Result<Verdict> {
    PreparedQuery::new(query, config).score(candidate, config)
}
