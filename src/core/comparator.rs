// comparator.rs - Per-locus concordance classification

use crate::core::alleles::{AlleleSet, Genotype};
use crate::core::params::{MatchConfig, MUTATION_STEP};
use serde::{Deserialize, Serialize};

/// Genetic concordance of one locus between a query and a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocusOutcome {
    /// At least one allele shared
    Match,
    /// Off by one repeat unit at most
    Mutation,
    /// Two homozygous genotypes with a larger gap
    Dropout,
    /// Inconsistent with a direct relationship
    Exclusion,
    /// Data missing on either side
    Inconclusive,
}

/// Result of comparing one locus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocusComparison {
    pub outcome: LocusOutcome,
    pub multiplier: f64,
    /// Both sides called and equal as sets
    pub identical: bool,
}

impl LocusComparison {
    /// Locus with data missing on either side
    pub fn inconclusive() -> Self {
        Self {
            outcome: LocusOutcome::Inconclusive,
            multiplier: 1.0,
            identical: false,
        }
    }

    /// Whether both genotypes were called
    pub fn compared(&self) -> bool {
        self.outcome != LocusOutcome::Inconclusive
    }
}

/// Classify two called allele sets. Rules are tried in order and the first one wins.
pub fn compare_alleles(
    query: &AlleleSet,
    candidate: &AlleleSet,
    config: &MatchConfig,
) -> LocusComparison {
    let identical = query == candidate;

    let (outcome, multiplier) = if query.shares_allele(candidate) {
        (
            LocusOutcome::Match,
            config.match_multiplier(candidate.is_homozygous()),
        )
    } else if within_mutation_step(query, candidate) {
        (LocusOutcome::Mutation, config.mutation_multiplier())
    } else if query.is_homozygous() && candidate.is_homozygous() {
        (LocusOutcome::Dropout, config.dropout_factor)
    } else {
        (LocusOutcome::Exclusion, config.exclusion_penalty)
    };

    LocusComparison {
        outcome,
        multiplier,
        identical,
    }
}

/// Compare two genotypes, missing on either side being inconclusive
pub fn compare_genotypes(
    query: &Genotype,
    candidate: &Genotype,
    config: &MatchConfig,
) -> LocusComparison {
    match (query, candidate) {
        (Genotype::Called(q), Genotype::Called(c)) => compare_alleles(q, c, config),
        _ => LocusComparison::inconclusive(),
    }
}

fn within_mutation_step(query: &AlleleSet, candidate: &AlleleSet) -> bool {
    query.alleles().iter().any(|&q| {
        candidate.alleles().iter().any(|&c| {
            let diff = (q - c).abs();
            diff > 0.0 && diff <= MUTATION_STEP
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(value: &str) -> AlleleSet {
        AlleleSet::parse(value).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_match_heterozygous_candidate() {
        let config = MatchConfig::default();
        let result = compare_alleles(&set("9,9.3"), &set("9,9.3"), &config);
        assert_eq!(result.outcome, LocusOutcome::Match);
        assert!(approx(result.multiplier, 0.5 / 0.15));
        assert!(result.identical);
    }

    #[test]
    fn test_match_homozygous_candidate() {
        let config = MatchConfig::default();
        let result = compare_alleles(&set("12,14"), &set("12"), &config);
        assert_eq!(result.outcome, LocusOutcome::Match);
        assert!(approx(result.multiplier, 1.0 / 0.15));
        assert!(!result.identical);
    }

    #[test]
    fn test_mutation_off_by_one() {
        let config = MatchConfig::default();
        let result = compare_alleles(&set("12,15"), &set("13,18"), &config);
        assert_eq!(result.outcome, LocusOutcome::Mutation);
        assert!(approx(result.multiplier, 0.002 / 0.15));

        // microvariant steps are within range too
        let result = compare_alleles(&set("9.3"), &set("10"), &config);
        assert_eq!(result.outcome, LocusOutcome::Mutation);
    }

    #[test]
    fn test_dropout_both_homozygous() {
        let config = MatchConfig::default();
        let result = compare_alleles(&set("8"), &set("11"), &config);
        assert_eq!(result.outcome, LocusOutcome::Dropout);
        assert!(approx(result.multiplier, 0.5));
    }

    #[test]
    fn test_exclusion() {
        let config = MatchConfig::default();
        let result = compare_alleles(&set("8,20"), &set("11,14"), &config);
        assert_eq!(result.outcome, LocusOutcome::Exclusion);
        assert!(approx(result.multiplier, 0.01));

        let result = compare_alleles(&set("8"), &set("11,14"), &config);
        assert_eq!(result.outcome, LocusOutcome::Exclusion);
    }

    #[test]
    fn test_match_takes_precedence_over_mutation() {
        let config = MatchConfig::default();
        // 10 is shared and 11 is one step from 10: still a match
        let result = compare_alleles(&set("10,11"), &set("10"), &config);
        assert_eq!(result.outcome, LocusOutcome::Match);
    }

    #[test]
    fn test_missing_is_inconclusive() {
        let config = MatchConfig::default();
        let called = Genotype::Called(set("9"));
        let result = compare_genotypes(&Genotype::Missing, &called, &config);
        assert_eq!(result.outcome, LocusOutcome::Inconclusive);
        assert_eq!(result.multiplier, 1.0);
        assert!(!result.compared());
        assert!(!result.identical);

        let result = compare_genotypes(&called, &Genotype::Missing, &config);
        assert_eq!(result.outcome, LocusOutcome::Inconclusive);
    }

    #[test]
    fn test_custom_constants_flow_through() {
        let config = MatchConfig {
            avg_allele_frequency: 0.25,
            exclusion_penalty: 0.05,
            ..MatchConfig::default()
        };
        let result = compare_alleles(&set("7"), &set("7"), &config);
        assert!(approx(result.multiplier, 4.0));
        let result = compare_alleles(&set("7,9"), &set("15"), &config);
        assert!(approx(result.multiplier, 0.05));
    }
}
