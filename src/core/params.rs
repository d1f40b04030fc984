// params.rs - Scoring parameters and admissibility thresholds

use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};

/// Largest allele difference still read as a single-step mutation
pub const MUTATION_STEP: f64 = 1.0;

/// Configuration for locus scoring and candidate filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Assumed frequency of any allele in the population
    pub avg_allele_frequency: f64,
    /// Per-locus probability of a single-step mutation
    pub mutation_rate: f64,
    /// Multiplier for two homozygous loci with a large gap
    pub dropout_factor: f64,
    /// Multiplier for a locus inconsistent with relatedness
    pub exclusion_penalty: f64,
    /// Candidates with more exclusions than this are rejected
    pub max_exclusions: usize,
    /// Candidates with fewer consistent loci than this are rejected
    pub min_consistent_loci: usize,
    /// Fraction of set-identical loci above which a candidate is a duplicate
    pub identity_match_threshold: f64,
    /// Length of the ranking returned per query
    pub max_candidates: usize,
    /// Raw genotype value meaning "no data"
    pub missing_marker: String,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            avg_allele_frequency: 0.15,
            mutation_rate: 0.002,
            dropout_factor: 0.5,
            exclusion_penalty: 0.01,
            max_exclusions: 4,
            min_consistent_loci: 5,
            identity_match_threshold: 0.80,
            max_candidates: 10,
            missing_marker: "-".to_string(),
        }
    }
}

impl MatchConfig {
    /// Check that every multiplier stays strictly positive and thresholds are in range
    pub fn validate(&self) -> Result<()> {
        let positives = [
            ("avg_allele_frequency", self.avg_allele_frequency),
            ("mutation_rate", self.mutation_rate),
            ("dropout_factor", self.dropout_factor),
            ("exclusion_penalty", self.exclusion_penalty),
        ];
        for (name, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(MatchError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.identity_match_threshold) {
            return Err(MatchError::InvalidConfig(format!(
                "identity_match_threshold must be between 0.0 and 1.0, got {}",
                self.identity_match_threshold
            )));
        }

        if self.max_candidates == 0 {
            return Err(MatchError::InvalidConfig(
                "max_candidates must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Likelihood ratio of a shared allele, by candidate zygosity
    pub fn match_multiplier(&self, candidate_homozygous: bool) -> f64 {
        let transmission = if candidate_homozygous { 1.0 } else { 0.5 };
        transmission / self.avg_allele_frequency
    }

    /// Likelihood ratio of a single-step mutation
    pub fn mutation_multiplier(&self) -> f64 {
        self.mutation_rate / self.avg_allele_frequency
    }

    /// One-line summary for console reports
    pub fn describe(&self) -> String {
        format!(
            "freq={} mut={} dropout={} excl={} max_excl={} min_consistent={} identity>{} top={}",
            self.avg_allele_frequency,
            self.mutation_rate,
            self.dropout_factor,
            self.exclusion_penalty,
            self.max_exclusions,
            self.min_consistent_loci,
            self.identity_match_threshold,
            self.max_candidates
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = MatchConfig::default();
        assert_eq!(config.avg_allele_frequency, 0.15);
        assert_eq!(config.mutation_rate, 0.002);
        assert_eq!(config.dropout_factor, 0.5);
        assert_eq!(config.exclusion_penalty, 0.01);
        assert_eq!(config.max_exclusions, 4);
        assert_eq!(config.min_consistent_loci, 5);
        assert_eq!(config.identity_match_threshold, 0.80);
        assert_eq!(config.max_candidates, 10);
        assert_eq!(config.missing_marker, "-");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_multipliers() {
        let config = MatchConfig::default();
        assert!((config.match_multiplier(true) - 1.0 / 0.15).abs() < 1e-12);
        assert!((config.match_multiplier(false) - 0.5 / 0.15).abs() < 1e-12);
        assert!((config.mutation_multiplier() - 0.002 / 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = MatchConfig::default();
        config.avg_allele_frequency = 0.0;
        assert!(config.validate().is_err());

        let mut config = MatchConfig::default();
        config.exclusion_penalty = -0.01;
        assert!(config.validate().is_err());

        let mut config = MatchConfig::default();
        config.identity_match_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = MatchConfig::default();
        config.max_candidates = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: MatchConfig = toml::from_str("mutation_rate = 0.001\nmax_exclusions = 2\n").unwrap();
        assert_eq!(config.mutation_rate, 0.001);
        assert_eq!(config.max_exclusions, 2);
        assert_eq!(config.min_consistent_loci, 5);
    }
}
