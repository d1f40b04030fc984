// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.database.is_none() {
            self.database = config.database;
        }
        if self.queries.is_none() {
            self.queries = config.queries;
        }
        if self.output.is_none() {
            self.output = config.output;
        }

        // Core settings (only override defaults, not explicit CLI values)
        if let Some(format) = config.format.filter(|_| self.format == "json") {
            self.format = format;
        }
        if let Some(id_column) = config.id_column.filter(|_| self.id_column == "PersonID") {
            self.id_column = id_column;
        }
        if let Some(missing_char) = config.missing_char.filter(|_| self.missing_char == "-") {
            self.missing_char = missing_char;
        }

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Locus filtering
        if self.include_loci.is_none() {
            self.include_loci = config.include_loci;
        }
        if self.exclude_loci.is_none() {
            self.exclude_loci = config.exclude_loci;
        }

        // Scoring parameters
        if let Some(matching) = config.matching {
            self.avg_allele_frequency = self
                .avg_allele_frequency
                .or(Some(matching.avg_allele_frequency));
            self.mutation_rate = self.mutation_rate.or(Some(matching.mutation_rate));
            self.dropout_factor = self.dropout_factor.or(Some(matching.dropout_factor));
            self.exclusion_penalty = self.exclusion_penalty.or(Some(matching.exclusion_penalty));
            self.max_exclusions = self.max_exclusions.or(Some(matching.max_exclusions));
            self.min_consistent_loci = self
                .min_consistent_loci
                .or(Some(matching.min_consistent_loci));
            self.identity_threshold = self
                .identity_threshold
                .or(Some(matching.identity_match_threshold));
            self.top = self.top.or(Some(matching.max_candidates));
            if self.missing_char == "-" {
                self.missing_char = matching.missing_marker;
            }
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }
        if !self.no_progress && config.no_progress.unwrap_or(false) {
            self.no_progress = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
