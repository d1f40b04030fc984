// config.rs - Configuration file support

use crate::core::MatchConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub database: Option<String>,
    pub queries: Option<String>,
    pub output: Option<String>,
    pub format: Option<String>,
    pub id_column: Option<String>,
    pub missing_char: Option<String>,

    // Performance
    pub threads: Option<usize>,

    // Locus filtering
    pub include_loci: Option<String>,
    pub exclude_loci: Option<String>,

    // Flags
    pub dry_run: Option<bool>,
    pub no_progress: Option<bool>,

    /// Scoring parameters, `[matching]` table
    pub matching: Option<MatchConfig>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# kinmatch.toml - Configuration file for kinmatch
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Reference profile database (.csv or .tsv)
database = "/path/to/database.csv"

# Query profiles (.csv or .tsv)
queries = "/path/to/queries.csv"

# Output file for the rankings (omit to print to stdout)
output = "matches.json"

# Output format: json, tsv, csv
format = "json"

# Person identifier column
id_column = "PersonID"

# Missing data marker
missing_char = "-"

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
threads = 16

# =============================================================================
# LOCUS FILTERING
# =============================================================================

# Include only loci matching regex pattern
# include_loci = "^D\\d+S"

# Exclude loci matching regex pattern
# exclude_loci = "^Amel"

# =============================================================================
# FLAGS
# =============================================================================

# Validate inputs without matching (dry run)
dry_run = false

# Hide the progress bar
no_progress = false

# =============================================================================
# SCORING
# =============================================================================

[matching]
avg_allele_frequency = 0.15
mutation_rate = 0.002
dropout_factor = 0.5
exclusion_penalty = 0.01
max_exclusions = 4
min_consistent_loci = 5
identity_match_threshold = 0.80
max_candidates = 10
# Used when missing_char is left at its default
# missing_marker = "-"
"#
        .to_string()
    }
}
