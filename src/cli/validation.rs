// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::core::MatchConfig;
use crate::output::OutputFormat;
use regex::Regex;
use std::str::FromStr;

pub struct ValidationResult {
    pub match_config: MatchConfig,
    pub output_format: OutputFormat,
    pub loci_include_regex: Option<Regex>,
    pub loci_exclude_regex: Option<Regex>,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    let output_format = OutputFormat::from_str(&args.format)?;

    if args.id_column.trim().is_empty() {
        return Err("--id-column must not be empty".to_string());
    }
    if args.threads == Some(0) {
        return Err("--threads must be at least 1".to_string());
    }

    let match_config = build_match_config(args);
    match_config.validate().map_err(|e| e.to_string())?;

    let loci_include_regex = compile_pattern(args.include_loci.as_deref(), "include_loci")?;
    let loci_exclude_regex = compile_pattern(args.exclude_loci.as_deref(), "exclude_loci")?;

    Ok(ValidationResult {
        match_config,
        output_format,
        loci_include_regex,
        loci_exclude_regex,
    })
}

/// Scoring parameters from defaults overridden by any explicit value
pub fn build_match_config(args: &Args) -> MatchConfig {
    let defaults = MatchConfig::default();
    MatchConfig {
        avg_allele_frequency: args
            .avg_allele_frequency
            .unwrap_or(defaults.avg_allele_frequency),
        mutation_rate: args.mutation_rate.unwrap_or(defaults.mutation_rate),
        dropout_factor: args.dropout_factor.unwrap_or(defaults.dropout_factor),
        exclusion_penalty: args.exclusion_penalty.unwrap_or(defaults.exclusion_penalty),
        max_exclusions: args.max_exclusions.unwrap_or(defaults.max_exclusions),
        min_consistent_loci: args
            .min_consistent_loci
            .unwrap_or(defaults.min_consistent_loci),
        identity_match_threshold: args
            .identity_threshold
            .unwrap_or(defaults.identity_match_threshold),
        max_candidates: args.top.unwrap_or(defaults.max_candidates),
        missing_marker: args.missing_char.clone(),
    }
}

fn compile_pattern(pattern: Option<&str>, name: &str) -> Result<Option<Regex>, String> {
    pattern
        .map(|p| Regex::new(p).map_err(|e| format!("Invalid {} regex: {}", name, e)))
        .transpose()
}
