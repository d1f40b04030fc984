// profile.rs - Genetic profile and profile database structures

use rayon::prelude::*;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Missing-data summary for a profile database
#[derive(Debug, Clone)]
pub struct DatabaseStatistics {
    pub profiles: usize,
    pub loci: usize,
    pub missing_cells: usize,
    pub missing_percent: f64,
    pub complete_profiles: usize,
    pub avg_distinct_genotypes: f64,
}

/// One person's raw genotypes, keyed by locus name
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub person_id: String,
    pub genotypes: HashMap<String, String>,
}

impl Profile {
    pub fn new(person_id: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            genotypes: HashMap::new(),
        }
    }

    /// Builder-style insertion, mostly for tests and small inputs
    pub fn with_genotype(mut self, locus: impl Into<String>, raw: impl Into<String>) -> Self {
        self.genotypes.insert(locus.into(), raw.into());
        self
    }

    /// Raw genotype at a locus, `None` when the profile has no such column
    pub fn genotype(&self, locus: &str) -> Option<&str> {
        self.genotypes.get(locus).map(|s| s.as_str())
    }

    /// Locus names in ascending order
    pub fn loci(&self) -> Vec<&str> {
        let mut loci: Vec<&str> = self.genotypes.keys().map(|s| s.as_str()).collect();
        loci.sort_unstable();
        loci
    }

    pub fn is_missing(&self, locus: &str, missing_marker: &str) -> bool {
        self.genotype(locus)
            .map(|raw| is_missing_value(raw, missing_marker))
            .unwrap_or(true)
    }
}

/// Blank or equal to the marker once trimmed
pub fn is_missing_value(raw: &str, missing_marker: &str) -> bool {
    let cleaned = raw.trim();
    cleaned.is_empty() || cleaned == missing_marker
}

/// Collection of profiles with the locus columns they were loaded from
#[derive(Debug, Clone, Default)]
pub struct ProfileDatabase {
    pub profiles: Vec<Profile>,
    pub loci_names: Vec<String>,
}

impl ProfileDatabase {
    pub fn new(profiles: Vec<Profile>, loci_names: Vec<String>) -> Self {
        Self {
            profiles,
            loci_names,
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Restrict every profile to loci passing the include/exclude patterns
    pub fn apply_loci_filters(
        &mut self,
        loci_include: Option<&Regex>,
        loci_exclude: Option<&Regex>,
    ) -> Result<(), String> {
        if loci_include.is_none() && loci_exclude.is_none() {
            return Ok(());
        }

        let before = self.loci_names.len();
        if let Some(include_regex) = loci_include {
            self.loci_names.retain(|locus| include_regex.is_match(locus));
        }
        if let Some(exclude_regex) = loci_exclude {
            self.loci_names.retain(|locus| !exclude_regex.is_match(locus));
        }

        let keep: HashSet<&String> = self.loci_names.iter().collect();
        self.profiles.par_iter_mut().for_each(|profile| {
            profile.genotypes.retain(|locus, _| keep.contains(locus));
        });

        let after = self.loci_names.len();
        if before != after {
            println!(
                "Loci filters: kept {} loci (removed {})",
                after,
                before - after
            );
        }

        if after == 0 {
            return Err("No loci remain after filtering".to_string());
        }
        Ok(())
    }

    /// Compute missing-data and diversity figures
    pub fn statistics(&self, missing_marker: &str) -> DatabaseStatistics {
        let missing_per_profile: Vec<usize> = self
            .profiles
            .par_iter()
            .map(|profile| {
                self.loci_names
                    .iter()
                    .filter(|locus| profile.is_missing(locus, missing_marker))
                    .count()
            })
            .collect();

        let distinct_per_locus: Vec<usize> = self
            .loci_names
            .par_iter()
            .map(|locus| {
                self.profiles
                    .iter()
                    .filter_map(|profile| profile.genotype(locus))
                    .filter(|raw| !is_missing_value(raw, missing_marker))
                    .map(|raw| raw.trim())
                    .collect::<HashSet<_>>()
                    .len()
            })
            .collect();

        let total_cells = self.profiles.len() * self.loci_names.len();
        let missing_cells: usize = missing_per_profile.iter().sum();
        let missing_percent = if total_cells > 0 {
            100.0 * missing_cells as f64 / total_cells as f64
        } else {
            0.0
        };
        let avg_distinct_genotypes = if self.loci_names.is_empty() {
            0.0
        } else {
            distinct_per_locus.iter().sum::<usize>() as f64 / self.loci_names.len() as f64
        };

        DatabaseStatistics {
            profiles: self.profiles.len(),
            loci: self.loci_names.len(),
            missing_cells,
            missing_percent,
            complete_profiles: missing_per_profile.iter().filter(|&&m| m == 0).count(),
            avg_distinct_genotypes,
        }
    }

    /// Print database statistics
    pub fn print_statistics(&self, phase: &str, missing_marker: &str) {
        let stats = self.statistics(missing_marker);
        println!("\n📊 === PROFILE STATISTICS ({}) ===", phase);
        println!(
            "  📏 Dimensions: {} profiles × {} loci = {} total cells",
            stats.profiles,
            stats.loci,
            stats.profiles * stats.loci
        );

        print!(
            "  📊 Missing data: {:.2}% ({} cells)",
            stats.missing_percent, stats.missing_cells
        );
        if stats.missing_percent <= 5.0 {
            println!("  🟢 EXCELLENT: Very low missing data");
        } else if stats.missing_percent <= 15.0 {
            println!("  🟡 GOOD: Acceptable missing data");
        } else {
            println!("  🟠 FAIR: Many loci will be inconclusive");
        }

        if stats.profiles > 0 {
            println!(
                "  ✅ Complete profiles: {} ({:.1}%)",
                stats.complete_profiles,
                100.0 * stats.complete_profiles as f64 / stats.profiles as f64
            );
        }
        println!(
            "  🧬 Avg distinct genotypes per locus: {:.1}",
            stats.avg_distinct_genotypes
        );
    }
}
