// alleles.rs - Allele set parsing for STR genotype values

use crate::error::ParseError;
use std::fmt;

/// One or two distinct numeric alleles observed at a locus
///
/// Values are kept sorted; a homozygous set stores its single allele twice
/// so that derived equality is set equality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlleleSet {
    alleles: [f64; 2],
    distinct: u8,
}

/// Parsed genotype at one locus
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Genotype {
    Called(AlleleSet),
    Missing,
}

impl Genotype {
    /// Parse a raw genotype string, treating blanks and the marker as missing
    pub fn parse(raw: &str, missing_marker: &str) -> Result<Self, ParseError> {
        let cleaned = raw.trim();
        if cleaned.is_empty() || cleaned == missing_marker {
            return Ok(Genotype::Missing);
        }
        AlleleSet::parse(cleaned).map(Genotype::Called)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Genotype::Missing)
    }
}

impl AlleleSet {
    /// Homozygous set
    pub fn single(allele: f64) -> Self {
        let allele = allele + 0.0; // folds -0.0 into 0.0
        Self {
            alleles: [allele, allele],
            distinct: 1,
        }
    }

    /// Set of two alleles, collapsing to homozygous when they are equal
    pub fn pair(a: f64, b: f64) -> Self {
        if a == b {
            return Self::single(a);
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        Self {
            alleles: [lo + 0.0, hi + 0.0],
            distinct: 2,
        }
    }

    /// Parse comma-separated allele values such as `"9,9.3"` or `"12"`
    pub fn parse(value: &str) -> Result<Self, ParseError> {
        let mut distinct: Vec<f64> = Vec::with_capacity(2);

        for part in value.split(',') {
            let allele = part
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|a| a.is_finite())
                .ok_or_else(|| ParseError::NotNumeric {
                    value: value.to_string(),
                })?;
            if !distinct.contains(&allele) {
                distinct.push(allele);
            }
        }

        match distinct.as_slice() {
            [a] => Ok(Self::single(*a)),
            [a, b] => Ok(Self::pair(*a, *b)),
            _ => Err(ParseError::TooManyAlleles {
                value: value.to_string(),
                count: distinct.len(),
            }),
        }
    }

    /// Distinct alleles in ascending order
    pub fn alleles(&self) -> &[f64] {
        &self.alleles[..self.distinct as usize]
    }

    pub fn len(&self) -> usize {
        self.distinct as usize
    }

    pub fn is_homozygous(&self) -> bool {
        self.distinct == 1
    }

    pub fn contains(&self, allele: f64) -> bool {
        self.alleles().contains(&allele)
    }

    /// True when at least one allele is present in both sets
    pub fn shares_allele(&self, other: &AlleleSet) -> bool {
        self.alleles().iter().any(|&a| other.contains(a))
    }
}

impl fmt::Display for AlleleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alleles() {
            [a] => write!(f, "{}", a),
            [a, b] => write!(f, "{},{}", a, b),
            _ => Ok(()),
        }
    }
}
