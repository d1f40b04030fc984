// error.rs - Error types for profile loading and matching

use thiserror::Error;

/// Result type alias for kinmatch operations
pub type Result<T> = std::result::Result<T, MatchError>;

/// A raw genotype value that could not be turned into an allele set
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// One of the comma-separated parts is not a finite number
    #[error("'{value}' is not a numeric allele value")]
    NotNumeric { value: String },

    /// More distinct alleles than a diploid genotype can hold
    #[error("'{value}' has {count} distinct alleles, expected 1 or 2")]
    TooManyAlleles { value: String, count: usize },
}

/// Errors that can occur while loading profiles or matching them
#[derive(Debug, Error)]
pub enum MatchError {
    /// Unparsable genotype met while comparing a candidate
    #[error("person {person_id}, locus {locus}: {source}")]
    Genotype {
        person_id: String,
        locus: String,
        #[source]
        source: ParseError,
    },

    /// Scoring parameters out of their valid range
    #[error("Invalid match configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited profile file
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Profile file header lacks the identifier column
    #[error("Identifier column '{column}' not found in header of {path}")]
    MissingIdColumn { column: String, path: String },

    /// Same person listed twice in one profile file
    #[error("Duplicate person id '{person_id}' at line {line}")]
    DuplicatePersonId { person_id: String, line: u64 },

    /// Anything else wrong with a profile file's layout
    #[error("Invalid profile file: {0}")]
    Format(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genotype_error_message_names_person_and_locus() {
        let err = MatchError::Genotype {
            person_id: "P000123".to_string(),
            locus: "TH01".to_string(),
            source: ParseError::NotNumeric {
                value: "9.x".to_string(),
            },
        };
        let message = err.to_string();
        assert!(message.contains("P000123"));
        assert!(message.contains("TH01"));
        assert!(message.contains("9.x"));
    }

    #[test]
    fn test_too_many_alleles_message() {
        let err = ParseError::TooManyAlleles {
            value: "8,9,10".to_string(),
            count: 3,
        };
        assert_eq!(
            err.to_string(),
            "'8,9,10' has 3 distinct alleles, expected 1 or 2"
        );
    }
}
