// delimited.rs - CSV/TSV loader for genetic profiles

use crate::data::profile::{Profile, ProfileDatabase};
use crate::error::{MatchError, Result};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Field separator of a profile file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// `.tsv` and `.txt` are tab separated, everything else comma separated
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") | Some("txt") => Delimiter::Tab,
            _ => Delimiter::Comma,
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Streaming reader yielding one profile per data row
pub struct ProfileReader<R: Read> {
    reader: csv::Reader<R>,
    source: String,
    id_index: usize,
    columns: Vec<String>,
    loci_names: Vec<String>,
    record: csv::StringRecord,
}

impl ProfileReader<File> {
    /// Open a profile file, picking the delimiter from its extension
    pub fn from_path(path: &Path, id_column: &str) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(
            file,
            Delimiter::from_path(path),
            id_column,
            &path.display().to_string(),
        )
    }
}

impl<R: Read> ProfileReader<R> {
    /// Wrap a reader; `source` names the input in error messages
    pub fn new(inner: R, delimiter: Delimiter, id_column: &str, source: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(inner);

        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let id_index = columns
            .iter()
            .position(|c| c == id_column)
            .ok_or_else(|| MatchError::MissingIdColumn {
                column: id_column.to_string(),
                path: source.to_string(),
            })?;
        let loci_names = columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != id_index)
            .map(|(_, c)| c.clone())
            .collect();

        Ok(Self {
            reader,
            source: source.to_string(),
            id_index,
            columns,
            loci_names,
            record: csv::StringRecord::new(),
        })
    }

    /// Locus columns in file order
    pub fn loci_names(&self) -> &[String] {
        &self.loci_names
    }

    /// Read the next profile, `None` at end of input
    pub fn read_profile(&mut self) -> Result<Option<Profile>> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }

        let line = self.current_line();
        let person_id = self.record.get(self.id_index).unwrap_or_default().trim();
        if person_id.is_empty() {
            return Err(MatchError::Format(format!(
                "{}: empty person id at line {}",
                self.source, line
            )));
        }

        let mut genotypes = HashMap::with_capacity(self.loci_names.len());
        for (i, value) in self.record.iter().enumerate() {
            if i != self.id_index {
                genotypes.insert(self.columns[i].clone(), value.to_string());
            }
        }

        Ok(Some(Profile {
            person_id: person_id.to_string(),
            genotypes,
        }))
    }

    fn current_line(&self) -> u64 {
        self.record.position().map(|p| p.line()).unwrap_or(0)
    }
}

impl<R: Read> Iterator for ProfileReader<R> {
    type Item = Result<Profile>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_profile().transpose()
    }
}

impl ProfileDatabase {
    /// Load every profile of a CSV/TSV file, rejecting duplicate ids
    pub fn from_file(path: &Path, id_column: &str) -> Result<Self> {
        println!("📊 Loading profiles: {}", path.display());
        let reader = ProfileReader::from_path(path, id_column)?;
        let database = Self::from_reader(reader)?;
        println!(
            "✅ Profiles loaded: {} profiles, {} loci",
            database.profiles.len(),
            database.loci_names.len()
        );
        Ok(database)
    }

    /// Collect a reader into memory
    pub fn from_reader<R: Read>(mut reader: ProfileReader<R>) -> Result<Self> {
        let loci_names = reader.loci_names().to_vec();
        let mut seen = HashSet::new();
        let mut profiles = Vec::new();

        while let Some(profile) = reader.read_profile()? {
            if !seen.insert(profile.person_id.clone()) {
                return Err(MatchError::DuplicatePersonId {
                    person_id: profile.person_id,
                    line: reader.current_line(),
                });
            }
            profiles.push(profile);
        }

        Ok(Self::new(profiles, loci_names))
    }
}
