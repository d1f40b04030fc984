// mod.rs - Result writers

use crate::core::QueryResult;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Supported result encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Tsv,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unsupported output format: {}. Use: json, tsv, csv", s)),
        }
    }
}

const COLUMNS: [&str; 8] = [
    "query_id",
    "rank",
    "person_id",
    "clr",
    "posterior",
    "consistent_loci",
    "mutated_loci",
    "inconclusive_loci",
];

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|e| {
                format!("Failed to create parent directory '{}': {}", parent.display(), e)
            })?;
        }
    }
    Ok(())
}

fn create_output(file_path: &str) -> Result<BufWriter<File>, String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    Ok(BufWriter::new(file))
}

/// Write rankings as a JSON array, one object per query
pub fn write_json<W: Write>(writer: W, results: &[QueryResult]) -> Result<(), String> {
    serde_json::to_writer_pretty(writer, results).map_err(|e| format!("Write error: {}", e))
}

/// Write rankings in long delimited format, one row per ranked candidate
pub fn write_delimited<W: Write>(
    mut writer: W,
    delimiter: u8,
    results: &[QueryResult],
    command_line: &str,
) -> Result<(), String> {
    writeln!(writer, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(
        writer,
        "# Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# kinmatch v{}", env!("CARGO_PKG_VERSION"))
        .map_err(|e| format!("Write error: {}", e))?;

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    csv_writer
        .write_record(COLUMNS)
        .map_err(|e| format!("Write error: {}", e))?;

    for result in results {
        for (rank, candidate) in result.top_candidates.iter().enumerate() {
            csv_writer
                .write_record([
                    result.query_id.clone(),
                    (rank + 1).to_string(),
                    candidate.person_id.clone(),
                    format!("{:e}", candidate.clr),
                    candidate.posterior.to_string(),
                    candidate.consistent_loci.to_string(),
                    candidate.mutated_loci.to_string(),
                    candidate.inconclusive_loci.to_string(),
                ])
                .map_err(|e| format!("Write error: {}", e))?;
        }
    }

    csv_writer.flush().map_err(|e| format!("Flush error: {}", e))
}

/// Write rankings to a file in the requested format
pub fn write_results(
    file_path: &str,
    format: OutputFormat,
    results: &[QueryResult],
    command_line: &str,
) -> Result<(), String> {
    let mut writer = create_output(file_path)?;
    match format {
        OutputFormat::Json => write_json(&mut writer, results)?,
        OutputFormat::Tsv => write_delimited(&mut writer, b'\t', results, command_line)?,
        OutputFormat::Csv => write_delimited(&mut writer, b',', results, command_line)?,
    }
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Rankings written to: {}", file_path);
    Ok(())
}

/// Print a readable ranking table per query
pub fn print_results(results: &[QueryResult]) {
    for result in results {
        println!(
            "\n🔎 Query {} ({} candidates scanned, {} admitted)",
            result.query_id, result.stats.scanned, result.stats.admitted
        );
        if result.top_candidates.is_empty() {
            println!("   no admissible candidates");
            continue;
        }
        println!(
            "   {:>4}  {:<16} {:>12} {:>10} {:>5} {:>5} {:>5}",
            "rank", "person_id", "clr", "posterior", "cons", "mut", "inc"
        );
        for (rank, c) in result.top_candidates.iter().enumerate() {
            println!(
                "   {:>4}  {:<16} {:>12.4e} {:>10.6} {:>5} {:>5} {:>5}",
                rank + 1,
                c.person_id,
                c.clr,
                c.posterior,
                c.consistent_loci,
                c.mutated_loci,
                c.inconclusive_loci
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CandidateScore, ScanStats};

    fn results() -> Vec<QueryResult> {
        vec![
            QueryResult {
                query_id: "Q1".to_string(),
                top_candidates: vec![
                    CandidateScore {
                        person_id: "P2".to_string(),
                        clr: 2500.0,
                        posterior: 2500.0 / 2501.0,
                        consistent_loci: 6,
                        mutated_loci: 1,
                        inconclusive_loci: 0,
                    },
                    CandidateScore {
                        person_id: "P9".to_string(),
                        clr: 40.0,
                        posterior: 40.0 / 41.0,
                        consistent_loci: 5,
                        mutated_loci: 0,
                        inconclusive_loci: 2,
                    },
                ],
                stats: ScanStats::default(),
                query_errors: Vec::new(),
                errors: Vec::new(),
            },
            QueryResult {
                query_id: "Q2".to_string(),
                top_candidates: Vec::new(),
                stats: ScanStats::default(),
                query_errors: Vec::new(),
                errors: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("tsv".parse::<OutputFormat>().unwrap(), OutputFormat::Tsv);
        assert!("phylip".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_tsv_layout() {
        let mut buffer = Vec::new();
        write_delimited(&mut buffer, b'\t', &results(), "kinmatch --test").unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], COLUMNS.join("\t"));
        assert!(lines[1].starts_with("Q1\t1\tP2\t2.5e3\t"));
        assert!(lines[2].starts_with("Q1\t2\tP9\t"));
        assert!(text.starts_with("# Command: kinmatch --test"));
    }

    #[test]
    fn test_json_shape() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &results()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value[0]["query_id"], "Q1");
        assert_eq!(value[0]["top_candidates"][0]["person_id"], "P2");
        assert_eq!(value[0]["top_candidates"][0]["consistent_loci"], 6);
        assert_eq!(value[1]["top_candidates"].as_array().unwrap().len(), 0);
        assert!(value[0].get("errors").is_none());
        assert!(value[0].get("query_errors").is_none());
    }
}
