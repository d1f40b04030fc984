// main.rs - CLI entry point

use indicatif::{ProgressBar, ProgressStyle};
use kinmatch::cli::Config;
use kinmatch::output::print_results;
use kinmatch::prelude::*;
use std::path::Path;
use std::time::Instant;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        println!("{}", Config::generate_sample());
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let database_path = args.database.clone().ok_or("--database is required")?;
    let queries_path = args.queries.clone().ok_or("--queries is required")?;

    let validation = validate_args(&args)?;

    println!("🚀 kinmatch v{}", env!("CARGO_PKG_VERSION"));

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("🧵 Threads: {}", n);
    } else {
        println!("🧵 Threads: {} (auto-detected)", rayon::current_num_threads());
    }

    let total_start = Instant::now();

    let mut database = ProfileDatabase::from_file(Path::new(&database_path), &args.id_column)
        .map_err(|e| format!("loading database: {}", e))?;
    database.apply_loci_filters(
        validation.loci_include_regex.as_ref(),
        validation.loci_exclude_regex.as_ref(),
    )?;

    let mut queries = ProfileDatabase::from_file(Path::new(&queries_path), &args.id_column)
        .map_err(|e| format!("loading queries: {}", e))?;
    queries.apply_loci_filters(
        validation.loci_include_regex.as_ref(),
        validation.loci_exclude_regex.as_ref(),
    )?;

    warn_unknown_query_loci(&queries, &database);
    database.print_statistics("DATABASE", &args.missing_char);

    if args.dry_run {
        println!("✅ Dry run completed successfully");
        println!(
            "📊 {} queries × {} database profiles",
            queries.len(),
            database.len()
        );
        return Ok(());
    }

    let engine = MatchEngine::new(validation.match_config).map_err(|e| e.to_string())?;
    println!("⚖️  Scoring: {}", engine.config().describe());

    println!(
        "\n🔍 Matching {} queries against {} profiles...",
        queries.len(),
        database.len()
    );
    let match_start = Instant::now();
    let progress = if args.no_progress {
        None
    } else {
        Some(scan_progress_bar((queries.len() * database.len()) as u64)?)
    };
    let results = engine.match_all_with_progress(&queries.profiles, &database.profiles, progress.as_ref());
    if let Some(pb) = &progress {
        pb.finish_with_message("✅ Matching completed!");
    }
    println!(
        "✅ Matching completed in {:.2}s",
        match_start.elapsed().as_secs_f64()
    );

    report_candidate_errors(&results);

    match &args.output {
        Some(path) => write_results(path, validation.output_format, &results, &command_line)?,
        None => print_results(&results),
    }

    println!(
        "\n🏁 Total time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn scan_progress_bar(total: u64) -> Result<ProgressBar, String> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}")
            .map_err(|e| format!("Invalid progress template: {}", e))?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Query loci absent from the database are inconclusive for every candidate
fn warn_unknown_query_loci(queries: &ProfileDatabase, database: &ProfileDatabase) {
    let unknown: Vec<&String> = queries
        .loci_names
        .iter()
        .filter(|locus| !database.loci_names.contains(locus))
        .collect();
    if !unknown.is_empty() {
        println!(
            "⚠️  {} query loci not in database (always inconclusive): {}",
            unknown.len(),
            unknown
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
}

fn report_candidate_errors(results: &[QueryResult]) {
    for result in results {
        for error in &result.query_errors {
            eprintln!("⚠️  Query {}: {}", result.query_id, error.message);
        }
        if result.stats.errors == 0 {
            continue;
        }
        eprintln!(
            "⚠️  Query {}: {} candidate comparisons skipped on invalid genotypes",
            result.query_id, result.stats.errors
        );
        for error in result.errors.iter().take(3) {
            eprintln!("    - {}", error.message);
        }
    }
}
