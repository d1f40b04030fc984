// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs, Debug)]
/// kinmatch - rank likely relatives of query STR profiles in a reference database
pub struct Args {
    /// path to the reference profile database (.csv or .tsv)
    #[argh(option)]
    pub database: Option<String>,

    /// path to the query profiles (.csv or .tsv)
    #[argh(option)]
    pub queries: Option<String>,

    /// output file for the rankings (default: print to stdout)
    #[argh(option)]
    pub output: Option<String>,

    /// output format: json, tsv, csv (default: json)
    #[argh(option, default = "String::from(\"json\")")]
    pub format: String,

    /// name of the person identifier column (default: PersonID)
    #[argh(option, default = "String::from(\"PersonID\")")]
    pub id_column: String,

    /// missing data marker (default: -)
    #[argh(option, default = "String::from(\"-\")")]
    pub missing_char: String,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// number of candidates reported per query (default: 10)
    #[argh(option)]
    pub top: Option<usize>,

    /// assumed average allele frequency (default: 0.15)
    #[argh(option)]
    pub avg_allele_frequency: Option<f64>,

    /// single-step mutation rate (default: 0.002)
    #[argh(option)]
    pub mutation_rate: Option<f64>,

    /// likelihood ratio for a possible allele dropout (default: 0.5)
    #[argh(option)]
    pub dropout_factor: Option<f64>,

    /// likelihood ratio for an excluding locus (default: 0.01)
    #[argh(option)]
    pub exclusion_penalty: Option<f64>,

    /// reject candidates with more exclusions than this (default: 4)
    #[argh(option)]
    pub max_exclusions: Option<usize>,

    /// reject candidates with fewer consistent loci than this (default: 5)
    #[argh(option)]
    pub min_consistent_loci: Option<usize>,

    /// fraction of identical loci above which a candidate is a duplicate (default: 0.80)
    #[argh(option)]
    pub identity_threshold: Option<f64>,

    /// include only loci matching regex pattern
    #[argh(option)]
    pub include_loci: Option<String>,

    /// exclude loci matching regex pattern
    #[argh(option)]
    pub exclude_loci: Option<String>,

    /// validate inputs without matching (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// hide the progress bar
    #[argh(switch)]
    pub no_progress: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
