use std::path::PathBuf;

use clap::Parser;

/// Compile directories of CSV translation tables into per-language i18n files.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "csvlocale", author, version, about, long_about = None)]
pub struct Args {
    /// Directory scanned recursively for `.csv` files
    #[arg(short, long, env = "CSVLOCALE_INPUT", value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Directory receiving the generated files
    #[arg(short, long, env = "CSVLOCALE_OUTPUT", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output shape: `flat` (alias `a`) or `nested` (alias `b`)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Module extension used in flat mode: `ts` or `js`
    #[arg(long)]
    pub extension: Option<String>,

    /// Rebuild whenever a CSV file under the input directory changes
    #[arg(short, long)]
    pub watch: bool,

    /// How often watch mode scans the input directory
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Config file to read instead of `./csvlocale.toml`
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ignore any config file
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Only write these languages (comma separated or repeated)
    #[arg(long = "include-lang", value_delimiter = ',', value_name = "LANG")]
    pub include_lang: Vec<String>,

    /// Never write these languages (comma separated or repeated)
    #[arg(long = "exclude-lang", value_delimiter = ',', value_name = "LANG")]
    pub exclude_lang: Vec<String>,

    /// Show debug logs
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long)]
    pub quiet: bool,
}
