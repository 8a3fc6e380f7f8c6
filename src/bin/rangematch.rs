//! A binary for filtering BED files against exclusion regions and for drawing
//! covariate-matched control sets from them.
//!
//! ```shell
//! # Keep the peaks that do not fall within blacklisted regions.
//! cargo run --release --bin=rangematch --features=binaries -- \
//!     filter peaks.bed.gz blacklist.bed.gz --invert
//!
//! # Draw a length-matched control set from a pool of background regions.
//! cargo run --release --bin=rangematch --features=binaries -- \
//!     match focal.bed pool.bed --covariate length --method stratified --overview
//! ```
//!
//! Inputs are BED3+ files (optionally gzipped). Every interval receives a
//! `length` covariate (`end - start`), column five (when numeric) is exposed as
//! the `score` covariate, and additional numeric columns can be exposed with
//! `--covariate-column NAME=COLUMN` (1-based).

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use clap_verbosity_flag::Verbosity;
use flate2::read::GzDecoder;
use rangematch::contigs::CANONICAL_PATTERN;
use rangematch::filter::Filter;
use rangematch::interval;
use rangematch::matcher;
use rangematch::matcher::builder::DEFAULT_MAX_ATTEMPTS;
use rangematch::matcher::overview::Overview;
use rangematch::matcher::Binning;
use rangematch::matcher::MatchResult;
use rangematch::matcher::Method;
use rangematch::set::Mode;
use rangematch::Contigs;
use rangematch::Interval;
use rangematch::IntervalSet;
use regex::Regex;
use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;
use tracing::info;
use tracing::warn;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

////////////////////////////////////////////////////////////////////////////////////////
// BED files
////////////////////////////////////////////////////////////////////////////////////////

/// A numeric BED column exposed as a named covariate.
#[derive(Clone, Debug, Eq, PartialEq)]
struct CovariateColumn {
    /// The covariate name.
    name: String,

    /// The 1-based column number.
    column: usize,
}

impl FromStr for CovariateColumn {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, column) = s
            .split_once('=')
            .ok_or_else(|| format!("expected `NAME=COLUMN`, found `{s}`"))?;

        let column = column
            .parse::<usize>()
            .map_err(|err| format!("invalid column `{column}`: {err}"))?;

        if name.is_empty() {
            return Err(format!("missing covariate name in `{s}`"));
        }

        if column < 4 {
            return Err(format!(
                "column {column} is one of the chrom/start/end columns and cannot be a covariate"
            ));
        }

        Ok(Self {
            name: name.to_string(),
            column,
        })
    }
}

/// Parses a single BED line into a raw interval record.
///
/// Blank lines, comments, and `track`/`browser` lines are skipped. Fields that
/// are missing or malformed are left unset so that the interval set builder
/// decides (based on its mode) whether the record is dropped or fatal.
fn parse_bed_line(line: &str, columns: &[CovariateColumn]) -> Option<interval::Builder> {
    let line = line.trim_end_matches(['\r', '\n']);

    if line.trim().is_empty()
        || line.starts_with('#')
        || line.starts_with("track")
        || line.starts_with("browser")
    {
        return None;
    }

    let fields = line.split('\t').collect::<Vec<_>>();
    let field = |i: usize| fields.get(i).copied().filter(|f| !f.is_empty());

    let mut record = interval::Builder::default();

    if let Some(contig) = field(0) {
        record = record.contig(contig);
    }

    let start = field(1).and_then(|v| v.parse::<u64>().ok());
    let end = field(2).and_then(|v| v.parse::<u64>().ok());

    if let Some(start) = start {
        record = record.start(start);
    }

    if let Some(end) = end {
        record = record.end(end);
    }

    if let (Some(start), Some(end)) = (start, end) {
        if end >= start {
            record = record.covariate("length", (end - start) as f64);
        }
    }

    if let Some(name) = field(3).filter(|name| *name != ".") {
        record = record.name(name);
    }

    if let Some(score) = field(4).and_then(|v| v.parse::<f64>().ok()) {
        record = record.covariate("score", score);
    }

    if let Some(strand) = field(5).and_then(|v| v.parse().ok()) {
        record = record.strand(strand);
    }

    for column in columns {
        if let Some(value) = field(column.column - 1).and_then(|v| v.parse::<f64>().ok()) {
            record = record.covariate(column.name.clone(), value);
        }
    }

    Some(record)
}

/// Reads every record from a (possibly gzipped) BED file.
fn read_bed_file(path: &Path, columns: &[CovariateColumn]) -> Result<Vec<interval::Builder>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let reader: Box<dyn BufRead> = match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => Box::new(BufReader::new(GzDecoder::new(file))),
        _ => Box::new(BufReader::new(file)),
    };

    let mut records = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {} of {}", i + 1, path.display()))?;

        if let Some(record) = parse_bed_line(&line, columns) {
            records.push(record);
        }
    }

    info!("read {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Writes an interval as a BED6 line (with the score column left empty).
fn write_bed_line(out: &mut impl Write, interval: &Interval) -> std::io::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t.\t{}",
        interval.contig(),
        interval.start(),
        interval.end(),
        interval.name().unwrap_or("."),
        interval.strand()
    )
}

////////////////////////////////////////////////////////////////////////////////////////
// Reference contigs
////////////////////////////////////////////////////////////////////////////////////////

/// Arguments describing the reference and how records are loaded against it.
#[derive(clap::Args, Debug)]
struct ReferenceArgs {
    /// A file listing the reference contigs in order (the first column of each
    /// line is used, so a `chrom.sizes` file works).
    #[arg(long)]
    contigs: Option<PathBuf>,

    /// When `--contigs` is not provided, only contigs matching this pattern
    /// are kept (in the order they are first seen).
    #[arg(long, default_value = CANONICAL_PATTERN)]
    contig_pattern: String,

    /// Fail on the first malformed record instead of dropping it.
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Exposes a numeric BED column as a covariate (e.g., `psi=7`).
    #[arg(long = "covariate-column", value_name = "NAME=COLUMN")]
    covariate_columns: Vec<CovariateColumn>,
}

impl ReferenceArgs {
    /// Gets the interval set construction mode.
    fn mode(&self) -> Mode {
        match self.strict {
            true => Mode::Strict,
            false => Mode::Lenient,
        }
    }

    /// Resolves the reference contigs, either from the contigs file or from
    /// the contigs seen in `records`.
    fn contigs<'a>(
        &self,
        records: impl IntoIterator<Item = &'a interval::Builder>,
    ) -> Result<Contigs> {
        match &self.contigs {
            Some(path) => {
                let file =
                    File::open(path).with_context(|| format!("opening {}", path.display()))?;

                let mut names = Vec::new();

                for line in BufReader::new(file).lines() {
                    let line = line.context("reading contigs file")?;

                    if let Some(name) = line.split_whitespace().next() {
                        names.push(name.to_string());
                    }
                }

                Contigs::try_new(names).context("creating reference contigs")
            }
            None => {
                let pattern =
                    Regex::new(&self.contig_pattern).context("compiling the contig pattern")?;

                Contigs::try_from_matching(
                    records.into_iter().filter_map(|record| record.contig_name()),
                    &pattern,
                )
                .context("deriving reference contigs from the input records")
            }
        }
    }

    /// Builds an interval set from raw records.
    fn build(&self, contigs: &Contigs, records: Vec<interval::Builder>) -> Result<IntervalSet> {
        IntervalSet::builder(contigs.clone())
            .mode(self.mode())
            .try_build_from(records)
            .context("building interval set")
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Filtering
////////////////////////////////////////////////////////////////////////////////////////

/// Arguments for the `filter` subcommand.
#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// The BED file to filter.
    query: PathBuf,

    /// The BED file of exclusion regions (e.g., a blacklist).
    exclude: PathBuf,

    /// Keep the intervals that overlap no exclusion region (rather than those
    /// that overlap at least one).
    #[arg(short, long, default_value_t = false)]
    invert: bool,

    /// Require compatible strands for an overlap.
    #[arg(long, default_value_t = false)]
    strand_aware: bool,

    /// Merge the exclusion regions before filtering.
    #[arg(long, default_value_t = false)]
    merge: bool,

    #[command(flatten)]
    reference: ReferenceArgs,
}

/// Runs the `filter` subcommand.
fn filter(args: FilterArgs) -> Result<()> {
    let columns = &args.reference.covariate_columns;
    let query = read_bed_file(&args.query, columns)?;
    let exclude = read_bed_file(&args.exclude, columns)?;

    let contigs = args.reference.contigs(query.iter().chain(exclude.iter()))?;
    info!("reference: {} contig(s)", contigs.len());

    let query = args.reference.build(&contigs, query)?;
    let exclude = args.reference.build(&contigs, exclude)?;

    let result = Filter::default()
        .invert(args.invert)
        .strand_aware(args.strand_aware)
        .merge_exclude(args.merge)
        .apply(&query, &exclude);

    info!("retained {} of {} interval(s)", result.len(), query.len());

    let mut out = BufWriter::new(std::io::stdout().lock());

    for interval in &result {
        write_bed_line(&mut out, interval).context("writing filtered intervals")?;
    }

    out.flush().context("flushing output")?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////
// Matching
////////////////////////////////////////////////////////////////////////////////////////

/// Arguments for the `match` subcommand.
#[derive(clap::Args, Debug)]
struct MatchArgs {
    /// The BED file of focal intervals.
    focal: PathBuf,

    /// The BED file of candidate pool intervals.
    pool: PathBuf,

    /// The covariate to match on (e.g., `length`, `score`, or a name given to
    /// `--covariate-column`).
    #[arg(short, long)]
    covariate: String,

    /// The matching method.
    #[arg(short, long, default_value_t = Method::Stratified)]
    method: Method,

    /// Sample without replacement.
    #[arg(long, default_value_t = false)]
    no_replace: bool,

    /// The seed for the random number generator.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// The number of covariate bins.
    #[arg(long, conflicts_with = "bin_width")]
    bins: Option<usize>,

    /// The width of each covariate bin.
    #[arg(long)]
    bin_width: Option<f64>,

    /// The maximum number of draws per focal interval (rejection only).
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,

    /// If desired, a BED file to which unmatched focal intervals are written.
    #[arg(long)]
    unmatched: Option<PathBuf>,

    /// Print a summary of the covariate distributions to stderr.
    #[arg(long, default_value_t = false)]
    overview: bool,

    #[command(flatten)]
    reference: ReferenceArgs,
}

impl MatchArgs {
    /// Gets the requested binning.
    fn binning(&self) -> Binning {
        match (self.bins, self.bin_width) {
            (Some(count), _) => Binning::Count(count),
            (None, Some(width)) => Binning::Width(width),
            (None, None) => Binning::default(),
        }
    }
}

/// A row of the rendered overview table.
#[derive(Tabled)]
struct OverviewRow {
    /// The set name.
    set: &'static str,

    /// The number of values.
    n: usize,

    /// The mean.
    mean: String,

    /// The sample standard deviation.
    sd: String,

    /// The minimum.
    min: String,

    /// The median.
    median: String,

    /// The maximum.
    max: String,
}

/// Renders an overview as a table.
fn render_overview(overview: &Overview) -> String {
    /// Renders an optional statistic.
    fn stat(value: Option<f64>) -> String {
        value
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| String::from("-"))
    }

    let rows = overview.rows().map(|(set, summary)| OverviewRow {
        set,
        n: summary.n(),
        mean: stat(summary.mean()),
        sd: stat(summary.sd()),
        min: stat(summary.min()),
        median: stat(summary.median()),
        max: stat(summary.max()),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

/// Writes the matched pairs as tab-delimited lines.
fn write_pairs(out: &mut impl Write, result: &MatchResult) -> std::io::Result<()> {
    let covariate = result.covariate();
    let value = |interval: &Interval| {
        interval
            .covariate(covariate)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| String::from("."))
    };

    for pair in result.pairs() {
        let (focal, matched) = (pair.focal(), pair.matched());

        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            focal.contig(),
            focal.start(),
            focal.end(),
            focal.name().unwrap_or("."),
            value(focal),
            matched.contig(),
            matched.start(),
            matched.end(),
            matched.name().unwrap_or("."),
            value(matched),
        )?;
    }

    Ok(())
}

/// Runs the `match` subcommand.
fn run_match(args: MatchArgs) -> Result<()> {
    let matcher = matcher::Builder::default()
        .method(args.method)
        .replace(!args.no_replace)
        .seed(args.seed)
        .binning(args.binning())
        .max_attempts(args.max_attempts)
        .try_build()
        .context("configuring the matcher")?;

    let columns = &args.reference.covariate_columns;
    let focal = read_bed_file(&args.focal, columns)?;
    let pool = read_bed_file(&args.pool, columns)?;

    let contigs = args.reference.contigs(focal.iter().chain(pool.iter()))?;
    info!("reference: {} contig(s)", contigs.len());

    let focal = args.reference.build(&contigs, focal)?;
    let pool = args.reference.build(&contigs, pool)?;

    if focal.is_empty() {
        bail!("no focal intervals remain after loading {}", args.focal.display());
    }

    let result = matcher
        .run(&focal, &pool, &args.covariate)
        .with_context(|| format!("matching on `{}`", args.covariate))?;

    info!(
        "matched {} of {} focal interval(s) using the {} method",
        result.pairs().len(),
        focal.len(),
        result.method()
    );

    let mut out = BufWriter::new(std::io::stdout().lock());
    write_pairs(&mut out, &result).context("writing matched pairs")?;
    out.flush().context("flushing output")?;

    if let Some(path) = &args.unmatched {
        let mut file = BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        );

        for entry in result.unmatched() {
            write_bed_line(&mut file, entry.interval()).context("writing unmatched intervals")?;
        }

        file.flush().context("flushing unmatched intervals")?;
    } else if !result.is_complete() {
        warn!("use `--unmatched` to write the unmatched focal intervals to a file");
    }

    if args.overview {
        eprintln!("{}", render_overview(&result.overview()));
    }

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

/// The available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Filters a BED file against a BED file of exclusion regions.
    Filter(FilterArgs),

    /// Draws a covariate-matched control set from a pool BED file.
    Match(MatchArgs),
}

/// Filters genomic intervals and draws covariate-matched control sets.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    match args.command {
        Command::Filter(args) => filter(args),
        Command::Match(args) => run_match(args),
    }
}

#[cfg(test)]
mod tests {
    use rangematch::Strand;

    use super::*;

    #[test]
    fn covariate_column() {
        let column = "psi=7".parse::<CovariateColumn>().unwrap();
        assert_eq!(column.name, "psi");
        assert_eq!(column.column, 7);

        assert!("psi".parse::<CovariateColumn>().is_err());
        assert!("=7".parse::<CovariateColumn>().is_err());
        assert!("psi=x".parse::<CovariateColumn>().is_err());
        assert!("psi=2".parse::<CovariateColumn>().is_err());
    }

    #[test]
    fn skipped_lines() {
        for line in ["", "   ", "# comment", "track name=peaks", "browser position chr1"] {
            assert!(parse_bed_line(line, &[]).is_none());
        }
    }

    #[test]
    fn bed6_line() {
        let columns = vec!["psi=7".parse::<CovariateColumn>().unwrap()];
        let interval = parse_bed_line("chr1\t100\t250\tpeak1\t17.5\t-\t0.25", &columns)
            .unwrap()
            .try_build()
            .unwrap();

        assert_eq!(interval.to_string(), "chr1:100-250:-");
        assert_eq!(interval.name(), Some("peak1"));
        assert_eq!(interval.strand(), Strand::Negative);
        assert_eq!(interval.covariate("length").unwrap(), 150.0);
        assert_eq!(interval.covariate("score").unwrap(), 17.5);
        assert_eq!(interval.covariate("psi").unwrap(), 0.25);
    }

    #[test]
    fn malformed_line_is_left_to_the_builder() {
        let record = parse_bed_line("chr1\tabc\t250", &[]).unwrap();
        assert_eq!(record.contig_name(), Some("chr1"));
        assert!(record.try_build().is_err());

        let record = parse_bed_line("chr1\t300\t250", &[]).unwrap();
        assert!(record.try_build().is_err());
    }

    #[test]
    fn overview_table() {
        let contigs = Contigs::try_new(["chr1"]).unwrap();
        let set = IntervalSet::from_intervals(
            contigs,
            vec![Interval::try_new("chr1", 0, 10)
                .unwrap()
                .try_with_covariate("length", 10.0)
                .unwrap()],
        );

        let result = matcher::match_intervals(&set, &set, "length", Method::Nearest, true, 0)
            .unwrap();
        let table = render_overview(&result.overview());

        assert!(table.contains("matched"));
        assert!(table.contains("10.00"));
    }
}
