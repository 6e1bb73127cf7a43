//! Command-line entry point for taskscan.
//!
//! # Responsibility
//! - Parse arguments and wire sources, sinks and config into core services.
//! - Print run summaries and suggestions to stdout.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use taskscan_core::repo::record_repo::DEFAULT_SUGGESTION_LIMIT;
use taskscan_core::{
    default_log_level, init_logging, open_db, ExtractionService, ExtractorConfig, Layout,
    PageSource, RunReport, SinkSet, SqliteRecordRepository, TextPages, XlsxTableWriter,
};

#[derive(Parser)]
#[command(name = "taskscan")]
#[command(about = "Extract maintenance-task records from manual text", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract task records from a document
    Extract {
        /// Text dump (pages separated by form feeds) or, with --pdf, a PDF file
        input: PathBuf,

        /// Output layout: tddm, tddim, tdmplm or tdmplmd
        #[arg(short, long)]
        layout: Option<Layout>,

        /// Read the input as PDF
        #[arg(long)]
        pdf: bool,

        /// Append records to this SQLite database
        #[arg(long)]
        db: Option<PathBuf>,

        /// Export records to this .xlsx workbook
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// JSON extractor config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Lines of context per task anchor
        #[arg(short, long)]
        window: Option<usize>,

        /// Write rolling logs into this absolute directory
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Log level: trace, debug, info, warn or error
        #[arg(long)]
        log_level: Option<String>,
    },
    /// Suggest previously stored values for a column
    Suggest {
        /// Text to look for inside stored values
        partial: String,

        /// SQLite database written by `extract --db`
        #[arg(long)]
        db: PathBuf,

        /// Column heading (e.g. "MP/N") or storage name (e.g. mpn)
        #[arg(short, long)]
        column: String,

        /// Maximum number of suggestions
        #[arg(long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
        limit: u32,
    },
    /// List output layouts and their columns
    Layouts,
}

struct ExtractArgs {
    input: PathBuf,
    layout: Option<Layout>,
    pdf: bool,
    db: Option<PathBuf>,
    xlsx: Option<PathBuf>,
    config: Option<PathBuf>,
    window: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            layout,
            pdf,
            db,
            xlsx,
            config,
            window,
            log_dir,
            log_level,
        } => {
            if let Some(dir) = log_dir {
                let level = log_level.as_deref().unwrap_or(default_log_level());
                init_logging(level, &dir).context("cannot start logging")?;
            }
            run_extract(ExtractArgs {
                input,
                layout,
                pdf,
                db,
                xlsx,
                config,
                window,
            })?;
        }
        Commands::Suggest {
            partial,
            db,
            column,
            limit,
        } => {
            let conn = open_db(&db)
                .with_context(|| format!("cannot open database {}", db.display()))?;
            let repo = SqliteRecordRepository::new(&conn);
            for value in repo.suggest(&column, &partial, limit)? {
                println!("{value}");
            }
        }
        Commands::Layouts => {
            for layout in Layout::ALL {
                println!("{layout}\t{}\t{}", layout.title(), layout.headers().join(", "));
            }
        }
    }

    Ok(())
}

fn run_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ExtractorConfig::from_json_file(path)?,
        None => ExtractorConfig::default(),
    };
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    if let Some(window) = args.window {
        config.window_size = window;
    }
    config.validate()?;

    let source = page_source(&args.input, args.pdf)?;

    let conn = args
        .db
        .as_ref()
        .map(|path| {
            open_db(path).with_context(|| format!("cannot open database {}", path.display()))
        })
        .transpose()?;
    let repo = conn.as_ref().map(SqliteRecordRepository::new);
    let writer = XlsxTableWriter::new(config.layout);

    let mut sinks = SinkSet::new();
    if let Some(repo) = &repo {
        sinks = sinks.with_records(repo);
    }
    if let Some(path) = &args.xlsx {
        sinks = sinks.with_table(&writer, path);
    }

    let report = ExtractionService::new(&config)
        .run(source.as_ref(), &sinks)
        .with_context(|| format!("cannot read {}", args.input.display()))?;

    if sinks.is_empty() {
        print_rows(&report);
    }
    print_summary(&report);

    if !report.all_sinks_ok() {
        bail!("one or more outputs failed");
    }
    Ok(())
}

fn page_source(input: &Path, pdf: bool) -> anyhow::Result<Box<dyn PageSource>> {
    if !pdf {
        return Ok(Box::new(TextPages::from_file(input)));
    }

    #[cfg(feature = "pdf")]
    {
        Ok(Box::new(taskscan_core::source::PdfPages::new(input)))
    }
    #[cfg(not(feature = "pdf"))]
    {
        bail!(
            "cannot read {} as PDF: taskscan was built without the `pdf` feature",
            input.display()
        )
    }
}

fn print_rows(report: &RunReport) {
    println!("{}", report.layout.headers().join("\t"));
    for record in &report.records {
        println!("{}", report.layout.row_values(record).join("\t"));
    }
}

fn print_summary(report: &RunReport) {
    println!(
        "run_id={} layout={} pages={} anchors={} records={} duration_ms={}",
        report.run_id,
        report.layout,
        report.stats.pages,
        report.stats.anchors,
        report.records.len(),
        report.duration.as_millis()
    );
    for outcome in &report.sinks {
        match &outcome.result {
            Ok(rows) => println!("sink={} status=ok rows={rows}", outcome.kind.as_str()),
            Err(err) => println!("sink={} status=error error={err}", outcome.kind.as_str()),
        }
    }
}
