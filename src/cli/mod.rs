//! # CLI Module
//!
//! Command-line interface for the pixel duplicate finder.
//!
//! ## Usage
//! ```bash
//! # Fingerprint two folders into ImageHashes-0.txt and ImageHashes-1.txt
//! pixel-dupes hash ~/Photos /mnt/backup/Photos -R
//!
//! # Only JPEG and PNG files
//! pixel-dupes hash ~/Photos -R --filter '*.jpg!*.png'
//!
//! # Duplicates between the two lists, written to Duplicates.txt
//! pixel-dupes compare ImageHashes-0.txt ImageHashes-1.txt --search-mode listexclusive
//!
//! # JSON output
//! pixel-dupes compare ImageHashes-0.txt --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use pixel_dupes::core::comparator::{MatchOptions, MatchSummary, SearchMode};
use pixel_dupes::core::hashlist::{read_hash_list, HashList};
use pixel_dupes::core::pipeline::{
    hash_list_file_name, CompareTask, CompareTaskResult, HashTask, HashTaskResult, ScanConfig,
};
use pixel_dupes::core::reporter::{export_json_file, GroupReport, DEFAULT_REPORT_FILE};
use pixel_dupes::core::scanner::FilenamePattern;
use pixel_dupes::error::{PixelDupesError, ReportError, Result};
use pixel_dupes::events::{Event, EventChannel, EventReceiver, ProgressEvent, ScanEvent};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Pixel Dupes - Find images with identical pixels
#[derive(Parser, Debug)]
#[command(name = "pixel-dupes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fingerprint images below root folders into hash lists
    Hash {
        /// Root folders, one hash list each
        #[arg(required = true)]
        roots: Vec<String>,

        /// Descend into subfolders
        #[arg(short = 'R', long)]
        recursive: bool,

        /// Filename filter: `*` matches anything, `!` separates alternatives
        #[arg(short, long)]
        filter: Option<String>,

        /// Directory the ImageHashes-<n>.txt files are written to
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Search hash lists for duplicates
    Compare {
        /// Hash list files
        #[arg(required = true)]
        lists: Vec<PathBuf>,

        /// normal, inclusive, exclusive, listinclusive or listexclusive
        #[arg(short = 'm', long, default_value = "normal")]
        search_mode: String,

        /// Report one line per entry instead of one block per group
        #[arg(long)]
        reverse: bool,

        /// With --reverse, only report entries without duplicates
        #[arg(long = "no-dups")]
        no_duplicates: bool,

        /// Also require equal file names
        #[arg(long)]
        filenames: bool,

        /// Report folders instead of files
        #[arg(long)]
        folders_only: bool,

        /// Root folder stripped before comparing folders (repeatable)
        #[arg(long = "baseline")]
        baselines: Vec<String>,

        /// Report file
        #[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
        report: PathBuf,

        /// Also export the groups as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash {
            roots,
            recursive,
            filter,
            output_dir,
            output,
            verbose,
        } => run_hash(roots, recursive, filter, output_dir, output, verbose),
        Commands::Compare {
            lists,
            search_mode,
            reverse,
            no_duplicates,
            filenames,
            folders_only,
            baselines,
            report,
            json,
            output,
        } => {
            let options = MatchOptions::new()
                .search_mode(search_mode.parse::<SearchMode>()?)
                .reverse(reverse)
                .no_duplicates(no_duplicates)
                .compare_filenames(filenames)
                .folders_only(folders_only)
                .baseline_folders(baselines);
            run_compare(lists, options, report, json, output)
        }
    }
}

/// Give a root its trailing separator; an empty root means the current folder
fn normalize_root(root: &str) -> String {
    if root.is_empty() {
        format!(".{}", MAIN_SEPARATOR)
    } else if root.ends_with(['/', '\\']) {
        root.to_string()
    } else {
        format!("{}{}", root, MAIN_SEPARATOR)
    }
}

fn run_hash(
    roots: Vec<String>,
    recursive: bool,
    filter: Option<String>,
    output_dir: PathBuf,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();
    let pretty = matches!(output, OutputFormat::Pretty);

    if pretty {
        print_banner(&term);
    }

    let pattern = match filter {
        Some(filter) => FilenamePattern::from_filter(&filter)?,
        None => FilenamePattern::default(),
    };
    let config = ScanConfig::new()
        .roots(roots.iter().map(|root| normalize_root(root)).collect())
        .pattern(pattern)
        .recursive(recursive);

    let task = HashTask::builder()
        .scan_config(&config)
        .output_dir(output_dir)
        .build();

    let (sender, receiver) = EventChannel::new();
    let progress = pretty.then(progress_bar);
    let event_thread = spawn_event_thread(receiver, progress, verbose);

    let result = task.spawn(sender).join();
    event_thread.join().ok();

    match output {
        OutputFormat::Pretty => print_hash_results(&term, &result),
        OutputFormat::Json => print_json(&serde_json::json!({
            "lists": result.lists.iter().map(|list| serde_json::json!({
                "root": list.root_folder(),
                "entries": list.len(),
            })).collect::<Vec<_>>(),
            "written": result.written,
            "skipped": result.scan.skipped.len(),
            "errors": result.scan.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "cancelled": result.cancelled(),
        }))?,
    }

    Ok(())
}

fn run_compare(
    paths: Vec<PathBuf>,
    options: MatchOptions,
    report: PathBuf,
    json: Option<PathBuf>,
    output: OutputFormat,
) -> Result<()> {
    let term = Term::stderr();
    let pretty = matches!(output, OutputFormat::Pretty);

    if pretty {
        print_banner(&term);
    }

    let lists = paths
        .iter()
        .map(|path| read_hash_list(path))
        .collect::<std::result::Result<Vec<HashList>, _>>()?;
    let baselines = options.baseline_folders.clone();

    let task = CompareTask::builder()
        .lists(lists)
        .options(options)
        .report_path(&report)
        .build();

    let (sender, receiver) = EventChannel::new();
    let progress = pretty.then(progress_bar);
    let event_thread = spawn_event_thread(receiver, progress, false);

    let result = task.spawn(sender).join();
    event_thread.join().ok();

    if let Some(path) = &json {
        export_json_file(path, &result.outcome.groups, &baselines)?;
    }

    match output {
        OutputFormat::Pretty => print_compare_results(&term, &result, &report),
        OutputFormat::Json => {
            let groups: Vec<GroupReport> = result
                .outcome
                .groups
                .iter()
                .map(|group| GroupReport::new(group, &baselines))
                .collect();
            print_json(&serde_json::json!({
                "summary": result.summary,
                "report": report,
                "groups": groups,
            }))?;
        }
    }

    match result.report_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn print_banner(term: &Term) {
    term.write_line(&format!(
        "{} {}",
        style("Pixel Dupes").bold().cyan(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    term.write_line("").ok();
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(bar_style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(bar_style.progress_chars("█▓░"));
    }
    pb
}

/// Drive the progress bar from engine events until the sender is dropped
fn spawn_event_thread(
    receiver: EventReceiver,
    progress: Option<ProgressBar>,
    verbose: bool,
) -> JoinHandle<()> {
    thread::spawn(move || {
        for event in receiver.iter() {
            let Some(pb) = progress.as_ref() else {
                continue;
            };

            match event {
                Event::Progress(ProgressEvent::PhaseChanged { text }) => pb.set_message(text),
                Event::Progress(ProgressEvent::Indeterminate { enabled: true }) => {
                    pb.enable_steady_tick(Duration::from_millis(100));
                }
                Event::Progress(ProgressEvent::Indeterminate { enabled: false }) => {
                    pb.disable_steady_tick();
                }
                Event::Progress(ProgressEvent::Bounds { min, max, value }) => {
                    pb.set_length(max.saturating_sub(min) as u64);
                    pb.set_position(value.saturating_sub(min) as u64);
                }
                Event::Progress(ProgressEvent::Value { value }) => pb.set_position(value as u64),
                Event::Progress(ProgressEvent::Incremented) => pb.inc(1),
                Event::Progress(ProgressEvent::Completed) => pb.finish_and_clear(),
                Event::Scan(ScanEvent::RootMissing { root }) => {
                    pb.println(format!(
                        "  {} Folder does not exist: {}",
                        style("!").red().bold(),
                        root.display()
                    ));
                }
                Event::Scan(ScanEvent::FileSkipped { message, .. }) if verbose => {
                    pb.println(format!("  {} {}", style("○").dim(), message));
                }
                _ => {}
            }
        }
    })
}

/// File the list at `index` was saved to, if it was
fn saved_list_path(result: &HashTaskResult, index: usize) -> Option<&Path> {
    let name = hash_list_file_name(index);
    result
        .written
        .iter()
        .map(PathBuf::as_path)
        .find(|path| path.file_name().is_some_and(|file| file == name.as_str()))
}

fn print_hash_results(term: &Term, result: &HashTaskResult) {
    term.write_line(&format!("{} Hashing Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    for (index, list) in result.lists.iter().enumerate() {
        let saved = match saved_list_path(result, index) {
            Some(path) => style(path.display().to_string()).yellow(),
            None => style("not saved".to_string()).red(),
        };
        term.write_line(&format!(
            "  {} images in {} → {}",
            style(list.len()).cyan(),
            list.root_folder(),
            saved
        ))
        .ok();
    }

    if !result.scan.skipped.is_empty() {
        term.write_line(&format!(
            "  {} files could not be fingerprinted",
            style(result.scan.skipped.len()).red()
        ))
        .ok();
    }

    for error in &result.scan.errors {
        term.write_line(&format!("  {} {}", style("!").red().bold(), error))
            .ok();
    }

    for error in &result.write_errors {
        term.write_line(&format!("  {} {}", style("!").red().bold(), error))
            .ok();
    }

    if result.cancelled() {
        term.write_line(&format!(
            "  {}",
            style("Cancelled, hash lists were not saved.").yellow()
        ))
        .ok();
    }
}

fn print_compare_results(term: &Term, result: &CompareTaskResult, report: &Path) {
    let MatchSummary {
        lists,
        entries,
        groups,
        duplicate_files,
        cancelled,
    } = result.summary;

    term.write_line(&format!("{} Search Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();
    term.write_line(&format!(
        "  {} entries in {} hash lists",
        style(entries).cyan(),
        style(lists).cyan()
    ))
    .ok();
    term.write_line(&format!("  {} groups reported", style(groups).cyan()))
        .ok();
    term.write_line(&format!(
        "  {} duplicate files",
        style(duplicate_files).cyan()
    ))
    .ok();

    if cancelled {
        term.write_line(&format!("  {}", style("Cancelled, results are incomplete.").yellow()))
            .ok();
    }

    if result.report_error.is_none() {
        term.write_line("").ok();
        term.write_line(&format!(
            "  Report written to {}",
            style(report.display()).yellow()
        ))
        .ok();
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| PixelDupesError::Report(ReportError::Serialization(e.to_string())))?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_get_a_trailing_separator() {
        assert_eq!(normalize_root("/photos"), format!("/photos{}", MAIN_SEPARATOR));
        assert_eq!(normalize_root("/photos/"), "/photos/");
        assert_eq!(normalize_root(r"C:\photos\"), r"C:\photos\");
        assert_eq!(normalize_root(""), format!(".{}", MAIN_SEPARATOR));
    }

    #[test]
    fn saved_paths_follow_list_index_after_a_failed_write() {
        let result = HashTaskResult {
            lists: vec![
                HashList::new("/one/", ".*", true),
                HashList::new("/two/", ".*", true),
            ],
            scan: Default::default(),
            written: vec![PathBuf::from("out/ImageHashes-1.txt")],
            write_errors: Vec::new(),
        };

        assert_eq!(saved_list_path(&result, 0), None);
        assert_eq!(
            saved_list_path(&result, 1),
            Some(Path::new("out/ImageHashes-1.txt"))
        );
    }

    #[test]
    fn cli_parses_compare_flags() {
        let cli = Cli::try_parse_from([
            "pixel-dupes",
            "compare",
            "a.txt",
            "b.txt",
            "--search-mode",
            "listexclusive",
            "--reverse",
            "--no-dups",
            "--baseline",
            "/one",
            "--baseline",
            "/two",
        ])
        .unwrap();

        match cli.command {
            Commands::Compare {
                lists,
                search_mode,
                reverse,
                no_duplicates,
                baselines,
                report,
                ..
            } => {
                assert_eq!(lists.len(), 2);
                assert_eq!(search_mode, "listexclusive");
                assert!(reverse && no_duplicates);
                assert_eq!(baselines, vec!["/one", "/two"]);
                assert_eq!(report, PathBuf::from("Duplicates.txt"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn cli_parses_hash_flags() {
        let cli =
            Cli::try_parse_from(["pixel-dupes", "hash", "/photos", "-R", "--filter", "*.png"])
                .unwrap();

        match cli.command {
            Commands::Hash {
                roots,
                recursive,
                filter,
                output_dir,
                ..
            } => {
                assert_eq!(roots, vec!["/photos"]);
                assert!(recursive);
                assert_eq!(filter.as_deref(), Some("*.png"));
                assert_eq!(output_dir, PathBuf::from("."));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
