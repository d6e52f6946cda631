use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pagewalk_crawler::url_utils::extract_url_path;
use pagewalk_crawler::{
    CrawlController, CrawlEvent, CrawlSummary, EventCallback, FsStorage, HttpFetcher,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;
use url::Url;

/// Everything the crawl command needs, pulled out of the parsed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlArgs {
    pub seed_url: String,
    pub depth: u32,
    pub max_links: usize,
    pub output: PathBuf,
    pub quiet: bool,
    pub timeout_secs: u64,
    pub concurrency: usize,
    pub json: bool,
}

impl CrawlArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let raw_seed = matches
            .get_one::<String>("SEED_URL")
            .cloned()
            .unwrap_or_default();
        let output = matches
            .get_one::<String>("OUTPUT")
            .map(|o| expand_output_path(o))
            .unwrap_or_default();

        Self {
            seed_url: parse_url_line(raw_seed.trim()).unwrap_or(raw_seed),
            depth: matches.get_one::<u32>("DEPTH").copied().unwrap_or(2),
            max_links: matches.get_one::<usize>("MAX_LINKS").copied().unwrap_or(10),
            output,
            quiet: matches.get_flag("quiet"),
            timeout_secs: matches.get_one::<u64>("timeout").copied().unwrap_or(10),
            concurrency: matches.get_one::<usize>("concurrency").copied().unwrap_or(1),
            json: matches.get_flag("json"),
        }
    }
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    if let Ok(url) = Url::parse(line)
        && matches!(url.scheme(), "http" | "https")
    {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    if !line.is_empty() && Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    None
}

/// Expands a leading `~` in the output directory.
pub fn expand_output_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// One human-readable status line for an event.
pub fn format_event(event: &CrawlEvent) -> String {
    match event {
        CrawlEvent::Fetching { url, depth } => {
            format!("{} {} {}", "→".blue(), url, format!("(depth {})", depth).dimmed())
        }
        CrawlEvent::Saved { url, path } => format!(
            "{} {} {}",
            "✓".green().bold(),
            url,
            path.display().to_string().dimmed()
        ),
        CrawlEvent::FetchFailed { url, reason } => {
            format!("{} {} {}", "✗".red().bold(), url, reason.red())
        }
        CrawlEvent::NonSuccessStatus { url, status } => format!(
            "{} {} {}",
            "⚠".yellow().bold(),
            url,
            format!("status {}", status).yellow()
        ),
        CrawlEvent::StorageFailed { url, reason } => format!(
            "{} {} {}",
            "✗".red().bold(),
            url,
            format!("not saved: {}", reason).red()
        ),
        CrawlEvent::LinkSkipped { url, link, reason } => format!(
            "{} {} {}",
            "↷".dimmed(),
            url,
            format!("skipped '{}': {}", link, reason).dimmed()
        ),
        CrawlEvent::LinkCapReached { url, cap } => format!(
            "{} {} {}",
            "ℹ".blue(),
            url,
            format!("link cap of {} reached", cap).dimmed()
        ),
        CrawlEvent::BranchFailed { url, reason } => {
            format!("{} {} {}", "✗".red().bold(), url, reason.red())
        }
    }
}

fn print_divider(report: &mut String) {
    report.push_str(&"━".repeat(52));
    report.push_str("\n\n");
}

/// Generate a plain-text report for a finished run
pub fn generate_summary_report(summary: &CrawlSummary) -> String {
    let mut report = String::new();
    print_divider(&mut report);
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Seed: {}\n", summary.seed_url));
    report.push_str(&format!("  Start path: {}\n", extract_url_path(&summary.seed_url)));
    report.push_str(&format!("  Max depth: {}\n", summary.max_depth));
    report.push_str(&format!("  URLs visited: {}\n", summary.urls_visited));
    report.push_str(&format!("  Pages fetched: {}\n", summary.pages_fetched));
    report.push_str(&format!("  Pages saved: {}\n", summary.pages_saved));
    report.push_str(&format!("  Links skipped: {}\n", summary.links_skipped));
    report.push('\n');

    report.push_str("# Failures:\n");
    report.push_str(&format!("  Fetch failures: {}\n", summary.fetch_failures));
    report.push_str(&format!("  Non-success statuses: {}\n", summary.non_success_statuses));
    report.push_str(&format!("  Storage failures: {}\n", summary.storage_failures));
    report.push_str(&format!("  Failed branches: {}\n", summary.branch_failures));
    report.push('\n');

    report.push_str(&format!("  Elapsed: {:.2}s\n", summary.elapsed.as_secs_f64()));
    report
}

fn event_printer(progress: Option<ProgressBar>) -> EventCallback {
    Arc::new(move |event: &CrawlEvent| match progress {
        Some(ref pb) => {
            if let CrawlEvent::Fetching { url, .. } = event {
                pb.set_message(extract_url_path(url));
            } else if pb.is_hidden() {
                // No terminal to draw on, so println would drop the line
                eprintln!("{}", format_event(event));
            } else {
                pb.println(format_event(event));
            }
        }
        None => {
            if event.is_failure() {
                eprintln!("{}", format_event(event));
            }
        }
    })
}

/// Configure a controller from the arguments and run one crawl
pub async fn run_crawl(args: &CrawlArgs) -> anyhow::Result<CrawlSummary> {
    let progress = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(pb)
    };

    let fetcher = HttpFetcher::with_timeout(args.timeout_secs)?;
    let mut controller = CrawlController::new(fetcher, FsStorage::new())
        .with_concurrency(args.concurrency)
        .with_event_callback(event_printer(progress.clone()));

    let result = match controller.configure(&args.output, args.max_links) {
        Ok(()) => controller.crawl(&args.seed_url, args.depth).await,
        Err(e) => Err(e),
    };

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    result.with_context(|| format!("crawl of '{}' could not start", args.seed_url))
}

/// Runs the crawl command and returns the process exit code.
pub async fn handle_crawl(matches: &ArgMatches) -> i32 {
    let args = CrawlArgs::from_matches(matches);

    if !args.quiet && !args.json {
        println!("\n🕷️  Crawling {}", args.seed_url);
        println!("Max depth: {}", args.depth);
        println!("Links per page: {}", args.max_links);
        println!("Output: {}\n", args.output.display());
    }

    let summary = match run_crawl(&args).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{} {:#}", "✗".red().bold(), e);
            eprintln!("\n{} Crawl aborted", "✗".red().bold());
            return 1;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{} could not serialize summary: {}", "✗".red().bold(), e);
                return 1;
            }
        }
        eprintln!("✓ Crawl complete!");
    } else {
        println!("\n✓ Crawl complete!\n");
        print!("{}", generate_summary_report(&summary));
    }

    0
}
