use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use headline_lens::{
    annotate, build_prompt, coverage, finalize_analysis, parse_submission, score, summarize,
    AnnotatedSpan, CriterionResult, SurveySubmission, CATALOG,
};

#[derive(Parser)]
#[command(
    name = "headline-lens",
    about = "Annotate crash-news headlines and score criterion judgments",
    version
)]
struct Cli {
    /// Log filter (e.g. "debug", "headline_lens=trace"); falls back to RUST_LOG, then "warn"
    #[arg(long, global = true, env = "HEADLINE_LENS_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Highlight framing terms (reads stdin lines if no headline given)
    Annotate { headlines: Vec<String> },
    /// Show which characters of each headline are annotated
    Coverage { headlines: Vec<String> },
    /// Score a JSON array of criterion results
    Score { file: Option<String> },
    /// Finalize a raw analysis reply for a headline
    Finalize {
        #[arg(long)]
        headline: String,
        file: Option<String>,
    },
    /// Build the analysis request for a headline and its article body
    Prompt {
        #[arg(long)]
        headline: String,
        file: Option<String>,
    },
    /// Validate one survey submission
    Survey { file: Option<String> },
    /// Aggregate a JSON array of survey submissions
    Summary { file: Option<String> },
    /// List the built-in rule catalog
    Rules,
}

#[derive(Serialize)]
struct Annotated<'a> {
    headline: &'a str,
    spans: Vec<AnnotatedSpan>,
}

fn read_input(file: Option<&str>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}")),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("reading stdin")?;
            Ok(input)
        }
    }
}

fn headlines_or_stdin(headlines: Vec<String>) -> Result<Vec<String>> {
    if !headlines.is_empty() {
        return Ok(headlines);
    }
    Ok(read_input(None)?
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn log_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(log_filter(cli.log_level.as_deref()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Command::Annotate { headlines } => {
            for headline in headlines_or_stdin(headlines)? {
                let spans = annotate(&headline);
                info!(spans = spans.len(), "annotated {headline:?}");
                print_json(&Annotated {
                    headline: &headline,
                    spans,
                })?;
            }
        }
        Command::Coverage { headlines } => {
            for headline in headlines_or_stdin(headlines)? {
                print_json(&coverage(&headline))?;
            }
        }
        Command::Score { file } => {
            let input = read_input(file.as_deref())?;
            let results: Vec<CriterionResult> =
                serde_json::from_str(&input).context("parsing criterion results")?;
            let score = score(&results)?;
            print_json(&json!({ "score": score }))?;
        }
        Command::Finalize { headline, file } => {
            let input = read_input(file.as_deref())?;
            print_json(&finalize_analysis(&headline, &input)?)?;
        }
        Command::Prompt { headline, file } => {
            let body = read_input(file.as_deref())?;
            println!("{}", build_prompt(&headline, &body)?);
        }
        Command::Survey { file } => {
            let input = read_input(file.as_deref())?;
            let submission = parse_submission(&input)?;
            info!(session = %submission.session_id, "valid submission");
            print_json(&submission)?;
        }
        Command::Summary { file } => {
            let input = read_input(file.as_deref())?;
            let submissions: Vec<SurveySubmission> =
                serde_json::from_str(&input).context("parsing survey submissions")?;
            for (i, s) in submissions.iter().enumerate() {
                s.validate().with_context(|| format!("submission {i}"))?;
            }
            print_json(&summarize(&submissions))?;
        }
        Command::Rules => {
            let rules: Vec<_> = CATALOG
                .rules()
                .iter()
                .map(|r| {
                    json!({
                        "category": r.category,
                        "priority": r.priority(),
                        "explanation": r.explanation,
                        "patterns": r.patterns.len(),
                    })
                })
                .collect();
            print_json(&rules)?;
        }
    }
    Ok(())
}
