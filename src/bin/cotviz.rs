//! Chain-of-thought visualizer CLI
//!
//! Usage:
//!   cotviz [--model <model>] [--ollama-url <url>] [--output <file>]
//!
//! Interactive loop: type a query to see the model's reasoning charted,
//! `quit` to exit.

use anyhow::Result;
use colored::Colorize;
use cotviz::pipeline::CotPipeline;
use cotviz::provider::OllamaProvider;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_MODEL: &str = "llama3:latest";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OUTPUT: &str = "chain_of_thought.html";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

fn print_usage() {
    eprintln!(
        r#"
{} - Visualize the reasoning stages of a local LLM

{}
    cotviz [OPTIONS]

{}
    -m, --model <MODEL>        Model to use (default: llama3:latest)
    -u, --ollama-url <URL>     Ollama server URL (default: http://localhost:11434)
    -o, --output <FILE>        Chart output file (default: chain_of_thought.html)
    --timeout <SECS>           Generation request timeout (default: 300)
    --no-open                  Write the chart file without opening a browser
    -h, --help                 Print this help message

{}
    Each query is sent to the model with instructions to narrate its
    reasoning. The narration is split into sentences, each classified as
    analysis, planning, research, synthesis, evaluation, problem solving,
    or general, and charted as a timeline plus a time-share pie.
"#,
        "Chain-of-Thought Visualizer".bold(),
        "USAGE:".bold(),
        "OPTIONS:".bold(),
        "HOW IT WORKS:".bold(),
    );
}

struct CliArgs {
    model: String,
    ollama_url: String,
    output: String,
    timeout_secs: u64,
    open_browser: bool,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        std::process::exit(0);
    }

    let mut model = DEFAULT_MODEL.to_string();
    let mut ollama_url = DEFAULT_OLLAMA_URL.to_string();
    let mut output = DEFAULT_OUTPUT.to_string();
    let mut timeout_secs = DEFAULT_TIMEOUT_SECS;
    let mut open_browser = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--model" | "-m" => {
                i += 1;
                if i < args.len() {
                    model = args[i].clone();
                }
            }
            "--ollama-url" | "-u" => {
                i += 1;
                if i < args.len() {
                    ollama_url = args[i].clone();
                }
            }
            "--output" | "-o" => {
                i += 1;
                if i < args.len() {
                    output = args[i].clone();
                }
            }
            "--timeout" => {
                i += 1;
                if i < args.len() {
                    timeout_secs = args[i].parse().unwrap_or(DEFAULT_TIMEOUT_SECS);
                }
            }
            "--no-open" => {
                open_browser = false;
            }
            _ => {}
        }
        i += 1;
    }

    CliArgs {
        model,
        ollama_url,
        output,
        timeout_secs,
        open_browser,
    }
}

fn print_banner(args: &CliArgs) {
    eprintln!();
    eprintln!(
        "{}",
        "╭──────────────────────────────────────────────────────────────╮".blue()
    );
    eprintln!(
        "{}  {}                       {}",
        "│".blue(),
        "Chain-of-Thought Visualizer".bold(),
        "│".blue()
    );
    eprintln!(
        "{}",
        "├──────────────────────────────────────────────────────────────┤".blue()
    );
    eprintln!(
        "{}  {}  {} (Ollama @ {})",
        "│".blue(),
        "Model:".dimmed(),
        args.model,
        args.ollama_url
    );
    eprintln!(
        "{}  {}  {}",
        "│".blue(),
        "Chart:".dimmed(),
        args.output
    );
    eprintln!(
        "{}",
        "╰──────────────────────────────────────────────────────────────╯".blue()
    );
    eprintln!();
    eprintln!("Enter queries to see the model's reasoning patterns.");
    eprintln!("Type {} to exit.", "'quit'".yellow());
    eprintln!();
}

async fn run_query(pipeline: &CotPipeline, query: &str, args: &CliArgs) -> Result<()> {
    eprintln!("{} {}", "🤔 Processing:".dimmed(), query);

    let analysis = pipeline.analyze(query).await?;
    eprintln!(
        "🧠 Identified {} thinking stages",
        analysis.stages.len().to_string().bold()
    );

    let html = analysis.figure.to_html("Chain-of-Thought Analysis")?;
    std::fs::write(&args.output, html)?;

    if args.open_browser {
        open::that(&args.output)?;
        eprintln!("📊 Visualization opened in browser");
    } else {
        eprintln!("📊 Visualization written to {}", args.output);
    }

    let preview: String = analysis.answer.chars().take(100).collect();
    let ellipsis = if analysis.answer.chars().count() > 100 {
        "..."
    } else {
        ""
    };
    println!("\n💡 Answer: {}{}", preview, ellipsis);
    println!("{}", "-".repeat(50).dimmed());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();

    let provider = OllamaProvider::with_timeout(
        &args.ollama_url,
        &args.model,
        Duration::from_secs(args.timeout_secs),
    );
    let pipeline = CotPipeline::new(Arc::new(provider));

    print_banner(&args);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", "Query: ".bold());
        std::io::stdout().flush()?;

        let query = match lines.next() {
            Some(line) => line?,
            None => break, // stdin closed
        };
        let query = query.trim();

        if matches!(query.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }

        if query.is_empty() {
            continue;
        }

        // Report and keep looping; a failed query never kills the session
        if let Err(e) = run_query(&pipeline, query, &args).await {
            eprintln!("{} {}", "❌ Error:".red().bold(), e);
        }
    }

    Ok(())
}
