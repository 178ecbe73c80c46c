use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use robotlens_cli::{
    APP_NAME, ReportOptions, Source, build_output_path, build_report, render_json, render_text,
};
use robotlens_core::{RobotsDirectiveParser, fetch_robots_txt, normalize_line_endings, robots_url};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = APP_NAME,
    version,
    about = "robotlens — see robots.txt the way crawlers do",
    after_help = "Developed by Pon Datalab"
)]
struct Cli {
    /// robots.txt file, `-` for stdin, or a site URL
    source: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// User agent for --path
    #[arg(long, requires = "path")]
    agent: Option<String>,

    /// Check whether this path is allowed for --agent
    #[arg(long, requires = "agent")]
    path: Option<String>,

    /// Include the AI crawler access table
    #[arg(long)]
    ai_crawlers: bool,

    /// Exit with status 2 when the document has errors
    #[arg(long)]
    strict: bool,

    /// Sales channel id handed to parser hooks
    #[arg(long)]
    channel: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Also write the report to a file or directory
    #[arg(short, long, value_name = "PATH")]
    save: Option<PathBuf>,
}

struct Loaded {
    content: String,
    status_code: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let source = Source::classify(&cli.source);
    let loaded = load(&source).await?;
    let content = normalize_line_endings(&loaded.content);

    let parser = RobotsDirectiveParser::<Source>::new().on_unknown_directive(|event| {
        debug!(
            source = %event.context().label(),
            line = event.line_number(),
            directive = event.directive(),
            "unknown robots.txt directive"
        );
    });
    let parsed = parser.parse(&content, &source, cli.channel.as_deref());

    let options = ReportOptions {
        ai_crawlers: cli.ai_crawlers,
        path_check: cli.agent.clone().zip(cli.path.clone()),
        status_code: loaded.status_code,
    };
    let report = build_report(&source.label(), parsed, &options);

    let (output, extension) = match cli.format {
        OutputFormat::Text => (render_text(&report), "md"),
        OutputFormat::Json => (render_json(&report)? + "\n", "json"),
    };

    print!("{}", output);

    if let Some(save_base) = cli.save.as_ref() {
        let output_path = build_output_path(save_base, &source, extension);
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory {}", parent.display())
            })?;
        }

        fs::write(&output_path, output.as_bytes())
            .with_context(|| format!("failed to write output file {}", output_path.display()))?;

        eprintln!("Wrote output to {}", output_path.display());
    }

    if cli.strict && report.parsed.has_errors() {
        info!(errors = report.parsed.errors().len(), "strict mode: document has errors");
        return Ok(ExitCode::from(2));
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(level: &str) -> Result<()> {
    let filter = match env::var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(level).with_context(|| format!("invalid log level: {level}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))
}

async fn load(source: &Source) -> Result<Loaded> {
    match source {
        Source::Stdin => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("failed to read robots.txt from stdin")?;
            Ok(Loaded {
                content,
                status_code: None,
            })
        }
        Source::File(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(Loaded {
                content,
                status_code: None,
            })
        }
        Source::Url(raw) => {
            let url = match Url::parse(raw) {
                Ok(url) if url.path().eq_ignore_ascii_case("/robots.txt") => url,
                _ => robots_url(raw)?,
            };

            let fetched = fetch_robots_txt(&url).await?;
            if !fetched.found {
                eprintln!(
                    "No robots.txt at {} (HTTP {}), treating as empty",
                    fetched.url, fetched.status_code
                );
            }

            Ok(Loaded {
                content: fetched.content,
                status_code: Some(fetched.status_code),
            })
        }
    }
}
