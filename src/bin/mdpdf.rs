use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use mdpdf::convert::DEFAULT_HTML;
use mdpdf::convert::DEFAULT_PDF;
use mdpdf::convert::DEFAULT_SOURCE;
use mdpdf::markdown::Gfm;
use mdpdf::render::with_chrome::WithChrome;
use mdpdf::template::DEFAULT_TITLE;
use mdpdf::ConvertPaths;
use mdpdf::Converter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mdpdf")]
#[command(about = "Convert a markdown document to a styled PDF, or to HTML when no PDF renderer is available")]
#[command(version = "0.1.0")]
struct Cli {
    /// Markdown file to convert
    #[arg(short, long, default_value = DEFAULT_SOURCE)]
    input: PathBuf,

    /// Where the PDF is written
    #[arg(long, default_value = DEFAULT_PDF)]
    pdf: PathBuf,

    /// Where the HTML fallback is written
    #[arg(long, default_value = DEFAULT_HTML)]
    html: PathBuf,

    /// Document title
    #[arg(short, long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Chrome/Chromium executable, searched for when not given
    #[arg(long)]
    chrome: Option<PathBuf>,

    /// Exit with status 1 when neither the PDF nor the HTML could be written
    #[arg(long)]
    strict_exit: bool,

    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let paths = ConvertPaths {
        source: cli.input,
        pdf: cli.pdf,
        html: cli.html,
    };

    let chrome = match cli.chrome {
        Some(path) => WithChrome::with_executable(path),
        None => WithChrome::new(),
    };

    let converter = Converter::with_renderers(paths, Gfm, chrome).title(cli.title);
    let report = converter.run().await;

    // Failures were already printed; the exit status stays 0 unless asked.
    if cli.strict_exit && !report.succeeded() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
