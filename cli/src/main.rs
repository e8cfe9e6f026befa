use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tinyhttp_core::{http_get, GetOptions, OutputSink};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tinyhttp")]
#[command(about = "Fetch a URL with a single HTTP/1.1 GET", long_about = None)]
struct Cli {
    /// Show response headers before the body
    #[arg(short = 'i')]
    show_headers: bool,

    /// Show only the response headers
    #[arg(short = 'I')]
    show_only_headers: bool,

    /// Extra request header, e.g. -H "Accept: text/plain" (repeatable)
    #[arg(short = 'H', value_name = "HEADER")]
    headers: Vec<String>,

    /// Write output to FILE instead of stdout
    #[arg(short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    url: String,
}

impl Cli {
    fn options(&self) -> GetOptions {
        GetOptions {
            show_headers: self.show_headers,
            show_only_headers: self.show_only_headers,
            custom_headers: self.headers.clone(),
            output_file: self.output.clone(),
        }
    }
}

fn main() -> ExitCode {
    // stdout may be the body sink, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tinyhttp=warn,tinyhttp_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let options = cli.options();

    let mut sink = match OutputSink::from_options(&options) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!(error = %e, "cannot open output");
            return ExitCode::FAILURE;
        }
    };

    match http_get(&cli.url, &options, &mut sink) {
        Ok(summary) => {
            tracing::debug!(
                chunked = summary.chunked,
                head_bytes = summary.head_bytes,
                body_bytes = ?summary.body_bytes,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(url = %cli.url, error = %e, "request failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_options() {
        let cli = Cli::parse_from([
            "tinyhttp",
            "-i",
            "-H",
            "Accept: text/plain, text/html",
            "-H",
            "X-Two: 2",
            "-o",
            "out.txt",
            "http://127.0.0.1:8080/",
        ]);
        let options = cli.options();
        assert!(options.show_headers);
        assert!(!options.show_only_headers);
        assert_eq!(
            options.custom_headers,
            vec!["Accept: text/plain, text/html", "X-Two: 2"]
        );
        assert_eq!(options.output_file, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.url, "http://127.0.0.1:8080/");
    }

    #[test]
    fn url_alone_is_body_to_stdout() {
        let cli = Cli::parse_from(["tinyhttp", "http://example.com"]);
        assert_eq!(cli.options(), GetOptions::default());
    }

    #[test]
    fn url_is_required() {
        assert!(Cli::try_parse_from(["tinyhttp", "-I"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
