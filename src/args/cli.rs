use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_header, parse_positive_u64, parse_positive_usize};
use super::types::{HttpMethod, OutputFormat, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async HTTP load tester: sends a fixed number of requests through a bounded worker pool and reports latency and status statistics."
)]
pub struct TesterArgs {
    /// Target URL for the load test
    #[arg(long, short)]
    pub url: Option<String>,

    /// Total number of requests to send
    #[arg(
        long,
        short = 'n',
        default_value = "100",
        value_parser = parse_positive_u64
    )]
    pub requests: PositiveU64,

    /// Number of concurrent workers (clamped to --requests)
    #[arg(
        long,
        short = 'c',
        default_value = "10",
        value_parser = parse_positive_usize
    )]
    pub concurrency: PositiveUsize,

    /// Timeout per request (supports ms/s/m/h, bare numbers are seconds)
    #[arg(
        long = "timeout",
        short = 't',
        default_value = "30s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// HTTP header in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// HTTP headers as a list in 'key1:value1,key2:value2' format
    #[arg(long = "headers")]
    pub header_list: Option<String>,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Request body data
    #[arg(long, short)]
    pub data: Option<String>,

    /// Keep per-request error details for the report and enable debug logs
    #[arg(long, short)]
    pub verbose: bool,

    /// Report format
    #[arg(long = "output-format", default_value = "text", ignore_case = true)]
    pub output_format: OutputFormat,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Path to a TOML or JSON config file (defaults to ./volley.toml or ./volley.json)
    #[arg(long)]
    pub config: Option<String>,
}
