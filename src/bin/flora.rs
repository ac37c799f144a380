//! flora: 对 Flora API 执行单个操作的命令行工具
//!
//! Usage:
//!   flora <base-uri> '<json-params>' [--default key=value]... [--timeout <secs>]
//!
//! Example:
//!   flora https://api.example.com/ '{"resource":"article","id":1,"select":"id,title"}'

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use flora_client::request::ApiRequest;
use flora_client::{FloraClient, OperationDescriptor, Payload};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

struct Args {
    base_uri: String,
    params: String,
    defaults: Vec<(String, String)>,
    timeout: Option<Duration>,
}

fn print_usage() {
    eprintln!(
        r#"flora: Flora API 命令行工具

USAGE:
    flora <BASE_URI> <JSON_PARAMS> [OPTIONS]

OPTIONS:
    --default <key=value>     Default parameter sent with the operation (repeatable)
    --timeout <secs>          Request timeout in seconds
    -h, --help                Show this help message

ENVIRONMENT:
    FLORA_BEARER_TOKEN        Bearer token used for operations with "auth": true
    FLORA_HTTP_TIMEOUT_SECS   Default request timeout
    FLORA_PROXY_URL           Proxy for all requests
    RUST_LOG                  Log filter (default: warn)"#
    );
}

fn parse_args(raw: &[String]) -> anyhow::Result<Args> {
    let mut positional = Vec::new();
    let mut defaults = Vec::new();
    let mut timeout = None;

    let mut iter = raw.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--default" => {
                let pair = iter.next().ok_or_else(|| anyhow!("--default needs key=value"))?;
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| anyhow!("invalid --default '{pair}', expected key=value"))?;
                defaults.push((key.to_string(), value.to_string()));
            }
            "--timeout" => {
                let secs = iter.next().ok_or_else(|| anyhow!("--timeout needs a value"))?;
                let secs: u64 = secs
                    .parse()
                    .with_context(|| format!("invalid --timeout '{secs}'"))?;
                timeout = Some(Duration::from_secs(secs));
            }
            other if other.starts_with("--") => bail!("unknown option: {other}"),
            other => positional.push(other.to_string()),
        }
    }

    if positional.len() != 2 {
        bail!("expected <BASE_URI> and <JSON_PARAMS>");
    }
    let params = positional.pop().unwrap_or_default();
    let base_uri = positional.pop().unwrap_or_default();

    Ok(Args {
        base_uri,
        params,
        defaults,
        timeout,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    if raw.is_empty() || raw.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }
    let args = parse_args(&raw)?;

    let params: Value = serde_json::from_str(&args.params).context("JSON_PARAMS is not valid JSON")?;
    let Value::Object(params) = params else {
        bail!("JSON_PARAMS must be a JSON object");
    };
    let op = OperationDescriptor::from_params(params)?;

    let mut builder = FloraClient::builder(args.base_uri.as_str());
    for (key, value) in args.defaults {
        builder = builder.default_param(key, value);
    }
    if let Some(timeout) = args.timeout {
        builder = builder.timeout(timeout);
    }
    if let Ok(token) = std::env::var("FLORA_BEARER_TOKEN") {
        let header = format!("Bearer {token}");
        builder = builder.auth_provider(Arc::new(move |req: ApiRequest| {
            req.with_header("Authorization", &header)
        }));
    }
    let client = builder.build()?;

    match client.execute(op).await? {
        Payload::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Payload::Raw(bytes) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
