//! azfile-inspect - print captured file-service response bodies as JSON.
//!
//! Reads an XML body from a file (or stdin when no path is given), parses it
//! as the named document kind, and writes the resulting record to stdout.
//!
//! # Usage
//!
//! ```text
//! azfile-inspect shares listing.xml
//! curl -s "$URL" | azfile-inspect ranges
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use azfile_http::{
    FileClientConfig, ParseOutcome, StorageResponse, parse_directories_and_files, parse_ranges,
    parse_share_stats, parse_shares,
};
use azfile_model::{ServiceProperties, SignedIdentifiers};
use azfile_xml::from_xml;
use bytes::Bytes;
use http::StatusCode;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: azfile-inspect <service-properties|signed-identifiers|shares|entries|ranges|share-stats> [path]";

/// The document kinds the tool understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    ServiceProperties,
    SignedIdentifiers,
    Shares,
    Entries,
    Ranges,
    ShareStats,
}

impl FromStr for Kind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let kind = match s {
            "service-properties" => Self::ServiceProperties,
            "signed-identifiers" => Self::SignedIdentifiers,
            "shares" => Self::Shares,
            "entries" => Self::Entries,
            "ranges" => Self::Ranges,
            "share-stats" => Self::ShareStats,
            other => bail!("unknown document kind '{other}'\n{USAGE}"),
        };
        Ok(kind)
    }
}

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn read_body(path: Option<&Path>) -> Result<Bytes> {
    let buf = match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    Ok(Bytes::from(buf))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to encode JSON")
}

/// Unwrap a listing parse; a response built with a body is always parsed.
fn listing_json<T: Serialize>(outcome: ParseOutcome<T>) -> Result<String> {
    match outcome {
        ParseOutcome::Parsed(value) => to_json(&value),
        ParseOutcome::NotParsed(_) => bail!("response has no body"),
    }
}

fn render(kind: Kind, body: Bytes) -> Result<String> {
    let response = StorageResponse::new(StatusCode::OK).with_body(body.clone());
    match kind {
        Kind::ServiceProperties => to_json(&from_xml::<ServiceProperties>(&body)?),
        Kind::SignedIdentifiers => to_json(&from_xml::<SignedIdentifiers>(&body)?),
        Kind::Shares => listing_json(parse_shares(response)?),
        Kind::Entries => listing_json(parse_directories_and_files(response)?),
        Kind::Ranges => listing_json(parse_ranges(response)?),
        Kind::ShareStats => listing_json(parse_share_stats(response)?),
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let kind: Kind = args.get(1).context(USAGE)?.parse()?;
    let path = args.get(2).map(PathBuf::from);

    let config = FileClientConfig::from_env();
    init_tracing(&config.log_level)?;

    let body = read_body(path.as_deref())?;
    debug!(?kind, bytes = body.len(), "read response body");

    let json = render(kind, body).with_context(|| format!("failed to parse {kind:?} document"))?;
    info!(?kind, "parsed document");
    println!("{json}");

    Ok(())
}
