//! s3-put-object - upload a file to S3 with full PutObject header control
//!
//! Builds a PutObject request from a file plus command-line attributes and
//! either prints the projected headers or sends it.

use anyhow::Context;
use clap::Parser;
use s3_put_object::config::Config;
use s3_put_object::s3::{CannedAcl, S3Client, StorageClass};
use s3_put_object::upload::{headers, PutObjectRequest, PutObjectRequestBuilder};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// s3-put-object - upload a file with PutObject attributes
#[derive(Parser, Debug)]
#[command(name = "s3-put-object")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (required unless --dry-run)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Object key
    #[arg(short, long)]
    key: String,

    /// File to upload
    #[arg(short, long)]
    file: PathBuf,

    #[arg(long)]
    cache_control: Option<String>,

    #[arg(long)]
    content_disposition: Option<String>,

    #[arg(long)]
    content_encoding: Option<String>,

    /// Base64 MD5 of the payload, sent verbatim
    #[arg(long, conflicts_with = "compute_md5")]
    content_md5: Option<String>,

    /// Compute Content-MD5 from the file
    #[arg(long)]
    compute_md5: bool,

    #[arg(long)]
    content_type: Option<String>,

    #[arg(long)]
    expires: Option<String>,

    /// User metadata as KEY=VALUE, repeatable
    #[arg(short, long = "meta", value_parser = parse_key_val)]
    meta: Vec<(String, String)>,

    /// Storage class token, e.g. STANDARD_IA
    #[arg(long)]
    storage_class: Option<StorageClass>,

    /// URL-encoded tag set, e.g. "team=a&env=b"
    #[arg(long)]
    tagging: Option<String>,

    #[arg(long)]
    website_redirect_location: Option<String>,

    /// Canned ACL token, e.g. public-read
    #[arg(long)]
    acl: Option<CannedAcl>,

    #[arg(long)]
    grant_read: Option<String>,

    #[arg(long)]
    grant_write: Option<String>,

    #[arg(long)]
    grant_read_acp: Option<String>,

    #[arg(long)]
    grant_write_acp: Option<String>,

    #[arg(long)]
    grant_full_control: Option<String>,

    /// Print the request headers instead of sending
    #[arg(long)]
    dry_run: bool,

    /// Print the metrics registry to stderr after uploading
    #[arg(long)]
    print_metrics: bool,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

impl Args {
    /// Command-line attributes on top of `builder`
    fn apply(&self, mut builder: PutObjectRequestBuilder) -> PutObjectRequestBuilder {
        if let Some(ref value) = self.cache_control {
            builder = builder.with_cache_control(value.as_str());
        }
        if let Some(ref value) = self.content_disposition {
            builder = builder.with_content_disposition(value.as_str());
        }
        if let Some(ref value) = self.content_encoding {
            builder = builder.with_content_encoding(value.as_str());
        }
        if let Some(ref value) = self.content_md5 {
            builder = builder.with_content_md5(value.as_str());
        }
        if let Some(ref value) = self.content_type {
            builder = builder.with_content_type(value.as_str());
        }
        if let Some(ref value) = self.expires {
            builder = builder.with_expires(value.as_str());
        }
        if let Some(ref value) = self.tagging {
            builder = builder.with_tagging(value.as_str());
        }
        if let Some(ref value) = self.website_redirect_location {
            builder = builder.with_website_redirect_location(value.as_str());
        }
        if let Some(ref value) = self.grant_read {
            builder = builder.with_grant_read(value.as_str());
        }
        if let Some(ref value) = self.grant_write {
            builder = builder.with_grant_write(value.as_str());
        }
        if let Some(ref value) = self.grant_read_acp {
            builder = builder.with_grant_read_acp(value.as_str());
        }
        if let Some(ref value) = self.grant_write_acp {
            builder = builder.with_grant_write_acp(value.as_str());
        }
        if let Some(ref value) = self.grant_full_control {
            builder = builder.with_grant_full_control(value.as_str());
        }
        if let Some(class) = self.storage_class {
            builder = builder.with_storage_class(class);
        }
        if let Some(acl) = self.acl {
            builder = builder.with_acl(acl);
        }
        builder.with_metadata_entries(self.meta.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = match args.config {
        Some(ref path) => {
            let config = Config::load(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?;
            info!("Loaded configuration from {:?}", path);
            Some(config)
        }
        None => None,
    };

    let data = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;

    let mut builder = PutObjectRequest::builder().data(data);
    if let Some(ref config) = config {
        builder = config.upload.apply(builder);
    }
    builder = args.apply(builder);

    let compute_md5 = args.compute_md5
        || (args.content_md5.is_none()
            && config.as_ref().is_some_and(|c| c.upload.compute_md5));
    if compute_md5 {
        builder = builder.with_computed_content_md5();
    }

    let request = builder.build()?;
    tracing::debug!(request = ?request, "Assembled PutObject request");

    if args.dry_run {
        for (name, value) in headers(&request) {
            println!("{}: {}", name, value);
        }
        return Ok(());
    }

    let config = config.context("--config is required unless --dry-run is given")?;
    let client = S3Client::new(config.s3.client_config())?;
    let response = client.put_object(&args.key, &request).await?;

    println!("{}", response.etag);
    if let Some(version_id) = response.version_id {
        println!("version-id: {}", version_id);
    }

    if args.print_metrics || config.metrics.enabled {
        eprint!("{}", s3_put_object::metrics::gather());
    }

    Ok(())
}
