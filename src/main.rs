//! sounder - a fast, concurrent HTTP/HTTPS probing tool.

use anyhow::{Context, Result};
use clap::Parser;
use sounder::cli::{self, Args};
use sounder::error::CliError;
use sounder::probe::{
    self, ClientConfig, HttpTransport, ProbeFlags, ProbeJobConfig, Prober, Transport,
};
use sounder::types::target::expand_targets;
use sounder::{banner, output};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if !args.silent {
        banner::print_banner();
    }

    let code = match run(args).await {
        Ok(code) => code,
        Err(err) => {
            output::print_error(&format!("{:#}", err));
            1
        }
    };
    std::process::exit(code);
}

async fn run(args: Args) -> Result<i32> {
    let raw_targets = cli::gather_targets(&args)?;
    let urls = expand_targets(&raw_targets, &args.ports);
    if urls.is_empty() {
        return Err(CliError::NoTargets.into());
    }

    if !args.silent {
        output::print_info(&format!(
            "probing {} urls with {} workers",
            urls.len(),
            args.concurrency
        ));
    }

    let client_config = ClientConfig {
        timeout: Duration::from_secs(args.timeout),
        follow_redirects: args.follow_redirects,
        max_redirects: args.max_redirects,
        headers: args.header.clone(),
        proxy: args.proxy.clone(),
        insecure: args.insecure,
        user_agent: args.user_agent.clone(),
        concurrency: args.concurrency,
    };
    let transport: Arc<dyn Transport> = Arc::new(
        HttpTransport::new(&client_config)
            .map_err(CliError::ClientBuild)
            .context("HTTP client initialization failed")?,
    );

    let flags = ProbeFlags {
        body_hash: args.hash.clone(),
        favicon: args.favicon,
        ip: args.ip,
        line_count: args.line_count,
        word_count: args.word_count,
    };
    let prober = Arc::new(Prober::new(transport, flags));

    let job = ProbeJobConfig {
        concurrency: args.concurrency,
        rate_limit: args.rate_limit,
        delay: Duration::from_secs_f64(args.delay.max(0.0)),
        task_timeout: probe::TASK_TIMEOUT,
        show_progress: !args.silent,
    };

    let started = Instant::now();
    let results = tokio::select! {
        results = probe::run_probes(prober, &urls, &job) => results,
        _ = tokio::signal::ctrl_c() => {
            output::print_warning("operation cancelled by user");
            return Ok(130);
        }
    };

    if !args.silent {
        let live = results.iter().filter(|r| r.probe_status).count();
        output::print_info(&format!(
            "completed in {:.2}s - {}/{} targets responded",
            started.elapsed().as_secs_f64(),
            live,
            results.len()
        ));
    }

    if let Some(path) = &args.output {
        output::write_output(path, &results, &args)?;
        if !args.silent {
            output::print_info(&format!("results saved to {}", path.display()));
        }
    } else {
        output::print_results(&results, &args)?;
    }

    Ok(0)
}
