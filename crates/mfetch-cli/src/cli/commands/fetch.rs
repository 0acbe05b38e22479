//! `mfetch fetch` – send one request through the networking engine.

use crate::cli::FetchArgs;
use anyhow::{Context, Result};
use mfetch_core::{NetworkingEngine, PlayerConfig, Request};

pub async fn run_fetch(cfg: &PlayerConfig, args: FetchArgs) -> Result<()> {
    let retry = cfg.retry_parameters_for(args.kind.into()).clone();
    let mut request = Request::get()
        .with_method(args.method)
        .with_credentials(args.credentials)
        .with_retry_parameters(retry);
    for (name, value) in args.headers {
        request = request.with_header(name, value);
    }
    if let Some(data) = args.data {
        request = request.with_body(data);
    }

    let engine = NetworkingEngine::new();
    let response = match engine.send(&args.uri, &request).await {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("fetch failed: {}", e.to_json());
            return Err(e).with_context(|| format!("fetch {}", args.uri));
        }
    };

    println!("{} {}", response.status, response.uri);
    let mut headers: Vec<_> = response.headers.iter().collect();
    headers.sort();
    for (name, value) in headers {
        println!("{}: {}", name, value);
    }

    match args.output {
        Some(path) => {
            std::fs::write(&path, &response.data)
                .with_context(|| format!("write {}", path.display()))?;
            println!("Wrote {} bytes to {}", response.data.len(), path.display());
        }
        None => println!("{} bytes", response.data.len()),
    }
    Ok(())
}
