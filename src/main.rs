// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::time::Duration;

use anyhow::{bail, Context};
use the_conveyor::config::{load_and_validate_config, RuntimeBuilder};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// How long values already sent get to reach the output after stdin ends.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: {} <config.yaml|config.toml> <input-queue> <output-queue>", args[0]);
        eprintln!("Example: echo hello | {} conveyor.yaml a c", args[0]);
        std::process::exit(1);
    }
    let (config_file, input_queue, output_queue) = (&args[1], args[2].clone(), args[3].clone());

    let config = load_and_validate_config(config_file)
        .with_context(|| format!("loading {}", config_file))?;
    let conveyor = RuntimeBuilder::from_config(&config)?;
    let client = conveyor.client();

    for queue in [&input_queue, &output_queue] {
        if !client.has_queue(queue) {
            bail!("queue '{}' is not used by any stage in {}", queue, config_file);
        }
    }

    let cancel = CancellationToken::new();
    let mut run = tokio::spawn(conveyor.run(cancel.clone()));

    let printer = {
        let client = client.clone();
        tokio::spawn(async move {
            while let Ok(Some(value)) = client.recv(&output_queue).await {
                println!("{}", value);
            }
        })
    };

    let feeder = {
        let client = client.clone();
        async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                client.send(&input_queue, line).await?;
            }
            tokio::time::sleep(DRAIN_GRACE).await;
            Ok::<_, anyhow::Error>(())
        }
    };

    let run_result = tokio::select! {
        _ = tokio::signal::ctrl_c() => None,
        fed = feeder => {
            if let Err(e) = fed {
                tracing::warn!(error = %e, "stopped reading input");
            }
            None
        }
        finished = &mut run => Some(finished),
    };

    cancel.cancel();
    let run_result = match run_result {
        Some(finished) => finished,
        None => run.await,
    }
    .context("conveyor task did not complete")?;

    printer.await.context("output printer did not complete")?;
    run_result?;
    Ok(())
}
