//! The `knowfruit classify` command: rank a single local photo.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use knowfruit_core::client::resolve_env_var;
use knowfruit_core::{display_names, Config, InferencePipeline, PipelineError, RankedLabels};
use serde::Serialize;

/// Arguments for the `classify` command.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Image file to classify (JPEG or PNG)
    pub image: PathBuf,

    /// Number of labels to return (defaults to classes.top_k)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ClassifyOutput {
    file: PathBuf,
    labels: Vec<String>,
    display_names: Vec<String>,
}

/// Execute the classify command.
pub async fn execute(args: ClassifyArgs, config: Config) -> anyhow::Result<()> {
    if !args.image.is_file() {
        anyhow::bail!("Not a file: {}", args.image.display());
    }

    let bytes = std::fs::read(&args.image)?;
    if resolve_env_var(&config.model.access_token).is_none() {
        tracing::warn!("No access token configured; the request will be unauthenticated");
    }
    let pipeline = InferencePipeline::from_config(&config)?;
    let k = args.top_k.unwrap_or(pipeline.top_k());

    tracing::debug!(
        "Classifying {} ({} bytes) with {}",
        args.image.display(),
        bytes.len(),
        pipeline.classifier_name()
    );

    let timeout_ms = config.limits.request_timeout_ms;
    let ranked = tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        pipeline.classify_top(bytes, k),
    )
    .await
    .map_err(|_| PipelineError::Timeout {
        stage: "classify".to_string(),
        timeout_ms,
    })??;

    let output = to_output(args.image, ranked);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (rank, name) in output.display_names.iter().enumerate() {
            println!("{:>2}. {name}", rank + 1);
        }
    }

    Ok(())
}

fn to_output(file: PathBuf, ranked: RankedLabels) -> ClassifyOutput {
    let names = display_names(&ranked);
    ClassifyOutput {
        file,
        labels: ranked.into_inner(),
        display_names: names,
    }
}
