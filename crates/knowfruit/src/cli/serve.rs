//! The `knowfruit serve` command for running the web front end.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;
use knowfruit_core::Config;

use crate::server::{self, AppState};

/// Arguments for the `serve` command.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.bind)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Directory of fruit photos served under /static
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Fruit info file (overrides server.fruit_info_path)
    #[arg(long)]
    pub fruit_info: Option<PathBuf>,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&args, &mut config)?;

    tracing::info!(
        model = %config.model.name,
        classes = config.classes.names.len(),
        top_k = config.classes.top_k,
        "Starting web front end"
    );

    let state = AppState::from_config(&config)?;
    server::serve(state, &config.server.bind).await
}

fn apply_overrides(args: &ServeArgs, config: &mut Config) -> anyhow::Result<()> {
    if let Some(bind) = &args.bind {
        bind.parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("Invalid --bind address '{bind}': {e}"))?;
        config.server.bind = bind.clone();
    }
    if let Some(dir) = &args.static_dir {
        config.server.static_dir = dir.clone();
    }
    if let Some(path) = &args.fruit_info {
        config.server.fruit_info_path = path.clone();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let args = ServeArgs {
            bind: Some("127.0.0.1:8080".to_string()),
            static_dir: Some(PathBuf::from("/srv/fruit")),
            fruit_info: None,
        };
        let mut config = Config::default();
        apply_overrides(&args, &mut config).unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.static_dir, PathBuf::from("/srv/fruit"));
        assert_eq!(config.server.fruit_info_path, PathBuf::from("dict_fruit.txt"));
    }

    #[test]
    fn test_invalid_bind_rejected() {
        let args = ServeArgs {
            bind: Some("not-an-address".to_string()),
            ..ServeArgs::default()
        };
        let mut config = Config::default();
        assert!(apply_overrides(&args, &mut config).is_err());
        assert_eq!(config.server.bind, "0.0.0.0:5000");
    }
}
