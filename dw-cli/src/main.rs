mod signals;

use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;
use std::time::Duration;

use clap::{
    Parser,
    ValueEnum,
};
use dw_core::errors::*;
use dw_core::logging;
use dw_discover::{
    DiscoveryConfig,
    DiscoveryRun,
    KubePodSource,
    OutputFormat,
    Termination,
    WatchOptions,
};
use kube::config::{
    KubeConfigOptions,
    Kubeconfig,
};
use tracing::*;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
enum Format {
    #[default]
    Json,
    Yaml,
}

#[derive(Clone, Debug, Parser)]
#[command(about = "watch namespaces for new pods and report the container images they run", version)]
struct Options {
    #[arg(required = true, value_name = "NAMESPACE")]
    namespaces: Vec<String>,

    #[arg(short, long, value_parser = humantime::parse_duration, default_value = "1m")]
    duration: Duration,

    #[arg(short, long)]
    kubeconfig: Option<PathBuf>,

    #[arg(short = 'l', long)]
    selector: Option<String>,

    #[arg(long)]
    field_selector: Option<String>,

    // only meaningful for json output
    #[arg(short, long)]
    compact: bool,

    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    output_format: Format,

    #[arg(long, value_parser = humantime::parse_duration, default_value = "30s")]
    notify_interval: Duration,

    #[arg(long, value_parser = humantime::parse_duration, default_value = "15s")]
    notify_start_delay: Duration,

    #[arg(short, long, default_value = "info")]
    verbosity: String,
}

impl Options {
    fn discovery_config(&self) -> DiscoveryConfig {
        let output_format = match self.output_format {
            Format::Json => OutputFormat::Json { compact: self.compact },
            Format::Yaml => OutputFormat::Yaml,
        };

        DiscoveryConfig {
            duration: self.duration,
            notify_interval: self.notify_interval,
            notify_start_delay: self.notify_start_delay,
            output_format,
            watch_options: WatchOptions {
                label_selector: self.selector.clone(),
                field_selector: self.field_selector.clone(),
            },
            ..DiscoveryConfig::with_namespaces(&self.namespaces)
        }
    }
}

// An explicit kubeconfig path wins; otherwise use whatever kube would pick up on its own
// ($KUBECONFIG, ~/.kube/config, or the in-cluster service account).
async fn kube_client(kubeconfig: Option<&Path>) -> anyhow::Result<kube::Client> {
    let config = match kubeconfig {
        Some(path) => {
            let kc = Kubeconfig::read_from(path)?;
            kube::Config::from_custom_kubeconfig(kc, &KubeConfigOptions::default()).await?
        },
        None => kube::Config::infer().await?,
    };
    Ok(kube::Client::try_from(config)?)
}

#[instrument(skip_all, ret)]
async fn run(opts: Options) -> anyhow::Result<Termination> {
    let config = opts.discovery_config();
    let client = kube_client(opts.kubeconfig.as_deref()).await?;
    let source = Arc::new(KubePodSource::new(client, config.watch_options.clone()));

    // stdout only ever gets the manifest; all logging goes to stderr
    DiscoveryRun::new(config, source)?
        .run(std::io::stdout(), signals::wait_for_shutdown_signal())
        .await
}

#[tokio::main]
async fn main() {
    let opts = Options::parse();
    logging::setup(&opts.verbosity);
    if let Err(err) = run(opts).await {
        dwerr!(err, "discovery failed");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests;
