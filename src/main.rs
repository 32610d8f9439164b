use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use informer_http::{AppState, DEFAULT_LISTEN_ADDR, router, serve};
use informer_k8s::{BootstrapOptions, KubeLister};

/// Informer - a read-only JSON API over Kubernetes namespaces, pods and ingresses
#[derive(Parser, Debug)]
#[command(name = "informer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Kubeconfig used when not running inside a cluster (default: ~/.kube/config)
    #[arg(long, value_name = "PATH")]
    kubeconfig: Option<PathBuf>,

    /// Skip in-cluster credential discovery and use the kubeconfig directly
    #[arg(long)]
    local: bool,
}

impl Args {
    fn bootstrap_options(&self) -> BootstrapOptions {
        let mut options = BootstrapOptions::default();
        if let Some(path) = &self.kubeconfig {
            options.kubeconfig = path.clone();
        }
        options.in_cluster = !self.local;
        options
    }
}

const BANNER: &[&str] = &[
    "-----------------------------------------------------------------",
    "oo          .8888b",
    "88",
    "dP 88d888b. 88aaa  .d8888b. 88d888b. 88d8b.d8b. .d8888b. 88d888b.",
    "88 88'  `88 88     88'  `88 88'  `88 88'`88'`88 88ooood8 88'  `88",
    "88 88    88 88     88.  .88 88       88  88  88 88.  ... 88",
    "dP dP    dP dP     `88888P' dP       dP  dP  dP `88888P' dP",
    "-----------------------------------------------------------------",
];

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let client = informer_k8s::connect(&args.bootstrap_options()).await?;

    for line in BANNER {
        info!("{}", line);
    }

    let state = AppState::new(Arc::new(KubeLister::new(client)));
    serve(router(state), DEFAULT_LISTEN_ADDR).await
}
