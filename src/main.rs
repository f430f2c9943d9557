//! podwatch - A live terminal dashboard for Kubernetes pod lifecycle events
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;

/// podwatch - watch pods come and go
#[derive(Parser, Debug)]
#[command(name = "podwatch")]
#[command(about = "A live terminal dashboard for Kubernetes pod lifecycle events", long_about = None)]
struct Args {
    /// Namespace to watch
    #[arg(short, long, value_name = "NS")]
    namespace: Option<String>,

    /// Watch pods in every namespace
    #[arg(short = 'A', long)]
    all_namespaces: bool,

    /// kubeconfig context to use
    #[arg(long, value_name = "CTX")]
    context: Option<String>,

    /// kubectl binary to run
    #[arg(long, value_name = "PATH")]
    kubectl: Option<String>,

    /// Replay a scripted demo instead of talking to a cluster
    #[arg(long)]
    demo: bool,

    /// Start with the feed stopped (press 'w' to watch)
    #[arg(long)]
    no_watch: bool,

    /// Settings file to use
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a default settings file and exit
    #[arg(long)]
    init_config: bool,
}

impl From<Args> for podwatch::Overrides {
    fn from(args: Args) -> Self {
        Self {
            namespace: args.namespace,
            all_namespaces: args.all_namespaces,
            context: args.context,
            kubectl: args.kubectl,
            demo: args.demo,
            no_watch: args.no_watch,
            config: args.config,
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let init_config = args.init_config;
    let overrides = podwatch::Overrides::from(args);

    if init_config {
        let path = podwatch::init_config(&overrides)?;
        println!("Config file: {}", path.display());
        return Ok(());
    }

    podwatch::run(overrides).await?;
    Ok(())
}
