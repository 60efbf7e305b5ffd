use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use asset_bundles::config::DEFAULT_CONFIG_FILE;
use asset_bundles::logging::init_logging;
use asset_bundles::schema::{ScriptOptions, StyleOptions};
use asset_bundles::serve::DevServer;
use asset_bundles::{AssetsBuilder, AssetsConfig};

/// Resolve gulp-bundle-assets bundles and asset streams from the command line.
#[derive(Debug, Parser)]
#[command(name = "asset-bundles", version, about)]
struct Cli {
  /// Configuration file; defaults to ./assets.config.json when present.
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Log at debug level unless RUST_LOG says otherwise.
  #[arg(long, short, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Print the URL of a stream such as assets://vendor/lib.js.
  Url {
    /// Stream URI or external URL.
    stream: String,
  },
  /// Print <script> tags for a bundle.
  Js {
    /// Bundle name.
    #[arg(default_value = "js/main")]
    bundle: String,
    #[arg(long = "async")]
    async_load: bool,
    #[arg(long)]
    defer: bool,
    #[arg(long)]
    id: Option<String>,
    #[arg(long = "type")]
    script_type: Option<String>,
  },
  /// Print stylesheet <link> tags for a bundle.
  Css {
    /// Bundle name.
    #[arg(default_value = "css/main")]
    bundle: String,
    #[arg(long)]
    media: Option<String>,
    #[arg(long)]
    id: Option<String>,
  },
  /// List bundles defined by the configured manifests.
  Bundles,
  /// Serve raw assets for development.
  Serve {
    /// Bind address, overriding the configuration.
    #[arg(long)]
    address: Option<String>,
    /// URL mount, overriding the configuration.
    #[arg(long)]
    mount: Option<String>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let (config, root_dir) = load_config(cli.config.as_deref())?;
  let builder = AssetsBuilder::new(&config, &root_dir);

  match cli.command {
    Command::Url { stream } => {
      println!("{}", builder.build()?.absolute_url(stream)?);
    }
    Command::Js {
      bundle,
      async_load,
      defer,
      id,
      script_type,
    } => {
      let options = ScriptOptions {
        async_load,
        defer,
        id,
        script_type,
      };
      println!("{}", builder.build_manager()?.js(&bundle, &options)?);
    }
    Command::Css { bundle, media, id } => {
      let options = StyleOptions {
        id,
        media,
        ..StyleOptions::default()
      };
      println!("{}", builder.build_manager()?.css(&bundle, &options)?);
    }
    Command::Bundles => {
      for name in builder.build_schema()?.bundle_names() {
        println!("{name}");
      }
    }
    Command::Serve { address, mount } => {
      let address = address.unwrap_or_else(|| config.serve.address.clone());
      let mount = mount.unwrap_or_else(|| config.serve.mount.clone());
      let assets = Arc::new(builder.build()?);
      DevServer::bind(&address, &mount, assets)?.run()?;
    }
  }

  Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<(AssetsConfig, PathBuf)> {
  match explicit {
    Some(path) => {
      let config = AssetsConfig::load(path)?;
      let root_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
      Ok((config, root_dir))
    }
    None => {
      let cwd = std::env::current_dir().context("failed to read current directory")?;
      tracing::debug!(file = DEFAULT_CONFIG_FILE, dir = %cwd.display(), "discovering configuration");
      Ok((AssetsConfig::discover(&cwd), cwd))
    }
  }
}
