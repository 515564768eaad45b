use clap::{Parser, Subcommand};
use cura::config::RelaySettings;
use cura::relay::{DirectReply, Relay};

#[derive(Parser)]
#[command(name = "cura")]
#[command(about = "Cura relay CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file listing every option.
    Init {
        /// Config file path (default: CURA_CONFIG_PATH or ~/.cura/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the gateway: WhatsApp webhook, direct-query endpoint, and health probe.
    Gateway {
        /// Config file path (default: CURA_CONFIG_PATH or ~/.cura/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config or 3000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Ask the prediction backend about a set of symptoms and print the reply.
    Query {
        /// Config file path (default: CURA_CONFIG_PATH or ~/.cura/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Print the reply as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Symptom identifiers, e.g. `itching skin_rash`.
        #[arg(value_name = "SYMPTOM")]
        symptoms: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("cura {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Gateway { config, port }) => {
            if let Err(e) = run_gateway(config, port).await {
                log::error!("gateway failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Query {
            config,
            json,
            symptoms,
        }) => match run_query(config, json, symptoms).await {
            Ok(true) => {}
            Ok(false) => std::process::exit(2),
            Err(e) => {
                log::error!("query failed: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(cura::config::default_config_path);
    let dir = cura::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_gateway(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, _) = cura::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!("starting gateway on {}:{}", config.gateway.bind, config.gateway.port);
    cura::gateway::run_gateway(config).await
}

/// Returns false when the reply is an error (rejected selection or backend failure).
async fn run_query(
    config_path: Option<std::path::PathBuf>,
    json: bool,
    symptoms: Vec<String>,
) -> anyhow::Result<bool> {
    let (config, _) = cura::config::load_config(config_path)?;
    let relay = Relay::from_settings(&RelaySettings::resolve(&config));
    let reply = match relay.direct_query(&symptoms, false).await {
        Ok(r) => r,
        Err(e) => DirectReply::rejected(&e),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        if let Some(ref echo) = reply.echo {
            println!("> {}", echo);
        }
        for line in &reply.reply.lines {
            println!("< {}", line);
        }
    }
    Ok(!reply.reply.is_error)
}
