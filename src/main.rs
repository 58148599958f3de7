mod dispatcher;
mod http_client;
mod proxy_service;
mod response_headers;
mod server_config;
mod startup;
mod static_files;
mod std_logger;
#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::process::ExitCode;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use clap::Parser;
use log::{error, info};

use dispatcher::Routes;
use response_headers::ResponseHeaders;
use server_config::{parse_port, ServerConfig, DEFAULT_PORT};
use std_logger::{StdLogger, ACCESS_LOG_TARGET};

const SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Local development server: static files plus a CORS-bypassing GET proxy.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Port to listen on
    port: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to serve static files from
    #[arg(long)]
    root: Option<PathBuf>,

    /// Disable the /api/proxy endpoint
    #[arg(long)]
    no_proxy: bool,

    /// Never clear the terminal between access log lines
    #[arg(long)]
    no_clear: bool,
}

#[actix_web::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if startup::is_port_in_use(config.port) {
        eprintln!(
            "Error: Port {} is already in use. Another server appears to be running.",
            config.port
        );
        return ExitCode::FAILURE;
    }

    let static_root = match config.resolve_static_root() {
        Ok(root) => root,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let proxy = match proxy_service::build(&config.proxy) {
        Ok(proxy) => proxy,
        Err(err) => {
            eprintln!("Error: unable to build the outbound HTTP client: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let logger = StdLogger::new(
        startup::banner(&static_root, config.port, proxy.is_some()),
        config.log.clear_every,
    );
    logger.print_banner();
    if let Err(err) = logger.install(config.log.level.into()) {
        eprintln!("Error: {}", err);
        return ExitCode::FAILURE;
    }

    let routes = Routes { static_root, proxy };
    info!("Listening on {}:{} with {} workers", config.bind, config.port, config.workers);

    let server = HttpServer::new(move || {
        let routes = routes.clone();
        App::new()
            .wrap(ResponseHeaders)
            .wrap(Logger::new("%a \"%r\" %s %b %Dms").log_target(ACCESS_LOG_TARGET))
            .configure(move |cfg| routes.configure(cfg))
    })
    .workers(config.workers)
    .shutdown_timeout(SHUTDOWN_TIMEOUT_SECS)
    .bind((config.bind.as_str(), config.port));

    let result = match server {
        Ok(server) => server.run().await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => {
            println!("\n\nServer stopped.");
            println!("Server closed.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Server crashed unexpectedly: {:?}", err);
            println!("Server closed.");
            ExitCode::FAILURE
        }
    }
}

/// Defaults, then the config file, then the environment, then the command line.
fn load_config(cli: &Cli) -> Result<ServerConfig, server_config::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load_from_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env();

    if let Some(port) = &cli.port {
        match parse_port(port) {
            Ok(port) => config.port = port,
            Err(err) => {
                println!("{}", err);
                println!("Using default port {}", DEFAULT_PORT);
                config.port = DEFAULT_PORT;
            }
        }
    }

    if let Some(root) = &cli.root {
        config.static_dir = root.clone();
    }
    if cli.no_proxy {
        config.proxy.enabled = false;
    }
    if cli.no_clear {
        config.log.clear_every = 0;
    }

    Ok(config)
}
