//! Process bootstrap: reads the configuration, installs logging, builds the router and
//! serves it until the listener fails.

mod codec;
mod config;
mod error;
mod routes;
mod server;

use clap::Parser;
use config::Config;
use server::Server;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(config.log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
        return ExitCode::FAILURE;
    }

    let router = match routes::router() {
        Ok(router) => router,
        Err(e) => {
            error!(cause = %e, "build router error");
            return ExitCode::FAILURE;
        }
    };
    info!(host = %config.host, port = config.port, routes = router.route_count(), "router ready");

    match Server::new(router, config.host, config.port).start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(cause = %e, "bind server error");
            ExitCode::FAILURE
        }
    }
}
