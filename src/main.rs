use std::net::SocketAddr;

use clap::Parser;

use crate::options::Options;
use crate::storage::{fixture, SourceDir};

mod archive;
mod error;
mod misc;
mod options;
mod storage;

#[tokio::main]
async fn main() {
    let options = Options::parse();
    env_logger::Builder::new()
        .filter_level(options.log_level())
        .init();

    let dir = SourceDir::new(&options.sources_dir);
    if let Some(size) = options.generate_sources {
        fixture::generate(&dir, options.source_count, size)
            .await
            .unwrap_or_else(|err| exit_error!("Cannot generate source files: {}", err));
        log::info!(
            "Generated {} source files of {} bytes in {}",
            options.source_count,
            size,
            options.sources_dir.display()
        );
    }

    let router = archive::router(options.archive_config(), dir);

    let address = SocketAddr::new(options.address, options.port);
    log::info!("App is running on: {}", address);
    axum::Server::bind(&address)
        .serve(router.into_make_service())
        .await
        .unwrap_or_else(|err| exit_error!("Server stopped: {}", err))
}
