use crate::config::Config;
use crate::services::{Catalogs, Library, LiveMatches, RemoteFeed, ViewRegistry};
use crate::storage::on_disk::OnDiskStorage;
use crate::storage::{InMemoryStorage, KeyValueStore};
use actix_rt::signal::unix;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use aggregation::SessionSettings;
use futures_lite::FutureExt;
use source_providers::SourceClient;
use std::sync::Arc;
use tracing::{error, info, warn};

mod config;
mod http;
mod services;
mod storage;
mod types;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let mut terminate = unix::signal(unix::SignalKind::terminate())?;
    let mut interrupt = unix::signal(unix::SignalKind::interrupt())?;

    dotenv::dotenv().ok();
    env_logger::init();

    let config = Arc::from(Config::from_env());

    info!(version = VERSION, "Starting application...");

    let state_storage: Arc<dyn KeyValueStore> = match &config.state_storage_directory {
        Some(directory) => Arc::new(OnDiskStorage::create(directory.clone())),
        None => {
            warn!("No state storage directory configured, library will not survive restarts");
            Arc::new(InMemoryStorage::new())
        }
    };

    let descriptors = config
        .load_descriptors()
        .expect("Unable to load source descriptors");
    let source_client = Arc::new(
        SourceClient::create(config.request_timeout(), config.user_agent.as_deref())
            .expect("Unable to initialize HTTP client"),
    );

    info!(sources = descriptors.len(), ranking = ?config.ranking, "Sources loaded");

    let catalogs = Arc::new(Catalogs::from_descriptors(
        descriptors,
        Arc::clone(&source_client),
        config.request_timeout(),
    ));
    let view_registry = Arc::new(ViewRegistry::new(
        catalogs,
        SessionSettings {
            timeout: config.request_timeout(),
            grace_delay: config.grace_delay(),
            ranker: config.ranking.ranker(),
        },
    ));
    let library = Arc::new(Library::new(state_storage));
    let live_matches = Arc::new(LiveMatches::new(Arc::new(RemoteFeed::new(
        Arc::clone(&source_client),
        config.live_matches_url().to_string(),
    ))));

    let live_refresh = config
        .live_refresh_period()
        .map(|period| live_matches.start_refresh(period));
    let view_eviction = config
        .view_idle_timeout()
        .map(|max_idle| view_registry.start_eviction(max_idle));

    let shutdown_timeout = config.shutdown_timeout;
    let bind_address = config.bind_address.clone();

    let server = HttpServer::new({
        let live_matches = Arc::clone(&live_matches);
        let view_registry = Arc::clone(&view_registry);

        move || {
            App::new()
                .app_data(Data::new(Arc::clone(&view_registry)))
                .app_data(Data::new(Arc::clone(&library)))
                .app_data(Data::new(Arc::clone(&live_matches)))
                .configure(http::configure)
        }
    })
    .shutdown_timeout(shutdown_timeout)
    .bind(bind_address)?
    .run();

    let server_handle = server.handle();

    actix_rt::spawn({
        async move {
            if let Err(error) = server.await {
                error!(?error, "Error on http server");
            }
        }
    });

    info!("Application started");

    interrupt.recv().or(terminate.recv()).await;

    info!("Received shutdown signal. Shutting down gracefully...");

    if let Some(task) = live_refresh {
        task.stop().await;
    }

    if let Some(task) = view_eviction {
        task.stop().await;
    }

    server_handle.stop(true).await;

    Ok(())
}
