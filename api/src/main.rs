use std::sync::Arc;

use axum::Router;
use dotenv::dotenv;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod campground;
mod config;
mod error;
mod flash;
mod identity;
mod payload;
mod request;
mod schema;
mod store;
mod utils;

use config::{Env, ServerConfig};
use store::{Store, memory::MemoryStore, postgres::PgStore};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Clone)]
pub struct App {
    store: Arc<dyn Store>,
    config: Arc<ServerConfig>,
}

pub fn router(app: App) -> Router {
    Router::new()
        .nest("/campgrounds", campground::routes::route())
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

fn init_tracing(env: Env) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,yelpcamp=debug,tower_http=debug"));
    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Env::Production => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        Env::Dev | Env::Staging => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();

    let env = Env::from_env();
    init_tracing(env);

    let config = ServerConfig::new_from_env(env);

    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(database_url) => Arc::new(PgStore::connect(database_url)?),
        None => {
            tracing::warn!(
                "`DATABASE_URL` is not set, keeping campgrounds and comments in memory"
            );
            Arc::new(MemoryStore::seeded(config.dev_auth_token.as_deref()).await)
        }
    };

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(
        env = ?config.env,
        await_comment_writes = config.await_comment_writes,
        "listening on {}",
        listener.local_addr()?
    );

    let app = App {
        store,
        config: Arc::new(config),
    };

    axum::serve(listener, router(app)).await?;

    Ok(())
}
