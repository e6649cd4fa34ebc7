use argh::FromArgs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog::store::{JsonlStore, MemoryStore, ProductStore};
use catalog::{AppState, create_app};

#[derive(FromArgs, Debug)]
/// Catalog: a small web interface for managing products.
struct Args {
    /// host to bind to
    #[argh(option, default = "String::from(\"127.0.0.1\")")]
    host: String,

    /// port to listen on (0 for random available port)
    #[argh(option, short = 'p', default = "0")]
    port: u16,

    /// open the browser automatically
    #[argh(switch, short = 'o')]
    open: bool,

    /// JSON-lines file holding the products (defaults to $CATALOG_DATA)
    #[argh(option)]
    data: Option<PathBuf>,
}

fn open_store(data: Option<PathBuf>) -> catalog::store::Result<Arc<dyn ProductStore>> {
    let data = data.or_else(|| std::env::var_os("CATALOG_DATA").map(PathBuf::from));
    match data {
        Some(path) => {
            let store = JsonlStore::open(&path)?;
            tracing::info!("storing products in {}", path.display());
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("no --data file or CATALOG_DATA set, products are kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Args = argh::from_env();

    let store = match open_store(args.data) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open product store: {}", e);
            std::process::exit(1);
        }
    };
    let app = create_app(Arc::new(AppState::new(store)));

    let addr_str = format!("{}:{}", args.host, args.port);
    let addr: SocketAddr = addr_str.parse().expect("Invalid host or port");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    let actual_addr = listener.local_addr().expect("Listener has no local address");
    let url = format!("http://{}/products", actual_addr);

    tracing::info!("{}", url);

    if args.open && let Err(e) = open::that(&url) {
        tracing::error!("Failed to open browser: {}", e);
    }

    axum::serve(listener, app).await.expect("Server error");
}
