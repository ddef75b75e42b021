use docrag::{
    api, blobstore, config, extract, gemini, logging, metrics, processing, query, storage,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    config::init_config();
    logging::init_tracing();

    let settings = config::get_config();
    let store: Arc<dyn storage::DocumentStore> = Arc::new(storage::memory::InMemoryStore::new());
    let blobs = Arc::new(
        blobstore::FsBlobStore::new(&settings.upload_dir)
            .expect("Failed to prepare upload directory"),
    );
    let provider =
        Arc::new(gemini::GeminiClient::new().expect("Failed to construct Gemini client"));
    let service_metrics = Arc::new(metrics::ServiceMetrics::new());

    let documents = Arc::new(processing::DocumentService::new(
        store.clone(),
        blobs,
        Arc::new(extract::PdfTextExtractor),
        provider.clone(),
        service_metrics.clone(),
    ));
    let query_service = Arc::new(query::QueryService::new(
        store,
        provider.clone(),
        provider,
        service_metrics,
    ));

    let app = api::create_router(api::AppState {
        documents,
        query: query_service,
    });

    let (listener, port) = bind_listener().await.expect("Failed to bind listener");
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await.unwrap();
}

async fn bind_listener() -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    let settings = config::get_config();
    if let Some(port) = settings.server_port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 4700..=4799;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 4700-4799",
    ))
}
