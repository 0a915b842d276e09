use std::net::SocketAddr;

use lexwell_backend_rust::config::Config;
use lexwell_backend_rust::db::postgres::connect_and_migrate;
use lexwell_backend_rust::logging;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    let _file_log_guard = logging::init_tracing(&config.log_level);

    let pool = connect_and_migrate(&config.database_url)
        .await
        .expect("failed to connect to database");

    let app = lexwell_backend_rust::create_app(pool);

    let addr = config.bind_addr();
    tracing::info!(%addr, "lexwell-backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("HTTP server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
