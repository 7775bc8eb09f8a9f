mod routes;
mod state;
mod sync;

use std::path::PathBuf;

use protocol::normalize::MalformedShapePolicy;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let public_dir = std::env::var("PUBLIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"));

    let policy = match std::env::var("MALFORMED_SHAPES").as_deref() {
        Ok("drop") => MalformedShapePolicy::Drop,
        _ => MalformedShapePolicy::FillDefaults,
    };

    let state = state::AppState::new(policy);
    let app = routes::app(state, public_dir);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, ?policy, "pageboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
