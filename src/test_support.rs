use axum::Router;
use tokio::net::TcpListener;
use url::Url;

/// Serves `app` on an ephemeral local port and returns its `/chat` URL.
pub async fn spawn_endpoint(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{}/chat", addr)).unwrap()
}

/// A `/chat` URL on a port nothing listens on.
pub async fn unreachable_endpoint() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}/chat", addr)).unwrap()
}
