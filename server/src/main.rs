use std::path::{Path, PathBuf};
use std::process::ExitCode;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request, header},
    middleware::{self, Next},
    response::Response,
    routing,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
};

const DEFAULT_PORT: &str = "8080";
const DEFAULT_DIST: &str = "../dist";

const REVALIDATE_HTML: &str = "no-cache, must-revalidate";
const IMMUTABLE: &str = "public, max-age=31536000, immutable";
const REVALIDATE_ASSET: &str = "public, max-age=0, must-revalidate";

async fn healthz() -> &'static str {
    "ok"
}

/// Static host for the wasm build: unknown paths fall back to `index.html`
fn router(dist: &Path) -> Router {
    let static_files =
        ServeDir::new(dist).not_found_service(ServeFile::new(dist.join("index.html")));

    Router::new()
        .route("/healthz", routing::get(healthz))
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(CompressionLayer::new().br(true).gzip(true))
                .layer(middleware::from_fn(cache_control)),
        )
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let dist = std::env::var("DIST_DIR").map_or_else(|_| PathBuf::from(DEFAULT_DIST), PathBuf::from);
    let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
    let addr = format!("0.0.0.0:{port}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind {addr}: {err}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Serving {} on http://{addr}", dist.display());

    if let Err(err) = axum::serve(listener, router(&dist)).await {
        tracing::error!("Server stopped: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn cache_control(req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let mut res = next.run(req).await;
    res.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_policy(&path)),
    );
    res
}

/// HTML always revalidates so a new build shows up on the next load;
/// fingerprinted assets never change, everything else revalidates
fn cache_policy(path: &str) -> &'static str {
    if path == "/" || path.ends_with(".html") {
        REVALIDATE_HTML
    } else if is_fingerprinted_asset(path) {
        IMMUTABLE
    } else {
        REVALIDATE_ASSET
    }
}

/// `name.<hash>.ext` where the hash is at least 8 hex digits
fn is_fingerprinted_asset(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    let parts: Vec<&str> = file.split('.').collect();
    let [_, hash, _, ..] = parts.as_slice() else {
        return false;
    };
    hash.len() >= 8 && hash.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[test]
    fn test_fingerprinted_assets() {
        assert!(is_fingerprinted_asset("/cursor_trail_page.3f9a2c1b.wasm"));
        assert!(is_fingerprinted_asset("/assets/app.0123abcdef.js"));
        assert!(!is_fingerprinted_asset("/cursor_trail_page.wasm"));
        assert!(!is_fingerprinted_asset("/app.1234.js"));
        assert!(!is_fingerprinted_asset("/app.notahash1.js"));
    }

    #[test]
    fn test_cache_policy() {
        assert_eq!(cache_policy("/"), REVALIDATE_HTML);
        assert_eq!(cache_policy("/index.html"), REVALIDATE_HTML);
        assert_eq!(cache_policy("/app.0123abcd.js"), IMMUTABLE);
        assert_eq!(cache_policy("/presentation.json"), REVALIDATE_ASSET);
    }

    #[tokio::test]
    async fn test_healthz() {
        let res = router(Path::new("does-not-exist"))
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CACHE_CONTROL).unwrap(),
            REVALIDATE_ASSET
        );
    }
}
