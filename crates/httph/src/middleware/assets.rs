//! Serving versioned asset paths without the version

use std::borrow::Cow;
use std::sync::LazyLock;

use axum::http::{uri::PathAndQuery, Request, Uri};
use regex::Regex;
use tower::util::MapRequestLayer;

// Matches versioned assets like "app.abc123.js".
static VERSIONED_ASSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^.]+)\.[a-z0-9]+(?P<extension>\.[a-z0-9]+)$")
        .expect("versioned asset pattern is valid")
});

/// Removes the version from a versioned asset path: `/app.abc123.js` becomes
/// `/app.js`. Other paths are returned unchanged.
pub fn strip_asset_version(path: &str) -> Cow<'_, str> {
    VERSIONED_ASSET.replace(path, "${name}${extension}")
}

/// Rewrites the request path with [`strip_asset_version`], keeping the query.
pub fn rewrite_versioned_asset<B>(mut request: Request<B>) -> Request<B> {
    let stripped = match strip_asset_version(request.uri().path()) {
        Cow::Borrowed(_) => None,
        Cow::Owned(path) => Some(path),
    };
    let Some(path) = stripped else {
        return request;
    };

    let path_and_query = match request.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };
    let Ok(path_and_query) = PathAndQuery::try_from(path_and_query) else {
        return request;
    };

    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    if let Ok(uri) = Uri::from_parts(parts) {
        *request.uri_mut() = uri;
    }
    request
}

/// Layer stripping asset versions from request paths before forwarding,
/// typically to a static file service.
pub fn versioned_assets<B>() -> MapRequestLayer<fn(Request<B>) -> Request<B>> {
    MapRequestLayer::new(rewrite_versioned_asset::<B> as fn(Request<B>) -> Request<B>)
}
