//! Fixed security headers

use axum::http::{header, HeaderValue};
use tower::layer::util::Stack;
use tower_http::set_header::SetResponseHeaderLayer;

/// Layer returned by [`no_clickjacking`].
pub type NoClickjackingLayer =
    Stack<SetResponseHeaderLayer<HeaderValue>, SetResponseHeaderLayer<HeaderValue>>;

/// Disallows embedding the response in frames and turns on the XSS filter of
/// older browsers, unless the wrapped handler set those headers itself.
///
/// Sets `X-Frame-Options: deny` and `X-XSS-Protection: 1; mode=block`.
pub fn no_clickjacking() -> NoClickjackingLayer {
    Stack::new(
        SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("deny"),
        ),
        SetResponseHeaderLayer::if_not_present(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ),
    )
}
