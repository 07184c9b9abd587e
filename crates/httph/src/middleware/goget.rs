//! Vanity import paths for Go modules
//!
//! Requests for `/<module>` are redirected to the module's repository, and
//! `go get` requests (`?go-get=1`) are answered with the `go-import` meta tag
//! the Go tool looks for.

use std::collections::HashMap;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    http::{header, HeaderValue, Request, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use futures::future::{ready, Either, Ready};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower::{Layer, Service};

use crate::form::FormValues;

/// Options for [`GoGetLayer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoGetOptions {
    /// Domain the module paths live under, for example `example.com`
    pub domain: String,
    /// Module names served, for example `httph`
    pub modules: Vec<String>,
    /// Where the modules are hosted, for example `https://github.com/example`
    pub url_prefix: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GoGetError {
    #[error("invalid domain")]
    InvalidDomain,

    #[error("no modules")]
    NoModules,

    #[error("invalid module {0:?}")]
    InvalidModule(String),

    #[error("invalid URL prefix {0:?}")]
    InvalidUrlPrefix(String),
}

struct ModuleTarget {
    location: HeaderValue,
    page: String,
}

/// Layer serving Go vanity import paths.
#[derive(Clone)]
pub struct GoGetLayer {
    modules: Arc<HashMap<String, ModuleTarget>>,
}

impl GoGetLayer {
    pub fn new(options: GoGetOptions) -> Result<Self, GoGetError> {
        if options.domain.is_empty() {
            return Err(GoGetError::InvalidDomain);
        }
        if options.modules.is_empty() {
            return Err(GoGetError::NoModules);
        }
        if !options.url_prefix.starts_with("http") {
            return Err(GoGetError::InvalidUrlPrefix(options.url_prefix));
        }
        let url_prefix = options
            .url_prefix
            .strip_suffix('/')
            .unwrap_or(&options.url_prefix);

        let mut modules = HashMap::with_capacity(options.modules.len());
        for module in &options.modules {
            if module.is_empty() {
                return Err(GoGetError::InvalidModule(module.clone()));
            }
            let location = HeaderValue::try_from(format!("{url_prefix}/{module}"))
                .map_err(|_| GoGetError::InvalidModule(module.clone()))?;
            let page = render_page(&options.domain, module, url_prefix);
            modules.insert(module.clone(), ModuleTarget { location, page });
        }

        Ok(Self {
            modules: Arc::new(modules),
        })
    }

    fn respond(&self, uri: &Uri) -> Option<Response> {
        let module = uri.path().split('/').nth(1).unwrap_or_default();
        let target = self.modules.get(module)?;

        if !is_go_get(uri) {
            let redirect = (
                StatusCode::PERMANENT_REDIRECT,
                [(header::LOCATION, target.location.clone())],
            );
            return Some(redirect.into_response());
        }

        Some(Html(target.page.clone()).into_response())
    }
}

impl<S> Layer<S> for GoGetLayer {
    type Service = GoGet<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GoGet {
            inner,
            layer: self.clone(),
        }
    }
}

/// Service produced by [`GoGetLayer`].
#[derive(Clone)]
pub struct GoGet<S> {
    inner: S,
    layer: GoGetLayer,
}

impl<S, B> Service<Request<B>> for GoGet<S>
where
    S: Service<Request<B>, Response = Response>,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Either<Ready<Result<Response, S::Error>>, S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        match self.layer.respond(request.uri()) {
            Some(response) => Either::Left(ready(Ok(response))),
            None => Either::Right(self.inner.call(request)),
        }
    }
}

fn is_go_get(uri: &Uri) -> bool {
    uri.query()
        .and_then(|query| FormValues::parse(query).ok())
        .map(|values| values.get("go-get") == Some("1"))
        .unwrap_or(false)
}

fn render_page(domain: &str, module: &str, url_prefix: &str) -> String {
    let domain = escape_html(domain);
    let module = escape_html(module);
    let url_prefix = escape_html(url_prefix);

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="go-import" content="{domain}/{module} git {url_prefix}/{module}">
  <meta name="go-source" content="{domain}/{module} {url_prefix}/{module} {url_prefix}/{module}/tree/main{{/dir}} {url_prefix}/{module}/blob/main{{/dir}}/{{file}}#L{{line}}">
  <title>{domain}/{module}</title>
</head>
<body>
  <a href="{url_prefix}/{module}">{domain}/{module}</a>
</body>
</html>
"#
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
