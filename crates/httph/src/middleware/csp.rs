//! Content-Security-Policy header

use axum::http::{header, header::InvalidHeaderValue, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::set_header::SetResponseHeaderLayer;

/// Values for each Content-Security-Policy directive.
///
/// Only the value goes in a field, without the directive name or a trailing
/// `;`. Empty fields are left out of the header. The default policy only
/// allows fonts, images, scripts and styles from `'self'`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ContentSecurityPolicyOptions {
    pub child_src: String,
    pub connect_src: String,
    pub default_src: String,
    pub font_src: String,
    pub frame_src: String,
    pub img_src: String,
    pub manifest_src: String,
    pub media_src: String,
    pub object_src: String,
    pub script_src: String,
    pub script_src_elem: String,
    pub script_src_attr: String,
    pub style_src: String,
    pub style_src_elem: String,
    pub style_src_attr: String,
    pub worker_src: String,
    pub base_uri: String,
    pub sandbox: String,
    pub form_action: String,
    pub frame_ancestors: String,
    pub report_to: String,
}

impl Default for ContentSecurityPolicyOptions {
    fn default() -> Self {
        let self_only = || "'self'".to_string();
        Self {
            child_src: String::new(),
            connect_src: String::new(),
            default_src: "'none'".to_string(),
            font_src: self_only(),
            frame_src: String::new(),
            img_src: self_only(),
            manifest_src: String::new(),
            media_src: String::new(),
            object_src: String::new(),
            script_src: self_only(),
            script_src_elem: String::new(),
            script_src_attr: String::new(),
            style_src: self_only(),
            style_src_elem: String::new(),
            style_src_attr: String::new(),
            worker_src: String::new(),
            base_uri: String::new(),
            sandbox: String::new(),
            form_action: String::new(),
            frame_ancestors: String::new(),
            report_to: String::new(),
        }
    }
}

impl ContentSecurityPolicyOptions {
    /// The policy with every directive empty.
    pub fn empty() -> Self {
        Self {
            default_src: String::new(),
            font_src: String::new(),
            img_src: String::new(),
            script_src: String::new(),
            style_src: String::new(),
            ..Self::default()
        }
    }

    fn directives(&self) -> [(&'static str, &str); 21] {
        [
            ("default-src", self.default_src.as_str()),
            ("child-src", self.child_src.as_str()),
            ("connect-src", self.connect_src.as_str()),
            ("font-src", self.font_src.as_str()),
            ("frame-src", self.frame_src.as_str()),
            ("img-src", self.img_src.as_str()),
            ("manifest-src", self.manifest_src.as_str()),
            ("media-src", self.media_src.as_str()),
            ("object-src", self.object_src.as_str()),
            ("script-src", self.script_src.as_str()),
            ("script-src-elem", self.script_src_elem.as_str()),
            ("script-src-attr", self.script_src_attr.as_str()),
            ("style-src", self.style_src.as_str()),
            ("style-src-elem", self.style_src_elem.as_str()),
            ("style-src-attr", self.style_src_attr.as_str()),
            ("worker-src", self.worker_src.as_str()),
            ("base-uri", self.base_uri.as_str()),
            ("sandbox", self.sandbox.as_str()),
            ("form-action", self.form_action.as_str()),
            ("frame-ancestors", self.frame_ancestors.as_str()),
            ("report-to", self.report_to.as_str()),
        ]
    }

    /// The header value: every non-empty directive as `name value`, joined
    /// by `; `.
    pub fn header_value(&self) -> String {
        self.directives()
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| format!("{name} {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Error, Debug)]
pub enum CspError {
    #[error("invalid Content-Security-Policy value {value:?}: {source}")]
    InvalidHeaderValue {
        value: String,
        source: InvalidHeaderValue,
    },
}

/// Sets the `Content-Security-Policy` header built from `options` on every
/// response that does not carry one already.
pub fn content_security_policy(
    options: &ContentSecurityPolicyOptions,
) -> Result<SetResponseHeaderLayer<HeaderValue>, CspError> {
    let value = options.header_value();
    let header_value = HeaderValue::from_str(&value)
        .map_err(|source| CspError::InvalidHeaderValue { value, source })?;

    Ok(SetResponseHeaderLayer::if_not_present(
        header::CONTENT_SECURITY_POLICY,
        header_value,
    ))
}
