//! Flat, multi-valued form values parsed from the query string and body

use std::collections::BTreeMap;

use axum::{
    body::Body,
    http::{header, request::Parts, Method},
};

use crate::codec::read_body;
use crate::error::AdapterError;

/// Body cap applied when the request shape declares no limit of its own.
pub const DEFAULT_MAX_FORM_BYTES: u64 = 10 << 20;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Form values keyed by name, each holding its values in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    entries: BTreeMap<String, Vec<String>>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` string.
    pub fn parse(input: &str) -> Result<Self, AdapterError> {
        let mut values = Self::new();
        values.extend_from_str(input)?;
        Ok(values)
    }

    /// Appends every pair of an urlencoded string, after the existing values.
    pub fn extend_from_str(&mut self, input: &str) -> Result<(), AdapterError> {
        for pair in input.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = unescape(key)?;
            let value = unescape(value)?;
            self.append(key, value);
        }
        Ok(())
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// All values submitted under exactly `key`.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// First value submitted under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Values for a struct field: an exact key match wins, otherwise the first
    /// key equal to `field` ignoring ASCII case.
    pub fn lookup_field(&self, field: &str) -> Option<&[String]> {
        self.get_all(field).or_else(|| {
            self.entries
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(field))
                .map(|(_, values)| values.as_slice())
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collects the values of a request: the urlencoded body first, for
    /// `POST`, `PUT` and `PATCH` requests that declare one, then the query
    /// string.
    pub async fn from_request(
        parts: &Parts,
        body: Body,
        limit: Option<u64>,
    ) -> Result<Self, AdapterError> {
        let mut values = Self::new();

        if has_form_body(parts) {
            let limit = limit.unwrap_or(DEFAULT_MAX_FORM_BYTES);
            let bytes = read_body(body, Some(limit))
                .await
                .map_err(|err| AdapterError::Parse(err.to_string()))?;
            let text = std::str::from_utf8(&bytes)
                .map_err(|err| AdapterError::Parse(format!("invalid form body: {err}")))?;
            values.extend_from_str(text)?;
        }

        if let Some(query) = parts.uri.query() {
            values.extend_from_str(query)?;
        }

        Ok(values)
    }
}

fn has_form_body(parts: &Parts) -> bool {
    if !matches!(parts.method, Method::POST | Method::PUT | Method::PATCH) {
        return false;
    }

    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        .unwrap_or(false)
}

fn unescape(raw: &str) -> Result<String, AdapterError> {
    check_escapes(raw)?;
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|err| AdapterError::Parse(format!("invalid form value {raw:?}: {err}")))
}

/// Every `%` must start a two hex digit escape.
fn check_escapes(raw: &str) -> Result<(), AdapterError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        match bytes.get(i + 1..i + 3) {
            Some(&[hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
            _ => {
                let escape = raw.get(i..i + 3).unwrap_or(&raw[i..]);
                return Err(AdapterError::Parse(format!("invalid URL escape {escape:?}")));
            }
        }
    }
    Ok(())
}
