//! Request body decoding by declared content type.
//!
//! | Content-Type | Result |
//! |---|---|
//! | `application/json` | [`Body::Json`], or [`Error::Decode`] when malformed |
//! | `application/x-www-form-urlencoded`, `x-www-form-urlencoded` | [`Body::Form`] |
//! | anything else, or absent | [`Body::Text`], unmodified |
//!
//! Form pairs are split on the first `=` and are not percent-decoded.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::Error;

/// A request body after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Text(String),
    Form(HashMap<String, String>),
    Json(Value),
}

impl Default for Body {
    fn default() -> Self {
        Body::Text(String::new())
    }
}

impl Body {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_form(&self) -> Option<&HashMap<String, String>> {
        match self {
            Body::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Decoding selected by a `Content-Type` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Form,
    Raw,
}

impl ContentKind {
    /// Classify by media type; parameters such as `charset` are ignored.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return ContentKind::Raw;
        };
        let essence = content_type.split(';').next().unwrap_or_default().trim();

        if essence.eq_ignore_ascii_case("application/json") {
            ContentKind::Json
        } else if essence.eq_ignore_ascii_case("application/x-www-form-urlencoded")
            || essence.eq_ignore_ascii_case("x-www-form-urlencoded")
        {
            ContentKind::Form
        } else {
            ContentKind::Raw
        }
    }
}

/// Decode `raw` according to `content_type`.
pub fn decode(raw: &str, content_type: Option<&str>) -> Result<Body, Error> {
    match ContentKind::from_content_type(content_type) {
        ContentKind::Json => serde_json::from_str(raw).map(Body::Json).map_err(Error::Decode),
        ContentKind::Form => Ok(Body::Form(parse_form(raw))),
        ContentKind::Raw => Ok(Body::Text(raw.to_string())),
    }
}

/// Split `a=1&b=2` into a flat map. A pair without `=` maps to `""`;
/// a repeated key keeps its last value.
pub fn parse_form(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn form_body_becomes_map() {
        let body = decode("name=bob&age=5", Some("x-www-form-urlencoded")).unwrap();
        let form = body.as_form().unwrap();
        assert_eq!(form.len(), 2);
        assert_eq!(form["name"], "bob");
        assert_eq!(form["age"], "5");
    }

    #[test]
    fn standard_form_media_type_with_charset() {
        let body = decode("a=1", Some("application/x-www-form-urlencoded; charset=UTF-8")).unwrap();
        assert_eq!(body.as_form().unwrap()["a"], "1");
    }

    #[test]
    fn form_splits_on_first_equals_only() {
        let form = parse_form("token=a=b&flag");
        assert_eq!(form["token"], "a=b");
        assert_eq!(form["flag"], "");
    }

    #[test]
    fn form_is_not_percent_decoded() {
        let form = parse_form("q=a%20b+c");
        assert_eq!(form["q"], "a%20b+c");
    }

    #[test]
    fn json_body_parses() {
        let body = decode(r#"{"id": 7, "tags": ["a"]}"#, Some("application/json")).unwrap();
        assert_eq!(body, Body::Json(json!({"id": 7, "tags": ["a"]})));
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = decode("{not json", Some("application/json")).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn other_types_pass_through() {
        let raw = "name=bob&age=5";
        assert_eq!(decode(raw, Some("text/plain")).unwrap(), Body::Text(raw.into()));
        assert_eq!(decode(raw, None).unwrap(), Body::Text(raw.into()));
        assert_eq!(decode("{x", Some("text/json")).unwrap(), Body::Text("{x".into()));
    }

    #[test]
    fn classifies_content_types() {
        assert_eq!(ContentKind::from_content_type(Some("APPLICATION/JSON")), ContentKind::Json);
        assert_eq!(ContentKind::from_content_type(Some("multipart/form-data")), ContentKind::Raw);
        assert_eq!(ContentKind::from_content_type(None), ContentKind::Raw);
    }
}
