//! Route pattern parsing and path matching.
//!
//! # Responsibilities
//! - Split a registered pattern into literal and `:param` segments
//! - Decide whether a request path has the pattern's shape
//! - Extract named parameters from the request path
//!
//! # Design Decisions
//! - Patterns are parsed once, at registration, and never change
//! - Baseline policy compares segment counts only; literal segments are
//!   not compared. `MatchPolicy::Strict` is the opt-in stricter variant
//! - Segments are split on `/` exactly like `str::split`, so a leading
//!   slash produces an empty first segment

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Parameters bound from a request path, keyed by name without the `:`.
pub type Params = HashMap<String, String>;

const PARAM_PREFIX: char = ':';

/// How a request path is compared against a pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Equal segment count is the only check.
    #[default]
    SegmentCount,
    /// Equal segment count and every literal segment equal.
    Strict,
}

/// One slash-delimited piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// A registered path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw
            .split('/')
            .map(|s| match s.strip_prefix(PARAM_PREFIX) {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self { raw, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the `:param` segments, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Structural checks. Matching never calls this; registration only warns.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |reason| Error::InvalidRouteProvided {
            route: self.raw.clone(),
            reason,
        };

        if self.raw.is_empty() {
            return Err(invalid("pattern is empty"));
        }
        if !self.raw.starts_with('/') {
            return Err(invalid("pattern must start with '/'"));
        }
        let mut seen = Vec::new();
        for name in self.param_names() {
            if name.is_empty() {
                return Err(invalid("parameter segment has no name"));
            }
            if seen.contains(&name) {
                return Err(invalid("parameter name is used twice"));
            }
            seen.push(name);
        }
        Ok(())
    }

    /// Whether `path` has this pattern's shape under `policy`.
    pub fn matches(&self, path: &str, policy: MatchPolicy) -> bool {
        if path.split('/').count() != self.segments.len() {
            return false;
        }
        match policy {
            MatchPolicy::SegmentCount => true,
            MatchPolicy::Strict => self
                .segments
                .iter()
                .zip(path.split('/'))
                .all(|(segment, part)| match segment {
                    Segment::Literal(literal) => literal == part,
                    Segment::Param(_) => true,
                }),
        }
    }

    /// Bind every `:param` to the same-index segment of `path`.
    ///
    /// A parameter whose index is past the end of `path` is left out.
    pub fn extract_params(&self, path: &str) -> Params {
        let parts: Vec<&str> = path.split('/').collect();
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(i, segment)| match segment {
                Segment::Param(name) => parts.get(i).map(|v| (name.clone(), v.to_string())),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

impl From<&str> for RoutePattern {
    fn from(raw: &str) -> Self {
        RoutePattern::new(raw)
    }
}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_segment_count_matches_regardless_of_literals() {
        let pattern = RoutePattern::new("/users/:id");
        assert!(pattern.matches("/orders/42", MatchPolicy::SegmentCount));
        assert!(pattern.matches("/users/42", MatchPolicy::SegmentCount));
    }

    #[test]
    fn differing_segment_count_never_matches() {
        let pattern = RoutePattern::new("/users/:id");
        assert!(!pattern.matches("/users/42/edit", MatchPolicy::SegmentCount));
        assert!(!pattern.matches("/users", MatchPolicy::SegmentCount));
        assert!(!pattern.matches("/users/42/edit", MatchPolicy::Strict));
    }

    #[test]
    fn strict_policy_compares_literals() {
        let pattern = RoutePattern::new("/users/:id");
        assert!(pattern.matches("/users/42", MatchPolicy::Strict));
        assert!(!pattern.matches("/orders/42", MatchPolicy::Strict));
    }

    #[test]
    fn trailing_slash_adds_a_segment() {
        let pattern = RoutePattern::new("/users");
        assert!(!pattern.matches("/users/", MatchPolicy::SegmentCount));
        assert!(RoutePattern::new("/").matches("/", MatchPolicy::SegmentCount));
    }

    #[test]
    fn empty_pattern_never_matches_a_url_path() {
        let pattern = RoutePattern::new("");
        assert!(!pattern.matches("/", MatchPolicy::SegmentCount));
        assert!(!pattern.matches("/anything", MatchPolicy::SegmentCount));
    }

    #[test]
    fn extracts_named_params() {
        let pattern = RoutePattern::new("/users/:id");
        let params = pattern.extract_params("/users/42");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn extracts_several_params() {
        let pattern = RoutePattern::new("/users/:user/posts/:post");
        let params = pattern.extract_params("/users/7/posts/99");
        assert_eq!(params["user"], "7");
        assert_eq!(params["post"], "99");
    }

    #[test]
    fn short_path_leaves_param_absent() {
        let pattern = RoutePattern::new("/a/:b/:c");
        let params = pattern.extract_params("/a/1");
        assert_eq!(params.get("b").map(String::as_str), Some("1"));
        assert!(!params.contains_key("c"));
    }

    #[test]
    fn param_values_are_raw_segments() {
        let pattern = RoutePattern::new("/files/:name");
        let params = pattern.extract_params("/files/a%20b");
        assert_eq!(params["name"], "a%20b");
    }

    #[test]
    fn validate_flags_malformed_patterns() {
        assert!(RoutePattern::new("/users/:id").validate().is_ok());
        assert!(RoutePattern::new("").validate().is_err());
        assert!(RoutePattern::new("users").validate().is_err());
        assert!(RoutePattern::new("/users/:").validate().is_err());

        let err = RoutePattern::new("/:id/:id").validate().unwrap_err();
        assert_eq!(err.kind(), "invalid_route");
    }
}
