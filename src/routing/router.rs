//! Handler registry and route lookup.
//!
//! # Responsibilities
//! - Store registered handlers with their pre-parsed patterns
//! - Look up the first handler whose method and pattern match a request
//! - Return the match with extracted parameters, or explicit no-match
//!
//! # Design Decisions
//! - Ordered by registration; the first match wins
//! - No duplicate detection: the same handler may be registered twice
//! - Mutable only through `&mut Router`; the server freezes it behind an
//!   `Arc` before serving
//! - O(n) scan (acceptable for typical route counts)

use std::sync::Arc;

use crate::routing::handler::Handler;
use crate::routing::matcher::{MatchPolicy, Params, RoutePattern};
use crate::routing::method::Method;

struct Registered {
    method: Method,
    pattern: RoutePattern,
    handler: Arc<dyn Handler>,
}

/// A handler selected for a request.
pub struct RouteMatch<'a> {
    pub handler: &'a Arc<dyn Handler>,
    pub pattern: &'a RoutePattern,
    pub params: Params,
}

/// Ordered set of registered handlers.
#[derive(Default)]
pub struct Router {
    routes: Vec<Registered>,
    policy: MatchPolicy,
}

impl Router {
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            routes: Vec::new(),
            policy,
        }
    }

    /// Add a handler. Chainable.
    pub fn register<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.register_shared(Arc::new(handler))
    }

    /// Add an already shared handler. Chainable.
    pub fn register_shared(&mut self, handler: Arc<dyn Handler>) -> &mut Self {
        let method = handler.method();
        let pattern = RoutePattern::new(handler.route());

        if let Err(e) = pattern.validate() {
            tracing::warn!(route = %pattern, error = %e, "Registering malformed route");
        }
        if method == Method::Unset {
            tracing::warn!(route = %pattern, "Handler has no method and will never match");
        }
        tracing::debug!(method = %method, route = %pattern, "Handler registered");

        self.routes.push(Registered {
            method,
            pattern,
            handler,
        });
        self
    }

    /// First handler whose method equals `method` (case-sensitive) and whose
    /// pattern matches `path`.
    pub fn find(&self, method: &str, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .find(|r| r.method.matches(method) && r.pattern.matches(path, self.policy))
            .map(|r| RouteMatch {
                handler: &r.handler,
                pattern: &r.pattern,
                params: r.pattern.extract_params(path),
            })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.routes.iter().map(|r| (r.method, r.pattern.as_str())))
            .finish()
    }
}
