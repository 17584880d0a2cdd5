//! Ordered route authorization rules.
//!
//! Rules are evaluated top to bottom and the first rule whose method and
//! path match decides the request. A specific rule must therefore be
//! declared before any broader rule that also covers its path.

use std::fmt;

use http::Method;
use teamtempo_core::SecurityRole;

use crate::context::SecurityContext;

// =============================================================================
// Path Patterns
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*` or `{name}`: exactly one non-empty segment.
    Any,
}

/// A route pattern such as `/teams/{uuid}/projects` or `/teams/**`.
///
/// Supported syntax:
/// - literal segments, matched exactly
/// - `*` or `{name}`, matching one non-empty segment
/// - a trailing `/**`, matching zero or more further segments
#[derive(Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    trailing_wildcard: bool,
}

impl PathPattern {
    /// Parse a pattern.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let mut parts = split_path(pattern);
        let trailing_wildcard = parts.last() == Some(&"**");
        if trailing_wildcard {
            parts.pop();
        }

        let segments = parts
            .into_iter()
            .map(|part| {
                if part == "*" || (part.starts_with('{') && part.ends_with('}')) {
                    Segment::Any
                } else {
                    Segment::Literal(part.to_string())
                }
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
            trailing_wildcard,
        }
    }

    /// Whether `path` matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let parts = split_path(path);

        let length_ok = if self.trailing_wildcard {
            parts.len() >= self.segments.len()
        } else {
            parts.len() == self.segments.len()
        };

        length_ok
            && self
                .segments
                .iter()
                .zip(&parts)
                .all(|(segment, part)| match segment {
                    Segment::Literal(literal) => literal == part,
                    Segment::Any => !part.is_empty(),
                })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PathPattern({})", self.raw)
    }
}

fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

// =============================================================================
// Rules
// =============================================================================

/// One entry of the rule table.
#[derive(Debug, Clone)]
pub struct AuthorizationRule {
    /// Path pattern the rule applies to.
    pub pattern: PathPattern,
    /// Method the rule applies to; `None` matches every method.
    pub method: Option<Method>,
    /// Roles allowed through. Ignored when `permit_without_auth` is set.
    pub required_roles: Vec<SecurityRole>,
    /// Allow the request even without a principal.
    pub permit_without_auth: bool,
}

impl AuthorizationRule {
    /// Allow everyone, authenticated or not.
    #[must_use]
    pub fn permit_all(pattern: &str) -> Self {
        Self {
            pattern: PathPattern::new(pattern),
            method: None,
            required_roles: Vec::new(),
            permit_without_auth: true,
        }
    }

    /// Allow authenticated principals holding one of `roles`.
    #[must_use]
    pub fn has_any_role(pattern: &str, roles: &[SecurityRole]) -> Self {
        Self {
            pattern: PathPattern::new(pattern),
            method: None,
            required_roles: roles.to_vec(),
            permit_without_auth: false,
        }
    }

    /// Allow any authenticated principal.
    #[must_use]
    pub fn authenticated(pattern: &str) -> Self {
        Self::has_any_role(pattern, &SecurityRole::ALL)
    }

    /// Restrict the rule to one HTTP method.
    #[must_use]
    pub fn for_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Whether this rule applies to the request.
    #[must_use]
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().map_or(true, |m| m == method) && self.pattern.matches(path)
    }

    fn decide(&self, context: &SecurityContext) -> AccessDecision {
        if self.permit_without_auth {
            return AccessDecision::Granted;
        }
        match context.principal() {
            None => AccessDecision::Unauthenticated,
            Some(principal) if principal.has_any_role(&self.required_roles) => {
                AccessDecision::Granted
            }
            Some(_) => AccessDecision::Forbidden,
        }
    }
}

/// Outcome of evaluating the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The request may proceed.
    Granted,
    /// A principal is required and none is present.
    Unauthenticated,
    /// The principal lacks the required role.
    Forbidden,
}

/// Ordered, first-match-wins list of rules.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<AuthorizationRule>,
}

impl RuleTable {
    /// Build a table from rules in evaluation order.
    #[must_use]
    pub const fn new(rules: Vec<AuthorizationRule>) -> Self {
        Self { rules }
    }

    /// The rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[AuthorizationRule] {
        &self.rules
    }

    /// The first rule matching the request, with its position.
    #[must_use]
    pub fn first_match(&self, method: &Method, path: &str) -> Option<(usize, &AuthorizationRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(method, path))
    }

    /// Decide whether the request may proceed.
    ///
    /// A request no rule matches is granted only when authenticated.
    #[must_use]
    pub fn evaluate(&self, method: &Method, path: &str, context: &SecurityContext) -> AccessDecision {
        match self.first_match(method, path) {
            Some((index, rule)) => {
                let decision = rule.decide(context);
                tracing::debug!(
                    %method,
                    path,
                    rule = index,
                    pattern = rule.pattern.as_str(),
                    ?decision,
                    "Authorization rule matched"
                );
                decision
            }
            None if context.is_authenticated() => AccessDecision::Granted,
            None => AccessDecision::Unauthenticated,
        }
    }
}

impl Default for RuleTable {
    /// Public auth endpoints and health, then role checks for the planning
    /// resources. Anything else needs a principal.
    fn default() -> Self {
        Self::new(vec![
            AuthorizationRule::permit_all("/auth/login"),
            AuthorizationRule::permit_all("/auth/signup"),
            AuthorizationRule::authenticated("/auth/logout"),
            AuthorizationRule::permit_all("/health"),
            AuthorizationRule::has_any_role("/teams/**", &SecurityRole::ALL),
            AuthorizationRule::has_any_role("/projects/**", &SecurityRole::ALL),
        ])
    }
}
