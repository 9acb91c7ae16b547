//! The `actions.json` glob rule mapper.
//!
//! A site publishes an ordered rule table mapping page paths to action API
//! paths. Globs support `*` (exactly one non-empty path segment) and `**`
//! (zero or more segments). First matching rule wins; rule order is
//! caller-significant.

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// One mapping rule of an `actions.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRule {
    /// Glob matched against the page URL.
    pub path_pattern: String,
    /// Glob target the captures substitute into.
    pub api_path: String,
}

/// The `actions.json` document: rules in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRuleset {
    /// Rules, first match wins.
    pub rules: Vec<ActionRule>,
}

/// Map a page URL through a ruleset.
///
/// Relative patterns and targets are absolutized against the page origin.
/// Matching runs against `{origin}{pathname}`; the original query string is
/// reattached verbatim. No rule matching ⇒ `None`.
#[must_use]
pub fn map_url(ruleset: &ActionRuleset, url: &Url) -> Option<Url> {
    let origin = url.origin().ascii_serialization();
    let target = format!("{}{}", origin, url.path());

    for rule in &ruleset.rules {
        let pattern = absolutize(&rule.path_pattern, &origin);
        let Some(regex) = compile_glob(&pattern) else {
            tracing::debug!(pattern = %rule.path_pattern, "skipping uncompilable rule");
            continue;
        };
        let Some(captures) = regex.captures(&target) else {
            continue;
        };

        let captured: Vec<&str> = captures
            .iter()
            .skip(1)
            .map(|m| m.map_or("", |m| m.as_str()))
            .collect();
        let api_path = absolutize(&rule.api_path, &origin);
        let mut mapped = substitute(&api_path, &captured);
        if let Some(query) = url.query() {
            mapped.push('?');
            mapped.push_str(query);
        }
        return Url::parse(&mapped).ok();
    }
    None
}

fn absolutize(path_or_url: &str, origin: &str) -> String {
    if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
        path_or_url.to_string()
    } else if path_or_url.starts_with('/') {
        format!("{origin}{path_or_url}")
    } else {
        format!("{origin}/{path_or_url}")
    }
}

/// Compile a glob to an anchored regex: `**` ⇒ `(.*)`, `*` ⇒ `([^/]+)`,
/// everything else escaped literally.
fn compile_glob(glob: &str) -> Option<Regex> {
    let mut pattern = String::with_capacity(glob.len() + 8);
    pattern.push('^');
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '*' {
            if chars.peek() == Some(&'*') {
                chars.next();
                pattern.push_str("(.*)");
            } else {
                pattern.push_str("([^/]+)");
            }
        } else {
            pattern.push_str(&regex::escape(&c.to_string()));
        }
    }
    pattern.push('$');
    Regex::new(&pattern).ok()
}

/// Substitute captures positionally into the target's wildcard markers, in
/// encounter order; markers beyond the captures are dropped.
fn substitute(target: &str, captures: &[&str]) -> String {
    let mut out = String::with_capacity(target.len());
    let mut next = 0usize;
    let mut chars = target.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '*' {
            if chars.peek() == Some(&'*') {
                chars.next();
            }
            if let Some(value) = captures.get(next) {
                out.push_str(value);
                next += 1;
            }
        } else {
            out.push(c);
        }
    }
    out
}
