//! Path template compilation and matching.
//!
//! Templates are `/`-separated literals with at most one `{id}` segment
//! (`/containers/{id}/json`). An optional leading API version segment
//! (`/v1.41/...`, `/v1/...`, `/v1.41.0/...`) is ignored when matching.

use ownergate_core::error::{OwnerGateError, Result};

const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Id,
}

/// Compiled GET path template.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    /// Compile a template; `expect_id` states whether `{id}` must appear (once).
    pub fn compile(raw: &str, expect_id: bool) -> Result<Self> {
        if !raw.starts_with('/') {
            return Err(OwnerGateError::BadRequest(format!(
                "invalid route template: {raw} (must start with /)"
            )));
        }

        let segments: Vec<Segment> = split(raw)
            .map(|s| {
                if s == ID_PLACEHOLDER {
                    Segment::Id
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();

        if segments.is_empty() {
            return Err(OwnerGateError::BadRequest(format!("invalid route template: {raw} (empty)")));
        }

        let ids = segments.iter().filter(|s| **s == Segment::Id).count();
        let want = usize::from(expect_id);
        if ids != want {
            return Err(OwnerGateError::BadRequest(format!(
                "invalid route template: {raw} (expected {want} {ID_PLACEHOLDER} segment, found {ids})"
            )));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `path` matches, with or without a version prefix.
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = split(path).collect();
        let parts = match parts.split_first() {
            Some((first, rest)) if is_version_segment(first) => rest,
            _ => &parts[..],
        };

        parts.len() == self.segments.len()
            && self.segments.iter().zip(parts).all(|(seg, part)| match seg {
                Segment::Id => true,
                Segment::Literal(l) => l.as_str() == *part,
            })
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// API version prefix as the engine router accepts it: `v` then digits and
/// dots with at least one digit (`v1.41`, `v1`, `v1.41.0`).
fn is_version_segment(s: &str) -> bool {
    let Some(rest) = s.strip_prefix('v') else {
        return false;
    };
    rest.bytes().all(|b| b.is_ascii_digit() || b == b'.') && rest.bytes().any(|b| b.is_ascii_digit())
}
