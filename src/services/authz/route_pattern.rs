/*
 * Responsibility
 * - Compile a view's route pattern once, match request paths against it many times
 * - Pattern language: literal segments + `*` (exactly one non-empty segment)
 * - No `**`, no prefix matching, no regex
 */
use serde::{Deserialize, Serialize};

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Wildcard,
}

/// A route pattern compiled from a view's `routePattern` column.
///
/// Built once per view (when a grant snapshot is assembled) and reused for
/// every `matches` call. Malformed patterns do not compile, so they can never
/// match; the evaluator stays total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
    has_wildcard: bool,
}

impl RoutePattern {
    /// Compile a pattern string. Returns `None` for malformed input:
    /// - empty string or missing leading `/`
    /// - an empty segment (`//`, trailing `/`)
    pub fn compile(pattern: &str) -> Option<Self> {
        let rest = pattern.strip_prefix('/')?;
        if rest.is_empty() {
            // "/" alone is a valid single-literal root pattern
            return Some(Self {
                raw: pattern.to_string(),
                segments: Vec::new(),
                has_wildcard: false,
            });
        }

        let mut segments = Vec::new();
        let mut has_wildcard = false;
        for part in rest.split('/') {
            if part.is_empty() {
                return None;
            }
            if part == "*" {
                has_wildcard = true;
                segments.push(Segment::Wildcard);
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Some(Self {
            raw: pattern.to_string(),
            segments,
            has_wildcard,
        })
    }

    /// Match a concrete request path against this pattern.
    ///
    /// Without wildcards this is exact string equality. With wildcards both
    /// sides are split on `/`, segment counts must be equal, literals must
    /// match exactly, and each `*` consumes exactly one non-empty segment.
    pub fn matches(&self, request_path: &str) -> bool {
        if !self.has_wildcard {
            return self.raw == request_path;
        }

        let Some(rest) = request_path.strip_prefix('/') else {
            return false;
        };

        let mut request_segments = rest.split('/');
        for segment in &self.segments {
            let Some(req) = request_segments.next() else {
                // request has fewer segments than the pattern
                return false;
            };
            match segment {
                Segment::Literal(lit) => {
                    if lit != req {
                        return false;
                    }
                }
                Segment::Wildcard => {
                    if req.is_empty() {
                        return false;
                    }
                }
            }
        }

        // request must not have extra segments
        request_segments.next().is_none()
    }
}

impl Serialize for RoutePattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for RoutePattern {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RoutePattern::compile(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("malformed route pattern: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(p: &str) -> RoutePattern {
        RoutePattern::compile(p).expect("pattern should compile")
    }

    #[test]
    fn exact_match_without_wildcard() {
        let p = compile("/leads/nuevo");
        assert!(p.matches("/leads/nuevo"));
        assert!(!p.matches("/leads/nuevo/"));
        assert!(!p.matches("/leads"));
        assert!(!p.matches("/leads/nuevo/extra"));
    }

    #[test]
    fn wildcard_matches_exactly_one_segment() {
        let p = compile("/companias/*/editar");
        assert!(p.matches("/companias/123/editar"));
        assert!(p.matches("/companias/abc-def/editar"));
        assert!(!p.matches("/companias/123/456/editar"));
        assert!(!p.matches("/companias/editar"));
        assert!(!p.matches("/companias//editar"));
    }

    #[test]
    fn wildcard_is_not_a_suffix_glob() {
        let p = compile("/polizas/*");
        assert!(p.matches("/polizas/9"));
        assert!(!p.matches("/polizas/9/detalle"));
        assert!(!p.matches("/polizas"));
    }

    #[test]
    fn multiple_wildcards() {
        let p = compile("/roles/*/vistas/*");
        assert!(p.matches("/roles/2/vistas/7"));
        assert!(!p.matches("/roles/2/vistas"));
        assert!(!p.matches("/roles/2/vistas/7/permisos"));
    }

    #[test]
    fn root_pattern() {
        let p = compile("/");
        assert!(p.matches("/"));
        assert!(!p.matches("/inicio"));
    }

    #[test]
    fn malformed_patterns_do_not_compile() {
        assert!(RoutePattern::compile("").is_none());
        assert!(RoutePattern::compile("leads").is_none());
        assert!(RoutePattern::compile("/leads//nuevo").is_none());
        assert!(RoutePattern::compile("/leads/").is_none());
    }

    #[test]
    fn request_without_leading_slash_never_matches_wildcard_pattern() {
        let p = compile("/companias/*/editar");
        assert!(!p.matches("companias/123/editar"));
    }

    #[test]
    fn round_trips_through_serde_as_string() {
        let p = compile("/companias/*/editar");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"/companias/*/editar\"");
        let back: RoutePattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
