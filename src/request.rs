use http::Method;
use smallvec::SmallVec;
use std::borrow::Cow;

/// Maximum number of path segments before heap allocation.
/// Dispatch paths are `/handler/method/arg...`, rarely deeper than a handful.
pub const MAX_INLINE_SEGMENTS: usize = 8;

/// Stack-allocated path segment storage
pub type SegmentVec = SmallVec<[String; MAX_INLINE_SEGMENTS]>;

/// Read-only view of an inbound request, as far as resolution cares.
///
/// Built once per request and never mutated during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    method: Method,
    path: String,
    segments: SegmentVec,
}

impl RouteRequest {
    /// Build a request view from an HTTP verb and a request target.
    ///
    /// Anything after `?` is discarded. Leading and trailing slashes are trimmed
    /// before splitting, so `/`, `` and `//` all yield no segments. Segments are
    /// percent-decoded; a segment that does not decode to UTF-8 is kept raw.
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let path = match target.find('?') {
            Some(pos) => &target[..pos],
            None => target,
        };
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let trimmed = path.trim_matches('/');
        let segments = if trimmed.is_empty() {
            SegmentVec::new()
        } else {
            trimmed
                .split('/')
                .map(|segment| match urlencoding::decode(segment) {
                    Ok(Cow::Borrowed(s)) => s.to_string(),
                    Ok(Cow::Owned(s)) => s,
                    Err(_) => segment.to_string(),
                })
                .collect()
        };

        Self {
            method,
            path,
            segments,
        }
    }

    /// Shorthand for a `GET` request
    #[must_use]
    pub fn get(target: &str) -> Self {
        Self::new(Method::GET, target)
    }

    /// HTTP verb
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path without query string, always starting with `/`
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// All decoded path segments in order
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segment at `index`, or `""` when the path is shorter
    #[inline]
    #[must_use]
    pub fn segment(&self, index: usize) -> &str {
        self.segments.get(index).map_or("", String::as_str)
    }

    /// Segments from `offset` onwards (empty when out of range)
    #[must_use]
    pub fn segments_from(&self, offset: usize) -> &[String] {
        self.segments.get(offset..).unwrap_or(&[])
    }
}
