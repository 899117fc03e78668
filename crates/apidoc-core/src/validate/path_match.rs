use log::debug;
use serde_json::{Map, Value};

/// Legacy prefix stripped from declared paths that belong to no router group.
/// Everything up to and including its first occurrence is removed.
pub const LEGACY_PREFIX: &str = "api";

/// True when the declared template and the request path are byte-identical.
pub fn is_exact_match(template: &str, request: &str) -> bool {
    template == request
}

/// True when `request` fills the parametric segments of `template`.
///
/// The template is compared as declared first. When it contains none of
/// `router_groups`, it is also compared with the legacy prefix stripped.
pub fn is_parametric_match(template: &str, request: &str, router_groups: &[String]) -> bool {
    parametric_rank(template, request, router_groups).is_some()
}

/// Rank of a parametric match: matches on the declared template beat
/// matches on the stripped one, then more literal segments in the form that
/// matched win. `None` when neither form matches.
fn parametric_rank(template: &str, request: &str, router_groups: &[String]) -> Option<(bool, usize)> {
    if segments_match(template, request) {
        return Some((true, literal_segments(template)));
    }
    if router_groups.iter().any(|group| template.contains(group.as_str())) {
        return None;
    }
    let (_, stripped) = template.split_once(LEGACY_PREFIX)?;
    segments_match(stripped, request).then(|| (false, literal_segments(stripped)))
}

/// Exact match first, then parametric.
pub fn matches(template: &str, request: &str, router_groups: &[String]) -> bool {
    is_exact_match(template, request) || is_parametric_match(template, request, router_groups)
}

/// Segment-wise comparison. `{param}` segments match any value without type
/// checking; literal segments must be equal, case-sensitively.
fn segments_match(template: &str, request: &str) -> bool {
    let template_parts: Vec<&str> = template.split('/').collect();
    let request_parts: Vec<&str> = request.split('/').collect();
    if template_parts.len() != request_parts.len() {
        return false;
    }
    template_parts
        .iter()
        .zip(&request_parts)
        .all(|(t, r)| t == r || is_parameter(t))
}

fn is_parameter(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// Number of non-empty literal (non-parameter) segments in a template.
pub fn literal_segments(template: &str) -> usize {
    template
        .split('/')
        .filter(|s| !s.is_empty() && !is_parameter(s))
        .count()
}

/// Find the declared path item that serves `request`.
///
/// An exact match always wins. Among parametric matches a template matched
/// as declared beats one matched after prefix stripping, then the most
/// literal segments win, ties going to the first in key order.
pub fn find_path<'a>(
    paths: &'a Map<String, Value>,
    request: &str,
    router_groups: &[String],
) -> Option<(&'a str, &'a Value)> {
    let exact = paths
        .iter()
        .find(|(template, _)| is_exact_match(template, request));
    if let Some((template, item)) = exact {
        return Some((template.as_str(), item));
    }

    let mut best: Option<(&'a str, &'a Value, (bool, usize))> = None;
    for (template, item) in paths {
        let Some(rank) = parametric_rank(template, request, router_groups) else {
            continue;
        };
        debug!("{template} matches {request} (declared form: {}, literal segments: {})", rank.0, rank.1);
        if best.is_none_or(|(_, _, best_rank)| rank > best_rank) {
            best = Some((template.as_str(), item, rank));
        }
    }
    best.map(|(template, item, _)| (template, item))
}
