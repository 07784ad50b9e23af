//! Resource-name slug normalization and generated-suffix simplification.

use regex::Regex;
use std::sync::LazyLock;

/// Trailing generated-hash suffix on pod/replicaset names: a hyphen followed
/// by 9 or more lowercase alphanumerics at the end of the string.
static RE_GENERATED_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-[a-z0-9]{9,}$").unwrap());

/// Strip the auto-generated suffix from a workload-managed name, collapsing
/// e.g. `web-app-7f9c8d6b5` back to `web-app`. Heuristic: a name that
/// legitimately ends in nine-plus alphanumerics also gets stripped.
pub fn simplify_name(name: &str) -> String {
    RE_GENERATED_SUFFIX.replace(name, "").into_owned()
}

/// Turn conversational phrasing into a cluster-name-safe slug: lower-case,
/// drop generic type words, spaces to hyphens, keep only `[a-z0-9-]`.
///
/// "My Web Service" becomes `my-web`. An empty result means the caller has
/// no usable name, not that the empty string is a valid name.
pub fn normalize_resource_name(raw: &str) -> String {
    let mut name = raw.to_lowercase();
    for word in [" svc", " service", " pod", " deployment"] {
        name = name.replace(word, "");
    }
    name.replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_suffix_stripped() {
        assert_eq!(simplify_name("web-app-7f9c8d6b5"), "web-app");
        assert_eq!(simplify_name("coredns-565d847f94"), "coredns");
    }

    #[test]
    fn suffix_cannot_span_a_hyphen() {
        // Final segment is only 5 chars; the class excludes '-'.
        assert_eq!(simplify_name("api-6d4cf56db6-77f9k"), "api-6d4cf56db6-77f9k");
    }

    #[test]
    fn short_suffix_untouched() {
        assert_eq!(simplify_name("short-abc"), "short-abc");
    }

    #[test]
    fn exact_nine_char_suffix_stripped() {
        assert_eq!(simplify_name("web-abcdefghi"), "web");
    }

    #[test]
    fn name_without_hyphen_untouched() {
        assert_eq!(simplify_name("kubeproxy"), "kubeproxy");
    }

    #[test]
    fn slug_strips_type_words() {
        assert_eq!(normalize_resource_name("my web service"), "my-web");
        assert_eq!(normalize_resource_name("My Web Service"), "my-web");
        assert_eq!(normalize_resource_name("billing svc"), "billing");
        assert_eq!(normalize_resource_name("the nginx pod"), "the-nginx");
        assert_eq!(normalize_resource_name("cart deployment"), "cart");
    }

    #[test]
    fn slug_removes_invalid_characters() {
        assert_eq!(normalize_resource_name("Frontend_v2!"), "frontendv2");
        assert_eq!(normalize_resource_name("db.primary"), "dbprimary");
    }

    #[test]
    fn slug_of_only_type_words_is_empty() {
        assert_eq!(normalize_resource_name("the service"), "the");
        assert_eq!(normalize_resource_name(" service"), "");
    }
}
