//! Test name decomposition
//!
//! Composite test names embed bracketed labels, e.g.
//! `[sig-storage] [Feature:X] does a thing`. The leading label is the
//! *context*; every label anywhere in the name is a *tag*. The simplified
//! name is what is left once those fragments are removed.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Leading bracketed label: `[sig-storage] ...`
    static ref CONTEXT_PATTERN: Regex = Regex::new(
        r"^\[(?P<label>[\w\-.]+)\]"
    ).unwrap();

    /// Any bracketed label; also admits `:` and `/` (`[Feature:X]`, `[Suite:openshift/conformance]`)
    static ref TAG_PATTERN: Regex = Regex::new(
        r"\[(?P<label>[\w\-.:/]+)\]"
    ).unwrap();
}

/// The parts of a composite test name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecomposedName {
    /// Leading bracketed label, or empty
    pub context: String,
    /// Every bracketed label in order of appearance (includes the context)
    pub tags: Vec<String>,
    /// Name with the labels removed
    pub simple_name: String,
}

/// Extract the context label anchored at the start of `name`.
///
/// Returns an empty string when the name does not start with a label.
pub fn extract_context(name: &str) -> String {
    CONTEXT_PATTERN
        .captures(name)
        .and_then(|caps| caps.name("label"))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Extract every bracketed label in `name`, left to right.
///
/// Duplicates are kept and the context label is included.
pub fn extract_tags(name: &str) -> Vec<String> {
    TAG_PATTERN
        .captures_iter(name)
        .filter_map(|caps| caps.name("label"))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Remove every `[tag]` from `name`, then the first `[context] `.
///
/// Tags are matched literally. Whitespace the name already had is kept as
/// is; only the gap that removed leading labels leave in front of the first
/// word is dropped. A name with nothing removed is returned unchanged.
pub fn simplify(name: &str, context: &str, tags: &[String]) -> String {
    let mut simple = name.to_string();

    for tag in tags {
        simple = simple.replace(&format!("[{}]", tag), "");
    }

    if !context.is_empty() {
        simple = simple.replacen(&format!("[{}] ", context), "", 1);
    }

    if simple == name {
        return simple;
    }

    // Drop the gap left by removed leading labels, keep the name's own indent
    let indent = &name[..name.len() - name.trim_start().len()];
    format!("{}{}", indent, simple.trim_start())
}

/// Run all three extraction steps over a raw name.
pub fn decompose(name: &str) -> DecomposedName {
    let context = extract_context(name);
    let tags = extract_tags(name);
    let simple_name = simplify(name, &context, &tags);

    DecomposedName {
        context,
        tags,
        simple_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORAGE_TEST: &str = "[sig-storage] [Feature:X] does a thing";

    #[test]
    fn test_extract_context() {
        assert_eq!(extract_context("[sig-storage] does a thing"), "sig-storage");
        assert_eq!(extract_context("[k8s.io] Pods should run"), "k8s.io");
    }

    #[test]
    fn test_extract_context_no_brackets() {
        assert_eq!(extract_context("no brackets here"), "");
    }

    #[test]
    fn test_extract_context_must_be_anchored() {
        assert_eq!(extract_context("does a thing [sig-storage]"), "");
        assert_eq!(extract_context(" [sig-storage] leading space"), "");
    }

    #[test]
    fn test_extract_context_rejects_colon_label() {
        // ':' is only valid in tags
        assert_eq!(extract_context("[Feature:X] does a thing"), "");
        assert_eq!(extract_tags("[Feature:X] does a thing"), vec!["Feature:X"]);
    }

    #[test]
    fn test_extract_tags_includes_context() {
        assert_eq!(extract_tags(STORAGE_TEST), vec!["sig-storage", "Feature:X"]);
    }

    #[test]
    fn test_extract_tags_keeps_duplicates() {
        assert_eq!(
            extract_tags("[Slow] a [Serial] b [Slow]"),
            vec!["Slow", "Serial", "Slow"]
        );
    }

    #[test]
    fn test_extract_tags_with_slash() {
        assert_eq!(
            extract_tags("[sig-apps] works [Suite:openshift/conformance/parallel]"),
            vec!["sig-apps", "Suite:openshift/conformance/parallel"]
        );
    }

    #[test]
    fn test_extract_tags_ignores_unsupported_characters() {
        assert!(extract_tags("[has space] and [] empty").is_empty());
    }

    #[test]
    fn test_simplify() {
        let tags = vec!["sig-storage".to_string(), "Feature:X".to_string()];
        assert_eq!(simplify(STORAGE_TEST, "sig-storage", &tags), "does a thing");
    }

    #[test]
    fn test_simplify_keeps_inner_whitespace() {
        let name = "[sig-apps] runs [Slow] fast ";
        let tags = extract_tags(name);
        assert_eq!(simplify(name, "sig-apps", &tags), "runs  fast ");
    }

    #[test]
    fn test_simplify_keeps_own_leading_whitespace() {
        assert_eq!(decompose("  indented name [Slow]").simple_name, "  indented name ");
        assert_eq!(decompose(" [Slow] x").simple_name, " x");
    }

    #[test]
    fn test_simplify_treats_tags_literally() {
        let tags = vec!["a.b".to_string()];
        assert_eq!(simplify("x [a.b] [axb]", "", &tags), "x  [axb]");
    }

    #[test]
    fn test_simplify_removes_context_once() {
        // Only reachable when context is not also passed as a tag
        assert_eq!(simplify("[c] one [c] two", "c", &[]), "one [c] two");
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let once = decompose(STORAGE_TEST).simple_name;
        let twice = decompose(&once);
        assert_eq!(twice.simple_name, once);
        assert!(twice.context.is_empty());
        assert!(twice.tags.is_empty());
    }

    #[test]
    fn test_decompose_no_brackets() {
        let parts = decompose(" plain old test name");
        assert_eq!(parts.context, "");
        assert!(parts.tags.is_empty());
        assert_eq!(parts.simple_name, " plain old test name");
    }

    #[test]
    fn test_decompose_adjacent_tag_after_context() {
        let parts = decompose("[sig-node][Feature:Y] pod runs");
        assert_eq!(parts.context, "sig-node");
        assert_eq!(parts.tags, vec!["sig-node", "Feature:Y"]);
        assert_eq!(parts.simple_name, "pod runs");
    }
}
