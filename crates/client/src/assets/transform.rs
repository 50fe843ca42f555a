//! Background injection for dark icons.
//!
//! Dark icons are usually light strokes on a transparent canvas, which
//! disappear on light launcher themes. When enabled, a full-size black
//! rectangle is inserted as the first child of the root `<svg>` element.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use svgl_core::cache::hash::transform_fingerprint;

/// Element inserted right after the opening root tag.
pub const BACKGROUND_PRIMITIVE: &str = r##"<rect width="100%" height="100%" fill="#000000"/>"##;

static ROOT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<svg\b[^>]*>").expect("root tag pattern is valid"));

/// Fingerprint stored in the marker file of a background-injected asset.
pub fn background_fingerprint() -> String {
    transform_fingerprint("background", BACKGROUND_PRIMITIVE)
}

/// Split `svg` right after its opening root tag.
///
/// `None` when there is no root element or it is self-closing.
fn split_after_root(svg: &str) -> Option<(&str, &str)> {
    let tag = ROOT_TAG.find(svg)?;
    if tag.as_str().ends_with("/>") {
        return None;
    }
    Some(svg.split_at(tag.end()))
}

/// Whether the root element of `svg` already starts with the primitive.
pub fn has_background(svg: &str) -> bool {
    split_after_root(svg).is_some_and(|(_, rest)| rest.trim_start().starts_with(BACKGROUND_PRIMITIVE))
}

/// Insert the background primitive after the opening root tag.
///
/// Input without a root element, with a self-closing root, or that already
/// starts with the primitive is returned unchanged, so applying this twice
/// gives the same bytes as applying it once.
pub fn inject_background(svg: &str) -> Cow<'_, str> {
    match split_after_root(svg) {
        Some((head, rest)) if !rest.trim_start().starts_with(BACKGROUND_PRIMITIVE) => {
            Cow::Owned(format!("{head}{BACKGROUND_PRIMITIVE}{rest}"))
        }
        _ => Cow::Borrowed(svg),
    }
}

/// Derive the displayed dark asset from the raw one.
pub fn derive_dark(raw: &str, add_background: bool) -> Cow<'_, str> {
    if add_background { inject_background(raw) } else { Cow::Borrowed(raw) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M0 0h24"/></svg>"#;

    #[test]
    fn test_injects_after_root_tag() {
        let out = inject_background(RAW);
        assert_eq!(
            out,
            format!(
                r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">{BACKGROUND_PRIMITIVE}<path d="M0 0h24"/></svg>"#
            )
        );
    }

    #[test]
    fn test_injection_is_idempotent() {
        let once = inject_background(RAW).into_owned();
        let twice = inject_background(&once).into_owned();
        assert_eq!(once, twice);
        assert_eq!(inject_background(RAW), inject_background(RAW));
    }

    #[test]
    fn test_disabled_is_byte_identical() {
        assert_eq!(derive_dark(RAW, false), RAW);
        assert!(matches!(derive_dark(RAW, false), Cow::Borrowed(_)));
    }

    #[test]
    fn test_ignores_svg_like_prefix() {
        let svg = r#"<svgfoo/><svg width="1"><g/></svg>"#;
        let out = inject_background(svg);
        assert!(out.starts_with(&format!(r#"<svgfoo/><svg width="1">{BACKGROUND_PRIMITIVE}"#)));
    }

    #[test]
    fn test_multiline_root_tag() {
        let svg = "<svg\n  xmlns=\"http://www.w3.org/2000/svg\"\n  fill=\"none\"\n>\n<path/></svg>";
        let out = inject_background(svg);
        assert!(out.contains(&format!(">{BACKGROUND_PRIMITIVE}\n<path/>")));
    }

    #[test]
    fn test_without_root_or_self_closing() {
        assert_eq!(inject_background("not an svg"), "not an svg");
        assert_eq!(inject_background("<svg/>"), "<svg/>");
    }

    #[test]
    fn test_has_background() {
        assert!(!has_background(RAW));
        assert!(has_background(&inject_background(RAW)));
        assert!(!has_background("<svg/>"));
        assert!(!has_background("plain text"));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(background_fingerprint(), background_fingerprint());
        assert_eq!(background_fingerprint().len(), 64);
    }
}
