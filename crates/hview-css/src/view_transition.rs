//! View-transition rule detection
//!
//! The controller only wraps a navigation in the host's transition
//! capability when the page opted in through its stylesheets with
//!
//! ```css
//! @view-transition {
//!     navigation: auto;
//! }
//! ```
//!
//! This module scans stylesheet text for that rule. It is a detector, not a
//! CSS parser; unrelated rules are skipped over.

use hview_dom::Document;

use crate::{Selector, query_all};

/// Whether `css` contains an `@view-transition` rule with `navigation: auto`
pub fn declares_auto_navigation(css: &str) -> bool {
    let css = strip_comments(css);
    let mut rest = css.as_str();

    while let Some(pos) = rest.find("@view-transition") {
        rest = &rest[pos + "@view-transition".len()..];
        let Some(open) = rest.find('{') else {
            return false;
        };
        // Nothing but whitespace may sit between the at-keyword and block.
        if !rest[..open].trim().is_empty() {
            continue;
        }
        let Some(close) = rest[open..].find('}') else {
            return false;
        };
        let block = &rest[open + 1..open + close];

        for decl in block.split(';') {
            let mut parts = decl.splitn(2, ':');
            let name = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();
            if name == "navigation" && value == "auto" {
                return true;
            }
        }
        rest = &rest[open + close..];
    }
    false
}

/// Whether any `<style>` element in the document declares an automatic
/// navigation-triggered view transition
pub fn document_has_auto_view_transition(doc: &Document) -> bool {
    let Ok(style) = Selector::parse("style") else {
        return false;
    };
    let root = doc.tree().root();
    let declared = query_all(doc.tree(), root, &style)
        .into_iter()
        .any(|node| declares_auto_navigation(&doc.tree().text_content(node)));
    if declared {
        tracing::debug!("document declares automatic view transitions");
    }
    declared
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start..].find("*/") {
            Some(end) => rest = &rest[start + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_auto_rule() {
        let css = "@view-transition { navigation: auto; }";
        assert!(declares_auto_navigation(css));
    }

    #[test]
    fn test_ignores_other_values() {
        assert!(!declares_auto_navigation("@view-transition { navigation: none; }"));
        assert!(!declares_auto_navigation("body { color: red; }"));
        assert!(!declares_auto_navigation(""));
    }

    #[test]
    fn test_rule_after_other_rules() {
        let css = r#"
            body { margin: 0; }
            .poster { view-transition-name: movie-42; }
            @view-transition {
                navigation: auto;
            }
        "#;
        assert!(declares_auto_navigation(css));
    }

    #[test]
    fn test_commented_out_rule() {
        let css = "/* @view-transition { navigation: auto; } */";
        assert!(!declares_auto_navigation(css));
    }

    #[test]
    fn test_document_scan() {
        let mut doc = Document::new("about:blank");
        let head = doc.head();
        let style = doc.tree_mut().create_element("style");
        let css = doc
            .tree_mut()
            .create_text("@view-transition { navigation: auto; }");
        doc.tree_mut().append_child(style, css).unwrap();
        doc.tree_mut().append_child(head, style).unwrap();

        assert!(document_has_auto_view_transition(&doc));
    }
}
