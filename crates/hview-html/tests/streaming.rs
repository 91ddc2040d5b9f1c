//! Stream session tests - response bytes to live DOM nodes
//!
//! Covers the delivery rules: unfiltered streams land whole, filtered
//! streams keep only matching elements in arrival order, and nodes appear
//! in the destination before the stream has finished.

use hview_css::Selector;
use hview_dom::{Document, NodeId};
use hview_html::{HtmlStream, StreamError};
use hview_net::Response;

fn target(doc: &mut Document) -> NodeId {
    let div = doc.tree_mut().create_element("div");
    let body = doc.body();
    doc.tree_mut().append_child(body, div).unwrap();
    div
}

#[test]
fn test_streams_static_html_into_element() {
    smol::block_on(async {
        let mut doc = Document::new("https://example.com/");
        let dest = target(&mut doc);

        let stream = HtmlStream::new(Response::html("Hello")).unwrap();
        stream.stream_to(&mut doc, dest).await.unwrap();

        assert_eq!(doc.tree().text_content(dest), "Hello");
    });
}

#[test]
fn test_streams_selected_parts() {
    smol::block_on(async {
        let mut doc = Document::new("https://example.com/");
        let dest = target(&mut doc);

        let selector = Selector::parse("section").unwrap();
        let response = Response::html("No <section>Hello</section>");
        let stream = HtmlStream::with_selector(response, selector).unwrap();
        stream.stream_to(&mut doc, dest).await.unwrap();

        assert_eq!(doc.tree().text_content(dest), "Hello");
    });
}

#[test]
fn test_streams_multiple_parts_in_order() {
    smol::block_on(async {
        let mut doc = Document::new("https://example.com/");
        let dest = target(&mut doc);

        let selector = Selector::parse("span").unwrap();
        let response = Response::html("<span>Hel</span>junk junk <span>lo</span>");
        let stream = HtmlStream::with_selector(response, selector).unwrap();
        stream.stream_to(&mut doc, dest).await.unwrap();

        assert_eq!(doc.tree().text_content(dest), "Hello");
    });
}

#[test]
fn test_chunk_boundary_inside_tags() {
    smol::block_on(async {
        let mut doc = Document::new("https://example.com/");
        let dest = target(&mut doc);

        let selector = Selector::parse("span").unwrap();
        let response = Response::chunked(["<span>H", "el</span>junk <spa", "n>lo</span>"]);
        let stream = HtmlStream::with_selector(response, selector).unwrap();
        stream.stream_to(&mut doc, dest).await.unwrap();

        assert_eq!(doc.tree().text_content(dest), "Hello");
    });
}

#[test]
fn test_delivers_before_stream_ends() {
    smol::block_on(async {
        let mut doc = Document::new("https://example.com/");
        let dest = target(&mut doc);

        let selector = Selector::parse("span").unwrap();
        let response = Response::chunked(["<span>Hel</span>rest ", "<span>lo</span>"]);
        let mut stream = HtmlStream::with_selector(response, selector).unwrap();

        // First chunk: the closed <span> is stable and lands immediately.
        assert!(stream.advance(&mut doc, dest).await.unwrap());
        assert_eq!(doc.tree().text_content(dest), "Hel");

        assert!(stream.advance(&mut doc, dest).await.unwrap());
        while stream.advance(&mut doc, dest).await.unwrap() {}

        assert_eq!(doc.tree().text_content(dest), "Hello");
    });
}

#[test]
fn test_nested_match_inside_wrapper() {
    smol::block_on(async {
        let mut doc = Document::new("https://example.com/");
        let dest = target(&mut doc);

        let selector = Selector::parse("section").unwrap();
        let response = Response::html("<div>junk<section>Hello</section></div>");
        let stream = HtmlStream::with_selector(response, selector).unwrap();
        stream.stream_to(&mut doc, dest).await.unwrap();

        assert_eq!(doc.tree().text_content(dest), "Hello");
    });
}

#[test]
fn test_placeholder_filter() {
    smol::block_on(async {
        let mut doc = Document::new("https://example.com/");
        let dest = target(&mut doc);

        let selector = Selector::parse("h-template[for]").unwrap();
        let response = Response::html(
            r#"<header>junk</header><h-template for="people"><ul><li>Ada</li></ul></h-template>"#,
        );
        let stream = HtmlStream::with_selector(response, selector).unwrap();
        stream.stream_to(&mut doc, dest).await.unwrap();

        // Only the placeholder landed, with its subtree intact.
        let children = doc.tree().child_ids(dest);
        assert_eq!(children.len(), 1);
        let tpl = children[0];
        assert_eq!(doc.tree().attr(tpl, "for"), Some("people"));
        assert_eq!(doc.tree().text_content(tpl), "Ada");
    });
}

#[test]
fn test_no_body_is_stream_unavailable() {
    let result = HtmlStream::new(Response::without_body(200));
    assert!(matches!(result, Err(StreamError::StreamUnavailable)));
}
