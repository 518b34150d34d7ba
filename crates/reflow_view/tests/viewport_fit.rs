#![allow(
    clippy::expect_used,
    clippy::tests_outside_test_module,
    reason = "integration test crate"
)]

mod common;

use common::{RecordingHost, UnbalancedBuilder, controller, document_for, page};
use reflow_layout::testing::{NodeSpec, StackingBuilder, positioned_style};
use reflow_layout::{Rect, Size};
use reflow_style::{Media, NodeKey, Position};
use reflow_view::{PageInfo, PassOutcome, ScrollMode};
use std::sync::Arc;

fn assert_height(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < f32::EPSILON,
        "expected height {expected}, got {actual}"
    );
}

/// Test that content shorter than the scroll viewport is stretched to fill it.
///
/// # Panics
/// Panics if the root, `html` or `body` box keeps its content height.
#[test]
fn short_document_is_stretched_to_the_viewport() {
    let tree = page(vec![NodeSpec::block(3, "div").content_height(300.0)]);
    let (host, _repaints) = RecordingHost::new(Size::new(800, 300));
    host.set_visible(Some(Size::new(800, 500)));
    let builder = Arc::new(StackingBuilder::new(tree.clone()));
    let (view, _cascade) = controller(false, &host, builder, &tree);
    view.set_scroll_container(true);

    view.set_document(document_for(&tree), "about:blank");
    assert_eq!(host.repaints(), 1);
    assert!(view.root_box().is_none());
    assert_eq!(view.layout_now(), PassOutcome::Completed);

    let root = view.root_box().expect("published tree");
    assert_height(root.height, 500.0);
    let html = root.find(NodeKey(1)).expect("html box");
    assert_height(html.height, 500.0);
    let body = root.find(NodeKey(2)).expect("body box");
    assert_height(body.height, 500.0);
    let div = root.find(NodeKey(3)).expect("div box");
    assert_height(div.height, 300.0);

    assert_eq!(view.intrinsic_size(), Size::new(800, 500));
    assert_eq!(host.preferred_sizes(), vec![Size::new(800, 500)]);
    assert_eq!(host.scroll_modes(), vec![ScrollMode::Blit]);
    assert_eq!(host.opaque(), Some(true));
    assert_eq!(view.fixed_rectangle(), Rect::new(0, 0, 800, 500));
    assert_eq!(view.layout_width(), 800);
}

/// Test that fixed-position content forces simple scrolling and a transparent
/// canvas.
///
/// # Panics
/// Panics if the blit scroll mode or opacity survives fixed content.
#[test]
fn fixed_content_selects_simple_scrolling() {
    let tree = page(vec![
        NodeSpec::block(3, "div").content_height(900.0),
        NodeSpec::with_style(4, "nav", positioned_style(Position::Fixed, 0.0, 0.0, 800.0, 40.0)),
    ]);
    let (host, _repaints) = RecordingHost::new(Size::new(800, 500));
    host.set_visible(Some(Size::new(800, 500)));
    let builder = Arc::new(StackingBuilder::new(tree.clone()));
    let (view, _cascade) = controller(false, &host, builder, &tree);
    view.set_scroll_container(true);
    view.set_document(document_for(&tree), "about:blank");

    assert_eq!(view.layout_now(), PassOutcome::Completed);

    assert!(view.root_layer().is_some_and(|layer| layer.contains_fixed_content()));
    assert_eq!(host.scroll_modes(), vec![ScrollMode::Simple]);
    assert_eq!(host.opaque(), Some(false));
    assert_eq!(host.preferred_sizes(), vec![Size::new(800, 900)]);
    assert_eq!(view.intrinsic_size(), Size::new(800, 900));
}

/// Test that a pass is skipped without a paint surface or a document.
///
/// # Panics
/// Panics if a skipped pass touches the published tree.
#[test]
fn pass_is_skipped_without_surface_or_document() {
    let tree = page(Vec::new());
    let (host, _repaints) = RecordingHost::new(Size::new(200, 200));
    let builder = Arc::new(StackingBuilder::new(tree.clone()));
    let (view, _cascade) = controller(false, &host, builder, &tree);

    assert_eq!(view.layout_now(), PassOutcome::Skipped);
    view.set_document(document_for(&tree), "about:blank");
    host.set_surface(false);
    assert_eq!(view.layout_now(), PassOutcome::Skipped);
    assert!(view.root_box().is_none());
    assert!(host.preferred_sizes().is_empty());

    host.set_surface(true);
    assert_eq!(view.layout_now(), PassOutcome::Completed);
    assert_eq!(view.pass_counts().skipped, 2);
}

/// Test that unbalanced style bookkeeping is reported but the tree still publishes.
///
/// # Panics
/// Panics if the mismatch suppresses publication.
#[test]
fn style_stack_mismatch_still_publishes() {
    let tree = page(vec![NodeSpec::block(3, "p").content_height(12.0)]);
    let (host, _repaints) = RecordingHost::new(Size::new(300, 100));
    let builder = Arc::new(UnbalancedBuilder(StackingBuilder::new(tree.clone())));
    let (view, _cascade) = controller(false, &host, builder, &tree);
    view.set_document(document_for(&tree), "about:blank");

    assert_eq!(view.layout_now(), PassOutcome::Completed);
    assert!(view.root_box().is_some_and(|root| root.find(NodeKey(3)).is_some()));
}

/// Test that a page description switches to print media and page extents.
///
/// # Panics
/// Panics if the page content area is not used for layout.
#[test]
fn print_view_lays_out_against_the_page() {
    let tree = page(vec![NodeSpec::block(3, "div").content_height(20.0)]);
    let (host, _repaints) = RecordingHost::new(Size::new(800, 600));
    let builder = Arc::new(StackingBuilder::new(tree.clone()));
    let (view, cascade) = controller(false, &host, builder, &tree);
    view.set_page_info(Some(PageInfo::new(500, 700)));
    assert!(view.is_print_view());

    view.set_document(document_for(&tree), "file:///report.html");
    assert_eq!(
        cascade.document_context().map(|context| context.media),
        Some(Media::Print)
    );
    assert_eq!(view.base_extents(), Size::new(500, 700));
    assert_eq!(view.layout_now(), PassOutcome::Completed);
    assert_eq!(view.render_width(), 500);
}

/// Test that a resize in single-threaded mode drops the published tree.
///
/// # Panics
/// Panics if the stale tree remains published.
#[test]
fn resize_without_workers_invalidates_the_tree() {
    let tree = page(vec![NodeSpec::block(3, "div").content_height(20.0)]);
    let (host, _repaints) = RecordingHost::new(Size::new(400, 300));
    let builder = Arc::new(StackingBuilder::new(tree.clone()));
    let (view, _cascade) = controller(false, &host, builder, &tree);
    view.set_document(document_for(&tree), "about:blank");
    assert_eq!(view.layout_now(), PassOutcome::Completed);

    host.set_canvas(Size::new(600, 300));
    view.canvas_resized(Size::new(600, 300));
    assert!(view.root_box().is_none());
    assert_eq!(view.layout_now(), PassOutcome::Completed);
    assert_eq!(view.render_width(), 600);
}

/// Test that interaction state is tracked per element and reset by a new document.
///
/// # Panics
/// Panics if the pseudo-class state leaks across documents.
#[test]
fn interaction_state_resets_with_the_document() {
    let tree = page(Vec::new());
    let (host, _repaints) = RecordingHost::new(Size::new(100, 100));
    let builder = Arc::new(StackingBuilder::new(tree.clone()));
    let (view, _cascade) = controller(false, &host, builder, &tree);

    view.set_hovered(Some(NodeKey(2)));
    view.set_active(Some(NodeKey(2)));
    view.set_focused(Some(NodeKey(1)));
    assert!(view.is_hover(NodeKey(2)));
    assert!(view.is_active(NodeKey(2)));
    assert!(view.is_focus(NodeKey(1)));
    assert!(!view.is_focus(NodeKey(2)));

    view.set_document(document_for(&tree), "about:blank");
    assert!(!view.is_hover(NodeKey(2)));
}
