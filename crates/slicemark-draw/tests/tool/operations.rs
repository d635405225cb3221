use slicemark_core::{DrawError, DrawEventKind, Error, SlicePosition};
use slicemark_draw::{
    DrawTool, HostEventKind, NodeId, NodeRole, PointerEvent, ShapeRegistry, TrackingEditor,
};
use slicemark_settings::DrawConfig;

use crate::support::{draw, kinds, record_events, shape_of, tool, FakeHost};

fn scope_of(tool: &DrawTool<FakeHost>, group: NodeId) -> NodeId {
    tool.host().stage.borrow().parent(group).unwrap().unwrap()
}

fn is_visible(tool: &DrawTool<FakeHost>, node: NodeId) -> bool {
    tool.host().stage.borrow().node(node).unwrap().is_visible()
}

fn go_to_slice(tool: &mut DrawTool<FakeHost>, k: usize) {
    tool.host_mut().position = SlicePosition::new(0, 0, k);
    tool.update_draw_layer().unwrap();
}

#[test]
fn test_display_on_subscribes_to_host() {
    let tool = tool();
    let host = tool.host();
    assert!(host.canvas_listening);
    for kind in HostEventKind::ALL {
        assert!(host.subscriptions.contains(&kind));
    }
    let scene = host.stage.borrow();
    assert!(scene.node(scene.root()).unwrap().is_listening());
    assert!(scene.node(host.layer).unwrap().is_listening());
}

#[test]
fn test_display_off_releases_everything() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);
    tool.pointer_down(&PointerEvent::at(30.0, 30.0)).unwrap();

    tool.display(false).unwrap();
    let host = tool.host();
    assert!(host.subscriptions.is_empty());
    assert!(!host.canvas_listening);
    assert!(!tool.is_shape_on(shape));
    assert_eq!(tool.editor().shape(), None);
    let scene = host.stage.borrow();
    assert!(!scene.node(shape).unwrap().is_draggable());
    assert!(!scene.node(scene.root()).unwrap().is_listening());
    assert!(!scene.node(host.layer).unwrap().is_listening());
}

#[test]
fn test_display_off_abandons_gesture() {
    let mut tool = tool();
    tool.pointer_down(&PointerEvent::at(10.0, 10.0)).unwrap();
    tool.pointer_move(&PointerEvent::at(40.0, 40.0)).unwrap();
    let preview = tool.preview().unwrap();

    tool.display(false).unwrap();
    assert!(!tool.is_collecting());
    assert_eq!(tool.preview(), None);
    assert!(!tool.host().stage.borrow().contains(preview));
    assert!(tool.host().undo.is_empty());
}

#[test]
fn test_display_off_during_drag_removes_trash() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    tool.drag_start(shape_of(&tool, group)).unwrap();
    let trash = tool.trash().unwrap();

    tool.display(false).unwrap();
    assert!(!tool.is_dragging());
    assert_eq!(tool.trash(), None);
    assert!(!tool.host().stage.borrow().contains(trash));
}

#[test]
fn test_unknown_shape_kind_is_rejected() {
    let mut tool = tool();
    let err = tool.set_shape_kind("hexagon").unwrap_err();
    assert!(matches!(err, Error::Draw(DrawError::UnknownShape { .. })));
    assert_eq!(tool.shape_name(), "line");

    tool.set_shape_kind("rectangle").unwrap();
    assert_eq!(tool.shape_name(), "rectangle");
}

#[test]
fn test_init_picks_window_scale() {
    let mut host = FakeHost::new();
    host.window_scale = 2.0;
    let mut tool = DrawTool::with_defaults(host);
    tool.set_shape_kind("protractor").unwrap();
    tool.init().unwrap();

    assert_eq!(tool.shape_name(), "line");
    assert_eq!(tool.style().scale, 2.0);
    assert_eq!(tool.style().scaled_font_size(), 20.0);
}

#[test]
fn test_init_without_factories_fails() {
    let mut tool = DrawTool::new(
        FakeHost::new(),
        ShapeRegistry::new(),
        Box::new(TrackingEditor::new()),
        DrawConfig::default(),
    );
    let err = tool.init().unwrap_err();
    assert!(matches!(err, Error::Draw(DrawError::EmptyRegistry)));
}

#[test]
fn test_changing_slice_hides_other_scopes() {
    let mut tool = tool();
    let first = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let first_scope = scope_of(&tool, first);
    let first_shape = shape_of(&tool, first);

    go_to_slice(&mut tool, 1);
    assert!(!is_visible(&tool, first_scope));

    let second = draw(&mut tool, (20.0, 20.0), (60.0, 60.0));
    let second_scope = scope_of(&tool, second);
    assert_ne!(first_scope, second_scope);
    assert_eq!(
        tool.host().stage.borrow().node(second_scope).unwrap().tag(),
        Some("slice-1_frame-0")
    );
    assert!(is_visible(&tool, second_scope));

    go_to_slice(&mut tool, 0);
    assert!(is_visible(&tool, first_scope));
    assert!(!is_visible(&tool, second_scope));
    assert!(tool.is_shape_on(first_shape));
}

#[test]
fn test_hidden_scope_is_not_hit() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    go_to_slice(&mut tool, 1);

    // the hidden annotation is ignored, so a new gesture starts
    tool.pointer_down(&PointerEvent::at(30.0, 30.0)).unwrap();
    assert!(tool.is_collecting());
    assert_eq!(tool.editor().shape(), None);
    assert!(tool.host().stage.borrow().is_attached(group));
}

#[test]
fn test_clone_with_restart() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    tool.pointer_down(&PointerEvent::at(30.0, 30.0)).unwrap();
    let log = record_events(&tool);

    let copy = tool.clone_draw(2, true).unwrap();

    assert_eq!(tool.host().position.k, 0);
    assert_eq!(tool.editor().shape(), None);
    assert_eq!(tool.host().undo.len(), 2);
    assert_eq!(kinds(&log), vec![DrawEventKind::Create]);

    let copy_scope = scope_of(&tool, copy);
    let scene = tool.host().stage.borrow();
    assert_eq!(scene.node(copy_scope).unwrap().tag(), Some("slice-2_frame-0"));
    assert!(!scene.node(copy_scope).unwrap().is_visible());
    assert_ne!(scene.node(copy).unwrap().tag(), scene.node(group).unwrap().tag());
    assert_eq!(log.borrow()[0].id.as_deref(), scene.node(copy).unwrap().tag());

    let label_of = |g| {
        let label = scene.child_by_role(g, NodeRole::Label).unwrap().unwrap();
        scene.node(label).unwrap().label().cloned().unwrap()
    };
    assert_eq!(label_of(copy), label_of(group));
}

#[test]
fn test_clone_without_restart_stays_on_target() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let scope = scope_of(&tool, group);
    tool.pointer_down(&PointerEvent::at(30.0, 30.0)).unwrap();

    let copy = tool.clone_draw_from_input(" 3 ", false).unwrap();
    assert_eq!(tool.host().position.k, 3);
    assert!(!is_visible(&tool, scope));
    assert!(is_visible(&tool, scope_of(&tool, copy)));

    // undoing the clone removes the scope it created
    let copy_scope = scope_of(&tool, copy);
    assert!(tool.host_mut().undo_last());
    let scene = tool.host().stage.borrow();
    assert!(!scene.is_attached(copy));
    assert!(!scene.is_attached(copy_scope));
}

#[test]
fn test_clone_rejects_bad_targets() {
    let mut tool = tool();
    draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    tool.pointer_down(&PointerEvent::at(30.0, 30.0)).unwrap();

    for layer in [-1, 5, 99] {
        let err = tool.clone_draw(layer, true).unwrap_err();
        assert!(matches!(err, Error::Draw(DrawError::InvalidTarget { .. })));
    }
    for input in ["abc", "2.5", "", "NaN"] {
        let err = tool.clone_draw_from_input(input, true).unwrap_err();
        assert!(matches!(err, Error::Draw(DrawError::InvalidTarget { .. })));
    }
    // nothing happened, the selection is kept
    assert!(tool.editor().shape().is_some());
    assert_eq!(tool.host().undo.len(), 1);
}

#[test]
fn test_clone_needs_selection() {
    let mut tool = tool();
    draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let err = tool.clone_draw(1, true).unwrap_err();
    assert!(matches!(err, Error::Draw(DrawError::NoSelection)));
    assert_eq!(tool.host().position.k, 0);
}

#[test]
fn test_delete_selected_annotation() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let scope = scope_of(&tool, group);
    tool.pointer_down(&PointerEvent::at(30.0, 30.0)).unwrap();
    let log = record_events(&tool);

    tool.delete_draw(None).unwrap();
    assert_eq!(tool.editor().shape(), None);
    assert_eq!(kinds(&log), vec![DrawEventKind::Delete]);
    {
        let scene = tool.host().stage.borrow();
        assert!(!scene.is_attached(group));
        // the emptied scope stays in place
        assert!(scene.is_attached(scope));
    }

    assert!(tool.host_mut().undo_last());
    assert_eq!(scope_of(&tool, group), scope);
}

#[test]
fn test_delete_explicit_shape_and_no_selection() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);

    let err = tool.delete_draw(None).unwrap_err();
    assert!(matches!(err, Error::Draw(DrawError::NoSelection)));

    tool.delete_draw(Some(shape)).unwrap();
    assert!(!tool.host().stage.borrow().is_attached(group));
    assert_eq!(tool.host().undo.len(), 2);
}

#[test]
fn test_delete_after_undone_create_is_rejected() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    tool.pointer_down(&PointerEvent::at(30.0, 30.0)).unwrap();
    assert!(tool.host_mut().undo_last());
    let log = record_events(&tool);

    let err = tool.delete_draw(None).unwrap_err();
    assert!(matches!(err, Error::Draw(DrawError::NoSelection)));
    assert_eq!(tool.editor().shape(), None);
    assert!(tool.host().undo.is_empty());
    assert!(kinds(&log).is_empty());
    assert!(!tool.host().stage.borrow().is_attached(group));
}

#[test]
fn test_clone_after_undone_create_is_rejected() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    tool.pointer_down(&PointerEvent::at(30.0, 30.0)).unwrap();
    assert!(tool.host_mut().undo_last());
    let log = record_events(&tool);

    let err = tool.clone_draw(2, true).unwrap_err();
    assert!(matches!(err, Error::Draw(DrawError::NoSelection)));
    assert_eq!(tool.editor().shape(), None);
    assert_eq!(tool.host().position.k, 0);
    assert!(kinds(&log).is_empty());
    let scene = tool.host().stage.borrow();
    assert!(!scene.is_attached(group));
    assert!(scene.children(tool.host().layer).unwrap().is_empty());
}

#[test]
fn test_render_turns_off_shapes_outside_current_scope() {
    let mut tool = tool();
    let first = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let first_shape = shape_of(&tool, first);
    let second = draw(&mut tool, (100.0, 100.0), (150.0, 150.0));
    let second_shape = shape_of(&tool, second);
    tool.delete_draw(Some(second_shape)).unwrap();

    go_to_slice(&mut tool, 1);
    assert!(!tool.is_shape_on(first_shape));
    assert!(!tool.is_shape_on(second_shape));
    assert!(!tool.host().stage.borrow().node(first_shape).unwrap().is_draggable());

    go_to_slice(&mut tool, 0);
    assert!(tool.is_shape_on(first_shape));
    assert!(!tool.is_shape_on(second_shape));
}
