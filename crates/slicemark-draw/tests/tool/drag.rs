use slicemark_core::{DrawError, DrawEventKind, Error, Point2D};
use slicemark_draw::{
    CursorStyle, DragEvent, DragOutcome, DrawCommand, LabelText, NodeRole, NodeSpec, PointerEvent,
};

use crate::support::{child_positions, draw, kinds, record_events, shape_of, tool};

fn drag_to(x: f64, y: f64, offset: (f64, f64)) -> DragEvent {
    DragEvent::new(Point2D::new(x, y), Point2D::new(offset.0, offset.1))
}

#[test]
fn test_drag_start_shows_trash() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);

    tool.drag_start(shape).unwrap();
    let trash = tool.trash().expect("trash shown");
    let scene = tool.host().stage.borrow();
    let node = scene.node(trash).unwrap();
    assert_eq!(node.role(), NodeRole::Trash);
    assert_eq!(node.position(), Point2D::new(256.0, 20.0));
    assert_eq!(node.scale(), Point2D::new(1.0, 1.0));
    assert_eq!(scene.parent(trash).unwrap(), Some(tool.host().layer));
    let lines = scene.children_by_role(trash, NodeRole::Decoration).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(scene.node(lines[0]).unwrap().stroke(), Some("red"));
}

#[test]
fn test_trash_follows_view() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);
    let view = tool
        .host()
        .viewport
        .with_scale(2.0, 4.0)
        .with_offset(Point2D::new(100.0, 100.0));
    tool.host_mut().viewport = view;

    tool.drag_start(shape).unwrap();
    let scene = tool.host().stage.borrow();
    let node = scene.node(tool.trash().unwrap()).unwrap();
    assert_eq!(node.position(), Point2D::new(228.0, 105.0));
    assert_eq!(node.scale(), Point2D::new(0.5, 0.25));
}

#[test]
fn test_drag_moves_group_and_records_move() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);
    let before = child_positions(&tool, group);
    let log = record_events(&tool);

    tool.drag_start(shape).unwrap();
    tool.drag_move(&drag_to(2.0, 3.0, (100.0, 100.0))).unwrap();
    tool.drag_move(&drag_to(5.0, 5.0, (100.0, 100.0))).unwrap();
    let outcome = tool.drag_end(&drag_to(5.0, 5.0, (100.0, 100.0))).unwrap();

    assert_eq!(outcome, DragOutcome::Moved(Point2D::new(5.0, 5.0)));
    assert!(child_positions(&tool, group)
        .iter()
        .zip(&before)
        .all(|(after, before)| *after == *before + Point2D::new(5.0, 5.0)));
    assert_eq!(tool.trash(), None);
    assert!(!tool.is_dragging());
    assert_eq!(kinds(&log), vec![DrawEventKind::Move]);

    assert_eq!(tool.host().undo.len(), 2);
    match tool.host().undo.last() {
        Some(DrawCommand::MoveGroup(cmd)) => assert_eq!(cmd.translation, Point2D::new(5.0, 5.0)),
        other => panic!("expected a move command, got {:?}", other),
    }

    // undo puts everything back, firing move again
    assert!(tool.host_mut().undo_last());
    assert_eq!(child_positions(&tool, group), before);
    assert_eq!(kinds(&log), vec![DrawEventKind::Move, DrawEventKind::Move]);
}

#[test]
fn test_drag_back_to_start_records_nothing() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);

    tool.drag_start(shape).unwrap();
    tool.drag_move(&drag_to(4.0, 0.0, (100.0, 100.0))).unwrap();
    let outcome = tool.drag_end(&drag_to(0.0, 0.0, (100.0, 100.0))).unwrap();

    assert_eq!(outcome, DragOutcome::Unchanged);
    assert_eq!(tool.host().undo.len(), 1);
    assert!(child_positions(&tool, group).iter().all(|p| p.is_zero()));
}

#[test]
fn test_hovering_trash_highlights() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);
    tool.drag_start(shape).unwrap();

    tool.drag_move(&drag_to(3.0, 3.0, (250.0, 25.0))).unwrap();
    {
        let scene = tool.host().stage.borrow();
        let trash = tool.trash().unwrap();
        for line in scene.children(trash).unwrap() {
            assert_eq!(scene.node(*line).unwrap().stroke(), Some("orange"));
        }
        assert_eq!(scene.node(shape).unwrap().stroke(), Some("red"));
    }

    tool.drag_move(&drag_to(4.0, 4.0, (150.0, 25.0))).unwrap();
    let scene = tool.host().stage.borrow();
    let trash = tool.trash().unwrap();
    for line in scene.children(trash).unwrap() {
        assert_eq!(scene.node(*line).unwrap().stroke(), Some("red"));
    }
    assert_eq!(scene.node(shape).unwrap().stroke(), Some("#ffff80"));
}

#[test]
fn test_release_on_trash_deletes_and_undo_restores() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);
    let scope = tool.host().stage.borrow().parent(group).unwrap().unwrap();
    let before = child_positions(&tool, group);
    let log = record_events(&tool);

    // bind the editor first: deletion must unbind it
    tool.pointer_down(&PointerEvent::at(30.0, 30.0)).unwrap();
    assert_eq!(tool.editor().shape(), Some(shape));

    tool.drag_start(shape).unwrap();
    tool.drag_move(&drag_to(200.0, -20.0, (256.0, 20.0))).unwrap();
    let outcome = tool.drag_end(&drag_to(200.0, -20.0, (256.0, 20.0))).unwrap();

    assert_eq!(outcome, DragOutcome::Deleted);
    assert_eq!(tool.editor().shape(), None);
    assert_eq!(tool.host().cursor, CursorStyle::Default);
    assert_eq!(kinds(&log), vec![DrawEventKind::Delete]);
    assert_eq!(tool.host().undo.len(), 2);
    {
        let scene = tool.host().stage.borrow();
        assert!(!scene.is_attached(group));
        assert_eq!(scene.node(shape).unwrap().stroke(), Some("#ffff80"));
    }
    // pre-drag position is restored before deletion
    assert_eq!(child_positions(&tool, group), before);

    assert!(tool.host_mut().undo_last());
    let scene = tool.host().stage.borrow();
    assert!(scene.is_attached(group));
    assert_eq!(scene.parent(group).unwrap(), Some(scope));
    assert_eq!(kinds(&log), vec![DrawEventKind::Delete, DrawEventKind::Create]);
}

#[test]
fn test_release_just_outside_trash_moves() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);

    tool.drag_start(shape).unwrap();
    let outcome = tool.drag_end(&drag_to(1.0, 1.0, (266.0, 20.0))).unwrap();
    assert_eq!(outcome, DragOutcome::Moved(Point2D::new(1.0, 1.0)));
    assert!(tool.host().stage.borrow().is_attached(group));
}

#[test]
fn test_drag_requires_interactive_shape() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);
    tool.set_shape_off(shape).unwrap();

    let err = tool.drag_start(shape).unwrap_err();
    assert!(matches!(err, Error::Draw(DrawError::NotInteractive { .. })));
    assert_eq!(tool.drag_end(&drag_to(0.0, 0.0, (0.0, 0.0))).unwrap(), DragOutcome::Unchanged);
}

#[test]
fn test_anchors_toggle_around_drag() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);
    tool.pointer_down(&PointerEvent::at(30.0, 30.0)).unwrap();

    tool.drag_start(shape).unwrap();
    tool.drag_move(&drag_to(5.0, 0.0, (100.0, 100.0))).unwrap();
    tool.drag_end(&drag_to(5.0, 0.0, (100.0, 100.0))).unwrap();
    // editor stays bound after a move
    assert_eq!(tool.editor().shape(), Some(shape));
    assert!(tool.editor().is_enabled());
}

#[test]
fn test_hover_sets_cursor() {
    let mut tool = tool();
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);

    tool.pointer_over(shape);
    assert_eq!(tool.host().cursor, CursorStyle::Pointer);
    tool.pointer_leave(shape);
    assert_eq!(tool.host().cursor, CursorStyle::Default);
}

#[test]
fn test_double_click_updates_label() {
    let mut tool = tool();
    let group = draw(&mut tool, (0.0, 0.0), (30.0, 40.0));
    let shape = shape_of(&tool, group);
    let log = record_events(&tool);
    tool.host_mut().prompt_answer = Some("L: {length}".to_string());

    assert!(tool.double_click(shape).unwrap());
    assert_eq!(tool.host().prompts, vec!["Shape label".to_string()]);
    assert_eq!(kinds(&log), vec![DrawEventKind::Change]);

    let scene = tool.host().stage.borrow();
    let label = scene.child_by_role(group, NodeRole::Label).unwrap().unwrap();
    let text = scene.node(label).unwrap().label().unwrap();
    assert_eq!(text.text_expr, "L: {length}");
    assert_eq!(text.text, "L: 50.00 px");
}

#[test]
fn test_double_click_cancel_or_same_text() {
    let mut tool = tool();
    let group = draw(&mut tool, (0.0, 0.0), (30.0, 40.0));
    let shape = shape_of(&tool, group);
    let log = record_events(&tool);

    tool.host_mut().prompt_answer = None;
    assert!(!tool.double_click(shape).unwrap());
    tool.host_mut().prompt_answer = Some("{length}".to_string());
    assert!(!tool.double_click(shape).unwrap());
    assert!(log.borrow().is_empty());
}

#[test]
fn test_double_click_label_invariant() {
    let mut tool = tool();
    let group = draw(&mut tool, (0.0, 0.0), (30.0, 40.0));
    let shape = shape_of(&tool, group);
    {
        let stage = tool.host().stage.clone();
        let mut scene = stage.borrow_mut();
        let extra = scene.instantiate(&NodeSpec::label(
            LabelText::new("", Default::default(), 10.0),
            Point2D::zero(),
        ));
        scene.add(group, extra).unwrap();
    }
    let err = tool.double_click(shape).unwrap_err();
    assert!(matches!(
        err,
        Error::Draw(DrawError::LabelInvariant { found: 2, .. })
    ));

    {
        let stage = tool.host().stage.clone();
        let mut scene = stage.borrow_mut();
        for label in scene.children_by_role(group, NodeRole::Label).unwrap() {
            scene.destroy(label).unwrap();
        }
    }
    let err = tool.double_click(shape).unwrap_err();
    assert!(matches!(
        err,
        Error::Draw(DrawError::LabelInvariant { found: 0, .. })
    ));
}
