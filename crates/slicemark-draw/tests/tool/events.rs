use slicemark_core::{DrawEvent, DrawEventKind, Point2D};
use slicemark_draw::{DragEvent, PointerEvent};
use std::cell::RefCell;
use std::rc::Rc;

use crate::support::{draw, record_events, shape_of, tool};

#[test]
fn test_listeners_fire_in_registration_order() {
    let mut tool = tool();
    let group = draw(&mut tool, (0.0, 0.0), (30.0, 40.0));
    let shape = shape_of(&tool, group);
    let order = Rc::new(RefCell::new(Vec::new()));
    for name in ["first", "second"] {
        let order = Rc::clone(&order);
        tool.add_event_listener(DrawEventKind::Change, move |_| order.borrow_mut().push(name));
    }

    tool.host_mut().prompt_answer = Some("{length} long".to_string());
    assert!(tool.double_click(shape).unwrap());
    assert_eq!(*order.borrow(), vec!["first", "second"]);
}

#[test]
fn test_removed_listener_is_silent() {
    let mut tool = tool();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    let id = tool.add_event_listener(DrawEventKind::Create, move |_| *sink.borrow_mut() += 1);

    draw(&mut tool, (0.0, 0.0), (10.0, 10.0));
    assert!(tool.remove_event_listener(DrawEventKind::Create, id));
    draw(&mut tool, (20.0, 20.0), (30.0, 30.0));

    assert_eq!(*count.borrow(), 1);
    assert!(!tool.remove_event_listener(DrawEventKind::Create, id));
}

#[test]
fn test_lifecycle_events_carry_group_id() {
    let mut tool = tool();
    let log = record_events(&tool);
    let group = draw(&mut tool, (10.0, 10.0), (50.0, 50.0));
    let shape = shape_of(&tool, group);
    let id = tool
        .host()
        .stage
        .borrow()
        .node(group)
        .unwrap()
        .tag()
        .unwrap()
        .to_string();

    tool.drag_start(shape).unwrap();
    tool.drag_end(&DragEvent::new(Point2D::new(3.0, 4.0), Point2D::new(100.0, 100.0)))
        .unwrap();
    tool.delete_draw(Some(shape)).unwrap();

    let events: Vec<DrawEvent> = log.borrow().clone();
    let kinds: Vec<DrawEventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![DrawEventKind::Create, DrawEventKind::Move, DrawEventKind::Delete]
    );
    for event in &events {
        assert_eq!(event.id.as_deref(), Some(id.as_str()));
        assert_eq!(event.shape_name.as_deref(), Some("Ruler"));
    }
}

#[test]
fn test_preview_fires_nothing() {
    let mut tool = tool();
    let log = record_events(&tool);
    tool.pointer_down(&PointerEvent::at(0.0, 0.0)).unwrap();
    for x in [10.0, 20.0, 30.0] {
        tool.pointer_move(&PointerEvent::at(x, 0.0)).unwrap();
    }
    assert!(log.borrow().is_empty());
}
