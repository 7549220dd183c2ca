use dockspace::testing::RecordingUi;
use dockspace::{Axis, DockAction, DockFrame, Dockspace, FrameOutcome, Layer, NodeId, Panel, PanelId, Rect, Slot};
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;

fn id(title: &str) -> PanelId {
    PanelId::from(title)
}

fn panel(title: &str) -> Panel<RecordingUi> {
    Panel::new(title, |_, _| {})
}

struct Harness {
    dockspace: Dockspace<RecordingUi>,
    frame: DockFrame,
    ui: RecordingUi,
}

impl Harness {
    /// `A` on the left half, `B` on the right half
    fn split() -> Self {
        let mut dockspace = Dockspace::new();
        dockspace.dock_new(panel("A"), None, 0.0, true);
        dockspace.dock_new(panel("B"), Slot::Right, 0.0, true);
        let mut harness = Self {
            dockspace,
            frame: DockFrame::new(),
            ui: RecordingUi::new(),
        };
        harness.ui.move_to(-100.0, -100.0);
        harness.run();
        harness
    }

    fn run(&mut self) -> FrameOutcome {
        self.ui.clear();
        let area = Rect::from_min_size(Vec2::ZERO, Vec2::new(WIDTH, HEIGHT));
        self.dockspace.update_and_draw(&self.ui, &mut self.frame, area)
    }

    fn press(&mut self, x: f32, y: f32) -> FrameOutcome {
        self.ui.press(x, y);
        self.run()
    }

    fn hold(&mut self, x: f32, y: f32) -> FrameOutcome {
        self.ui.hold(x, y);
        self.run()
    }

    fn release(&mut self, x: f32, y: f32) -> FrameOutcome {
        self.ui.release(x, y);
        self.run()
    }
}

#[test]
fn test_drag_panel_to_left_edge() {
    let mut h = Harness::split();

    // Press on B's tab, away from its close button
    assert_eq!(h.press(500.0, 10.0), FrameOutcome::default());
    assert!(matches!(h.frame.action(), DockAction::Undock { .. }));

    let outcome = h.hold(520.0, 10.0);
    assert_eq!(outcome.drag_started, Some(id("B")));
    assert!(h.dockspace.panel(&id("B")).unwrap().dragging);

    h.hold(20.0, 300.0);
    let hover = h.frame.hover().expect("hovering A's leaf");
    assert_eq!(hover.slot, Slot::Left);
    assert_eq!(hover.preview.width(), 200.0);
    assert!(h.ui.texts(Layer::Overlay).contains(&"B".to_string()));

    let outcome = h.release(20.0, 300.0);
    assert_eq!(outcome.redocked, Some(id("B")));
    assert!(outcome.changed);
    assert!(h.frame.is_idle());
    assert!(!h.dockspace.panel(&id("B")).unwrap().dragging);

    let root = h.dockspace.node(h.dockspace.root()).unwrap().as_split().unwrap();
    assert_eq!(root.axis, Axis::Horizontal);
    assert_eq!(h.dockspace.leaf_of(&id("B")), Some(root.first));
    assert_eq!(h.dockspace.leaf_of(&id("A")), Some(root.second));
    assert_eq!(h.dockspace.node_count(), 3);
    h.dockspace.validate().unwrap();
}

#[test]
fn test_drop_into_centre_makes_tab() {
    let mut h = Harness::split();
    h.press(500.0, 10.0);
    h.hold(520.0, 10.0);
    h.hold(200.0, 300.0);
    assert_eq!(h.frame.hover().map(|t| t.slot), Some(Slot::Tab));

    let outcome = h.release(200.0, 300.0);
    assert_eq!(outcome.redocked, Some(id("B")));
    let root = h.dockspace.node(h.dockspace.root()).unwrap().as_leaf().unwrap();
    assert_eq!(root.panels(), &[id("A"), id("B")]);
    assert_eq!(root.active(), Some(&id("B")));
}

#[test]
fn test_small_movement_is_not_a_drag() {
    let mut h = Harness::split();
    h.press(500.0, 10.0);
    let outcome = h.hold(502.0, 11.0);
    assert_eq!(outcome.drag_started, None);

    let before = h.dockspace.snapshot();
    h.release(502.0, 11.0);
    assert!(h.frame.is_idle());
    assert_eq!(h.dockspace.snapshot(), before);
}

#[test]
fn test_drop_onto_own_leaf_is_noop() {
    let mut h = Harness::split();
    let before = h.dockspace.snapshot();

    h.press(500.0, 10.0);
    h.hold(520.0, 10.0);
    h.hold(600.0, 300.0);
    assert!(h.frame.hover().is_none());

    let outcome = h.release(600.0, 300.0);
    assert_eq!(outcome.redocked, None);
    assert_eq!(outcome.released_outside, None);
    assert_eq!(h.dockspace.snapshot(), before);
}

#[test]
fn test_release_outside_is_reported() {
    let mut h = Harness::split();
    h.press(500.0, 10.0);
    h.hold(520.0, 10.0);
    h.hold(900.0, 300.0);

    let outcome = h.release(900.0, 300.0);
    let released = outcome.released_outside.expect("release outside the dockspace");
    assert_eq!(released.panel, id("B"));
    assert_eq!(released.position, Vec2::new(900.0, 300.0));
    // The panel stays put until the host moves it
    assert!(h.dockspace.has_dock("B"));
}

#[test]
fn test_tab_click_activates() {
    let mut h = Harness::split();
    h.dockspace.dock_new(panel("C"), Slot::Tab, 0.0, false);
    h.ui.move_to(-100.0, -100.0);
    h.run();

    // A's leaf now has tabs A (0..200) and C (200..400)
    let layout = h.dockspace.last_layout();
    let c_tab = layout.tab_at(Vec2::new(250.0, 10.0)).expect("C tab");
    assert_eq!(c_tab.panel, id("C"));
    assert!(!c_tab.active);

    let outcome = h.press(250.0, 10.0);
    assert_eq!(outcome.activated, Some(id("C")));
    h.release(250.0, 10.0);

    let leaf = h.dockspace.leaf_of(&id("C")).unwrap();
    assert_eq!(h.dockspace.node(leaf).unwrap().as_leaf().unwrap().active(), Some(&id("C")));
}

#[test]
fn test_close_button_and_veto() {
    let mut h = Harness::split();
    let asked = Rc::new(Cell::new(0));
    let counter = asked.clone();
    h.dockspace.dock_new(
        Panel::new("Locked", |_, _| {}).on_close(move || {
            counter.set(counter.get() + 1);
            false
        }),
        Slot::Bottom,
        0.0,
        true,
    );
    h.ui.move_to(-100.0, -100.0);
    h.run();

    let locked = h.dockspace.last_layout().leaf(h.dockspace.leaf_of(&id("Locked")).unwrap()).unwrap().tabs[0].close.unwrap();
    let c = locked.center();
    h.press(c.x, c.y);
    assert!(matches!(h.frame.action(), DockAction::Close { .. }));
    let outcome = h.release(c.x, c.y);
    assert!(outcome.closed.is_empty());
    assert_eq!(asked.get(), 1);
    assert!(h.dockspace.has_dock("Locked"));

    // B's close button is at the right end of its tab
    let b_close = h.dockspace.last_layout().leaf(h.dockspace.leaf_of(&id("B")).unwrap()).unwrap().tabs[0].close.unwrap();
    let c = b_close.center();
    h.press(c.x, c.y);
    let outcome = h.release(c.x, c.y);
    assert_eq!(outcome.closed, vec![id("B")]);
    assert!(h.dockspace.panel(&id("B")).is_none());
    h.dockspace.validate().unwrap();
}

#[test]
fn test_close_release_elsewhere_keeps_panel() {
    let mut h = Harness::split();
    let b_close = h.dockspace.last_layout().leaf(h.dockspace.leaf_of(&id("B")).unwrap()).unwrap().tabs[0].close.unwrap();
    let c = b_close.center();
    h.press(c.x, c.y);
    let outcome = h.release(c.x - 100.0, c.y + 200.0);
    assert!(outcome.closed.is_empty());
    assert!(h.dockspace.has_dock("B"));
}

#[test]
fn test_captured_press_starts_no_gesture() {
    let mut h = Harness::split();
    let before = h.dockspace.snapshot();
    let b_close = h.dockspace.last_layout().leaf(h.dockspace.leaf_of(&id("B")).unwrap()).unwrap().tabs[0].close.unwrap();
    let c = b_close.center();

    // A menu popup over B's close button and the splitter takes the clicks
    h.ui.set_captured(true);
    h.press(c.x, c.y);
    assert!(h.frame.is_idle());
    let outcome = h.release(c.x, c.y);
    assert!(outcome.closed.is_empty());
    assert!(h.dockspace.has_dock("B"));

    h.press(400.0, 300.0);
    assert!(h.frame.is_idle());
    assert!(!h.hold(250.0, 300.0).changed);
    h.release(250.0, 300.0);
    assert_eq!(h.dockspace.snapshot(), before);

    // A drag that started uncaptured still finishes
    h.ui.set_captured(false);
    h.press(500.0, 10.0);
    h.hold(520.0, 10.0);
    h.ui.set_captured(true);
    h.hold(20.0, 300.0);
    let outcome = h.release(20.0, 300.0);
    assert_eq!(outcome.redocked, Some(id("B")));
    h.dockspace.validate().unwrap();
}

#[test]
fn test_splitter_drag_resizes() {
    let mut h = Harness::split();
    let a_leaf = h.dockspace.leaf_of(&id("A")).unwrap();
    assert_eq!(h.dockspace.last_layout().leaf(a_leaf).unwrap().rect.width(), 400.0);

    h.press(400.0, 300.0);
    assert_eq!(h.frame.action(), &DockAction::Resize { node: h.dockspace.root() });
    let outcome = h.hold(250.0, 300.0);
    assert!(outcome.changed);
    h.release(250.0, 300.0);

    let a_leaf = h.dockspace.leaf_of(&id("A")).unwrap();
    assert_eq!(h.dockspace.last_layout().leaf(a_leaf).unwrap().rect.width(), 250.0);
    let root = h.dockspace.node(h.dockspace.root()).unwrap().as_split().unwrap();
    assert!(!root.auto_resize);
    assert_eq!(root.size, 550.0);
}

#[test]
fn test_resize_of_removed_split_is_discarded() {
    let mut h = Harness::split();
    h.dockspace.add_panel(panel("C"));
    assert!(h.dockspace.dock_with(&id("C"), &id("B"), Slot::Bottom, 0.0, true));
    h.ui.move_to(-100.0, -100.0);
    h.run();

    // Grab the B / C splitter on the right half
    h.press(600.0, 300.0);
    let held: NodeId = match h.frame.action() {
        DockAction::Resize { node } => *node,
        other => panic!("expected a resize, got {other:?}"),
    };
    assert_eq!(h.dockspace.node(held).unwrap().as_split().unwrap().axis, Axis::Vertical);

    // Rebuild the tree between frames so freed nodes get reused
    h.dockspace.undock(&id("A"));
    h.dockspace.undock(&id("C"));
    h.dockspace.dock_new(panel("D"), Slot::Left, 0.0, true);
    h.dockspace.dock_new(panel("E"), Slot::Top, 0.0, true);
    assert!(h.dockspace.node(held).is_none());
    let before = h.dockspace.snapshot();

    let outcome = h.hold(600.0, 200.0);
    assert!(h.frame.is_idle());
    assert!(!outcome.changed);
    assert_eq!(h.dockspace.snapshot(), before);
    h.dockspace.validate().unwrap();
}

#[test]
fn test_active_panels_draw_in_content_rect() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut dockspace: Dockspace<RecordingUi> = Dockspace::new();
    for title in ["A", "B"] {
        let sink = seen.clone();
        dockspace.dock_new(
            Panel::new(title, move |_, area| sink.borrow_mut().push((title.to_string(), area))),
            Slot::Tab,
            0.0,
            false,
        );
    }

    let ui = RecordingUi::new();
    let mut frame = DockFrame::new();
    let area = Rect::from_min_size(Vec2::new(0.0, 20.0), Vec2::new(300.0, 200.0));
    dockspace.update_and_draw(&ui, &mut frame, area);

    // Only the active tab draws, below the header
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "A");
    assert_eq!(seen[0].1, Rect::from_min_size(Vec2::new(0.0, 42.0), Vec2::new(300.0, 178.0)));
    assert_eq!(ui.regions(), vec![("A".to_string(), seen[0].1)]);
    assert_eq!(dockspace.panel(&id("A")).unwrap().last_size, Vec2::new(300.0, 178.0));
}

#[test]
fn test_stale_drag_is_discarded() {
    let mut h = Harness::split();
    h.press(500.0, 10.0);
    h.hold(520.0, 10.0);
    assert!(matches!(h.frame.action(), DockAction::Drag { .. }));

    h.dockspace.close(&id("B"));
    h.hold(20.0, 300.0);
    assert!(h.frame.is_idle());
    h.dockspace.validate().unwrap();
}

#[test]
fn test_cancel_clears_dragging() {
    let mut h = Harness::split();
    h.press(500.0, 10.0);
    h.hold(520.0, 10.0);
    h.frame.cancel(&mut h.dockspace);

    assert!(h.frame.is_idle());
    assert!(!h.dockspace.panel(&id("B")).unwrap().dragging);
}

#[test]
fn test_non_draggable_panel_stays_idle() {
    let mut dockspace: Dockspace<RecordingUi> = Dockspace::new();
    dockspace.dock_new(panel("Fixed").draggable(false).closable(false), None, 0.0, true);
    let ui = RecordingUi::new();
    let mut frame = DockFrame::new();
    let area = Rect::from_min_size(Vec2::ZERO, Vec2::new(WIDTH, HEIGHT));

    ui.press(100.0, 10.0);
    dockspace.update_and_draw(&ui, &mut frame, area);
    assert!(frame.is_idle());
}
