use dockspace::{Dockspace, LayoutSnapshot, Panel, PanelId, Rect, Slot, LAYOUT_VERSION};
use glam::Vec2;
use tempfile::TempDir;

fn studio_layout() -> Dockspace<()> {
    let mut dockspace = Dockspace::new();
    dockspace.dock_new(Panel::new("Viewport", |_, _| {}), None, 0.0, true);
    dockspace.dock_new(Panel::new("Outliner", |_, _| {}), Slot::Left, 240.0, true);
    dockspace.dock_new(Panel::new("Properties", |_, _| {}), Slot::Tab, 0.0, false);
    dockspace.dock_new(Panel::new("Timeline", |_, _| {}), Slot::Bottom, 160.0, true);
    dockspace
}

fn fresh_panels(titles: &[&str]) -> Dockspace<()> {
    let mut dockspace = Dockspace::new();
    for title in titles {
        dockspace.add_panel(Panel::new(*title, |_, _| {}));
    }
    dockspace
}

#[test]
fn test_save_and_restore_layout() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("layout.json");

    let original = studio_layout();
    original.snapshot().save(&path).expect("Failed to save layout");

    let loaded = LayoutSnapshot::load(&path).expect("Failed to load layout");
    assert_eq!(loaded.version, LAYOUT_VERSION);
    assert_eq!(loaded, original.snapshot());

    let mut restored = fresh_panels(&["Viewport", "Outliner", "Properties", "Timeline"]);
    assert_eq!(restored.restore(&loaded), 4);
    restored.validate().unwrap();
    assert_eq!(restored.snapshot(), original.snapshot());

    // Same snapshot means same geometry
    let area = Rect::from_min_size(Vec2::ZERO, Vec2::new(1280.0, 720.0));
    let a = original.compute_layout(area);
    let b = restored.compute_layout(area);
    let rects = |d: &Dockspace<()>, l: &dockspace::Layout, title: &str| {
        l.leaf(d.leaf_of(&PanelId::from(title)).unwrap()).unwrap().rect
    };
    for title in ["Viewport", "Outliner", "Properties", "Timeline"] {
        assert_eq!(rects(&original, &a, title), rects(&restored, &b, title), "{title}");
    }
}

#[test]
fn test_restore_keeps_unlisted_panels_undocked() {
    let snapshot = studio_layout().snapshot();
    let mut restored = fresh_panels(&["Viewport", "Timeline", "Console"]);
    assert_eq!(restored.restore(&snapshot), 2);
    restored.validate().unwrap();

    assert!(restored.has_dock("Viewport"));
    assert!(restored.has_dock("Timeline"));
    assert!(!restored.has_dock("Console"));
    assert_eq!(restored.node_count(), 3);
}

#[test]
fn test_load_missing_file_is_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    assert!(LayoutSnapshot::load(temp_dir.path().join("missing.json")).is_err());
}

#[test]
fn test_load_garbage_is_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("layout.json");
    std::fs::write(&path, r#"{ "version": 1, "root": { "type": "Blob" } }"#).unwrap();
    assert!(LayoutSnapshot::load(&path).is_err());
}
