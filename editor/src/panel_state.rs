//! Panel catalog for the studio
//!
//! Every panel the studio can show is built here, so a closed panel can be
//! rebuilt and reopened and a saved layout can be restored onto a fresh set
//! of panels. Panel titles double as the dockspace's panel ids and as the
//! keys in layout files.

use crate::error::EditorError;
use crate::panels::{self, NodeGraphState, ViewportView};
use crate::shared_state::SharedEditorStateHandle;
use dockspace::{DockError, DockHost, DockStyle, Dockspace, LayoutSnapshot, Panel, PanelId, Slot};
use imgui::Ui;
use std::fmt::Debug;
use std::hash::Hash;
use std::path::Path;
use tracing::{debug, info, warn};

/// The panels the studio knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Viewport,
    Outliner,
    Properties,
    Timeline,
    NodeGraph,
}

impl PanelKind {
    pub const ALL: [PanelKind; 5] = [
        PanelKind::Viewport,
        PanelKind::Outliner,
        PanelKind::Properties,
        PanelKind::Timeline,
        PanelKind::NodeGraph,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::Viewport => "Viewport",
            PanelKind::Outliner => "Outliner",
            PanelKind::Properties => "Properties",
            PanelKind::Timeline => "Timeline",
            PanelKind::NodeGraph => "Node Graph",
        }
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.title() == title)
    }

    pub fn id(&self) -> PanelId {
        PanelId::from(self.title())
    }

    fn min_size(&self) -> (f32, f32) {
        match self {
            PanelKind::Viewport => (200.0, 150.0),
            PanelKind::Outliner => (160.0, 100.0),
            PanelKind::Properties => (200.0, 120.0),
            PanelKind::Timeline => (300.0, 90.0),
            PanelKind::NodeGraph => (200.0, 150.0),
        }
    }
}

/// Builds studio panels bound to the shared editor state
#[derive(Clone)]
pub struct PanelCatalog {
    shared_state: SharedEditorStateHandle,
}

impl PanelCatalog {
    pub fn new(shared_state: SharedEditorStateHandle) -> Self {
        Self { shared_state }
    }

    pub fn shared_state(&self) -> &SharedEditorStateHandle {
        &self.shared_state
    }

    /// Build a fresh panel of the given kind
    pub fn build(&self, kind: PanelKind) -> Panel<Ui> {
        let shared = self.shared_state.clone();
        let panel: Panel<Ui> = match kind {
            PanelKind::Viewport => {
                let mut view = ViewportView::default();
                Panel::new(kind.title(), move |ui: &Ui, area| {
                    panels::draw_viewport(ui, area, &mut view, &shared)
                })
                .closable(false)
            }
            PanelKind::Outliner => {
                Panel::new(kind.title(), move |ui: &Ui, area| panels::draw_outliner(ui, area, &shared))
            }
            PanelKind::Properties => {
                Panel::new(kind.title(), move |ui: &Ui, area| panels::draw_properties(ui, area, &shared))
            }
            PanelKind::Timeline => {
                Panel::new(kind.title(), move |ui: &Ui, area| panels::draw_timeline(ui, area, &shared))
            }
            PanelKind::NodeGraph => {
                let mut graph = NodeGraphState::default();
                Panel::new(kind.title(), move |ui: &Ui, area| panels::draw_node_graph(ui, area, &mut graph))
            }
        };
        let (width, height) = kind.min_size();
        panel.with_min_size(width, height)
    }

    /// The studio's starting arrangement: outliner on the left, properties
    /// on the right, timeline along the bottom and the node graph tabbed
    /// behind the viewport
    pub fn default_layout(&self, style: DockStyle) -> Dockspace<Ui> {
        let mut dockspace = Dockspace::with_style(style);
        self.install_default_layout(&mut dockspace);
        dockspace
    }

    fn install_default_layout(&self, dockspace: &mut Dockspace<Ui>) {
        dockspace.dock_new(self.build(PanelKind::Viewport), None, 0.0, true);
        dockspace.dock_new(self.build(PanelKind::Outliner), Slot::Left, 260.0, true);
        dockspace.dock_new(self.build(PanelKind::Properties), Slot::Right, 300.0, true);
        dockspace.dock_new(self.build(PanelKind::Timeline), Slot::Bottom, 170.0, true);
        dockspace.add_panel(self.build(PanelKind::NodeGraph));
        dockspace.dock_with(
            &PanelKind::NodeGraph.id(),
            &PanelKind::Viewport.id(),
            Slot::Tab,
            0.0,
            false,
        );
        debug!(panels = dockspace.panel_ids().len(), "Installed default layout");
    }

    /// Whether a panel of this kind is docked in any window
    pub fn is_open<K>(host: &DockHost<K, Ui>, kind: PanelKind) -> bool
    where
        K: Clone + Eq + Hash + Debug,
    {
        host.window_keys()
            .iter()
            .filter_map(|key| host.dockspace(key))
            .any(|dockspace| dockspace.has_dock(kind.title()))
    }

    /// Kinds that are not docked anywhere
    pub fn closed_panels<K>(host: &DockHost<K, Ui>) -> Vec<PanelKind>
    where
        K: Clone + Eq + Hash + Debug,
    {
        PanelKind::ALL
            .into_iter()
            .filter(|kind| !Self::is_open(host, *kind))
            .collect()
    }

    /// Dock a closed panel as a tab of the main window
    pub fn reopen<K>(&self, host: &mut DockHost<K, Ui>, kind: PanelKind) -> bool
    where
        K: Clone + Eq + Hash + Debug,
    {
        if Self::is_open(host, kind) {
            return false;
        }
        let id = kind.id();

        // A restored layout may have left the panel registered but undocked
        let keys = host.window_keys().to_vec();
        for key in &keys {
            if let Some(dockspace) = host.dockspace_mut(key) {
                if dockspace.panel(&id).is_some() {
                    let docked = dockspace.dock(&id, Slot::Tab, 0.0, true);
                    info!(panel = %id, docked, "Reopened panel");
                    return docked;
                }
            }
        }

        let main = host.main().clone();
        let Some(dockspace) = host.dockspace_mut(&main) else {
            return false;
        };
        let docked = dockspace.dock_new(self.build(kind), Slot::Tab, 0.0, true);
        info!(panel = %id, docked, "Reopened panel");
        docked
    }

    /// Close every secondary window and put the main window back to the
    /// default layout
    pub fn reset_layout<K>(&self, host: &mut DockHost<K, Ui>) -> Result<(), EditorError>
    where
        K: Clone + Eq + Hash + Debug,
    {
        close_secondary_windows(host)?;
        let main = host.main().clone();
        let dockspace = host
            .dockspace_mut(&main)
            .ok_or_else(|| EditorError::Dock(DockError::unknown_window(&main)))?;
        dockspace.clear();
        self.install_default_layout(dockspace);
        info!("Reset dock layout");
        Ok(())
    }

    /// Write the main window's layout to `path`
    pub fn save_layout<K, P>(host: &DockHost<K, Ui>, path: P) -> Result<(), EditorError>
    where
        K: Clone + Eq + Hash + Debug,
        P: AsRef<Path>,
    {
        let main = host.main();
        let dockspace = host
            .dockspace(main)
            .ok_or_else(|| EditorError::Dock(DockError::unknown_window(main)))?;
        dockspace.snapshot().save(path)?;
        Ok(())
    }

    /// Read a layout from `path` and apply it to the main window.
    ///
    /// Secondary windows are closed first so every panel is available to
    /// the restored tree. Returns the number of panels placed.
    pub fn load_layout<K, P>(&self, host: &mut DockHost<K, Ui>, path: P) -> Result<usize, EditorError>
    where
        K: Clone + Eq + Hash + Debug,
        P: AsRef<Path>,
    {
        let snapshot = LayoutSnapshot::load(path)?;
        close_secondary_windows(host)?;

        let main = host.main().clone();
        let dockspace = host
            .dockspace_mut(&main)
            .ok_or_else(|| EditorError::Dock(DockError::unknown_window(&main)))?;
        for kind in PanelKind::ALL {
            if dockspace.panel(&kind.id()).is_none() {
                dockspace.add_panel(self.build(kind));
            }
        }
        let placed = dockspace.restore(&snapshot);
        if placed == 0 {
            warn!("Layout file placed no panels, falling back to the default layout");
            dockspace.clear();
            self.install_default_layout(dockspace);
        }
        Ok(placed)
    }
}

fn close_secondary_windows<K>(host: &mut DockHost<K, Ui>) -> Result<(), EditorError>
where
    K: Clone + Eq + Hash + Debug,
{
    let main = host.main().clone();
    let secondary: Vec<K> = host.window_keys().iter().filter(|k| **k != main).cloned().collect();
    for key in secondary {
        host.close_window(&key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_state::create_shared_state;
    use crate::stage::Stage;
    use dockspace::Rect;
    use glam::Vec2;
    use tempfile::TempDir;

    fn catalog() -> PanelCatalog {
        PanelCatalog::new(create_shared_state(Stage::demo()))
    }

    fn host(catalog: &PanelCatalog) -> DockHost<u32, Ui> {
        let bounds = Rect::from_min_size(Vec2::ZERO, Vec2::new(1600.0, 900.0));
        DockHost::new(0, catalog.default_layout(DockStyle::default()), bounds)
    }

    fn rect_of(dockspace: &Dockspace<Ui>, kind: PanelKind) -> Rect {
        let layout = dockspace.compute_layout(Rect::from_min_size(Vec2::ZERO, Vec2::new(1600.0, 900.0)));
        let leaf = dockspace.leaf_of(&kind.id()).expect("panel is docked");
        layout.leaf(leaf).expect("leaf is laid out").rect
    }

    #[test]
    fn test_titles_round_trip() {
        for kind in PanelKind::ALL {
            assert_eq!(PanelKind::from_title(kind.title()), Some(kind));
        }
        assert_eq!(PanelKind::from_title("Console"), None);
    }

    #[test]
    fn test_default_layout_arrangement() {
        let dockspace = catalog().default_layout(DockStyle::default());
        dockspace.validate().unwrap();
        for kind in PanelKind::ALL {
            assert!(dockspace.has_dock(kind.title()), "{kind:?}");
        }

        let viewport = rect_of(&dockspace, PanelKind::Viewport);
        assert_eq!(rect_of(&dockspace, PanelKind::NodeGraph), viewport);
        assert!(rect_of(&dockspace, PanelKind::Outliner).max.x <= viewport.min.x);
        assert!(rect_of(&dockspace, PanelKind::Properties).min.x >= viewport.max.x);
        assert!(rect_of(&dockspace, PanelKind::Timeline).min.y >= viewport.max.y);

        // The viewport stays the visible tab
        let leaf = dockspace.leaf_of(&PanelKind::Viewport.id()).unwrap();
        let active = dockspace.node(leaf).and_then(|n| n.as_leaf()).and_then(|l| l.active.clone());
        assert_eq!(active, Some(PanelKind::Viewport.id()));
    }

    #[test]
    fn test_reopen_closed_panel() {
        let catalog = catalog();
        let mut host = host(&catalog);
        assert!(PanelCatalog::closed_panels(&host).is_empty());
        assert!(!catalog.reopen(&mut host, PanelKind::Timeline));

        host.dockspace_mut(&0).unwrap().close(&PanelKind::Timeline.id());
        assert_eq!(PanelCatalog::closed_panels(&host), vec![PanelKind::Timeline]);

        assert!(catalog.reopen(&mut host, PanelKind::Timeline));
        assert!(PanelCatalog::closed_panels(&host).is_empty());
        host.dockspace(&0).unwrap().validate().unwrap();
    }

    #[test]
    fn test_layout_save_load_and_reset() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("layout.json");
        let catalog = catalog();
        let mut host = host(&catalog);

        // Save a layout without the node graph or properties
        {
            let main = host.dockspace_mut(&0).unwrap();
            main.close(&PanelKind::NodeGraph.id());
            main.close(&PanelKind::Properties.id());
        }
        PanelCatalog::save_layout(&host, &path).unwrap();

        catalog.reset_layout(&mut host).unwrap();
        assert!(PanelCatalog::closed_panels(&host).is_empty());

        assert_eq!(catalog.load_layout(&mut host, &path).unwrap(), 3);
        assert_eq!(
            PanelCatalog::closed_panels(&host),
            vec![PanelKind::Properties, PanelKind::NodeGraph]
        );
        assert!(catalog.reopen(&mut host, PanelKind::NodeGraph));
        host.dockspace(&0).unwrap().validate().unwrap();
    }

    #[test]
    fn test_load_missing_layout_keeps_current() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let catalog = catalog();
        let mut host = host(&catalog);
        assert!(catalog.load_layout(&mut host, temp_dir.path().join("missing.json")).is_err());
        assert!(PanelCatalog::closed_panels(&host).is_empty());
    }
}
