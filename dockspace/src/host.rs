//! Multi-window hosting and cross-window panel hand-off
//!
//! A [`DockHost`] owns one dockspace per OS window. Windows are keyed by a
//! caller-chosen id (`winit::window::WindowId` in the editor). At most one
//! drag is in flight across all windows. A panel released outside its
//! window becomes a pending hand-off that is resolved at the start of the
//! next frame, before any window draws.

use crate::config::DockStyle;
use crate::dockspace::Dockspace;
use crate::error::DockError;
use crate::geometry::Rect;
use crate::interaction::{DockFrame, FrameOutcome};
use crate::layout::drop_slot;
use crate::node::Slot;
use crate::panel::PanelId;
use crate::schedule::FrameSchedule;
use crate::ui::DockUi;
use glam::Vec2;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, info, warn};

/// Default upper bound on open windows, the main one included
pub const DEFAULT_MAX_WINDOWS: usize = 10;

/// One window's dockspace plus its interaction context
pub struct HostedWindow<U: ?Sized> {
    pub dockspace: Dockspace<U>,
    pub frame: DockFrame,
    /// Window rectangle in screen coordinates
    pub bounds: Rect,
}

impl<U: ?Sized> HostedWindow<U> {
    pub fn new(dockspace: Dockspace<U>, bounds: Rect) -> Self {
        Self {
            dockspace,
            frame: DockFrame::new(),
            bounds,
        }
    }
}

/// The window owning the drag in flight
#[derive(Debug, Clone, PartialEq)]
pub struct DragClaim<K> {
    pub window: K,
    pub panel: PanelId,
}

#[derive(Debug, Clone)]
struct Handoff<K> {
    from: K,
    panel: PanelId,
    screen_pos: Vec2,
}

/// Ownership changes produced when a frame begins
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent<K> {
    /// The panel moved into another existing window
    Transferred { panel: PanelId, from: K, to: K },
    /// The panel was dropped over empty desktop; the owner should open a
    /// window at `screen_pos` and call [`DockHost::detach_into`]
    SpawnRequested { panel: PanelId, from: K, screen_pos: Vec2 },
    /// The drop had no valid destination; the panel stayed where it was
    Cancelled { panel: PanelId, from: K },
    /// A secondary window has no panels left
    WindowEmptied { window: K },
}

/// Dockspaces for every open window
pub struct DockHost<K, U: ?Sized> {
    windows: HashMap<K, HostedWindow<U>>,
    /// Stacking order, topmost last
    order: Vec<K>,
    main: K,
    max_windows: usize,
    claim: Option<DragClaim<K>>,
    pending: Vec<Handoff<K>>,
    schedule: FrameSchedule<K>,
}

impl<K, U> DockHost<K, U>
where
    K: Clone + Eq + Hash + Debug,
    U: ?Sized,
{
    /// Create a host with its main window
    pub fn new(main: K, dockspace: Dockspace<U>, bounds: Rect) -> Self {
        let mut windows = HashMap::new();
        windows.insert(main.clone(), HostedWindow::new(dockspace, bounds));
        Self {
            windows,
            order: vec![main.clone()],
            main,
            max_windows: DEFAULT_MAX_WINDOWS,
            claim: None,
            pending: Vec::new(),
            schedule: FrameSchedule::new(),
        }
    }

    pub fn with_max_windows(mut self, max_windows: usize) -> Self {
        self.max_windows = max_windows.max(1);
        self
    }

    pub fn max_windows(&self) -> usize {
        self.max_windows
    }

    pub fn main(&self) -> &K {
        &self.main
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Window keys in stacking order, bottom first
    pub fn window_keys(&self) -> &[K] {
        &self.order
    }

    pub fn contains(&self, key: &K) -> bool {
        self.windows.contains_key(key)
    }

    pub fn window(&self, key: &K) -> Option<&HostedWindow<U>> {
        self.windows.get(key)
    }

    pub fn window_mut(&mut self, key: &K) -> Option<&mut HostedWindow<U>> {
        self.windows.get_mut(key)
    }

    pub fn dockspace(&self, key: &K) -> Option<&Dockspace<U>> {
        self.windows.get(key).map(|w| &w.dockspace)
    }

    pub fn dockspace_mut(&mut self, key: &K) -> Option<&mut Dockspace<U>> {
        self.windows.get_mut(key).map(|w| &mut w.dockspace)
    }

    pub fn claim(&self) -> Option<&DragClaim<K>> {
        self.claim.as_ref()
    }

    pub fn pending_handoffs(&self) -> usize {
        self.pending.len()
    }

    pub fn schedule(&self) -> &FrameSchedule<K> {
        &self.schedule
    }

    /// Register another window and put it on top
    pub fn add_window(&mut self, key: K, dockspace: Dockspace<U>, bounds: Rect) -> Result<(), DockError> {
        if self.windows.contains_key(&key) {
            return Err(DockError::DuplicateWindow(format!("{key:?}")));
        }
        if self.windows.len() >= self.max_windows {
            warn!(max = self.max_windows, "Refusing to open another window");
            return Err(DockError::WindowLimit(self.max_windows));
        }
        info!(window = ?key, "Added dock window");
        self.windows.insert(key.clone(), HostedWindow::new(dockspace, bounds));
        self.order.push(key);
        Ok(())
    }

    pub fn set_bounds(&mut self, key: &K, bounds: Rect) -> Result<(), DockError> {
        let window = self.windows.get_mut(key).ok_or_else(|| DockError::unknown_window(key))?;
        window.bounds = bounds;
        Ok(())
    }

    /// Raise a window to the top of the stacking order
    pub fn focus(&mut self, key: &K) {
        if let Some(index) = self.order.iter().position(|k| k == key) {
            let key = self.order.remove(index);
            self.order.push(key);
        }
    }

    /// Close a secondary window, returning its panels to the main window
    /// as tabs
    pub fn close_window(&mut self, key: &K) -> Result<(), DockError> {
        if *key == self.main {
            return Err(DockError::CloseMainWindow);
        }
        let mut window = self.windows.remove(key).ok_or_else(|| DockError::unknown_window(key))?;
        self.order.retain(|k| k != key);
        self.pending.retain(|h| h.from != *key);
        if self.claim.as_ref().map(|c| &c.window == key).unwrap_or(false) {
            self.claim = None;
        }

        let main = self
            .windows
            .get_mut(&self.main)
            .ok_or_else(|| DockError::unknown_window(&self.main))?;
        let mut returned = 0;
        for id in window.dockspace.panel_ids() {
            let Some(panel) = window.dockspace.take_panel(&id) else {
                continue;
            };
            if main.dockspace.add_panel(panel) {
                main.dockspace.dock(&id, Slot::Tab, 0.0, false);
                returned += 1;
            } else {
                warn!(panel = %id, "Dropping panel with a title already open in the main window");
            }
        }
        info!(window = ?key, returned, "Closed dock window");
        Ok(())
    }

    /// Secondary windows whose dockspace holds no panel
    pub fn empty_secondary_windows(&self) -> Vec<K> {
        self.order
            .iter()
            .filter(|k| **k != self.main)
            .filter(|k| {
                self.windows
                    .get(*k)
                    .map(|w| w.dockspace.panels().next().is_none())
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// Start a frame: resolve hand-offs queued by the previous frame and
    /// report emptied windows
    pub fn begin_frame(&mut self) -> Vec<HostEvent<K>> {
        self.schedule.begin_frame();

        let pending = std::mem::take(&mut self.pending);
        let mut events: Vec<HostEvent<K>> = pending.into_iter().map(|h| self.resolve(h)).collect();
        events.extend(
            self.empty_secondary_windows()
                .into_iter()
                .map(|window| HostEvent::WindowEmptied { window }),
        );
        events
    }

    fn resolve(&mut self, handoff: Handoff<K>) -> HostEvent<K> {
        let Handoff { from, panel, screen_pos } = handoff;
        if self.claim.as_ref().map(|c| c.window == from).unwrap_or(false) {
            self.claim = None;
        }

        let topmost = self
            .order
            .iter()
            .rev()
            .find(|k| {
                self.windows
                    .get(*k)
                    .map(|w| w.bounds.contains(screen_pos))
                    .unwrap_or(false)
            })
            .cloned();

        match topmost {
            Some(to) if to == from => {
                debug!(panel = %panel, "Released over its own window");
                self.cancel(from, panel)
            }
            Some(to) => self.transfer(from, to, panel, screen_pos),
            None if self.windows.len() >= self.max_windows => {
                warn!(panel = %panel, max = self.max_windows, "Window limit reached, cancelling drag");
                self.cancel(from, panel)
            }
            None => {
                info!(panel = %panel, ?screen_pos, "Requesting new window for panel");
                HostEvent::SpawnRequested { panel, from, screen_pos }
            }
        }
    }

    fn cancel(&mut self, from: K, panel: PanelId) -> HostEvent<K> {
        if let Some(window) = self.windows.get_mut(&from) {
            window.frame.cancel(&mut window.dockspace);
        }
        HostEvent::Cancelled { panel, from }
    }

    fn transfer(&mut self, from: K, to: K, panel: PanelId, screen_pos: Vec2) -> HostEvent<K> {
        let duplicate = self
            .windows
            .get(&to)
            .map(|w| w.dockspace.panel(&panel).is_some())
            .unwrap_or(true);
        if duplicate {
            warn!(panel = %panel, window = ?to, "Target window already has a panel with this title");
            return self.cancel(from, panel);
        }

        let Some(taken) = self.windows.get_mut(&from).and_then(|w| w.dockspace.take_panel(&panel)) else {
            return self.cancel(from, panel);
        };
        let Some(target) = self.windows.get_mut(&to) else {
            return self.cancel(from, panel);
        };

        let local = screen_pos - target.bounds.min;
        let center_fraction = target.dockspace.style().drop_center_fraction;
        let (leaf, slot) = target
            .dockspace
            .last_layout()
            .leaf_at(local)
            .map(|l| (l.node, drop_slot(l.rect, local, center_fraction)))
            .unwrap_or((target.dockspace.root(), Slot::Tab));

        target.dockspace.add_panel(taken);
        target.dockspace.dock_into(&panel, leaf, slot);
        info!(panel = %panel, from = ?from, to = ?to, slot = ?slot, "Moved panel between windows");
        self.focus(&to);
        HostEvent::Transferred { panel, from, to }
    }

    /// Move `panel` out of `from` into a freshly opened window
    pub fn detach_into(&mut self, key: K, bounds: Rect, from: &K, panel: &PanelId) -> Result<(), DockError> {
        if self.windows.contains_key(&key) {
            return Err(DockError::DuplicateWindow(format!("{key:?}")));
        }
        if self.windows.len() >= self.max_windows {
            return Err(DockError::WindowLimit(self.max_windows));
        }
        let source = self.windows.get_mut(from).ok_or_else(|| DockError::unknown_window(from))?;
        let taken = source
            .dockspace
            .take_panel(panel)
            .ok_or_else(|| DockError::UnknownPanel(panel.to_string(), format!("{from:?}")))?;

        let mut dockspace = Dockspace::with_style(source.dockspace.style().clone());
        dockspace.add_panel(taken);
        dockspace.dock(panel, None, 0.0, true);

        info!(panel = %panel, window = ?key, "Detached panel into new window");
        self.windows.insert(key.clone(), HostedWindow::new(dockspace, bounds));
        self.order.push(key);
        Ok(())
    }

    /// Apply a new style to every window
    pub fn set_style(&mut self, style: &DockStyle) {
        for window in self.windows.values_mut() {
            window.dockspace.set_style(style.clone());
        }
    }
}

impl<K, U> DockHost<K, U>
where
    K: Clone + Eq + Hash + Debug,
    U: DockUi + ?Sized,
{
    /// Run the dock pass of one window for the current frame
    pub fn run_pass(&mut self, key: &K, ui: &U, area: Rect) -> Result<FrameOutcome, DockError> {
        if !self.windows.contains_key(key) {
            return Err(DockError::unknown_window(key));
        }
        self.schedule.enter(key)?;

        let Some(window) = self.windows.get_mut(key) else {
            self.schedule.leave(key);
            return Err(DockError::unknown_window(key));
        };
        let outcome = window.dockspace.update_and_draw(ui, &mut window.frame, area);

        if let Some(panel) = &outcome.drag_started {
            match &self.claim {
                Some(claim) if claim.window != *key => {
                    debug!(panel = %panel, owner = ?claim.window, "Another window owns the drag, cancelling");
                    window.frame.cancel(&mut window.dockspace);
                }
                _ => {
                    self.claim = Some(DragClaim {
                        window: key.clone(),
                        panel: panel.clone(),
                    });
                }
            }
        }
        // A release outside the window keeps the claim until `begin_frame`
        // resolves the hand-off
        if let Some(released) = &outcome.released_outside {
            self.pending.push(Handoff {
                from: key.clone(),
                panel: released.panel.clone(),
                screen_pos: window.bounds.min + released.position,
            });
        } else if window.frame.is_idle() && self.claim.as_ref().map(|c| c.window == *key).unwrap_or(false) {
            self.claim = None;
        }

        self.schedule.leave(key);
        Ok(outcome)
    }
}
