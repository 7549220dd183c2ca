//! One Dear ImGui context per OS window
//!
//! imgui has a single global "current context". Every window keeps its own
//! context suspended and activates it only while it builds and renders its
//! frame. [`ActiveGui`] is the handle to the current context; dropping it
//! suspends the context again, so at most one window is current at a time.

use crate::error::EditorError;
use imgui::{Context, SuspendedContext};
use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

pub struct GuiContext {
    suspended: Option<SuspendedContext>,
}

impl GuiContext {
    /// Create a suspended context, running `configure` on it while it is
    /// briefly current. Whatever `configure` builds from the context (the
    /// platform and renderer) is handed back alongside it.
    pub fn new<T>(configure: impl FnOnce(&mut Context) -> T) -> Result<(Self, T), EditorError> {
        let mut context = SuspendedContext::create()
            .activate()
            .map_err(|_| EditorError::ContextBusy)?;
        context.set_ini_filename(None);
        let built = configure(&mut context);
        debug!("Created GUI context");
        let gui = Self {
            suspended: Some(context.suspend()),
        };
        Ok((gui, built))
    }

    /// Make this window's context current.
    ///
    /// `style` is the style of the previously current window; copying it
    /// keeps theme changes consistent across windows.
    pub fn activate(&mut self, style: Option<&imgui::Style>) -> Result<ActiveGui<'_>, EditorError> {
        let suspended = self.suspended.take().ok_or(EditorError::ContextMissing)?;
        match suspended.activate() {
            Ok(mut context) => {
                if let Some(style) = style {
                    *context.style_mut() = style.clone();
                }
                Ok(ActiveGui {
                    slot: &mut self.suspended,
                    context: Some(context),
                })
            }
            Err(suspended) => {
                warn!("Cannot activate GUI context while another one is current");
                self.suspended = Some(suspended);
                Err(EditorError::ContextBusy)
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.suspended.is_none()
    }
}

/// The current imgui context; suspends it on drop
pub struct ActiveGui<'a> {
    slot: &'a mut Option<SuspendedContext>,
    context: Option<Context>,
}

impl Deref for ActiveGui<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.context.as_ref().expect("active context is present until drop")
    }
}

impl DerefMut for ActiveGui<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.context.as_mut().expect("active context is present until drop")
    }
}

impl Drop for ActiveGui<'_> {
    fn drop(&mut self) {
        if let Some(context) = self.context.take() {
            *self.slot = Some(context.suspend());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // imgui's current context is process-wide, so everything touching it
    // lives in one test
    #[test]
    fn test_one_context_current_at_a_time() {
        let (mut first, ()) = GuiContext::new(|ctx| ctx.style_mut().window_rounding = 7.0).unwrap();
        let (mut second, ()) = GuiContext::new(|_| {}).unwrap();
        assert!(!first.is_active());

        let style = {
            let active = first.activate(None).unwrap();
            assert!(matches!(second.activate(None), Err(EditorError::ContextBusy)));
            active.style().clone()
        };
        assert!(!first.is_active());
        assert!(!second.is_active());

        {
            let active = second.activate(Some(&style)).unwrap();
            assert_eq!(active.style().window_rounding, 7.0);
        }
        assert!(first.activate(None).is_ok());
    }
}
