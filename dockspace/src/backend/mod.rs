//! [`DockUi`](crate::DockUi) implementations for concrete GUI toolkits

#[cfg(feature = "imgui")]
pub mod imgui;
