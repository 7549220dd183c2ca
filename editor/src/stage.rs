//! In-memory scene stage shown by the outliner and properties panels
//!
//! Prims are addressed by absolute slash-separated paths (`/World/Geo/Cube`).
//! A prim's parent must exist before the prim is defined.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// What a prim represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimKind {
    Scope,
    Xform,
    Mesh,
    Camera,
    Light,
}

impl PrimKind {
    pub fn label(&self) -> &'static str {
        match self {
            PrimKind::Scope => "Scope",
            PrimKind::Xform => "Xform",
            PrimKind::Mesh => "Mesh",
            PrimKind::Camera => "Camera",
            PrimKind::Light => "Light",
        }
    }
}

/// A node of the stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prim {
    pub path: String,
    pub kind: PrimKind,
    pub visible: bool,
    pub translate: Vec3,
    pub rotate: Vec3,
    pub scale: Vec3,
}

impl Prim {
    fn new(path: String, kind: PrimKind) -> Self {
        Self {
            path,
            kind,
            visible: true,
            translate: Vec3::ZERO,
            rotate: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Last path segment
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Parent path of `path`, `None` for top-level prims
pub fn parent_path(path: &str) -> Option<&str> {
    let index = path.rfind('/')?;
    if index == 0 {
        None
    } else {
        Some(&path[..index])
    }
}

fn is_valid_path(path: &str) -> bool {
    path.len() > 1 && path.starts_with('/') && !path.ends_with('/') && !path.contains("//")
}

/// Ordered collection of prims
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    prims: BTreeMap<String, Prim>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small stage used when the studio starts
    pub fn demo() -> Self {
        let mut stage = Self::new();
        stage.define("/World", PrimKind::Xform);
        stage.define("/World/Camera", PrimKind::Camera);
        stage.define("/World/Key", PrimKind::Light);
        stage.define("/World/Geo", PrimKind::Scope);
        stage.define("/World/Geo/Ground", PrimKind::Mesh);
        stage.define("/World/Geo/Cube", PrimKind::Mesh);
        stage.define("/World/Geo/Sphere", PrimKind::Mesh);
        if let Some(camera) = stage.get_mut("/World/Camera") {
            camera.translate = Vec3::new(0.0, 2.0, 8.0);
        }
        if let Some(cube) = stage.get_mut("/World/Geo/Cube") {
            cube.translate = Vec3::new(-1.5, 0.5, 0.0);
        }
        if let Some(sphere) = stage.get_mut("/World/Geo/Sphere") {
            sphere.translate = Vec3::new(1.5, 0.5, 0.0);
        }
        stage
    }

    /// Define a prim; fails on malformed paths, duplicates and missing parents
    pub fn define(&mut self, path: &str, kind: PrimKind) -> bool {
        if !is_valid_path(path) || self.prims.contains_key(path) {
            return false;
        }
        if let Some(parent) = parent_path(path) {
            if !self.prims.contains_key(parent) {
                return false;
            }
        }
        debug!(path, kind = kind.label(), "Defined prim");
        self.prims.insert(path.to_string(), Prim::new(path.to_string(), kind));
        true
    }

    pub fn get(&self, path: &str) -> Option<&Prim> {
        self.prims.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut Prim> {
        self.prims.get_mut(path)
    }

    pub fn len(&self) -> usize {
        self.prims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prims.is_empty()
    }

    /// Direct children of `path`, or top-level prims for `None`
    pub fn children(&self, path: Option<&str>) -> Vec<&Prim> {
        self.prims
            .values()
            .filter(|p| parent_path(&p.path) == path)
            .collect()
    }

    /// Remove a prim and everything below it, returning how many were removed
    pub fn remove(&mut self, path: &str) -> usize {
        let prefix = format!("{path}/");
        let before = self.prims.len();
        self.prims.retain(|p, _| p != path && !p.starts_with(&prefix));
        let removed = before - self.prims.len();
        if removed > 0 {
            debug!(path, removed, "Removed prims");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_requires_parent() {
        let mut stage = Stage::new();
        assert!(!stage.define("/World/Cube", PrimKind::Mesh));
        assert!(stage.define("/World", PrimKind::Xform));
        assert!(stage.define("/World/Cube", PrimKind::Mesh));
        assert!(!stage.define("/World/Cube", PrimKind::Mesh));
        assert!(!stage.define("World", PrimKind::Xform));
        assert!(!stage.define("/World/", PrimKind::Xform));
        assert_eq!(stage.len(), 2);
    }

    #[test]
    fn test_children_and_names() {
        let stage = Stage::demo();
        let roots = stage.children(None);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name(), "World");

        let geo: Vec<&str> = stage.children(Some("/World/Geo")).iter().map(|p| p.name()).collect();
        assert_eq!(geo, vec!["Cube", "Ground", "Sphere"]);
    }

    #[test]
    fn test_remove_subtree() {
        let mut stage = Stage::demo();
        // "/World/GeoX" must not be caught by the "/World/Geo" prefix
        stage.define("/World/GeoX", PrimKind::Scope);
        assert_eq!(stage.remove("/World/Geo"), 4);
        assert!(stage.get("/World/GeoX").is_some());
        assert!(stage.get("/World/Geo/Cube").is_none());
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("/World/Geo"), Some("/World"));
        assert_eq!(parent_path("/World"), None);
    }
}
