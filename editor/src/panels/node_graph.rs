//! Node graph panel
//!
//! A small shading network editor. Nodes can be dragged around and their
//! positions are kept per panel, so the graph keeps its arrangement when the
//! panel moves to another window.

use dockspace::Rect;
use glam::Vec2;
use imgui::*;

const NODE_WIDTH: f32 = 140.0;
const HEADER_HEIGHT: f32 = 20.0;
const PORT_SPACING: f32 = 18.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub name: String,
    /// Top-left corner relative to the panel origin and scroll offset
    pub position: Vec2,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl GraphNode {
    pub fn new(name: &str, position: Vec2, inputs: &[&str], outputs: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            position,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn size(&self) -> Vec2 {
        let ports = self.inputs.len().max(self.outputs.len()) as f32;
        Vec2::new(NODE_WIDTH, HEADER_HEIGHT + 8.0 + ports * PORT_SPACING)
    }

    fn input_port(&self, index: usize) -> Vec2 {
        self.position + Vec2::new(0.0, HEADER_HEIGHT + 12.0 + index as f32 * PORT_SPACING)
    }

    fn output_port(&self, index: usize) -> Vec2 {
        self.position + Vec2::new(NODE_WIDTH, HEADER_HEIGHT + 12.0 + index as f32 * PORT_SPACING)
    }
}

/// Connection from an output port to an input port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphLink {
    pub from: (usize, usize),
    pub to: (usize, usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeGraphState {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    pub scroll: Vec2,
    dragging: Option<usize>,
}

impl Default for NodeGraphState {
    fn default() -> Self {
        Self {
            nodes: vec![
                GraphNode::new("Texture", Vec2::new(20.0, 30.0), &["uv"], &["rgb", "alpha"]),
                GraphNode::new("Roughness", Vec2::new(20.0, 140.0), &[], &["value"]),
                GraphNode::new("Surface", Vec2::new(230.0, 60.0), &["base", "opacity", "rough"], &["out"]),
                GraphNode::new("Material", Vec2::new(430.0, 80.0), &["surface"], &[]),
            ],
            links: vec![
                GraphLink { from: (0, 0), to: (2, 0) },
                GraphLink { from: (0, 1), to: (2, 1) },
                GraphLink { from: (1, 0), to: (2, 2) },
                GraphLink { from: (2, 0), to: (3, 0) },
            ],
            scroll: Vec2::ZERO,
            dragging: None,
        }
    }
}

impl NodeGraphState {
    /// Topmost node under `local`, a point relative to the panel origin
    pub fn node_at(&self, local: Vec2) -> Option<usize> {
        let point = local - self.scroll;
        self.nodes.iter().enumerate().rev().find_map(|(index, node)| {
            Rect::from_min_size(node.position, node.size())
                .contains(point)
                .then_some(index)
        })
    }

    /// Start dragging the node under `local`, raising it to the top
    pub fn begin_drag(&mut self, local: Vec2) -> bool {
        let Some(index) = self.node_at(local) else {
            return false;
        };
        let node = self.nodes.remove(index);
        self.nodes.push(node);
        let top = self.nodes.len() - 1;
        for link in &mut self.links {
            for end in [&mut link.from.0, &mut link.to.0] {
                if *end == index {
                    *end = top;
                } else if *end > index {
                    *end -= 1;
                }
            }
        }
        self.dragging = Some(top);
        true
    }

    pub fn drag_by(&mut self, delta: Vec2) {
        if let Some(node) = self.dragging.and_then(|index| self.nodes.get_mut(index)) {
            node.position += delta;
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }
}

/// Draw the node graph panel
pub fn draw_node_graph(ui: &Ui, area: Rect, graph: &mut NodeGraphState) {
    let mouse = Vec2::from(ui.io().mouse_pos);
    let local = mouse - area.min;
    let hovered = area.contains(mouse) && ui.is_window_hovered();

    if hovered && ui.is_mouse_clicked(MouseButton::Left) {
        graph.begin_drag(local);
    }
    if graph.is_dragging() {
        if ui.is_mouse_down(MouseButton::Left) {
            graph.drag_by(Vec2::from(ui.io().mouse_delta));
        } else {
            graph.end_drag();
        }
    } else if hovered && ui.is_mouse_dragging(MouseButton::Right) {
        graph.scroll += Vec2::from(ui.io().mouse_delta);
    }

    let origin = area.min + graph.scroll;
    let draw_list = ui.get_window_draw_list();
    draw_list
        .add_rect(area.min.to_array(), area.max.to_array(), [0.13, 0.13, 0.15, 1.0])
        .filled(true)
        .build();

    for link in &graph.links {
        let (Some(from), Some(to)) = (graph.nodes.get(link.from.0), graph.nodes.get(link.to.0)) else {
            continue;
        };
        let start = origin + from.output_port(link.from.1);
        let end = origin + to.input_port(link.to.1);
        let bend = Vec2::new(((end.x - start.x) * 0.5).abs().max(30.0), 0.0);
        draw_list
            .add_bezier_curve(
                start.to_array(),
                (start + bend).to_array(),
                (end - bend).to_array(),
                end.to_array(),
                [0.9, 0.75, 0.3, 1.0],
            )
            .thickness(2.0)
            .build();
    }

    for (index, node) in graph.nodes.iter().enumerate() {
        let min = origin + node.position;
        let max = min + node.size();
        let header = [0.25, 0.35, 0.55, 1.0];
        let body = if graph.dragging == Some(index) { [0.3, 0.3, 0.34, 1.0] } else { [0.22, 0.22, 0.25, 1.0] };
        draw_list.add_rect(min.to_array(), max.to_array(), body).filled(true).rounding(4.0).build();
        draw_list
            .add_rect(min.to_array(), [max.x, min.y + HEADER_HEIGHT], header)
            .filled(true)
            .rounding(4.0)
            .build();
        draw_list.add_text([min.x + 6.0, min.y + 3.0], [1.0, 1.0, 1.0, 1.0], &node.name);

        for (port, name) in node.inputs.iter().enumerate() {
            let p = origin + node.input_port(port);
            draw_list.add_circle(p.to_array(), 4.0, [0.5, 0.8, 0.5, 1.0]).filled(true).build();
            draw_list.add_text([p.x + 8.0, p.y - 7.0], [0.85, 0.85, 0.85, 1.0], name);
        }
        for (port, name) in node.outputs.iter().enumerate() {
            let p = origin + node.output_port(port);
            draw_list.add_circle(p.to_array(), 4.0, [0.9, 0.75, 0.3, 1.0]).filled(true).build();
            let width = ui.calc_text_size(name)[0];
            draw_list.add_text([p.x - 8.0 - width, p.y - 7.0], [0.85, 0.85, 0.85, 1.0], name);
        }
    }
}
