//! Force-directed layout for the reference graph.
//!
//! # Responsibility
//! - Assign 2-D positions to graph nodes via an iterative force simulation.
//! - Track per-node drag state and report clicks as selection events.
//! - Keep physics free of rendering concerns; pan/zoom is a separate transform.
//!
//! # Invariants
//! - `step` is deterministic: the same state and config give the same result.
//! - A dragging node sits exactly at its pin after every step.
//! - An empty state is a no-op for every operation.
//!
//! Forces run in a fixed order each step: link, many-body, centering,
//! collision. Velocities are integrated last.

use crate::graph::builder::{node_radius, GraphEdge, GraphNode};
use crate::model::note::NoteId;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;
const INITIAL_RADIUS: f64 = 10.0;
const MAX_LAYOUT_TICKS: usize = 10_000;

const LCG_A: u32 = 1_664_525;
const LCG_C: u32 = 1_013_904_223;
const LCG_M: f64 = 4_294_967_296.0;

/// Tunable simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForceConfig {
    /// Rest length of link springs.
    pub link_distance: f64,
    /// Many-body charge; negative values repel.
    pub charge_strength: f64,
    /// Per-node collision radius; two nodes keep `2 * radius` apart.
    pub collision_radius: f64,
    pub collision_strength: f64,
    pub center_strength: f64,
    pub alpha_min: f64,
    pub alpha_decay: f64,
    /// Fraction of velocity removed each step.
    pub velocity_decay: f64,
    /// Alpha target applied while any node is being dragged.
    pub drag_alpha_target: f64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            link_distance: 100.0,
            charge_strength: -200.0,
            collision_radius: 40.0,
            collision_strength: 1.0,
            center_strength: 1.0,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
        }
    }
}

/// Viewport size used for seeding and as the centering target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    /// Builds a canvas, substituting 800x600 for unusable dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: usable_or(width, DEFAULT_CANVAS_WIDTH),
            height: usable_or(height, DEFAULT_CANVAS_HEIGHT),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

fn usable_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Interaction state of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Free,
    /// Pinned to the pointer. `moved` separates a drag from a click.
    Dragging { x: f64, y: f64, moved: bool },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// Simulation record for one graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct SimNode {
    pub id: NoteId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Visual radius derived from degree.
    pub radius: f64,
    pub drag: DragState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SimLink {
    source: usize,
    target: usize,
    strength: f64,
    bias: f64,
}

/// Position emitted to the renderer after a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: NoteId,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Output event produced by the drag protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEvent {
    /// A node was pressed and released without moving.
    NoteSelected(NoteId),
}

/// Complete simulation state. Advanced only through [`step`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutState {
    pub alpha: f64,
    pub alpha_target: f64,
    pub center: (f64, f64),
    pub nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    jiggle_seed: u32,
}

impl LayoutState {
    /// Seeds nodes on a phyllotaxis spiral around the canvas centre.
    ///
    /// Edges whose endpoints are not among `nodes` are ignored. Duplicate
    /// node ids keep the first occurrence as the link endpoint.
    pub fn seed(nodes: &[GraphNode], edges: &[GraphEdge], canvas: Canvas) -> Self {
        let center = canvas.center();
        let initial_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());

        let sim_nodes = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let i = index as f64;
                let radius = INITIAL_RADIUS * (0.5 + i).sqrt();
                let angle = i * initial_angle;
                SimNode {
                    id: node.id.clone(),
                    x: center.0 + radius * angle.cos(),
                    y: center.1 + radius * angle.sin(),
                    vx: 0.0,
                    vy: 0.0,
                    radius: node_radius(node.degree),
                    drag: DragState::Free,
                }
            })
            .collect::<Vec<_>>();

        let mut index_by_id: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_id.entry(node.id.as_str()).or_insert(index);
        }

        let resolved = edges
            .iter()
            .filter_map(|edge| {
                let source = index_by_id.get(edge.source.as_str())?;
                let target = index_by_id.get(edge.target.as_str())?;
                Some((*source, *target))
            })
            .collect::<Vec<_>>();

        let mut counts = vec![0_u32; sim_nodes.len()];
        for (source, target) in &resolved {
            counts[*source] += 1;
            counts[*target] += 1;
        }

        let links = resolved
            .into_iter()
            .map(|(source, target)| {
                let source_count = f64::from(counts[source]);
                let target_count = f64::from(counts[target]);
                SimLink {
                    source,
                    target,
                    strength: 1.0 / source_count.min(target_count),
                    bias: source_count / (source_count + target_count),
                }
            })
            .collect();

        Self {
            alpha: 1.0,
            alpha_target: 0.0,
            center,
            nodes: sim_nodes,
            links,
            jiggle_seed: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn positions(&self) -> Vec<NodePosition> {
        self.nodes
            .iter()
            .map(|node| NodePosition {
                id: node.id.clone(),
                x: node.x,
                y: node.y,
                radius: node.radius,
            })
            .collect()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    fn any_dragging(&self) -> bool {
        self.nodes.iter().any(|node| node.drag.is_dragging())
    }

    /// Tiny deterministic offset used to separate coincident points.
    fn jiggle(&mut self) -> f64 {
        self.jiggle_seed = self
            .jiggle_seed
            .wrapping_mul(LCG_A)
            .wrapping_add(LCG_C);
        (f64::from(self.jiggle_seed) / LCG_M - 0.5) * 1e-6
    }
}

/// Advances the simulation by one step.
pub fn step(mut state: LayoutState, config: &ForceConfig) -> LayoutState {
    if state.nodes.is_empty() {
        return state;
    }

    state.alpha += (state.alpha_target - state.alpha) * config.alpha_decay;
    let alpha = state.alpha;

    apply_link_force(&mut state, config, alpha);
    apply_many_body_force(&mut state, config, alpha);
    apply_center_force(&mut state, config);
    apply_collision_force(&mut state, config);

    let retain = 1.0 - config.velocity_decay;
    for node in &mut state.nodes {
        match node.drag {
            DragState::Free => {
                node.vx *= retain;
                node.vy *= retain;
                node.x += node.vx;
                node.y += node.vy;
            }
            DragState::Dragging { x, y, .. } => {
                node.x = x;
                node.y = y;
                node.vx = 0.0;
                node.vy = 0.0;
            }
        }
    }

    state
}

fn apply_link_force(state: &mut LayoutState, config: &ForceConfig, alpha: f64) {
    for index in 0..state.links.len() {
        let link = state.links[index];
        // Self-links pull a node toward itself with zero net effect.
        if link.source == link.target {
            continue;
        }
        let (source, target) = (&state.nodes[link.source], &state.nodes[link.target]);
        let mut dx = target.x + target.vx - source.x - source.vx;
        let mut dy = target.y + target.vy - source.y - source.vy;
        if dx == 0.0 {
            dx = state.jiggle();
        }
        if dy == 0.0 {
            dy = state.jiggle();
        }

        let distance = (dx * dx + dy * dy).sqrt();
        let scale = (distance - config.link_distance) / distance * alpha * link.strength;
        dx *= scale;
        dy *= scale;

        let target = &mut state.nodes[link.target];
        target.vx -= dx * link.bias;
        target.vy -= dy * link.bias;
        let source = &mut state.nodes[link.source];
        source.vx += dx * (1.0 - link.bias);
        source.vy += dy * (1.0 - link.bias);
    }
}

fn apply_many_body_force(state: &mut LayoutState, config: &ForceConfig, alpha: f64) {
    let count = state.nodes.len();
    for i in 0..count {
        for j in 0..count {
            if i == j {
                continue;
            }
            let mut dx = state.nodes[j].x - state.nodes[i].x;
            let mut dy = state.nodes[j].y - state.nodes[i].y;
            if dx == 0.0 {
                dx = state.jiggle();
            }
            if dy == 0.0 {
                dy = state.jiggle();
            }
            let mut distance_sq = dx * dx + dy * dy;
            if distance_sq < 1.0 {
                distance_sq = distance_sq.sqrt();
            }
            let weight = config.charge_strength * alpha / distance_sq;
            let node = &mut state.nodes[i];
            node.vx += dx * weight;
            node.vy += dy * weight;
        }
    }
}

fn apply_center_force(state: &mut LayoutState, config: &ForceConfig) {
    let count = state.nodes.len() as f64;
    let (sum_x, sum_y) = state
        .nodes
        .iter()
        .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
    let shift_x = (sum_x / count - state.center.0) * config.center_strength;
    let shift_y = (sum_y / count - state.center.1) * config.center_strength;
    for node in &mut state.nodes {
        node.x -= shift_x;
        node.y -= shift_y;
    }
}

fn apply_collision_force(state: &mut LayoutState, config: &ForceConfig) {
    let radius = config.collision_radius;
    let min_distance = radius * 2.0;
    let count = state.nodes.len();
    for i in 0..count {
        let xi = state.nodes[i].x + state.nodes[i].vx;
        let yi = state.nodes[i].y + state.nodes[i].vy;
        for j in (i + 1)..count {
            let mut dx = xi - state.nodes[j].x - state.nodes[j].vx;
            let mut dy = yi - state.nodes[j].y - state.nodes[j].vy;
            let mut distance_sq = dx * dx + dy * dy;
            if distance_sq >= min_distance * min_distance {
                continue;
            }
            if dx == 0.0 {
                dx = state.jiggle();
                distance_sq += dx * dx;
            }
            if dy == 0.0 {
                dy = state.jiggle();
                distance_sq += dy * dy;
            }
            let distance = distance_sq.sqrt();
            let scale = (min_distance - distance) / distance * config.collision_strength;
            dx *= scale;
            dy *= scale;

            // Equal radii split the correction evenly.
            state.nodes[i].vx += dx * 0.5;
            state.nodes[i].vy += dy * 0.5;
            state.nodes[j].vx -= dx * 0.5;
            state.nodes[j].vy -= dy * 0.5;
        }
    }
}

/// Scheduler status of a [`ForceSimulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationStatus {
    Running,
    Settled,
    Stopped,
}

/// Result of one scheduler tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Moved(Vec<NodePosition>),
    Settled,
    Stopped,
}

/// Frame-driven wrapper around [`step`].
///
/// The caller drives `tick` once per animation frame and calls `stop` when
/// the graph view goes away.
#[derive(Debug, Clone)]
pub struct ForceSimulation {
    state: LayoutState,
    config: ForceConfig,
    status: SimulationStatus,
}

impl ForceSimulation {
    pub fn new(nodes: &[GraphNode], edges: &[GraphEdge], canvas: Canvas, config: ForceConfig) -> Self {
        let state = LayoutState::seed(nodes, edges, canvas);
        let status = if state.is_empty() {
            SimulationStatus::Settled
        } else {
            SimulationStatus::Running
        };
        Self {
            state,
            config,
            status,
        }
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == SimulationStatus::Running
    }

    pub fn positions(&self) -> Vec<NodePosition> {
        self.state.positions()
    }

    /// Runs one step if the simulation is active.
    pub fn tick(&mut self) -> TickOutcome {
        match self.status {
            SimulationStatus::Stopped => return TickOutcome::Stopped,
            SimulationStatus::Settled => return TickOutcome::Settled,
            SimulationStatus::Running => {}
        }
        if self.state.is_empty() {
            self.status = SimulationStatus::Settled;
            return TickOutcome::Settled;
        }

        self.state = step(std::mem::take(&mut self.state), &self.config);
        if self.state.alpha < self.config.alpha_min {
            self.status = SimulationStatus::Settled;
            debug!(
                "event=layout_settled module=layout status=ok nodes={}",
                self.state.nodes.len()
            );
        }
        TickOutcome::Moved(self.state.positions())
    }

    /// Cancels the tick loop. Further ticks do no work until `restart`.
    pub fn stop(&mut self) {
        self.status = SimulationStatus::Stopped;
    }

    /// Resumes ticking from the current alpha.
    pub fn restart(&mut self) {
        if !self.state.is_empty() {
            self.status = SimulationStatus::Running;
        }
    }

    /// Pins a node under the pointer. Returns `false` for unknown ids.
    ///
    /// The first concurrent drag reheats the simulation.
    pub fn begin_drag(&mut self, id: &str) -> bool {
        let Some(index) = self.state.index_of(id) else {
            return false;
        };
        if !self.state.any_dragging() {
            self.state.alpha_target = self.config.drag_alpha_target;
            self.restart();
        }
        let node = &mut self.state.nodes[index];
        node.drag = DragState::Dragging {
            x: node.x,
            y: node.y,
            moved: false,
        };
        true
    }

    /// Moves the pin of a dragging node. Free nodes are left untouched.
    pub fn drag_to(&mut self, id: &str, x: f64, y: f64) {
        let Some(index) = self.state.index_of(id) else {
            return;
        };
        if let DragState::Dragging {
            x: pin_x,
            y: pin_y,
            moved,
        } = self.state.nodes[index].drag
        {
            let moved = moved || pin_x != x || pin_y != y;
            self.state.nodes[index].drag = DragState::Dragging { x, y, moved };
        }
    }

    /// Releases a pinned node.
    ///
    /// Returns `NoteSelected` when the pointer never moved during the drag.
    pub fn end_drag(&mut self, id: &str) -> Option<LayoutEvent> {
        let index = self.state.index_of(id)?;
        let DragState::Dragging { moved, .. } = self.state.nodes[index].drag else {
            return None;
        };
        self.state.nodes[index].drag = DragState::Free;
        if !self.state.any_dragging() {
            self.state.alpha_target = 0.0;
        }
        if moved {
            None
        } else {
            Some(LayoutEvent::NoteSelected(self.state.nodes[index].id.clone()))
        }
    }
}

/// Runs a fresh simulation until it settles and returns final positions.
pub fn layout(nodes: &[GraphNode], edges: &[GraphEdge], width: f64, height: f64) -> Vec<NodePosition> {
    layout_with(nodes, edges, Canvas::new(width, height), &ForceConfig::default())
}

/// [`layout`] with explicit configuration.
pub fn layout_with(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    canvas: Canvas,
    config: &ForceConfig,
) -> Vec<NodePosition> {
    let mut state = LayoutState::seed(nodes, edges, canvas);
    if state.is_empty() {
        return Vec::new();
    }
    let mut ticks = 0;
    while state.alpha >= config.alpha_min && ticks < MAX_LAYOUT_TICKS {
        state = step(state, config);
        ticks += 1;
    }
    debug!(
        "event=layout_run module=layout status=ok nodes={} ticks={}",
        state.nodes.len(),
        ticks
    );
    state.positions()
}

/// Pan/zoom transform applied at render time: `screen = sim * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            k: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl ViewTransform {
    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        (point.0 * self.k + self.x, point.1 * self.k + self.y)
    }

    /// Maps a screen point back to simulation coordinates.
    pub fn invert(&self, point: (f64, f64)) -> (f64, f64) {
        ((point.0 - self.x) / self.k, (point.1 - self.y) / self.k)
    }

    pub fn translate_by(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Scales by `factor` keeping the screen point `anchor` fixed.
    ///
    /// Non-positive or non-finite factors leave the transform unchanged.
    pub fn zoom_about(self, factor: f64, anchor: (f64, f64)) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        let fixed = self.invert(anchor);
        let k = self.k * factor;
        Self {
            k,
            x: anchor.0 - fixed.0 * k,
            y: anchor.1 - fixed.1 * k,
        }
    }
}
