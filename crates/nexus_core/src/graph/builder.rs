//! Reference graph derivation.
//!
//! # Responsibility
//! - Derive nodes, edges and per-note degree from a note snapshot.
//! - Provide the summary counters shown on the workspace dashboard.
//!
//! # Invariants
//! - Every call rescans the full collection; nothing is cached between calls.
//! - Edges are not deduplicated; a self-reference adds 2 to its note's degree.
//! - `degrees` has exactly one entry per distinct note id.

use crate::graph::links::{count_link_markers, extract_links};
use crate::graph::resolve::TitleIndex;
use crate::model::note::{Note, NoteId};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// One note in the derived graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: NoteId,
    pub title: String,
    /// Opaque grouping tag for rendering.
    pub folder: String,
    pub degree: u32,
}

/// One resolved wiki-link marker, source note to target note.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GraphEdge {
    pub source: NoteId,
    pub target: NoteId,
}

/// Derived reference graph for a note snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct KnowledgeGraph {
    /// One node per note, in snapshot order.
    pub nodes: Vec<GraphNode>,
    /// Resolved references in scan order.
    pub edges: Vec<GraphEdge>,
    pub degrees: BTreeMap<NoteId, u32>,
}

impl KnowledgeGraph {
    pub fn degree_of(&self, id: &str) -> u32 {
        self.degrees.get(id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Dashboard counters for a note snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub note_count: usize,
    pub edge_count: usize,
    /// Raw `[[...]]` markers, resolved or not.
    pub marker_count: usize,
    pub unresolved_count: usize,
    /// Markers per note; `0.0` for an empty workspace.
    pub link_density: f64,
}

/// Builds the reference graph for `notes`.
pub fn build_graph(notes: &[Note]) -> KnowledgeGraph {
    let index = TitleIndex::new(notes);
    let mut degrees: BTreeMap<NoteId, u32> =
        notes.iter().map(|note| (note.id.clone(), 0)).collect();
    let mut edges = Vec::new();

    for note in notes {
        for title in extract_links(&note.content) {
            let Some(target) = index.resolve(&title) else {
                continue;
            };
            edges.push(GraphEdge {
                source: note.id.clone(),
                target: target.id.clone(),
            });
            *degrees.entry(note.id.clone()).or_insert(0) += 1;
            *degrees.entry(target.id.clone()).or_insert(0) += 1;
        }
    }

    let nodes = notes
        .iter()
        .map(|note| GraphNode {
            id: note.id.clone(),
            title: note.title.clone(),
            folder: note.folder.clone(),
            degree: degrees.get(&note.id).copied().unwrap_or(0),
        })
        .collect::<Vec<_>>();

    debug!(
        "event=graph_build module=graph status=ok nodes={} edges={}",
        nodes.len(),
        edges.len()
    );

    KnowledgeGraph {
        nodes,
        edges,
        degrees,
    }
}

/// Computes dashboard counters for `notes` and its derived `graph`.
pub fn graph_stats(notes: &[Note], graph: &KnowledgeGraph) -> GraphStats {
    let marker_count = notes
        .iter()
        .map(|note| count_link_markers(&note.content))
        .sum::<usize>();
    let link_density = if notes.is_empty() {
        0.0
    } else {
        marker_count as f64 / notes.len() as f64
    };

    GraphStats {
        note_count: notes.len(),
        edge_count: graph.edges.len(),
        marker_count,
        unresolved_count: marker_count.saturating_sub(graph.edges.len()),
        link_density,
    }
}

/// Visual circle radius for a node of `degree`.
pub fn node_radius(degree: u32) -> f64 {
    6.0 + f64::from(degree) * 2.0
}

/// Vertical label offset below a node of `degree`.
pub fn label_offset(degree: u32) -> f64 {
    18.0 + f64::from(degree) * 2.0
}
