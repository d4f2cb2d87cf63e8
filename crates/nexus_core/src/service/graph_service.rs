//! Knowledge-graph use-case service.
//!
//! # Responsibility
//! - Load the current note snapshot and hand it to the graph engines.
//!
//! # Invariants
//! - Every call rebuilds the graph from stored notes; nothing is cached.

use crate::graph::builder::{build_graph, graph_stats, GraphStats, KnowledgeGraph};
use crate::graph::layout::{layout_with, Canvas, ForceConfig, ForceSimulation, NodePosition};
use crate::repo::workspace_store::{StoreResult, WorkspaceStore};
use log::{error, info};
use serde::Serialize;
use std::time::Instant;

/// Graph plus settled node positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphLayout {
    pub graph: KnowledgeGraph,
    pub positions: Vec<NodePosition>,
}

/// Graph service facade over a workspace store.
pub struct GraphService<S: WorkspaceStore> {
    store: S,
    config: ForceConfig,
}

impl<S: WorkspaceStore> GraphService<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, ForceConfig::default())
    }

    pub fn with_config(store: S, config: ForceConfig) -> Self {
        Self { store, config }
    }

    /// Derives the reference graph for the stored notes.
    pub fn knowledge_graph(&self) -> StoreResult<KnowledgeGraph> {
        let started_at = Instant::now();
        let notes = self.store.load_notes().map_err(|err| {
            error!("event=graph_build module=service status=error error={err}");
            err
        })?;
        let graph = build_graph(&notes);
        info!(
            "event=graph_build module=service status=ok notes={} edges={} duration_ms={}",
            graph.nodes.len(),
            graph.edges.len(),
            started_at.elapsed().as_millis()
        );
        Ok(graph)
    }

    /// Dashboard counters for the stored notes.
    pub fn graph_stats(&self) -> StoreResult<GraphStats> {
        let notes = self.store.load_notes()?;
        let graph = build_graph(&notes);
        Ok(graph_stats(&notes, &graph))
    }

    /// Builds the graph and runs the layout to rest.
    pub fn layout(&self, canvas: Canvas) -> StoreResult<GraphLayout> {
        let graph = self.knowledge_graph()?;
        let started_at = Instant::now();
        let positions = layout_with(&graph.nodes, &graph.edges, canvas, &self.config);
        info!(
            "event=graph_layout module=service status=ok nodes={} duration_ms={}",
            positions.len(),
            started_at.elapsed().as_millis()
        );
        Ok(GraphLayout { graph, positions })
    }

    /// Starts an interactive simulation for a graph view.
    pub fn simulation(&self, canvas: Canvas) -> StoreResult<ForceSimulation> {
        let graph = self.knowledge_graph()?;
        Ok(ForceSimulation::new(
            &graph.nodes,
            &graph.edges,
            canvas,
            self.config,
        ))
    }
}
