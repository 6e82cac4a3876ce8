//! Deferred graph edits, queued from listeners or other threads and applied
//! between ticks.

use std::sync::mpsc::Sender;

use super::state::{Link, NodeSpec};

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddNode(NodeSpec),
    RemoveNode(String),
    AddLink(Link),
    RemoveLink { source: String, target: String },
    Pin { id: String, x: f64, y: f64 },
    Unpin(String),
    Stop,
}

/// Cloneable handle for queueing [`Mutation`]s. Sends never block; once the
/// simulation is dropped they are silently discarded.
#[derive(Clone)]
pub struct Mutator {
    sender: Sender<Mutation>,
}

impl Mutator {
    pub(crate) fn new(sender: Sender<Mutation>) -> Self {
        Self { sender }
    }

    pub fn send(&self, mutation: Mutation) {
        let _ = self.sender.send(mutation);
    }

    pub fn add_node(&self, spec: NodeSpec) {
        self.send(Mutation::AddNode(spec));
    }

    pub fn remove_node(&self, id: impl Into<String>) {
        self.send(Mutation::RemoveNode(id.into()));
    }

    pub fn add_link(&self, link: Link) {
        self.send(Mutation::AddLink(link));
    }

    pub fn remove_link(&self, source: impl Into<String>, target: impl Into<String>) {
        self.send(Mutation::RemoveLink {
            source: source.into(),
            target: target.into(),
        });
    }

    pub fn pin(&self, id: impl Into<String>, x: f64, y: f64) {
        self.send(Mutation::Pin { id: id.into(), x, y });
    }

    pub fn unpin(&self, id: impl Into<String>) {
        self.send(Mutation::Unpin(id.into()));
    }

    /// Stops the simulation before its next tick.
    pub fn stop(&self) {
        self.send(Mutation::Stop);
    }
}
