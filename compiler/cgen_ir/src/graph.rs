//! Struct reference graph.
//!
//! Edges run from a struct to every struct its fields mention. An edge is
//! *by value* when the reference is the field's type itself rather than an
//! element of a list, map, or optional. A cycle made only of by-value edges
//! describes a struct of infinite size and is rejected; other cycles are
//! ordinary recursive configuration.

use rustc_hash::FxHashSet;

use crate::{SchemaError, StructDef, StructId};

/// Adjacency lists over struct ids.
#[derive(Clone, Debug)]
pub struct StructGraph {
    names: Vec<String>,
    /// `(target, by_value)` per struct, in field declaration order.
    edges: Vec<Vec<(StructId, bool)>>,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl StructGraph {
    pub fn new(structs: &[StructDef]) -> Self {
        let names = structs.iter().map(|s| s.name.clone()).collect();
        let edges = structs
            .iter()
            .map(|s| s.fields.iter().flat_map(|f| f.node.struct_refs()).collect())
            .collect();
        StructGraph { names, edges }
    }

    /// Reject by-value cycles.
    pub fn check_cycles(&self) -> Result<(), SchemaError> {
        let mut marks = vec![Mark::Unvisited; self.names.len()];
        let mut stack = Vec::new();
        for start in 0..self.names.len() {
            if marks[start] == Mark::Unvisited {
                self.find_cycle(StructId::new(start), &mut marks, &mut stack)?;
            }
        }
        Ok(())
    }

    fn find_cycle(
        &self,
        id: StructId,
        marks: &mut [Mark],
        stack: &mut Vec<StructId>,
    ) -> Result<(), SchemaError> {
        marks[id.index()] = Mark::InProgress;
        stack.push(id);
        for &(target, by_value) in &self.edges[id.index()] {
            if !by_value {
                continue;
            }
            match marks[target.index()] {
                Mark::InProgress => {
                    let from = stack.iter().position(|s| *s == target).unwrap_or(0);
                    let mut cycle: Vec<String> = stack[from..]
                        .iter()
                        .map(|s| self.names[s.index()].clone())
                        .collect();
                    cycle.push(self.names[target.index()].clone());
                    return Err(SchemaError::CyclicReference { cycle });
                }
                Mark::Unvisited => self.find_cycle(target, marks, stack)?,
                Mark::Done => {}
            }
        }
        stack.pop();
        marks[id.index()] = Mark::Done;
        Ok(())
    }

    /// Every struct, dependencies before dependents where the graph allows.
    ///
    /// Declaration order breaks ties, so the result is deterministic.
    pub fn order(&self) -> Vec<StructId> {
        let mut marks = vec![Mark::Unvisited; self.names.len()];
        let mut order = Vec::with_capacity(self.names.len());
        for start in 0..self.names.len() {
            self.post_order(StructId::new(start), &mut marks, &mut order);
        }
        order
    }

    fn post_order(&self, id: StructId, marks: &mut [Mark], order: &mut Vec<StructId>) {
        if marks[id.index()] != Mark::Unvisited {
            return;
        }
        marks[id.index()] = Mark::InProgress;
        for &(target, _) in &self.edges[id.index()] {
            self.post_order(target, marks, order);
        }
        marks[id.index()] = Mark::Done;
        order.push(id);
    }

    /// Whether `to` is reachable from `from` through one or more edges.
    pub fn reaches(&self, from: StructId, to: StructId) -> bool {
        let mut seen = FxHashSet::default();
        let mut pending: Vec<StructId> = self.edges[from.index()].iter().map(|e| e.0).collect();
        while let Some(id) = pending.pop() {
            if id == to {
                return true;
            }
            if seen.insert(id) {
                pending.extend(self.edges[id.index()].iter().map(|e| e.0));
            }
        }
        false
    }

    /// Structs reachable from `root`, including `root`, in declaration order.
    pub fn reachable_from(&self, root: StructId) -> Vec<StructId> {
        let mut seen = FxHashSet::default();
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if seen.insert(id) {
                pending.extend(self.edges[id.index()].iter().map(|e| e.0));
            }
        }
        let mut ids: Vec<_> = seen.into_iter().collect();
        ids.sort_unstable();
        ids
    }
}
