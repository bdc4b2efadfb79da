//! Generic directed graph
//!
//! Vertices are identified by a string key rather than by value, so two
//! different values with the same key are the same vertex as far as edges are
//! concerned. Vertices keep insertion order; edges are an ordered list and may
//! repeat.

use std::collections::HashSet;

/// Anything that can be stored as a graph vertex
pub trait Vertex {
    /// Identity of the vertex inside a graph
    fn key(&self) -> String;
}

/// `from` depends on `to`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn touches(&self, key: &str) -> bool {
        self.from == key || self.to == key
    }
}

#[derive(Debug, Clone)]
pub struct Digraph<N> {
    vertices: Vec<N>,
    edges: Vec<Edge>,
}

impl<N: Vertex> Digraph<N> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Append a vertex; callers avoid duplicate keys
    pub fn add_node(&mut self, node: N) {
        self.vertices.push(node);
    }

    /// Append an edge, inserting either endpoint whose key is not yet present
    pub fn add_edge(&mut self, source: N, destination: N) {
        let edge = Edge::new(source.key(), destination.key());

        if !self.contains_key(&edge.from) {
            self.vertices.push(source);
        }
        if !self.contains_key(&edge.to) {
            self.vertices.push(destination);
        }

        self.edges.push(edge);
    }

    /// Remove every vertex with `node`'s key and every edge touching it
    pub fn remove(&mut self, node: &N) {
        self.remove_key(&node.key());
    }

    pub fn remove_key(&mut self, key: &str) {
        self.vertices.retain(|vertex| vertex.key() != key);
        self.edges.retain(|edge| !edge.touches(key));
    }

    /// Rebuild the edge list; `None` drops an edge
    pub fn rewrite_edges<F>(&mut self, mut rewrite: F)
    where
        F: FnMut(&Edge) -> Option<Edge>,
    {
        self.edges = self.edges.iter().filter_map(|edge| rewrite(edge)).collect();
    }

    pub fn has_node<P>(&self, predicate: P) -> bool
    where
        P: Fn(&N) -> bool,
    {
        self.vertices.iter().any(predicate)
    }

    /// First vertex matching the predicate
    pub fn find<P>(&self, predicate: P) -> Option<&N>
    where
        P: Fn(&N) -> bool,
    {
        self.vertices.iter().find(|vertex| predicate(vertex))
    }

    pub fn filter<P>(&self, predicate: P) -> Vec<&N>
    where
        P: Fn(&N) -> bool,
    {
        self.vertices.iter().filter(|vertex| predicate(vertex)).collect()
    }

    pub fn get(&self, key: &str) -> Option<&N> {
        self.vertices.iter().find(|vertex| vertex.key() == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Vertices one outgoing edge away from `node`, in edge order
    pub fn out_neighbors(&self, node: &N) -> Vec<&N> {
        self.neighbors(&node.key(), |edge| (&edge.from, &edge.to))
    }

    /// Vertices with an edge into `node`, in edge order
    pub fn in_neighbors(&self, node: &N) -> Vec<&N> {
        self.neighbors(&node.key(), |edge| (&edge.to, &edge.from))
    }

    fn neighbors<'a, F>(&'a self, key: &str, endpoints: F) -> Vec<&'a N>
    where
        F: Fn(&'a Edge) -> (&'a String, &'a String),
    {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .map(endpoints)
            .filter(|(near, _)| near.as_str() == key)
            .filter(|&(_, far)| seen.insert(far.as_str()))
            .filter_map(|(_, far)| self.get(far.as_str()))
            .collect()
    }

    /// Pre-order depth-first traversal from `root`, root first
    ///
    /// Each key is visited once, so cycles and diamonds terminate. A root that
    /// is not in the graph yields nothing.
    pub fn depth_first_search(&self, root: &N) -> Vec<&N> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![root.key()];

        while let Some(key) = stack.pop() {
            if visited.contains(&key) {
                continue;
            }
            let Some(vertex) = self.get(&key) else {
                continue;
            };

            visited.insert(key.clone());
            order.push(vertex);

            // Reverse so the first edge is explored first
            let children: Vec<String> = self
                .edges
                .iter()
                .filter(|edge| edge.from == key)
                .map(|edge| edge.to.clone())
                .collect();
            stack.extend(
                children
                    .into_iter()
                    .rev()
                    .filter(|child| !visited.contains(child)),
            );
        }

        order
    }

    pub fn vertices(&self) -> &[N] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges whose endpoints are missing from the vertex set
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|edge| !self.contains_key(&edge.from) || !self.contains_key(&edge.to))
            .collect()
    }
}

impl<N: Vertex> Default for Digraph<N> {
    fn default() -> Self {
        Self::new()
    }
}
