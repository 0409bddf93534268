use std::fmt::Write;

use crate::segment::Segment;
use crate::token::Token;

/// A segment together with the segments nested inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub segment: Segment,
    pub nodes: Vec<Node>,
}

impl Node {
    fn new(segment: Segment) -> Node {
        Node {
            segment,
            nodes: Vec::new(),
        }
    }

    fn token(&self) -> Token {
        self.segment.token
    }

    fn append_leafs(&self, leafs: &mut Vec<Segment>) {
        if self.nodes.is_empty() {
            leafs.push(self.segment.clone());
        } else {
            for sub in &self.nodes {
                sub.append_leafs(leafs);
            }
        }
    }
}

/// A strictly nested tree over labeled spans.
///
/// Every child is covered by its parent, siblings are pairwise disjoint and
/// ordered by position; equality is structural. The root is a synthetic node
/// whose label is caller-supplied and whose token grows to cover all
/// inserted segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    pub root: Node,
}

/// Reports if any node in the subtree clashes with `t`.
fn clashes_any(node: &Node, t: Token) -> bool {
    node.nodes
        .iter()
        .any(|sub| sub.token().clashes(t) || clashes_any(sub, t))
}

/// Insert `node` below `parent`; the caller has ruled out clashes.
fn place(parent: &mut Node, mut node: Node) {
    // descend into a child that strictly covers the node
    let into = parent.nodes.iter().position(|sub| {
        sub.token().covers(node.token()) && !node.token().covers(sub.token())
    });
    if let Some(i) = into {
        place(&mut parent.nodes[i], node);
        return;
    }
    // lift the children the node covers, then insert it at this level
    let (lifted, kept): (Vec<Node>, Vec<Node>) = parent
        .nodes
        .drain(..)
        .partition(|sub| node.token().covers(sub.token()));
    node.nodes.extend(lifted);
    parent.nodes = kept;
    parent.nodes.push(node);
    parent.nodes.sort_by_key(|sub| sub.token().from);
}

impl Graph {
    pub fn new(name: &str) -> Graph {
        Graph {
            root: Node::new(Segment::new(name, Token::default())),
        }
    }

    /// Insert `segment` into the tree.
    ///
    /// If the segment clashes with any existing node the tree is unchanged
    /// and `false` is returned. Otherwise the segment descends to the node
    /// that covers it, lifting every child it covers itself, and the root
    /// token widens to cover it.
    pub fn append(&mut self, segment: Segment) -> bool {
        let token = segment.token;
        let bkp = self.root.segment.token;
        if !self.root.token().covers(token) {
            self.root.segment.token = if self.root.nodes.is_empty() {
                token
            } else {
                bkp.merge(token)
            };
        }
        if clashes_any(&self.root, token) {
            self.root.segment.token = bkp;
            return false;
        }
        place(&mut self.root, Node::new(segment));
        true
    }

    /// All segments at nodes without children, left to right.
    pub fn leafs(&self) -> Vec<Segment> {
        let mut leafs = Vec::new();
        self.root.append_leafs(&mut leafs);
        leafs
    }

    /// Collapsed-stack lines for flame-graph tooling: every node renders as
    /// `root;…;info length`, where length is the byte length of its token.
    pub fn flame_stack(&self) -> String {
        fn stack_lines(out: &mut String, prefix: &str, node: &Node) {
            let path = if prefix.is_empty() {
                node.segment.info.clone()
            } else {
                format!("{};{}", prefix, node.segment.info)
            };
            writeln!(out, "{} {}", path, node.segment.token.len()).unwrap();
            for sub in &node.nodes {
                stack_lines(out, &path, sub);
            }
        }

        let mut out = String::new();
        stack_lines(&mut out, "", &self.root);
        out
    }
}

/// Fold a flat sequence of labeled segments into a nested tree; segments
/// that clash with already inserted ones are dropped.
pub fn build_graph(name: &str, segments: Vec<Segment>) -> Graph {
    let mut graph = Graph::new(name);
    for segment in segments {
        graph.append(segment);
    }
    graph
}
