//! Output
//!
//! Turns selections into braille (an annotated [`Spannable`]) and into
//! speech utterances.

use fos_spannable::{
    ExtraCellsSpan, FormType, SpanError, SpanRegistry, Spannable, TextStyleSpan, ValueSelectionSpan, ValueSpan,
};

use crate::cursor::join_pieces;
use crate::{AutomationTree, NavConfig, NavError, NodeId, Selection};

/// Maps a braille range back to the tree node it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeSpan(pub NodeId);

/// Braille for a selection: the rendered text plus where the selection sits in it
#[derive(Debug, Clone, PartialEq)]
pub struct NavBraille {
    pub text: Spannable,
    pub start_index: usize,
    pub end_index: usize,
}

impl NavBraille {
    /// Node under a braille position (routing keys)
    pub fn node_at(&self, position: usize) -> Option<NodeId> {
        self.text
            .get_spans_of::<NodeSpan>(position, position + 1)
            .last()
            .map(|span| span.0)
    }

    /// Wire form of the text; node back-references are not serialized
    pub fn to_json(&self, registry: &SpanRegistry) -> Result<String, NavError> {
        Ok(registry.to_json(&self.text)?)
    }
}

/// Nodes whose text makes up the output for `selection`.
///
/// Leaves in range contribute, as do containers carrying a value. A caret on
/// a node with no text of its own stands for its leaf descendants.
fn content_nodes(tree: &dyn AutomationTree, selection: &Selection) -> Vec<NodeId> {
    let start = selection.abs_start().node;
    let end = selection.abs_end().node;
    if !tree.contains(start) || !tree.contains(end) {
        return Vec::new();
    }

    if start == end {
        if tree.is_leaf(start) || !tree.text(start).is_empty() || tree.value(start).is_some() {
            return vec![start];
        }
        return subtree_leaves(tree, start);
    }

    let mut nodes = Vec::new();
    let mut current = Some(start);
    while let Some(node) = current {
        if tree.is_leaf(node) || tree.value(node).is_some() {
            nodes.push(node);
        }
        if node == end {
            break;
        }
        current = tree.next_node(node);
    }
    nodes
}

fn subtree_leaves(tree: &dyn AutomationTree, root: NodeId) -> Vec<NodeId> {
    let mut leaves = Vec::new();
    let mut current = tree.next_node(root);
    while let Some(node) = current {
        if !tree.ancestors_of(node).contains(&root) {
            break;
        }
        if tree.is_leaf(node) {
            leaves.push(node);
        }
        current = tree.next_node(node);
    }
    leaves
}

/// Append one node's braille to `out`
fn render_node(tree: &dyn AutomationTree, node: NodeId, out: &mut Spannable) -> Result<(), SpanError> {
    let name = tree.text(node);
    let mut piece = Spannable::new(name);

    if let Some(value) = tree.value(node) {
        if !piece.is_empty() {
            piece.append_str(" ");
        }
        let value_start = piece.length();
        piece.append_str(value);
        let value_end = piece.length();
        piece.set_span(ValueSpan::new(0), value_start, value_end)?;

        if let Some((from, to)) = tree.text_selection(node) {
            let from = (value_start + from).min(value_end);
            let to = (value_start + to).clamp(from, value_end);
            piece.set_span(ValueSelectionSpan, from, to)?;
        }
    }

    let len = piece.length();
    let style = tree.text_style(node);
    if style != FormType::Plain {
        piece.set_span(TextStyleSpan::new(style), 0, len)?;
    }
    if let Some(cells) = tree.braille_cells(node) {
        piece.set_span(ExtraCellsSpan::new(cells), 0, len)?;
    }
    piece.set_span(NodeSpan(node), 0, len)?;

    if !out.is_empty() && !piece.is_empty() {
        out.append_str(" ");
    }
    out.append(&piece);
    Ok(())
}

/// Braille text for `selection`, whole nodes, joined with spaces
pub fn render(tree: &dyn AutomationTree, selection: &Selection) -> Spannable {
    render_with_offsets(tree, selection).0
}

fn render_with_offsets(tree: &dyn AutomationTree, selection: &Selection) -> (Spannable, Vec<(NodeId, usize)>) {
    let mut out = Spannable::default();
    let mut offsets = Vec::new();
    for node in content_nodes(tree, selection) {
        let before = out.length();
        if let Err(err) = render_node(tree, node, &mut out) {
            tracing::warn!("Skipping braille for {}: {}", node, err);
            continue;
        }
        let sep = usize::from(before > 0 && out.length() > before);
        offsets.push((node, before + sep));
    }
    (out, offsets)
}

/// Render plus the selection's position in the rendered text
pub fn braille(tree: &dyn AutomationTree, selection: &Selection) -> NavBraille {
    let (text, offsets) = render_with_offsets(tree, selection);
    let locate = |node: NodeId, index: usize, fallback: usize| {
        offsets
            .iter()
            .find(|(n, _)| *n == node)
            .map_or(fallback, |&(_, at)| (at + index).min(text.length()))
    };

    let start = selection.abs_start();
    let end = selection.abs_end();
    let start_index = locate(start.node, start.index, 0);
    let end_index = locate(end.node, end.index, text.length()).max(start_index);
    NavBraille { text, start_index, end_index }
}

fn describe_state(tree: &dyn AutomationTree, node: NodeId, out: &mut Vec<String>) {
    let state = tree.state(node);
    if let Some(level) = state.level {
        out.push(format!("level {level}"));
    }
    match state.checked {
        Some(true) => out.push("checked".into()),
        Some(false) => out.push("not checked".into()),
        None => {}
    }
    match state.expanded {
        Some(true) => out.push("expanded".into()),
        Some(false) => out.push("collapsed".into()),
        None => {}
    }
    if state.required {
        out.push("required".into());
    }
    if state.disabled {
        out.push("disabled".into());
    }
}

/// Speech utterances for `selection`: text, then value, role and states of a
/// single-node selection
pub fn describe(tree: &dyn AutomationTree, selection: &Selection, config: &NavConfig) -> Vec<String> {
    let mut out = Vec::new();
    let start = selection.abs_start().node;
    if !tree.contains(start) {
        return out;
    }

    let mut text = selection.get_text(tree);
    let single = start == selection.abs_end().node || selection.spans_node(tree).is_some();
    if text.is_empty() && single {
        let leaves = subtree_leaves(tree, start);
        let pieces: Vec<&str> = leaves.iter().map(|&n| tree.text(n)).collect();
        text = join_pieces(&pieces);
    }
    if !text.is_empty() {
        out.push(text);
    }
    if !single {
        return out;
    }

    if let Some(value) = tree.value(start).filter(|v| !v.is_empty()) {
        out.push(value.to_string());
    }
    if config.speak_roles {
        if let Some(role) = tree.role(start).spoken_name() {
            out.push(role.to_string());
        }
    }
    describe_state(tree, start, &mut out);
    out
}
