//! Schema explorer
//!
//! Database → schemas → tables → columns. Nodes live in an arena addressed
//! by [`NodeId`]; the visible rows are a flattened pre-order walk rebuilt
//! after every mutation. Columns are fetched lazily the first time a table
//! is expanded.

use crate::db::{ColumnInfo, SchemaEntry};
use crate::sql::generate;
use crate::ui::cell::{display_width, truncate};
use crate::ui::theme::Theme;
use crate::ui::Component;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::collections::HashMap;

/// Index into the node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Database,
    Schema,
    Table {
        schema: String,
    },
    Column {
        schema: String,
        table: String,
        data_type: String,
        primary_key: bool,
    },
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub name: String,
    pub children: Vec<NodeId>,
    pub expanded: bool,
    /// Children are present; false only for tables whose columns are unknown
    pub loaded: bool,
    parent: Option<NodeId>,
    /// A column fetch has been requested and not yet answered
    fetch_pending: bool,
}

impl TreeNode {
    fn new(kind: NodeKind, name: &str, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            name: name.to_string(),
            children: Vec::new(),
            expanded: false,
            loaded: true,
            parent,
            fetch_pending: false,
        }
    }

    pub fn is_expandable(&self) -> bool {
        !matches!(self.kind, NodeKind::Column { .. })
    }
}

/// One visible row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatItem {
    pub id: NodeId,
    pub depth: usize,
}

/// Request to load the columns of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRequest {
    pub schema: String,
    pub table: String,
}

#[derive(Debug, Default)]
pub struct SchemaTree {
    nodes: Vec<TreeNode>,
    tables: HashMap<(String, String), NodeId>,
    items: Vec<FlatItem>,
    cursor: usize,
    scroll: usize,
    /// Visible rows inside the borders
    height: usize,
    loading: bool,
    error: Option<String>,
}

impl SchemaTree {
    pub fn new() -> Self {
        Self {
            height: 1,
            ..Self::default()
        }
    }

    /// Replace the tree with a fresh skeleton of schemas and tables
    pub fn load(&mut self, database: &str, schemas: &[SchemaEntry]) {
        self.nodes.clear();
        self.tables.clear();

        let root = self.push(TreeNode::new(NodeKind::Database, database, None));
        self.nodes[root.0].expanded = true;

        for entry in schemas {
            let schema_id = self.push(TreeNode::new(NodeKind::Schema, &entry.name, Some(root)));
            self.nodes[root.0].children.push(schema_id);

            for table in &entry.tables {
                let kind = NodeKind::Table {
                    schema: entry.name.clone(),
                };
                let mut node = TreeNode::new(kind, table, Some(schema_id));
                node.loaded = false;
                let table_id = self.push(node);
                self.nodes[schema_id.0].children.push(table_id);
                self.tables
                    .insert((entry.name.clone(), table.clone()), table_id);
            }
        }

        self.loading = false;
        self.error = None;
        self.cursor = 0;
        self.scroll = 0;
        self.flatten();
    }

    /// Fill in a table's columns. Unknown tables (from a reload that raced
    /// the fetch) and tables that already have columns are ignored.
    pub fn attach_columns(&mut self, schema: &str, table: &str, columns: &[ColumnInfo]) {
        let Some(&id) = self.tables.get(&(schema.to_string(), table.to_string())) else {
            tracing::debug!(schema, table, "dropping columns for unknown table");
            return;
        };
        if self.nodes[id.0].loaded {
            tracing::debug!(schema, table, "columns already attached");
            return;
        }

        let children: Vec<NodeId> = columns
            .iter()
            .map(|col| {
                let kind = NodeKind::Column {
                    schema: schema.to_string(),
                    table: table.to_string(),
                    data_type: col.data_type.clone(),
                    primary_key: col.is_primary_key,
                };
                self.push(TreeNode::new(kind, &col.name, Some(id)))
            })
            .collect();

        let node = &mut self.nodes[id.0];
        node.children = children;
        node.loaded = true;
        node.fetch_pending = false;
        self.rebuild();
    }

    /// A column fetch failed: collapse the table so expanding retries
    pub fn fetch_failed(&mut self, schema: &str, table: &str) {
        let Some(&id) = self.tables.get(&(schema.to_string(), table.to_string())) else {
            return;
        };
        let node = &mut self.nodes[id.0];
        node.fetch_pending = false;
        node.expanded = false;
        self.rebuild();
    }

    /// Flip the node at `index`. Expanding an unloaded table asks for its
    /// columns, once, and shows it expanded while they load.
    pub fn toggle_expand(&mut self, index: usize) -> Option<ColumnRequest> {
        let id = self.items.get(index)?.id;
        let node = &mut self.nodes[id.0];
        if !node.is_expandable() {
            return None;
        }

        if node.expanded {
            node.expanded = false;
            self.rebuild();
            return None;
        }

        node.expanded = true;
        let request = match &node.kind {
            NodeKind::Table { schema } if !node.loaded && !node.fetch_pending => {
                node.fetch_pending = true;
                Some(ColumnRequest {
                    schema: schema.clone(),
                    table: node.name.clone(),
                })
            }
            _ => None,
        };
        self.rebuild();
        request
    }

    /// Expand without toggling
    pub fn expand(&mut self, index: usize) -> Option<ColumnRequest> {
        let node = self.node_at(index)?;
        if !node.is_expandable() || node.expanded {
            return None;
        }
        self.toggle_expand(index)
    }

    /// Collapse without toggling; on a leaf or a collapsed node the cursor
    /// moves to the parent instead
    pub fn collapse(&mut self, index: usize) {
        let Some(item) = self.items.get(index) else {
            return;
        };
        let node = &mut self.nodes[item.id.0];
        if node.is_expandable() && node.expanded {
            node.expanded = false;
            self.rebuild();
            return;
        }
        if let Some(parent) = node.parent
            && let Some(pos) = self.items.iter().position(|it| it.id == parent)
        {
            self.cursor = pos;
            self.ensure_visible();
        }
    }

    /// `(schema, table)` for a table row or one of its columns
    pub fn selected_table(&self, index: usize) -> Option<(String, String)> {
        let node = self.node_at(index)?;
        match &node.kind {
            NodeKind::Table { schema } => Some((schema.clone(), node.name.clone())),
            NodeKind::Column { schema, table, .. } => Some((schema.clone(), table.clone())),
            NodeKind::Database | NodeKind::Schema => None,
        }
    }

    pub fn preview_query(&self) -> Option<String> {
        self.selected_table(self.cursor)
            .map(|(schema, table)| generate::preview_query(&schema, &table))
    }

    pub fn count_query(&self) -> Option<String> {
        self.selected_table(self.cursor)
            .map(|(schema, table)| generate::count_query(&schema, &table))
    }

    // ── cursor ───────────────────────────────────────────────

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.ensure_visible();
    }

    pub fn move_down(&mut self) {
        self.cursor = (self.cursor + 1).min(self.last_index());
        self.ensure_visible();
    }

    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.height);
        self.ensure_visible();
    }

    pub fn page_down(&mut self) {
        self.cursor = (self.cursor + self.height).min(self.last_index());
        self.ensure_visible();
    }

    pub fn go_to_top(&mut self) {
        self.cursor = 0;
        self.ensure_visible();
    }

    pub fn go_to_bottom(&mut self) {
        self.cursor = self.last_index();
        self.ensure_visible();
    }

    pub fn toggle_selected(&mut self) -> Option<ColumnRequest> {
        self.toggle_expand(self.cursor)
    }

    pub fn expand_selected(&mut self) -> Option<ColumnRequest> {
        self.expand(self.cursor)
    }

    pub fn collapse_selected(&mut self) {
        self.collapse(self.cursor);
    }

    // ── state ────────────────────────────────────────────────

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if loading {
            self.error = None;
        }
    }

    pub fn set_error(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }

    /// Clear everything, as after a disconnect
    pub fn reset(&mut self) {
        let height = self.height;
        *self = Self::new();
        self.height = height;
    }

    /// Height of the whole pane, borders included
    pub fn resize(&mut self, pane_height: u16) {
        self.height = usize::from(pane_height.saturating_sub(2)).max(1);
        self.ensure_visible();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn items(&self) -> &[FlatItem] {
        &self.items
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn node_at(&self, index: usize) -> Option<&TreeNode> {
        self.items.get(index).map(|it| &self.nodes[it.id.0])
    }

    pub fn find_table(&self, schema: &str, table: &str) -> Option<&TreeNode> {
        self.tables
            .get(&(schema.to_string(), table.to_string()))
            .map(|id| &self.nodes[id.0])
    }

    // ── internals ────────────────────────────────────────────

    fn push(&mut self, node: TreeNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn last_index(&self) -> usize {
        self.items.len().saturating_sub(1)
    }

    /// Re-flatten while keeping the cursor on the same node when it is
    /// still visible
    fn rebuild(&mut self) {
        let selected = self.items.get(self.cursor).map(|it| it.id);
        self.flatten();
        if let Some(id) = selected
            && let Some(pos) = self.items.iter().position(|it| it.id == id)
        {
            self.cursor = pos;
        }
        self.cursor = self.cursor.min(self.last_index());
        self.ensure_visible();
    }

    fn flatten(&mut self) {
        self.items.clear();
        if self.nodes.is_empty() {
            return;
        }
        let mut stack = vec![(NodeId(0), 0)];
        while let Some((id, depth)) = stack.pop() {
            self.items.push(FlatItem { id, depth });
            let node = &self.nodes[id.0];
            if node.expanded {
                stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
            }
        }
    }

    fn ensure_visible(&mut self) {
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + self.height {
            self.scroll = self.cursor + 1 - self.height;
        }
        self.scroll = self.scroll.min(self.items.len().saturating_sub(self.height));
    }
}

/// Indented label and muted suffix for one row, together at most `width`
/// columns wide
fn row_text(node: &TreeNode, depth: usize, width: usize) -> (String, String) {
    let glyph = match (node.is_expandable(), node.expanded) {
        (true, true) => "▼ ",
        (true, false) => "▶ ",
        (false, _) => "  ",
    };
    let label = format!("{}{}{}", "  ".repeat(depth), glyph, node.name);
    let label_width = display_width(&label);
    if label_width >= width {
        return (truncate(&label, width).into_owned(), String::new());
    }

    let suffix = match &node.kind {
        NodeKind::Column { data_type, .. } => format!(" {}", data_type),
        _ => String::new(),
    };
    let suffix = truncate(&suffix, width - label_width).into_owned();
    (label, suffix)
}

impl Component for SchemaTree {
    fn render(&self, frame: &mut Frame, area: Rect, focused: bool, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Explorer ")
            .border_style(theme.border_style(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.loading {
            let p = Paragraph::new(Span::styled("Loading schema...", theme.muted));
            frame.render_widget(p, inner);
            return;
        }
        if let Some(error) = &self.error {
            let p = Paragraph::new(Span::styled(error.as_str(), theme.results_error_text))
                .wrap(Wrap { trim: false });
            frame.render_widget(p, inner);
            return;
        }
        if self.nodes.is_empty() {
            let p = Paragraph::new(Span::styled("Not connected", theme.muted));
            frame.render_widget(p, inner);
            return;
        }

        let width = usize::from(inner.width);
        let rows = usize::from(inner.height);
        let lines: Vec<Line> = self
            .items
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(rows)
            .map(|(i, item)| {
                let node = &self.nodes[item.id.0];
                let (label, suffix) = row_text(node, item.depth, width);
                let style = match &node.kind {
                    NodeKind::Database => theme.tree_database,
                    NodeKind::Schema => theme.tree_schema,
                    NodeKind::Table { .. } => theme.tree_table,
                    NodeKind::Column {
                        primary_key: true, ..
                    } => theme.tree_primary_key,
                    NodeKind::Column { .. } => theme.tree_column,
                };
                if i == self.cursor && focused {
                    Line::from(format!("{}{}", label, suffix)).style(theme.tree_selected)
                } else if i == self.cursor {
                    Line::from(vec![
                        Span::styled(label, style.add_modifier(Modifier::REVERSED)),
                        Span::styled(suffix, theme.muted),
                    ])
                } else {
                    Line::from(vec![
                        Span::styled(label, style),
                        Span::styled(suffix, theme.muted),
                    ])
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
