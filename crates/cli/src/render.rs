//! Text rendering of the presentation tree

use owo_colors::OwoColorize;
use std::fmt::Write;
use treesync::{MemoryTree, Parent, TestItem, TestTree, TreeSync, LOADING_ID};

/// Rendering options
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub color: bool,
    /// Print each node's full id after its label
    pub show_ids: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            show_ids: false,
        }
    }
}

/// Render the whole tree, siblings in host sort order
pub fn render_tree(sync: &TreeSync<MemoryTree>, options: RenderOptions) -> String {
    let mut out = String::new();
    render_children(sync, Parent::Top, 0, options, &mut out);
    out
}

fn render_children(
    sync: &TreeSync<MemoryTree>,
    parent: Parent,
    depth: usize,
    options: RenderOptions,
    out: &mut String,
) {
    let Ok(children) = sync.tree().sorted_children(parent) else {
        return;
    };
    for key in children {
        let Some(item) = sync.tree().item(key) else {
            continue;
        };
        let _ = writeln!(out, "{}{}", "  ".repeat(depth), render_item(item, options));
        render_children(sync, Parent::Item(key), depth + 1, options, out);
    }
}

/// One line for a single node
pub fn render_item(item: &TestItem, options: RenderOptions) -> String {
    let mut line = if item.error.is_some() {
        paint(&item.label, options.color, |s| s.red().to_string())
    } else if item.id == LOADING_ID {
        paint(&item.label, options.color, |s| s.dimmed().to_string())
    } else if item.uri.is_some() && item.range.is_none() {
        paint(&item.label, options.color, |s| s.cyan().to_string())
    } else {
        item.label.clone()
    };

    if let Some(range) = item.range {
        line.push_str(&paint(
            &format!(" :{}", range.start.line + 1),
            options.color,
            |s| s.dimmed().to_string(),
        ));
    }
    if !item.tags.is_empty() {
        line.push(' ');
        line.push_str(&paint(&item.tags.join(" "), options.color, |s| {
            s.yellow().to_string()
        }));
    }
    if let Some(description) = item.description.as_deref().and_then(|d| d.lines().next()) {
        line.push_str(&paint(
            &format!(" ({})", description),
            options.color,
            |s| s.dimmed().to_string(),
        ));
    }
    if options.show_ids {
        line.push_str(&paint(&format!(" [{}]", item.id), options.color, |s| {
            s.dimmed().to_string()
        }));
    }
    line
}

fn paint(text: &str, color: bool, style: impl Fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}
