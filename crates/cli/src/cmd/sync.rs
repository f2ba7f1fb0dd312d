//! Replay snapshots and print the resulting tree

use crate::render::{self, RenderOptions};
use crate::session;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use treesync::{PassReport, RootStrategy, SyncConfig};

pub fn run(
    config: SyncConfig,
    snapshots: &[PathBuf],
    each: bool,
    options: RenderOptions,
) -> Result<()> {
    let mut last = None;
    let sync = session::replay(config, snapshots, |index, sync, report| {
        if each {
            print_header(index, &snapshots[index], report, options.color);
            print!("{}", render::render_tree(sync, options));
            println!();
        }
        last = Some(*report);
    })?;

    if !each {
        print!("{}", render::render_tree(&sync, options));
    }
    if let Some(report) = last {
        println!("{}", summary(&report));
    }
    Ok(())
}

fn print_header(index: usize, path: &std::path::Path, report: &PassReport, color: bool) {
    let title = format!("Pass {} ({})", index + 1, path.display());
    if color {
        println!("{}", title.bold());
    } else {
        println!("{}", title);
    }
    println!("{}", summary(report));
}

/// One-line description of a pass
pub fn summary(report: &PassReport) -> String {
    let strategy = match report.strategy {
        Some(RootStrategy::SingleImplicitRoot) => "single root",
        Some(RootStrategy::PerScopeRoot) => "per-scope roots",
        None => "no roots",
    };
    if report.is_noop() {
        return format!("{} scope(s), {}, no changes", report.scopes, strategy);
    }
    format!(
        "{} scope(s), {}: +{} -{} ~{} nodes, +{} -{} entries, {} root(s) removed",
        report.scopes,
        strategy,
        report.tree.added,
        report.tree.removed,
        report.tree.updated,
        report.sections.added,
        report.sections.removed,
        report.roots_removed
    )
}
