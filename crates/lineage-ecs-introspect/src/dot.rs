//! Graphviz rendering.
//!
//! Managers are drawn as `m<id>` and column nodes as `n<id>`. Every field
//! holding a link is a record port with an edge to its target.

use std::{fmt, path::Path};

use tracing::debug;

use crate::{ColumnRecord, ManagerRecord, Result, WorldSnapshot};

/// Escape characters that are special inside record labels.
fn escape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '<' | '>' | '{' | '}' | '|' | '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Graphviz rendering of a [`WorldSnapshot`], created by
/// [`WorldSnapshot::dot`].
///
/// Node records come first, then every edge.
pub struct Dot<'a> {
    snapshot: &'a WorldSnapshot,
}

impl Dot<'_> {
    fn manager_label(manager: &ManagerRecord) -> String {
        let mut fields = vec![format!("type: {}", escape(manager.type_name))];
        if manager.parent.is_some() {
            fields.push("<parent> parent".to_owned());
        }
        if manager.registry.is_some() {
            fields.push("<registry> registry".to_owned());
        }
        for (i, link) in manager.components.iter().enumerate() {
            fields.push(format!("<c{i}> {}", escape(link.component)));
        }
        fields.join("|")
    }

    fn column_label(column: &ColumnRecord) -> String {
        let kind = if column.registry { "records" } else { "name" };
        let mut fields = vec![
            format!("{kind}: {}", escape(column.label)),
            format!("size: {}", column.len),
            "<manager> manager".to_owned(),
        ];
        if column.parent.is_some() {
            fields.push("<parent> parent".to_owned());
        }
        if !column.children.is_empty() {
            fields.push("<children> children".to_owned());
        }
        fields.join("|")
    }
}

impl fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let WorldSnapshot {
            managers, columns, ..
        } = self.snapshot;

        writeln!(f, "digraph lineage {{")?;
        writeln!(f, "    rankdir=LR;")?;
        writeln!(f, "    node [shape=record, fontname=\"monospace\"];")?;

        for manager in managers {
            writeln!(f, "    m{} [label=\"{{{}}}\"];", manager.id, Self::manager_label(manager))?;
        }
        for column in columns {
            writeln!(f, "    n{} [label=\"{{{}}}\"];", column.id, Self::column_label(column))?;
        }

        for manager in managers {
            if let Some(parent) = manager.parent {
                writeln!(f, "    m{}:parent -> m{};", manager.id, parent)?;
            }
            if let Some(registry) = manager.registry {
                writeln!(f, "    m{}:registry -> n{};", manager.id, registry)?;
            }
            for (i, link) in manager.components.iter().enumerate() {
                writeln!(f, "    m{}:c{i} -> n{};", manager.id, link.node)?;
            }
        }
        for column in columns {
            writeln!(f, "    n{}:manager -> m{};", column.id, column.manager)?;
            if let Some(parent) = column.parent {
                writeln!(f, "    n{}:parent -> n{};", column.id, parent)?;
            }
            for child in &column.children {
                writeln!(f, "    n{}:children -> n{};", column.id, child)?;
            }
        }

        writeln!(f, "}}")
    }
}

impl WorldSnapshot {
    #[must_use]
    pub const fn dot(&self) -> Dot<'_> {
        Dot { snapshot: self }
    }

    /// Render as a Graphviz digraph.
    #[must_use]
    pub fn to_dot(&self) -> String {
        self.dot().to_string()
    }

    /// Write [`to_dot`](Self::to_dot) output to `path`.
    pub fn write_dot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_dot())?;
        debug!(
            "wrote {} managers and {} columns to {}",
            self.managers.len(),
            self.columns.len(),
            path.display()
        );
        Ok(())
    }
}
