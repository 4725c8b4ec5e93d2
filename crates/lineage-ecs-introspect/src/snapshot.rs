//! Reachability walk over managers and column nodes.

use std::collections::{BTreeMap, VecDeque};

use lineage_ecs::{ColumnKey, ManagerId, NodeId, World, short_type_name};
use serde::Serialize;

use crate::{IntrospectError, Result};

/// A component column owned by a manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentLink {
    pub component: &'static str,
    pub node: u32,
}

/// One type manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagerRecord {
    pub id: u32,
    pub type_name: &'static str,
    pub parent: Option<u32>,
    pub registry: Option<u32>,
    pub subtypes: Vec<u32>,
    /// Sorted by component ID.
    pub components: Vec<ComponentLink>,
}

/// One column node and its tree links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRecord {
    pub id: u32,
    /// Short name of the stored element type.
    pub label: &'static str,
    pub registry: bool,
    pub manager: u32,
    pub len: usize,
    pub parent: Option<u32>,
    /// Children in list order.
    pub children: Vec<u32>,
}

/// Structure of a world reachable from one manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldSnapshot {
    pub start: u32,
    /// Sorted by ID.
    pub managers: Vec<ManagerRecord>,
    /// Sorted by ID.
    pub columns: Vec<ColumnRecord>,
}

enum Pending {
    Manager(ManagerId),
    Column(NodeId),
}

impl WorldSnapshot {
    /// Collect everything reachable from `start`.
    pub fn capture(world: &World, start: ManagerId) -> Result<Self> {
        if world.manager(start).is_none() {
            return Err(IntrospectError::ManagerNotFound(start));
        }

        let mut managers = BTreeMap::new();
        let mut columns = BTreeMap::new();
        let mut queue = VecDeque::from([Pending::Manager(start)]);

        while let Some(item) = queue.pop_front() {
            match item {
                Pending::Manager(id) => {
                    if managers.contains_key(&id.as_raw()) {
                        continue;
                    }
                    let Some(manager) = world.manager(id) else {
                        continue;
                    };

                    let links = manager.columns();
                    queue.extend(manager.parent().map(Pending::Manager));
                    queue.extend(manager.subtypes().iter().copied().map(Pending::Manager));
                    queue.extend(manager.registry().map(Pending::Column));
                    queue.extend(links.iter().map(|&(_, node)| Pending::Column(node)));

                    managers.insert(
                        id.as_raw(),
                        ManagerRecord {
                            id: id.as_raw(),
                            type_name: manager.short_name(),
                            parent: manager.parent().map(ManagerId::as_raw),
                            registry: manager.registry().map(NodeId::as_raw),
                            subtypes: manager.subtypes().iter().map(|m| m.as_raw()).collect(),
                            components: links
                                .iter()
                                .map(|&(component, node)| ComponentLink {
                                    component: world
                                        .component_info(component)
                                        .map_or("?", |info| info.short_name()),
                                    node: node.as_raw(),
                                })
                                .collect(),
                        },
                    );
                }
                Pending::Column(id) => {
                    if columns.contains_key(&id.as_raw()) {
                        continue;
                    }
                    let Some(node) = world.node(id) else {
                        continue;
                    };

                    let children: Vec<NodeId> = world.arena().children(id).collect();
                    queue.push_back(Pending::Manager(node.manager()));
                    queue.extend(node.parent().map(Pending::Column));
                    queue.extend(children.iter().copied().map(Pending::Column));

                    columns.insert(
                        id.as_raw(),
                        ColumnRecord {
                            id: id.as_raw(),
                            label: short_type_name(node.type_name()),
                            registry: node.key() == ColumnKey::Registry,
                            manager: node.manager().as_raw(),
                            len: node.len(),
                            parent: node.parent().map(NodeId::as_raw),
                            children: children.into_iter().map(NodeId::as_raw).collect(),
                        },
                    );
                }
            }
        }

        Ok(Self {
            start: start.as_raw(),
            managers: managers.into_values().collect(),
            columns: columns.into_values().collect(),
        })
    }

    #[must_use]
    pub fn manager(&self, id: u32) -> Option<&ManagerRecord> {
        self.managers.iter().find(|manager| manager.id == id)
    }

    #[must_use]
    pub fn column(&self, id: u32) -> Option<&ColumnRecord> {
        self.columns.iter().find(|column| column.id == id)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
