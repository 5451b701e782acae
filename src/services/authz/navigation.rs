/*
 * Responsibility
 * - Static navigation tree (menu groups/leaves with required view/permission)
 * - Filter the tree down to what one role's grant snapshot allows
 * - Tolerate leaves referencing views the store does not know: they are
 *   filtered out, never an error
 */
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::services::authz::store::RoleGrants;

/// A menu entry. `permission` narrows the requirement from "may navigate to
/// the view" to "may perform this action within the view".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavLeaf {
    pub label: String,
    pub path: String,
    pub view: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
}

/// A menu group. Groups carry no requirement of their own; an empty group
/// after filtering is pruned, never rendered as a bare header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavGroup {
    pub label: String,
    pub items: Vec<NavLeaf>,
}

/// The role-agnostic navigation tree, supplied by external configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationTree {
    pub groups: Vec<NavGroup>,
}

#[derive(Debug, Error)]
pub enum NavTreeError {
    #[error("cannot read navigation tree file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid navigation tree json: {0}")]
    Json(#[from] serde_json::Error),
}

impl NavigationTree {
    /// Load the tree from a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, NavTreeError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Built-in tree for the brokerage CRM, used when no config file is set.
    pub fn default_brokerage() -> Self {
        fn leaf(label: &str, path: &str, view: &str, permission: Option<&str>) -> NavLeaf {
            NavLeaf {
                label: label.to_string(),
                path: path.to_string(),
                view: view.to_string(),
                permission: permission.map(str::to_string),
            }
        }

        Self {
            groups: vec![
                NavGroup {
                    label: "Ventas".into(),
                    items: vec![
                        leaf("Leads", "/leads", "leads", None),
                        leaf("Clientes", "/clientes", "clientes", None),
                        leaf("Cotizaciones", "/cotizaciones", "cotizaciones", None),
                    ],
                },
                NavGroup {
                    label: "Cartera".into(),
                    items: vec![
                        leaf("Pólizas", "/polizas", "polizas", None),
                        leaf("Compañías", "/companias", "companias", None),
                        leaf("Productos", "/productos", "productos", None),
                    ],
                },
                NavGroup {
                    label: "Administración".into(),
                    items: vec![
                        leaf("Roles", "/roles", "roles", None),
                        leaf("Asignaciones", "/roles/asignaciones", "roles", Some("update")),
                    ],
                },
            ],
        }
    }

    /// Produce the subtree this snapshot may see.
    ///
    /// The predicate is pure per leaf, so the result only depends on the
    /// snapshot; callers compute it once per identity resolution and reuse it.
    pub fn filter(&self, grants: &RoleGrants) -> NavigationTree {
        let groups = self
            .groups
            .iter()
            .filter_map(|group| {
                let items: Vec<NavLeaf> = group
                    .items
                    .iter()
                    .filter(|leaf| match &leaf.permission {
                        Some(permission) => grants.has_action(&leaf.view, permission),
                        None => grants.has_view(&leaf.view),
                    })
                    .cloned()
                    .collect();

                if items.is_empty() {
                    None
                } else {
                    Some(NavGroup {
                        label: group.label.clone(),
                        items,
                    })
                }
            })
            .collect();

        NavigationTree { groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::authz::route_pattern::RoutePattern;
    use crate::services::authz::store::{ActionGrant, ViewGrant};

    fn grants(views: &[&str], actions: &[(&str, &str)]) -> RoleGrants {
        RoleGrants {
            role_name: "vendedor".into(),
            views: views
                .iter()
                .map(|v| ViewGrant {
                    name: (*v).into(),
                    route: RoutePattern::compile(&format!("/{v}")),
                })
                .collect(),
            actions: actions
                .iter()
                .map(|(v, p)| ActionGrant {
                    view: (*v).into(),
                    permission: (*p).into(),
                })
                .collect(),
        }
    }

    #[test]
    fn fully_denied_group_is_pruned() {
        let tree = NavigationTree::default_brokerage();
        let filtered = tree.filter(&grants(&["leads"], &[]));

        assert_eq!(filtered.groups.len(), 1);
        assert_eq!(filtered.groups[0].label, "Ventas");
        assert_eq!(filtered.groups[0].items.len(), 1);
        assert_eq!(filtered.groups[0].items[0].view, "leads");
    }

    #[test]
    fn permission_leaf_requires_the_action_grant() {
        let tree = NavigationTree::default_brokerage();

        // view access to "roles" alone keeps the plain leaf, not the
        // permission-gated one
        let filtered = tree.filter(&grants(&["roles"], &[]));
        let admin = filtered
            .groups
            .iter()
            .find(|g| g.label == "Administración")
            .expect("group kept");
        assert_eq!(admin.items.len(), 1);
        assert_eq!(admin.items[0].label, "Roles");

        let filtered = tree.filter(&grants(&["roles"], &[("roles", "update")]));
        let admin = filtered
            .groups
            .iter()
            .find(|g| g.label == "Administración")
            .unwrap();
        assert_eq!(admin.items.len(), 2);
    }

    #[test]
    fn unknown_view_in_tree_is_filtered_not_an_error() {
        let tree = NavigationTree {
            groups: vec![NavGroup {
                label: "Laboratorio".into(),
                items: vec![NavLeaf {
                    label: "Experimental".into(),
                    path: "/experimental".into(),
                    view: "vista-inexistente".into(),
                    permission: None,
                }],
            }],
        };

        let filtered = tree.filter(&grants(&["leads"], &[]));
        assert!(filtered.groups.is_empty());
    }

    #[test]
    fn empty_snapshot_yields_empty_tree() {
        let tree = NavigationTree::default_brokerage();
        let filtered = tree.filter(&grants(&[], &[]));
        assert!(filtered.groups.is_empty());
    }

    #[test]
    fn tree_deserializes_from_config_json() {
        let json = r#"{
            "groups": [
                {
                    "label": "Ventas",
                    "items": [
                        {"label": "Leads", "path": "/leads", "view": "leads"},
                        {"label": "Borrar leads", "path": "/leads/borrar", "view": "leads", "permission": "delete"}
                    ]
                }
            ]
        }"#;

        let tree: NavigationTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.groups[0].items[1].permission.as_deref(), Some("delete"));

        let filtered = tree.filter(&grants(&["leads"], &[]));
        assert_eq!(filtered.groups[0].items.len(), 1);
    }
}
