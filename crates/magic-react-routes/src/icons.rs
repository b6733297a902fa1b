//! Icon identifier collection.

use std::convert::Infallible;

use indexmap::IndexSet;

use crate::spec::{LayoutNode, RouteSpec, ViewNode};
use crate::walk::{self, RouteVisitor, ViewContext};

/// Ordered set of icon identifiers, kept in order of first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconSet {
    icons: IndexSet<String>,
}

impl IconSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every icon referenced by `spec`.
    ///
    /// Layouts are visited in order; within a layout a node's own icon comes
    /// before the icons of its descendants.
    pub fn collect(spec: &RouteSpec) -> Self {
        let mut set = Self::new();
        match walk::walk(spec, &mut set) {
            Ok(()) => set,
            Err(never) => match never {},
        }
    }

    /// Add `icon` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, icon: &str) -> bool {
        if self.icons.contains(icon) {
            return false;
        }
        self.icons.insert(icon.to_string())
    }

    pub fn contains(&self, icon: &str) -> bool {
        self.icons.contains(icon)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.icons.iter().map(String::as_str)
    }

    /// Comma-separated list suitable for a named import clause.
    pub fn import_list(&self) -> String {
        self.iter().collect::<Vec<_>>().join(", ")
    }
}

impl RouteVisitor for IconSet {
    type Error = Infallible;

    fn enter_layout(&mut self, _key: &str, layout: &LayoutNode) -> Result<(), Infallible> {
        if let Some(icon) = &layout.icon {
            self.insert(icon);
        }
        Ok(())
    }

    fn enter_view(&mut self, _ctx: ViewContext<'_>, view: &ViewNode) -> Result<(), Infallible> {
        self.insert(&view.icon);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{validate, SchemaDefaults};
    use serde_json::json;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let doc = json!({
            "home": {
                "icon": "AiOutlineHome",
                "routes": {
                    "a": { "icon": "AiFillStar", "routes": { "a1": { "icon": "AiFillBell" } } },
                    "b": { "icon": "AiFillStar" }
                }
            },
            "admin": {
                "routes": {
                    "users": { "icon": "AiFillBell" },
                    "logs": { "icon": "AiFillBook" }
                }
            }
        });
        let spec = validate(&doc, &SchemaDefaults::default()).unwrap();

        let icons = IconSet::collect(&spec);
        assert_eq!(
            icons.iter().collect::<Vec<_>>(),
            vec!["AiOutlineHome", "AiFillStar", "AiFillBell", "AiFillBook"]
        );
        assert_eq!(icons.import_list(), "AiOutlineHome, AiFillStar, AiFillBell, AiFillBook");
    }

    #[test]
    fn test_defaulted_view_icons_are_collected_once() {
        let doc = json!({
            "home": { "routes": { "a": {}, "b": {} } },
            "other": { "routes": { "c": {} } }
        });
        let spec = validate(&doc, &SchemaDefaults::default()).unwrap();

        let icons = IconSet::collect(&spec);
        assert_eq!(icons.len(), 1);
        assert!(icons.contains("AiFillHome"));
    }

    #[test]
    fn test_layout_without_icon_contributes_nothing() {
        let doc = json!({ "home": { "path": "/" } });
        let spec = validate(&doc, &SchemaDefaults::default()).unwrap();

        assert!(IconSet::collect(&spec).is_empty());
    }

    #[test]
    fn test_insert_reports_novelty() {
        let mut icons = IconSet::new();
        assert!(icons.insert("AiFillHome"));
        assert!(!icons.insert("AiFillHome"));
        assert_eq!(icons.len(), 1);
    }
}
