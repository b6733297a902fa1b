//! Validated route specification model.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Ordered mapping from specification key to node.
///
/// Iteration order is the key order of the source document.
pub type RouteMap<T> = IndexMap<String, T>;

/// A validated, defaulted route specification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteSpec {
    /// Top-level layouts in document order.
    pub layouts: RouteMap<LayoutNode>,
}

/// A top-level node: the root of one navigable surface.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// URL path segment, possibly empty.
    pub path: String,
    /// Display title.
    pub title: String,
    /// Optional icon identifier. Layouts have no default icon.
    pub icon: Option<String>,
    /// Whether the layout renders the sidebar shell.
    pub sidebar: bool,
    /// Views hosted by this layout (`routes` in the document).
    pub children: Option<RouteMap<ViewNode>>,
    /// Attributes the schema does not know about, carried through untouched.
    pub extra: Map<String, Value>,
}

/// A view node, possibly containing further nested views.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    /// URL path segment, possibly empty.
    pub path: String,
    /// Display title.
    pub title: String,
    /// Icon identifier.
    pub icon: String,
    /// Whether the view renders the generated sitemap.
    pub sitemap: bool,
    /// Nested views (`routes` in the document).
    pub children: Option<RouteMap<ViewNode>>,
    /// Attributes the schema does not know about, carried through untouched.
    pub extra: Map<String, Value>,
}

impl RouteSpec {
    /// Number of layouts.
    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    /// Total number of views at every depth.
    pub fn view_count(&self) -> usize {
        self.layouts
            .values()
            .filter_map(|layout| layout.children.as_ref())
            .map(count_views)
            .sum()
    }
}

impl ViewNode {
    /// Whether this view contains nested views.
    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }
}

fn count_views(views: &RouteMap<ViewNode>) -> usize {
    views
        .values()
        .map(|view| 1 + view.children.as_ref().map(count_views).unwrap_or(0))
        .sum()
}
