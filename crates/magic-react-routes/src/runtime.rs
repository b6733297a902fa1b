//! Host-side model of the generated routing module.
//!
//! The routing module rebuilds its path table, element tree and sitemap when
//! the application loads. [`RouteTable`] computes the same three structures
//! from the validated specification so the scaffolder can report them and so
//! tests can check them without a JavaScript runtime. The algorithms here and
//! the functions in `templates/routes_runtime.js` must stay in lockstep.

use indexmap::IndexMap;

use crate::bindings::BindingTable;
use crate::names::{layout_name, view_name};
use crate::spec::{RouteMap, RouteSpec, ViewNode};

/// Join a parent path and a child segment.
///
/// Plain concatenation, except that a `/` shared by both sides of the seam is
/// kept once, so a layout at `/` hosting `/dashboard` yields `/dashboard`.
pub fn join_path(parent: &str, segment: &str) -> String {
    match parent.strip_suffix('/') {
        Some(trimmed) if segment.starts_with('/') => format!("{trimmed}{segment}"),
        _ => format!("{parent}{segment}"),
    }
}

/// Entry of the path table: a full path for leaves, a nested table otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathEntry {
    Leaf(String),
    Nested(IndexMap<String, PathEntry>),
}

impl PathEntry {
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(path) => Some(path),
            Self::Nested(_) => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&PathEntry> {
        match self {
            Self::Leaf(_) => None,
            Self::Nested(map) => map.get(key),
        }
    }
}

/// One routing entry of the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteElement {
    pub key: String,
    /// Absolute path; layout entries have none.
    pub path: Option<String>,
    /// Component binding rendered by this entry.
    pub element: String,
    /// Populated for layout entries only.
    pub children: Vec<RouteElement>,
}

/// One item of the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub title: String,
    /// Link target; layouts are listed by title only.
    pub href: Option<String>,
    pub children: Vec<SitemapEntry>,
}

impl SitemapEntry {
    /// Depth-first list of `(depth, entry)` pairs starting at this entry.
    pub fn flatten(&self) -> Vec<(usize, &SitemapEntry)> {
        let mut out = Vec::new();
        flatten_into(self, 0, &mut out);
        out
    }
}

fn flatten_into<'a>(entry: &'a SitemapEntry, depth: usize, out: &mut Vec<(usize, &'a SitemapEntry)>) {
    out.push((depth, entry));
    for child in &entry.children {
        flatten_into(child, depth + 1, out);
    }
}

/// The path table, element tree and sitemap of a specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    pub paths: IndexMap<String, PathEntry>,
    pub elements: Vec<RouteElement>,
    pub sitemap: Vec<SitemapEntry>,
}

impl RouteTable {
    pub fn build(spec: &RouteSpec, bindings: &BindingTable) -> Self {
        Self {
            paths: build_paths(spec),
            elements: build_element_tree(spec, bindings),
            sitemap: build_sitemap(spec),
        }
    }

    /// Every linkable path in sitemap order.
    pub fn links(&self) -> Vec<&str> {
        self.sitemap
            .iter()
            .flat_map(SitemapEntry::flatten)
            .filter_map(|(_, entry)| entry.href.as_deref())
            .collect()
    }
}

/// Path table keyed like the specification.
pub fn build_paths(spec: &RouteSpec) -> IndexMap<String, PathEntry> {
    spec.layouts
        .iter()
        .map(|(key, layout)| {
            let entry = match &layout.children {
                Some(children) => PathEntry::Nested(view_paths(children, &layout.path)),
                None => PathEntry::Leaf(layout.path.clone()),
            };
            (key.clone(), entry)
        })
        .collect()
}

fn view_paths(views: &RouteMap<ViewNode>, parent: &str) -> IndexMap<String, PathEntry> {
    views
        .iter()
        .map(|(key, view)| {
            let path = join_path(parent, &view.path);
            let entry = match &view.children {
                Some(children) => PathEntry::Nested(view_paths(children, &path)),
                None => PathEntry::Leaf(path),
            };
            (key.clone(), entry)
        })
        .collect()
}

/// One entry per layout wrapping its views flattened into siblings.
pub fn build_element_tree(spec: &RouteSpec, bindings: &BindingTable) -> Vec<RouteElement> {
    spec.layouts
        .iter()
        .map(|(key, layout)| {
            let mut children = Vec::new();
            if let Some(views) = &layout.children {
                flatten_views(key, views, &layout.path, bindings, &mut children);
            }
            RouteElement {
                key: key.clone(),
                path: None,
                element: bindings
                    .layout(key)
                    .map(|b| b.binding.clone())
                    .unwrap_or_else(|| layout_name(key)),
                children,
            }
        })
        .collect()
}

fn flatten_views(
    layout_key: &str,
    views: &RouteMap<ViewNode>,
    parent: &str,
    bindings: &BindingTable,
    out: &mut Vec<RouteElement>,
) {
    for (key, view) in views {
        let path = join_path(parent, &view.path);
        out.push(RouteElement {
            key: key.clone(),
            path: Some(path.clone()),
            element: bindings
                .view(layout_key, key)
                .map(|b| b.binding.clone())
                .unwrap_or_else(|| view_name(key)),
            children: Vec::new(),
        });
        if let Some(children) = &view.children {
            flatten_views(layout_key, children, &path, bindings, out);
        }
    }
}

/// Nested listing of titles; every level below the layouts links its path.
pub fn build_sitemap(spec: &RouteSpec) -> Vec<SitemapEntry> {
    spec.layouts
        .values()
        .map(|layout| SitemapEntry {
            title: layout.title.clone(),
            href: None,
            children: layout
                .children
                .as_ref()
                .map(|views| view_sitemap(views, &layout.path))
                .unwrap_or_default(),
        })
        .collect()
}

fn view_sitemap(views: &RouteMap<ViewNode>, parent: &str) -> Vec<SitemapEntry> {
    views
        .values()
        .map(|view| {
            let href = join_path(parent, &view.path);
            let children = view
                .children
                .as_ref()
                .map(|children| view_sitemap(children, &href))
                .unwrap_or_default();
            SitemapEntry {
                title: view.title.clone(),
                href: Some(href),
                children,
            }
        })
        .collect()
}
