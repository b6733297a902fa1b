//! Import bindings for generated components.
//!
//! Every generated layout and view is imported into the routing module under
//! one identifier. Layout names are unique by validation, and view names are
//! unique within a layout, but two layouts may each own a view with the same
//! key. Those views live in different directories and need different local
//! bindings in the shared routing module.

use std::collections::HashSet;
use std::convert::Infallible;

use indexmap::IndexMap;
use serde::Serialize;

use crate::names::{capitalize, layout_name, view_name};
use crate::spec::{LayoutNode, RouteSpec, ViewNode};
use crate::walk::{self, RouteVisitor, ViewContext};

/// One import emitted into the routing module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportBinding {
    /// Local identifier in the routing module.
    pub binding: String,
    /// Module specifier relative to `src/Data/`.
    pub source: String,
}

/// Imports of one layout: the layout component and its flattened views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutBindings {
    pub layout: ImportBinding,
    /// Views in traversal order, keyed by view key.
    pub views: IndexMap<String, ImportBinding>,
}

/// Binding table for a whole specification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    layouts: IndexMap<String, LayoutBindings>,
}

impl BindingTable {
    /// Assign a binding to every layout and view of `spec`.
    pub fn build(spec: &RouteSpec) -> Self {
        let mut builder = Builder::default();

        // Layout names end in `Layout` and view names in `View`, so reserving
        // every layout first keeps their bindings stable.
        for key in spec.layouts.keys() {
            builder.taken.insert(layout_name(key));
        }

        match walk::walk(spec, &mut builder) {
            Ok(()) => builder.table,
            Err(never) => match never {},
        }
    }

    /// Binding of the layout component for `layout_key`.
    pub fn layout(&self, layout_key: &str) -> Option<&ImportBinding> {
        self.layouts.get(layout_key).map(|l| &l.layout)
    }

    /// Binding of the view `view_key` owned by `layout_key`.
    pub fn view(&self, layout_key: &str, view_key: &str) -> Option<&ImportBinding> {
        self.layouts.get(layout_key)?.views.get(view_key)
    }

    /// Per-layout bindings in specification order.
    pub fn layouts(&self) -> impl Iterator<Item = (&str, &LayoutBindings)> {
        self.layouts.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Default)]
struct Builder {
    table: BindingTable,
    taken: HashSet<String>,
}

impl Builder {
    fn claim(&mut self, layout_key: &str, name: String) -> String {
        if self.taken.insert(name.clone()) {
            return name;
        }

        let prefixed = format!("{}{}", capitalize(layout_key), name);
        if self.taken.insert(prefixed.clone()) {
            return prefixed;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{prefixed}{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl RouteVisitor for Builder {
    type Error = Infallible;

    fn enter_layout(&mut self, key: &str, _layout: &LayoutNode) -> Result<(), Infallible> {
        let name = layout_name(key);
        let layout = ImportBinding {
            source: format!("../Layouts/{name}/{name}"),
            binding: name,
        };
        self.table.layouts.insert(
            key.to_string(),
            LayoutBindings {
                layout,
                views: IndexMap::new(),
            },
        );
        Ok(())
    }

    fn enter_view(&mut self, ctx: ViewContext<'_>, _view: &ViewNode) -> Result<(), Infallible> {
        let name = view_name(ctx.key);
        let source = format!("../Views/{}/{}", capitalize(ctx.layout_key), name);
        let binding = self.claim(ctx.layout_key, name);

        if let Some(layout) = self.table.layouts.get_mut(ctx.layout_key) {
            layout
                .views
                .insert(ctx.key.to_string(), ImportBinding { binding, source });
        }
        Ok(())
    }
}
