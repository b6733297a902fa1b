//! Synthesis of the application's routing module (`src/Data/routes.js`).

use std::fmt::Write as _;

use tracing::debug;

use crate::bindings::BindingTable;
use crate::icons::IconSet;
use crate::rendering::{js_string, RenderError, RouteRenderer, RoutesArgs, ViewImportGroup, ROUTES_RUNTIME};
use crate::spec::{RouteMap, RouteSpec, ViewNode};

/// Location of the routing module, relative to the project root.
pub const ROUTES_MODULE_PATH: &str = "src/Data/routes.js";

/// Package icon components are imported from.
pub const DEFAULT_ICON_PACKAGE: &str = "react-icons/ai";

/// A synthesized routing module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteModule {
    pub source: String,
    pub icons: IconSet,
    pub bindings: BindingTable,
}

/// Generates the routing module source.
pub struct Synthesizer<'r> {
    renderer: &'r RouteRenderer,
    icon_package: String,
}

impl<'r> Synthesizer<'r> {
    pub fn new(renderer: &'r RouteRenderer) -> Self {
        Self {
            renderer,
            icon_package: DEFAULT_ICON_PACKAGE.to_string(),
        }
    }

    pub fn with_icon_package(mut self, package: impl Into<String>) -> Self {
        self.icon_package = package.into();
        self
    }

    pub fn synthesize(&self, spec: &RouteSpec) -> Result<RouteModule, RenderError> {
        let icons = IconSet::collect(spec);
        let bindings = BindingTable::build(spec);

        let args = RoutesArgs {
            icons: icons.import_list(),
            icon_package: &self.icon_package,
            layouts: bindings.layouts().map(|(_, l)| &l.layout).collect(),
            view_groups: bindings
                .layouts()
                .filter(|(_, l)| !l.views.is_empty())
                .map(|(key, l)| ViewImportGroup {
                    layout_key: key,
                    views: l.views.values().collect(),
                })
                .collect(),
            routes: routes_literal(spec, &bindings),
            runtime: ROUTES_RUNTIME,
        };
        let source = self.renderer.render_routes(&args)?;

        debug!(
            icons = icons.len(),
            layouts = spec.layout_count(),
            views = spec.view_count(),
            "routing module synthesized"
        );
        Ok(RouteModule {
            source,
            icons,
            bindings,
        })
    }
}

/// The `routes` object literal re-embedding the specification tree.
fn routes_literal(spec: &RouteSpec, bindings: &BindingTable) -> String {
    if spec.layouts.is_empty() {
        return "{}".to_string();
    }

    let mut out = String::from("{\n");
    for (key, layout) in &spec.layouts {
        let element = bindings
            .layout(key)
            .map(|b| b.binding.as_str())
            .unwrap_or_default();

        open_entry(&mut out, 1, key, &layout.path, element, &layout.title);
        if let Some(icon) = &layout.icon {
            field(&mut out, 2, "icon", &format!("<{icon} />"));
        }
        if let Some(children) = &layout.children {
            view_entries(&mut out, 2, key, children, bindings);
        }
        close_entry(&mut out, 1);
    }
    out.push('}');
    out
}

fn view_entries(
    out: &mut String,
    depth: usize,
    layout_key: &str,
    views: &RouteMap<ViewNode>,
    bindings: &BindingTable,
) {
    indent(out, depth);
    out.push_str("routes: {\n");
    for (key, view) in views {
        let element = bindings
            .view(layout_key, key)
            .map(|b| b.binding.as_str())
            .unwrap_or_default();

        open_entry(out, depth + 1, key, &view.path, element, &view.title);
        field(out, depth + 2, "icon", &format!("<{} />", view.icon));
        if let Some(children) = &view.children {
            view_entries(out, depth + 2, layout_key, children, bindings);
        }
        close_entry(out, depth + 1);
    }
    close_entry(out, depth);
}

fn open_entry(out: &mut String, depth: usize, key: &str, path: &str, element: &str, title: &str) {
    indent(out, depth);
    let _ = writeln!(out, "{key}: {{");
    field(out, depth + 1, "path", &js_string(path));
    field(out, depth + 1, "element", &format!("<{element} />"));
    field(out, depth + 1, "title", &js_string(title));
}

fn close_entry(out: &mut String, depth: usize) {
    indent(out, depth);
    out.push_str("},\n");
}

fn field(out: &mut String, depth: usize, name: &str, value: &str) {
    indent(out, depth);
    let _ = writeln!(out, "{name}: {value},");
}

fn indent(out: &mut String, depth: usize) {
    out.extend(std::iter::repeat("  ").take(depth));
}
