use std::path::{Path, PathBuf};

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext as HbRenderContext,
    RenderErrorReason,
};
use magic_react_common_fs::{self as fs, FsError};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::bindings::ImportBinding;
use crate::names::{capitalize, layout_name, view_name};
use crate::spec::ViewNode;

/// Stylesheet copied verbatim next to every sidebar layout.
pub const SIDEBAR_STYLESHEET: &[u8] = include_bytes!("../templates/SidebarLayout.module.css");

/// Largest override template accepted.
const MAX_TEMPLATE_SIZE: usize = 1024 * 1024;

/// Path, element-tree and sitemap builders appended to the routing module.
pub const ROUTES_RUNTIME: &str = include_str!("../templates/routes_runtime.js");

/// Registered template names.
pub mod template_names {
    pub const LAYOUT: &str = "layout";
    pub const SIDEBAR_LAYOUT: &str = "sidebar_layout";
    pub const VIEW: &str = "view";
    pub const VIEW_INDEX: &str = "view_index";
    pub const ROUTES: &str = "routes";
}

struct BuiltinTemplate {
    name: &'static str,
    file: &'static str,
    source: &'static str,
}

const BUILTIN_TEMPLATES: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        name: template_names::LAYOUT,
        file: "Layout.jsx.hbs",
        source: include_str!("../templates/Layout.jsx.hbs"),
    },
    BuiltinTemplate {
        name: template_names::SIDEBAR_LAYOUT,
        file: "SidebarLayout.jsx.hbs",
        source: include_str!("../templates/SidebarLayout.jsx.hbs"),
    },
    BuiltinTemplate {
        name: template_names::VIEW,
        file: "View.jsx.hbs",
        source: include_str!("../templates/View.jsx.hbs"),
    },
    BuiltinTemplate {
        name: template_names::VIEW_INDEX,
        file: "ViewIndex.js.hbs",
        source: include_str!("../templates/ViewIndex.js.hbs"),
    },
    BuiltinTemplate {
        name: template_names::ROUTES,
        file: "routes.js.hbs",
        source: include_str!("../templates/routes.js.hbs"),
    },
];

/// Arguments of the layout templates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutArgs<'a> {
    pub component_key: &'a str,
}

/// Arguments of the view templates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewArgs<'a> {
    pub component_key: &'a str,
    pub title: &'a str,
    pub sitemap: bool,
}

/// View imports of one layout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewImportGroup<'a> {
    pub layout_key: &'a str,
    pub views: Vec<&'a ImportBinding>,
}

/// Arguments of the routing module template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesArgs<'a> {
    /// Comma-separated icon identifiers, empty when no icon is used.
    pub icons: String,
    pub icon_package: &'a str,
    pub layouts: Vec<&'a ImportBinding>,
    pub view_groups: Vec<ViewImportGroup<'a>>,
    /// The `routes` object literal.
    pub routes: String,
    pub runtime: &'a str,
}

/// Template renderer for layouts, views and the routing module.
///
/// Rendering is pure: the same arguments always produce the same text.
pub struct RouteRenderer {
    handlebars: Handlebars<'static>,
}

impl RouteRenderer {
    /// Create a renderer with the embedded templates.
    pub fn new() -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(true);
        Self::register_helpers(&mut handlebars);

        for template in BUILTIN_TEMPLATES {
            handlebars.register_template_string(template.name, template.source)?;
        }

        Ok(Self { handlebars })
    }

    /// Create a renderer, replacing embedded templates with same-named files
    /// found in `dir`.
    pub async fn with_overrides(dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut renderer = Self::new()?;
        if let Some(dir) = dir {
            renderer.load_overrides(dir).await?;
        }
        Ok(renderer)
    }

    fn register_helpers(hb: &mut Handlebars) {
        hb.register_helper("layoutName", Box::new(layout_name_helper));
        hb.register_helper("viewName", Box::new(view_name_helper));
        hb.register_helper("camelName", Box::new(camel_name_helper));
        hb.register_helper("jsxText", Box::new(jsx_text_helper));
    }

    /// Register override templates from `dir`. Returns how many were loaded.
    ///
    /// The directory must exist; files not named after a built-in template
    /// are ignored.
    pub async fn load_overrides(&mut self, dir: &Path) -> Result<usize, RenderError> {
        let files = fs::list_files(dir).await.map_err(|source| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut loaded = 0;

        for template in BUILTIN_TEMPLATES {
            let path = dir.join(template.file);
            if !files.contains(&path) {
                continue;
            }

            let content = fs::read_to_string(&path, MAX_TEMPLATE_SIZE)
                .await
                .map_err(|source| RenderError::Io {
                    path: path.clone(),
                    source,
                })?;
            self.handlebars
                .register_template_string(template.name, content)?;

            debug!(template = template.name, path = %path.display(), "template overridden");
            loaded += 1;
        }

        Ok(loaded)
    }

    fn render<T: Serialize>(&self, template: &str, args: &T) -> Result<String, RenderError> {
        Ok(self.handlebars.render(template, args)?)
    }

    /// Render the layout component for `key`.
    pub fn render_layout(&self, key: &str, sidebar: bool) -> Result<String, RenderError> {
        let template = if sidebar {
            template_names::SIDEBAR_LAYOUT
        } else {
            template_names::LAYOUT
        };
        self.render(template, &LayoutArgs { component_key: key })
    }

    /// Render the view component for `key`.
    pub fn render_view(&self, key: &str, view: &ViewNode) -> Result<String, RenderError> {
        self.render(
            template_names::VIEW,
            &ViewArgs {
                component_key: key,
                title: &view.title,
                sitemap: view.sitemap,
            },
        )
    }

    /// Render the `index` module re-exporting the view for `key`.
    pub fn render_view_index(&self, key: &str) -> Result<String, RenderError> {
        self.render(template_names::VIEW_INDEX, &LayoutArgs { component_key: key })
    }

    /// Render the routing module.
    pub fn render_routes(&self, args: &RoutesArgs<'_>) -> Result<String, RenderError> {
        self.render(template_names::ROUTES, args)
    }
}

// ===== Helper Functions =====

fn key_param<'a>(h: &'a Helper, helper: &'static str) -> Result<&'a str, handlebars::RenderError> {
    h.param(0)
        .and_then(|v| v.value().as_str())
        .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex(helper, 0).into())
}

fn layout_name_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut HbRenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let key = key_param(h, "layoutName")?;
    out.write(&layout_name(key))?;
    Ok(())
}

fn view_name_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut HbRenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let key = key_param(h, "viewName")?;
    out.write(&view_name(key))?;
    Ok(())
}

fn camel_name_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut HbRenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let key = key_param(h, "camelName")?;
    out.write(&capitalize(key))?;
    Ok(())
}

/// Writes plain text as JSX children, or a string expression when the text
/// would otherwise be parsed as markup.
fn jsx_text_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut HbRenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let text = key_param(h, "jsxText")?;
    out.write(&jsx_text(text))?;
    Ok(())
}

pub(crate) fn js_string(text: &str) -> String {
    Value::from(text).to_string()
}

fn jsx_text(text: &str) -> String {
    let plain = !text.is_empty()
        && text.trim() == text
        && !text
            .chars()
            .any(|c| matches!(c, '{' | '}' | '<' | '>' | '&' | '"' | '\'' | '\\') || c.is_control());

    if plain {
        text.to_string()
    } else {
        format!("{{{}}}", js_string(text))
    }
}

/// Render errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("failed to read templates from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: FsError,
    },
}
