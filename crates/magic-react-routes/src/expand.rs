//! Tree expansion: the files generated for every layout and view.
//!
//! ```text
//! src/Layouts/<LayoutName>/<LayoutName>.jsx
//! src/Layouts/<LayoutName>/<LayoutName>.module.css
//! src/Views/<Capitalize(layout)>/<ViewName>/<ViewName>.jsx
//! src/Views/<Capitalize(layout)>/<ViewName>/index.jsx
//! src/Views/<Capitalize(layout)>/<ViewName>/<ViewName>.module.css
//! ```
//!
//! Nested views share their layout's `Views/` directory. Their groups hang
//! off the group of the enclosing view, so a container is written before its
//! descendants.

use std::path::PathBuf;

use tracing::debug;

use crate::artifact::{ArtifactGroup, GeneratedArtifact};
use crate::names::{capitalize, layout_name, view_name};
use crate::rendering::{RenderError, RouteRenderer, SIDEBAR_STYLESHEET};
use crate::spec::{LayoutNode, RouteSpec, ViewNode};
use crate::walk::{self, RouteVisitor, ViewContext};

/// Directory holding generated sources, relative to the project root.
pub const SOURCE_DIR: &str = "src";

/// Plans the artifacts of layouts and views.
pub struct Expander<'r> {
    renderer: &'r RouteRenderer,
    source_dir: PathBuf,
}

impl<'r> Expander<'r> {
    pub fn new(renderer: &'r RouteRenderer) -> Self {
        Self {
            renderer,
            source_dir: PathBuf::from(SOURCE_DIR),
        }
    }

    /// Plan one layout.
    ///
    /// The returned group is the layout directory; its nested groups are the
    /// layout's top-level views.
    pub fn expand_layout(&self, key: &str, layout: &LayoutNode) -> Result<ArtifactGroup, RenderError> {
        let mut planner = Planner {
            expander: self,
            stack: Vec::new(),
            finished: None,
        };
        walk::walk_layout(key, layout, &mut planner)?;

        let group = planner.finished.unwrap_or_default();
        debug!(layout = key, files = group.artifact_count(), "layout expanded");
        Ok(group)
    }

    /// Plan every layout of `spec`, in order.
    pub fn expand(&self, spec: &RouteSpec) -> Result<Vec<ArtifactGroup>, RenderError> {
        spec.layouts
            .iter()
            .map(|(key, layout)| self.expand_layout(key, layout))
            .collect()
    }

    fn layout_group(&self, key: &str, layout: &LayoutNode) -> Result<ArtifactGroup, RenderError> {
        let name = layout_name(key);
        let directory = self.source_dir.join("Layouts").join(&name);

        let component = self.renderer.render_layout(key, layout.sidebar)?;
        let stylesheet = directory.join(format!("{name}.module.css"));

        let mut group = ArtifactGroup::new(&directory);
        group
            .artifacts
            .push(GeneratedArtifact::rendered(directory.join(format!("{name}.jsx")), component));
        group.artifacts.push(if layout.sidebar {
            GeneratedArtifact::copied(stylesheet, SIDEBAR_STYLESHEET)
        } else {
            GeneratedArtifact::empty(stylesheet)
        });
        Ok(group)
    }

    fn view_group(&self, ctx: ViewContext<'_>, view: &ViewNode) -> Result<ArtifactGroup, RenderError> {
        let name = view_name(ctx.key);
        let directory = self
            .source_dir
            .join("Views")
            .join(capitalize(ctx.layout_key))
            .join(&name);

        let mut group = ArtifactGroup::new(&directory);
        group.artifacts.push(GeneratedArtifact::rendered(
            directory.join(format!("{name}.jsx")),
            self.renderer.render_view(ctx.key, view)?,
        ));
        group.artifacts.push(GeneratedArtifact::rendered(
            directory.join("index.jsx"),
            self.renderer.render_view_index(ctx.key)?,
        ));
        group
            .artifacts
            .push(GeneratedArtifact::empty(directory.join(format!("{name}.module.css"))));
        Ok(group)
    }
}

struct Planner<'e, 'r> {
    expander: &'e Expander<'r>,
    stack: Vec<ArtifactGroup>,
    finished: Option<ArtifactGroup>,
}

impl Planner<'_, '_> {
    fn close(&mut self) {
        if let Some(group) = self.stack.pop() {
            match self.stack.last_mut() {
                Some(parent) => parent.nested.push(group),
                None => self.finished = Some(group),
            }
        }
    }
}

impl RouteVisitor for Planner<'_, '_> {
    type Error = RenderError;

    fn enter_layout(&mut self, key: &str, layout: &LayoutNode) -> Result<(), RenderError> {
        let group = self.expander.layout_group(key, layout)?;
        self.stack.push(group);
        Ok(())
    }

    fn leave_layout(&mut self, _key: &str, _layout: &LayoutNode) -> Result<(), RenderError> {
        self.close();
        Ok(())
    }

    fn enter_view(&mut self, ctx: ViewContext<'_>, view: &ViewNode) -> Result<(), RenderError> {
        let group = self.expander.view_group(ctx, view)?;
        self.stack.push(group);
        Ok(())
    }

    fn leave_view(&mut self, _ctx: ViewContext<'_>, _view: &ViewNode) -> Result<(), RenderError> {
        self.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::testing::{assert_dirs_precede_files, RecordingSink};
    use crate::artifact::{write_groups, ArtifactContent};
    use crate::schema::{validate, SchemaDefaults};
    use magic_react_common_fs::path::to_unix_string;
    use serde_json::{json, Value};
    use std::path::Path;

    fn expand(doc: Value) -> Vec<ArtifactGroup> {
        let spec = validate(&doc, &SchemaDefaults::default()).unwrap();
        let renderer = RouteRenderer::new().unwrap();
        Expander::new(&renderer).expand(&spec).unwrap()
    }

    fn paths(groups: &[ArtifactGroup]) -> Vec<String> {
        groups
            .iter()
            .flat_map(|g| g.artifacts())
            .map(|a| to_unix_string(&a.path))
            .collect()
    }

    fn content<'a>(groups: &'a [ArtifactGroup], path: &str) -> &'a ArtifactContent {
        groups
            .iter()
            .flat_map(|g| g.artifacts())
            .find(|a| to_unix_string(&a.path) == path)
            .map(|a| &a.content)
            .unwrap_or_else(|| panic!("no artifact at {path}"))
    }

    #[test]
    fn test_single_layout_with_one_view() {
        let groups = expand(json!({
            "home": { "path": "/", "routes": { "dashboard": { "path": "/dashboard" } } }
        }));

        assert_eq!(
            paths(&groups),
            vec![
                "src/Layouts/HomeLayout/HomeLayout.jsx",
                "src/Layouts/HomeLayout/HomeLayout.module.css",
                "src/Views/Home/DashboardView/DashboardView.jsx",
                "src/Views/Home/DashboardView/index.jsx",
                "src/Views/Home/DashboardView/DashboardView.module.css",
            ]
        );
        assert_eq!(
            content(&groups, "src/Layouts/HomeLayout/HomeLayout.module.css"),
            &ArtifactContent::Empty
        );
    }

    #[test]
    fn test_sidebar_layout_copies_stylesheet() {
        let groups = expand(json!({ "admin": { "sidebar": true } }));

        assert_eq!(
            content(&groups, "src/Layouts/AdminLayout/AdminLayout.module.css"),
            &ArtifactContent::Copied(SIDEBAR_STYLESHEET)
        );
        match content(&groups, "src/Layouts/AdminLayout/AdminLayout.jsx") {
            ArtifactContent::Rendered(text) => assert!(text.contains("<Sidebar")),
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn test_same_view_key_is_namespaced_by_layout() {
        let groups = expand(json!({
            "home": { "routes": { "list": {} } },
            "admin": { "routes": { "list": {} } }
        }));

        let all = paths(&groups);
        assert!(all.contains(&"src/Views/Home/ListView/ListView.jsx".to_string()));
        assert!(all.contains(&"src/Views/Admin/ListView/ListView.jsx".to_string()));

        let mut unique = all.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_sitemap_marker_only_where_requested() {
        let groups = expand(json!({
            "home": { "routes": { "overview": { "sitemap": true }, "list": {} } }
        }));

        let overview = content(&groups, "src/Views/Home/OverviewView/OverviewView.jsx");
        let list = content(&groups, "src/Views/Home/ListView/ListView.jsx");
        assert!(matches!(overview, ArtifactContent::Rendered(t) if t.contains("{sitemap}")));
        assert!(matches!(list, ArtifactContent::Rendered(t) if !t.contains("sitemap")));
    }

    #[test]
    fn test_nested_views_are_flattened_and_follow_their_container() {
        let groups = expand(json!({
            "home": {
                "routes": {
                    "users": { "routes": { "detail": { "routes": { "edit": {} } } } },
                    "logs": {}
                }
            }
        }));

        let home = &groups[0];
        assert_eq!(home.nested.len(), 2);
        assert_eq!(home.nested[0].directory, Path::new("src/Views/Home/UsersView"));
        assert_eq!(
            home.nested[0].nested[0].directory,
            Path::new("src/Views/Home/DetailView")
        );
        assert_eq!(
            home.nested[0].nested[0].nested[0].directory,
            Path::new("src/Views/Home/EditView")
        );

        let jsx: Vec<_> = paths(&groups)
            .into_iter()
            .filter(|p| p.ends_with("View.jsx"))
            .collect();
        assert_eq!(
            jsx,
            vec![
                "src/Views/Home/UsersView/UsersView.jsx",
                "src/Views/Home/DetailView/DetailView.jsx",
                "src/Views/Home/EditView/EditView.jsx",
                "src/Views/Home/LogsView/LogsView.jsx",
            ]
        );
    }

    #[test]
    fn test_expansion_is_idempotent() {
        let doc = json!({
            "home": { "sidebar": true, "routes": { "a": { "sitemap": true, "routes": { "b": {} } } } }
        });
        assert_eq!(expand(doc.clone()), expand(doc));
    }

    #[tokio::test]
    async fn test_written_tree_keeps_directory_order() {
        let groups = expand(json!({
            "home": { "routes": { "a": { "routes": { "b": {}, "c": {} } }, "d": {} } },
            "admin": { "sidebar": true, "routes": { "a": {} } }
        }));
        let sink = RecordingSink::default();

        let written = write_groups(&sink, Path::new("/app"), &groups).await.unwrap();
        assert_eq!(written, 4 + 5 * 3);
        assert_dirs_precede_files(&sink.events());
    }
}
