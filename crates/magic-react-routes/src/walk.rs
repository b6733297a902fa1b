//! The single traversal shared by file planning and code emission.
//!
//! Views are visited depth-first, pre-order, in document key order. Every view
//! reports the key of the layout that owns it, whatever its depth: generated
//! view directories and generated route entries are both flattened per layout,
//! and driving both from this walk keeps imports and navigation in step.

use crate::spec::{LayoutNode, RouteMap, RouteSpec, ViewNode};

/// Position of a view inside the specification.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Key of the owning top-level layout.
    pub layout_key: &'a str,
    /// Key of the view itself.
    pub key: &'a str,
    /// Key of the parent view, `None` for a layout's direct children.
    pub parent_key: Option<&'a str>,
    /// Nesting depth below the layout, starting at 1.
    pub depth: usize,
}

/// Callbacks driven by [`walk`]. All methods default to doing nothing.
pub trait RouteVisitor {
    type Error;

    fn enter_layout(&mut self, _key: &str, _layout: &LayoutNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn leave_layout(&mut self, _key: &str, _layout: &LayoutNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_view(&mut self, _ctx: ViewContext<'_>, _view: &ViewNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after all of the view's descendants were visited.
    fn leave_view(&mut self, _ctx: ViewContext<'_>, _view: &ViewNode) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Walk every layout of `spec` in order.
pub fn walk<V: RouteVisitor>(spec: &RouteSpec, visitor: &mut V) -> Result<(), V::Error> {
    for (key, layout) in &spec.layouts {
        walk_layout(key, layout, visitor)?;
    }
    Ok(())
}

/// Walk a single layout and all of its views.
pub fn walk_layout<V: RouteVisitor>(
    key: &str,
    layout: &LayoutNode,
    visitor: &mut V,
) -> Result<(), V::Error> {
    visitor.enter_layout(key, layout)?;
    if let Some(children) = &layout.children {
        walk_views(key, None, 1, children, visitor)?;
    }
    visitor.leave_layout(key, layout)
}

fn walk_views<V: RouteVisitor>(
    layout_key: &str,
    parent_key: Option<&str>,
    depth: usize,
    views: &RouteMap<ViewNode>,
    visitor: &mut V,
) -> Result<(), V::Error> {
    for (key, view) in views {
        let ctx = ViewContext {
            layout_key,
            key,
            parent_key,
            depth,
        };

        visitor.enter_view(ctx, view)?;
        if let Some(children) = &view.children {
            walk_views(layout_key, Some(key), depth + 1, children, visitor)?;
        }
        visitor.leave_view(ctx, view)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{validate, SchemaDefaults};
    use serde_json::json;
    use std::convert::Infallible;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl RouteVisitor for Recorder {
        type Error = Infallible;

        fn enter_layout(&mut self, key: &str, _: &LayoutNode) -> Result<(), Infallible> {
            self.events.push(format!("+{key}"));
            Ok(())
        }

        fn leave_layout(&mut self, key: &str, _: &LayoutNode) -> Result<(), Infallible> {
            self.events.push(format!("-{key}"));
            Ok(())
        }

        fn enter_view(&mut self, ctx: ViewContext<'_>, _: &ViewNode) -> Result<(), Infallible> {
            self.events.push(format!(
                "{}:{}@{}<{}",
                ctx.layout_key,
                ctx.key,
                ctx.depth,
                ctx.parent_key.unwrap_or("")
            ));
            Ok(())
        }
    }

    #[test]
    fn test_walk_is_preorder_and_anchored_to_layout() {
        let doc = json!({
            "home": {
                "routes": {
                    "a": { "routes": { "a1": {}, "a2": { "routes": { "deep": {} } } } },
                    "b": {}
                }
            },
            "admin": {}
        });
        let spec = validate(&doc, &SchemaDefaults::default()).unwrap();

        let mut recorder = Recorder::default();
        walk(&spec, &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "+home",
                "home:a@1<",
                "home:a1@2<a",
                "home:a2@2<a",
                "home:deep@3<a2",
                "home:b@1<",
                "-home",
                "+admin",
                "-admin",
            ]
        );
    }

    #[test]
    fn test_visitor_errors_stop_the_walk() {
        struct FailOn(&'static str, usize);

        impl RouteVisitor for FailOn {
            type Error = String;

            fn enter_view(&mut self, ctx: ViewContext<'_>, _: &ViewNode) -> Result<(), String> {
                self.1 += 1;
                if ctx.key == self.0 {
                    Err(format!("stopped at {}", ctx.key))
                } else {
                    Ok(())
                }
            }
        }

        let doc = json!({ "home": { "routes": { "a": {}, "b": {}, "c": {} } } });
        let spec = validate(&doc, &SchemaDefaults::default()).unwrap();

        let mut visitor = FailOn("b", 0);
        let err = walk(&spec, &mut visitor).unwrap_err();
        assert_eq!(err, "stopped at b");
        assert_eq!(visitor.1, 2);
    }
}
