//! Route specification compiler for magic-react.
//!
//! This crate validates a hierarchical route specification, plans the layout
//! and view components generated for it, and synthesizes the routing module
//! the generated application loads at runtime.
//!
//! ```text
//! document ──schema──▶ RouteSpec ──expand──▶ ArtifactGroup* ──write_groups──▶ disk
//!                           │
//!                           └──synth──▶ RouteModule (src/Data/routes.js)
//! ```
//!
//! Both the expander and the synthesizer are driven by [`walk::walk`], so
//! generated imports and generated navigation always agree.

pub mod artifact;
pub mod bindings;
pub mod expand;
pub mod icons;
pub mod names;
pub mod rendering;
pub mod runtime;
pub mod schema;
pub mod spec;
pub mod synth;
pub mod walk;

pub use artifact::{write_group, write_groups, ArtifactContent, ArtifactGroup, ArtifactSink, FsSink, GeneratedArtifact};
pub use bindings::{BindingTable, ImportBinding};
pub use expand::Expander;
pub use icons::IconSet;
pub use names::{capitalize, layout_name, view_name};
pub use rendering::{RenderError, RouteRenderer};
pub use runtime::{join_path, PathEntry, RouteElement, RouteTable, SitemapEntry};
pub use schema::{load_spec, validate, DocumentFormat, SchemaDefaults, SchemaError, Violation};
pub use spec::{LayoutNode, RouteMap, RouteSpec, ViewNode};
pub use synth::{RouteModule, Synthesizer, ROUTES_MODULE_PATH};
pub use walk::{walk, RouteVisitor, ViewContext};
