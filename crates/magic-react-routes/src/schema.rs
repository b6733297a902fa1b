//! Route specification schema validation.
//!
//! The schema is self-referential: a view's `routes` mapping holds views of the
//! same shape, to any depth. Validation never stops at the first problem; every
//! violation in the document is collected and reported together.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::names::{layout_name, view_name};
use crate::spec::{LayoutNode, RouteMap, RouteSpec, ViewNode};

/// Document field holding a node's children.
pub const CHILDREN_FIELD: &str = "routes";

/// Upper bound on the size of a specification file.
pub const MAX_SPEC_SIZE: usize = 4 * 1024 * 1024;

const LAYOUT_FIELDS: &[&str] = &["path", "title", "icon", "sidebar", CHILDREN_FIELD];
const VIEW_FIELDS: &[&str] = &["path", "title", "icon", "sitemap", CHILDREN_FIELD];

/// Values applied when a node omits an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDefaults {
    pub title: String,
    pub icon: String,
}

impl Default for SchemaDefaults {
    fn default() -> Self {
        Self {
            title: "Insert title".to_string(),
            icon: "AiFillHome".to_string(),
        }
    }
}

/// A single structural problem, located by its dotted key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub location: String,
    pub message: String,
}

impl Violation {
    fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Source document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from the file extension. Anything that is not YAML is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Yaml => f.write_str("YAML"),
        }
    }
}

/// Errors raised while loading a specification.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read route specification {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: magic_react_common_fs::FsError,
    },

    #[error("route specification {path} is not valid {format}: {message}")]
    Parse {
        path: PathBuf,
        format: DocumentFormat,
        message: String,
    },

    #[error("invalid route specification ({} violation(s))", .violations.len())]
    Invalid { violations: Vec<Violation> },
}

impl SchemaError {
    /// Violations carried by an `Invalid` error, empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Invalid { violations } => violations,
            _ => &[],
        }
    }
}

/// Parse raw text in the given format into a document tree, preserving key order.
pub fn parse_document(text: &str, format: DocumentFormat) -> Result<Value, String> {
    match format {
        DocumentFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
    }
}

/// Read, parse and validate a specification file.
pub async fn load_spec(path: &Path, defaults: &SchemaDefaults) -> Result<RouteSpec, SchemaError> {
    let text = magic_react_common_fs::read_to_string(path, MAX_SPEC_SIZE)
        .await
        .map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let format = DocumentFormat::from_path(path);
    let document = parse_document(&text, format).map_err(|message| SchemaError::Parse {
        path: path.to_path_buf(),
        format,
        message,
    })?;

    validate(&document, defaults)
}

/// Validate a parsed document, applying defaults.
pub fn validate(document: &Value, defaults: &SchemaDefaults) -> Result<RouteSpec, SchemaError> {
    let mut validator = Validator {
        defaults,
        violations: Vec::new(),
    };

    let layouts = validator.layouts(document);

    if validator.violations.is_empty() {
        Ok(RouteSpec { layouts })
    } else {
        Err(SchemaError::Invalid {
            violations: validator.violations,
        })
    }
}

/// Names the routing module binds itself; an icon may not shadow them.
const RESERVED_BINDINGS: &[&str] = &[
    "Route",
    "routes",
    "paths",
    "routeComponents",
    "sitemap",
    "joinPath",
    "buildPaths",
    "buildElementTree",
    "buildSitemap",
];

/// Whether `key` can be embedded in a generated identifier.
pub fn is_identifier_fragment(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

struct Validator<'a> {
    defaults: &'a SchemaDefaults,
    violations: Vec<Violation>,
}

impl Validator<'_> {
    fn report(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(location, message));
    }

    fn layouts(&mut self, document: &Value) -> RouteMap<LayoutNode> {
        let mut layouts = RouteMap::new();

        let Some(entries) = document.as_object() else {
            self.report("$", "the document must be a mapping of layouts");
            return layouts;
        };

        let mut layout_names: HashMap<String, String> = HashMap::new();

        for (key, value) in entries {
            self.check_key(key, key);

            if let Some(previous) = layout_names.insert(layout_name(key), key.clone()) {
                self.report(
                    key.as_str(),
                    format!(
                        "layout name `{}` collides with layout `{}`",
                        layout_name(key),
                        previous
                    ),
                );
            }

            if let Some(layout) = self.layout(key, value) {
                layouts.insert(key.clone(), layout);
            }
        }

        layouts
    }

    fn layout(&mut self, key: &str, value: &Value) -> Option<LayoutNode> {
        let Some(object) = value.as_object() else {
            self.report(key, "a layout must be a mapping");
            return None;
        };

        let path = self.string_field(object, "path", key).unwrap_or_default();
        let title = self
            .string_field(object, "title", key)
            .unwrap_or_else(|| self.defaults.title.clone());
        let icon = self.string_field(object, "icon", key);
        if let Some(icon) = &icon {
            self.check_icon(icon, key);
        }
        let sidebar = self.bool_field(object, "sidebar", key).unwrap_or(false);

        let mut seen = HashMap::new();
        let children = self.children(object, key, &mut seen);

        Some(LayoutNode {
            path,
            title,
            icon,
            sidebar,
            children,
            extra: unknown_fields(object, LAYOUT_FIELDS),
        })
    }

    /// Validate the `routes` mapping of the node at `location`.
    ///
    /// `seen` tracks view names across the whole owning layout, since all of a
    /// layout's views share one generated directory.
    fn children(
        &mut self,
        object: &Map<String, Value>,
        location: &str,
        seen: &mut HashMap<String, String>,
    ) -> Option<RouteMap<ViewNode>> {
        let value = object.get(CHILDREN_FIELD)?;
        let routes_location = format!("{location}.{CHILDREN_FIELD}");

        let Some(entries) = value.as_object() else {
            self.report(routes_location, "must be a mapping of route nodes");
            return None;
        };

        let mut views = RouteMap::new();
        for (key, value) in entries {
            let view_location = format!("{routes_location}.{key}");
            self.check_key(key, &view_location);

            let name = view_name(key);
            if let Some(previous) = seen.get(&name) {
                self.report(
                    view_location.as_str(),
                    format!("view name `{name}` is already generated by `{previous}` in the same layout"),
                );
            } else {
                seen.insert(name, view_location.clone());
            }

            if let Some(view) = self.view(value, &view_location, seen) {
                views.insert(key.clone(), view);
            }
        }

        Some(views)
    }

    fn view(
        &mut self,
        value: &Value,
        location: &str,
        seen: &mut HashMap<String, String>,
    ) -> Option<ViewNode> {
        let Some(object) = value.as_object() else {
            self.report(location, "a route node must be a mapping");
            return None;
        };

        if object.contains_key("sidebar") {
            self.report(
                format!("{location}.sidebar"),
                "`sidebar` is only allowed on top-level layouts",
            );
        }

        let path = self.string_field(object, "path", location).unwrap_or_default();
        let title = self
            .string_field(object, "title", location)
            .unwrap_or_else(|| self.defaults.title.clone());
        let icon = self
            .string_field(object, "icon", location)
            .unwrap_or_else(|| self.defaults.icon.clone());
        self.check_icon(&icon, location);
        let sitemap = self.bool_field(object, "sitemap", location).unwrap_or(false);
        let children = self.children(object, location, seen);

        Some(ViewNode {
            path,
            title,
            icon,
            sitemap,
            children,
            extra: unknown_fields(object, VIEW_FIELDS),
        })
    }

    fn check_key(&mut self, key: &str, location: &str) {
        if !is_identifier_fragment(key) {
            self.report(
                location,
                format!("key `{key}` is not a valid identifier fragment"),
            );
        }
    }

    /// Icons are imported by name and rendered as JSX elements.
    fn check_icon(&mut self, icon: &str, location: &str) {
        let location = format!("{location}.icon");
        if !is_identifier_fragment(icon) {
            self.report(location, format!("icon `{icon}` is not a valid identifier"));
        } else if RESERVED_BINDINGS.contains(&icon) {
            self.report(
                location,
                format!("icon `{icon}` clashes with a name the routing module defines"),
            );
        }
    }

    fn string_field(
        &mut self,
        object: &Map<String, Value>,
        field: &str,
        location: &str,
    ) -> Option<String> {
        match object.get(field)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.report(
                    format!("{location}.{field}"),
                    format!("must be a string, found {}", kind(other)),
                );
                None
            }
        }
    }

    fn bool_field(
        &mut self,
        object: &Map<String, Value>,
        field: &str,
        location: &str,
    ) -> Option<bool> {
        match object.get(field)? {
            Value::Bool(b) => Some(*b),
            other => {
                self.report(
                    format!("{location}.{field}"),
                    format!("must be a boolean, found {}", kind(other)),
                );
                None
            }
        }
    }
}

fn unknown_fields(object: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    object
        .iter()
        .filter(|(key, _)| !known.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}
