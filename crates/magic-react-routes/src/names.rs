//! Identifier derivation for generated components.
//!
//! The same key is derived twice: once here while planning files, and once by
//! the generated routing module at application runtime. Both must agree, so
//! these functions do nothing beyond upper-casing the first character.

/// Upper-case the first character of `key`, leaving the rest untouched.
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Component name of the view generated for `key` (`dashboard` -> `DashboardView`).
pub fn view_name(key: &str) -> String {
    format!("{}View", capitalize(key))
}

/// Component name of the layout generated for `key` (`home` -> `HomeLayout`).
pub fn layout_name(key: &str) -> String {
    format!("{}Layout", capitalize(key))
}
