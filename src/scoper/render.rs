//! Renders an [`ExcludeList`] as the generated `.scoper.php` file.

use super::ExcludeList;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context as TeraContext, Tera};

const SCOPER_TEMPLATE: &str = include_str!("templates/scoper.php.tera");

/// PHP namespace declared by the generated file.
pub const SCOPER_CONFIG_NAMESPACE: &str = "Clever_Canyon\\Scoper\\Config_File";

#[derive(Debug, Serialize)]
struct Section<'a> {
    key: &'static str,
    names: &'a [String],
}

/// Render `list` as a PHP file returning the PHP-Scoper exclude arrays.
///
/// The array body follows PHP's `var_export` layout so regenerated files
/// diff cleanly against ones produced by PHP tooling.
pub fn render(list: &ExcludeList) -> Result<String> {
    let sections = [
        Section {
            key: "exclude-constants",
            names: &list.constants,
        },
        Section {
            key: "exclude-classes",
            names: &list.classes,
        },
        Section {
            key: "exclude-functions",
            names: &list.functions,
        },
    ];

    let mut context = TeraContext::new();
    context.insert("namespace", SCOPER_CONFIG_NAMESPACE);
    context.insert("sections", &sections);

    let mut tera = Tera::default();
    tera.register_filter("php_string", php_string_filter);

    let mut rendered = tera
        .render_str(SCOPER_TEMPLATE, &context)
        .context("Failed to render the scoper config template")?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Quote a value as a single-quoted PHP string literal.
fn php_string_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = value.as_str().ok_or_else(|| tera::Error::msg("php_string filter requires a string"))?;
    Ok(tera::Value::String(php_single_quoted(s)))
}

fn php_single_quoted(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
