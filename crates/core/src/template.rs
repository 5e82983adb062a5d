// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt template expansion: `{{state.x}}`, `{{signal.name}}`, `{{input}}`,
//! and bareword state fields (`{{x}}`, shorthand for `{{state.x}}`).

use serde_json::Value;

/// Variables available to a prompt template during expansion.
pub struct TemplateVars<'a> {
    pub state: &'a Value,
    pub signal_name: &'a str,
    pub signal_payload: &'a Value,
    pub input: Option<&'a str>,
}

/// Expand all `{{...}}` placeholders in `template`. Unknown paths expand to
/// an empty string rather than erroring — the JSON-fallback philosophy of
/// this engine is best-effort text production, not strict validation.
pub fn expand(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        rest = &rest[start + 2..];
        let Some(end) = rest.find("}}") else {
            // Unterminated placeholder: emit the rest verbatim.
            out.push_str("{{");
            out.push_str(rest);
            rest = "";
            break;
        };
        let expr = rest[..end].trim();
        out.push_str(&resolve(expr, vars));
        rest = &rest[end + 2..];
    }
    out.push_str(rest);
    out
}

fn resolve(expr: &str, vars: &TemplateVars) -> String {
    if expr == "input" {
        return vars.input.unwrap_or_default().to_string();
    }

    if let Some(path) = expr.strip_prefix("signal.") {
        return resolve_path_in(vars.signal_payload, path)
            .or_else(|| (path == "name").then(|| vars.signal_name.to_string()))
            .unwrap_or_default();
    }

    let path = expr.strip_prefix("state.").unwrap_or(expr);
    resolve_path_in(vars.state, path).unwrap_or_default()
}

fn resolve_path_in(root: &Value, path: &str) -> Option<String> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(value_to_text(current))
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
