//! Placeholder substitution for template files.
//! Rendering is the literal-field-lookup subset of MiniJinja: `{{.name}}`
//! resolves against the resolved-parameter set, an unresolved placeholder
//! is a hard error rather than silently empty output, and everything outside
//! a placeholder (including `{%`/`{#` sequences and the trailing newline)
//! is reproduced byte for byte.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use minijinja::syntax::SyntaxConfig;
use minijinja::{Environment, ErrorKind, UndefinedBehavior};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context. Identical content
    /// and context always yield byte-identical output.
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine using `{{.name}}` placeholders.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with `{{.` / `}}` variable delimiters and strict
    /// undefined-variable behavior. Only the variable syntax is live: block
    /// and comment delimiters are remapped to NUL-prefixed sequences that
    /// cannot occur in text input, so `{%` and `{#` pass through as literal
    /// content.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        // Rendered output must be byte-faithful outside placeholders,
        // including the final newline.
        env.set_keep_trailing_newline(true);
        let syntax = SyntaxConfig::builder()
            .variable_delimiters("{{.", "}}")
            .block_delimiters("\u{0}%", "%\u{0}")
            .comment_delimiters("\u{0}#", "#\u{0}")
            .build()
            .expect("static delimiters are valid");
        env.set_syntax(syntax);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        let mut env = self.env.clone();
        env.add_template("inline", template).map_err(map_render_error)?;
        let tmpl = env.get_template("inline").map_err(map_render_error)?;
        tmpl.render(context).map_err(map_render_error)
    }
}

fn map_render_error(err: minijinja::Error) -> Error {
    if matches!(err.kind(), ErrorKind::UndefinedError) {
        Error::UnknownParameterError(err.to_string())
    } else {
        Error::TemplateError(err.to_string())
    }
}

/// Builds the render context from the resolved-parameter set.
pub fn context_from(values: &IndexMap<String, String>) -> serde_json::Value {
    serde_json::Value::Object(
        values
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect(),
    )
}
