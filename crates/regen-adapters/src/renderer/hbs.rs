//! Handlebars renderer with the identifier helpers registered.

use handlebars::{Handlebars, handlebars_helper, no_escape};
use regen_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::naming,
    error::RegenResult,
};
use serde_json::Value;
use tracing::instrument;

handlebars_helper!(upper: |s: str| naming::upper_first(s));
handlebars_helper!(trim_pluralization: |s: str| naming::trim_pluralization(s));
handlebars_helper!(is_not_plural: |s: str| naming::is_not_plural(s));
handlebars_helper!(trim_new_prefix: |s: str| naming::trim_new_prefix(s));
// A missing or non-object map has no keys.
handlebars_helper!(key_exist: |key: str, map: Json| {
    map.as_object().is_some_and(|m| naming::key_exists(key, m))
});
handlebars_helper!(camel_to_snake: |s: str| naming::camel_to_snake(s));

/// Renders generator templates with Handlebars.
///
/// Output is not HTML-escaped and missing fields render empty.
pub struct HandlebarsRenderer {
    handlebars: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(no_escape);
        Self::register_helpers(&mut handlebars);
        Self { handlebars }
    }

    fn register_helpers(hb: &mut Handlebars) {
        let [upper_name, trim_plural_name, not_plural_name, trim_new_name, key_exist_name, snake_name] =
            naming::HELPER_NAMES;

        hb.register_helper(upper_name, Box::new(upper));
        hb.register_helper(trim_plural_name, Box::new(trim_pluralization));
        hb.register_helper(not_plural_name, Box::new(is_not_plural));
        hb.register_helper(trim_new_name, Box::new(trim_new_prefix));
        hb.register_helper(key_exist_name, Box::new(key_exist));
        hb.register_helper(snake_name, Box::new(camel_to_snake));
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    #[instrument(skip(self, source, context))]
    fn render(&self, name: &str, source: &str, context: &Value) -> RegenResult<String> {
        self.handlebars
            .render_template(source, context)
            .map_err(|e| {
                ApplicationError::RenderingFailed {
                    template: name.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}
