//! Template rendering error types.

/// Provenance template error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Handlebars rendering error.
    #[error("Template rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// A configured format failed to compile.
    #[error("Invalid '{name}' format: {source}")]
    RegistrationError {
        name: &'static str,
        #[source]
        source: handlebars::TemplateError,
    },
}
