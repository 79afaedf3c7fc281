/*
 * engine/traits.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Renderer trait definition.
 */

//! Renderer trait for the engines that execute notebook cells.

use super::config::RenderConfig;
use super::error::RenderError;

/// A rendering engine for notebook cells.
///
/// Engines turn a cell's source into rendered text: inline markdown
/// expansion for text cells and block execution for code cells. Engines are
/// stateful: code run for one cell is visible to the cells after it, so a
/// refresh calls them strictly in document order.
///
/// # Configuration
///
/// Session-wide settings (console width, quoting, progress reporting, ...)
/// are applied with [`push_config`](Renderer::push_config) and undone with
/// [`pop_config`](Renderer::pop_config). Callers should not pair these by
/// hand; [`RenderScope`](super::RenderScope) pops on every exit path.
///
/// # Example
///
/// ```ignore
/// use rnb_core::engine::{RenderConfig, RenderError, Renderer};
///
/// struct Shouty;
///
/// impl Renderer for Shouty {
///     fn name(&self) -> &str {
///         "shouty"
///     }
///
///     fn render_inline(&mut self, markdown: &str) -> Result<String, RenderError> {
///         Ok(markdown.to_uppercase())
///     }
///
///     fn render_block(&mut self, code: &str, _options: &str) -> Result<String, RenderError> {
///         Ok(code.to_uppercase())
///     }
///
///     fn push_config(&mut self, _config: &RenderConfig) -> Result<(), RenderError> {
///         Ok(())
///     }
///
///     fn pop_config(&mut self) -> Result<(), RenderError> {
///         Ok(())
///     }
/// }
/// ```
pub trait Renderer {
    /// Human-readable name for this engine, used in logs and errors.
    fn name(&self) -> &str;

    /// Expand inline code references and markdown in a text cell.
    fn render_inline(&mut self, markdown: &str) -> Result<String, RenderError>;

    /// Execute a code cell under its chunk options.
    ///
    /// Returns the textual record of the chunk: echoed code and/or output,
    /// as the options direct.
    fn render_block(&mut self, code: &str, options: &str) -> Result<String, RenderError>;

    /// Apply `config`, remembering the settings it replaces.
    fn push_config(&mut self, config: &RenderConfig) -> Result<(), RenderError>;

    /// Restore the settings replaced by the matching `push_config`.
    fn pop_config(&mut self) -> Result<(), RenderError>;

    /// Whether the engine's runtime is installed.
    ///
    /// Default: `true`
    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRenderer {
        available: bool,
    }

    impl Renderer for TestRenderer {
        fn name(&self) -> &str {
            "test"
        }

        fn render_inline(&mut self, markdown: &str) -> Result<String, RenderError> {
            Ok(markdown.to_string())
        }

        fn render_block(&mut self, code: &str, options: &str) -> Result<String, RenderError> {
            Ok(format!("{options}:{code}"))
        }

        fn push_config(&mut self, _config: &RenderConfig) -> Result<(), RenderError> {
            Ok(())
        }

        fn pop_config(&mut self) -> Result<(), RenderError> {
            Ok(())
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    #[test]
    fn test_renderer_trait_object() {
        let mut renderer = TestRenderer { available: true };
        let dynamic: &mut dyn Renderer = &mut renderer;
        assert_eq!(dynamic.name(), "test");
        assert_eq!(dynamic.render_block("1+1", "echo=FALSE").unwrap(), "echo=FALSE:1+1");
        assert!(dynamic.is_available());
    }

    #[test]
    fn test_renderer_availability() {
        let renderer = TestRenderer { available: false };
        assert!(!renderer.is_available());
    }
}
