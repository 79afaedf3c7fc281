/*
 * engine/passthrough.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Passthrough engine - no code execution.
 */

//! Passthrough engine (no code execution).
//!
//! Inline markdown is returned unchanged and code blocks are echoed as
//! fenced source, so a refresh with this engine records what an
//! echo-only, non-evaluating render would show. It is always available.

use super::config::RenderConfig;
use super::error::RenderError;
use super::traits::Renderer;

/// Engine that renders without executing anything.
#[derive(Debug, Clone, Default)]
pub struct PassthroughRenderer {
    configs: Vec<RenderConfig>,
}

impl PassthroughRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration currently applied, if any.
    pub fn current_config(&self) -> Option<&RenderConfig> {
        self.configs.last()
    }
}

impl Renderer for PassthroughRenderer {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn render_inline(&mut self, markdown: &str) -> Result<String, RenderError> {
        Ok(markdown.to_string())
    }

    fn render_block(&mut self, code: &str, _options: &str) -> Result<String, RenderError> {
        Ok(format!("```r\n{code}\n```"))
    }

    fn push_config(&mut self, config: &RenderConfig) -> Result<(), RenderError> {
        self.configs.push(config.clone());
        Ok(())
    }

    fn pop_config(&mut self) -> Result<(), RenderError> {
        self.configs.pop();
        Ok(())
    }
}
