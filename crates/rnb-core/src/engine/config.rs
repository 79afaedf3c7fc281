/*
 * engine/config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rendering configuration and its scope guard.
 */

//! Rendering configuration and the scope guard that applies it.

use std::ops::{Deref, DerefMut};

use serde::Serialize;

use super::error::RenderError;
use super::traits::Renderer;

/// How the engine prints quotation marks in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// ASCII quotes, stable across locales.
    #[default]
    Plain,
    /// Locale-dependent typographic quotes.
    Fancy,
}

/// Settings an engine must hold while a refresh renders cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub quote_style: QuoteStyle,
    /// Console width used when printing results.
    pub console_width: u16,
    /// Tell code being run that a render is in progress.
    pub in_progress: bool,
    /// Keep plots from opening an interactive graphics device.
    pub suppress_inline_device: bool,
    pub encoding: String,
    /// Engine progress bars.
    pub progress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            quote_style: QuoteStyle::Plain,
            console_width: 80,
            in_progress: true,
            suppress_inline_device: true,
            encoding: "UTF-8".to_string(),
            progress: false,
        }
    }
}

impl RenderConfig {
    pub fn with_console_width(mut self, width: u16) -> Self {
        self.console_width = width;
        self
    }
}

/// Applies a [`RenderConfig`] to a renderer for as long as it is alive.
///
/// Entering the scope pushes the configuration; dropping the scope pops it,
/// whether the render finished, returned an error, or unwound. A failure to
/// restore is logged, since `Drop` cannot report it.
pub struct RenderScope<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
}

impl<'a, R: Renderer + ?Sized> RenderScope<'a, R> {
    pub fn enter(renderer: &'a mut R, config: &RenderConfig) -> Result<Self, RenderError> {
        renderer.push_config(config)?;
        tracing::debug!(engine = renderer.name(), width = config.console_width, "Applied render configuration");
        Ok(Self { renderer })
    }
}

impl<R: Renderer + ?Sized> Deref for RenderScope<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> DerefMut for RenderScope<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R: Renderer + ?Sized> Drop for RenderScope<'_, R> {
    fn drop(&mut self) {
        match self.renderer.pop_config() {
            Ok(()) => tracing::debug!(engine = self.renderer.name(), "Restored render configuration"),
            Err(e) => tracing::warn!(engine = self.renderer.name(), error = %e, "Failed to restore render configuration"),
        }
    }
}
