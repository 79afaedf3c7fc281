/*
 * engine/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rendering engine infrastructure.
 */

//! Rendering engine infrastructure.
//!
//! Refresh never executes code itself; it hands each cell to a
//! [`Renderer`] and stores what comes back.
//!
//! - [`Renderer`] trait - interface for all engines
//! - [`RenderConfig`] / [`RenderScope`] - session settings and the guard
//!   that applies and restores them
//! - Concrete engines:
//!   - [`PassthroughRenderer`] - no execution (always available)
//!   - [`KnitrRenderer`] - R code execution through knitr
//!
//! # Example
//!
//! ```ignore
//! use rnb_core::engine::{KnitrRenderer, RenderConfig, RenderScope, Renderer};
//!
//! let mut engine = KnitrRenderer::new(None).with_working_dir("analysis");
//! let mut scope = RenderScope::enter(&mut engine, &RenderConfig::default())?;
//! let out = scope.render_block("summary(cars)", "echo=FALSE")?;
//! // configuration restored when `scope` drops
//! ```

mod config;
mod error;
pub mod knitr;
mod passthrough;
mod traits;

pub use config::{QuoteStyle, RenderConfig, RenderScope};
pub use error::RenderError;
pub use knitr::KnitrRenderer;
pub use passthrough::PassthroughRenderer;
pub use traits::Renderer;
