/*
 * engine/error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for rendering engines.
 */

//! Error types for rendering engines.

use thiserror::Error;

/// Errors that can occur while a rendering engine renders a cell.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The engine's runtime (R, ...) is not installed.
    #[error("Engine runtime not found: {engine} requires {runtime}")]
    RuntimeNotFound {
        /// The engine that requires the runtime
        engine: String,
        /// The runtime that was not found
        runtime: String,
    },

    /// A required package is not installed.
    #[error("Missing package: {package}")]
    MissingPackage {
        /// The engine that requires the package
        engine: String,
        /// The missing package name
        package: String,
    },

    /// Code execution or inline expansion failed.
    #[error("Execution failed in {engine}: {message}")]
    ExecutionFailed {
        /// The engine that failed
        engine: String,
        /// Error message from the engine
        message: String,
    },

    /// The engine process answered with something we could not read.
    #[error("Protocol error in {engine}: {message}")]
    Protocol { engine: String, message: String },

    /// Engine output was not valid UTF-8.
    #[error("Engine output is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Create a "runtime not found" error.
    pub fn runtime_not_found(engine: impl Into<String>, runtime: impl Into<String>) -> Self {
        Self::RuntimeNotFound {
            engine: engine.into(),
            runtime: runtime.into(),
        }
    }

    /// Create a "missing package" error.
    pub fn missing_package(engine: impl Into<String>, package: impl Into<String>) -> Self {
        Self::MissingPackage {
            engine: engine.into(),
            package: package.into(),
        }
    }

    /// Create an "execution failed" error.
    pub fn execution_failed(engine: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            engine: engine.into(),
            message: message.into(),
        }
    }

    pub fn protocol(engine: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            engine: engine.into(),
            message: message.into(),
        }
    }
}
