/*
 * engine/knitr/error_parser.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Classify R error messages.
 */

//! Classify R error messages reported by the knitr driver.
//!
//! ## Missing Package
//! ```text
//! there is no package called 'knitr'
//! ```
//!
//! ## Knitr Execution Error
//! ```text
//! Quitting from lines 1-3 (): Error in eval(expr, envir, enclos): object 'x' not found
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::engine::error::RenderError;

/// Matches both ASCII and typographic quotes around the package name.
static MISSING_PACKAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"there is no package called ['‘]([^'’]+)['’]")
        .expect("Invalid regex pattern for missing package")
});

static QUITTING_FROM_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*Quitting from lines \d+-\d+[^:]*:\s*")
        .expect("Invalid regex pattern for knitr location")
});

/// Turn an R error message into the matching [`RenderError`].
pub fn classify_r_error(message: &str) -> RenderError {
    if let Some(caps) = MISSING_PACKAGE.captures(message) {
        return RenderError::missing_package("knitr", &caps[1]);
    }
    RenderError::execution_failed("knitr", clean_error_message(message))
}

/// Drop knitr's location prefix and surrounding whitespace.
fn clean_error_message(message: &str) -> String {
    QUITTING_FROM_LINES.replace(message, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_package_ascii_quotes() {
        let err = classify_r_error("Error in loadNamespace(x) : there is no package called 'ggplot2'");
        assert!(matches!(err, RenderError::MissingPackage { package, .. } if package == "ggplot2"));
    }

    #[test]
    fn test_missing_package_fancy_quotes() {
        let err = classify_r_error("there is no package called ‘dplyr’");
        assert!(matches!(err, RenderError::MissingPackage { package, .. } if package == "dplyr"));
    }

    #[test]
    fn test_knitr_location_is_stripped() {
        let err = classify_r_error(
            "Quitting from lines 1-3 (): Error in eval(expr, envir, enclos): object 'x' not found\n",
        );
        match err {
            RenderError::ExecutionFailed { engine, message } => {
                assert_eq!(engine, "knitr");
                assert_eq!(message, "Error in eval(expr, envir, enclos): object 'x' not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_generic_message_kept() {
        let err = classify_r_error("  boom  ");
        assert_eq!(err.to_string(), "Execution failed in knitr: boom");
    }
}
