/*
 * engine/knitr/protocol.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Request/response types for the knitr driver.
 */

//! Request and response types for the knitr driver process.
//!
//! Each request is one JSON object on one line of the driver's stdin. Each
//! response is one stdout line starting with [`RESPONSE_PREFIX`].
//!
//! ```json
//! {"action": "block", "code": "1+1", "options": "echo=FALSE"}
//! ```
//!
//! ```text
//! @@rnb {"ok": true, "text": "```\n## [1] 2\n```"}
//! @@rnb {"ok": false, "error": "object 'x' not found"}
//! ```

use serde::{Deserialize, Serialize};

use super::error_parser::classify_r_error;
use crate::engine::config::RenderConfig;
use crate::engine::error::RenderError;

/// Marks driver responses among anything else R prints to stdout.
pub const RESPONSE_PREFIX: &str = "@@rnb ";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum KnitrRequest<'a> {
    Configure { config: &'a RenderConfig },
    Restore,
    Inline { text: &'a str },
    Block { code: &'a str, options: &'a str },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnitrResponse {
    pub ok: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Set when the driver could not load a required package.
    #[serde(default)]
    pub package: Option<String>,
}

impl KnitrResponse {
    /// Parse one stdout line; `None` if it is not a driver response.
    pub fn parse_line(line: &str) -> Option<Result<Self, RenderError>> {
        let json = line.strip_prefix(RESPONSE_PREFIX)?;
        Some(serde_json::from_str(json.trim_end()).map_err(|e| {
            RenderError::protocol("knitr", format!("malformed response: {e}"))
        }))
    }

    /// The rendered text, or the error the driver reported.
    pub fn into_result(self) -> Result<String, RenderError> {
        if self.ok {
            return Ok(self.text.unwrap_or_default());
        }
        if let Some(package) = self.package {
            return Err(RenderError::missing_package("knitr", package));
        }
        let message = self.error.unwrap_or_else(|| "unknown R error".to_string());
        Err(classify_r_error(&message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let block = KnitrRequest::Block {
            code: "1+1",
            options: "echo=FALSE",
        };
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"action": "block", "code": "1+1", "options": "echo=FALSE"})
        );

        assert_eq!(
            serde_json::to_value(KnitrRequest::Restore).unwrap(),
            json!({"action": "restore"})
        );

        let config = RenderConfig::default();
        let configure = serde_json::to_value(KnitrRequest::Configure { config: &config }).unwrap();
        assert_eq!(configure["action"], "configure");
        assert_eq!(configure["config"]["consoleWidth"], 80);
    }

    #[test]
    fn test_parse_line_ignores_other_output() {
        assert!(KnitrResponse::parse_line("[1] \"stray print\"").is_none());
    }

    #[test]
    fn test_parse_ok_response() {
        let response = KnitrResponse::parse_line("@@rnb {\"ok\":true,\"text\":\"## [1] 2\"}\n")
            .unwrap()
            .unwrap();
        assert_eq!(response.into_result().unwrap(), "## [1] 2");
    }

    #[test]
    fn test_parse_error_response() {
        let response = KnitrResponse::parse_line("@@rnb {\"ok\":false,\"error\":\"object 'x' not found\"}")
            .unwrap()
            .unwrap();
        let err = response.into_result().unwrap_err();
        assert!(matches!(err, RenderError::ExecutionFailed { .. }));
        assert!(err.to_string().contains("object 'x' not found"));
    }

    #[test]
    fn test_parse_missing_package_response() {
        let response = KnitrResponse::parse_line(
            "@@rnb {\"ok\":false,\"package\":\"knitr\",\"error\":\"there is no package called 'knitr'\"}",
        )
        .unwrap()
        .unwrap();
        assert!(matches!(
            response.into_result().unwrap_err(),
            RenderError::MissingPackage { package, .. } if package == "knitr"
        ));
    }

    #[test]
    fn test_parse_malformed_response() {
        let err = KnitrResponse::parse_line("@@rnb {not json").unwrap().unwrap_err();
        assert!(matches!(err, RenderError::Protocol { .. }));
    }
}
