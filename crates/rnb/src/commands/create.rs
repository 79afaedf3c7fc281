/*
 * create.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Create command implementation
 */

//! Create command implementation.
//!
//! `rnb create` writes a new notebook. Without flags the title and author
//! come from `RNB_TITLE` / `RNB_AUTHOR`, the date is today, and the body
//! is the three-cell sample.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use rnb_core::operations::{self, CreateRequest};

/// Arguments for the create command
#[derive(Debug)]
pub struct CreateArgs {
    pub path: Option<PathBuf>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    /// Extra frontmatter as KEY=VALUE
    pub meta: Vec<String>,
}

/// Execute the create command
pub fn execute(args: CreateArgs) -> Result<()> {
    let options = super::env_options()?;

    let mut request = CreateRequest::new();
    request.path = args.path;
    request.title = args.title;
    request.author = args.author;
    request.date = args.date;
    for entry in &args.meta {
        let (key, value) = parse_meta(entry)?;
        request = request.with_meta(key, value);
    }

    let path = operations::create(request, &options).context("Failed to create notebook")?;
    println!("{}", path.display());
    Ok(())
}

/// Split a `KEY=VALUE` argument.
fn parse_meta(entry: &str) -> Result<(&str, &str)> {
    let Some((key, value)) = entry.split_once('=') else {
        bail!("Invalid --meta entry {entry:?}: expected KEY=VALUE");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Invalid --meta entry {entry:?}: empty key");
    }
    Ok((key, value))
}
