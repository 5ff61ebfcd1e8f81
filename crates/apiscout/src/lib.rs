//! OpenAPI document generation for folders of route modules
//!
//! A run goes through four stages, each with fresh state:
//!
//! - [`extractor::extract`] parses the route folder into a declaration table and
//!   an ordered list of tags
//! - [`explorer::SchemaExplorer`] walks every endpoint's types and collects the
//!   schema-eligible ones
//! - [`naming::ReferenceNameResolver`] gives each schema a short unique name
//! - [`openapi_generator::generate_document`] writes the OpenAPI document
//!
//! [`generate`] and [`generate_to_file`] run all of them.

pub mod config;
pub mod error;
pub mod explorer;
pub mod extractor;
pub mod file_utils;
pub mod members;
pub mod naming;
pub mod openapi_generator;

use std::path::Path;

use anyhow::{Context, Result};
use apiscout_core::TypeIdentity;
use apiscout_core::openapi::OpenApi;
use tracing::info;

pub use apiscout_core;
pub use config::GeneratorConfig;
pub use error::{ConfigError, ExtractError};

use crate::explorer::SchemaExplorer;
use crate::naming::ReferenceNameResolver;
use crate::openapi_generator::generate_document;

/// Run extraction, exploration, naming and document generation
pub fn generate(config: &GeneratorConfig) -> Result<OpenApi> {
    let extraction = extractor::extract(&config.source_dir, &config.module_prefix)
        .with_context(|| {
            format!(
                "Failed to extract routes from: {}",
                config.source_dir.display()
            )
        })?;

    let mut explorer = SchemaExplorer::new(&extraction.registry);
    for tag in &extraction.tags {
        explorer.register_endpoint_group(tag);
    }
    for name in &config.extra_types {
        let identity = TypeIdentity::parse(name);
        if !extraction.registry.contains(&identity) {
            return Err(ConfigError::UnknownExtraType { name: name.clone() })
                .context("Failed to register extra types");
        }
        explorer.register_extra(identity);
    }

    let named = ReferenceNameResolver::new(explorer.finish().schemas).resolve_names();
    let document = generate_document(config, &extraction.registry, &extraction.tags, &named);

    info!(
        tags = extraction.tags.len(),
        paths = document.paths.len(),
        schemas = named.len(),
        "generated OpenAPI document"
    );
    Ok(document)
}

/// [`generate`], then write the JSON document to `config.output_file`
pub fn generate_to_file(config: &GeneratorConfig) -> Result<OpenApi> {
    let document = generate(config)?;
    let json = openapi_generator::to_json(&document)
        .context("Failed to serialize OpenAPI document")?;

    let output: &Path = &config.output_file;
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write file: {}", output.display()))?;

    info!(output = %output.display(), "wrote OpenAPI document");
    Ok(document)
}
