//! Endpoint extraction from a folder of route modules
//!
//! Every `.rs` file under the folder is parsed with `syn`. Declarations of all
//! files are registered first, so that handlers can name types from any module;
//! each file holding `#[route]` handlers then becomes one [`Tag`].

mod args;
mod declarations;
mod routes;
mod scope;
mod serde_attrs;

use std::path::{Path, PathBuf};

use apiscout_core::{Tag, TypeRegistry};
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::file_utils::{collect_files, file_to_segments, module_path};

pub use routes::{route_path, tag_name};

/// Everything a generation run needs from the sources
#[derive(Debug)]
pub struct Extraction {
    pub registry: TypeRegistry,
    /// Ordered by module path
    pub tags: Vec<Tag>,
}

/// One parsed source file
pub(crate) struct SourceFile {
    pub path: PathBuf,
    /// Module segments relative to the source folder
    pub segments: Vec<String>,
    /// Full module path, prefix included
    pub module: String,
    pub ast: syn::File,
}

/// Extract declarations and routes from every `.rs` file under `folder`
pub fn extract(folder: &Path, module_prefix: &str) -> Result<Extraction> {
    let sources = load_sources(folder, module_prefix)?;

    let mut index = scope::DeclIndex::default();
    for source in &sources {
        declarations::index_items(&source.ast.items, &source.module, &mut index);
    }
    let mut registry = TypeRegistry::new();
    for source in &sources {
        declarations::register_items(&source.ast.items, &source.module, &index, &mut registry);
    }

    let mut tagged = Vec::new();
    for source in &sources {
        if let Some(tag) = routes::extract_tag(source, &index, &registry)? {
            debug!(tag = %tag.name, module = %source.module, endpoints = tag.endpoints.len(), "collected tag");
            tagged.push((source.module.clone(), tag));
        }
    }
    tagged.sort_by(|(a, _), (b, _)| a.cmp(b));

    Ok(Extraction {
        registry,
        tags: tagged.into_iter().map(|(_, tag)| tag).collect(),
    })
}

fn load_sources(folder: &Path, module_prefix: &str) -> Result<Vec<SourceFile>> {
    let mut sources = Vec::new();
    for path in collect_files(folder)? {
        let content = std::fs::read_to_string(&path).map_err(|source| ExtractError::Io {
            path: path.clone(),
            source,
        })?;
        let ast = syn::parse_file(&content).map_err(|source| ExtractError::Parse {
            path: path.clone(),
            source,
        })?;
        let segments = file_to_segments(&path, folder);
        let module = module_path(module_prefix, &segments);
        sources.push(SourceFile {
            path,
            segments,
            module,
            ast,
        });
    }
    Ok(sources)
}
