//! Writing decoded resources to disk.
//!
//! Each part of a resource goes to its own file under
//! `<base>/<partition>/<DIR:08X>/<FILE:08X>.<kind>[.<part>[.<i>[.<j>]]]`:
//!
//! | Kind    | Files                                                           |
//! |---------|-----------------------------------------------------------------|
//! | blob    | `.std`                                                          |
//! | model   | `.mdl.headers`, `.mdl.mesh_headers`, `.mdl.lods_buffers.<lod>.<0 vertex, 1 index>` |
//! | texture | `.tex.header`, `.tex.mipmaps.<i>`                               |
//! | empty   | nothing                                                         |

use std::{
    fs,
    path::{Path, PathBuf},
};

use bon::Builder;
use tracing::{debug, instrument};

use crate::{error::Result, id::ResourceId, resource::Resource};

/// Options for how resources are written out
#[derive(Debug, Clone, Copy, Builder)]
pub struct DumpOptions {
    /// Replace files that already exist
    #[builder(default = true)]
    pub overwrite: bool,

    /// Also write the uninterpreted model sub-blocks as `.mdl.extra_buffers.<i>`
    #[builder(default)]
    pub extra_buffers: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions::builder().build()
    }
}

/// Directory and file stem a resource is dumped under
pub fn dump_stem(base: &Path, id: &ResourceId) -> PathBuf {
    base.join(&id.partition)
        .join(format!("{:08X}", id.dir_hash))
        .join(format!("{:08X}", id.file_hash))
}

/// Every file that dumping `resource` produces, paired with its content
pub fn dump_parts<'a>(
    base: &Path,
    id: &ResourceId,
    resource: &'a Resource,
    options: &DumpOptions,
) -> Vec<(PathBuf, &'a [u8])> {
    let stem = dump_stem(base, id);
    let at = |suffix: String| {
        let mut name = stem.clone().into_os_string();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    };

    match resource {
        Resource::Empty => Vec::new(),
        Resource::Blob { data } => vec![(at("std".into()), data.as_slice())],
        Resource::Model {
            header,
            mesh_shapes,
            lod_buffers,
            extra_buffers,
        } => {
            let mut parts = vec![
                (at("mdl.headers".into()), header.as_slice()),
                (at("mdl.mesh_headers".into()), mesh_shapes.as_slice()),
            ];
            for (i, lod) in lod_buffers.iter().enumerate() {
                parts.push((at(format!("mdl.lods_buffers.{i}.0")), lod.vertex.as_slice()));
                parts.push((at(format!("mdl.lods_buffers.{i}.1")), lod.index.as_slice()));
            }
            if options.extra_buffers {
                for (i, extra) in extra_buffers.iter().enumerate() {
                    parts.push((at(format!("mdl.extra_buffers.{i}")), extra.as_slice()));
                }
            }
            parts
        }
        Resource::Texture { header, mipmaps } => {
            let mut parts = vec![(at("tex.header".into()), header.as_slice())];
            for (i, mip) in mipmaps.iter().enumerate() {
                parts.push((at(format!("tex.mipmaps.{i}")), mip.as_slice()));
            }
            parts
        }
    }
}

/// Write a decoded resource below `base`, returning the files written
#[instrument(skip(id, resource, options), fields(resource_id = %id), err(level = "debug"))]
pub fn dump(
    base: &Path,
    id: &ResourceId,
    resource: &Resource,
    options: &DumpOptions,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for (path, content) in dump_parts(base, id, resource, options) {
        if !options.overwrite && path.exists() {
            debug!("keeping existing {}", path.display());
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        written.push(path);
    }

    Ok(written)
}
