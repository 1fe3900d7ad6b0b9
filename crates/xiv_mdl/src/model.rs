//! Lazily decoded view of a model resource.
//!
//! [`Model`] owns the reassembled sub-blocks of a [`Resource::Model`]. The header, the vertex
//! declarations and every mesh's vertices and indices are decoded on first access and kept.

use std::{
    fmt::{self, Debug},
    rc::Rc,
};

use once_cell::unsync::OnceCell;
use serde::Serialize;
use tracing::{debug, instrument};
use xiv_sqpack::{
    cursor::ByteCursor,
    decoder,
    error::Error as SqPackError,
    LodBuffers, Resource, ResourceKind, SqPack,
};

use crate::{
    error::Result,
    shapes::{decode_mesh_shapes, MeshShape},
    structure::{decode_structure, ModelStructure},
    types::{LodHeader, MeshHeader},
    vertex::{decode_indices, decode_vertices, VertexAttributes},
};

/// A model resource
pub struct Model {
    header: Vec<u8>,
    mesh_shapes: Vec<u8>,
    buffers: Vec<(Rc<[u8]>, Rc<[u8]>)>,
    structure: OnceCell<ModelStructure>,
    shapes: OnceCell<Vec<MeshShape>>,
    lods: OnceCell<Vec<Lod>>,
}

impl Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Model(header={} bytes, mesh_shapes={} bytes)", self.header.len(), self.mesh_shapes.len())
    }
}

impl TryFrom<Resource> for Model {
    type Error = crate::error::Error;

    fn try_from(resource: Resource) -> Result<Self> {
        match resource {
            Resource::Model {
                header,
                mesh_shapes,
                lod_buffers,
                ..
            } => Ok(Model::new(header, mesh_shapes, lod_buffers)),
            other => Err(SqPackError::WrongResourceKind {
                expected: ResourceKind::Model,
                found: other.kind(),
            }
            .into()),
        }
    }
}

impl Model {
    /// Build from the sub-blocks of a model resource
    pub fn new(header: Vec<u8>, mesh_shapes: Vec<u8>, lod_buffers: [LodBuffers; 3]) -> Self {
        let buffers = lod_buffers
            .into_iter()
            .map(|buffers| (Rc::from(buffers.vertex), Rc::from(buffers.index)))
            .collect();

        Model {
            header,
            mesh_shapes,
            buffers,
            structure: OnceCell::new(),
            shapes: OnceCell::new(),
            lods: OnceCell::new(),
        }
    }

    /// Read the model at `path` from an archive
    #[instrument(skip(sqpack), err(level = "debug"))]
    pub fn load(sqpack: &SqPack, path: &str) -> Result<Self> {
        let decoded = sqpack.resource_by_path(path)?;
        Model::try_from(decoded.resource)
    }

    /// The decoded header sub-block
    pub fn structure(&self) -> Result<&ModelStructure> {
        self.structure.get_or_try_init(|| {
            decoder::read(ByteCursor::new(&self.header), decode_structure)
        })
    }

    /// The decoded vertex declarations, one per mesh
    pub fn mesh_shapes(&self) -> Result<&[MeshShape]> {
        self.shapes.get_or_try_init(|| {
            decoder::read(ByteCursor::new(&self.mesh_shapes), decode_mesh_shapes)
        })
        .map(Vec::as_slice)
    }

    /// The three levels of detail
    pub fn lods(&self) -> Result<&[Lod]> {
        self.lods.get_or_try_init(|| self.build_lods()).map(Vec::as_slice)
    }

    #[instrument(skip(self), err(level = "debug"))]
    fn build_lods(&self) -> Result<Vec<Lod>> {
        let structure = self.structure()?;
        let shapes = self.mesh_shapes()?;

        let lods = structure
            .lods
            .iter()
            .zip(&self.buffers)
            .enumerate()
            .map(|(level, (header, (vertex, index)))| {
                let first = usize::from(header.mesh_index);
                let range = first..first + usize::from(header.mesh_count);
                let (Some(mesh_headers), Some(mesh_shapes)) =
                    (structure.meshes.get(range.clone()), shapes.get(range.clone()))
                else {
                    return Err(SqPackError::MalformedHeader(format!(
                        "lod {level} meshes {range:?} out of range"
                    ))
                    .into());
                };

                let meshes = mesh_headers
                    .iter()
                    .zip(mesh_shapes)
                    .map(|(mesh, shape)| Mesh {
                        header: *mesh,
                        shape: shape.clone(),
                        material: structure.material_name(mesh.material_index),
                        vertex_buffer: vertex.clone(),
                        index_buffer: index.clone(),
                        attributes: OnceCell::new(),
                        indices: OnceCell::new(),
                    })
                    .collect::<Vec<_>>();

                debug!("lod {level}: {} meshes", meshes.len());
                Ok(Lod {
                    level,
                    header: *header,
                    meshes,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(lods)
    }

    /// Every level of detail with its meshes fully decoded, ready to be serialized
    pub fn view(&self) -> Result<ModelView> {
        let lods = self
            .lods()?
            .iter()
            .map(|lod| {
                let meshes = lod.meshes().iter().map(Mesh::view).collect::<Result<Vec<_>>>()?;
                Ok(LodView { meshes })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ModelView { lods })
    }
}

/// One level of detail
#[derive(Debug)]
pub struct Lod {
    level: usize,
    header: LodHeader,
    meshes: Vec<Mesh>,
}

impl Lod {
    /// 0 is the most detailed
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn header(&self) -> &LodHeader {
        &self.header
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }
}

/// One mesh of a level of detail
pub struct Mesh {
    header: MeshHeader,
    shape: MeshShape,
    material: Option<String>,
    vertex_buffer: Rc<[u8]>,
    index_buffer: Rc<[u8]>,
    attributes: OnceCell<VertexAttributes>,
    indices: OnceCell<Vec<u16>>,
}

impl Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("header", &self.header)
            .field("shape", &self.shape)
            .field("material", &self.material)
            .finish_non_exhaustive()
    }
}

impl Mesh {
    pub fn header(&self) -> &MeshHeader {
        &self.header
    }

    /// Vertex declaration
    pub fn shape(&self) -> &[crate::types::VertexElement] {
        &self.shape
    }

    /// Material path as stored in the model, usually relative like `/mt_c0101e0001_top_a.mtrl`
    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    /// Decoded vertex attributes
    pub fn attributes(&self) -> Result<&VertexAttributes> {
        self.attributes.get_or_try_init(|| {
            decoder::read(ByteCursor::new(&self.vertex_buffer), |d| {
                decode_vertices(d, &self.header, &self.shape)
            })
        })
    }

    /// Vertex positions
    pub fn positions(&self) -> Result<&[Vec<f32>]> {
        self.attributes().map(|attributes| attributes.positions.as_slice())
    }

    /// Triangle list indices
    pub fn indices(&self) -> Result<&[u16]> {
        self.indices.get_or_try_init(|| {
            decoder::read(ByteCursor::new(&self.index_buffer), |d| decode_indices(d, &self.header))
        })
        .map(Vec::as_slice)
    }

    /// The mesh in viewer form
    pub fn view(&self) -> Result<MeshView> {
        Ok(MeshView {
            material: self.material.clone(),
            indices: self.indices()?.to_vec(),
            attributes: self.attributes()?.clone(),
        })
    }
}

/// Serializable form of a model: `{"lods": [{"meshes": [...]}]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelView {
    pub lods: Vec<LodView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LodView {
    pub meshes: Vec<MeshView>,
}

/// A mesh with its material, indices and vertex attributes side by side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshView {
    pub material: Option<String>,
    pub indices: Vec<u16>,
    #[serde(flatten)]
    pub attributes: VertexAttributes,
}
