//! Types for reading SqPack directories
//!

use std::{
    fmt::{self, Debug},
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::{
    cursor::MappedFile,
    decoder::{self, TraceNode},
    error::{Error, KeyNotFoundError, Result},
    id::ResourceId,
    index::{decode_index, Index, IndexEntry},
    resource::{decode_resource, decode_resource_header, DecodedResource, Resource, ResourceHeader, ResourceKind},
};

/// Partition id to name table
pub const PARTITION_NAMES: &[(&str, &str)] = &[
    ("00", "common"),
    ("01", "bgcommon"),
    ("02", "bg"),
    ("03", "cut"),
    ("04", "chara"),
    ("05", "shader"),
    ("06", "ui"),
    ("07", "sound"),
    ("08", "vfx"),
    ("09", "ui_script"),
    ("0a", "exd"),
    ("0b", "game_script"),
    ("0c", "music"),
    ("12", "_sqpack_test"),
    ("13", "_debug"),
];

const INDEX_SUFFIX: &str = "0000.win32.index";

/// Look up the name of a partition id such as `0a`
pub fn partition_name(id: &str) -> Option<&'static str> {
    PARTITION_NAMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(id))
        .map(|(_, name)| *name)
}

/// Something that can hand out blob resources by path
///
/// Implemented by [`SqPack`]; format crates take it so they can be driven by an in-memory set of
/// files as well.
pub trait ResourceSource {
    /// Read the content of the blob resource at `path`
    fn blob(&self, path: &str) -> Result<Vec<u8>>;
}

/// Location of a resource as found in a partition index
///
/// Holds no decoded content, every read goes back to the data file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    /// Identity of the resource
    pub resource_id: ResourceId,
    /// Number of the `.dat<N>` file
    pub data_file: u8,
    /// Offset of the resource header inside the data file
    pub offset: u64,
}

struct DataFile {
    path: PathBuf,
    map: OnceCell<MappedFile>,
}

impl DataFile {
    fn mapped(&self) -> Result<&MappedFile> {
        self.map.get_or_try_init(|| MappedFile::open(&self.path))
    }
}

/// One named shard of a SqPack directory with its index and data files
pub struct Partition {
    name: String,
    index_path: PathBuf,
    index: OnceCell<Index>,
    data_files: Vec<DataFile>,
}

impl Debug for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Partition({}, index={}, data_files={})",
            self.name,
            self.index_path.display(),
            self.data_files.len()
        )
    }
}

impl Partition {
    /// Open the partition whose files share the `<dir>/<id>0000.win32` prefix
    ///
    /// Data files are discovered by probing `.dat0`, `.dat1`, ... until one is missing. Nothing
    /// is read or mapped yet.
    pub fn new(name: impl Into<String>, prefix: impl AsRef<Path>) -> Self {
        let prefix = prefix.as_ref().to_string_lossy().into_owned();

        let data_files = (0u8..=u8::MAX)
            .map(|n| PathBuf::from(format!("{prefix}.dat{n}")))
            .take_while(|path| path.is_file())
            .map(|path| DataFile {
                path,
                map: OnceCell::new(),
            })
            .collect::<Vec<_>>();

        let partition = Partition {
            name: name.into(),
            index_path: PathBuf::from(format!("{prefix}.index")),
            index: OnceCell::new(),
            data_files,
        };
        debug!("found {partition:?}");
        partition
    }

    /// Name of the partition, e.g. `exd`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of data files found next to the index
    pub fn data_file_count(&self) -> usize {
        self.data_files.len()
    }

    /// The decoded index, loaded on first use
    pub fn index(&self) -> Result<&Index> {
        self.index.get_or_try_init(|| self.load_index())
    }

    #[instrument(skip(self), fields(partition = %self.name), err)]
    fn load_index(&self) -> Result<Index> {
        let file = MappedFile::open(&self.index_path)?;
        let index = decoder::read(file.cursor(), decode_index)?;
        info!("loaded {} index entries", index.len());
        Ok(index)
    }

    /// Number of resources in the index
    pub fn len(&self) -> Result<usize> {
        Ok(self.index()?.len())
    }

    /// Whether the index holds no resources
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn make_ref(&self, (dir_hash, file_hash): (u32, u32), entry: &IndexEntry) -> ResourceRef {
        ResourceRef {
            resource_id: ResourceId::new(self.name.clone(), dir_hash, file_hash),
            data_file: entry.data_file,
            offset: entry.offset,
        }
    }

    /// Iterate over every resource in index order
    pub fn resources(&self) -> Result<impl Iterator<Item = ResourceRef> + '_> {
        Ok(self
            .index()?
            .iter()
            .map(|(key, entry)| self.make_ref(*key, entry)))
    }

    /// Find a resource by id
    ///
    /// The returned reference carries the path of `id` when it has one.
    pub fn resource_ref(&self, id: &ResourceId) -> Result<ResourceRef> {
        let key = (id.dir_hash, id.file_hash);
        let entry = self
            .index()?
            .get(&key)
            .ok_or_else(|| KeyNotFoundError::Resource(id.to_string()))?;

        let mut found = self.make_ref(key, entry);
        found.resource_id = found.resource_id.with_path(id.path.clone());
        Ok(found)
    }

    fn data_file(&self, found: &ResourceRef) -> Result<&MappedFile> {
        let file = self
            .data_files
            .get(usize::from(found.data_file))
            .ok_or_else(|| {
                Error::MalformedHeader(format!(
                    "{} points to missing data file {}",
                    found.resource_id, found.data_file
                ))
            })?
            .mapped()?;

        if found.offset >= file.size() {
            return Err(Error::MalformedHeader(format!(
                "{} points to 0x{:X} beyond the end of {} (size 0x{:X})",
                found.resource_id,
                found.offset,
                file.path().display(),
                file.size()
            )));
        }
        Ok(file)
    }

    /// Read only the header of a resource
    pub fn header(&self, found: &ResourceRef) -> Result<ResourceHeader> {
        let file = self.data_file(found)?;
        decoder::read(file.cursor(), |d| decode_resource_header(d, found.offset))
    }

    /// Decode a resource
    #[instrument(skip(self, found), fields(resource = %found.resource_id), err(level = "debug"))]
    pub fn decode(&self, found: &ResourceRef) -> Result<DecodedResource> {
        let file = self.data_file(found)?;
        let decoded = decoder::read(file.cursor(), |d| decode_resource(d, found.offset))?;
        debug!("decoded {:?}", decoded.header);
        Ok(decoded)
    }

    /// Decode a resource while recording a trace tree
    ///
    /// The outer result fails only when the resource cannot be located.
    pub fn trace(&self, found: &ResourceRef) -> Result<(Result<DecodedResource>, Option<TraceNode>)> {
        let file = self.data_file(found)?;
        Ok(decoder::trace(file.cursor(), |d| decode_resource(d, found.offset)))
    }

    /// Find and decode a resource
    pub fn resource(&self, id: &ResourceId) -> Result<DecodedResource> {
        self.decode(&self.resource_ref(id)?)
    }

    /// Find a resource and decode it while recording a trace tree
    pub fn trace_resource(
        &self,
        id: &ResourceId,
    ) -> Result<(Result<DecodedResource>, Option<TraceNode>)> {
        self.trace(&self.resource_ref(id)?)
    }
}

/// A SqPack directory
///
/// ```no_run
/// fn print_root(base: &str) -> xiv_sqpack::error::Result<()> {
///     let sqpack = xiv_sqpack::SqPack::new(base);
///
///     let root = sqpack.blob("exd/root.exl")?;
///     println!("{}", String::from_utf8_lossy(&root));
///
///     for partition in sqpack.partitions()?.values() {
///         println!("{}: {} resources", partition.name(), partition.len()?);
///     }
///
///     Ok(())
/// }
/// ```
pub struct SqPack {
    base: PathBuf,
    partitions: OnceCell<IndexMap<String, Partition>>,
}

impl Debug for SqPack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SqPack({})", self.base.display())
    }
}

impl SqPack {
    /// Point at a directory holding `*.win32.index` files, nothing is read yet
    pub fn new(base: impl Into<PathBuf>) -> Self {
        SqPack {
            base: base.into(),
            partitions: OnceCell::new(),
        }
    }

    /// Directory this archive reads from
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// All partitions, discovered on first use
    pub fn partitions(&self) -> Result<&IndexMap<String, Partition>> {
        self.partitions.get_or_try_init(|| self.discover())
    }

    #[instrument(skip(self), fields(base = %self.base.display()), err)]
    fn discover(&self) -> Result<IndexMap<String, Partition>> {
        let mut found = fs::read_dir(&self.base)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
            .filter(|name| name.ends_with(INDEX_SUFFIX))
            .collect::<Vec<_>>();
        found.sort();

        let mut partitions = IndexMap::new();
        for file_name in found {
            let id = &file_name[..file_name.len() - INDEX_SUFFIX.len()];
            let Some(name) = partition_name(id) else {
                warn!("skipping unknown partition id {id:?} ({file_name})");
                continue;
            };

            let prefix = self.base.join(format!("{id}0000.win32"));
            partitions.insert(name.to_owned(), Partition::new(name, prefix));
        }

        info!("found {} partitions", partitions.len());
        Ok(partitions)
    }

    /// Get a partition by name
    pub fn partition(&self, name: &str) -> Result<&Partition> {
        self.partitions()?
            .get(name)
            .ok_or_else(|| KeyNotFoundError::Partition(name.to_owned()).into())
    }

    /// Find a resource by id
    pub fn resource_ref(&self, id: &ResourceId) -> Result<ResourceRef> {
        self.partition(&id.partition)?.resource_ref(id)
    }

    /// Find and decode a resource
    pub fn resource(&self, id: &ResourceId) -> Result<DecodedResource> {
        self.partition(&id.partition)?.resource(id)
    }

    /// Find and decode a resource by its raw identity
    pub fn lookup(&self, partition: &str, dir_hash: u32, file_hash: u32) -> Result<Resource> {
        Ok(self
            .resource(&ResourceId::new(partition, dir_hash, file_hash))?
            .resource)
    }

    /// Find and decode a resource by path
    pub fn resource_by_path(&self, path: &str) -> Result<DecodedResource> {
        self.resource(&ResourceId::from_path(path)?)
    }

    /// Decode a resource while recording a trace tree
    pub fn trace_resource(
        &self,
        id: &ResourceId,
    ) -> Result<(Result<DecodedResource>, Option<TraceNode>)> {
        self.partition(&id.partition)?.trace_resource(id)
    }

    /// Read the content of a blob resource
    pub fn blob_by_id(&self, id: &ResourceId) -> Result<Vec<u8>> {
        match self.resource(id)?.resource {
            Resource::Blob { data } => Ok(data),
            other => Err(Error::WrongResourceKind {
                expected: ResourceKind::Blob,
                found: other.kind(),
            }),
        }
    }

    /// Read the content of the blob resource at `path`
    pub fn blob(&self, path: &str) -> Result<Vec<u8>> {
        self.blob_by_id(&ResourceId::from_path(path)?)
    }
}

impl ResourceSource for SqPack {
    fn blob(&self, path: &str) -> Result<Vec<u8>> {
        SqPack::blob(self, path)
    }
}
