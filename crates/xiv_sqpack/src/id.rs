//! Resource identifiers.
//!
//! A resource is addressed by the partition it lives in plus the CRC of its lowercased
//! directory and file name. Two text forms are accepted:
//!
//! - a path such as `exd/root.exl`, the first segment naming the partition
//! - a triple such as `exd-E39B7999-A41D4329`

use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
    str::FromStr,
};

use crc::{Crc, CRC_32_ISO_HDLC};
use winnow::{prelude::*, token::take_while, PResult};

use crate::error::{Error, Result};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Hash one lowercased path component the way the index does
pub fn path_hash(component: &str) -> u32 {
    CRC32.checksum(component.as_bytes()) ^ 0xFFFF_FFFF
}

/// Identity of a resource inside an archive
///
/// Equality and hashing only consider the partition and the two hashes. `path` is carried
/// along when a readable path is known.
#[derive(Debug, Clone)]
pub struct ResourceId {
    /// Partition name, e.g. `exd`
    pub partition: String,

    /// Hash of the lowercased directory part
    pub dir_hash: u32,

    /// Hash of the lowercased file name
    pub file_hash: u32,

    /// Readable path, if known
    pub path: Option<String>,
}

impl ResourceId {
    /// Build an id from its raw parts
    pub fn new(partition: impl Into<String>, dir_hash: u32, file_hash: u32) -> Self {
        ResourceId {
            partition: partition.into(),
            dir_hash,
            file_hash,
            path: None,
        }
    }

    /// Hash a forward-slash path
    pub fn from_path(path: &str) -> Result<Self> {
        let lower = path.to_lowercase();
        let Some((dir, file)) = lower.rsplit_once('/') else {
            return Err(Error::InvalidResourceId(path.to_owned()));
        };
        let partition = dir.split('/').next().unwrap_or(dir);
        if partition.is_empty() || file.is_empty() {
            return Err(Error::InvalidResourceId(path.to_owned()));
        }

        Ok(ResourceId {
            partition: partition.to_owned(),
            dir_hash: path_hash(dir),
            file_hash: path_hash(file),
            path: Some(path.to_owned()),
        })
    }

    /// Attach a readable path
    pub fn with_path(mut self, path: Option<String>) -> Self {
        if path.is_some() {
            self.path = path;
        }
        self
    }

    /// The `{partition}-{dir:08X}-{file:08X}` form
    pub fn triple(&self) -> String {
        format!("{}-{:08X}-{:08X}", self.partition, self.dir_hash, self.file_hash)
    }
}

impl PartialEq for ResourceId {
    fn eq(&self, other: &Self) -> bool {
        self.partition == other.partition
            && self.dir_hash == other.dir_hash
            && self.file_hash == other.file_hash
    }
}

impl Eq for ResourceId {}

impl Hash for ResourceId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.partition.hash(state);
        self.dir_hash.hash(state);
        self.file_hash.hash(state);
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} ({path})", self.triple()),
            None => f.write_str(&self.triple()),
        }
    }
}

fn hex_hash(input: &mut &str) -> PResult<u32> {
    take_while(8, |c: char| c.is_ascii_hexdigit())
        .try_map(|digits| u32::from_str_radix(digits, 16))
        .parse_next(input)
}

fn partition_name<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}

fn parse_triple(input: &mut &str) -> PResult<ResourceId> {
    let (partition, _, dir_hash, _, file_hash) =
        (partition_name, '-', hex_hash, '-', hex_hash).parse_next(input)?;
    Ok(ResourceId::new(partition, dir_hash, file_hash))
}

impl FromStr for ResourceId {
    type Err = Error;

    /// Parse either the triple form or a path
    fn from_str(s: &str) -> Result<Self> {
        if let Ok(id) = parse_triple.parse(s) {
            return Ok(id);
        }
        ResourceId::from_path(s)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::id::{path_hash, ResourceId};

    #[test]
    fn crc_matches_reference() {
        assert_eq!(path_hash("123456789"), 0xCBF43926 ^ 0xFFFF_FFFF);
        assert_eq!(path_hash(""), 0xFFFF_FFFF);
    }

    #[test]
    fn path_is_lowercased_and_split() -> Result<()> {
        let id = ResourceId::from_path("EXD/Root.exl")?;

        assert_eq!(id.partition, "exd");
        assert_eq!(id.dir_hash, path_hash("exd"));
        assert_eq!(id.file_hash, path_hash("root.exl"));
        assert_eq!(id.path.as_deref(), Some("EXD/Root.exl"));

        let nested = ResourceId::from_path("chara/equipment/e0001/model/c0101e0001_top.mdl")?;
        assert_eq!(nested.partition, "chara");
        assert_eq!(nested.dir_hash, path_hash("chara/equipment/e0001/model"));
        assert_eq!(nested.file_hash, path_hash("c0101e0001_top.mdl"));

        Ok(())
    }

    #[test]
    fn path_without_directory() {
        assert!(matches!(
            ResourceId::from_path("root.exl"),
            Err(Error::InvalidResourceId(_))
        ));
        assert!(matches!(
            ResourceId::from_path("exd/"),
            Err(Error::InvalidResourceId(_))
        ));
    }

    #[test]
    fn parse_triple_form() -> Result<()> {
        let id: ResourceId = "bg-0000ABCD-DEADbeef".parse()?;

        assert_eq!(id, ResourceId::new("bg", 0xABCD, 0xDEADBEEF));
        assert_eq!(id.path, None);
        assert_eq!(id.triple(), "bg-0000ABCD-DEADBEEF");

        Ok(())
    }

    #[test]
    fn parse_falls_back_to_path() -> Result<()> {
        let id: ResourceId = "ui/icon/000000/000001.tex".parse()?;
        assert_eq!(id.partition, "ui");
        assert!(id.path.is_some());

        Ok(())
    }

    #[test]
    fn identity_ignores_path() -> Result<()> {
        let from_path = ResourceId::from_path("exd/root.exl")?;
        let bare = ResourceId::new("exd", from_path.dir_hash, from_path.file_hash);

        assert_eq!(from_path, bare);

        let set = [from_path, bare].into_iter().collect::<HashSet<_>>();
        assert_eq!(set.len(), 1);

        Ok(())
    }
}
