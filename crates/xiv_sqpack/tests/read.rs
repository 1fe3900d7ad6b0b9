mod common;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tracing_test::traced_test;
use walkdir::WalkDir;
use xiv_sqpack::{
    decoder::TraceEvent,
    error::{Error, KeyNotFoundError, Result},
    id::path_hash,
    DumpOptions, Resource, ResourceId, ResourceKind, SqPack,
};

use common::{bare_resource, blob_resource, data_file, packed, write_partition};

fn hello_archive() -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    write_partition(
        dir.path(),
        "00",
        &[(0xAAAAAAAA, 0xBBBBBBBB, 0x100)],
        &[data_file(&[(0x800, blob_resource(b"hello"))])],
    )?;
    Ok(dir)
}

#[traced_test]
#[test]
fn lookup_stored_blob() -> Result<()> {
    let dir = hello_archive()?;
    let sqpack = SqPack::new(dir.path());

    let resource = sqpack.lookup("common", 0xAAAAAAAA, 0xBBBBBBBB)?;
    assert_eq!(
        resource,
        Resource::Blob {
            data: b"hello".to_vec()
        }
    );

    Ok(())
}

#[traced_test]
#[test]
fn discover_partitions() -> Result<()> {
    let dir = hello_archive()?;
    write_partition(dir.path(), "0a", &[], &[])?;
    write_partition(dir.path(), "0d", &[], &[])?;

    let sqpack = SqPack::new(dir.path());
    let names = sqpack.partitions()?.keys().cloned().collect::<Vec<_>>();
    assert_eq!(names, vec!["common", "exd"]);

    let common = sqpack.partition("common")?;
    assert_eq!(common.data_file_count(), 1);
    assert_eq!(common.len()?, 1);
    assert!(sqpack.partition("exd")?.is_empty()?);

    assert!(logs_contain("skipping unknown partition id"));
    assert!(matches!(
        sqpack.partition("music"),
        Err(Error::KeyNotFound(KeyNotFoundError::Partition(_)))
    ));

    Ok(())
}

#[traced_test]
#[test]
fn resources_by_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (dir_hash, file_hash) = (path_hash("exd"), path_hash("root.exl"));
    write_partition(
        dir.path(),
        "0a",
        &[(dir_hash, file_hash, packed(0, 0x100))],
        &[data_file(&[(0x100, blob_resource(b"EXLT,2\nAction,4\n"))])],
    )?;

    let sqpack = SqPack::new(dir.path());
    assert_eq!(sqpack.blob("exd/root.exl")?, b"EXLT,2\nAction,4\n");
    assert_eq!(sqpack.blob("EXD/Root.EXL")?, b"EXLT,2\nAction,4\n");

    let decoded = sqpack.resource_by_path("exd/root.exl")?;
    assert_eq!(decoded.header.kind, ResourceKind::Blob);
    assert_eq!(decoded.header.uncompressed_size, 16);

    let found = sqpack.resource_ref(&ResourceId::from_path("exd/root.exl")?)?;
    assert_eq!(found.resource_id.path.as_deref(), Some("exd/root.exl"));
    assert_eq!(found.offset, 0x100);

    assert!(matches!(
        sqpack.blob("exd/missing.exh"),
        Err(Error::KeyNotFound(KeyNotFoundError::Resource(_)))
    ));

    Ok(())
}

#[traced_test]
#[test]
fn iterate_resources() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_partition(
        dir.path(),
        "06",
        &[(1, 1, packed(0, 0x80)), (2, 2, packed(1, 0x80)), (3, 3, packed(0, 0x200))],
        &[
            data_file(&[(0x80, blob_resource(b"a")), (0x200, bare_resource(1))]),
            data_file(&[(0x80, blob_resource(b"b"))]),
        ],
    )?;

    let sqpack = SqPack::new(dir.path());
    let ui = sqpack.partition("ui")?;

    let refs = ui.resources()?.collect::<Vec<_>>();
    assert_eq!(
        refs.iter().map(|r| (r.resource_id.dir_hash, r.data_file)).collect::<Vec<_>>(),
        vec![(1, 0), (2, 1), (3, 0)]
    );

    let kinds = refs
        .iter()
        .map(|r| ui.decode(r).map(|d| d.resource))
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(
        kinds,
        vec![
            Resource::Blob { data: b"a".to_vec() },
            Resource::Blob { data: b"b".to_vec() },
            Resource::Empty,
        ]
    );

    Ok(())
}

#[test]
#[should_panic(expected = "overlaps")]
fn overlapping_fixture_resources_panic() {
    // a one byte blob at 0x80 runs up to 0x111
    data_file(&[(0x80, blob_resource(b"a")), (0x100, bare_resource(1))]);
}

#[traced_test]
#[test]
fn failures_stay_local() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_partition(
        dir.path(),
        "00",
        &[
            (1, 1, packed(0, 0x80)),
            (2, 2, packed(0, 0x200)),
            (3, 3, packed(0, 0x8000)),
            (4, 4, packed(5, 0x80)),
        ],
        &[data_file(&[(0x80, blob_resource(b"ok")), (0x200, bare_resource(0xFF))])],
    )?;

    let sqpack = SqPack::new(dir.path());

    assert!(matches!(
        sqpack.lookup("common", 2, 2),
        Err(Error::UnknownVariant { value: 0xFF, .. })
    ));
    assert!(matches!(
        sqpack.lookup("common", 3, 3),
        Err(Error::MalformedHeader(_))
    ));
    assert!(matches!(
        sqpack.lookup("common", 4, 4),
        Err(Error::MalformedHeader(_))
    ));
    assert_eq!(
        sqpack.lookup("common", 1, 1)?,
        Resource::Blob { data: b"ok".to_vec() }
    );
    // the caller decides how loudly a failed lookup is reported
    assert!(!logs_contain("ERROR"));

    Ok(())
}

#[traced_test]
#[test]
fn trace_a_resource() -> Result<()> {
    let dir = hello_archive()?;
    let sqpack = SqPack::new(dir.path());

    let (result, trace) =
        sqpack.trace_resource(&ResourceId::new("common", 0xAAAAAAAA, 0xBBBBBBBB))?;
    assert_eq!(
        result?.resource,
        Resource::Blob {
            data: b"hello".to_vec()
        }
    );

    let root = trace.expect("trace recorded");
    assert_eq!(
        root.event,
        TraceEvent::Record {
            name: "resource",
            args: "2048".into()
        }
    );
    assert_eq!(root.offset, 0);
    assert!(root.to_string().contains("block"));

    Ok(())
}

#[traced_test]
#[test]
fn dump_to_disk() -> Result<()> {
    let dir = hello_archive()?;
    let out = tempfile::tempdir()?;
    let sqpack = SqPack::new(dir.path());

    let id = ResourceId::new("common", 0xAAAAAAAA, 0xBBBBBBBB);
    let decoded = sqpack.resource(&id)?;
    let written = xiv_sqpack::dump::dump(out.path(), &id, &decoded.resource, &DumpOptions::default())?;
    assert_eq!(written.len(), 1);

    let files = WalkDir::new(out.path())
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect::<Vec<_>>();
    assert_eq!(
        files,
        vec![out.path().join("common").join("AAAAAAAA").join("BBBBBBBB.std")]
    );
    assert_eq!(std::fs::read(&files[0])?, b"hello");

    let keep = DumpOptions::builder().overwrite(false).build();
    let again = xiv_sqpack::dump::dump(out.path(), &id, &decoded.resource, &keep)?;
    assert!(again.is_empty());

    Ok(())
}
