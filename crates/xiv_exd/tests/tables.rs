mod common;

use pretty_assertions::assert_eq;
use tracing_test::traced_test;
use xiv_exd::{
    csv::export,
    error::{Error, Result},
    DataTables, Language, Value,
};

use common::tables;

#[traced_test]
#[test]
fn list_tables() -> Result<()> {
    let source = tables();
    let data = DataTables::new(&source);

    let names = data.tables()?.map(|table| table.name().to_owned()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Item", "Status"]);

    assert!(matches!(
        data.table("Missing"),
        Err(Error::TableNotFound(name)) if name == "Missing"
    ));

    Ok(())
}

#[traced_test]
#[test]
fn languages() -> Result<()> {
    let source = tables();
    let data = DataTables::new(&source);

    assert_eq!(
        data.table("Item")?.languages()?,
        vec![Language::Japanese, Language::English]
    );
    assert_eq!(data.table("Status")?.languages()?, vec![Language::None]);

    assert!(matches!(
        data.table("Item")?.localized(Language::ChineseSimplified),
        Err(Error::LanguageNotFound { language: Language::ChineseSimplified, .. })
    ));

    Ok(())
}

#[traced_test]
#[test]
fn schema_members_are_sorted() -> Result<()> {
    let source = tables();
    let data = DataTables::new(&source);

    let offsets = data
        .table("Item")?
        .schema()?
        .members
        .iter()
        .map(|member| member.offset)
        .collect::<Vec<_>>();
    assert_eq!(offsets, vec![0, 4, 8]);

    Ok(())
}

#[traced_test]
#[test]
fn page_lookup() -> Result<()> {
    let source = tables();
    let data = DataTables::new(&source);
    let items = data.table("Item")?.localized(Language::English)?;

    assert_eq!(items.page_for(700).map(|page| page.start()), Some(500));
    assert_eq!(items.page_for(1200).map(|page| page.start()), Some(1200));
    assert_eq!(items.page_for(499).map(|page| page.start()), Some(0));

    let row = items.row(700)?;
    assert_eq!(row.id, 700);
    assert_eq!(
        row.values,
        vec![
            Value::String("Ether, Hi-".into()),
            Value::U32(350),
            Value::Bool(false),
        ]
    );
    assert_eq!(items.row(1200)?.values[0], Value::String("Elixir".into()));

    // only the page holding the row was read
    assert_eq!(source.requested("exd/Item_500_en.exd"), 1);
    assert_eq!(source.requested("exd/Item_1200_en.exd"), 1);
    assert_eq!(source.requested("exd/Item_0_en.exd"), 0);

    Ok(())
}

#[traced_test]
#[test]
fn pages_are_decoded_once() -> Result<()> {
    let source = tables();
    let data = DataTables::new(&source);
    let items = data.table("Item")?.localized(Language::Japanese)?;

    for _ in 0..3 {
        assert_eq!(items.row(1)?.values[0], Value::String("ポーション".into()));
    }

    assert_eq!(source.requested("exd/Item_0_ja.exd"), 1);
    assert_eq!(source.requested("exd/Item.exh"), 1);
    assert_eq!(source.requested("exd/root.exl"), 1);

    Ok(())
}

#[traced_test]
#[test]
fn missing_rows() -> Result<()> {
    let source = tables();
    let data = DataTables::new(&source);

    let status = data.table("Status")?.localized(Language::None)?;
    assert!(matches!(
        status.row(50),
        Err(Error::RowNotFound { id: 50, language: Language::None, .. })
    ));
    assert_eq!(status.row(101)?.values, vec![Value::U16(9)]);

    let items = data.table("Item")?.localized(Language::English)?;
    assert!(matches!(items.row(650), Err(Error::RowNotFound { id: 650, .. })));

    Ok(())
}

#[traced_test]
#[test]
fn packed_bool_bit_three() -> Result<()> {
    let source = tables();
    let data = DataTables::new(&source);
    let items = data.table("Item")?.localized(Language::English)?;

    assert_eq!(items.row(1)?.values[2], Value::Bool(true));
    assert_eq!(items.row(0)?.values[2], Value::Bool(false));
    assert_eq!(items.row(700)?.values[2], Value::Bool(false));

    Ok(())
}

#[traced_test]
#[test]
fn missing_page_file() -> Result<()> {
    let mut source = tables();
    source.insert("exd/Status.exh", common::exh(4, &[(0x05, 0)], &[(100, 2), (200, 1)], &[0]));
    let data = DataTables::new(&source);
    let status = data.table("Status")?.localized(Language::None)?;

    assert!(matches!(status.row(200), Err(Error::SqPack(_))));
    assert!(status.rows().is_err());

    // the page that exists still decodes
    assert_eq!(status.row(100)?.values, vec![Value::U16(7)]);

    Ok(())
}

#[traced_test]
#[test]
fn export_csv() -> Result<()> {
    let source = tables();
    let data = DataTables::new(&source);
    let dir = tempfile::tempdir()?;

    let written = export(dir.path(), data.table("Item")?)?;
    assert_eq!(
        written,
        vec![dir.path().join("Item.ja.csv"), dir.path().join("Item.en.csv")]
    );

    let english = std::fs::read_to_string(dir.path().join("Item.en.csv"))?;
    assert_eq!(
        english,
        "0,,0,false\n\
         1,Potion,20,true\n\
         500,Hi-Potion,120,false\n\
         700,\"Ether, Hi-\",350,false\n\
         1200,Elixir,900,true\n"
    );

    export(dir.path(), data.table("Status")?)?;
    let status = std::fs::read_to_string(dir.path().join("Status.csv"))?;
    assert_eq!(status, "100,7\n101,9\n");

    Ok(())
}
