use mapdoc::core::{ExtractError, XmlDocument};
use std::fs;
use tempfile::TempDir;

const EXPORT: &str = r#"<?xml version="1.0" encoding="Windows-1252"?>
<!DOCTYPE POWERMART SYSTEM "powrmart.dtd">
<!-- exported from repository REP_DEV -->
<POWERMART CREATION_DATE="03/07/2024 14:21:06" REPOSITORY_VERSION="188.97">
    <REPOSITORY NAME="REP_DEV" VERSION="188" CODEPAGE="MS1252" DATABASETYPE="Oracle">
        <FOLDER NAME="CUSTOMER_MART" OWNER="etl_dev" SHARED="NOTSHARED">
            <SOURCE NAME="CUSTOMERS" DBDNAME="CRM_STG" DATABASETYPE="Oracle">
                <SOURCEFIELD NAME="CUSTOMER_ID" DATATYPE="number(p,s)" PRECISION="10" SCALE="0"/>
                <SOURCEFIELD NAME="CUSTOMER_NAME" DATATYPE="varchar2" PRECISION="120" SCALE="0"/>
            </SOURCE>
            <TARGET NAME="CUST_DIM" DATABASETYPE="Teradata"/>
        </FOLDER>
        <FOLDER NAME="ORDER_MART" OWNER="etl_dev" SHARED="NOTSHARED">
            <SOURCE NAME="ORDERS" DBDNAME="OMS_STG" DATABASETYPE="Oracle"/>
        </FOLDER>
    </REPOSITORY>
</POWERMART>"#;

#[test]
fn test_parse_file_reads_export_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wf_customer_load.XML");
    fs::write(&path, EXPORT).unwrap();

    let doc = XmlDocument::parse_file(&path).unwrap();
    assert_eq!(doc.root().tag(), "POWERMART");
    assert_eq!(
        doc.root().attr("REPOSITORY_VERSION"),
        Some("188.97")
    );
}

#[test]
fn test_parse_file_decodes_declared_windows_1252() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wf_societe.XML");
    // NAME carries byte 0xE9, which is invalid as UTF-8 but e-acute in the
    // declared codepage.
    fs::write(
        &path,
        b"<?xml version=\"1.0\" encoding=\"Windows-1252\"?>\n\
          <POWERMART>\n\
              <FOLDER NAME=\"Soci\xE9t\xE9\"/>\n\
          </POWERMART>",
    )
    .unwrap();

    let doc = XmlDocument::parse_file(&path).unwrap();
    let folder = doc.root().child("FOLDER").unwrap();
    assert_eq!(folder.attr("NAME"), Some("Soci\u{e9}t\u{e9}"));
}

#[test]
fn test_parse_file_missing_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.XML");

    let err = XmlDocument::parse_file(&path).unwrap_err();
    assert!(matches!(err, ExtractError::DocumentNotFound { .. }));
    assert!(err.to_string().contains("absent.XML"));
}

#[test]
fn test_prolog_doctype_and_comments_are_dropped() {
    let doc = XmlDocument::parse_str(EXPORT).unwrap();
    // The first element after the skipped prolog is the root.
    assert_eq!(doc.root().tag(), "POWERMART");
    assert_eq!(doc.root().children().len(), 1);
    assert_eq!(doc.root().children()[0].tag(), "REPOSITORY");
}

#[test]
fn test_descendants_cross_folder_boundaries_in_document_order() {
    let doc = XmlDocument::parse_str(EXPORT).unwrap();

    let sources = doc.root().descendants("SOURCE");
    let names: Vec<Option<&str>> = sources.iter().map(|s| s.attr("NAME")).collect();
    assert_eq!(names, vec![Some("CUSTOMERS"), Some("ORDERS")]);

    let fields = doc.root().descendants("SOURCEFIELD");
    assert_eq!(fields.len(), 2);
}

#[test]
fn test_attribute_declaration_order_is_preserved() {
    let doc = XmlDocument::parse_str(EXPORT).unwrap();
    let source = doc.root().descendants("SOURCE")[0];

    let names: Vec<&str> = source.attrs().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["NAME", "DBDNAME", "DATABASETYPE"]);
}

#[test]
fn test_subtree_serialization_is_self_contained() {
    let doc = XmlDocument::parse_str(EXPORT).unwrap();
    let folder = doc.root().descendants("FOLDER")[0];

    let xml = folder.to_xml();
    let reparsed = XmlDocument::parse_str(&xml).unwrap();

    assert_eq!(reparsed.root().tag(), "FOLDER");
    assert_eq!(reparsed.root().attr("NAME"), Some("CUSTOMER_MART"));
    assert_eq!(reparsed.root().descendants("SOURCEFIELD").len(), 2);
    // The sibling folder is not part of the fragment.
    assert!(!xml.contains("ORDER_MART"));
}

#[test]
fn test_empty_file_is_malformed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.XML");
    fs::write(&path, "").unwrap();

    let err = XmlDocument::parse_file(&path).unwrap_err();
    assert!(matches!(err, ExtractError::MalformedDocument { .. }));
}

#[test]
fn test_attribute_entities_are_unescaped_once() {
    let doc = XmlDocument::parse_str(
        r#"<MAPPING NAME="m_load" DESCRIPTION="loads &quot;gold&quot; &amp; silver rows"/>"#,
    )
    .unwrap();
    assert_eq!(
        doc.root().attr("DESCRIPTION"),
        Some(r#"loads "gold" & silver rows"#)
    );
}
