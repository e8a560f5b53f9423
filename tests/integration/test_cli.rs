//! Tests that drive the compiled binary end to end.

use assert_cmd::Command;
use predicates::str::{contains, starts_with};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BIN: &str = "mapdoc";

const WORKFLOW_XML: &str = r#"<?xml version="1.0" encoding="Windows-1252"?>
<!DOCTYPE POWERMART SYSTEM "powrmart.dtd">
<POWERMART CREATION_DATE="03/07/2024 14:21:06" REPOSITORY_VERSION="188.97">
    <REPOSITORY NAME="REP_EDW" VERSION="188" DATABASETYPE="Oracle">
        <FOLDER NAME="CUSTOMER_MART" OWNER="etl_dev" SHARED="NOTSHARED">
            <SOURCE NAME="CUSTOMERS" DBDNAME="CRM_STG" DATABASETYPE="Oracle" OWNERNAME="CRM_OWNER">
                <SOURCEFIELD NAME="CUSTOMER_ID" DATATYPE="number(p,s)" KEYTYPE="PRIMARY KEY" NULLABLE="NOTNULL" PRECISION="10" SCALE="0" LENGTH="0"/>
                <SOURCEFIELD NAME="CUSTOMER_NAME" DATATYPE="varchar2" KEYTYPE="NOT A KEY" NULLABLE="NULL" PRECISION="120" SCALE="0" LENGTH="120"/>
            </SOURCE>
            <TARGET NAME="CUST_DIM" DATABASETYPE="Teradata">
                <TARGETFIELD NAME="CUSTOMER_KEY" DATATYPE="bigint" KEYTYPE="PRIMARY KEY" NULLABLE="NOTNULL" PRECISION="19" SCALE="0" FIELDNUMBER="1"/>
            </TARGET>
            <MAPPING NAME="m_customer_load" DESCRIPTION="Load the customer dimension">
                <TRANSFORMATION NAME="SQ_CUSTOMERS" TYPE="Source Qualifier">
                    <TRANSFORMFIELD NAME="CUSTOMER_ID" DATATYPE="decimal" PRECISION="10" SCALE="0"/>
                </TRANSFORMATION>
                <INSTANCE NAME="SQ_CUSTOMERS" TRANSFORMATION_NAME="SQ_CUSTOMERS" TRANSFORMATION_TYPE="Source Qualifier"/>
                <INSTANCE NAME="CUST_DIM" TRANSFORMATION_NAME="CUST_DIM" TRANSFORMATION_TYPE="Target Definition"/>
                <CONNECTOR FROMFIELD="CUSTOMER_ID" FROMINSTANCE="SQ_CUSTOMERS" TOFIELD="CUSTOMER_KEY" TOINSTANCE="CUST_DIM" TOINSTANCETYPE="Target Definition"/>
            </MAPPING>
            <SESSION NAME="s_m_customer_load" MAPPINGNAME="m_customer_load" VERSIONNUMBER="1">
                <SESSTRANSFORMATIONINST SINSTANCENAME="SQ_CUSTOMERS" TRANSFORMATIONTYPE="Source Qualifier" STAGE="SOURCE" PIPELINE="1" ISREPARTITIONPOINT="NO"/>
                <ATTRIBUTE NAME="Commit Type" VALUE="Target"/>
            </SESSION>
        </FOLDER>
    </REPOSITORY>
</POWERMART>"#;

/// Same shape, but the connector names a field SQ_CUSTOMERS never declares.
const BAD_LINEAGE_XML: &str = r#"<?xml version="1.0" encoding="Windows-1252"?>
<POWERMART CREATION_DATE="03/07/2024 14:21:06" REPOSITORY_VERSION="188.97">
    <REPOSITORY NAME="REP_EDW" VERSION="188" DATABASETYPE="Oracle">
        <FOLDER NAME="CUSTOMER_MART" OWNER="etl_dev" SHARED="NOTSHARED">
            <MAPPING NAME="m_customer_load">
                <TRANSFORMATION NAME="SQ_CUSTOMERS" TYPE="Source Qualifier">
                    <TRANSFORMFIELD NAME="CUSTOMER_ID" DATATYPE="decimal" PRECISION="10" SCALE="0"/>
                </TRANSFORMATION>
                <INSTANCE NAME="SQ_CUSTOMERS" TRANSFORMATION_NAME="SQ_CUSTOMERS" TRANSFORMATION_TYPE="Source Qualifier"/>
                <CONNECTOR FROMFIELD="MISSING" FROMINSTANCE="SQ_CUSTOMERS" TOFIELD="CUSTOMER_KEY" TOINSTANCE="CUST_DIM" TOINSTANCETYPE="Target Definition"/>
            </MAPPING>
        </FOLDER>
    </REPOSITORY>
</POWERMART>"#;

fn mapdoc() -> Command {
    Command::cargo_bin(BIN).expect("binary should build")
}

fn write_workflow(dir: &TempDir, xml: &str) -> PathBuf {
    let path = dir.path().join("wf_customer_load.XML");
    fs::write(&path, xml).unwrap();
    path
}

#[test]
fn test_help_lists_workflow_commands() {
    mapdoc()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("WORKFLOW COMMANDS"))
        .stdout(contains("docs"))
        .stdout(contains("lineage"))
        .stdout(contains("split"))
        .stdout(contains("generate"));
}

#[test]
fn test_version_prints_name_and_version() {
    mapdoc()
        .arg("--version")
        .assert()
        .success()
        .stdout(starts_with("mapdoc"))
        .stdout(contains(mapdoc::VERSION));
}

#[test]
fn test_docs_writes_workflow_markdown() {
    let tmp = TempDir::new().unwrap();
    let workflow = write_workflow(&tmp, WORKFLOW_XML);
    let out = tmp.path().join("out");

    mapdoc()
        .current_dir(tmp.path())
        .arg("docs")
        .arg(&workflow)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(contains(
            "Documented 1 sources, 1 targets, 1 mappings, 1 sessions",
        ))
        .stdout(contains("workflow.md"));

    let markdown = fs::read_to_string(out.join("wf_customer_load").join("workflow.md")).unwrap();
    assert!(markdown.contains("# Workflow: wf_customer_load"));
    assert!(markdown.contains("## Source name: CUSTOMERS"));
    assert!(markdown.contains("## Target name: CUST_DIM"));
    assert!(markdown.contains("- **Mapping Name:** m_customer_load"));
    assert!(markdown.contains("| CUSTOMER_ID | CUSTOMER_KEY | SQ_CUSTOMERS | N/A | decimal | 10 | 0 |"));
    assert!(markdown.contains("### Transformation Components"));
    assert!(markdown.contains("| SQ_CUSTOMERS | Source Qualifier | SOURCE | 1 | NO |"));
}

#[test]
fn test_lineage_text_output() {
    let tmp = TempDir::new().unwrap();
    let workflow = write_workflow(&tmp, WORKFLOW_XML);

    mapdoc()
        .current_dir(tmp.path())
        .arg("lineage")
        .arg(&workflow)
        .assert()
        .success()
        .stdout(contains("Mapping: m_customer_load"))
        .stdout(contains(
            "  CUSTOMER_ID -> CUST_DIM.CUSTOMER_KEY via SQ_CUSTOMERS",
        ));
}

#[test]
fn test_lineage_json_output() {
    let tmp = TempDir::new().unwrap();
    let workflow = write_workflow(&tmp, WORKFLOW_XML);

    let output = mapdoc()
        .current_dir(tmp.path())
        .arg("lineage")
        .arg(&workflow)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["mapping"], "m_customer_load");
    assert_eq!(reports[0]["records"][0]["to_instance"], "CUST_DIM");
    assert_eq!(reports[0]["records"][0]["source_field"], "CUSTOMER_ID");
    assert_eq!(reports[0]["records"][0]["target_field"], "CUSTOMER_KEY");
    assert_eq!(reports[0]["records"][0]["transformation"], "SQ_CUSTOMERS");
    assert!(reports[0]["skipped"].as_array().unwrap().is_empty());
}

#[test]
fn test_lineage_unknown_mapping_fails() {
    let tmp = TempDir::new().unwrap();
    let workflow = write_workflow(&tmp, WORKFLOW_XML);

    mapdoc()
        .current_dir(tmp.path())
        .arg("lineage")
        .arg(&workflow)
        .arg("--mapping")
        .arg("m_missing")
        .assert()
        .failure()
        .stderr(contains("mapping m_missing not found"));
}

#[test]
fn test_lineage_strict_rejects_undeclared_field() {
    let tmp = TempDir::new().unwrap();
    let workflow = write_workflow(&tmp, BAD_LINEAGE_XML);

    mapdoc()
        .current_dir(tmp.path())
        .arg("lineage")
        .arg(&workflow)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("not declared by transformation"));

    // The default lenient policy reports the same connector as skipped.
    mapdoc()
        .current_dir(tmp.path())
        .arg("lineage")
        .arg(&workflow)
        .assert()
        .success()
        .stdout(contains("Skipped connectors: 1"));
}

#[test]
fn test_split_writes_one_file_per_folder_unit() {
    let tmp = TempDir::new().unwrap();
    let workflow = write_workflow(&tmp, WORKFLOW_XML);
    let out = tmp.path().join("parts");

    mapdoc()
        .current_dir(tmp.path())
        .arg("split")
        .arg(&workflow)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("Split into 2 files"));

    let mapping = fs::read_to_string(out.join("mapping-m_customer_load.xml")).unwrap();
    assert!(mapping.starts_with("<MAPPING"));
    assert!(mapping.contains("SQ_CUSTOMERS"));
    assert!(out.join("session-s_m_customer_load.xml").exists());
}

#[test]
fn test_docs_reports_missing_workflow_file() {
    let tmp = TempDir::new().unwrap();

    mapdoc()
        .current_dir(tmp.path())
        .arg("docs")
        .arg("absent.XML")
        .assert()
        .failure()
        .stderr(contains("workflow document not found"));
}

#[test]
fn test_generate_without_api_key_fails() {
    let tmp = TempDir::new().unwrap();
    let workflow = write_workflow(&tmp, WORKFLOW_XML);
    let config_path = tmp.path().join("mapdoc.toml");
    fs::write(
        &config_path,
        "[api]\napi_key_env = \"MAPDOC_CLI_TEST_KEY\"\n",
    )
    .unwrap();

    mapdoc()
        .current_dir(tmp.path())
        .env_remove("MAPDOC_CLI_TEST_KEY")
        .arg("generate")
        .arg(&workflow)
        .arg("--config")
        .arg(&config_path)
        .arg("--out")
        .arg(tmp.path().join("gen"))
        .assert()
        .failure()
        .stderr(contains(
            "no API key found: set the MAPDOC_CLI_TEST_KEY environment variable",
        ));
}
