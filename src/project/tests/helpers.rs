//! Shared fixtures for configuration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use rstest::fixture;
use tempfile::TempDir;

pub const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Data xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <Connection>
    <Url>https://dev.azure.com/contoso</Url>
    <Project>Payments</Project>
  </Connection>
  <TestCase>
    <AreaPath>Payments\Api</AreaPath>
    <CustomFields>
      <CustomField id="Custom.Team" defaultvalue="Checkout" />
      <CustomField id="Custom.Layer" defaultvalue="Api" />
    </CustomFields>
  </TestCase>
</Data>
"#;

pub const SAMPLE_JSON: &str = r#"{
  "Connection": { "Url": "https://dev.azure.com/fabrikam", "Project": "Orders" },
  "TestCase": {
    "AreaPath": "Orders\\Api",
    "CustomFields": [ { "Id": "Custom.Team", "DefaultValue": "Fulfilment" } ]
  }
}"#;

#[fixture]
pub fn workspace() -> TempDir {
    TempDir::new().expect("temp dir should be created")
}

/// Writes `contents` to `directory/name` and stamps it with `age_seconds`
/// before a fixed reference time.
pub fn write_aged(directory: &Path, name: &str, contents: &str, age_seconds: u64) -> PathBuf {
    let path = directory.join(name);
    fs::write(&path, contents).expect("file should be written");
    let reference = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let modified = reference - Duration::from_secs(age_seconds);
    fs::File::options()
        .write(true)
        .open(&path)
        .expect("file should reopen")
        .set_modified(modified)
        .expect("modification time should be set");
    path
}

pub fn create_folder(root: &Path, name: &str) -> PathBuf {
    let path = root.join(name);
    fs::create_dir_all(&path).expect("folder should be created");
    path
}

pub fn xml_for_project(project: &str) -> String {
    SAMPLE_XML.replace("Payments</Project>", &format!("{project}</Project>"))
}
