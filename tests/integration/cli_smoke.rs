use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

#[test]
fn running_against_a_well_formed_project_exits_zero() {
    let dir = tempdir().unwrap();
    let project_dir = dir.path().join("RRD30-30_OU_Invoices");
    fs::create_dir(&project_dir).unwrap();
    fs::write(project_dir.join("1_invoice.pdf"), b"").unwrap();

    Command::cargo_bin("microfilm")
        .unwrap()
        .arg(&project_dir)
        .assert()
        .success();

    assert!(project_dir.join(".data").join("RRD30-30_project_info.json").exists());
    assert!(project_dir.join(".data").join("RRD30-30_documents.json").exists());
    assert!(project_dir.join(".data").join("RRD30-30_film_allocation.json").exists());
}

#[test]
fn malformed_folder_name_exits_nonzero() {
    let dir = tempdir().unwrap();
    let bad_dir = dir.path().join("not_an_archive_folder");
    fs::create_dir(&bad_dir).unwrap();

    Command::cargo_bin("microfilm")
        .unwrap()
        .arg(&bad_dir)
        .assert()
        .failure()
        .code(1);
}

#[test]
fn nonexistent_path_exits_nonzero() {
    Command::cargo_bin("microfilm")
        .unwrap()
        .arg("/nonexistent/RRD1-1_OU")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn debug_flag_is_accepted() {
    let dir = tempdir().unwrap();
    let project_dir = dir.path().join("RRD31-31_DW_Statements");
    fs::create_dir(&project_dir).unwrap();
    fs::write(project_dir.join("1_statement.pdf"), b"").unwrap();

    Command::cargo_bin("microfilm")
        .unwrap()
        .arg("--debug")
        .arg(&project_dir)
        .assert()
        .success();
}
