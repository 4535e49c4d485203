//! Doctor runs against small throwaway workspaces.

use fixthegap_doctor::{run, DoctorOptions, RuntimeCheckKind};
use fixthegap_model::{LabelEncoder, LinearModelParams, ModelArtifacts};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "svc/Cargo.toml", "[package]\nname = \"demo-svc\"\nversion = \"0.1.0\"\n");
    write(root, "svc/src/lib.rs", "pub mod a;\npub mod b;\npub mod c;\n");
    write(
        root,
        "svc/src/main.rs",
        "#[tokio::main]\nasync fn main() {\n    warp::serve(demo_svc::routes()).run(([0, 0, 0, 0], 8000)).await;\n}\n",
    );
    write(root, "svc/src/a.rs", "use crate::b::helper;\npub fn run() { helper() }\n");
    write(root, "svc/src/b.rs", "use super::a;\npub fn helper() {}\npub fn again() { a::run() }\n");
    write(root, "svc/src/c.rs", "use crate::a::run;\npub fn go() { run(\"}\") }\n");
    write(root, "target/debug/broken.rs", "fn main() {");

    dir
}

fn write_artifacts(dir: &Path) {
    ModelArtifacts::new(
        LinearModelParams::new(vec![1000.0, 500.0, 2000.0], 30000.0),
        LabelEncoder::fit(["Female", "Male"]),
        LabelEncoder::fit(["Data Analyst", "Data Scientist"]),
    )
    .save(dir)
    .unwrap();
}

#[test]
fn test_reports_cycle_once_and_missing_artifacts() {
    let dir = workspace();
    let report = run(&DoctorOptions {
        root: dir.path().to_path_buf(),
        ..DoctorOptions::default()
    })
    .unwrap();

    assert_eq!(report.files.len(), 5);
    assert_eq!(report.entry_points().count(), 2);
    assert_eq!(report.parse_problems().count(), 0);
    assert_eq!(
        report.cycles,
        vec![vec!["demo_svc::a", "demo_svc::b", "demo_svc::a"]]
    );

    let text = report.render();
    assert_eq!(text.matches("demo_svc::a -> demo_svc::b -> demo_svc::a").count(), 1);

    assert!(report.runtime.iter().all(|check| check.outcome.is_err()));
    assert!(report.has_problems());
}

#[test]
fn test_healthy_workspace() {
    let dir = workspace();
    let root = dir.path();
    write(root, "svc/src/b.rs", "pub fn helper() {}\n");
    write_artifacts(&root.join("models"));
    write(
        root,
        "data/ds_salaries.csv",
        "work_year,job_title,employee_residence,salary_in_usd\n2023,Data Scientist,IN,30000\n2023,Data Analyst,US,90000\n",
    );

    let report = run(&DoctorOptions {
        root: root.to_path_buf(),
        ..DoctorOptions::default()
    })
    .unwrap();

    assert!(report.cycles.is_empty());
    for check in &report.runtime {
        assert!(check.outcome.is_ok(), "{:?}", check);
    }
    let reference = report
        .runtime
        .iter()
        .find(|check| check.kind == RuntimeCheckKind::ReferenceData)
        .unwrap();
    assert_eq!(reference.outcome.as_deref(), Ok("2 rows"));
    assert!(!report.has_problems());
}

#[test]
fn test_parse_problem_reported() {
    let dir = workspace();
    write(dir.path(), "svc/src/c.rs", "pub fn go() {\n    let x = (1, 2;\n}\n");

    let report = run(&DoctorOptions {
        root: dir.path().to_path_buf(),
        ..DoctorOptions::default()
    })
    .unwrap();

    let problems: Vec<_> = report
        .parse_problems()
        .map(|(file, problem)| (file.path.clone(), problem.clone()))
        .collect();
    assert_eq!(problems.len(), 1);
    assert!(problems[0].0.ends_with("svc/src/c.rs"));
    assert_eq!(problems[0].1, "mismatched '}' at line 3 (closes '(' from line 2)");
}
