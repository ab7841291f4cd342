use std::fs::{self, File};
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const DFI: &str = r#"
Header{
  Version = "1.0.0"
  BaseFileName = "particle"
  NumContainer = 3
}
"#;

fn data_dir(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("particle.dfi"), DFI).unwrap();
    for f in files {
        File::create(dir.path().join(f)).unwrap();
    }
    dir
}

fn stage(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pdm-stage"))
        .arg("-i")
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run pdm-stage")
}

fn stdout(o: &Output) -> String {
    String::from_utf8_lossy(&o.stdout).to_string()
}

fn stderr(o: &Output) -> String {
    String::from_utf8_lossy(&o.stderr).to_string()
}

#[test]
fn stages_latest_timestep() {
    let dir = data_dir(&[
        "particle_0_10.dat",
        "particle_1_10.dat",
        "particle_2_10.dat",
        "particle_0_20.dat",
        "particle_1_20.dat",
        "particle_2_20.dat",
        "particle_3_20.dat",
        "particle_4_20.dat",
    ]);
    let o = stage(dir.path(), &["2", "particle.dfi"]);
    assert!(o.status.success(), "{}", stderr(&o));
    assert_eq!(
        stdout(&o),
        "#PJM --mpi \"use-rankdir\"\n\
         #PJM --stagin \"rank =\" 0   particle_0_20.dat   %r:./\n\
         #PJM --stagin \"rank =\" 0   particle_1_20.dat   %r:./\n\
         #PJM --stagin \"rank =\" 0   particle_2_20.dat   %r:./\n\
         #PJM --stagin \"rank =\" 1   particle_3_20.dat   %r:./\n\
         #PJM --stagin \"rank =\" 1   particle_4_20.dat   %r:./\n"
    );
}

#[test]
fn stages_requested_timestep() {
    let dir = data_dir(&["particle_0_10.dat", "particle_1_10.dat", "particle_0_20.dat"]);
    let o = stage(dir.path(), &["-s", "10", "3", "particle.dfi"]);
    assert!(o.status.success(), "{}", stderr(&o));
    let out = stdout(&o);
    assert_eq!(out.lines().count(), 3);
    assert!(out.contains("\"rank =\" 0   particle_0_10.dat"));
    assert!(out.contains("\"rank =\" 1   particle_1_10.dat"));
    assert!(!out.contains("\"rank =\" 2"));
}

#[test]
fn json_format() {
    let dir = data_dir(&["particle_0_1.dat", "particle_1_1.dat"]);
    let o = stage(dir.path(), &["--format", "json", "2", "particle.dfi"]);
    assert!(o.status.success(), "{}", stderr(&o));
    let v: serde_json::Value = serde_json::from_str(&stdout(&o)).unwrap();
    assert_eq!(v["base_filename"], "particle");
    assert_eq!(v["region_count"], 2);
    assert_eq!(v["ranks"][1][0], "particle_1_1.dat");
}

#[test]
fn missing_timestep_is_fatal() {
    let dir = data_dir(&["particle_0_5.dat"]);
    let o = stage(dir.path(), &["--step", "3", "1", "particle.dfi"]);
    assert_eq!(o.status.code(), Some(1));
    assert!(stdout(&o).is_empty());
    assert!(stderr(&o).contains("no field data file for 3 found"));
}

#[test]
fn missing_dfi_is_fatal() {
    let dir = data_dir(&["particle_0_5.dat"]);
    let o = stage(dir.path(), &["1", "other.dfi"]);
    assert_eq!(o.status.code(), Some(1));
    assert!(stdout(&o).is_empty());
    assert!(stderr(&o).contains("dfi file not found!"));
}

#[test]
fn no_data_files_is_fatal() {
    let dir = data_dir(&[]);
    let o = stage(dir.path(), &["1", "particle.dfi"]);
    assert_eq!(o.status.code(), Some(1));
    assert!(stderr(&o).contains("no files found"));
}

#[test]
fn bad_process_counts_are_usage_errors() {
    let dir = data_dir(&["particle_0_5.dat"]);
    for nproc in ["0", "-4", "four"] {
        let o = stage(dir.path(), &[nproc, "particle.dfi"]);
        assert_eq!(o.status.code(), Some(1), "nproc {nproc}");
        assert!(stdout(&o).is_empty());
        assert!(stderr(&o).contains("Usage"), "nproc {nproc}");
    }
}

#[test]
fn missing_arguments_are_usage_errors() {
    let dir = data_dir(&[]);
    let o = stage(dir.path(), &["4"]);
    assert_eq!(o.status.code(), Some(1));
    assert!(stderr(&o).contains("DFI_FILE"));
}

#[test]
fn help_exits_with_one() {
    let o = Command::new(env!("CARGO_BIN_EXE_pdm-stage"))
        .arg("--help")
        .output()
        .unwrap();
    assert_eq!(o.status.code(), Some(1));
    assert!(stdout(&o).contains("NPROC"));
}
