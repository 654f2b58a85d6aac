use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn helpgen() -> Command {
    let mut cmd = Command::cargo_bin("helpgen").unwrap();
    cmd.env_remove("HELPGEN_SPHINX_BUILD")
        .env_remove("HELPGEN_DUMPER")
        .env_remove("HELPGEN_LOG");
    cmd
}

fn write_default_sources(dir: &Path) {
    fs::write(
        dir.join("saddlesum-cli.rst"),
        "SYNOPSIS\n\n   saddlesum [options] <weights_file> <term_db>\n",
    )
    .unwrap();
    fs::write(
        dir.join("saddlesum-show-etd.rst"),
        "SYNOPSIS\n\n   saddlesum-show-etd [options] <etd_file>\n",
    )
    .unwrap();
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Stand-in for sphinx-build: copies each requested document to
/// `<outdir>/<stem>.html`.
#[cfg(unix)]
const FAKE_RENDERER: &str = r#"#!/bin/sh
pos=""
while [ $# -gt 0 ]; do
  case "$1" in
    -b|-d|-D|-A|-c) shift 2 ;;
    -*) shift ;;
    *) pos="$pos $1"; shift ;;
  esac
done
set -- $pos
out="$2"
shift 2
for f in "$@"; do
  stem=$(basename "$f" .rst)
  cp "$f" "$out/$stem.html"
done
"#;

/// Stand-in for elinks: a two-line banner followed by the page.
#[cfg(unix)]
const FAKE_DUMPER: &str = r#"#!/bin/sh
for page; do :; done
printf 'Rendered page\n=============\n'
cat "$page"
"#;

#[test]
fn test_help_output() {
    helpgen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SOURCE_DIR"))
        .stdout(predicate::str::contains("OUTPUT_FILE"));
}

#[test]
fn test_requires_both_positionals() {
    helpgen().arg("doc/source").assert().failure();
}

#[test]
fn test_missing_source_documents() {
    let source = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let output = out_dir.path().join("help.h");

    helpgen()
        .arg(source.path())
        .arg(&output)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("saddlesum-cli.rst"));

    assert!(!output.exists());
}

#[test]
fn test_renderer_not_found() {
    let source = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("help.h");
    let scratch = work.path().join(".tmp_help");
    write_default_sources(source.path());

    helpgen()
        .arg(source.path())
        .arg(&output)
        .arg("--scratch-dir")
        .arg(&scratch)
        .arg("--sphinx-build")
        .arg("/definitely/not/sphinx-build")
        .assert()
        .code(4);

    assert!(!output.exists());
    assert!(!scratch.exists());
}

#[test]
fn test_dry_run() {
    let source = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let output = out_dir.path().join("help.h");
    write_default_sources(source.path());

    helpgen()
        .arg(source.path())
        .arg(&output)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("HELP_SADDLESUM"))
        .stdout(predicate::str::contains("HELP_SHOW_ETD"));

    assert!(!output.exists());
}

#[test]
fn test_generate_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("helpgen.toml");

    helpgen()
        .arg("--generate-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[[topics]]"));
    assert!(content.contains("HELP_SHOW_ETD"));
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("helpgen.toml");
    fs::write(&config_path, "[[topics]]\nmacro_name = \"not-valid\"\nsource_stem = \"a\"\n").unwrap();

    helpgen()
        .arg(temp_dir.path())
        .arg(temp_dir.path().join("help.h"))
        .arg("--config")
        .arg(&config_path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not-valid"));
}

#[cfg(unix)]
#[test]
fn test_end_to_end_with_stand_in_tools() {
    let source = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("help.h");
    let scratch = work.path().join(".tmp_help");
    write_default_sources(source.path());

    let renderer = write_script(work.path(), "fake-sphinx-build", FAKE_RENDERER);
    let dumper = write_script(work.path(), "fake-elinks", FAKE_DUMPER);

    for _ in 0..2 {
        helpgen()
            .arg(source.path())
            .arg(&output)
            .arg("--scratch-dir")
            .arg(&scratch)
            .arg("--sphinx-build")
            .arg(&renderer)
            .arg("--dumper")
            .arg(&dumper)
            .arg("--quiet")
            .assert()
            .success();
    }

    let content = fs::read_to_string(&output).unwrap();
    let expected = concat!(
        "/* This file was automatically generated from RST docs */ \n\n",
        "#define HELP_SADDLESUM \"\" \\\n",
        "\"SYNOPSIS\\n\" \\\n",
        "\"\\n\" \\\n",
        "\"   saddlesum [options] <weights_file> <term_db>\\n\" \\\n",
        "\"\\n\" \n\n\n",
        "#define HELP_SHOW_ETD \"\" \\\n",
        "\"SYNOPSIS\\n\" \\\n",
        "\"\\n\" \\\n",
        "\"   saddlesum-show-etd [options] <etd_file>\\n\" \\\n",
        "\"\\n\" \n\n\n",
    );
    assert_eq!(content, expected);
    assert!(!content.contains("Rendered page"));
    assert!(!scratch.exists());
}

#[cfg(unix)]
#[test]
fn test_json_report() {
    let source = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("help.h");
    write_default_sources(source.path());

    let renderer = write_script(work.path(), "fake-sphinx-build", FAKE_RENDERER);
    let dumper = write_script(work.path(), "fake-elinks", FAKE_DUMPER);

    let assert = helpgen()
        .arg(source.path())
        .arg(&output)
        .arg("--sphinx-build")
        .arg(&renderer)
        .arg("--dumper")
        .arg(&dumper)
        .arg("--output-format")
        .arg("json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["topics"][0]["macro_name"], "HELP_SADDLESUM");
    assert_eq!(report["topics"][0]["lines"], 3);
    assert_eq!(report["topics"][1]["macro_name"], "HELP_SHOW_ETD");
}

#[cfg(unix)]
#[test]
fn test_failing_dumper() {
    let source = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("help.h");
    let scratch = work.path().join(".tmp_help");
    fs::write(&output, "previous").unwrap();
    write_default_sources(source.path());

    let renderer = write_script(work.path(), "fake-sphinx-build", FAKE_RENDERER);
    let dumper = write_script(work.path(), "broken-elinks", "#!/bin/sh\necho boom >&2\nexit 1\n");

    helpgen()
        .arg(source.path())
        .arg(&output)
        .arg("--scratch-dir")
        .arg(&scratch)
        .arg("--sphinx-build")
        .arg(&renderer)
        .arg("--dumper")
        .arg(&dumper)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("HELP_SADDLESUM"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    assert!(!scratch.exists());
}

#[test]
fn test_scratch_dir_holding_user_files_is_refused() {
    let source = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let output = work.path().join("help.h");
    fs::write(work.path().join("notes.txt"), "keep me").unwrap();
    write_default_sources(source.path());

    helpgen()
        .arg(source.path())
        .arg(&output)
        .arg("--scratch-dir")
        .arg(work.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Scratch directory"));

    assert_eq!(fs::read_to_string(work.path().join("notes.txt")).unwrap(), "keep me");
    assert!(source.path().join("saddlesum-cli.rst").is_file());
    assert!(!output.exists());
}
