#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use plugin_worker::build;
use plugin_worker::config::BuildConfig;
use plugin_worker::error::BuildError;

fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();

    let mut permissions = std::fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&path, permissions).unwrap();
}

#[tokio::test]
async fn build_installs_the_output_directory() {
    let source = tempfile::tempdir().unwrap();
    let install = tempfile::tempdir().unwrap();
    write_script(
        source.path(),
        "build",
        "#!/bin/sh\nmkdir -p out\necho artifact > out/plugin.bin\n",
    );

    build::build(source.path(), install.path(), &BuildConfig::default())
        .await
        .unwrap();

    assert!(install.path().join("out").join("plugin.bin").exists());
    assert!(!source.path().join("out").exists());
}

#[tokio::test]
async fn a_failed_build_skips_the_install() {
    let source = tempfile::tempdir().unwrap();
    let install = tempfile::tempdir().unwrap();
    write_script(source.path(), "build", "#!/bin/sh\nmkdir -p out\nexit 3\n");

    let error = build::build(source.path(), install.path(), &BuildConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(error, BuildError::ScriptFailed(_)));
    // The produced directory stays where the script left it.
    assert!(source.path().join("out").exists());
    assert!(!install.path().join("out").exists());
}

#[tokio::test]
async fn a_missing_build_script_is_a_spawn_error() {
    let source = tempfile::tempdir().unwrap();
    let install = tempfile::tempdir().unwrap();

    let error = build::build(source.path(), install.path(), &BuildConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(error, BuildError::Spawn { .. }));
}

#[tokio::test]
async fn a_build_that_produces_no_output_fails_the_relocation() {
    let source = tempfile::tempdir().unwrap();
    let install = tempfile::tempdir().unwrap();
    write_script(source.path(), "build", "#!/bin/sh\nexit 0\n");

    let error = build::build(source.path(), install.path(), &BuildConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(error, BuildError::Relocate { .. }));
}

#[tokio::test]
async fn a_custom_script_name_is_honored() {
    let source = tempfile::tempdir().unwrap();
    let install = tempfile::tempdir().unwrap();
    write_script(
        source.path(),
        "compile.sh",
        "#!/bin/sh\nmkdir -p dist\ntouch dist/plugin.bin\n",
    );

    let config = BuildConfig {
        script: "compile.sh".to_string(),
        output_dir: "dist".to_string(),
    };

    build::build(source.path(), install.path(), &config)
        .await
        .unwrap();

    assert!(install.path().join("dist").join("plugin.bin").exists());
}
