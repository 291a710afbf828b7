//! Build-plugin wrapper: runs a plugin's build script and installs the
//! produced output directory.

use std::path::Path;

use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::error::BuildError;

/// Runs the build script inside `source_dir` and, once it succeeds, moves
/// the produced output directory into `install_dir`. A failed build skips
/// the move entirely; a failed move after a successful build propagates
/// as-is (the install is not transactional).
pub async fn build(
    source_dir: &Path,
    install_dir: &Path,
    config: &BuildConfig,
) -> Result<(), BuildError> {
    let script = source_dir.join(&config.script);

    debug!("running build script {}", script.display());
    let status = Command::new(&script)
        .current_dir(source_dir)
        .status()
        .await
        .map_err(|e| BuildError::Spawn {
            script: script.clone(),
            source: e,
        })?;

    if !status.success() {
        return Err(BuildError::ScriptFailed(status));
    }

    let produced = source_dir.join(&config.output_dir);
    let dest = install_dir.join(&config.output_dir);

    info!(
        "installing build output {} -> {}",
        produced.display(),
        dest.display()
    );
    fs::create_dir_all(install_dir)
        .await
        .map_err(|e| BuildError::Relocate {
            dest: dest.clone(),
            source: e,
        })?;
    fs::rename(&produced, &dest)
        .await
        .map_err(|e| BuildError::Relocate { dest, source: e })?;

    Ok(())
}
