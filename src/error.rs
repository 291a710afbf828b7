use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// A failure while reading or decoding request lines. Fatal: the worker
/// drains pending results and exits non-zero.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("failed to read request line: {0}")]
    Read(io::Error),

    #[error("malformed request envelope: {0}")]
    Decode(serde_json::Error),
}

/// A per-request failure. Recovered into an error response on the result
/// channel; never crashes the worker or other in-flight requests.
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("method {0:?} is not registered")]
    MethodNotFound(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("failed to run build script {script}: {source}")]
    Spawn { script: PathBuf, source: io::Error },

    #[error("build script exited with {0}")]
    ScriptFailed(ExitStatus),

    #[error("failed to move build output to {dest}: {source}")]
    Relocate { dest: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, WorkerError>;
