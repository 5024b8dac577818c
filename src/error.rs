//! Error types for scene lifecycle, physics ownership and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`SceneStrategy::initialize`](crate::scene::SceneStrategy::initialize)
/// and [`SceneStrategy::cleanup`](crate::scene::SceneStrategy::cleanup).
///
/// None of these are fatal: the scene manager logs them and keeps navigating.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("asset not found: {}", .0.display())]
    AssetMissing(PathBuf),
    #[error("asset {} is not a valid model: {reason}", .path.display())]
    AssetInvalid { path: PathBuf, reason: String },
    #[error("physics: {0}")]
    Physics(#[from] PhysicsError),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised while tearing down or querying a [`PhysicsWorld`](crate::physics::PhysicsWorld).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("{0} rigid bodies are still registered with the physics world")]
    LiveBodies(usize),
    #[error("rigid body handle does not belong to this physics world")]
    UnknownBody,
}

/// Errors that can occur while loading the sandbox configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
