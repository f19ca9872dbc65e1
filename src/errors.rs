//! Error Types
//!
//! This module defines the error types used throughout the viewer core.
//!
//! # Overview
//!
//! The main error type [`ViewerError`] covers all failure modes including:
//! - OBJ/MTL parsing and index resolution errors
//! - Scene description and scene graph errors
//! - Collaborator failures (file I/O, image decoding, shader compilation)
//!
//! Every error is fatal to the operation that raised it. A failed model or
//! scene load propagates to the caller and leaves the live scene untouched.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, ViewerError>`.
//!
//! ```rust,ignore
//! use snowglobe::errors::{ViewerError, Result};
//!
//! fn load_model() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the viewer core.
#[derive(Error, Debug)]
pub enum ViewerError {
    // ========================================================================
    // Model Parsing Errors
    // ========================================================================
    /// A face record declared a vertex count other than 3 or 4.
    #[error("Malformed face on line {line}: {count} vertices (expected 3 or 4)")]
    MalformedFace { line: usize, count: usize },

    /// The position/normal/uv index streams disagree in length.
    #[error("Index stream length mismatch: {positions} positions, {normals} normals, {uvs} uvs")]
    IndexCountMismatch {
        positions: usize,
        normals: usize,
        uvs: usize,
    },

    /// A textured material was used by a model without any `vt` records.
    #[error("Material '{material}' is textured but the model defines no texture coordinates")]
    MissingTexCoords { material: String },

    /// A face referenced a vertex attribute that was never declared.
    #[error("{kind} index {index} out of range (only {len} declared)")]
    IndexOutOfRange {
        kind: &'static str,
        index: i64,
        len: usize,
    },

    /// A face used index 0 or a relative (negative) index.
    #[error("{kind} index {index} on line {line} must be a positive 1-based index")]
    NonPositiveIndex {
        kind: &'static str,
        index: i64,
        line: usize,
    },

    /// A numeric token could not be parsed.
    #[error("Invalid number '{token}' on line {line}")]
    InvalidNumber { line: usize, token: String },

    // ========================================================================
    // Scene Errors
    // ========================================================================
    /// A light description used an unrecognized `type`.
    #[error("Unknown light type: {0}")]
    UnknownLightType(String),

    /// Name lookup found no matching node.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A scene node referenced a model that was not declared.
    #[error("Model not declared in scene: {0}")]
    MissingModel(String),

    /// A scene node referenced a light that was not declared.
    #[error("Light not declared in scene: {0}")]
    MissingLight(String),

    /// A model or light node omitted its `content` reference.
    #[error("Node '{0}' has no content reference")]
    MissingContent(String),

    /// A color was neither `#rrggbb` nor a 3-element array.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A transformation description had the wrong arity.
    #[error("Invalid transformation: {0}")]
    InvalidTransform(String),

    /// A node handle no longer refers to a live node.
    #[error("Invalid node handle")]
    InvalidHandle,

    /// No scene has been loaded yet.
    #[error("No active scene")]
    NoActiveScene,

    // ========================================================================
    // Collaborator Errors
    // ========================================================================
    /// The rendering backend rejected a shader program.
    #[error("Shader compilation failed: {0}")]
    ShaderCompile(String),

    /// Texture image data could not be used (mismatched cube faces, ...).
    #[error("Invalid texture: {0}")]
    InvalidTexture(String),

    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Asset bytes were not valid UTF-8 text.
    #[error("Invalid UTF-8 in asset: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// JSON parsing error (scene descriptions and config).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding error.
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),
}

/// Alias for `Result<T, ViewerError>`.
pub type Result<T> = std::result::Result<T, ViewerError>;
