//! Error types
//!
//! Only setup can fail. Once a field is running, nothing it does returns
//! an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackdropError {
    /// A required DOM element is missing
    #[error("element {0} not found")]
    MissingElement(String),

    /// The element exists but is not a `<canvas>`
    #[error("element {0} is not a canvas")]
    NotACanvas(String),

    /// The canvas refused to hand out a 2D rendering context
    #[error("canvas has no 2d rendering context")]
    NoContext2d,

    /// Options text that is not JSON at all
    #[error("malformed options JSON: {0}")]
    Json(#[from] serde_json::Error),
}
