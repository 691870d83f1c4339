//! Rendering of evaluation results for front-ends

mod json;

pub use json::{to_json, to_json_string};
