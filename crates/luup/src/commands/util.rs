//! Shared helpers for command handlers.

use std::path::Path;

use luup_api::{ParamValue, Params};

use crate::error::CliError;

/// Print a response body verbatim, ending with exactly one newline.
pub fn print_body(body: &str) {
    if body.ends_with('\n') {
        print!("{body}");
    } else {
        println!("{body}");
    }
}

pub fn extra_params(pairs: Vec<(String, String)>) -> Params {
    pairs.into_iter().collect()
}

pub fn room_param(room: Option<String>) -> Option<ParamValue> {
    room.map(ParamValue::from)
}

/// Read an argument's value from a file.
pub fn read_arg_file(field: &str, path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("cannot read {}: {e}", path.display()),
    })
}

/// `@path` reads the value from a file; anything else is taken literally.
pub fn literal_or_file(field: &str, raw: String) -> Result<String, CliError> {
    match raw.strip_prefix('@') {
        Some(path) => read_arg_file(field, Path::new(path)),
        None => Ok(raw),
    }
}
