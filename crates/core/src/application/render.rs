// Text rendering for the probe transcript

use crate::error::{AppError, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Closes every exchange
pub const SEPARATOR: &str = "------------------------------";
/// Opens and closes the run
pub const BANNER: &str = "==============================";

const INDENT: &[u8] = b"    ";

/// Pretty-print `value` as JSON with a 4-space indent
///
/// Non-ASCII characters are written literally (serde_json never escapes them).
pub fn pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| AppError::Internal(e.to_string()))
}
