//! Decoding of packed embedding blobs.
//!
//! The corpus stores each embedding as the hex rendering of its little-endian
//! `f32` bytes, frequently wrapped in the decoration of the storage layer that
//! printed it, e.g. `Optional(x'0000803f…')` or `"0000803f…"`. Decoding
//! strips that wrapper and any whitespace, then reinterprets the bytes as
//! floats.
//!
//! Two lengths are repaired rather than rejected, to stay compatible with how
//! existing corpora were produced:
//!
//! - an odd number of hex digits gets a single `0` prepended, so `"abc"`
//!   decodes exactly like `"0abc"`;
//! - a byte count that is not a multiple of 4 is right-padded with zero bytes.
//!
//! Both repairs are lossy. They reproduce the historical behaviour; they do not
//! recover the vector that was originally intended.

use std::sync::LazyLock;

use byteorder::{ByteOrder, LittleEndian};
use regex::Regex;

use crate::error::{Result, ValluError};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:(?i:optional)\()?(?:[xX]['"]|['"]|[xX])?(?P<hex>.*?)['"]?\)?$"#).unwrap()
});

/// Size in bytes of one IEEE-754 single-precision value.
const F32_WIDTH: usize = 4;

/// Decode an embedding blob, returning `None` when it is unusable.
///
/// An empty blob (after cleaning) and a blob containing non-hex characters
/// both yield `None`; callers skip such records.
///
/// # Examples
///
/// ```
/// use vallu::vector::codec::decode_embedding;
///
/// assert_eq!(decode_embedding("Optional(x'0000803f')"), Some(vec![1.0]));
/// assert_eq!(decode_embedding("Optional(x'')"), None);
/// ```
pub fn decode_embedding(raw: &str) -> Option<Vec<f32>> {
    try_decode_embedding(raw).ok()
}

/// Decode an embedding blob, reporting why it is unusable.
pub fn try_decode_embedding(raw: &str) -> Result<Vec<f32>> {
    let hex = clean_hex(raw);
    if hex.is_empty() {
        return Err(ValluError::decode("hex string is empty after cleaning"));
    }

    let bytes = hex_to_bytes(&hex)?;
    Ok(bytes_to_floats(bytes))
}

/// Encode floats into the bare hex form accepted by [`decode_embedding`].
pub fn encode_embedding(values: &[f32]) -> String {
    let mut bytes = vec![0u8; values.len() * F32_WIDTH];
    LittleEndian::write_f32_into(values, &mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Strip whitespace and storage decoration, leaving only the hex payload.
fn clean_hex(raw: &str) -> String {
    let compact = WHITESPACE.replace_all(raw, "");
    match WRAPPER.captures(&compact) {
        Some(caps) => caps["hex"].to_string(),
        None => compact.into_owned(),
    }
}

fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ValluError::decode(format!(
            "invalid hex character {bad:?} in embedding blob"
        )));
    }

    let padded;
    let digits = if hex.len() % 2 != 0 {
        padded = format!("0{hex}");
        padded.as_str()
    } else {
        hex
    };

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            // Only ASCII hex digits reach this point.
            let pair = std::str::from_utf8(pair)
                .map_err(|e| ValluError::decode(format!("invalid hex pair: {e}")))?;
            u8::from_str_radix(pair, 16)
                .map_err(|e| ValluError::decode(format!("invalid hex pair {pair:?}: {e}")))
        })
        .collect()
}

fn bytes_to_floats(mut bytes: Vec<u8>) -> Vec<f32> {
    let remainder = bytes.len() % F32_WIDTH;
    if remainder != 0 {
        bytes.resize(bytes.len() + F32_WIDTH - remainder, 0);
    }

    let mut floats = vec![0.0f32; bytes.len() / F32_WIDTH];
    LittleEndian::read_f32_into(&bytes, &mut floats);
    floats
}
