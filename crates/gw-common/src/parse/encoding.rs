//! Upload decoding

use crate::GwError;

pub const DEFAULT_ENCODING: &str = "utf-8";

/// Decode raw upload bytes using the named encoding.
///
/// Supports UTF-8 (a leading byte order mark is dropped), Latin-1 and
/// ASCII. Invalid input is an error rather than a lossy replacement.
pub fn decode_upload(bytes: &[u8], encoding: &str) -> Result<String, GwError> {
    let label = encoding.trim().to_lowercase().replace('_', "-");
    match label.as_str() {
        "utf-8" | "utf8" | "utf-8-sig" => {
            let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            String::from_utf8(bytes.to_vec()).map_err(|e| GwError::Decode {
                encoding: label.clone(),
                reason: e.utf8_error().to_string(),
            })
        },
        "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => {
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        },
        "ascii" | "us-ascii" => match bytes.iter().position(|b| !b.is_ascii()) {
            Some(pos) => Err(GwError::Decode {
                encoding: label,
                reason: format!("non-ASCII byte at offset {}", pos),
            }),
            None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        },
        _ => Err(GwError::UnsupportedEncoding(encoding.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_strips_bom() {
        assert_eq!(decode_upload(b"\xEF\xBB\xBF! Binary", "UTF-8").unwrap(), "! Binary");
    }

    #[test]
    fn test_utf8_rejects_invalid_bytes() {
        let err = decode_upload(b"Gene\xE9\t1", "utf-8").unwrap_err();
        assert!(matches!(err, GwError::Decode { .. }));
    }

    #[test]
    fn test_latin1_maps_every_byte() {
        assert_eq!(decode_upload(b"Gene\xE9\t1", "latin-1").unwrap(), "Gene\u{e9}\t1");
    }

    #[test]
    fn test_ascii_and_unknown() {
        assert!(decode_upload(b"\xFF", "ascii").is_err());
        assert!(matches!(
            decode_upload(b"x", "ebcdic"),
            Err(GwError::UnsupportedEncoding(_))
        ));
    }
}
