//! Charset detection for raw input bytes, and the reverse trip for printing.
//!
//! Input is UTF-8, optionally with a byte-order mark. Bytes that are not
//! valid UTF-8 are read as ISO-8859-1, which maps every byte to one char and
//! so can always be written back unchanged.

use crate::diagnostics::TomlError;
use crate::err_msg;

pub const UTF_8: &str = "UTF-8";
pub const ISO_8859_1: &str = "ISO-8859-1";

const UTF_8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decoded text plus what is needed to reproduce the original bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSource {
    pub text: String,
    pub charset_name: String,
    pub bom_marked: bool,
}

impl EncodedSource {
    pub fn decode(bytes: &[u8]) -> Self {
        let (body, bom_marked) = match bytes.strip_prefix(UTF_8_BOM) {
            Some(body) => (body, true),
            None => (bytes, false),
        };
        match std::str::from_utf8(body) {
            Ok(text) => Self {
                text: text.to_string(),
                charset_name: UTF_8.to_string(),
                bom_marked,
            },
            Err(_) => Self {
                text: bytes.iter().map(|&b| char::from(b)).collect(),
                charset_name: ISO_8859_1.to_string(),
                bom_marked: false,
            },
        }
    }

    /// Text that is already decoded. A leading U+FEFF is taken as a BOM.
    pub fn from_text(text: &str) -> Self {
        let (text, bom_marked) = match text.strip_prefix('\u{FEFF}') {
            Some(rest) => (rest, true),
            None => (text, false),
        };
        Self {
            text: text.to_string(),
            charset_name: UTF_8.to_string(),
            bom_marked,
        }
    }
}

/// Encodes printed text back into the charset it was read with.
pub fn encode(text: &str, charset_name: &str, bom_marked: bool) -> Result<Vec<u8>, TomlError> {
    match charset_name {
        UTF_8 => {
            let mut bytes = Vec::with_capacity(text.len() + UTF_8_BOM.len());
            if bom_marked {
                bytes.extend_from_slice(UTF_8_BOM);
            }
            bytes.extend_from_slice(text.as_bytes());
            Ok(bytes)
        }
        ISO_8859_1 => text
            .chars()
            .map(|c| {
                u8::try_from(u32::from(c)).map_err(|_| {
                    err_msg!(Encoding, "character {:?} has no {} encoding", c, ISO_8859_1)
                })
            })
            .collect(),
        other => Err(err_msg!(Encoding, "unsupported charset `{}`", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;

    #[test]
    fn test_plain_utf8() {
        let decoded = EncodedSource::decode("a = \"é\"\n".as_bytes());
        assert_eq!(decoded.text, "a = \"é\"\n");
        assert_eq!(decoded.charset_name, UTF_8);
        assert!(!decoded.bom_marked);
    }

    #[test]
    fn test_bom_is_stripped_and_restored() {
        let bytes = b"\xEF\xBB\xBFa = 1\n";
        let decoded = EncodedSource::decode(bytes);
        assert_eq!(decoded.text, "a = 1\n");
        assert!(decoded.bom_marked);
        let encoded = encode(&decoded.text, &decoded.charset_name, decoded.bom_marked).unwrap();
        assert_eq!(encoded, bytes);
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin1() {
        let bytes = b"name = \"caf\xE9\"\n";
        let decoded = EncodedSource::decode(bytes);
        assert_eq!(decoded.charset_name, ISO_8859_1);
        assert_eq!(decoded.text, "name = \"café\"\n");
        let encoded = encode(&decoded.text, &decoded.charset_name, false).unwrap();
        assert_eq!(encoded, bytes);
    }

    #[test]
    fn test_from_text_bom() {
        let source = EncodedSource::from_text("\u{FEFF}x = 1");
        assert_eq!(source.text, "x = 1");
        assert!(source.bom_marked);
    }

    #[test]
    fn test_unencodable_latin1() {
        let err = encode("snow = \"☃\"", ISO_8859_1, false).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Encoding);
        let err = encode("x", "UTF-16", false).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Encoding);
    }
}
