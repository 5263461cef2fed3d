//! Base64 codec with a hand-rolled fallback.
//!
//! The preferred engine is the [`base64`] crate, selected by the default
//! `native-b64` feature. The manual implementation exists for hosts where the
//! crate cannot be reached and is compiled into every build regardless: the
//! native decoder rejects malformed text, and callers of this module expect
//! the historical lenient behavior instead -- bytes out, never an error. On a
//! native build, decode failures therefore fall through to the manual path.
//!
//! Leniency contract (deliberate, see DESIGN.md): characters outside the
//! standard alphabet decode as zero sextets, `=` terminates decoding, absent
//! padding is tolerated, and a trailing partial group is dropped.

/// Standard base64 alphabet (`A-Z a-z 0-9 + /`).
const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encodes bytes as standard base64 with `=` padding.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    #[cfg(feature = "native-b64")]
    {
        use base64::Engine as _;
        native::ENGINE.encode(bytes)
    }
    #[cfg(not(feature = "native-b64"))]
    {
        fallback::encode(bytes)
    }
}

/// Decodes base64 text into bytes, leniently.
///
/// Malformed input produces best-effort garbage bytes rather than an error;
/// both ends of every payload are controlled by this crate, so the only
/// malformed inputs in practice are corrupted blobs that fail authentication
/// one layer up anyway.
#[must_use]
pub fn decode(input: &str) -> Vec<u8> {
    #[cfg(feature = "native-b64")]
    {
        use base64::Engine as _;
        native::ENGINE
            .decode(input)
            .unwrap_or_else(|_| fallback::decode(input))
    }
    #[cfg(not(feature = "native-b64"))]
    {
        fallback::decode(input)
    }
}

#[cfg(feature = "native-b64")]
mod native {
    use base64::alphabet;
    use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

    /// Standard alphabet, padding on encode, indifferent padding on decode.
    pub(super) const ENGINE: GeneralPurpose = GeneralPurpose::new(
        &alphabet::STANDARD,
        GeneralPurposeConfig::new()
            .with_decode_padding_mode(DecodePaddingMode::Indifferent),
    );
}

pub(crate) mod fallback {
    use super::ALPHABET;

    const fn decode_table() -> [u8; 256] {
        let mut table = [0u8; 256];
        let mut i = 0;
        while i < 64 {
            table[ALPHABET[i] as usize] = i as u8;
            i += 1;
        }
        table
    }

    /// Sextet lookup. Characters outside the alphabet map to zero.
    const DECODE: [u8; 256] = decode_table();

    // On native builds the encoder is only exercised by tests.
    #[cfg_attr(feature = "native-b64", allow(dead_code))]
    pub(crate) fn encode(bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
        for chunk in bytes.chunks(3) {
            let b1 = chunk.get(1).copied();
            let b2 = chunk.get(2).copied();
            let group = (u32::from(chunk[0]) << 16)
                | (u32::from(b1.unwrap_or(0)) << 8)
                | u32::from(b2.unwrap_or(0));
            out.push(char::from(ALPHABET[(group >> 18) as usize & 63]));
            out.push(char::from(ALPHABET[(group >> 12) as usize & 63]));
            out.push(if b1.is_some() {
                char::from(ALPHABET[(group >> 6) as usize & 63])
            } else {
                '='
            });
            out.push(if b2.is_some() {
                char::from(ALPHABET[group as usize & 63])
            } else {
                '='
            });
        }
        out
    }

    pub(crate) fn decode(input: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(input.len() / 4 * 3);
        let mut acc: u32 = 0;
        let mut bits: u32 = 0;
        for byte in input.bytes() {
            if byte == b'=' {
                break;
            }
            acc = (acc << 6) | u32::from(DECODE[usize::from(byte)]);
            bits += 6;
            if bits >= 8 {
                bits -= 8;
                out.push((acc >> bits) as u8);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let cases: &[&[u8]] = &[
            b"",
            b"f",
            b"fo",
            b"foo",
            b"foob",
            b"fooba",
            b"foobar",
            &[0x00, 0xFF, 0x10, 0x80, 0x7F],
        ];
        for case in cases {
            assert_eq!(decode(&encode(case)), *case);
        }
    }

    #[test]
    fn fallback_matches_native_engine() {
        use base64::Engine as _;
        let engine = base64::engine::general_purpose::STANDARD;
        let cases: &[&[u8]] = &[b"", b"a", b"ab", b"abc", b"hello world", &[0, 1, 2, 250, 251, 252]];
        for case in cases {
            let manual = fallback::encode(case);
            assert_eq!(manual, engine.encode(case));
            assert_eq!(fallback::decode(&manual), *case);
        }
    }

    #[test]
    fn decode_tolerates_missing_padding() {
        assert_eq!(decode("Zm9vYg"), b"foob");
        assert_eq!(fallback::decode("Zm9vYg"), b"foob");
    }

    #[test]
    fn decode_is_lenient_on_garbage() {
        // Invalid characters decode as zero sextets; no panic, no error.
        assert_eq!(fallback::decode("####"), vec![0, 0, 0]);
        // A trailing partial group is dropped.
        assert_eq!(fallback::decode("Z"), Vec::<u8>::new());
        // The public decode never errors either.
        let _garbage = decode("!!not base64!!");
    }
}
