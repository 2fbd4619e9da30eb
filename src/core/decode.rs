//! Raw payload decoding.
//!
//! Each characteristic notification carries a single IEEE-754 single-precision
//! float in the first four payload bytes, little-endian as emitted by the
//! sensor firmware. Trailing bytes are ignored.

/// Width of one encoded sample on the wire.
pub const SAMPLE_WIDTH: usize = 4;

/// Errors from payload decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload shorter than one encoded sample.
    TooShort {
        /// Number of bytes actually supplied.
        len: usize,
    },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::TooShort { len } => {
                write!(f, "Payload too short: {len} bytes, need {SAMPLE_WIDTH}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode the leading four bytes of a payload as a little-endian f32.
pub fn decode_sample(payload: &[u8]) -> Result<f32, DecodeError> {
    let bytes: [u8; SAMPLE_WIDTH] = payload
        .get(..SAMPLE_WIDTH)
        .and_then(|b| b.try_into().ok())
        .ok_or(DecodeError::TooShort { len: payload.len() })?;
    Ok(f32::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for value in [0.0f32, -1.5, 2.25, 160.0, f32::MAX, f32::MIN_POSITIVE] {
            let bytes = value.to_le_bytes();
            assert_eq!(decode_sample(&bytes), Ok(value));
        }
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut payload = 0.5f32.to_le_bytes().to_vec();
        payload.extend_from_slice(&[0xAA, 0xBB]);
        assert_eq!(decode_sample(&payload), Ok(0.5));
    }

    #[test]
    fn test_short_payload_rejected() {
        assert_eq!(decode_sample(&[]), Err(DecodeError::TooShort { len: 0 }));
        assert_eq!(
            decode_sample(&[1, 2, 3]),
            Err(DecodeError::TooShort { len: 3 })
        );
    }

    #[test]
    fn test_negative_decodes_signed() {
        let bytes = (-0.75f32).to_le_bytes();
        assert_eq!(decode_sample(&bytes), Ok(-0.75));
    }
}
