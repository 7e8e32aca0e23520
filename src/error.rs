//! Error types for visual secret sharing operations

use thiserror::Error;

use crate::share::ImageMode;

/// Result type alias for visual secret sharing operations
pub type Result<T> = std::result::Result<T, VCError>;

/// Error types for visual secret sharing operations
///
/// Every failure is a local contract violation: the same inputs always
/// produce the same error and nothing is partially written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VCError {
    /// Two images that must share a size do not
    #[error("Dimension mismatch: {first:?} vs {second:?}")]
    DimensionMismatch { first: (u32, u32), second: (u32, u32) },

    /// An expanded share whose sides are not multiples of the 2x2 block
    #[error("Expanded share dimensions must be even, got {width}x{height}")]
    OddDimensions { width: u32, height: u32 },

    /// Unknown reconstruction mode passed to a halftone decode
    #[error("Invalid decryption operation: {0}. Choose 'XOR' or 'OR'")]
    InvalidMode(String),

    /// A numeric scheme parameter outside its accepted range
    #[error("Parameter '{name}' out of range: {value} (expected {min}..={max})")]
    ParameterOutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Insufficient shares to decrypt
    #[error("Insufficient shares: required {required}, provided {provided}")]
    InsufficientShares { required: usize, provided: usize },

    /// Image channel layout differs from what the codec works on
    #[error("Image mode mismatch: expected {expected:?}, found {found:?}")]
    ModeMismatch { expected: ImageMode, found: ImageMode },

    /// No conversion exists between the two channel layouts
    #[error("Cannot convert {from:?} image to {to:?}")]
    UnsupportedConversion { from: ImageMode, to: ImageMode },

    /// Scheme key not present in the registry
    #[error("Unknown scheme: {0}")]
    UnknownScheme(String),
}

/// Fail with [`VCError::DimensionMismatch`] unless both sizes agree
pub(crate) fn ensure_same_dimensions(first: (u32, u32), second: (u32, u32)) -> Result<()> {
    if first != second {
        return Err(VCError::DimensionMismatch { first, second });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_offending_values() {
        let err = VCError::InvalidMode("AND".to_string());
        assert!(err.to_string().contains("AND"));

        let err = VCError::ParameterOutOfRange {
            name: "bitplanes",
            value: 9,
            min: 1,
            max: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("bitplanes"));
        assert!(msg.contains('9'));

        let err = VCError::DimensionMismatch {
            first: (4, 4),
            second: (4, 6),
        };
        assert_eq!(err.to_string(), "Dimension mismatch: (4, 4) vs (4, 6)");
    }

    #[test]
    fn test_ensure_same_dimensions() {
        assert!(ensure_same_dimensions((3, 2), (3, 2)).is_ok());
        assert!(matches!(
            ensure_same_dimensions((3, 2), (2, 3)),
            Err(VCError::DimensionMismatch { .. })
        ));
    }
}
