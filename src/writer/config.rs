use crate::header::{ARRAY_ALIGN, DEFAULT_HEADER_LEN, PREAMBLE_LEN};

use super::error::WriterError;

/// Configuration for the streaming writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Size of the reserved header dictionary region in bytes.
    /// `PREAMBLE_LEN + header_len` must be a multiple of 64 so the body stays
    /// aligned the way NumPy expects.
    pub header_len: u16,

    /// Capacity of the write buffer in front of the output stream
    pub buffer_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            // 2038 + 10 byte preamble = 2048, room for dozens of dimensions
            header_len: DEFAULT_HEADER_LEN,
            // 64 KiB batches small slices into fewer syscalls
            buffer_capacity: 64 * 1024,
        }
    }
}

impl WriterConfig {
    /// Smallest aligned header region (128 bytes total); enough for a few
    /// dimensions
    pub fn compact() -> Self {
        Self {
            header_len: 118,
            ..Self::default()
        }
    }

    /// Page-sized header region (4096 bytes total) for very high-rank slices
    pub fn wide() -> Self {
        Self {
            header_len: 4086,
            ..Self::default()
        }
    }

    /// Total number of bytes reserved in front of the body
    pub fn header_region_len(&self) -> u64 {
        (PREAMBLE_LEN + usize::from(self.header_len)) as u64
    }

    /// Check that the configuration can produce a valid file
    pub fn validate(&self) -> Result<(), WriterError> {
        if (PREAMBLE_LEN + usize::from(self.header_len)) % ARRAY_ALIGN != 0 {
            return Err(WriterError::InvalidConfig(format!(
                "header_len {} + {} byte preamble is not a multiple of {}",
                self.header_len, PREAMBLE_LEN, ARRAY_ALIGN
            )));
        }
        if self.buffer_capacity == 0 {
            return Err(WriterError::InvalidConfig(
                "buffer_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for config in [
            WriterConfig::default(),
            WriterConfig::compact(),
            WriterConfig::wide(),
        ] {
            config.validate().unwrap();
        }
        assert_eq!(WriterConfig::default().header_region_len(), 2048);
        assert_eq!(WriterConfig::compact().header_region_len(), 128);
        assert_eq!(WriterConfig::wide().header_region_len(), 4096);
    }

    #[test]
    fn test_misaligned_header_rejected() {
        let config = WriterConfig {
            header_len: 100,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WriterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let config = WriterConfig {
            buffer_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
