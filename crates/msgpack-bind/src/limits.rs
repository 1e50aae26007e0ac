//! Decode-time guards.

use crate::constants::MAX_LEN;

/// Limits applied while decoding untrusted input.
///
/// Length limits are checked against the decoded length prefix before any
/// buffer is allocated; a prefix over its limit fails with
/// [`DecodeError::LengthOverflow`](crate::DecodeError::LengthOverflow).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_str_len: usize,
    pub max_bin_len: usize,
    pub max_array_len: usize,
    pub max_map_len: usize,
    /// Maximum container nesting. The top-level value is depth 0.
    pub max_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_str_len: MAX_LEN,
            max_bin_len: MAX_LEN,
            max_array_len: MAX_LEN,
            max_map_len: MAX_LEN,
            max_depth: 512,
        }
    }
}

impl DecodeLimits {
    /// Conservative limits for input from the network.
    pub fn strict() -> Self {
        Self {
            max_str_len: 1 << 20,
            max_bin_len: 1 << 20,
            max_array_len: 1 << 16,
            max_map_len: 1 << 16,
            max_depth: 64,
        }
    }

    pub fn with_max_str_len(mut self, len: usize) -> Self {
        self.max_str_len = len;
        self
    }

    pub fn with_max_bin_len(mut self, len: usize) -> Self {
        self.max_bin_len = len;
        self
    }

    pub fn with_max_array_len(mut self, len: usize) -> Self {
        self.max_array_len = len;
        self
    }

    pub fn with_max_map_len(mut self, len: usize) -> Self {
        self.max_map_len = len;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
