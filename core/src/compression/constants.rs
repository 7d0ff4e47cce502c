//! compression/constants.rs
//! Stable method IDs, extract versions and codec tuning bounds.

/// ZIP method identifiers (APPNOTE 4.4.5), mirrored in `CompressionMethod`.
pub mod method_ids {
    pub const STORE: u16     = 0x0000;
    pub const DEFLATE: u16   = 0x0008;
    pub const DEFLATE64: u16 = 0x0009;
    pub const BZIP2: u16     = 0x000C;
}

/// Minimum version needed to extract (major * 10 + minor).
///
/// Set per method from APPNOTE 4.4.3 instead of one shared value for every
/// non-store codec, so Deflate64 and BZip2 entries advertise 2.1 and 4.6.
pub mod extract_versions {
    pub const STORE: u8     = 10;
    pub const DEFLATE: u8   = 20;
    pub const DEFLATE64: u8 = 21;
    pub const BZIP2: u8     = 46;
}

/// Deflate tuning bounds.
pub const DEFLATE_MIN_PASSES: u32 = 1;
pub const DEFLATE_MAX_PASSES: u32 = 15;
pub const DEFLATE_MIN_FAST_BYTES: u32 = 3;
pub const DEFLATE_MAX_FAST_BYTES: u32 = 258;

/// BZip2 block unit (bytes per "level").
pub const BZIP2_BLOCK_UNIT: u32 = 100_000;
pub const BZIP2_MAX_LEVEL: u32 = 9;
