//! Storage constants

/// Default file name of the anchor store
pub const DEFAULT_STORE_FILE_NAME: &str = "anchors.adb";

/// Number of components in a stored orientation quaternion
pub const QUATERNION_LEN: usize = 4;
