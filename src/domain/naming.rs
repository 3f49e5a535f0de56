use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::EndpointRole;

const CAPTURE_SUFFIX: &str = "_src.stream";

/// Milliseconds since the unix epoch, saturating to zero for clocks set before it.
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// `<millis><role>_src.stream`
pub fn session_file_name(millis: u128, src_role: &EndpointRole) -> String {
    format!("{}{}{}", millis, src_role.as_str(), CAPTURE_SUFFIX)
}

pub fn session_file_path(dir: &Path, millis: u128, src_role: &EndpointRole) -> PathBuf {
    dir.join(session_file_name(millis, src_role))
}
