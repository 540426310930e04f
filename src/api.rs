//! API version compatibility.

use crate::{ReevError, Result};

/// API version implemented by this service.
pub const API_VERSION: &str = "v1";

/// Check that the API version requested by a client is supported.
///
/// An empty version means "use whatever the service implements" and
/// always passes.
pub fn check_api(requested: &str) -> Result<()> {
    if !requested.is_empty() && requested != API_VERSION {
        return Err(ReevError::UnsupportedApi {
            expected: API_VERSION,
            requested: requested.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn empty_version_passes() {
        assert!(check_api("").is_ok());
    }

    #[test]
    fn current_version_passes() {
        assert!(check_api("v1").is_ok());
    }

    #[test]
    fn other_version_is_unimplemented() {
        let err = check_api("v2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unimplemented);
        let msg = err.to_string();
        assert!(msg.contains("'v1'"), "should name expected version: {msg}");
        assert!(msg.contains("'v2'"), "should name requested version: {msg}");
    }

    #[test]
    fn comparison_is_exact() {
        assert!(check_api("V1").is_err());
        assert!(check_api(" v1").is_err());
    }
}
