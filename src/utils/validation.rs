//! Field validators shared by the form and JSON inputs.

use validator::ValidationError;

/// Rejects values containing `\0`.
///
/// Long URLs are otherwise stored verbatim, but PostgreSQL `TEXT` cannot hold
/// NUL, so such input must fail as a bad request rather than at the store.
pub fn no_nul_bytes(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        return Err(
            ValidationError::new("nul_byte").with_message("URL must not contain NUL bytes".into())
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes() {
        assert!(no_nul_bytes("https://example.com/café?q=1 2").is_ok());
    }

    #[test]
    fn test_nul_is_rejected() {
        let err = no_nul_bytes("https://example.com/\0x").unwrap_err();
        assert_eq!(err.code, "nul_byte");
    }
}
