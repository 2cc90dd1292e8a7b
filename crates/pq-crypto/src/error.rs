use thiserror::Error;

/// Errors from the post-quantum and classical primitive façade.
#[derive(Debug, Error)]
pub enum PqError {
    #[error("key error: {0}")]
    KeyError(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_key_error() {
        let err = PqError::KeyError("malformed secret key".into());
        assert_eq!(err.to_string(), "key error: malformed secret key");
    }

    #[test]
    fn display_invalid_input() {
        let err = PqError::InvalidInput("wrong seed length".into());
        assert_eq!(err.to_string(), "invalid input: wrong seed length");
    }
}
