pub type SatResult<T> = Result<T, SatError>;

#[derive(thiserror::Error, Debug)]
pub enum SatError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("fetch cancelled")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SatError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn invalid_coordinate(msg: impl Into<String>) -> Self {
        Self::InvalidCoordinate(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            SatError::invalid_parameter("x")
                .to_string()
                .contains("invalid parameter:")
        );
        assert!(
            SatError::invalid_coordinate("x")
                .to_string()
                .contains("invalid coordinate:")
        );
        assert!(
            SatError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(SatError::fetch("x").to_string().contains("fetch error:"));
        assert_eq!(SatError::Cancelled.to_string(), "fetch cancelled");
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = SatError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
