use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IbanError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IBAN format error: {message}")]
    Format { message: String },

    #[error("unknown country code: {code}")]
    UnknownCountryCode { code: String },

    #[error("BBAN validation failed: {message}")]
    BbanValidation { message: String },

    #[error("invalid checksum for IBAN {iban}: {detail}")]
    InvalidChecksum { iban: String, detail: String },
}

impl IbanError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        IbanError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        IbanError::Format {
            message: message.into(),
        }
    }

    pub fn unknown_country(code: impl Into<String>) -> Self {
        IbanError::UnknownCountryCode { code: code.into() }
    }

    pub fn bban(message: impl Into<String>) -> Self {
        IbanError::BbanValidation {
            message: message.into(),
        }
    }

    pub fn checksum(iban: impl Into<String>, detail: impl Into<String>) -> Self {
        IbanError::InvalidChecksum {
            iban: iban.into(),
            detail: detail.into(),
        }
    }

    /// Stable label used in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            IbanError::InvalidArgument { .. } => "invalid_argument",
            IbanError::Format { .. } => "format",
            IbanError::UnknownCountryCode { .. } => "unknown_country_code",
            IbanError::BbanValidation { .. } => "bban_validation",
            IbanError::InvalidChecksum { .. } => "invalid_checksum",
        }
    }
}

pub type Result<T> = std::result::Result<T, IbanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = IbanError::unknown_country("ZZ");
        assert_eq!(err.to_string(), "unknown country code: ZZ");
        assert_eq!(err.kind(), "unknown_country_code");

        let err = IbanError::checksum("DE17500105175407324931", "remainder 3, expected 1");
        assert!(err.to_string().contains("DE17500105175407324931"));
        assert!(err.to_string().contains("remainder 3"));
    }
}
