use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidIso2 { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => {
                write!(f, "invalid E.164 phone number: {input}")
            }
            Self::InvalidIso2 { input } => {
                write!(f, "ISO2 code must be exactly two letters: {input}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "Body" };
        assert_eq!(err.to_string(), "Body must not be empty");

        let err = ValidationError::InvalidPhoneNumber {
            input: "12345".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid E.164 phone number: 12345");

        let err = ValidationError::InvalidIso2 {
            input: "DEU".to_owned(),
        };
        assert_eq!(err.to_string(), "ISO2 code must be exactly two letters: DEU");
    }
}
