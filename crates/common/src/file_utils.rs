use crate::IDENTIFIER_LENGTH;

/// Error type for identifier validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierValidationError {
    Empty,
    WrongLength(usize),
    ContainsPathSeparator,
    ContainsInvalidCharacters,
}

impl IdentifierValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            IdentifierValidationError::Empty => "Identifier cannot be empty",
            IdentifierValidationError::WrongLength(_) => {
                "Identifier must be exactly 8 characters long"
            }
            IdentifierValidationError::ContainsPathSeparator => {
                "Identifier cannot contain path separators (/ or \\)"
            }
            IdentifierValidationError::ContainsInvalidCharacters => {
                "Identifier may only contain ASCII letters and digits"
            }
        }
    }
}

impl std::fmt::Display for IdentifierValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for IdentifierValidationError {}

/// Validate a file identifier before it is joined onto the upload root.
/// Only names the identifier generator could have produced are accepted, so
/// hidden temp files and anything else in the upload root stay unreachable.
pub fn validate_identifier(identifier: &str) -> Result<(), IdentifierValidationError> {
    if identifier.is_empty() {
        return Err(IdentifierValidationError::Empty);
    }

    if identifier.contains('/') || identifier.contains('\\') {
        return Err(IdentifierValidationError::ContainsPathSeparator);
    }

    if !identifier.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(IdentifierValidationError::ContainsInvalidCharacters);
    }

    if identifier.len() != IDENTIFIER_LENGTH {
        return Err(IdentifierValidationError::WrongLength(identifier.len()));
    }

    Ok(())
}
