/// Errors from parsing an encoded attribute string.
///
/// Only structurally malformed encodings fail. Unknown flag tokens are
/// skipped, and an unresolvable type name leaves `declared_type` empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The encoding does not start with the `T` type-signature token.
    #[error("expected encoding to start with 'T', found {found:?}")]
    MissingTypeSignature { found: char },

    /// A quoted class name in the type signature has no closing quote.
    #[error("unterminated class name in type signature {signature:?}")]
    UnterminatedTypeName { signature: String },

    /// A flag that requires an inline argument has none.
    #[error("flag '{flag}' requires an argument")]
    UnterminatedToken { flag: char },

    /// The pre-release `t` type encoding, which carries no usable signature.
    #[error("old-style type encoding is unsupported")]
    OldStyleTypeEncoding,
}

/// Result alias for descriptor parsing.
pub type ParseResult<T> = Result<T, ParseError>;
