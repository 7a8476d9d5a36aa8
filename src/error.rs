use thiserror::Error;

/// Errors surfaced by the codec, the signing pipeline and the network
/// client. Codec errors are never transient: a buffer that fails to
/// decode will fail the same way every time, so retry logic belongs to
/// the transport layer alone.
#[derive(Error, Debug)]
pub enum Error {
    /// A field-ID header ended mid-sequence.
    #[error("malformed field id at offset {0}")]
    MalformedFieldId(usize),

    /// A declared length (or fixed width) runs past the end of the buffer.
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    /// A (type code, field code) pair with no registry entry.
    #[error("unknown field: type code {type_code}, field code {field_code}")]
    UnknownField { type_code: u16, field_code: u16 },

    /// A field name with no registry entry.
    #[error("unknown field name: {0}")]
    UnknownFieldName(String),

    /// The same field assigned twice to one writer.
    #[error("duplicate field: {0}")]
    DuplicateField(String),

    /// A field appeared where the decoder expected something else,
    /// e.g. a non-object field inside an array.
    #[error("unexpected field: {0}")]
    UnexpectedField(String),

    /// A mandatory field was absent at serialize time. This is a
    /// programmer error, not a recoverable condition.
    #[error("missing mandatory field {field} on {object}")]
    MissingField {
        object: &'static str,
        field: &'static str,
    },

    /// A value that cannot be represented on the wire, rejected at
    /// construction time of the value.
    #[error("value out of range: {0}")]
    ValueRange(String),

    /// Bad key material or an unsupported key type, reported before
    /// any bytes are transmitted.
    #[error("signing error: {0}")]
    Signing(String),

    /// Malformed base58/hex text form.
    #[error("bad text encoding: {0}")]
    BadEncoding(String),

    /// JSON that does not map onto the object being built.
    #[error("invalid json: {0}")]
    InvalidJson(String),

    /// Network transport failure. Orthogonal to every codec error.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered a request with an error result.
    #[error("server returned error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidJson(e.to_string())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::BadEncoding(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::Transport(e.to_string())
    }
}
