use thiserror::Error;

/// Failure modes of the input buffer constructors and the parser.
///
/// Every variant carries the byte offset of the failure site (where one
/// exists) so a caller can point a user at the exact spot in the source
/// text, mirroring the `(kind, offset)` pair the parser is specified to
/// report rather than logging on its own behalf.
#[derive(Error, Debug)]
pub enum CssError {
    #[error("input is {len} bytes, exceeding the {max}-byte limit")]
    InputTooLarge { len: usize, max: usize },

    #[error("failed to read input stream: {0}")]
    Io(#[from] std::io::Error),

    #[error("allocation failed while building the input buffer or key table")]
    OutOfMemory,

    #[error("unexpected character at offset {offset}")]
    UnexpectedChar { offset: usize },

    #[error("token exceeds the 255-byte length cap at offset {offset}")]
    TokenTooLong { offset: usize },

    #[error("key table capacity of 4095 entries exceeded")]
    TooManyKeys,

    #[error("expected ':' at offset {offset}")]
    ExpectedColon { offset: usize },

    #[error("expected ';' at offset {offset}")]
    ExpectedSemicolon { offset: usize },

    #[error("expected '{{' at offset {offset}")]
    ExpectedBraceOpen { offset: usize },

    #[error("expected '}}' at offset {offset}")]
    ExpectedBraceClose { offset: usize },

    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("unterminated block starting at offset {offset}")]
    UnterminatedBlock { offset: usize },
}
