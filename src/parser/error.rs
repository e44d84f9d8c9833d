//! Error type for catalog decoding

/// Error type for parsing operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Failed to parse the file structure
    #[error("Failed to parse file: {0}")]
    ParseFailed(String),

    /// Invalid syntax in the file (1-based position)
    #[error("Invalid syntax at line {line}, column {column}")]
    InvalidSyntax { line: usize, column: usize },

    /// Tree-sitter related error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    /// The same table header appears twice
    #[error("table [{0}] is declared more than once")]
    DuplicateTable(String),

    /// The same key appears twice in one table
    #[error("key '{key}' is declared more than once in [{table}]")]
    DuplicateKey { table: String, key: String },
}
