/// Errors raised while loading, validating, or reading the grant catalog.
///
/// `SchemaViolation` and `Parse` are fatal at load time. `OutOfRange` is
/// surfaced to the caller of an index lookup and is recoverable.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("schema violation in record {index}{}: {message}", program_label(.program))]
    SchemaViolation {
        index: usize,
        program: Option<String>,
        message: String,
    },

    #[error("index {index} out of range (catalog holds {len} records)")]
    OutOfRange { index: usize, len: usize },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("no text provided")]
    EmptyInput,

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn schema(index: usize, program: Option<&str>, message: impl Into<String>) -> Self {
        StoreError::SchemaViolation {
            index,
            program: program.map(str::to_string),
            message: message.into(),
        }
    }
}

fn program_label(program: &Option<String>) -> String {
    match program {
        Some(name) => format!(" ({name})"),
        None => String::new(),
    }
}
