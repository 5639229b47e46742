/// Errors that fail a single conversion. There is never partial output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("{file}:{line}:{column}: {message}")]
    Syntax {
        file: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("File can have only 1 define call.")]
    MultipleDefines,

    #[error("define call has neither a factory function nor a value")]
    MissingFactory,

    #[error("cannot resolve `{id}`: {reason}")]
    Resolution { id: String, reason: String },
}
