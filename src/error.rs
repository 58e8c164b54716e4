//! Definition of the crate's error and result.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// The library's error enum
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// IO Error.
    #[error("An IO error occurred: '{0}'")]
    IoError(Arc<io::Error>),
    /// Invalid argument was passed by the user.
    #[error("An invalid argument was passed: '{0}'")]
    InvalidArgument(String),
    /// An Error occurred in one of the threads.
    #[error("An error occurred in a thread: '{0}'")]
    ErrorInThread(String),
    /// An internal error occurred. This is are internal states that should not be reached.
    /// e.g. a datastructure is incorrectly inititalized.
    #[error("Internal error: '{0}'")]
    InternalError(String),
    /// System error. (e.g.: We failed spawning a new thread).
    #[error("System error.'{0}'")]
    SystemError(String),
}

impl From<io::Error> for QueryError {
    fn from(io_err: io::Error) -> QueryError {
        QueryError::IoError(Arc::new(io_err))
    }
}

impl From<rayon::ThreadPoolBuildError> for QueryError {
    fn from(error: rayon::ThreadPoolBuildError) -> QueryError {
        QueryError::SystemError(error.to_string())
    }
}

pub(crate) fn does_not_match(doc: crate::DocId) -> QueryError {
    QueryError::InvalidArgument(format!("Document #({doc}) does not match"))
}
