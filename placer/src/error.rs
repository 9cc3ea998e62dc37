use std::io;

use thiserror::Error;

/// An injector could not deliver a command.
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Custom(String),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to deliver command {index} `{command}`")]
    Inject {
        /// 1-based position in the dispatch order.
        index: usize,
        command: String,
        #[source]
        source: InjectError,
    },
}
