use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("State store `{state}` is gone, event dropped")]
    StoreClosed { state: &'static str },
}

impl Error {
    pub fn store_closed(state: &'static str) -> Self {
        Self::StoreClosed { state }
    }
}
