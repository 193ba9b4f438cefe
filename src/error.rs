use axum::response::{IntoResponse, Response};
use axum::Json;
use hyper::StatusCode;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq)]
pub enum Error {
    #[error("cannot open source file")]
    OpenSource,
    #[error("cannot append entry to archive")]
    AppendEntry,
    #[error("cannot write archive's completion data")]
    FinalizeArchive,
    #[error("archive pipe closed unexpectedly")]
    PipeBroken,
    #[error("cannot write to response body")]
    ResponseWrite,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        use Error::*;
        match self {
            OpenSource => StatusCode::INTERNAL_SERVER_ERROR,
            AppendEntry => StatusCode::INTERNAL_SERVER_ERROR,
            FinalizeArchive => StatusCode::INTERNAL_SERVER_ERROR,
            PipeBroken => StatusCode::INTERNAL_SERVER_ERROR,
            ResponseWrite => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Error", 1)?;
        state.serialize_field("error", &self.to_string())?;
        state.end()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

pub mod archive {
    pub use super::Error::{AppendEntry, FinalizeArchive, OpenSource, PipeBroken, ResponseWrite};
}
