//! Synchronous XML-RPC client for the OpenSubtitles API.
//!
//! Logs in lazily, caches the session token for the lifetime of the
//! [`http::Client`], and dispatches every API method through a single
//! generic [`http::Client::invoke`] entry point.

pub use crate::responses::*;

pub mod http;
pub mod query;
pub mod responses;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Missing username or password")]
    MissingCredentials,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Fault signaled by the remote service, message and code verbatim.
    #[error("API fault {code}: {message}")]
    Fault { message: String, code: i32 },
    /// The response decoded but carried no `status` member equal to "200 OK".
    #[error("Invalid response status")]
    InvalidResponseStatus,
    #[error("Missing token in LogIn response")]
    MissingToken,
    /// Transport or decode failure from the XML-RPC layer.
    #[error("XML-RPC call failed: {0}")]
    Call(xmlrpc::Error),
}

impl ClientError {
    /// Numeric fault code, present only when the service returned a fault.
    pub fn fault_code(&self) -> Option<i32> {
        match self {
            ClientError::Fault { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<xmlrpc::Error> for ClientError {
    fn from(err: xmlrpc::Error) -> Self {
        if let Some(fault) = err.fault() {
            return ClientError::Fault {
                message: fault.fault_string.clone(),
                code: fault.fault_code,
            };
        }
        ClientError::Call(err)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
