use thiserror::Error;

/// Failures reported by a [`UserStore`](crate::store::UserStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to convert user into a store item")]
    Marshal(#[source] serde_dynamo::Error),
    #[error("failed to convert store items into users")]
    Unmarshal(#[source] serde_dynamo::Error),
    #[error("store request failed")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn request<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Request(Box::new(err))
    }
}

/// Broad class of a [`UserError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Validation,
    Store,
    Encode,
}

/// Every way a user operation can fail.
///
/// `Display` is the fixed message shown to callers. The wrapped source is
/// for logs only.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("failed to decode request body")]
    Decode(#[source] serde_json::Error),
    #[error("invalid user id")]
    MissingId,
    #[error("failed to get users")]
    Scan(#[source] StoreError),
    #[error("failed to unmarshal users data")]
    Unmarshal(#[source] StoreError),
    #[error("failed to marshal user data")]
    Marshal(#[source] StoreError),
    #[error("failed to create user")]
    Create(#[source] StoreError),
    #[error("failed to update user")]
    Update(#[source] StoreError),
    #[error("failed to delete user")]
    Delete(#[source] StoreError),
    #[error("failed to encode response")]
    Encode(#[source] serde_json::Error),
}

impl UserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::Decode(_) => ErrorKind::Decode,
            UserError::MissingId => ErrorKind::Validation,
            UserError::Scan(_)
            | UserError::Unmarshal(_)
            | UserError::Marshal(_)
            | UserError::Create(_)
            | UserError::Update(_)
            | UserError::Delete(_) => ErrorKind::Store,
            UserError::Encode(_) => ErrorKind::Encode,
        }
    }

    /// HTTP status code both front ends answer with.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Decode | ErrorKind::Validation => 400,
            ErrorKind::Store | ErrorKind::Encode => 500,
        }
    }

    /// Source chain rendered for logging.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}
