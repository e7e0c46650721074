//! Correlation identifier for one HTTP request.
//!
//! The [`Trace`](crate::Trace) middleware puts a fresh [`TraceId`] in
//! task-local scope for the handler. Domain errors read it when they are
//! built, so an error envelope and the request's log span share a value.
//! Work moved onto another task or a blocking thread must re-enter
//! [`TraceId::scope`] to keep it.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Random UUID naming a request in logs, headers and error bodies.
///
/// # Examples
/// ```
/// use collab_backend::TraceId;
///
/// let id: TraceId = "6f1c0e52-4a3b-4c1e-9a55-0d2b1f1e7c3a".parse().expect("uuid");
/// assert_eq!(id.to_string(), "6f1c0e52-4a3b-4c1e-9a55-0d2b1f1e7c3a");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    ///
    /// # Examples
    /// ```
    /// use collab_backend::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let id: TraceId = "00000000-0000-4000-8000-000000000001".parse().expect("uuid");
    /// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
