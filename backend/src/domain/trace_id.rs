//! Trace identifiers correlating a request's log lines with its error body.
//!
//! The active identifier sits in a tokio task-local while a request is
//! served, which is how [`crate::domain::Error`] constructors pick it up.
//! Spawned tasks do not inherit it; run them under [`TraceId::scope`].

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static ACTIVE: TraceId;
}

/// Length of the hyphenated UUID form, the only form accepted from callers.
const HYPHENATED_LEN: usize = 36;

/// UUID naming one request.
///
/// # Examples
/// ```
/// use cratedig::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id = TraceId::adopt("9b2f3c1e-6a4d-4f0e-8c7b-2d5e1f3a4b6c").expect("caller id");
/// assert_eq!(id.scope(async { TraceId::current() }).await, Some(id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accept an identifier supplied by a caller, such as a gateway that
    /// already assigned one. Only hyphenated, non-nil UUIDs are taken.
    #[must_use]
    pub fn adopt(candidate: &str) -> Option<Self> {
        if candidate.len() != HYPHENATED_LEN {
            return None;
        }
        let parsed = Uuid::try_parse(candidate).ok()?;
        (!parsed.is_nil()).then_some(Self(parsed))
    }

    /// Identifier of the request being served on this task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        ACTIVE.try_with(|id| *id).ok()
    }

    /// Drive `fut` with this identifier active.
    pub async fn scope<Fut>(self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        ACTIVE.scope(self, fut).await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(s).map(Self)
    }
}
