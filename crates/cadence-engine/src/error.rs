use std::sync::Arc;

/// Shared handle to a collaborator error.
///
/// Runtime errors are latched once and then handed to every context that asks,
/// so the underlying `anyhow::Error` is reference counted rather than moved.
pub type SharedError = Arc<anyhow::Error>;

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;

/// Errors surfaced by the frame runtime.
///
/// Contract violations by the host (non-positive layout, zero-sized targets)
/// are not represented here: they panic.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    #[error("game update failed: {0:#}")]
    Update(SharedError),

    #[error("offscreen draw failed: {0:#}")]
    Draw(SharedError),

    #[error("before-update hook failed: {0:#}")]
    Hook(SharedError),

    #[error("platform call failed: {0:#}")]
    Platform(SharedError),

    #[error("graphics driver failed: {0:#}")]
    Driver(SharedError),

    /// A job submitted to an execution context returned an error.
    #[error("job on {context} thread failed: {cause:#}")]
    Job {
        context: &'static str,
        cause: SharedError,
    },

    /// The target context stopped accepting jobs (cancelled or exited).
    #[error("{0} thread is no longer running")]
    ContextClosed(&'static str),

    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        source: Arc<std::io::Error>,
    },
}

impl RuntimeError {
    pub(crate) fn update(err: anyhow::Error) -> Self {
        Self::wrap(err, Self::Update)
    }

    pub(crate) fn draw(err: anyhow::Error) -> Self {
        Self::wrap(err, Self::Draw)
    }

    pub(crate) fn hook(err: anyhow::Error) -> Self {
        Self::wrap(err, Self::Hook)
    }

    pub(crate) fn platform(err: anyhow::Error) -> Self {
        Self::wrap(err, Self::Platform)
    }

    pub(crate) fn driver(err: anyhow::Error) -> Self {
        Self::wrap(err, Self::Driver)
    }

    pub(crate) fn job(context: &'static str, err: anyhow::Error) -> Self {
        Self::wrap(err, |cause| Self::Job { context, cause })
    }

    /// A collaborator that propagated a runtime error with `?` gets it back
    /// unchanged, so one fault keeps one identity across contexts.
    fn wrap(err: anyhow::Error, variant: impl FnOnce(SharedError) -> Self) -> Self {
        match err.downcast::<RuntimeError>() {
            Ok(inner) => inner,
            Err(err) => variant(Arc::new(err)),
        }
    }

    /// Returns true if both errors carry the same underlying error value.
    ///
    /// Latched errors are cloned across threads; this tells clones of one
    /// fault apart from two distinct faults with the same message.
    pub fn same_fault(&self, other: &RuntimeError) -> bool {
        match (self.shared_source(), other.shared_source()) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => match (self, other) {
                (Self::ContextClosed(a), Self::ContextClosed(b)) => a == b,
                (Self::Spawn { source: a, .. }, Self::Spawn { source: b, .. }) => Arc::ptr_eq(a, b),
                _ => false,
            },
        }
    }

    fn shared_source(&self) -> Option<&SharedError> {
        match self {
            Self::Update(e)
            | Self::Draw(e)
            | Self::Hook(e)
            | Self::Platform(e)
            | Self::Driver(e)
            | Self::Job { cause: e, .. } => Some(e),
            Self::ContextClosed(_) | Self::Spawn { .. } => None,
        }
    }
}
