pub mod fallback;
pub mod session;

pub use fallback::FallbackStore;
pub use session::SessionStore;

/// Where a value shown to the student came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    /// The backend was unreachable; the value is the local mirror and may be stale.
    LocalFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Sourced<T> {
    pub fn remote(value: T) -> Self {
        Self {
            value,
            source: Source::Remote,
        }
    }

    pub fn local(value: T) -> Self {
        Self {
            value,
            source: Source::LocalFallback,
        }
    }

    pub fn is_local(&self) -> bool {
        self.source == Source::LocalFallback
    }
}
