//! Tracing macros that vanish without the `tracing` feature
//!
//! Spans wrap trials and fits, events carry the recovered parameters. Call sites never need
//! `#[cfg]`: with the feature disabled the span is a [NoopSpan] and event arguments are
//! evaluated and dropped.

#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::debug_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::debug!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)+) => {
        tracing::warn!($($arg)+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)+) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;
pub(crate) use trace_warn;

/// Span guard stand-in, so `let _guard = trace_span!(..).entered();` compiles everywhere
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
