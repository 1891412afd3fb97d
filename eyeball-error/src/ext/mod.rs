use std::error::Error as StdError;
use std::fmt::Display;

use crate::BoxError;

mod chain;
pub use chain::Chain;

mod context;
use context::{ContextError, MessageError};

mod opaque;
pub use opaque::OpaqueError;

/// Extends the `Result` and `Option` types with methods for adding context to errors.
///
/// # Examples
///
/// ```
/// use eyeball_error::ErrorContext;
///
/// let port: Option<u16> = None;
/// let err = port.context("port required").unwrap_err();
/// assert_eq!("port required: Option is None", err.to_string());
/// ```
pub trait ErrorContext: private::SealedErrorContext {
    /// The resulting context type after adding context to the contained error.
    type Context;

    /// Add a static context to the contained error.
    fn context<M>(self, context: M) -> Self::Context
    where
        M: Display + Send + Sync + 'static;

    /// Lazily add a context to the contained error, if it exists.
    fn with_context<C, F>(self, context: F) -> Self::Context
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ErrorContext for Result<T, E>
where
    E: Into<BoxError>,
{
    type Context = Result<T, BoxError>;

    fn context<M>(self, context: M) -> Self::Context
    where
        M: Display + Send + Sync + 'static,
    {
        self.map_err(|error| {
            Box::new(ContextError {
                context,
                error: error.into(),
            }) as BoxError
        })
    }

    fn with_context<C, F>(self, context: F) -> Self::Context
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| {
            Box::new(ContextError {
                context: context(),
                error: error.into(),
            }) as BoxError
        })
    }
}

impl<T> ErrorContext for Option<T> {
    type Context = Result<T, BoxError>;

    fn context<M>(self, context: M) -> Self::Context
    where
        M: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| MessageError("Option is None").context(context))
    }

    fn with_context<C, F>(self, context: F) -> Self::Context
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| MessageError("Option is None").with_context(context))
    }
}

/// Extends concrete error types with methods for working with errors.
///
/// Type-erased [`BoxError`] values can be inspected
/// using the free functions [`chain`], [`root_cause`] and [`has`].
pub trait ErrorExt: private::SealedErrorExt {
    /// Wrap the error in a context.
    fn context<M>(self, context: M) -> BoxError
    where
        M: Display + Send + Sync + 'static;

    /// Lazily wrap the error with a context.
    fn with_context<C, F>(self, context: F) -> BoxError
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;

    /// Type-erase the error into a [`BoxError`].
    fn into_box_error(self) -> BoxError;

    /// Type-erase the error into an [`OpaqueError`].
    fn into_opaque_error(self) -> OpaqueError;

    /// Iterate over the chain of errors, starting with this one.
    fn chain(&self) -> Chain<'_>;

    /// Returns `true` if this error or any of its sources is of type `T`.
    fn has<T: StdError + 'static>(&self) -> bool;
}

impl<Error: StdError + Send + Sync + 'static> ErrorExt for Error {
    fn context<M>(self, context: M) -> BoxError
    where
        M: Display + Send + Sync + 'static,
    {
        Box::new(ContextError {
            context,
            error: Box::new(self),
        })
    }

    fn with_context<C, F>(self, context: F) -> BoxError
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        Box::new(ContextError {
            context: context(),
            error: Box::new(self),
        })
    }

    fn into_box_error(self) -> BoxError {
        Box::new(self)
    }

    fn into_opaque_error(self) -> OpaqueError {
        OpaqueError::from_std(self)
    }

    fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    fn has<T: StdError + 'static>(&self) -> bool {
        has::<T>(self)
    }
}

/// Iterate over the chain of errors, starting with `error` itself.
pub fn chain<'a>(error: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain::new(error)
}

/// Get the deepest source of `error`.
pub fn root_cause<'a>(error: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut cause = error;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause
}

/// Returns `true` if `error` or any of its sources is of type `T`.
pub fn has<T: StdError + 'static>(error: &(dyn StdError + 'static)) -> bool {
    Chain::new(error).any(|e| e.is::<T>() || is_opaque_of::<T>(e))
}

fn is_opaque_of<T: StdError + 'static>(error: &(dyn StdError + 'static)) -> bool {
    error
        .downcast_ref::<OpaqueError>()
        .is_some_and(|opaque| opaque.is::<T>())
}

mod private {
    pub trait SealedErrorContext {}

    impl<T, E> SealedErrorContext for Result<T, E> where E: Into<crate::BoxError> {}
    impl<T> SealedErrorContext for Option<T> {}

    pub trait SealedErrorExt {}

    impl<Error: std::error::Error + Send + Sync + 'static> SealedErrorExt for Error {}
}
