use std::{fmt::Display, panic::Location};

use anyhow::{Context, Result};

/// Public prelude for LocatedError.
///
/// Note that this re-exports anyhow and thiserror
pub mod prelude {
    extern crate anyhow;
    pub use anyhow::{anyhow, bail, Context, Result};

    extern crate thiserror;
    pub use thiserror::Error;

    pub use super::{LocatedError, LocatedOption};
}

macro_rules! loc_caller {
    ($caller:expr) => {
        format!("[{}:{}:{}]", $caller.file(), $caller.line(), $caller.column())
    }
}

/// Trait extending [`anyhow::Result<T>`] with the location of the error (file, line, column).
///
/// `loc()` is eagerly evaluated; `with_loc()` takes a closure and only builds
/// the context string once an error does occur.
pub trait LocatedError<T, E> {
    /// Wrap the error value with additional context + the location at which it was called.
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static;

    /// Wrap the error value with lazily-evaluated context + the location at which it was called.
    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> LocatedError<T, E> for Result<T, E>
where
    E: Display + Send + Sync + 'static,
    Result<T, E>: Context<T, E>,
{
    #[track_caller]
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static
    {
        match self {
            Ok(ok)  => Ok(ok),
            Err(_) => {
                let loc = loc_caller!(Location::caller());
                self.context(format!("{loc} {context}"))
            }
        }
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C
    {
        match self {
            Ok(ok)  => Ok(ok),
            Err(_) => {
                let loc = loc_caller!(Location::caller());
                self.with_context(|| format!("{loc} {}", f()))
            }
        }
    }
}

/// Same extension, for [`Option<T>`].
pub trait LocatedOption<T> {
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static;

    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> LocatedOption<T> for Option<T> {
    #[track_caller]
    fn loc<C>(self, context: C) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static
    {
        match self {
            Some(ok) => Ok(ok),
            None     => {
                let loc = loc_caller!(Location::caller());
                self.context(format!("{loc} {context}"))
            }
        }
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> Result<T, anyhow::Error>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C
    {
        match self {
            Some(ok) => Ok(ok),
            None     => {
                let loc = loc_caller!(Location::caller());
                self.with_context(|| format!("{loc} {}", f()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;
    use std::fs::File;

    #[derive(Error, Debug)]
    pub enum NestedError {
        #[error(transparent)]
        Wrapped(#[from] anyhow::Error),

        #[error("inner failure")]
        Inner,
    }

    fn error_source(file: &str) -> Result<(), NestedError> {
        let _ = File::open(file).loc(format!("failed to open file: '{file}'"))?;
        Ok(())
    }

    #[test]
    fn chain_keeps_every_layer() {
        let err = error_source("/nonexistent-cismeta-fixture/")
            .with_loc(|| NestedError::Inner)
            .expect_err("opening a bogus path must fail");

        let chain: Vec<String> = err.chain().map(|e| format!("{e}")).collect();
        assert!(chain[0].contains("inner failure"));
        assert!(chain[1].contains("failed to open file"));
    }

    #[test]
    fn located_option() {
        let missing: Option<u8> = None;
        let err = missing.loc("empty option").expect_err("None must convert to Err");
        assert!(format!("{err}").contains("empty option"));
    }
}
