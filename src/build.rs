// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::error::Error;
use std::fmt::{Display, Formatter};
use classlr_core::log::{BufLog, LogReader, LogStatus};

// ---------------------------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BuildErrorSource {
    Grammar,
    Automaton,
}

/// Error raised when a grammar or its automaton can't be built. The log holds the reasons.
#[derive(Clone, Debug)]
pub struct BuildError {
    log: BufLog,
    source: BuildErrorSource,
}

impl BuildError {
    pub fn new(log: BufLog, source: BuildErrorSource) -> Self {
        BuildError { log, source }
    }

    pub fn get_source(&self) -> BuildErrorSource {
        self.source
    }

    pub fn get_log(&self) -> &BufLog {
        &self.log
    }

    pub fn give_log(self) -> BufLog {
        self.log
    }
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Errors have occurred in {:?}:\n{}", self.source, self.log.get_messages_str())
    }
}

impl Error for BuildError {
}

pub trait HasBuildErrorSource {
    const SOURCE: BuildErrorSource;

    fn get_build_error_source() -> BuildErrorSource {
        Self::SOURCE
    }
}

// ---------------------------------------------------------------------------------------------
// Local from/into and try_from/try_into
// - the standard TryFrom is automatically implemented from From, which is always Ok, so
//   we need our own traits to build objects that report their errors in a log

pub trait BuildFrom<S>: Sized {
    /// Converts to this type from the input type. Errors are reported in the log of the result.
    #[must_use]
    fn build_from(source: S) -> Self;
}

pub trait TryBuildFrom<T>: Sized {
    /// The type returned in the event of a conversion error.
    type Error;

    /// Performs the conversion.
    fn try_build_from(source: T) -> Result<Self, Self::Error>;
}

impl<S, T> TryBuildFrom<S> for T
where
    S: LogReader<Item = BufLog> + HasBuildErrorSource,
    T: LogReader<Item = BufLog> + BuildFrom<S> + HasBuildErrorSource,
{
    type Error = BuildError;

    /// Builds the target if the source has no errors, then checks the target's log.
    fn try_build_from(source: S) -> Result<Self, Self::Error> {
        const VERBOSE: bool = false;
        if VERBOSE {
            println!("try_build_from <{}> -> <{}>: source messages\n{}",
                     std::any::type_name::<S>(), std::any::type_name::<T>(),
                     source.get_log().get_messages_str());
        }
        if source.get_log().has_no_errors() {
            let target = T::build_from(source);
            if target.get_log().has_no_errors() {
                Ok(target)
            } else {
                Err(BuildError::new(target.give_log(), T::get_build_error_source()))
            }
        } else {
            Err(BuildError::new(source.give_log(), S::get_build_error_source()))
        }
    }
}
