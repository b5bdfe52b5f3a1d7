//! Logging macros.
//! With the `defmt` feature these are the defmt macros, with `log` they forward to the
//! log facade, and with neither they only type-check their arguments.

#![allow(unused_macros, unused_imports)]

#[cfg(feature = "defmt")]
pub(crate) use defmt::{debug, trace, warn};

#[cfg(all(feature = "log", not(feature = "defmt")))]
pub(crate) use log::{debug, trace, warn};

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! tracei {
    ($($arg:tt)+) => {{
        let _ = format_args!($($arg)+);
    }};
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! debugi {
    ($($arg:tt)+) => {{
        let _ = format_args!($($arg)+);
    }};
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! warni {
    ($($arg:tt)+) => {{
        let _ = format_args!($($arg)+);
    }};
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
pub(crate) use debugi as debug;
#[cfg(not(any(feature = "log", feature = "defmt")))]
pub(crate) use tracei as trace;
#[cfg(not(any(feature = "log", feature = "defmt")))]
pub(crate) use warni as warn;
