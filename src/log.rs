//  LOG.rs
//    by Lut99
//
//  Created:
//    14 Mar 2025, 10:02:17
//  Last edited:
//    20 Mar 2025, 16:41:08
//  Auto updated?
//    Yes
//
//  Description:
//!   Wraps the [`log`](https://github.com/rust-lang/log)-crate such that the minimization engine
//!   only emits anything when the `log`-feature is enabled.
//!
//!   Without the feature, every macro in here swallows its arguments. Keep that in mind when
//!   computing something only to log it.
//


/***** LIBRARY *****/
/// Forwards to `log::warn!()` when the `log`-feature is enabled.
///
/// Used for data that the engine tolerates but that indicates a problem upstream, e.g., an
/// ambiguous merge or a pair naming a state that doesn't exist.
#[cfg(feature = "log")]
#[allow(unused)]
macro_rules! warning {
    ($($t:tt)*) => {
        ::log::warn!($($t)*)
    };
}
/// Swallows its arguments, as the `log`-feature is disabled.
#[cfg(not(feature = "log"))]
#[allow(unused)]
macro_rules! warning {
    ($($t:tt)*) => {};
}
#[allow(unused)]
pub(crate) use warning as warn;

/// Forwards to `log::debug!()` when the `log`-feature is enabled.
///
/// Used for run-level events, such as the start and end of a refinement pass.
#[cfg(feature = "log")]
#[allow(unused)]
macro_rules! debug {
    ($($t:tt)*) => {
        ::log::debug!($($t)*)
    };
}
/// Swallows its arguments, as the `log`-feature is disabled.
#[cfg(not(feature = "log"))]
#[allow(unused)]
macro_rules! debug {
    ($($t:tt)*) => {};
}
#[allow(unused)]
pub(crate) use debug;

/// Forwards to `log::trace!()` when the `log`-feature is enabled.
///
/// Used for the per-pair and per-symbol decisions of the algorithms.
#[cfg(feature = "log")]
#[allow(unused)]
macro_rules! trace {
    ($($t:tt)*) => {
        ::log::trace!($($t)*)
    };
}
/// Swallows its arguments, as the `log`-feature is disabled.
#[cfg(not(feature = "log"))]
#[allow(unused)]
macro_rules! trace {
    ($($t:tt)*) => {};
}
#[allow(unused)]
pub(crate) use trace;
