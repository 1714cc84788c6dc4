//! Shared-Library Entry Points
//!
//! Symbols a challenge or solution plugin exports (see `export_challenge!`
//! and `export_solution!` in the `kernelcheck` crate). Trait objects cross
//! the boundary as a thin pointer to a `Box<dyn _>`, so host and plugin must
//! be built with the same compiler and the same `kernelcheck-core`. The
//! `*_abi` symbols let the loader refuse a library built against another
//! [`ABI_VERSION`].

use crate::challenge::{Challenge, Solve};

/// Bumped whenever the `Challenge` or `Solve` trait layout changes
pub const ABI_VERSION: u32 = 1;

/// `extern "C" fn() -> *mut Box<dyn Challenge>`
pub const CHALLENGE_SYMBOL: &[u8] = b"kernelcheck_challenge\0";

/// `extern "C" fn() -> u32`, returns [`ABI_VERSION`]
pub const CHALLENGE_ABI_SYMBOL: &[u8] = b"kernelcheck_challenge_abi\0";

/// `extern "C" fn() -> *mut Box<dyn Solve>`
pub const SOLUTION_SYMBOL: &[u8] = b"kernelcheck_solution\0";

/// `extern "C" fn() -> u32`, returns [`ABI_VERSION`]
pub const SOLUTION_ABI_SYMBOL: &[u8] = b"kernelcheck_solution_abi\0";

/// File stem of the shared library inside a challenge directory
pub const CHALLENGE_LIBRARY_STEM: &str = "challenge";

#[allow(improper_ctypes_definitions)]
pub type ChallengeEntry = unsafe extern "C" fn() -> *mut Box<dyn Challenge>;

#[allow(improper_ctypes_definitions)]
pub type SolutionEntry = unsafe extern "C" fn() -> *mut Box<dyn Solve>;

pub type AbiVersionEntry = unsafe extern "C" fn() -> u32;

/// Box a challenge for export across the plugin boundary
pub fn into_challenge_ptr(challenge: Box<dyn Challenge>) -> *mut Box<dyn Challenge> {
    Box::into_raw(Box::new(challenge))
}

/// Box a solution for export across the plugin boundary
pub fn into_solution_ptr(solution: Box<dyn Solve>) -> *mut Box<dyn Solve> {
    Box::into_raw(Box::new(solution))
}

/// Reclaim a challenge exported by [`into_challenge_ptr`].
///
/// # Safety
/// `ptr` must be non-null, produced by `into_challenge_ptr` in a library built
/// against the same `kernelcheck-core`, and not reclaimed before.
pub unsafe fn challenge_from_ptr(ptr: *mut Box<dyn Challenge>) -> Box<dyn Challenge> {
    // SAFETY: upheld by the caller
    unsafe { *Box::from_raw(ptr) }
}

/// Reclaim a solution exported by [`into_solution_ptr`].
///
/// # Safety
/// Same contract as [`challenge_from_ptr`].
pub unsafe fn solution_from_ptr(ptr: *mut Box<dyn Solve>) -> Box<dyn Solve> {
    // SAFETY: upheld by the caller
    unsafe { *Box::from_raw(ptr) }
}
