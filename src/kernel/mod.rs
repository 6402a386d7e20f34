//! Kernel (persona) registry
//!
//! A kernel bundles the system instruction sent to the remote model, the
//! opening message shown when the kernel is activated, a visual theme and
//! display-only audio metadata. The set of kernels is a static table
//! loaded at startup and never mutated.

pub mod builtin;
pub mod registry;
pub mod types;

pub use registry::KernelRegistry;
pub use types::{AudioConfig, Kernel, KernelTheme};
