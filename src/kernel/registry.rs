//! Static kernel registry.

use super::builtin::BUILTIN_KERNELS;
use super::types::Kernel;
use crate::error::{OkuError, Result};

/// Registry of available kernels
///
/// Wraps an immutable table. The first entry is the default kernel.
#[derive(Debug, Clone, Copy)]
pub struct KernelRegistry {
    kernels: &'static [Kernel],
}

impl KernelRegistry {
    /// Registry over the kernels bundled with the binary
    ///
    /// # Examples
    ///
    /// ```
    /// use oku::kernel::KernelRegistry;
    ///
    /// let registry = KernelRegistry::builtin();
    /// assert_eq!(registry.default_kernel().id, "genesis-qc");
    /// ```
    pub fn builtin() -> Self {
        Self {
            kernels: &BUILTIN_KERNELS,
        }
    }

    /// Registry over a caller-provided table
    ///
    /// # Errors
    ///
    /// Returns error if the table is empty
    pub fn from_static(kernels: &'static [Kernel]) -> Result<Self> {
        if kernels.is_empty() {
            return Err(OkuError::Config("kernel table cannot be empty".to_string()).into());
        }
        Ok(Self { kernels })
    }

    pub fn all(&self) -> &'static [Kernel] {
        self.kernels
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.kernels.iter().map(|k| k.id).collect()
    }

    pub fn default_kernel(&self) -> &'static Kernel {
        &self.kernels[0]
    }

    /// Look up a kernel by id (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `OkuError::UnknownKernel` listing the valid ids
    pub fn get(&self, id: &str) -> Result<&'static Kernel> {
        let wanted = id.trim();
        self.kernels
            .iter()
            .find(|k| k.id.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                OkuError::UnknownKernel {
                    id: wanted.to_string(),
                    available: self.ids().join(", "),
                }
                .into()
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_ok()
    }
}

impl Default for KernelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
