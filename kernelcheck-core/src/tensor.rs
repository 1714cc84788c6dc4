//! Tensors
//!
//! Owned, contiguous, row-major numeric buffers. Solutions and reference
//! implementations mutate output tensors in place, so every tensor owns its
//! storage and `Clone` is always a deep copy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type of a tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// 32-bit signed integer
    I32,
}

impl DType {
    /// Short lowercase name (`f32`, `f64`, `i32`)
    pub fn name(self) -> &'static str {
        match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::I32 => "i32",
        }
    }

    /// Size of one element in bytes
    pub fn size_in_bytes(self) -> usize {
        match self {
            DType::F32 | DType::I32 => 4,
            DType::F64 => 8,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from tensor construction and typed access
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TensorError {
    #[error("shape {shape:?} holds {expected} elements but {actual} were provided")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("expected a {expected} tensor, found {actual}")]
    DTypeMismatch { expected: DType, actual: DType },
}

#[derive(Debug, Clone, PartialEq)]
enum Storage {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
}

/// A shaped numeric buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    storage: Storage,
}

fn check_len(shape: &[usize], actual: usize) -> Result<(), TensorError> {
    let expected = shape.iter().product::<usize>();
    if expected == actual {
        Ok(())
    } else {
        Err(TensorError::ShapeMismatch {
            shape: shape.to_vec(),
            expected,
            actual,
        })
    }
}

impl Tensor {
    /// Create an `f32` tensor from row-major data
    pub fn from_f32(shape: impl Into<Vec<usize>>, data: Vec<f32>) -> Result<Self, TensorError> {
        let shape = shape.into();
        check_len(&shape, data.len())?;
        Ok(Self {
            shape,
            storage: Storage::F32(data),
        })
    }

    /// Create an `f64` tensor from row-major data
    pub fn from_f64(shape: impl Into<Vec<usize>>, data: Vec<f64>) -> Result<Self, TensorError> {
        let shape = shape.into();
        check_len(&shape, data.len())?;
        Ok(Self {
            shape,
            storage: Storage::F64(data),
        })
    }

    /// Create an `i32` tensor from row-major data
    pub fn from_i32(shape: impl Into<Vec<usize>>, data: Vec<i32>) -> Result<Self, TensorError> {
        let shape = shape.into();
        check_len(&shape, data.len())?;
        Ok(Self {
            shape,
            storage: Storage::I32(data),
        })
    }

    /// One-dimensional `f32` tensor
    pub fn vector(data: Vec<f32>) -> Self {
        Self {
            shape: vec![data.len()],
            storage: Storage::F32(data),
        }
    }

    /// Tensor of the given shape filled with zeros
    pub fn zeros(shape: impl Into<Vec<usize>>, dtype: DType) -> Self {
        Self::full(shape, dtype, 0.0)
    }

    /// Tensor of the given shape filled with `value` (truncated for integer dtypes)
    pub fn full(shape: impl Into<Vec<usize>>, dtype: DType, value: f64) -> Self {
        let shape = shape.into();
        let n = shape.iter().product::<usize>();
        let storage = match dtype {
            DType::F32 => Storage::F32(vec![value as f32; n]),
            DType::F64 => Storage::F64(vec![value; n]),
            DType::I32 => Storage::I32(vec![value as i32; n]),
        };
        Self { shape, storage }
    }

    /// `f32` tensor with elements drawn uniformly from `[low, high)`.
    ///
    /// The same seed always yields the same tensor, so challenge generators
    /// can produce stable test numbering across runs.
    pub fn rand_uniform(shape: impl Into<Vec<usize>>, low: f32, high: f32, seed: u64) -> Self {
        let shape = shape.into();
        let n = shape.iter().product::<usize>();
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..n).map(|_| rng.gen_range(low..high)).collect();
        Self {
            shape,
            storage: Storage::F32(data),
        }
    }

    /// `i32` tensor with elements drawn uniformly from `[low, high)`
    pub fn rand_int(shape: impl Into<Vec<usize>>, low: i32, high: i32, seed: u64) -> Self {
        let shape = shape.into();
        let n = shape.iter().product::<usize>();
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..n).map(|_| rng.gen_range(low..high)).collect();
        Self {
            shape,
            storage: Storage::I32(data),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        match self.storage {
            Storage::F32(_) => DType::F32,
            Storage::F64(_) => DType::F64,
            Storage::I32(_) => DType::I32,
        }
    }

    /// Number of elements
    pub fn numel(&self) -> usize {
        match &self.storage {
            Storage::F32(v) => v.len(),
            Storage::F64(v) => v.len(),
            Storage::I32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Size of the underlying buffer in bytes
    pub fn nbytes(&self) -> usize {
        self.numel() * self.dtype().size_in_bytes()
    }

    /// Address of the underlying buffer.
    ///
    /// Two tensors with the same id share storage; a deep copy never does
    /// (unless both are empty).
    pub fn buffer_id(&self) -> usize {
        match &self.storage {
            Storage::F32(v) => v.as_ptr() as usize,
            Storage::F64(v) => v.as_ptr() as usize,
            Storage::I32(v) => v.as_ptr() as usize,
        }
    }

    pub fn as_f32(&self) -> Result<&[f32], TensorError> {
        match &self.storage {
            Storage::F32(v) => Ok(v),
            _ => Err(self.dtype_error(DType::F32)),
        }
    }

    pub fn as_f32_mut(&mut self) -> Result<&mut [f32], TensorError> {
        match &mut self.storage {
            Storage::F32(v) => Ok(v),
            other => Err(TensorError::DTypeMismatch {
                expected: DType::F32,
                actual: storage_dtype(other),
            }),
        }
    }

    pub fn as_f64(&self) -> Result<&[f64], TensorError> {
        match &self.storage {
            Storage::F64(v) => Ok(v),
            _ => Err(self.dtype_error(DType::F64)),
        }
    }

    pub fn as_f64_mut(&mut self) -> Result<&mut [f64], TensorError> {
        match &mut self.storage {
            Storage::F64(v) => Ok(v),
            other => Err(TensorError::DTypeMismatch {
                expected: DType::F64,
                actual: storage_dtype(other),
            }),
        }
    }

    pub fn as_i32(&self) -> Result<&[i32], TensorError> {
        match &self.storage {
            Storage::I32(v) => Ok(v),
            _ => Err(self.dtype_error(DType::I32)),
        }
    }

    pub fn as_i32_mut(&mut self) -> Result<&mut [i32], TensorError> {
        match &mut self.storage {
            Storage::I32(v) => Ok(v),
            other => Err(TensorError::DTypeMismatch {
                expected: DType::I32,
                actual: storage_dtype(other),
            }),
        }
    }

    /// Element `index` (flat, row-major) widened to `f64`
    #[inline]
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        match &self.storage {
            Storage::F32(v) => v.get(index).map(|&x| x as f64),
            Storage::F64(v) => v.get(index).copied(),
            Storage::I32(v) => v.get(index).map(|&x| x as f64),
        }
    }

    /// Overwrite every element with `value`
    pub fn fill(&mut self, value: f64) {
        match &mut self.storage {
            Storage::F32(v) => v.fill(value as f32),
            Storage::F64(v) => v.fill(value),
            Storage::I32(v) => v.fill(value as i32),
        }
    }

    /// Convert a flat index into a multi-dimensional index for this shape
    pub fn unravel_index(&self, mut flat: usize) -> Vec<usize> {
        let mut index = vec![0; self.shape.len()];
        for (slot, &dim) in index.iter_mut().zip(&self.shape).rev() {
            if dim == 0 {
                continue;
            }
            *slot = flat % dim;
            flat /= dim;
        }
        index
    }

    fn dtype_error(&self, expected: DType) -> TensorError {
        TensorError::DTypeMismatch {
            expected,
            actual: self.dtype(),
        }
    }
}

fn storage_dtype(storage: &Storage) -> DType {
    match storage {
        Storage::F32(_) => DType::F32,
        Storage::F64(_) => DType::F64,
        Storage::I32(_) => DType::I32,
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tensor<{}>{:?}", self.dtype(), self.shape)
    }
}
