//! kernelcheck Example Harness
//!
//! A vector addition challenge and a solution for it, registered in one
//! harness binary. Serves as a template for writing your own challenges.
//!
//! Run with:
//!   cargo run --example vector_add -- challenges/easy/vector_add vector_add.rs
//!   cargo run --example vector_add -- challenges/easy/vector_add vector_add.rs --functional-only
//!   cargo run --example vector_add -- challenges/easy/vector_add vector_add.rs --iterations 20 --format json
//!
//! The paths are resolved against the registry, so they do not need to exist.

use kernelcheck::prelude::*;

/// C = A + B over `n` f32 elements
struct VectorAdd {
    perf_size: usize,
}

impl VectorAdd {
    fn new() -> Self {
        Self {
            perf_size: 1 << 20,
        }
    }

    fn case(n: usize, seed: u64) -> KernelArgs {
        KernelArgs::new()
            .with("a", Tensor::rand_uniform([n], -1.0, 1.0, seed))
            .with("b", Tensor::rand_uniform([n], -1.0, 1.0, seed + 1))
            .with("c", Tensor::zeros([n], DType::F32))
            .with("n", n)
    }
}

impl Challenge for VectorAdd {
    fn name(&self) -> &str {
        "Vector Addition"
    }

    fn atol(&self) -> f64 {
        1e-5
    }

    fn rtol(&self) -> f64 {
        1e-5
    }

    fn generate_functional_test(&self) -> Vec<KernelArgs> {
        let mut cases: Vec<KernelArgs> = [1, 7, 128, 1000, 4096]
            .into_iter()
            .enumerate()
            .map(|(i, n)| Self::case(n, 2 * i as u64))
            .collect();

        // Empty input must be handled
        cases.push(Self::case(0, 100));

        // Exact values: zeros, negatives and a large magnitude
        cases.push(
            KernelArgs::new()
                .with("a", Tensor::vector(vec![0.0, -1.5, 1e6, 3.25]))
                .with("b", Tensor::vector(vec![0.0, 1.5, -1e6, 0.75]))
                .with("c", Tensor::zeros([4], DType::F32))
                .with("n", 4usize),
        );
        cases
    }

    fn generate_performance_test(&self) -> KernelArgs {
        Self::case(self.perf_size, 42)
    }

    fn solve_signature(&self) -> Signature {
        Signature::new()
            .with("a", ParamType::Tensor(DType::F32), Direction::In)
            .with("b", ParamType::Tensor(DType::F32), Direction::In)
            .with("c", ParamType::Tensor(DType::F32), Direction::Out)
            .with("n", ParamType::Int, Direction::In)
    }

    fn reference_impl(&self, args: &mut KernelArgs) -> Result<(), KernelError> {
        args.with_output("c", |c, args| -> Result<(), KernelError> {
            let a = args.tensor("a")?.as_f32()?;
            let b = args.tensor("b")?.as_f32()?;
            for (out, (x, y)) in c.as_f32_mut()?.iter_mut().zip(a.iter().zip(b)) {
                *out = x + y;
            }
            Ok(())
        })?
    }
}

/// Solution: chunked loop over `n` elements
fn solve(args: &mut KernelArgs) -> Result<(), KernelError> {
    let n = args.int("n")? as usize;
    args.with_output("c", |c, args| -> Result<(), KernelError> {
        let a = args.tensor("a")?.as_f32()?;
        let b = args.tensor("b")?.as_f32()?;
        let c = c.as_f32_mut()?;
        if a.len() < n || b.len() < n || c.len() < n {
            return Err(KernelError::msg(format!("buffers shorter than n = {}", n)));
        }

        const CHUNK: usize = 8;
        for ((out, xs), ys) in c[..n]
            .chunks_mut(CHUNK)
            .zip(a[..n].chunks(CHUNK))
            .zip(b[..n].chunks(CHUNK))
        {
            for ((o, x), y) in out.iter_mut().zip(xs).zip(ys) {
                *o = x + y;
            }
        }
        Ok(())
    })?
}

register_challenge!("easy/vector_add", VectorAdd::new);
register_solution!("vector_add", solve);

fn main() -> anyhow::Result<()> {
    kernelcheck::run()
}
