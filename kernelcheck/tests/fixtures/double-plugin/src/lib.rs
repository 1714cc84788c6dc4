//! y_out = x * 2, exported as both a challenge and a solution

use kernelcheck::prelude::*;

struct PluginDouble;

impl Challenge for PluginDouble {
    fn name(&self) -> &str {
        "PluginDouble"
    }

    fn atol(&self) -> f64 {
        1e-5
    }

    fn rtol(&self) -> f64 {
        1e-5
    }

    fn generate_functional_test(&self) -> Vec<KernelArgs> {
        [1, 5, 64]
            .into_iter()
            .enumerate()
            .map(|(i, n)| {
                KernelArgs::new()
                    .with("x", Tensor::rand_uniform([n], -4.0, 4.0, i as u64))
                    .with("y_out", Tensor::zeros([n], DType::F32))
            })
            .collect()
    }

    fn generate_performance_test(&self) -> KernelArgs {
        KernelArgs::new()
            .with("x", Tensor::rand_uniform([256], -4.0, 4.0, 42))
            .with("y_out", Tensor::zeros([256], DType::F32))
    }

    fn solve_signature(&self) -> Signature {
        Signature::new()
            .with("x", ParamType::Tensor(DType::F32), Direction::In)
            .with("y_out", ParamType::Tensor(DType::F32), Direction::Out)
    }

    fn reference_impl(&self, args: &mut KernelArgs) -> Result<(), KernelError> {
        double(args)
    }
}

fn double(args: &mut KernelArgs) -> Result<(), KernelError> {
    args.with_output("y_out", |y, args| -> Result<(), KernelError> {
        let x = args.tensor("x")?.as_f32()?;
        for (out, v) in y.as_f32_mut()?.iter_mut().zip(x) {
            *out = v * 2.0;
        }
        Ok(())
    })?
}

export_challenge!(|| PluginDouble);
export_solution!(double);
