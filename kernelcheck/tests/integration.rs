//! Integration tests for kernelcheck
//!
//! These tests verify the end-to-end behavior of the harness: loading,
//! functional checking, timing and report output.

use kernelcheck::prelude::*;
use kernelcheck::{
    FunctionalReport, HarnessLoader, HostDevice, ModuleLoader, RunPlan, benchmark,
    format_human_output, generate_json_report, run_functional_tests, run_harness,
};
use std::cell::{Cell, RefCell};
use std::path::Path;

/// y_out = x * 2 on a handful of vectors
struct Double;

impl Challenge for Double {
    fn name(&self) -> &str {
        "Double"
    }

    fn atol(&self) -> f64 {
        1e-5
    }

    fn rtol(&self) -> f64 {
        1e-5
    }

    fn generate_functional_test(&self) -> Vec<KernelArgs> {
        [1, 3, 16, 257]
            .into_iter()
            .enumerate()
            .map(|(i, n)| {
                KernelArgs::new()
                    .with("x", Tensor::rand_uniform([n], -10.0, 10.0, i as u64))
                    .with("y_out", Tensor::zeros([n], DType::F32))
            })
            .collect()
    }

    fn generate_performance_test(&self) -> KernelArgs {
        KernelArgs::new()
            .with("x", Tensor::rand_uniform([1024], -10.0, 10.0, 99))
            .with("y_out", Tensor::zeros([1024], DType::F32))
    }

    fn solve_signature(&self) -> Signature {
        Signature::new()
            .with("x", ParamType::Tensor(DType::F32), Direction::In)
            .with("y_out", ParamType::Tensor(DType::F32), Direction::Out)
    }

    fn reference_impl(&self, args: &mut KernelArgs) -> Result<(), KernelError> {
        times(args, 2.0)
    }
}

fn times(args: &mut KernelArgs, factor: f32) -> Result<(), KernelError> {
    args.with_output("y_out", |y, args| -> Result<(), KernelError> {
        let x = args.tensor("x")?.as_f32()?;
        for (out, v) in y.as_f32_mut()?.iter_mut().zip(x) {
            *out = v * factor;
        }
        Ok(())
    })?
}

fn double(args: &mut KernelArgs) -> Result<(), KernelError> {
    times(args, 2.0)
}

register_challenge!("integration/double", || Double);
register_solution!("double_solution", double);

fn functional(solve: &dyn Solve) -> FunctionalReport {
    run_functional_tests(&HostDevice::new(), &Double, solve).unwrap()
}

#[test]
fn test_correct_solution_passes_every_case() {
    let report = functional(&double);
    assert_eq!((report.passed(), report.total()), (4, 4));
}

#[test]
fn test_wrong_factor_fails_every_case() {
    let triple = |args: &mut KernelArgs| times(args, 3.0);
    let report = functional(&triple);
    assert_eq!((report.passed(), report.total()), (0, 4));
    assert!(report.cases.iter().all(|c| {
        c.failure
            .as_ref()
            .is_some_and(|f| f.kind() == "mismatch" && f.parameter() == Some("y_out"))
    }));
}

#[test]
fn test_error_message_is_visible() {
    let failing = |_args: &mut KernelArgs| -> Result<(), KernelError> { Err(KernelError::msg("oops")) };
    let plan = RunPlan {
        functional: true,
        performance: false,
        iterations: 1,
    };
    let report = run_harness(&HostDevice::new(), &Double, &failing, "failing.rs", plan).unwrap();
    let output = format_human_output(&report);

    assert!(output.starts_with("Challenge: Double\n"));
    assert!(output.contains("  Test 1: FAIL (exception: oops)\n"));
    assert!(output.contains("Result: 0/4 passed\n"));
    assert!(!output.contains("=== Performance ==="));
    assert!(!report.all_passed());
}

#[test]
fn test_failure_on_one_case_does_not_abort_the_rest() {
    let calls = Cell::new(0);
    let flaky = |args: &mut KernelArgs| -> Result<(), KernelError> {
        calls.set(calls.get() + 1);
        match calls.get() {
            2 => Err(KernelError::msg("transient")),
            3 => panic!("out of bounds"),
            _ => double(args),
        }
    };
    let report = functional(&flaky);

    assert_eq!(report.total(), 4);
    assert_eq!(report.passed(), 2);
    assert!(report.cases[0].passed());
    assert_eq!(report.cases[1].failure.as_ref().unwrap().kind(), "error");
    assert_eq!(report.cases[2].failure.as_ref().unwrap().kind(), "panic");
    assert!(report.cases[3].passed());
    assert_eq!(calls.get(), 4);
}

#[test]
fn test_reference_runs_on_independent_buffers() {
    struct Recording {
        ids: RefCell<Vec<usize>>,
    }

    impl Challenge for Recording {
        fn name(&self) -> &str {
            "Recording"
        }
        fn atol(&self) -> f64 {
            1e-5
        }
        fn rtol(&self) -> f64 {
            1e-5
        }
        fn generate_functional_test(&self) -> Vec<KernelArgs> {
            Double.generate_functional_test()
        }
        fn generate_performance_test(&self) -> KernelArgs {
            Double.generate_performance_test()
        }
        fn solve_signature(&self) -> Signature {
            Double.solve_signature()
        }
        fn reference_impl(&self, args: &mut KernelArgs) -> Result<(), KernelError> {
            self.ids
                .borrow_mut()
                .push(args.tensor("y_out")?.buffer_id());
            double(args)
        }
    }

    let challenge = Recording {
        ids: RefCell::new(Vec::new()),
    };
    let solution_ids = RefCell::new(Vec::new());
    let solve = |args: &mut KernelArgs| -> Result<(), KernelError> {
        solution_ids
            .borrow_mut()
            .push(args.tensor("y_out")?.buffer_id());
        double(args)
    };

    let report = run_functional_tests(&HostDevice::new(), &challenge, &solve).unwrap();
    assert_eq!(report.passed(), 4);

    let reference_ids = challenge.ids.borrow();
    let solution_ids = solution_ids.borrow();
    assert_eq!(reference_ids.len(), 4);
    for (s, r) in solution_ids.iter().zip(reference_ids.iter()) {
        assert_ne!(s, r);
    }
}

#[test]
fn test_benchmark_collects_requested_samples() {
    let mut args = Double.generate_performance_test();
    let summary = benchmark(&HostDevice::new(), &double, &mut args, 5, 2).unwrap();

    assert_eq!(summary.sample_count, 5);
    assert!(summary.min <= summary.median);
    assert!(summary.median <= summary.max);
}

#[test]
fn test_performance_cases_are_independent() {
    let mut first = Double.generate_performance_test();
    let second = Double.generate_performance_test();

    first.tensor_mut("y_out").unwrap().fill(7.0);

    assert!(second.tensor("y_out").unwrap().as_f32().unwrap().iter().all(|v| *v == 0.0));
    assert_ne!(
        first.tensor("x").unwrap().buffer_id(),
        second.tensor("x").unwrap().buffer_id()
    );
}

#[test]
fn test_registered_modules_end_to_end() {
    let mut loader = HarnessLoader::new();
    let challenge = loader
        .load_challenge(Path::new("challenges/integration/double"))
        .unwrap();
    let solution = loader
        .load_solution(Path::new("solutions/double_solution.rs"))
        .unwrap();

    let plan = RunPlan {
        functional: true,
        performance: true,
        iterations: 3,
    };
    let report = run_harness(
        &HostDevice::new(),
        challenge.challenge(),
        &solution,
        "solutions/double_solution.rs",
        plan,
    )
    .unwrap();

    assert!(report.all_passed());
    let performance = report.performance.as_ref().unwrap();
    assert_eq!(performance.solution.samples, 3);
    assert_eq!(performance.reference.samples, 3);

    let output = format_human_output(&report);
    assert!(output.contains("Result: 4/4 passed\n"));
    assert!(output.contains("  Baseline (reference):\n"));
    assert!(output.contains("  Ratio: "));

    let json = generate_json_report(&report).unwrap();
    assert!(json.contains("\"challenge\": \"Double\""));
    assert!(json.contains("\"iterations\": 3"));
}

#[test]
fn test_both_phase_flags_run_nothing() {
    let plan = RunPlan {
        functional: false,
        performance: false,
        iterations: 100,
    };
    let report = run_harness(&HostDevice::new(), &Double, &double, "double.rs", plan).unwrap();
    assert_eq!(format_human_output(&report), "Challenge: Double\n");
}
