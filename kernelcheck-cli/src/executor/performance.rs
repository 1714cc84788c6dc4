//! Performance Measurement
//!
//! Times the solution and the reference implementation on independently
//! generated performance cases and compares their medians.

use super::{HarnessError, progress_bar};
use kernelcheck_core::{Challenge, Device, KernelArgs, Reference, Solve, run_timed_loop};
use kernelcheck_stats::{MedianComparison, TimingSummary, Verdict, compare_medians};
use tracing::debug;

/// Untimed invocations before each measurement
pub const WARMUP_ITERATIONS: usize = kernelcheck_core::DEFAULT_WARMUP_ITERATIONS;

/// Latency summaries of solution and reference
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceComparison {
    pub solution: TimingSummary,
    pub reference: TimingSummary,
    pub iterations: usize,
    pub warmup: usize,
}

impl PerformanceComparison {
    fn medians(&self) -> MedianComparison {
        compare_medians(&self.solution, &self.reference)
    }

    /// `solution.median / reference.median`
    pub fn ratio(&self) -> f64 {
        self.medians().ratio
    }

    pub fn verdict(&self) -> Verdict {
        self.medians().verdict
    }
}

/// Time `solve` on `args` and summarize the samples.
///
/// Runs `warmup` untimed invocations, then `iterations` timed ones with a
/// device barrier after each. Any failure of `solve` is fatal.
pub fn benchmark<D, S>(
    device: &D,
    solve: &S,
    args: &mut KernelArgs,
    iterations: usize,
    warmup: usize,
) -> Result<TimingSummary, HarnessError>
where
    D: Device,
    S: Solve + ?Sized,
{
    if iterations == 0 {
        return Err(HarnessError::NoSamples);
    }
    let run = run_timed_loop(device, solve, args, iterations, warmup).map_err(|source| {
        HarnessError::Benchmark {
            target: "kernel",
            source,
        }
    })?;
    TimingSummary::from_samples(&run.samples_ms).ok_or(HarnessError::NoSamples)
}

/// Benchmark the solution and the reference, each on its own generated case
pub fn run_performance_test<D, C, S>(
    device: &D,
    challenge: &C,
    solve: &S,
    iterations: usize,
) -> Result<PerformanceComparison, HarnessError>
where
    D: Device,
    C: Challenge + ?Sized,
    S: Solve + ?Sized,
{
    if iterations == 0 {
        return Err(HarnessError::NoSamples);
    }
    let signature = challenge.solve_signature();
    let mut solution_args = challenge.generate_performance_test();
    let mut reference_args = challenge.generate_performance_test();
    for args in [&solution_args, &reference_args] {
        signature
            .check(args)
            .map_err(HarnessError::PerformanceFixture)?;
    }

    let pb = progress_bar(2);
    pb.set_message("solution");
    let solution = benchmark(device, solve, &mut solution_args, iterations, WARMUP_ITERATIONS)
        .map_err(|e| retarget(e, "solution"))?;
    debug!(median_ms = solution.median, "solution timed");
    pb.inc(1);

    pb.set_message("reference");
    let reference = benchmark(
        device,
        &Reference(challenge),
        &mut reference_args,
        iterations,
        WARMUP_ITERATIONS,
    )
    .map_err(|e| retarget(e, "reference"))?;
    debug!(median_ms = reference.median, "reference timed");
    pb.inc(1);

    pb.finish_and_clear();
    Ok(PerformanceComparison {
        solution,
        reference,
        iterations,
        warmup: WARMUP_ITERATIONS,
    })
}

fn retarget(e: HarnessError, target: &'static str) -> HarnessError {
    match e {
        HarnessError::Benchmark { source, .. } => HarnessError::Benchmark { target, source },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernelcheck_core::{
        DType, DeviceError, Direction, HostDevice, KernelError, ParamType, Signature, Tensor,
    };
    use std::cell::{Cell, RefCell};

    /// Reports a scripted duration for each start event
    struct FakeDevice {
        durations: Vec<f64>,
        next: Cell<usize>,
        syncs: Cell<usize>,
    }

    impl FakeDevice {
        fn new(durations: Vec<f64>) -> Self {
            Self {
                durations,
                next: Cell::new(0),
                syncs: Cell::new(0),
            }
        }
    }

    impl Device for FakeDevice {
        type Event = usize;

        fn name(&self) -> &str {
            "fake"
        }
        fn synchronize(&self) -> Result<(), DeviceError> {
            self.syncs.set(self.syncs.get() + 1);
            Ok(())
        }
        fn record_event(&self) -> Result<usize, DeviceError> {
            let id = self.next.get();
            self.next.set(id + 1);
            Ok(id)
        }
        fn elapsed_ms(&self, start: &usize, _end: &usize) -> Result<f64, DeviceError> {
            Ok(self.durations[(start / 2) % self.durations.len()])
        }
    }

    fn noop(_args: &mut KernelArgs) -> Result<(), KernelError> {
        Ok(())
    }

    #[test]
    fn test_benchmark_summary() {
        let device = FakeDevice::new(vec![0.5, 0.3, 0.9, 0.4, 0.6]);
        let summary = benchmark(&device, &noop, &mut KernelArgs::new(), 5, 2).unwrap();

        assert_eq!(summary.sample_count, 5);
        assert_eq!(summary.min, 0.3);
        assert_eq!(summary.median, 0.5);
        assert_eq!(summary.max, 0.9);
        // One barrier after warmup plus one per timed iteration
        assert_eq!(device.syncs.get(), 6);
    }

    #[test]
    fn test_benchmark_on_host_device() {
        let summary = benchmark(&HostDevice::new(), &noop, &mut KernelArgs::new(), 5, 1).unwrap();
        assert_eq!(summary.sample_count, 5);
        assert!(summary.min <= summary.median && summary.median <= summary.max);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = benchmark(&HostDevice::new(), &noop, &mut KernelArgs::new(), 0, 0).unwrap_err();
        assert!(matches!(err, HarnessError::NoSamples));
    }

    #[test]
    fn test_failing_kernel_is_fatal() {
        let failing = |_args: &mut KernelArgs| -> Result<(), KernelError> { Err(KernelError::msg("boom")) };
        let err = benchmark(&HostDevice::new(), &failing, &mut KernelArgs::new(), 3, 0).unwrap_err();
        assert!(matches!(err, HarnessError::Benchmark { .. }));
    }

    struct Tracked {
        ids: RefCell<Vec<usize>>,
    }

    impl Challenge for Tracked {
        fn name(&self) -> &str {
            "Tracked"
        }
        fn atol(&self) -> f64 {
            0.0
        }
        fn rtol(&self) -> f64 {
            0.0
        }
        fn generate_functional_test(&self) -> Vec<KernelArgs> {
            Vec::new()
        }
        fn generate_performance_test(&self) -> KernelArgs {
            KernelArgs::new().with("y", Tensor::zeros([8], DType::F32))
        }
        fn solve_signature(&self) -> Signature {
            Signature::new().with("y", ParamType::Tensor(DType::F32), Direction::Out)
        }
        fn reference_impl(&self, args: &mut KernelArgs) -> Result<(), KernelError> {
            let y = args.tensor_mut("y")?;
            self.ids.borrow_mut().push(y.buffer_id());
            y.fill(2.0);
            Ok(())
        }
    }

    #[test]
    fn test_solution_and_reference_use_separate_cases() {
        let challenge = Tracked {
            ids: RefCell::new(Vec::new()),
        };
        let solution_ids = RefCell::new(Vec::new());
        let solve = |args: &mut KernelArgs| -> Result<(), KernelError> {
            let y = args.tensor_mut("y")?;
            solution_ids.borrow_mut().push(y.buffer_id());
            y.fill(1.0);
            Ok(())
        };

        let device = FakeDevice::new(vec![2.0]);
        let cmp = run_performance_test(&device, &challenge, &solve, 3).unwrap();

        assert_eq!(cmp.warmup, WARMUP_ITERATIONS);
        assert_eq!(solution_ids.borrow().len(), WARMUP_ITERATIONS + 3);
        assert_eq!(challenge.ids.borrow().len(), WARMUP_ITERATIONS + 3);
        assert_ne!(solution_ids.borrow()[0], challenge.ids.borrow()[0]);
        assert_eq!(cmp.ratio(), 1.0);
        assert_eq!(cmp.verdict(), Verdict::Faster);
    }

    /// Second generated performance case is missing its output
    struct DriftingFixture {
        generated: Cell<usize>,
        reference_calls: Cell<usize>,
    }

    impl Challenge for DriftingFixture {
        fn name(&self) -> &str {
            "DriftingFixture"
        }
        fn atol(&self) -> f64 {
            0.0
        }
        fn rtol(&self) -> f64 {
            0.0
        }
        fn generate_functional_test(&self) -> Vec<KernelArgs> {
            Vec::new()
        }
        fn generate_performance_test(&self) -> KernelArgs {
            let n = self.generated.get();
            self.generated.set(n + 1);
            if n == 0 {
                KernelArgs::new().with("y", Tensor::zeros([4], DType::F32))
            } else {
                KernelArgs::new()
            }
        }
        fn solve_signature(&self) -> Signature {
            Signature::new().with("y", ParamType::Tensor(DType::F32), Direction::Out)
        }
        fn reference_impl(&self, _args: &mut KernelArgs) -> Result<(), KernelError> {
            self.reference_calls.set(self.reference_calls.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_reference_case_is_signature_checked_before_timing() {
        let challenge = DriftingFixture {
            generated: Cell::new(0),
            reference_calls: Cell::new(0),
        };
        let solution_calls = Cell::new(0);
        let solve = |_args: &mut KernelArgs| -> Result<(), KernelError> {
            solution_calls.set(solution_calls.get() + 1);
            Ok(())
        };

        let err = run_performance_test(&HostDevice::new(), &challenge, &solve, 3).unwrap_err();
        assert!(matches!(err, HarnessError::PerformanceFixture(_)));
        assert_eq!(solution_calls.get(), 0);
        assert_eq!(challenge.reference_calls.get(), 0);
    }

    #[test]
    fn test_ratio_and_verdict() {
        let cmp = PerformanceComparison {
            solution: TimingSummary::from_samples(&[3.0]).unwrap(),
            reference: TimingSummary::from_samples(&[1.5]).unwrap(),
            iterations: 1,
            warmup: 0,
        };
        assert!((cmp.ratio() - 2.0).abs() < 1e-12);
        assert_eq!(cmp.verdict(), Verdict::Slower);
    }
}
