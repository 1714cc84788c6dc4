//! Challenge & Solution Registry
//!
//! Challenges and solutions compiled into a harness binary register a
//! constructor under a key (`register_challenge!` / `register_solution!` in
//! the `kernelcheck` crate). Challenge keys are paths relative to a challenges
//! root (`easy/vector_add`); solution keys are file stems (`vector_add`).

use crate::challenge::{Challenge, Solve};

/// Challenge registered at link time
#[derive(Debug, Clone)]
pub struct ChallengeDef {
    /// Path of the challenge relative to its challenges root, `/`-separated
    pub key: &'static str,
    /// Builds a fresh challenge instance
    pub constructor: fn() -> Box<dyn Challenge>,
    /// Source file path
    pub file: &'static str,
    /// Source line number
    pub line: u32,
}

/// Solution registered at link time
#[derive(Debug, Clone)]
pub struct SolutionDef {
    /// Solution file stem
    pub key: &'static str,
    /// Builds the solve entry point
    pub constructor: fn() -> Box<dyn Solve>,
    /// Source file path
    pub file: &'static str,
    /// Source line number
    pub line: u32,
}

inventory::collect!(ChallengeDef);
inventory::collect!(SolutionDef);

/// Anchor to prevent LTO from stripping inventory entries
#[used]
#[doc(hidden)]
pub static REGISTRY_ANCHOR: fn() = || {
    for _ in inventory::iter::<ChallengeDef> {}
    for _ in inventory::iter::<SolutionDef> {}
};

/// All registered challenges, sorted by key
pub fn challenges() -> Vec<&'static ChallengeDef> {
    let mut defs: Vec<_> = inventory::iter::<ChallengeDef>.into_iter().collect();
    defs.sort_by_key(|d| d.key);
    defs
}

/// All registered solutions, sorted by key
pub fn solutions() -> Vec<&'static SolutionDef> {
    let mut defs: Vec<_> = inventory::iter::<SolutionDef>.into_iter().collect();
    defs.sort_by_key(|d| d.key);
    defs
}

pub fn find_challenge(key: &str) -> Option<&'static ChallengeDef> {
    inventory::iter::<ChallengeDef>
        .into_iter()
        .find(|d| d.key == key)
}

pub fn find_solution(key: &str) -> Option<&'static SolutionDef> {
    inventory::iter::<SolutionDef>
        .into_iter()
        .find(|d| d.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::KernelArgs;
    use crate::challenge::KernelError;
    use crate::signature::Signature;

    struct Noop;

    impl Challenge for Noop {
        fn name(&self) -> &str {
            "noop"
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
            KernelArgs::new()
        }
        fn solve_signature(&self) -> Signature {
            Signature::new()
        }
        fn reference_impl(&self, _args: &mut KernelArgs) -> Result<(), KernelError> {
            Ok(())
        }
    }

    fn noop_solve(_args: &mut KernelArgs) -> Result<(), KernelError> {
        Ok(())
    }

    inventory::submit! {
        ChallengeDef {
            key: "registry_test/noop",
            constructor: || Box::new(Noop),
            file: file!(),
            line: line!(),
        }
    }

    inventory::submit! {
        SolutionDef {
            key: "registry_noop",
            constructor: || Box::new(noop_solve as fn(&mut KernelArgs) -> Result<(), KernelError>),
            file: file!(),
            line: line!(),
        }
    }

    #[test]
    fn test_find_registered_challenge() {
        let def = find_challenge("registry_test/noop").expect("challenge registered");
        assert_eq!((def.constructor)().name(), "noop");
        assert!(find_challenge("registry_test/missing").is_none());
    }

    #[test]
    fn test_find_registered_solution() {
        let def = find_solution("registry_noop").expect("solution registered");
        let solve = (def.constructor)();
        assert!(solve.solve(&mut KernelArgs::new()).is_ok());
    }

    #[test]
    fn test_listing_is_sorted() {
        let keys: Vec<_> = challenges().iter().map(|d| d.key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(keys.contains(&"registry_test/noop"));
        assert!(solutions().iter().any(|d| d.key == "registry_noop"));
    }
}
