//! Challenge & Solution Loading
//!
//! Turns the two command-line paths into live objects:
//!
//! - [`RegistryLoader`] looks the paths up in the link-time registry of the
//!   harness binary (`register_challenge!` / `register_solution!`).
//! - [`DylibLoader`] opens shared libraries exporting the `kernelcheck_*`
//!   entry points (`export_challenge!` / `export_solution!`).
//! - [`HarnessLoader`] tries the registry first and falls back to libraries.
//!
//! Challenges live in a category hierarchy (`<root>/<category>/<name>`). Each
//! challenge load puts `<root>` at the front of the loader's [`SearchPath`]
//! once, and keys are resolved relative to it (`easy/vector_add`).

use kernelcheck_core::plugin::{
    self, ABI_VERSION, AbiVersionEntry, CHALLENGE_ABI_SYMBOL, CHALLENGE_LIBRARY_STEM,
    CHALLENGE_SYMBOL, ChallengeEntry, SOLUTION_ABI_SYMBOL, SOLUTION_SYMBOL, SolutionEntry,
};
use kernelcheck_core::{Challenge, KernelArgs, KernelError, Solve, registry};
use libloading::Library;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// What is being loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Challenge,
    Solution,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKind::Challenge => f.write_str("challenge"),
            ModuleKind::Solution => f.write_str("solution"),
        }
    }
}

/// Load-time failure; always fatal for the run
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{kind} not found: {}", path.display())]
    NotFound { kind: ModuleKind, path: PathBuf },

    #[error("cannot derive a {kind} key from {}", path.display())]
    Unresolved { kind: ModuleKind, path: PathBuf },

    #[error("no {kind} registered under '{key}'")]
    NotRegistered { kind: ModuleKind, key: String },

    #[error("{kind} '{}' is neither registered in this binary nor available as a shared library", path.display())]
    Unavailable { kind: ModuleKind, path: PathBuf },

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("{} does not export `{symbol}`: {source}", path.display())]
    MissingSymbol {
        path: PathBuf,
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    #[error("{} was built for ABI v{found}, this harness expects v{expected}", path.display())]
    AbiMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("entry point `{symbol}` in {} returned null", path.display())]
    NullEntry { path: PathBuf, symbol: String },
}

impl LoadError {
    /// Whether another loading strategy may still succeed
    fn is_absent(&self) -> bool {
        matches!(
            self,
            LoadError::NotFound { .. }
                | LoadError::Unresolved { .. }
                | LoadError::NotRegistered { .. }
        )
    }
}

/// Where a loaded object came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOrigin {
    /// Link-time registry entry
    Registry { key: String },
    /// Shared library on disk
    Library { path: PathBuf },
}

impl fmt::Display for ModuleOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleOrigin::Registry { key } => write!(f, "registry:{}", key),
            ModuleOrigin::Library { path } => write!(f, "{}", path.display()),
        }
    }
}

/// A challenge plus whatever keeps its code mapped
pub struct LoadedChallenge {
    // Declared before `_library` so it is dropped while the code is still mapped
    challenge: Box<dyn Challenge>,
    origin: ModuleOrigin,
    _library: Option<Library>,
}

impl LoadedChallenge {
    /// Wrap an in-process challenge
    pub fn new(challenge: Box<dyn Challenge>, origin: ModuleOrigin) -> Self {
        Self {
            challenge,
            origin,
            _library: None,
        }
    }

    pub fn challenge(&self) -> &dyn Challenge {
        self.challenge.as_ref()
    }

    pub fn origin(&self) -> &ModuleOrigin {
        &self.origin
    }
}

impl fmt::Debug for LoadedChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedChallenge")
            .field("name", &self.challenge.name())
            .field("origin", &self.origin)
            .finish()
    }
}

/// A solution plus whatever keeps its code mapped
pub struct LoadedSolution {
    solve: Box<dyn Solve>,
    origin: ModuleOrigin,
    _library: Option<Library>,
}

impl LoadedSolution {
    /// Wrap an in-process solution
    pub fn new(solve: Box<dyn Solve>, origin: ModuleOrigin) -> Self {
        Self {
            solve,
            origin,
            _library: None,
        }
    }

    pub fn origin(&self) -> &ModuleOrigin {
        &self.origin
    }
}

impl Solve for LoadedSolution {
    fn solve(&self, args: &mut KernelArgs) -> Result<(), KernelError> {
        self.solve.solve(args)
    }
}

impl fmt::Debug for LoadedSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedSolution")
            .field("origin", &self.origin)
            .finish()
    }
}

/// Ordered list of challenge roots, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `root` at the front unless already present; returns whether it was added
    pub fn insert_front(&mut self, root: impl AsRef<Path>) -> bool {
        let root = normalize(root.as_ref());
        if self.roots.contains(&root) {
            return false;
        }
        self.roots.insert(0, root);
        true
    }

    /// Append `root` unless already present; returns whether it was added
    pub fn push(&mut self, root: impl AsRef<Path>) -> bool {
        let root = normalize(root.as_ref());
        if self.roots.contains(&root) {
            return false;
        }
        self.roots.push(root);
        true
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn contains(&self, root: impl AsRef<Path>) -> bool {
        self.roots.contains(&normalize(root.as_ref()))
    }

    /// `/`-separated path of `path` relative to the first root containing it
    pub fn relative_key(&self, path: &Path) -> Option<String> {
        let path = normalize(path);
        for root in &self.roots {
            if let Some(key) = strip_root(&path, root) {
                return Some(key);
            }
        }
        // Lexical matching failed; retry with both sides resolved on disk
        let resolved = path.canonicalize().ok()?;
        self.roots.iter().find_map(|root| {
            let root = root.canonicalize().ok()?;
            strip_root(&resolved, &root)
        })
    }
}

fn strip_root(path: &Path, root: &Path) -> Option<String> {
    let rest = if root == Path::new(".") {
        if path.is_absolute() {
            return None;
        }
        path
    } else {
        path.strip_prefix(root).ok()?
    };
    let parts: Vec<_> = rest
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Drop `.` components; an empty result becomes `.`
fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Challenges root of `challenge_dir`: two levels up (`<root>/<category>/<name>`)
pub fn challenge_root(challenge_dir: &Path) -> PathBuf {
    let dir = normalize(challenge_dir);
    match dir.parent().and_then(Path::parent) {
        Some(root) if !root.as_os_str().is_empty() => root.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Registry key of a solution: its file stem
pub fn solution_key(solution_path: &Path) -> Result<String, LoadError> {
    solution_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| LoadError::Unresolved {
            kind: ModuleKind::Solution,
            path: solution_path.to_path_buf(),
        })
}

/// Strategy for turning command-line paths into live objects
pub trait ModuleLoader {
    fn load_challenge(&mut self, challenge_dir: &Path) -> Result<LoadedChallenge, LoadError>;

    fn load_solution(&mut self, solution_path: &Path) -> Result<LoadedSolution, LoadError>;

    fn search_path(&self) -> &SearchPath;
}

/// Resolves paths against the link-time registry
#[derive(Debug, Default)]
pub struct RegistryLoader {
    search_path: SearchPath,
}

impl RegistryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with extra roots searched after each challenge's own root
    pub fn with_search_paths(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut search_path = SearchPath::new();
        for root in roots {
            search_path.push(root);
        }
        Self { search_path }
    }
}

impl ModuleLoader for RegistryLoader {
    fn load_challenge(&mut self, challenge_dir: &Path) -> Result<LoadedChallenge, LoadError> {
        self.search_path.insert_front(challenge_root(challenge_dir));

        let key = self
            .search_path
            .relative_key(challenge_dir)
            .ok_or_else(|| LoadError::Unresolved {
                kind: ModuleKind::Challenge,
                path: challenge_dir.to_path_buf(),
            })?;
        debug!(key = %key, "looking up registered challenge");

        let def = registry::find_challenge(&key).ok_or_else(|| LoadError::NotRegistered {
            kind: ModuleKind::Challenge,
            key: key.clone(),
        })?;
        debug!(file = def.file, line = def.line, "challenge registered");

        Ok(LoadedChallenge::new(
            (def.constructor)(),
            ModuleOrigin::Registry { key },
        ))
    }

    fn load_solution(&mut self, solution_path: &Path) -> Result<LoadedSolution, LoadError> {
        let key = solution_key(solution_path)?;
        debug!(key = %key, "looking up registered solution");

        let def = registry::find_solution(&key).ok_or_else(|| LoadError::NotRegistered {
            kind: ModuleKind::Solution,
            key: key.clone(),
        })?;

        Ok(LoadedSolution::new(
            (def.constructor)(),
            ModuleOrigin::Registry { key },
        ))
    }

    fn search_path(&self) -> &SearchPath {
        &self.search_path
    }
}

/// Opens shared-library plugins
#[derive(Debug, Default)]
pub struct DylibLoader {
    search_path: SearchPath,
}

impl DylibLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with extra roots searched after each challenge's own root
    pub fn with_search_paths(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut search_path = SearchPath::new();
        for root in roots {
            search_path.push(root);
        }
        Self { search_path }
    }

    /// `challenge_dir/<libchallenge>`, else `<root>/<lib{key with / as _}>`
    fn locate_challenge_library(&self, challenge_dir: &Path) -> Result<PathBuf, LoadError> {
        let primary = challenge_dir.join(libloading::library_filename(CHALLENGE_LIBRARY_STEM));
        if primary.is_file() {
            return Ok(primary);
        }
        debug!(path = %primary.display(), "no challenge library in directory");

        if let Some(key) = self.search_path.relative_key(challenge_dir) {
            let file_name = libloading::library_filename(key.replace('/', "_"));
            for root in self.search_path.roots() {
                let candidate = root.join(&file_name);
                debug!(path = %candidate.display(), "probing");
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }

        Err(LoadError::NotFound {
            kind: ModuleKind::Challenge,
            path: primary,
        })
    }

    /// The path itself when it names a library, else a sibling library with the same stem
    fn locate_solution_library(solution_path: &Path) -> Result<PathBuf, LoadError> {
        let is_library = solution_path
            .extension()
            .is_some_and(|ext| ext == std::env::consts::DLL_EXTENSION);
        let path = if is_library {
            solution_path.to_path_buf()
        } else {
            let stem = solution_key(solution_path)?;
            solution_path.with_file_name(libloading::library_filename(stem))
        };

        if path.is_file() {
            Ok(path)
        } else {
            Err(LoadError::NotFound {
                kind: ModuleKind::Solution,
                path,
            })
        }
    }
}

impl ModuleLoader for DylibLoader {
    fn load_challenge(&mut self, challenge_dir: &Path) -> Result<LoadedChallenge, LoadError> {
        self.search_path.insert_front(challenge_root(challenge_dir));

        let path = self.locate_challenge_library(challenge_dir)?;
        let library = open_library(&path)?;
        check_abi(&library, &path, CHALLENGE_ABI_SYMBOL)?;

        let entry: ChallengeEntry = load_symbol(&library, &path, CHALLENGE_SYMBOL)?;
        // SAFETY: symbol type is fixed by `export_challenge!`, ABI version checked above
        let ptr = unsafe { entry() };
        if ptr.is_null() {
            return Err(null_entry(&path, CHALLENGE_SYMBOL));
        }
        // SAFETY: non-null pointer produced by `plugin::into_challenge_ptr`
        let challenge = unsafe { plugin::challenge_from_ptr(ptr) };

        Ok(LoadedChallenge {
            challenge,
            origin: ModuleOrigin::Library { path },
            _library: Some(library),
        })
    }

    fn load_solution(&mut self, solution_path: &Path) -> Result<LoadedSolution, LoadError> {
        let path = Self::locate_solution_library(solution_path)?;
        let library = open_library(&path)?;
        check_abi(&library, &path, SOLUTION_ABI_SYMBOL)?;

        let entry: SolutionEntry = load_symbol(&library, &path, SOLUTION_SYMBOL)?;
        // SAFETY: symbol type is fixed by `export_solution!`, ABI version checked above
        let ptr = unsafe { entry() };
        if ptr.is_null() {
            return Err(null_entry(&path, SOLUTION_SYMBOL));
        }
        // SAFETY: non-null pointer produced by `plugin::into_solution_ptr`
        let solve = unsafe { plugin::solution_from_ptr(ptr) };

        Ok(LoadedSolution {
            solve,
            origin: ModuleOrigin::Library { path },
            _library: Some(library),
        })
    }

    fn search_path(&self) -> &SearchPath {
        &self.search_path
    }
}

fn open_library(path: &Path) -> Result<Library, LoadError> {
    debug!(path = %path.display(), "opening shared library");
    // SAFETY: loading runs the library's initializers; plugins are trusted code
    unsafe { Library::new(path) }.map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn load_symbol<T: Copy>(library: &Library, path: &Path, name: &'static [u8]) -> Result<T, LoadError> {
    // SAFETY: symbol types are the ones declared in `kernelcheck_core::plugin`
    let symbol = unsafe { library.get::<T>(name) }.map_err(|source| LoadError::MissingSymbol {
        path: path.to_path_buf(),
        symbol: symbol_name(name),
        source,
    })?;
    Ok(*symbol)
}

fn check_abi(library: &Library, path: &Path, name: &'static [u8]) -> Result<(), LoadError> {
    let version: AbiVersionEntry = load_symbol(library, path, name)?;
    // SAFETY: takes no arguments and returns a plain integer
    let found = unsafe { version() };
    if found != ABI_VERSION {
        return Err(LoadError::AbiMismatch {
            path: path.to_path_buf(),
            found,
            expected: ABI_VERSION,
        });
    }
    Ok(())
}

fn null_entry(path: &Path, name: &'static [u8]) -> LoadError {
    LoadError::NullEntry {
        path: path.to_path_buf(),
        symbol: symbol_name(name),
    }
}

fn symbol_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name.strip_suffix(b"\0").unwrap_or(name)).into_owned()
}

/// Registry first, shared libraries second
#[derive(Debug, Default)]
pub struct HarnessLoader {
    registry: RegistryLoader,
    dylib: DylibLoader,
}

impl HarnessLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both strategies share the same extra roots
    pub fn with_search_paths(roots: Vec<PathBuf>) -> Self {
        Self {
            registry: RegistryLoader::with_search_paths(roots.clone()),
            dylib: DylibLoader::with_search_paths(roots),
        }
    }
}

impl ModuleLoader for HarnessLoader {
    fn load_challenge(&mut self, challenge_dir: &Path) -> Result<LoadedChallenge, LoadError> {
        let loaded = match self.registry.load_challenge(challenge_dir) {
            Ok(loaded) => loaded,
            Err(e) if e.is_absent() => {
                debug!("{}; trying shared library", e);
                self.dylib
                    .load_challenge(challenge_dir)
                    .map_err(|e| absent_to_unavailable(e, ModuleKind::Challenge, challenge_dir))?
            }
            Err(e) => return Err(e),
        };
        info!(
            challenge = loaded.challenge().name(),
            origin = %loaded.origin(),
            "loaded challenge"
        );
        Ok(loaded)
    }

    fn load_solution(&mut self, solution_path: &Path) -> Result<LoadedSolution, LoadError> {
        let loaded = match self.registry.load_solution(solution_path) {
            Ok(loaded) => loaded,
            Err(e) if e.is_absent() => {
                debug!("{}; trying shared library", e);
                self.dylib
                    .load_solution(solution_path)
                    .map_err(|e| absent_to_unavailable(e, ModuleKind::Solution, solution_path))?
            }
            Err(e) => return Err(e),
        };
        info!(origin = %loaded.origin(), "loaded solution");
        Ok(loaded)
    }

    fn search_path(&self) -> &SearchPath {
        self.registry.search_path()
    }
}

fn absent_to_unavailable(e: LoadError, kind: ModuleKind, path: &Path) -> LoadError {
    if e.is_absent() {
        LoadError::Unavailable {
            kind,
            path: path.to_path_buf(),
        }
    } else {
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernelcheck_core::{ChallengeDef, Signature, SolutionDef};

    struct Registered;

    impl Challenge for Registered {
        fn name(&self) -> &str {
            "Loader Test"
        }
        fn atol(&self) -> f64 {
            1e-5
        }
        fn rtol(&self) -> f64 {
            1e-5
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

    fn registered_solve(args: &mut KernelArgs) -> Result<(), KernelError> {
        args.insert("ran", true);
        Ok(())
    }

    inventory::submit! {
        ChallengeDef {
            key: "loader_tests/registered",
            constructor: || Box::new(Registered),
            file: file!(),
            line: line!(),
        }
    }

    inventory::submit! {
        SolutionDef {
            key: "loader_registered_solution",
            constructor: || Box::new(registered_solve as fn(&mut KernelArgs) -> Result<(), KernelError>),
            file: file!(),
            line: line!(),
        }
    }

    #[test]
    fn test_challenge_root() {
        assert_eq!(
            challenge_root(Path::new("challenges/easy/vector_add")),
            PathBuf::from("challenges")
        );
        assert_eq!(
            challenge_root(Path::new("easy/vector_add")),
            PathBuf::from(".")
        );
        assert_eq!(
            challenge_root(Path::new("./easy/vector_add")),
            PathBuf::from(".")
        );
        assert_eq!(
            challenge_root(Path::new("/srv/challenges/hard/gemm")),
            PathBuf::from("/srv/challenges")
        );
    }

    #[test]
    fn test_search_path_insert_is_idempotent() {
        let mut search_path = SearchPath::new();
        assert!(search_path.push("/opt/extra"));
        assert!(search_path.insert_front("challenges"));
        assert!(!search_path.insert_front("challenges"));
        assert!(!search_path.insert_front("./challenges"));
        assert_eq!(
            search_path.roots(),
            &[PathBuf::from("challenges"), PathBuf::from("/opt/extra")]
        );
    }

    #[test]
    fn test_relative_key() {
        let mut search_path = SearchPath::new();
        search_path.insert_front("challenges");
        assert_eq!(
            search_path.relative_key(Path::new("challenges/easy/vector_add")),
            Some("easy/vector_add".to_string())
        );

        let mut current = SearchPath::new();
        current.insert_front(".");
        assert_eq!(
            current.relative_key(Path::new("./easy/vector_add")),
            Some("easy/vector_add".to_string())
        );
    }

    #[test]
    fn test_solution_key_is_file_stem() {
        assert_eq!(
            solution_key(Path::new("solutions/vector_add.rs")).unwrap(),
            "vector_add"
        );
        assert!(solution_key(Path::new("/")).is_err());
    }

    #[test]
    fn test_registry_loader_resolves_nested_challenge() {
        let mut loader = RegistryLoader::new();
        let loaded = loader
            .load_challenge(Path::new("challenges/loader_tests/registered"))
            .unwrap();
        assert_eq!(loaded.challenge().name(), "Loader Test");
        assert_eq!(
            loaded.origin(),
            &ModuleOrigin::Registry {
                key: "loader_tests/registered".to_string()
            }
        );

        // Second load does not grow the search path
        loader
            .load_challenge(Path::new("challenges/loader_tests/registered"))
            .unwrap();
        assert_eq!(loader.search_path().roots().len(), 1);
    }

    #[test]
    fn test_registry_loader_solution() {
        let mut loader = RegistryLoader::new();
        let loaded = loader
            .load_solution(Path::new("solutions/loader_registered_solution.rs"))
            .unwrap();
        let mut args = KernelArgs::new();
        loaded.solve(&mut args).unwrap();
        assert!(args.bool("ran").unwrap());
    }

    #[test]
    fn test_registry_loader_unknown_key() {
        let mut loader = RegistryLoader::new();
        let err = loader
            .load_challenge(Path::new("challenges/loader_tests/missing"))
            .unwrap_err();
        assert!(matches!(err, LoadError::NotRegistered { ref key, .. } if key == "loader_tests/missing"));
    }

    #[test]
    fn test_dylib_loader_missing_library() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("easy").join("vector_add");
        std::fs::create_dir_all(&dir).unwrap();

        let mut loader = DylibLoader::new();
        let err = loader.load_challenge(&dir).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { kind: ModuleKind::Challenge, .. }));
        assert!(loader.search_path().contains(root.path()));
    }

    #[test]
    fn test_dylib_loader_rejects_invalid_library() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("easy").join("vector_add");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(libloading::library_filename(CHALLENGE_LIBRARY_STEM)),
            b"not a shared library",
        )
        .unwrap();

        let mut loader = DylibLoader::new();
        let err = loader.load_challenge(&dir).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn test_dylib_loader_probes_search_roots() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("easy").join("vector_add");
        std::fs::create_dir_all(&dir).unwrap();
        let flat = root
            .path()
            .join(libloading::library_filename("easy_vector_add"));
        std::fs::write(&flat, b"garbage").unwrap();

        let mut loader = DylibLoader::new();
        loader.search_path.insert_front(root.path());
        assert_eq!(loader.locate_challenge_library(&dir).unwrap(), flat);
    }

    #[test]
    fn test_dylib_solution_sibling_library() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("vector_add.rs");
        let library = root.path().join(libloading::library_filename("vector_add"));
        std::fs::write(&library, b"garbage").unwrap();

        assert_eq!(DylibLoader::locate_solution_library(&source).unwrap(), library);
        assert!(matches!(
            DylibLoader::locate_solution_library(&root.path().join("other.rs")),
            Err(LoadError::NotFound { kind: ModuleKind::Solution, .. })
        ));
    }

    #[test]
    fn test_harness_loader_prefers_registry() {
        let mut loader = HarnessLoader::new();
        let loaded = loader
            .load_challenge(Path::new("challenges/loader_tests/registered"))
            .unwrap();
        assert!(matches!(loaded.origin(), ModuleOrigin::Registry { .. }));
    }

    #[test]
    fn test_harness_loader_reports_unavailable() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("easy").join("nothing_here");
        std::fs::create_dir_all(&dir).unwrap();

        let mut loader = HarnessLoader::with_search_paths(vec![PathBuf::from("/opt/extra")]);
        let err = loader.load_challenge(&dir).unwrap_err();
        assert!(matches!(err, LoadError::Unavailable { kind: ModuleKind::Challenge, .. }));
        assert_eq!(loader.search_path().roots()[1], PathBuf::from("/opt/extra"));
    }

    #[test]
    fn test_symbol_name_strips_nul() {
        assert_eq!(symbol_name(CHALLENGE_SYMBOL), "kernelcheck_challenge");
    }
}
