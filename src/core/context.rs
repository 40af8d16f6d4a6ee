use std::{
    cell::OnceCell,
    collections::{BTreeMap, HashMap, HashSet},
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result, anyhow};
use colored::Colorize;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        analyzer::{self, Analyzer, Diagnostic, FileInput},
        collect::{FileImports, PackageDecls},
        file_scanner::scan_files,
        parsers::go::{ParsedGoFile, parse_go_source},
        types::{TypeStubs, check_file},
    },
    issues::ParseErrorIssue,
};

/// Diagnostics of every analyzed file, indexed by file path.
pub type AllDiagnostics = BTreeMap<String, Vec<Diagnostic>>;

/// Core analysis context driving the pipeline.
///
/// 1. **Collection**: imports and package-level declarations per package
/// 2. **Type resolution**: static types of expressions per file
/// 3. **Analysis**: classification of every call expression per file
///
/// Parsing and analysis run lazily on first access and are cached.
///
/// Configuration priority (highest to lowest): CLI arguments, `.optguard.json`,
/// built-in defaults.
pub struct CheckContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root directory.
    pub root_dir: PathBuf,

    /// All Go source files to analyze.
    pub files: HashSet<String>,

    /// Whether to print verbose diagnostic messages.
    pub verbose: bool,

    /// Analysis settings derived from `config`.
    pub analyzer: Analyzer,

    /// Built-in stubs merged with configured signatures.
    stubs: TypeStubs,

    parsed_files: OnceCell<HashMap<String, ParsedGoFile>>,
    parsed_files_errors: OnceCell<Vec<ParseErrorIssue>>,
    diagnostics: OnceCell<AllDiagnostics>,
}

impl CheckContext {
    /// Load configuration, apply CLI overrides and scan source files.
    ///
    /// # Errors
    ///
    /// Returns error if the config file is invalid or the source root is not valid UTF-8.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;

        let source_root = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let path = source_root
            .to_str()
            .with_context(|| anyhow!("Invalid path: {:?}", source_root))?;

        let config_result = load_config(Path::new(path))?;
        if verbose && !config_result.from_file {
            eprintln!(
                "Note: No {} found, using default configuration",
                CONFIG_FILE_NAME
            );
        }

        let mut config = config_result.config;
        if let Some(strategy) = common_args.strategy {
            config.strategy = strategy;
        }

        let analyzer = Analyzer::from_config(&config)?;
        let stubs = TypeStubs::with_signatures(&config.signatures)?;

        let scan_result = scan_files(
            path,
            &config.includes,
            &config.ignores,
            config.ignore_test_files,
            verbose,
        );

        if scan_result.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        debug!(
            root = %source_root.display(),
            files = scan_result.files.len(),
            strategy = %analyzer.strategy,
            "check context ready"
        );

        Ok(Self {
            config,
            root_dir: source_root,
            files: scan_result.files,
            verbose,
            analyzer,
            stubs,
            parsed_files: OnceCell::new(),
            parsed_files_errors: OnceCell::new(),
            diagnostics: OnceCell::new(),
        })
    }

    /// Parsed syntax tree of every source file (lazy initialization).
    ///
    /// Reading and parsing run in parallel. Files that cannot be read or parsed
    /// are reported through `parsed_files_errors()` instead.
    pub fn parsed_files(&self) -> &HashMap<String, ParsedGoFile> {
        self.parsed_files.get_or_init(|| {
            let parse_results: Vec<_> = self
                .files
                .par_iter()
                .map(|file_path| {
                    let parse_result = std::fs::read_to_string(file_path)
                        .map_err(|e| anyhow!("Failed to read file: {}", e))
                        .and_then(|code| parse_go_source(code, file_path));
                    (file_path.clone(), parse_result)
                })
                .collect();

            let mut parsed = HashMap::new();
            let mut errors = Vec::new();

            for (file_path, result) in parse_results {
                match result {
                    Ok(file) => {
                        parsed.insert(file_path, file);
                    }
                    Err(e) => {
                        if self.verbose {
                            eprintln!("{} {} - {}", "warning:".bold().yellow(), file_path, e);
                        }
                        errors.push(ParseErrorIssue {
                            file_path,
                            error: e.to_string(),
                        });
                    }
                }
            }

            let _ = self.parsed_files_errors.set(errors);
            parsed
        })
    }

    /// Files that could not be read or parsed.
    pub fn parsed_files_errors(&self) -> &Vec<ParseErrorIssue> {
        self.parsed_files();
        self.parsed_files_errors.get_or_init(Vec::new)
    }

    /// Diagnostics of all files (lazy initialization).
    ///
    /// # Errors
    ///
    /// Fails when a suggested fix cannot be built for a violating call.
    pub fn diagnostics(&self) -> Result<&AllDiagnostics> {
        if let Some(diagnostics) = self.diagnostics.get() {
            return Ok(diagnostics);
        }
        let diagnostics = analyze_files(self.parsed_files(), &self.analyzer, &self.stubs)?;
        Ok(self.diagnostics.get_or_init(|| diagnostics))
    }
}

/// Run collection, type resolution and analysis over every compilation unit.
pub fn analyze_files(
    parsed_files: &HashMap<String, ParsedGoFile>,
    analyzer: &Analyzer,
    stubs: &TypeStubs,
) -> Result<AllDiagnostics> {
    let units = compilation_units(parsed_files);
    debug!(units = units.len(), "analyzing compilation units");

    let results = units
        .par_iter()
        .map(|unit| analyze_unit(unit, analyzer, stubs))
        .collect::<Result<Vec<_>>>()?;

    Ok(results.into_iter().flatten().collect())
}

fn analyze_unit(
    files: &[&ParsedGoFile],
    analyzer: &Analyzer,
    stubs: &TypeStubs,
) -> Result<Vec<(String, Vec<Diagnostic>)>> {
    let Some(first) = files.first() else {
        return Ok(Vec::new());
    };

    let imports: Vec<FileImports> = files.iter().map(|file| FileImports::collect(file)).collect();
    let decls = PackageDecls::collect(
        &first.package_name,
        files.iter().copied().zip(imports.iter()),
        stubs,
    );

    files
        .par_iter()
        .zip(imports.par_iter())
        .map(|(file, imports)| {
            let types = check_file(file, imports, &decls, stubs);
            trace!(
                file = %file.file_path,
                resolved = types.resolved_count(),
                "type pass finished"
            );
            let input = FileInput {
                file,
                imports,
                types: &types,
            };
            let diagnostics = analyzer::run(analyzer, &input)
                .with_context(|| format!("Failed to analyze {}", file.file_path))?;
            Ok((file.file_path.clone(), diagnostics))
        })
        .collect()
}

/// Group files into Go packages: same directory and same package clause.
///
/// Units and the files inside them are ordered by path.
pub fn compilation_units(parsed_files: &HashMap<String, ParsedGoFile>) -> Vec<Vec<&ParsedGoFile>> {
    let mut units: BTreeMap<(PathBuf, &str), Vec<&ParsedGoFile>> = BTreeMap::new();
    for file in parsed_files.values() {
        let dir = Path::new(&file.file_path)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        units
            .entry((dir, file.package_name.as_str()))
            .or_default()
            .push(file);
    }

    units
        .into_values()
        .map(|mut files| {
            files.sort_by(|a, b| a.file_path.cmp(&b.file_path));
            files
        })
        .collect()
}
