use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;

/// Patterns without `*` or `?` are literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
pub struct ScanResult {
    pub files: HashSet<String>,
    pub skipped_count: usize,
}

/// Collect the Go source files under `base_dir`.
///
/// `includes` narrows the scan to directories (literal or glob); `ignore_patterns`
/// removes paths by glob or by literal directory prefix.
pub fn scan_files(
    base_dir: &str,
    includes: &[String],
    ignore_patterns: &[String],
    ignore_test_files: bool,
    verbose: bool,
) -> ScanResult {
    let mut files: HashSet<String> = HashSet::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignore_paths.push(Path::new(base_dir).join(p));
        }
    }

    if ignore_test_files {
        for p in TEST_FILE_PATTERNS {
            if let Ok(pattern) = Pattern::new(p) {
                glob_patterns.push(pattern);
            }
        }
    }

    let dirs_to_scan: Vec<PathBuf> = if includes.is_empty() {
        vec![Path::new(base_dir).to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                let full_pattern = Path::new(base_dir).join(inc);
                match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => {
                        paths.extend(entries.flatten().filter(|entry| entry.is_dir()));
                    }
                    Err(e) => {
                        if verbose {
                            eprintln!(
                                "{} Invalid glob pattern '{}': {}",
                                "warning:".bold().yellow(),
                                inc,
                                e
                            );
                        }
                    }
                }
            } else {
                let path = Path::new(base_dir).join(inc);
                if path.exists() {
                    paths.push(path);
                } else if verbose {
                    eprintln!(
                        "{} Include path does not exist: {}",
                        "warning:".bold().yellow(),
                        path.display()
                    );
                }
            }
        }
        paths
    };

    for dir in dirs_to_scan {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };
            let path = entry.path();
            let path_str = path.to_string_lossy();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }
            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if path.is_file() && is_go_file(path) {
                files.insert(path_str.into());
            }
        }
    }

    tracing::debug!(files = files.len(), skipped_count, "scanned source files");

    ScanResult {
        files,
        skipped_count,
    }
}

fn is_go_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("go")
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_scan_go_files() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("main.go")).unwrap();
        File::create(dir_path.join("repo.go")).unwrap();
        File::create(dir_path.join("go.mod")).unwrap();
        File::create(dir_path.join("README.md")).unwrap();

        let result = scan_files(dir_path.to_str().unwrap(), &[], &[], false, false);

        assert_eq!(result.files.len(), 2);
        assert!(result.files.iter().any(|f| f.ends_with("main.go")));
        assert!(result.files.iter().any(|f| f.ends_with("repo.go")));
        assert_eq!(result.skipped_count, 0);
    }

    #[test]
    fn test_scan_ignores_vendor() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let vendor = dir_path.join("vendor").join("github.com").join("uptrace");
        fs::create_dir_all(&vendor).unwrap();
        File::create(vendor.join("bun.go")).unwrap();
        File::create(dir_path.join("main.go")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &[],
            &["**/vendor/**".to_owned()],
            false,
            false,
        );

        assert_eq!(result.files.len(), 1);
        assert!(!result.files.iter().any(|f| f.contains("vendor")));
    }

    #[test]
    fn test_scan_nested_packages() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let repo = dir_path.join("internal").join("repo");
        fs::create_dir_all(&repo).unwrap();
        File::create(repo.join("user.go")).unwrap();

        let cmd = dir_path.join("cmd");
        fs::create_dir(&cmd).unwrap();
        File::create(cmd.join("main.go")).unwrap();

        let result = scan_files(dir_path.to_str().unwrap(), &[], &[], false, false);

        assert_eq!(result.files.len(), 2);
        assert!(result.files.iter().any(|f| f.ends_with("internal/repo/user.go")));
        assert!(result.files.iter().any(|f| f.ends_with("cmd/main.go")));
    }

    #[test]
    fn test_is_go_file() {
        assert!(is_go_file(Path::new("main.go")));
        assert!(is_go_file(Path::new("user_test.go")));
        assert!(!is_go_file(Path::new("go.mod")));
        assert!(!is_go_file(Path::new("go.sum")));
        assert!(!is_go_file(Path::new("Makefile")));
    }

    #[test]
    fn test_scan_with_includes() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let internal = dir_path.join("internal");
        fs::create_dir(&internal).unwrap();
        File::create(internal.join("repo.go")).unwrap();

        let tools = dir_path.join("tools");
        fs::create_dir(&tools).unwrap();
        File::create(tools.join("gen.go")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["internal".to_owned(), "nonexistent".to_owned()],
            &[],
            false,
            false,
        );

        assert_eq!(result.files.len(), 1);
        assert!(result.files.iter().any(|f| f.ends_with("internal/repo.go")));
    }

    #[test]
    fn test_scan_with_glob_include() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let user = dir_path.join("services").join("user");
        fs::create_dir_all(&user).unwrap();
        File::create(user.join("repo.go")).unwrap();

        let order = dir_path.join("services").join("order");
        fs::create_dir_all(&order).unwrap();
        File::create(order.join("repo.go")).unwrap();

        File::create(dir_path.join("main.go")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["services/*".to_owned()],
            &[],
            false,
            false,
        );

        assert_eq!(result.files.len(), 2);
        assert!(!result.files.iter().any(|f| f.ends_with("/main.go")));
    }

    #[test]
    fn test_scan_ignores_test_files() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("repo.go")).unwrap();
        File::create(dir_path.join("repo_test.go")).unwrap();

        let ignored = scan_files(dir_path.to_str().unwrap(), &[], &[], true, false);
        assert_eq!(ignored.files.len(), 1);
        assert!(ignored.files.iter().any(|f| f.ends_with("repo.go")));

        let kept = scan_files(dir_path.to_str().unwrap(), &[], &[], false, false);
        assert_eq!(kept.files.len(), 2);
    }

    #[test]
    fn test_scan_deduplicates_overlapping_includes() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let repo = dir_path.join("internal").join("repo");
        fs::create_dir_all(&repo).unwrap();
        File::create(repo.join("user.go")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["internal".to_owned(), "internal/repo".to_owned()],
            &[],
            false,
            false,
        );

        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_scan_ignores_literal_directory_path() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let repo = dir_path.join("internal").join("repo");
        fs::create_dir_all(&repo).unwrap();
        File::create(repo.join("user.go")).unwrap();

        let generated = dir_path.join("internal").join("generated");
        fs::create_dir_all(&generated).unwrap();
        File::create(generated.join("models.go")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &[],
            &["internal/generated".to_owned()],
            false,
            false,
        );

        assert_eq!(result.files.len(), 1);
        assert!(!result.files.iter().any(|f| f.contains("generated")));
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("services/*"));
        assert!(is_glob_pattern("**/*_gen.go"));
        assert!(is_glob_pattern("file?.go"));
        assert!(!is_glob_pattern("internal"));
        assert!(!is_glob_pattern("internal/repo"));
    }
}
