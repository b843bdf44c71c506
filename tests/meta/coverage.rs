//! Keeps `tests/unit` mirroring `src` and wired into its test target

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    fn manifest_path(relative: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
    }

    // Entry points and module organization files
    fn is_harness_file(relative: &str) -> bool {
        let file_name = relative.rsplit('/').next().unwrap_or(relative);
        relative == "lib.rs" || file_name == "main.rs" || file_name == "mod.rs"
    }

    fn collect_relative_paths(dir: &Path, base: &Path) -> Result<HashSet<String>, io::Error> {
        let mut paths = HashSet::new();

        for entry_result in fs::read_dir(dir)? {
            let path = entry_result?.path();
            let relative_path = path
                .strip_prefix(base)
                .map_err(|_strip_error| io::Error::other("Failed to strip prefix"))?
                .to_string_lossy()
                .replace('\\', "/");

            if path.is_dir() {
                paths.extend(collect_relative_paths(&path, base)?);
                paths.insert(relative_path);
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                paths.insert(relative_path);
            }
        }

        Ok(paths)
    }

    fn src_and_unit_paths() -> (HashSet<String>, HashSet<String>) {
        let src_dir = manifest_path("src");
        let unit_dir = manifest_path("tests/unit");
        let src_paths = collect_relative_paths(&src_dir, &src_dir).unwrap_or_default();
        let unit_paths = collect_relative_paths(&unit_dir, &unit_dir).unwrap_or_default();
        assert!(!src_paths.is_empty(), "Failed to read {}", src_dir.display());
        (src_paths, unit_paths)
    }

    #[test]
    fn test_all_src_files_have_unit_tests() {
        let (src_paths, unit_paths) = src_and_unit_paths();

        let mut missing: Vec<&String> = src_paths
            .iter()
            .filter(|path| !is_harness_file(path) && !unit_paths.contains(*path))
            .collect();
        missing.sort();

        assert!(
            missing.is_empty(),
            "The following src files/directories are missing unit test counterparts:\n{}",
            missing
                .iter()
                .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let (src_paths, unit_paths) = src_and_unit_paths();

        let mut orphaned: Vec<&String> = unit_paths
            .iter()
            .filter(|path| !is_harness_file(path) && !src_paths.contains(*path))
            .collect();
        orphaned.sort();

        assert!(
            orphaned.is_empty(),
            "The following unit test files/directories have no corresponding src files:\n{}",
            orphaned
                .iter()
                .map(|path| format!("  - tests/unit/{path} -> src/{path} (missing)"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // A unit test file that no parent module declares is never compiled
    #[test]
    fn test_all_unit_tests_are_declared() {
        let unit_dir = manifest_path("tests/unit");
        let (_, unit_paths) = src_and_unit_paths();
        let mut undeclared = Vec::new();

        for path in &unit_paths {
            if is_harness_file(path) || !path.ends_with(".rs") {
                continue;
            }
            let relative = Path::new(path);
            let Some(stem) = relative.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let parent = relative.parent().unwrap_or_else(|| Path::new(""));
            let declaring = if parent.as_os_str().is_empty() {
                unit_dir.join("main.rs")
            } else {
                unit_dir.join(parent).join("mod.rs")
            };

            let declared = fs::read_to_string(&declaring)
                .is_ok_and(|content| content.contains(&format!("mod {stem};")));
            if !declared {
                undeclared.push(format!("  - tests/unit/{path} (in {})", declaring.display()));
            }
        }
        undeclared.sort();

        assert!(
            undeclared.is_empty(),
            "The following unit test files are not declared as modules:\n{}",
            undeclared.join("\n")
        );
    }

    fn check_test_files(dir: &Path, files_without_tests: &mut Vec<String>) -> io::Result<()> {
        for entry_result in fs::read_dir(dir)? {
            let path = entry_result?.path();

            if path.is_dir() {
                check_test_files(&path, files_without_tests)?;
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
                continue;
            }

            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if file_name == "main.rs" || file_name == "mod.rs" {
                continue;
            }

            if !fs::read_to_string(&path)?.contains("#[test]") {
                files_without_tests.push(format!("  - {}", path.display()));
            }
        }

        Ok(())
    }

    #[test]
    fn test_all_test_files_contain_tests() {
        let tests_dir = manifest_path("tests");
        let mut files_without_tests = Vec::new();

        if let Err(error) = check_test_files(&tests_dir, &mut files_without_tests) {
            assert!(
                !tests_dir.exists(),
                "Failed to scan tests directory: {error}"
            );
        }

        assert!(
            files_without_tests.is_empty(),
            "The following test files don't contain any #[test] functions:\n{}",
            files_without_tests.join("\n")
        );
    }
}
