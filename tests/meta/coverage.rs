//! Structural checks on the test tree
//!
//! `tests/unit/` mirrors `src/` file for file, and every mirrored file has to be
//! reachable from the harness root through `mod` declarations, or it would
//! never be compiled.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    const SRC: &str = "src";
    const UNIT: &str = "tests/unit";

    /// Module declarations (`mod name;` or `pub mod name;`) in one file
    fn declared_modules(file: &Path) -> io::Result<BTreeSet<String>> {
        let content = fs::read_to_string(file)?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter_map(|line| {
                line.strip_prefix("pub mod ")
                    .or_else(|| line.strip_prefix("mod "))
                    .and_then(|rest| rest.strip_suffix(';'))
                    .map(str::to_string)
            })
            .collect())
    }

    /// Modules that live directly in `dir`: `.rs` files by stem and subdirectories by name
    fn modules_in(dir: &Path) -> io::Result<BTreeSet<String>> {
        let mut modules = BTreeSet::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let is_module_file = path.extension().is_some_and(|ext| ext == "rs")
                && !matches!(stem, "main" | "lib" | "mod");
            if path.is_dir() || is_module_file {
                modules.insert(stem.to_string());
            }
        }
        Ok(modules)
    }

    /// Every `.rs` file under `dir`, relative to `dir`, excluding harness and module roots
    fn mirrored_files(dir: &Path) -> io::Result<BTreeSet<PathBuf>> {
        let mut files = BTreeSet::new();
        let mut pending = vec![dir.to_path_buf()];
        while let Some(current) = pending.pop() {
            for entry in fs::read_dir(&current)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                    continue;
                }
                let is_root = path
                    .file_name()
                    .is_some_and(|name| name == "main.rs" || name == "lib.rs" || name == "mod.rs");
                if path.extension().is_some_and(|ext| ext == "rs")
                    && !is_root
                    && let Ok(relative) = path.strip_prefix(dir)
                {
                    files.insert(relative.to_path_buf());
                }
            }
        }
        Ok(files)
    }

    /// Directories whose modules are missing from the directory's root file
    fn undeclared(dir: &Path, root_file: &str) -> io::Result<Vec<String>> {
        let mut problems = Vec::new();
        let mut pending = vec![(dir.to_path_buf(), dir.join(root_file))];
        while let Some((current, root)) = pending.pop() {
            let declared = declared_modules(&root)?;
            for module in modules_in(&current)? {
                if !declared.contains(&module) {
                    problems.push(format!("  - {} does not declare `{module}`", root.display()));
                }
                let child = current.join(&module);
                if child.is_dir() {
                    pending.push((child.clone(), child.join("mod.rs")));
                }
            }
        }
        Ok(problems)
    }

    fn listing(paths: &BTreeSet<PathBuf>, prefix: &str) -> String {
        paths
            .iter()
            .map(|path| format!("  - {prefix}/{}", path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Tests src and tests/unit hold the same module files
    // Verified by adding a src file without a mirror
    #[test]
    fn test_unit_tree_mirrors_src() {
        let (Ok(sources), Ok(units)) = (
            mirrored_files(Path::new(SRC)),
            mirrored_files(Path::new(UNIT)),
        ) else {
            unreachable!("src and tests/unit should be readable");
        };

        let untested: BTreeSet<PathBuf> = sources.difference(&units).cloned().collect();
        let orphaned: BTreeSet<PathBuf> = units.difference(&sources).cloned().collect();

        assert!(
            untested.is_empty(),
            "Source files without a unit test mirror:\n{}",
            listing(&untested, SRC)
        );
        assert!(
            orphaned.is_empty(),
            "Unit test files without a source counterpart:\n{}",
            listing(&orphaned, UNIT)
        );
    }

    // Tests every mirrored unit test file is reachable from tests/unit/main.rs
    // Verified by dropping a directory from the harness root
    #[test]
    fn test_unit_modules_declared() {
        let Ok(problems) = undeclared(Path::new(UNIT), "main.rs") else {
            unreachable!("tests/unit should be readable");
        };
        assert!(
            problems.is_empty(),
            "Unit test modules that are never compiled:\n{}",
            problems.join("\n")
        );
    }

    // Tests every source file is reachable from src/lib.rs
    // Verified by removing a module declaration from a mod.rs
    #[test]
    fn test_src_modules_declared() {
        let Ok(problems) = undeclared(Path::new(SRC), "lib.rs") else {
            unreachable!("src should be readable");
        };
        assert!(
            problems.is_empty(),
            "Source modules that are never compiled:\n{}",
            problems.join("\n")
        );
    }

    // Tests every mirrored unit test file holds at least one test
    // Verified by emptying a test module
    #[test]
    fn test_unit_files_contain_tests() {
        let Ok(units) = mirrored_files(Path::new(UNIT)) else {
            unreachable!("tests/unit should be readable");
        };

        let empty: BTreeSet<PathBuf> = units
            .into_iter()
            .filter(|file| {
                !fs::read_to_string(Path::new(UNIT).join(file))
                    .is_ok_and(|content| content.contains("#[test]"))
            })
            .collect();

        assert!(
            empty.is_empty(),
            "Unit test files without any #[test] function:\n{}",
            listing(&empty, UNIT)
        );
    }
}
