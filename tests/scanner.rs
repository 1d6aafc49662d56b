use filelens::core::scanner::FileScanner;
use std::fs;
use std::path::Path;

fn touch<P: AsRef<Path>>(p: P) {
    fs::write(p, "# test\n").unwrap();
}

#[test]
fn scanner_keeps_python_sources_only() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir_all(root.join("b")).unwrap();

    touch(root.join("a/main.py"));
    touch(root.join("a/stubs.pyi"));
    touch(root.join("b/app.js")); // ignored
    touch(root.join("b/readme.txt")); // ignored

    let scanner = FileScanner::new();
    let files = scanner.scan_directory(root).unwrap();

    let names: Vec<_> = files
        .iter()
        .map(|f| f.path.strip_prefix(root).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        names,
        vec![Path::new("a/main.py").to_path_buf(), Path::new("a/stubs.pyi").to_path_buf()]
    );
    assert!(files.iter().all(|f| f.language == "python"));
}

#[test]
fn scanner_skips_caches_and_virtualenvs() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("__pycache__")).unwrap();
    fs::create_dir_all(root.join(".venv/lib")).unwrap();

    touch(root.join("app.py"));
    touch(root.join("__pycache__/app.py"));
    touch(root.join(".venv/lib/site.py"));

    let files = FileScanner::new().scan_directory(root).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, root.join("app.py"));
}

#[test]
fn scanning_a_missing_directory_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(FileScanner::new()
        .scan_directory(&dir.path().join("missing"))
        .is_err());
}

#[test]
fn language_is_judged_by_extension() {
    assert_eq!(FileScanner::language_for_path(Path::new("x.py")), Some("python"));
    assert_eq!(FileScanner::language_for_path(Path::new("x.pyw")), Some("python"));
    assert_eq!(FileScanner::language_for_path(Path::new("x.rs")), None);
    assert_eq!(FileScanner::language_for_path(Path::new("Makefile")), None);
}
