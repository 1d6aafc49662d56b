use filelens::config::{ExtractOptions, ParameterPolicy};
use filelens::core::StructureExtractor;
use filelens::parsers::python::PythonParser;
use filelens::parsers::{cache::ParseCache, LanguageParser};
use std::fs;
use std::path::Path;

fn extract(file: &Path) -> filelens::core::StructuralRecord {
    let source = fs::read_to_string(file).unwrap();
    let unit = PythonParser::new().unwrap().parse_source(&source).unwrap();
    StructureExtractor::new().extract(&unit)
}

#[test]
fn parse_cache_stores_and_detects_updates() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("prog.py");
    fs::write(&file, "def a():\n    pass\n").unwrap();
    let options = ExtractOptions::default();

    let record = extract(&file);
    let cache = ParseCache::new(Some(dir.path().join("cache"))).unwrap();

    // Initially no cache, needs update should be true
    assert!(cache.needs_update(&file, &options).unwrap());

    cache.store(&file, &record, &options).unwrap();

    // Immediately after store, should not need update
    assert!(!cache.needs_update(&file, &options).unwrap());
    assert_eq!(cache.get(&file, &options), Some(record));

    // Modify file to force update
    fs::write(&file, "def a():\n    pass\n\ndef b():\n    pass\n").unwrap();

    assert!(cache.needs_update(&file, &options).unwrap());
    let new_record = extract(&file);
    assert_eq!(new_record.top_level_functions.len(), 2);
    cache.store(&file, &new_record, &options).unwrap();
    assert_eq!(cache.get(&file, &options), Some(new_record));
}

#[test]
fn entries_are_scoped_to_extraction_options() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("opts.py");
    fs::write(&file, "def f(a, *rest):\n    pass\n").unwrap();

    let positional = ExtractOptions::default();
    let all = ExtractOptions::default().with_parameter_policy(ParameterPolicy::All);

    let cache = ParseCache::in_memory_only();
    cache.store(&file, &extract(&file), &positional).unwrap();

    assert!(!cache.needs_update(&file, &positional).unwrap());
    assert!(cache.needs_update(&file, &all).unwrap());
    assert!(cache.get(&file, &all).is_none());
}

#[test]
fn disk_entries_survive_a_new_cache_instance() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("disk.py");
    fs::write(&file, "class K:\n    def m(self):\n        pass\n").unwrap();
    let cache_dir = dir.path().join("cache");
    let options = ExtractOptions::default();
    let record = extract(&file);

    ParseCache::new(Some(cache_dir.clone()))
        .unwrap()
        .store(&file, &record, &options)
        .unwrap();

    let reopened = ParseCache::new(Some(cache_dir)).unwrap();
    assert_eq!(reopened.stats().memory_entries, 0);
    assert_eq!(reopened.stats().disk_entries, 1);
    assert!(!reopened.needs_update(&file, &options).unwrap());
    assert_eq!(reopened.get(&file, &options), Some(record));
    assert_eq!(reopened.stats().memory_entries, 1);

    reopened.clear().unwrap();
    assert_eq!(reopened.stats().disk_entries, 0);
    assert!(reopened.needs_update(&file, &options).unwrap());
}
