use std::collections::BTreeSet;
use std::error::Error;

use watcherd::watch::ExtensionFilter;

type TestResult = Result<(), Box<dyn Error>>;

fn set(entries: &[&str]) -> Option<BTreeSet<String>> {
    Some(entries.iter().map(|s| s.to_string()).collect())
}

#[test]
fn include_and_exclude_interact_as_specified() -> TestResult {
    let filter = ExtensionFilter::new(set(&[".txt"]), set(&[".tmp"]));

    assert!(filter.include("a.txt"));
    assert!(!filter.include("a.tmp"), "not in include set");
    assert!(!filter.include("a.txt.tmp"), "exclude wins over include");
    assert!(!filter.include("a.csv"), "not included");
    Ok(())
}

#[test]
fn unrestricted_filter_passes_everything() -> TestResult {
    let filter = ExtensionFilter::new(None, None);
    assert!(filter.include("anything.at.all"));
    assert!(filter.include(""));
    Ok(())
}

#[test]
fn exclude_only_filter_rejects_matching_suffixes() -> TestResult {
    let filter = ExtensionFilter::new(None, set(&[".part", "~"]));
    assert!(filter.include("movie.mkv"));
    assert!(!filter.include("movie.mkv.part"));
    assert!(!filter.include("notes.txt~"));
    Ok(())
}

#[test]
fn suffix_match_is_verbatim_not_extension_aware() -> TestResult {
    // Entries are arbitrary suffix strings, dot or no dot.
    let filter = ExtensionFilter::new(set(&["txt"]), None);
    assert!(filter.include("a.txt"));
    assert!(filter.include("atxt"), "any suffix string matches as configured");

    let dotted = ExtensionFilter::new(set(&[".txt"]), None);
    assert!(!dotted.include("atxt"));
    Ok(())
}

#[test]
fn matching_is_case_sensitive() -> TestResult {
    let filter = ExtensionFilter::new(set(&[".txt"]), None);
    assert!(!filter.include("a.TXT"));
    Ok(())
}
