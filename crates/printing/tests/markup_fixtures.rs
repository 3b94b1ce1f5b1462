use std::fs;
use std::path::PathBuf;

use printbridge_printing::{split_runs, strip_markup, StyleState};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Case {
    line: String,
    runs: Vec<ExpectedRun>,
    #[serde(default)]
    large_seen: bool,
}

#[derive(Debug, Deserialize)]
struct ExpectedRun {
    text: String,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    large: bool,
}

fn load_cases() -> Vec<Case> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("markup_runs.ron");
    let source = fs::read_to_string(&path).expect("read fixture");
    ron::from_str(&source).expect("parse fixture")
}

#[test]
fn fixture_lines_split_into_expected_runs() {
    for case in load_cases() {
        let actual = split_runs(&case.line);
        let actual_runs: Vec<(&str, StyleState)> = actual
            .runs
            .iter()
            .map(|run| (run.text, run.style))
            .collect();
        let expected_runs: Vec<(&str, StyleState)> = case
            .runs
            .iter()
            .map(|run| {
                (
                    run.text.as_str(),
                    StyleState::new(run.bold, run.italic, run.large),
                )
            })
            .collect();

        assert_eq!(actual_runs, expected_runs, "runs for {:?}", case.line);
        assert_eq!(actual.large_seen, case.large_seen, "large_seen for {:?}", case.line);
    }
}

#[test]
fn stripped_text_is_the_concatenated_runs() {
    for case in load_cases() {
        let joined: String = case.runs.iter().map(|run| run.text.as_str()).collect();
        assert_eq!(strip_markup(&case.line), joined, "strip {:?}", case.line);
    }
}
