// PartialCTL: Checking CTL Properties on Partially Explored State Spaces
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

use crate::ts::loader::{DEFAULT_LABEL_PREFIX, DEFAULT_SINK};
use crate::ts::{load, parse, FormatError, LoaderOptions, TransitionSystem, TransitionSystemBuilder};

use maplit::{hashmap, hashset};
use rand::prelude::*;
use std::fs;
use std::path::PathBuf;

const TRANSITIONS: &str = "-1 -> 0
0 -> 1
0 -> 2
1 -> -2
2
3
";

const LABELS: &str = "0=prop_p 1=prop_q
0: 0
2: 0 1
-1: 1
";

fn parse_default(transitions: &str, labels: &str) -> Result<TransitionSystem, FormatError> {
    parse(transitions, labels, &LoaderOptions::default())
}

#[test]
fn test_parse() {
    let ts = parse_default(TRANSITIONS, LABELS).unwrap();

    assert_eq!(ts.state_count(), 3);
    assert_eq!(ts.successors_of(0), Some(&hashset! {1, 2}));
    assert_eq!(ts.successors_of(1), Some(&hashset! {}));
    assert_eq!(ts.successors_of(2), None);
    assert_eq!(ts.partial_states(), &hashset! {1, 2});

    let p = ts.index_of("p").unwrap();
    let q = ts.index_of("q").unwrap();
    assert_eq!(ts.states_labelled(p), hashset! {0, 2});
    assert_eq!(ts.states_labelled(q), hashset! {2});
    assert_eq!(ts.index_of("prop_p"), None);
}

#[test]
fn test_parse_empty_partial_line_and_labels() {
    let ts = parse_default("0 -> 1\n\n2\n", "").unwrap();
    assert_eq!(ts.state_count(), 2);
    assert!(ts.is_fully_explored());
    assert_eq!(ts.propositions().count(), 0);

    // trailing blank lines are ignored
    let ts = parse_default("0 -> 1\n\n2\n\n\n", "0=prop_p\n1: 0\n\n").unwrap();
    assert_eq!(ts.states_labelled(0), hashset! {1});
}

#[test]
fn test_parse_custom_options() {
    let options = LoaderOptions {
        sink: 99,
        label_prefix: "ap:".to_string(),
        translation: hashmap! {"p".to_string() => "ready".to_string()},
        delete_sources: false,
    };
    let ts = parse("0 -> 99\n-1 -> 0\n\n1\n", "0=ap:p 1=ap:q\n0: 0 1\n", &options).unwrap();

    assert!(ts.is_partial(0));
    assert_eq!(ts.successors_of(0), Some(&hashset! {}));
    assert_eq!(ts.index_of("ready"), Some(0));
    assert_eq!(ts.index_of("p"), None);
    assert_eq!(ts.index_of("q"), Some(1));
}

#[test]
fn test_transition_errors() {
    match parse_default("0 -> 1\n0 => 2\n\n3\n", LABELS) {
        Err(FormatError::UnexpectedToken { file, line, content }) => {
            assert_eq!(file, "<transitions>");
            assert_eq!(line, 2);
            assert_eq!(content, "0 => 2");
        }
        r => panic!("unexpected result: {:?}", r),
    }

    let e = parse_default("0 -> 5\n\n3\n", LABELS).unwrap_err();
    assert!(matches!(e, FormatError::StateOutOfRange { line: 1, state: 5, num_states: 3, .. }));

    let e = parse_default("-3 -> 1\n\n3\n", LABELS).unwrap_err();
    assert!(matches!(e, FormatError::StateOutOfRange { line: 1, state: -3, .. }));

    let e = parse_default("0 -> x\n\n3\n", LABELS).unwrap_err();
    assert!(matches!(e, FormatError::InvalidNumber { line: 1, .. }));

    let e = parse_default("0 -> 1\n\nthree\n", LABELS).unwrap_err();
    assert!(matches!(e, FormatError::InvalidNumber { line: 3, .. }));

    let e = parse_default("0 -> 1\n7\n3\n", LABELS).unwrap_err();
    assert!(matches!(e, FormatError::StateOutOfRange { line: 2, state: 7, .. }));

    let e = parse_default("3\n", LABELS).unwrap_err();
    assert!(matches!(e, FormatError::MissingFooter { line: 1, .. }));
    assert_eq!(e.line(), Some(1));
    assert_eq!(e.file(), "<transitions>");
}

#[test]
fn test_label_errors() {
    let e = parse_default(TRANSITIONS, "0=p\n").unwrap_err();
    assert!(matches!(e, FormatError::UnexpectedToken { line: 1, .. }));
    assert_eq!(e.file(), "<labels>");

    let e = parse_default(TRANSITIONS, "0=prop_p\n1 0\n").unwrap_err();
    assert!(matches!(e, FormatError::UnexpectedToken { line: 2, .. }));

    let e = parse_default(TRANSITIONS, "0=prop_p\n1: 3\n").unwrap_err();
    assert!(matches!(e, FormatError::UnknownProposition { line: 2, index: 3, .. }));

    let e = parse_default(TRANSITIONS, "0=prop_p 1=prop_p\n").unwrap_err();
    assert!(matches!(e, FormatError::DuplicateProposition { line: 1, .. }));

    let e = parse_default(TRANSITIONS, "0=prop_p 0=prop_q\n").unwrap_err();
    assert!(matches!(e, FormatError::UnexpectedToken { line: 1, .. }));

    let e = parse_default(TRANSITIONS, "0=prop_p 1=prop_\n").unwrap_err();
    assert!(matches!(
        e,
        FormatError::UnexpectedToken { line: 1, ref content, .. } if content == "1=prop_"
    ));

    let e = parse_default(TRANSITIONS, "0=prop_p\n7: 0\n").unwrap_err();
    assert!(matches!(e, FormatError::StateOutOfRange { line: 2, state: 7, .. }));
}

fn random_system(seed: u64) -> TransitionSystem {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = rng.gen_range(1, 30);
    let mut b = TransitionSystemBuilder::new(n);
    b.add_proposition("p");
    b.add_proposition("q");
    for _ in 0..rng.gen_range(0, 3 * n) {
        b.add_edge(rng.gen_range(0, n), rng.gen_range(0, n));
    }
    for _ in 0..rng.gen_range(0, n) {
        let s = rng.gen_range(0, n);
        if rng.gen_bool(0.5) {
            b.add_unknown_edge(s);
        } else {
            b.mark_partial(s);
        }
    }
    for s in 0..n {
        if rng.gen_bool(0.3) {
            b.add_label("p", s);
        }
        if rng.gen_bool(0.3) {
            b.add_label("q", s);
        }
    }
    b.build().unwrap()
}

#[test]
fn test_round_trip() {
    for seed in 0..50 {
        let ts = random_system(seed);

        let mut transitions = Vec::new();
        let mut labels = Vec::new();
        ts.write_transitions(&mut transitions, DEFAULT_SINK).unwrap();
        ts.write_labels(&mut labels, DEFAULT_LABEL_PREFIX).unwrap();

        let loaded = parse_default(
            &String::from_utf8(transitions).unwrap(),
            &String::from_utf8(labels).unwrap(),
        )
        .unwrap();
        assert_eq!(loaded, ts, "round trip failed for seed {}", seed);
    }
}

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("partialctl_{}_{}", std::process::id(), name));
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_files() {
    let t = temp_file("load_t.txt", TRANSITIONS);
    let l = temp_file("load_l.txt", LABELS);

    let ts = load(&t, &l, &LoaderOptions::default()).unwrap();
    assert_eq!(ts, parse_default(TRANSITIONS, LABELS).unwrap());
    assert!(t.exists());
    assert!(l.exists());

    let options = LoaderOptions { delete_sources: true, ..Default::default() };
    load(&t, &l, &options).unwrap();
    assert!(!t.exists());
    assert!(!l.exists());
}

#[test]
fn test_load_errors_keep_files() {
    let t = temp_file("bad_t.txt", "0 -> 1\n0 -> 7\n\n2\n");
    let l = temp_file("bad_l.txt", LABELS);

    let options = LoaderOptions { delete_sources: true, ..Default::default() };
    let e = load(&t, &l, &options).unwrap_err();
    assert_eq!(e.line(), Some(2));
    assert_eq!(e.file(), t.display().to_string());
    assert!(t.exists());
    assert!(l.exists());

    fs::remove_file(&t).unwrap();
    let e = load(&t, &l, &options).unwrap_err();
    assert!(matches!(e, FormatError::Io { .. }));
    assert_eq!(e.line(), None);
    fs::remove_file(&l).unwrap();
}
