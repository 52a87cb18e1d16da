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

use crate::checker::CTLModelChecker;
use crate::example_systems::*;
use crate::formula::Formula;
use crate::validation::ValidationManager;
use crate::Error;

use std::sync::Arc;
use std::time::Duration;

fn formulas() -> Vec<(String, Formula)> {
    let p = Formula::atomic("p");
    let q = Formula::atomic("q");
    vec![
        ("p".to_string(), p.clone()),
        ("reach q".to_string(), Formula::exists_eventually(q.clone())),
        ("always p".to_string(), Formula::for_all_always(p.clone())),
        ("p until q".to_string(), Formula::for_all_until(p.clone(), q.clone())),
        ("next".to_string(), Formula::for_all_next(p.clone() | q.clone())),
        (
            "response".to_string(),
            Formula::for_all_always(Formula::implies(p.clone(), Formula::for_all_eventually(q))),
        ),
        ("stuck".to_string(), Formula::exists_always(!Formula::exists_next(Formula::True))),
        ("not p".to_string(), !p),
    ]
}

#[test]
fn test_sequential() {
    let system = RandomSystem::default().generate(1);
    let reference = CTLModelChecker::new(system.clone());
    let manager = ValidationManager::new(system, formulas()).unwrap();

    let results = manager.validate_sequentially();
    assert_eq!(results.len(), formulas().len());
    for (name, formula) in formulas() {
        assert_eq!(results[&name], reference.check(&formula), "formula {}", name);
    }
}

#[test]
fn test_parallel_matches_sequential() {
    for seed in 0..10 {
        let system = RandomSystem::default().generate(seed);
        let sequential = ValidationManager::new(system.clone(), formulas())
            .unwrap()
            .validate_sequentially();

        let mut manager = ValidationManager::new(system, formulas()).unwrap();
        manager.set_num_threads(4);
        let parallel = manager.validate_parallel(Duration::from_secs(60)).unwrap();

        assert_eq!(sequential, parallel, "seed {}", seed);
    }
}

#[test]
fn test_single_thread() {
    let mut manager = ValidationManager::new(Ring::system(), formulas()).unwrap();
    manager.set_num_threads(1);
    let parallel = manager.validate_parallel(Duration::from_secs(60)).unwrap();
    assert_eq!(parallel, manager.validate_sequentially());
}

#[test]
fn test_duplicate_name() {
    let formulas = vec![
        ("a".to_string(), Formula::True),
        ("b".to_string(), Formula::False),
        ("a".to_string(), Formula::atomic("p")),
    ];
    match ValidationManager::new(TwoStates::system(), formulas) {
        Err(Error::DuplicateFormula(name)) => assert_eq!(name, "a"),
        r => panic!("expected a duplicate formula error, got {:?}", r),
    }
}

#[test]
fn test_empty() {
    let manager = ValidationManager::new(TwoStates::system(), Vec::new()).unwrap();
    assert!(manager.validate_sequentially().is_empty());
    assert!(manager.validate_parallel(Duration::from_secs(1)).unwrap().is_empty());
}

#[test]
fn test_timeout() {
    let q = Formula::atomic("q");
    let formulas = (0..8)
        .map(|i| {
            let mut f = q.clone();
            for _ in 0..=i {
                f = Formula::for_all_always(Formula::exists_eventually(f));
            }
            (format!("nested {}", i), f)
        })
        .collect::<Vec<_>>();
    let manager = ValidationManager::new(Chain::with_length(1500), formulas).unwrap();

    match manager.validate_parallel(Duration::from_nanos(1)) {
        Err(Error::Timeout(t)) => assert_eq!(t, Duration::from_nanos(1)),
        r => panic!("expected a timeout, got {:?}", r.map(|r| r.len())),
    }
}

#[test]
fn test_shared_cache() {
    let checker = Arc::new(CTLModelChecker::new(Ring::with_length(16)));
    let manager = ValidationManager::with_checker(checker.clone(), formulas()).unwrap();

    let parallel = manager.validate_parallel(Duration::from_secs(60)).unwrap();
    assert!(Arc::ptr_eq(manager.checker(), &checker));
    assert!(manager.checker().cached_formulas() > 0);

    // everything is cached now
    let lookups = checker.system().successor_lookups();
    let sequential = manager.validate_sequentially();
    assert_eq!(checker.system().successor_lookups(), lookups);
    assert_eq!(parallel, sequential);
}

#[test]
fn test_formula_order() {
    let manager = ValidationManager::new(TwoStates::system(), formulas()).unwrap();
    let names = manager.formulas().map(|(n, _)| n.to_string()).collect::<Vec<_>>();
    let expected = formulas().into_iter().map(|(n, _)| n).collect::<Vec<_>>();
    assert_eq!(names, expected);
}

#[test]
fn test_execution_error() {
    let failing = Formula::for_all_always(Formula::atomic("p"));
    let mut manager = ValidationManager::new(Ring::system(), formulas()).unwrap();
    manager.set_num_threads(2);

    let result = manager.run_parallel(Duration::from_secs(60), move |checker, formula| {
        if *formula == failing {
            panic!("cannot evaluate {}", formula);
        }
        checker.check(formula)
    });

    match result {
        Err(Error::ExecutionError { name, reason }) => {
            assert_eq!(name, "always p");
            assert_eq!(reason, "cannot evaluate AG p");
        }
        r => panic!("expected an execution error, got {:?}", r.map(|r| r.len())),
    }
}

#[test]
fn test_execution_error_single_thread() {
    let mut manager = ValidationManager::new(TwoStates::system(), formulas()).unwrap();
    manager.set_num_threads(1);

    let result = manager.run_parallel(Duration::from_secs(60), |_, formula| {
        panic!("cannot evaluate {}", formula);
    });

    match result {
        Err(Error::ExecutionError { name, .. }) => assert_eq!(name, "p"),
        r => panic!("expected an execution error, got {:?}", r.map(|r| r.len())),
    }
}
