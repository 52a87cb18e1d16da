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

use crate::formula::Formula;

use maplit::btreeset;

fn p() -> Formula {
    Formula::atomic("p")
}

fn q() -> Formula {
    Formula::atomic("q")
}

fn all_operators() -> Vec<Formula> {
    vec![
        Formula::True,
        Formula::False,
        p(),
        !p(),
        p() & q(),
        p() | q(),
        Formula::implies(p(), q()),
        Formula::iff(p(), q()),
        Formula::exists_next(p()),
        Formula::for_all_next(p()),
        Formula::exists_always(p()),
        Formula::for_all_always(p()),
        Formula::exists_eventually(p()),
        Formula::for_all_eventually(p()),
        Formula::exists_until(p(), q()),
        Formula::for_all_until(p(), q()),
        Formula::for_all_always(Formula::implies(p(), Formula::for_all_eventually(q()))),
        Formula::iff(Formula::exists_next(p() | q()), Formula::for_all_until(!q(), p())),
    ]
}

#[test]
fn test_rewrite_rules() {
    assert_eq!((p() | q()).simplify(), !(!p() & !q()));
    assert_eq!(Formula::implies(p(), q()).simplify(), !(!!p() & !q()));
    assert_eq!(
        Formula::iff(p(), q()).simplify(),
        !(!!p() & !q()) & !(!!q() & !p())
    );
    assert_eq!(
        Formula::for_all_always(p()).simplify(),
        !Formula::exists_until(Formula::True, !p())
    );
    assert_eq!(
        Formula::exists_eventually(p()).simplify(),
        Formula::exists_until(Formula::True, p())
    );
    assert_eq!(Formula::for_all_eventually(p()).simplify(), !Formula::exists_always(!p()));
    assert_eq!(
        Formula::for_all_until(p(), q()).simplify(),
        !Formula::exists_until(!q(), !p() & !q()) & !Formula::exists_always(!q())
    );
}

#[test]
fn test_basis_is_kept() {
    let basic = vec![
        Formula::True,
        Formula::False,
        p(),
        !p(),
        p() & q(),
        Formula::exists_next(p()),
        Formula::for_all_next(p()),
        Formula::exists_always(p()),
        Formula::exists_until(p(), q()),
    ];
    for f in basic {
        assert!(f.is_basic(), "{} should be basic", f);
        assert_eq!(f.simplify(), f);
    }
}

#[test]
fn test_nested_rewrite() {
    let f = Formula::exists_next(Formula::exists_eventually(p() | q()));
    assert_eq!(
        f.simplify(),
        Formula::exists_next(Formula::exists_until(Formula::True, !(!p() & !q())))
    );
}

#[test]
fn test_simplify_idempotent() {
    for f in all_operators() {
        let s = f.simplify();
        assert!(s.is_basic(), "simplification of {} is not basic: {}", f, s);
        assert_eq!(s.simplify(), s);
    }
}

#[test]
fn test_or_structurally_equivalent() {
    for f in all_operators() {
        for g in all_operators() {
            assert_eq!(
                Formula::or(f.clone(), g.clone()).simplify(),
                (!(!f.clone() & !g.clone())).simplify()
            );
        }
    }
}

#[test]
fn test_display() {
    assert_eq!(Formula::True.to_string(), "true");
    assert_eq!((!p()).to_string(), "!p");
    assert_eq!((p() & q()).to_string(), "(p && q)");
    assert_eq!((p() | q()).to_string(), "(p || q)");
    assert_eq!(Formula::implies(p(), q()).to_string(), "(p -> q)");
    assert_eq!(Formula::iff(p(), q()).to_string(), "(p <-> q)");
    assert_eq!(Formula::for_all_next(p()).to_string(), "AX p");
    assert_eq!(Formula::exists_until(p(), q()).to_string(), "E[p U q]");
    assert_eq!(
        Formula::for_all_always(Formula::for_all_until(p(), Formula::False)).to_string(),
        "AG A[p U false]"
    );
}

#[test]
fn test_atomic_propositions() {
    let f = Formula::for_all_until(p() & Formula::atomic("r"), Formula::exists_next(q() | p()));
    assert_eq!(f.atomic_propositions(), btreeset! {"p", "q", "r"});
    assert!(Formula::True.atomic_propositions().is_empty());
}

#[test]
fn test_from_bool() {
    assert_eq!(Formula::from(true), Formula::True);
    assert_eq!(Formula::from(false), Formula::False);
}
