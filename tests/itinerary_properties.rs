//! Property-based invariant tests for the itinerary.
//!
//! 1. Ids are unique within each collection and never in both
//! 2. Reordering is a permutation of the selection
//! 3. Failed mutations leave the itinerary untouched
//! 4. Hiding and unhiding restores the candidate set
//! 5. Promotion grows the selection by one unless the id is already selected
//! 6. Moving points between collections never gains or loses one

use std::collections::HashSet;

use at_planner::{ClearPolicy, Itinerary, Point, PointId};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Load(Vec<u8>),
    Promote(u8),
    PromoteId(u8),
    Demote(usize),
    Reorder(usize, usize),
    Hide,
    Unhide,
    Clear(bool),
}

fn point(key: u8) -> Point {
    Point::new(format!("p{}", key), format!("Point {}", key), 35.0, 139.0 + key as f64 / 100.0)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(0u8..24, 0..12).prop_map(Op::Load),
        (0u8..24).prop_map(Op::Promote),
        (0u8..24).prop_map(Op::PromoteId),
        (0usize..12).prop_map(Op::Demote),
        (0usize..12, 0usize..12).prop_map(|(a, b)| Op::Reorder(a, b)),
        Just(Op::Hide),
        Just(Op::Unhide),
        any::<bool>().prop_map(Op::Clear),
    ]
}

fn apply(itinerary: &mut Itinerary, op: &Op) {
    match op {
        Op::Load(keys) => itinerary.load_candidates(keys.iter().copied().map(point)),
        Op::Promote(key) => {
            itinerary.promote(point(*key));
        }
        Op::PromoteId(key) => {
            itinerary.promote_id(&PointId::new(format!("p{}", key)));
        }
        Op::Demote(index) => {
            let _ = itinerary.demote(*index);
        }
        Op::Reorder(from, to) => {
            let _ = itinerary.reorder(*from, *to);
        }
        Op::Hide => itinerary.hide_candidates(),
        Op::Unhide => itinerary.unhide_candidates(),
        Op::Clear(recycle) => {
            let policy = if *recycle {
                ClearPolicy::Recycle
            } else {
                ClearPolicy::Discard
            };
            itinerary.clear_selection(policy);
        }
    }
}

fn ids(points: &[Point]) -> Vec<String> {
    points.iter().map(|p| p.id().to_string()).collect()
}

fn assert_invariants(itinerary: &Itinerary) -> Result<(), TestCaseError> {
    let candidates: HashSet<String> = ids(itinerary.candidates()).into_iter().collect();
    let selection: HashSet<String> = ids(itinerary.selection()).into_iter().collect();
    prop_assert_eq!(candidates.len(), itinerary.candidates().len(), "duplicate candidate id");
    prop_assert_eq!(selection.len(), itinerary.selection().len(), "duplicate selected id");
    prop_assert!(candidates.is_disjoint(&selection), "id in both collections");
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Uniqueness and disjointness hold after any operation sequence
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn collections_stay_unique_and_disjoint(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut itinerary = Itinerary::new();
        for op in &ops {
            apply(&mut itinerary, op);
            assert_invariants(&itinerary)?;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Reorder permutes the selection
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reorder_is_a_permutation(
        keys in prop::collection::hash_set(0u8..50, 1..10),
        from in 0usize..10,
        to in 0usize..10,
    ) {
        let mut itinerary = Itinerary::new();
        for key in &keys {
            itinerary.promote(point(*key));
        }
        let before = ids(itinerary.selection());
        let len = before.len();
        let result = itinerary.reorder(from, to);
        let after = ids(itinerary.selection());

        if from < len && to < len {
            prop_assert!(result.is_ok());
            prop_assert_eq!(&after[to], &before[from]);
            let mut sorted_before = before.clone();
            let mut sorted_after = after.clone();
            sorted_before.sort();
            sorted_after.sort();
            prop_assert_eq!(sorted_before, sorted_after);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(before, after);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Out-of-range demotion changes nothing
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn out_of_range_demote_is_rejected(
        selected in prop::collection::hash_set(0u8..50, 0..8),
        extra in 0usize..5,
    ) {
        let mut itinerary = Itinerary::new();
        for key in &selected {
            itinerary.promote(point(*key));
        }
        let before = itinerary.clone();
        let index = itinerary.selection().len() + extra;
        prop_assert!(itinerary.demote(index).is_err());
        prop_assert_eq!(before, itinerary);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Hide then unhide restores the candidates
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hide_unhide_restores_candidates(
        loaded in prop::collection::vec(0u8..30, 0..15),
        selected in prop::collection::vec(0u8..30, 0..5),
    ) {
        let mut itinerary = Itinerary::new();
        for key in &selected {
            itinerary.promote(point(*key));
        }
        itinerary.load_candidates(loaded.iter().copied().map(point));
        let before: HashSet<String> = ids(itinerary.candidates()).into_iter().collect();

        itinerary.hide_candidates();
        prop_assert!(itinerary.candidates().is_empty());
        itinerary.unhide_candidates();

        let after: HashSet<String> = ids(itinerary.candidates()).into_iter().collect();
        prop_assert_eq!(before, after);
        prop_assert!(!itinerary.is_hidden());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Promotion appends exactly once
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn promote_appends_once(
        loaded in prop::collection::vec(0u8..20, 0..10),
        key in 0u8..20,
    ) {
        let mut itinerary = Itinerary::new();
        itinerary.load_candidates(loaded.iter().copied().map(point));
        let len = itinerary.selection().len();

        prop_assert!(itinerary.promote(point(key)));
        prop_assert_eq!(itinerary.selection().len(), len + 1);
        prop_assert_eq!(itinerary.selection().last().map(|p| p.id().to_string()), Some(format!("p{}", key)));
        let promoted_id = PointId::new(format!("p{}", key));
        prop_assert!(itinerary.candidate(&promoted_id).is_none());

        prop_assert!(!itinerary.promote(point(key)));
        prop_assert_eq!(itinerary.selection().len(), len + 1);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Promote and demote conserve the loaded key set
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
enum Move {
    PromoteId(u8),
    Demote(usize),
    DemoteId(u8),
}

fn move_strategy() -> impl Strategy<Value = Move> {
    prop_oneof![
        (0u8..24).prop_map(Move::PromoteId),
        (0usize..12).prop_map(Move::Demote),
        (0u8..24).prop_map(Move::DemoteId),
    ]
}

proptest! {
    #[test]
    fn promote_and_demote_conserve_points(
        loaded in prop::collection::hash_set(0u8..24, 0..16),
        moves in prop::collection::vec(move_strategy(), 0..60),
    ) {
        let mut itinerary = Itinerary::new();
        itinerary.load_candidates(loaded.iter().copied().map(point));
        let expected: HashSet<String> = loaded.iter().map(|k| format!("p{}", k)).collect();

        for step in &moves {
            match step {
                Move::PromoteId(key) => {
                    itinerary.promote_id(&PointId::new(format!("p{}", key)));
                }
                Move::Demote(index) => {
                    let _ = itinerary.demote(*index);
                }
                Move::DemoteId(key) => {
                    let _ = itinerary.demote_id(&PointId::new(format!("p{}", key)));
                }
            }
            assert_invariants(&itinerary)?;
            let mut union: HashSet<String> = ids(itinerary.candidates()).into_iter().collect();
            union.extend(ids(itinerary.selection()));
            prop_assert_eq!(&union, &expected);
            prop_assert_eq!(
                itinerary.candidates().len() + itinerary.selection().len(),
                expected.len()
            );
        }
    }
}
