use super::*;
use shared::models::Operator;

/// Deterministic pick at a fixed index, clamped to the candidate count.
struct Pick(usize);

impl OperatorChoice for Pick {
    fn pick(&mut self, count: usize) -> usize {
        self.0.min(count - 1)
    }
}

fn refs(operators: &[Operator]) -> Vec<&Operator> {
    operators.iter().collect()
}

#[test]
fn test_empty_chain_resolves_to_nothing() {
    let ops = [operator(1, "Anna")];
    let index = index_for(&business(), &ops, &[], &[]);
    let caps = CapabilityMap::from_services(&[service(1, 30, &[1])]);
    assert_eq!(
        resolve_assignment(m(9, 0), &[], &refs(&ops), &index, &caps, &mut FirstChoice),
        None
    );
}

#[test]
fn test_no_preference_keeps_whole_chain_on_one_operator() {
    let ops = [operator(1, "Anna"), operator(2, "Zoe")];
    let index = index_for(&business(), &ops, &[], &[]);
    let caps = CapabilityMap::from_services(&[service(1, 30, &[1, 2]), service(2, 45, &[1, 2])]);
    let chain = [item(1, 30), item(2, 45)];

    let assigned =
        resolve_assignment(m(9, 0), &chain, &refs(&ops), &index, &caps, &mut FirstChoice);
    assert_eq!(assigned, Some(vec![1, 1]));
}

#[test]
fn test_choice_seam_selects_among_qualifying_operators() {
    let ops = [operator(1, "Anna"), operator(2, "Zoe")];
    let index = index_for(&business(), &ops, &[], &[]);
    let caps = CapabilityMap::from_services(&[service(1, 30, &[1, 2])]);
    let chain = [item(1, 30)];

    let assigned =
        resolve_assignment(m(9, 0), &chain, &refs(&ops), &index, &caps, &mut Pick(1));
    assert_eq!(assigned, Some(vec![2]));
}

#[test]
fn test_whole_chain_walks_the_cursor() {
    // Anna is busy during the second service's window only; the whole
    // chain moves to Zoe rather than splitting.
    let ops = [operator(1, "Anna"), operator(2, "Zoe")];
    let occupancy = [busy(1, m(10, 0), m(10, 30))];
    let index = index_for(&business(), &ops, &[], &occupancy);
    let caps = CapabilityMap::from_services(&[service(1, 30, &[1, 2]), service(2, 45, &[1, 2])]);
    let chain = [item(1, 30), item(2, 45)];

    let assigned =
        resolve_assignment(m(9, 0), &chain, &refs(&ops), &index, &caps, &mut FirstChoice);
    assert_eq!(assigned, Some(vec![2, 2]));
}

#[test]
fn test_unique_preference_forces_that_operator_for_the_chain() {
    let ops = [operator(1, "Anna"), operator(2, "Zoe")];
    let index = index_for(&business(), &ops, &[], &[]);
    let caps = CapabilityMap::from_services(&[service(1, 30, &[1, 2]), service(2, 30, &[1, 2])]);
    let chain = [item_with(1, 30, 2), item(2, 30)];

    let assigned =
        resolve_assignment(m(9, 0), &chain, &refs(&ops), &index, &caps, &mut FirstChoice);
    assert_eq!(assigned, Some(vec![2, 2]));
}

#[test]
fn test_preference_is_strict_even_when_others_are_free() {
    let ops = [operator(1, "Anna"), operator(2, "Zoe")];
    let occupancy = [busy(1, m(9, 0), m(9, 30))];
    let index = index_for(&business(), &ops, &[], &occupancy);
    let caps = CapabilityMap::from_services(&[service(1, 30, &[1, 2]), service(2, 30, &[1, 2])]);
    let chain = [item_with(1, 30, 1), item(2, 30)];

    let assigned =
        resolve_assignment(m(9, 0), &chain, &refs(&ops), &index, &caps, &mut FirstChoice);
    assert_eq!(assigned, None);
}

#[test]
fn test_distinct_preferences_assign_per_service() {
    let ops = [operator(1, "Anna"), operator(2, "Zoe")];
    let index = index_for(&business(), &ops, &[], &[]);
    let caps = CapabilityMap::from_services(&[service(1, 30, &[1, 2]), service(2, 30, &[1, 2])]);
    let chain = [item_with(1, 30, 1), item_with(2, 30, 2)];

    let assigned =
        resolve_assignment(m(9, 0), &chain, &refs(&ops), &index, &caps, &mut FirstChoice);
    assert_eq!(assigned, Some(vec![1, 2]));
}

#[test]
fn test_column_continuity_beats_name_order() {
    // Two distinct preferences rule out a single-operator chain; the
    // unconstrained third service sticks with Zoe, the previous
    // operator, even though Anna sorts first.
    let ops = [operator(1, "Anna"), operator(2, "Zoe")];
    let index = index_for(&business(), &ops, &[], &[]);
    let caps = CapabilityMap::from_services(&[
        service(1, 30, &[1, 2]),
        service(2, 30, &[1, 2]),
        service(3, 30, &[1, 2]),
    ]);
    let chain = [item_with(1, 30, 1), item_with(2, 30, 2), item(3, 30)];

    let assigned =
        resolve_assignment(m(9, 0), &chain, &refs(&ops), &index, &caps, &mut FirstChoice);
    assert_eq!(assigned, Some(vec![1, 2, 2]));
}

#[test]
fn test_fallback_to_name_order_when_previous_operator_is_taken() {
    let ops = [operator(1, "Anna"), operator(2, "Zoe")];
    // Zoe is busy during the third service's window
    let occupancy = [busy(2, m(10, 0), m(10, 30))];
    let index = index_for(&business(), &ops, &[], &occupancy);
    let caps = CapabilityMap::from_services(&[
        service(1, 30, &[1, 2]),
        service(2, 30, &[1, 2]),
        service(3, 30, &[1, 2]),
    ]);
    let chain = [item_with(1, 30, 1), item_with(2, 30, 2), item(3, 30)];

    let assigned =
        resolve_assignment(m(9, 0), &chain, &refs(&ops), &index, &caps, &mut FirstChoice);
    assert_eq!(assigned, Some(vec![1, 2, 1]));
}

#[test]
fn test_no_partial_assignment_when_only_capable_operator_is_busy() {
    let ops = [operator(1, "Anna"), operator(2, "Zoe")];
    let occupancy = [busy(2, m(9, 30), m(10, 0))];
    let index = index_for(&business(), &ops, &[], &occupancy);
    let caps = CapabilityMap::from_services(&[service(1, 30, &[1, 2]), service(2, 30, &[2])]);
    let chain = [item(1, 30), item(2, 30)];

    let assigned =
        resolve_assignment(m(9, 0), &chain, &refs(&ops), &index, &caps, &mut FirstChoice);
    assert_eq!(assigned, None);
}

#[test]
fn test_preferred_operator_must_be_capable() {
    let ops = [operator(1, "Anna"), operator(2, "Zoe")];
    let index = index_for(&business(), &ops, &[], &[]);
    let caps = CapabilityMap::from_services(&[service(2, 30, &[2])]);
    let chain = [item_with(2, 30, 1)];

    let assigned =
        resolve_assignment(m(9, 0), &chain, &refs(&ops), &index, &caps, &mut FirstChoice);
    assert_eq!(assigned, None);
}

#[test]
fn test_shifted_start_clears_the_conflict() {
    // S1 doable by both, S2 only by Zoe, Zoe busy 09:30-10:00. Starting
    // at 09:00 puts S2 exactly on the conflict; starting at 08:30 puts
    // S2 at 09:00-09:30 and the chain lands whole on Zoe.
    let mut info = business();
    info.opening_time = "08:00".to_string();
    info.active_opening_time = "08:00".to_string();

    let ops = [operator(1, "Anna"), operator(2, "Zoe")];
    let occupancy = [busy(2, m(9, 30), m(10, 0))];
    let index = index_for(&info, &ops, &[], &occupancy);
    let caps = CapabilityMap::from_services(&[service(1, 30, &[1, 2]), service(2, 30, &[2])]);
    let chain = [item(1, 30), item(2, 30)];

    let at_nine =
        resolve_assignment(m(9, 0), &chain, &refs(&ops), &index, &caps, &mut FirstChoice);
    assert_eq!(at_nine, None);

    let at_half_past_eight =
        resolve_assignment(m(8, 30), &chain, &refs(&ops), &index, &caps, &mut FirstChoice);
    assert_eq!(at_half_past_eight, Some(vec![2, 2]));
}
