//! Operator assignment for one candidate start time.
//!
//! Layered tie-break policy, highest priority first:
//! 1. one operator for the whole chain (continuity for the client)
//! 2. explicit per-service preference, honored strictly
//! 3. same operator as the previous service in the chain
//! 4. any remaining capable, available operator in name order

use std::collections::BTreeSet;

use rand::Rng;
use shared::models::Operator;

use super::availability::AvailabilityIndex;
use super::capability::CapabilityMap;
use super::interval::Interval;

/// Selection among equally valid whole-chain operators.
///
/// Only consulted when no explicit preference exists anywhere in the
/// request; every other path is deterministic.
pub trait OperatorChoice {
    /// Pick an index in `0..count`; `count` is at least 1.
    fn pick(&mut self, count: usize) -> usize;
}

/// Uniform random pick, spreading load across operators.
pub struct RandomChoice;

impl OperatorChoice for RandomChoice {
    fn pick(&mut self, count: usize) -> usize {
        rand::thread_rng().gen_range(0..count)
    }
}

/// Always the first candidate. Deterministic alternative to
/// [`RandomChoice`].
pub struct FirstChoice;

impl OperatorChoice for FirstChoice {
    fn pick(&mut self, _count: usize) -> usize {
        0
    }
}

/// One service occurrence in the requested chain.
#[derive(Debug, Clone, Copy)]
pub struct ChainItem {
    pub service_id: i64,
    pub duration_min: i64,
    pub preferred_operator_id: Option<i64>,
}

/// Try to assign an operator to every chain item starting at `start`.
///
/// `operators` must already be in deterministic evaluation order
/// (name, then id). Returns one operator id per chain item, or None
/// when no complete assignment exists; partial assignments are never
/// returned.
pub fn resolve_assignment(
    start: i64,
    chain: &[ChainItem],
    operators: &[&Operator],
    index: &AvailabilityIndex,
    capabilities: &CapabilityMap,
    choice: &mut dyn OperatorChoice,
) -> Option<Vec<i64>> {
    if chain.is_empty() {
        return None;
    }

    let service_ids: Vec<i64> = chain.iter().map(|c| c.service_id).collect();
    let whole_chain_fits = |op_id: i64| -> bool {
        if !capabilities.can_perform_all(&service_ids, op_id) {
            return false;
        }
        let mut cursor = start;
        for item in chain {
            let sub = Interval::new(cursor, cursor + item.duration_min);
            if !index.is_available(op_id, sub) {
                return false;
            }
            cursor = sub.end;
        }
        true
    };

    let mut explicit: BTreeSet<i64> = BTreeSet::new();
    for item in chain {
        if let Some(p) = item.preferred_operator_id {
            explicit.insert(p);
        }
    }

    match explicit.len() {
        // No preferences anywhere: any operator capable and free for the
        // whole chain wins, picked through the choice seam.
        0 => {
            let qualifying: Vec<i64> = operators
                .iter()
                .filter(|op| whole_chain_fits(op.id))
                .map(|op| op.id)
                .collect();
            if !qualifying.is_empty() {
                let picked = qualifying[choice.pick(qualifying.len())];
                return Some(vec![picked; chain.len()]);
            }
        }
        // One explicitly chosen operator: a single-operator chain is only
        // valid with exactly that operator.
        1 => {
            if let Some(&p) = explicit.iter().next() {
                if whole_chain_fits(p) {
                    return Some(vec![p; chain.len()]);
                }
            }
        }
        // Different explicit operators can never share the whole chain.
        _ => {}
    }

    // Cascade: walk the chain forward, strict on preferences, preferring
    // the previous operator for continuity, then name order.
    let mut assigned: Vec<i64> = Vec::with_capacity(chain.len());
    let mut cursor = start;
    for item in chain {
        let sub = Interval::new(cursor, cursor + item.duration_min);
        let op_id = match item.preferred_operator_id {
            Some(p) => {
                if !capabilities.can_perform(item.service_id, p) {
                    return None;
                }
                if !index.is_available(p, sub) {
                    return None;
                }
                p
            }
            None => {
                let mut candidates: Vec<i64> = operators
                    .iter()
                    .map(|op| op.id)
                    .filter(|&id| capabilities.can_perform(item.service_id, id))
                    .collect();
                if let Some(prev) = assigned.last().copied() {
                    if let Some(pos) = candidates.iter().position(|&id| id == prev) {
                        candidates.remove(pos);
                        candidates.insert(0, prev);
                    }
                }
                candidates.into_iter().find(|&id| index.is_available(id, sub))?
            }
        };
        assigned.push(op_id);
        cursor = sub.end;
    }
    Some(assigned)
}
