//! LCM slot allocation with cyclic backfill.
//!
//! The slot table has `L = lcm(1..N)` slots for `N` configured next-hops, so
//! that any number of reachable survivors from 1 to N divides the table
//! evenly. Each slot is homed to the entry at sorted position `slot mod N`;
//! slots homed to unreachable entries are backfilled round-robin across the
//! distinct reachable addresses. The result is a pure function of the
//! candidate set.

use std::net::IpAddr;

use nhmgr_common::{NhMgrError, NhMgrResult};

use crate::types::NexthopSet;

/// A computed slot table for one next-hop group.
///
/// Slot `i` carries the address traffic in forwarding slot `i` is sent to.
/// Recomputed in full on every trigger, never patched incrementally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    slots: Vec<IpAddr>,
}

impl Assignment {
    /// Total slot count (`lcm(1..N)`).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// The full slot table, indexed by slot number.
    pub fn slots(&self) -> &[IpAddr] {
        &self.slots
    }

    /// The address assigned to a slot.
    pub fn slot(&self, index: usize) -> Option<IpAddr> {
        self.slots.get(index).copied()
    }

    /// Distinct addresses in first-slot order, each with its total slot
    /// count. These are the per-next-hop forwarding weights.
    pub fn address_weights(&self) -> Vec<(IpAddr, usize)> {
        slot_weights(&self.slots)
    }
}

/// Distinct addresses of a slot table in first-slot order, each with its
/// total slot count.
pub fn slot_weights(slots: &[IpAddr]) -> Vec<(IpAddr, usize)> {
    let mut weights: Vec<(IpAddr, usize)> = Vec::new();
    for addr in slots {
        match weights.iter_mut().find(|(a, _)| a == addr) {
            Some((_, count)) => *count += 1,
            None => weights.push((*addr, 1)),
        }
    }
    weights
}

/// Least common multiple of every integer in `1..=n`, in checked `u64`
/// arithmetic.
///
/// Grows combinatorially (n = 10 gives 2520); overflow is surfaced rather
/// than wrapped so a misconfigured huge group can never truncate silently.
fn lcm_run(n: usize) -> NhMgrResult<u64> {
    let mut lcm: u64 = 1;
    for k in 2..=n as u64 {
        let gcd = gcd(lcm, k);
        lcm = (lcm / gcd)
            .checked_mul(k)
            .ok_or(NhMgrError::Overflow { nexthops: n })?;
    }
    Ok(lcm)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Hard cap on slot table size. `lcm(1..=18)` = 12,252,240 still fits;
/// `lcm(1..=19)` = 232,792,560 would not be materializable as a table.
const MAX_TABLE_SLOTS: u64 = 16_000_000;

/// Computes the slot assignment for the given candidate set.
///
/// Returns `Ok(None)` when the group must be removed: either no next-hop is
/// configured or none is reachable. Dependent static routing fails over on
/// removal instead of forwarding into a dead path.
///
/// A group whose table would exceed [`MAX_TABLE_SLOTS`] fails with
/// [`NhMgrError::Overflow`] before anything is allocated, so the caller
/// keeps its previous assignment.
pub fn allocate(set: &NexthopSet) -> NhMgrResult<Option<Assignment>> {
    let n = set.len();
    if n == 0 {
        return Ok(None);
    }

    let table = lcm_run(n)?;
    if table > MAX_TABLE_SLOTS {
        return Err(NhMgrError::overflow(n));
    }
    let table_size = table as usize;

    let entries = set.entries();
    let mut slots: Vec<Option<IpAddr>> = vec![None; table_size];
    // Reachable addresses in slot-visitation order (duplicates allowed)
    let mut active: Vec<IpAddr> = Vec::new();
    // Slots homed to unreachable entries, ascending
    let mut pending: Vec<usize> = Vec::new();

    for (i, slot) in slots.iter_mut().enumerate() {
        let home = &entries[i % n];
        match home.parsed_address() {
            Some(addr) if home.reachable => {
                *slot = Some(addr);
                active.push(addr);
            }
            _ => pending.push(i),
        }
    }

    if active.is_empty() {
        return Ok(None);
    }

    // Cyclic backfill: distinct reachable addresses in first-appearance
    // order, walked by slot index modulo the sequence length.
    let mut cycle: Vec<IpAddr> = Vec::new();
    for addr in &active {
        if !cycle.contains(addr) {
            cycle.push(*addr);
        }
    }
    for (walk, slot_index) in pending.iter().enumerate() {
        slots[*slot_index] = Some(cycle[walk % cycle.len()]);
    }

    let slots = slots
        .into_iter()
        .map(|s| s.ok_or_else(|| NhMgrError::internal("slot left unassigned after backfill")))
        .collect::<NhMgrResult<Vec<IpAddr>>>()?;

    Ok(Some(Assignment { slots }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nhmgr_common::ConfigEntry;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    /// Builds a set where `addresses[i]` sits at index i and `reachable`
    /// holds per-entry reachability.
    fn set_with(addresses: &[&str], reachable: &[bool]) -> NexthopSet {
        let config: Vec<ConfigEntry> = addresses
            .iter()
            .enumerate()
            .map(|(i, a)| ConfigEntry::new(i.to_string(), *a))
            .collect();
        let mut set = NexthopSet::rebuild(&config);
        for (entry, up) in set.entries_mut().iter_mut().zip(reachable) {
            entry.reachable = *up;
        }
        set
    }

    #[test]
    fn test_lcm_run_small_values() {
        assert_eq!(lcm_run(1).unwrap(), 1);
        assert_eq!(lcm_run(2).unwrap(), 2);
        assert_eq!(lcm_run(3).unwrap(), 6);
        assert_eq!(lcm_run(4).unwrap(), 12);
        assert_eq!(lcm_run(5).unwrap(), 60);
        assert_eq!(lcm_run(10).unwrap(), 2520);
    }

    #[test]
    fn test_lcm_run_overflow() {
        match lcm_run(100) {
            Err(NhMgrError::Overflow { nexthops }) => assert_eq!(nexthops, 100),
            other => panic!("expected overflow, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_table_is_rejected() {
        // lcm(1..23) = 5,354,228,880 fits in u64 but is far past the table
        // cap; the group must fail as Overflow, not attempt the allocation.
        let addresses: Vec<String> = (1..=23).map(|i| format!("10.0.{}.1", i)).collect();
        let addr_refs: Vec<&str> = addresses.iter().map(|s| s.as_str()).collect();
        let set = set_with(&addr_refs, &vec![true; 23]);

        assert!(matches!(
            allocate(&set),
            Err(NhMgrError::Overflow { nexthops: 23 })
        ));
    }

    #[test]
    fn test_allocate_overflow_is_loud() {
        let addresses: Vec<String> = (1..=100).map(|i| format!("10.0.{}.1", i)).collect();
        let addr_refs: Vec<&str> = addresses.iter().map(|s| s.as_str()).collect();
        let set = set_with(&addr_refs, &vec![true; 100]);

        assert!(matches!(
            allocate(&set),
            Err(NhMgrError::Overflow { nexthops: 100 })
        ));
    }

    // Scenario: three reachable next-hops expand to a perfectly balanced
    // six-slot table.
    #[test]
    fn test_three_reachable() {
        let set = set_with(
            &["10.0.0.1", "10.0.0.2", "10.0.0.3"],
            &[true, true, true],
        );
        let assignment = allocate(&set).unwrap().unwrap();

        assert_eq!(assignment.len(), 6);
        let expected: Vec<IpAddr> = ["10.0.0.1", "10.0.0.2", "10.0.0.3"]
            .iter()
            .cycle()
            .take(6)
            .map(|s| ip(*s))
            .collect();
        assert_eq!(assignment.slots(), expected.as_slice());
    }

    // Scenario: middle next-hop fails, its home slots (1 and 4) are
    // reassigned round-robin to the survivors in index order.
    #[test]
    fn test_one_unreachable_backfills_round_robin() {
        let set = set_with(
            &["10.0.0.1", "10.0.0.2", "10.0.0.3"],
            &[true, false, true],
        );
        let assignment = allocate(&set).unwrap().unwrap();

        assert_eq!(assignment.len(), 6);
        assert_eq!(assignment.slot(1), Some(ip("10.0.0.1")));
        assert_eq!(assignment.slot(4), Some(ip("10.0.0.3")));

        let weights = assignment.address_weights();
        assert_eq!(weights, vec![(ip("10.0.0.1"), 3), (ip("10.0.0.3"), 3)]);
    }

    #[test]
    fn test_single_nexthop() {
        let set = set_with(&["10.0.0.1"], &[true]);
        let assignment = allocate(&set).unwrap().unwrap();

        assert_eq!(assignment.len(), 1);
        assert_eq!(assignment.slot(0), Some(ip("10.0.0.1")));
    }

    #[test]
    fn test_empty_set_removes_group() {
        assert_eq!(allocate(&NexthopSet::new()).unwrap(), None);
    }

    #[test]
    fn test_all_unreachable_removes_group() {
        let set = set_with(&["10.0.0.1", "10.0.0.2"], &[false, false]);
        assert_eq!(allocate(&set).unwrap(), None);
    }

    #[test]
    fn test_fully_reachable_perfect_balance() {
        for n in 1..=8usize {
            let addresses: Vec<String> = (1..=n).map(|i| format!("10.0.0.{}", i)).collect();
            let addr_refs: Vec<&str> = addresses.iter().map(|s| s.as_str()).collect();
            let set = set_with(&addr_refs, &vec![true; n]);

            let assignment = allocate(&set).unwrap().unwrap();
            let table_size = lcm_run(n).unwrap() as usize;
            assert_eq!(assignment.len(), table_size);

            let weights = assignment.address_weights();
            assert_eq!(weights.len(), n);
            for (_, count) in weights {
                assert_eq!(count, table_size / n);
            }
        }
    }

    #[test]
    fn test_partial_failure_stays_balanced() {
        // One failed entry: every slot maps to a survivor and total slot
        // counts differ by at most one across survivors.
        for n in 2..=7usize {
            let addresses: Vec<String> = (1..=n).map(|i| format!("10.0.0.{}", i)).collect();
            let addr_refs: Vec<&str> = addresses.iter().map(|s| s.as_str()).collect();
            let mut reachable = vec![true; n];
            reachable[n - 1] = false;
            let set = set_with(&addr_refs, &reachable);

            let assignment = allocate(&set).unwrap().unwrap();
            let failed = ip(&format!("10.0.0.{}", n));
            assert!(assignment.slots().iter().all(|a| *a != failed));

            let weights = assignment.address_weights();
            assert_eq!(weights.len(), n - 1);
            let max = weights.iter().map(|(_, c)| *c).max().unwrap();
            let min = weights.iter().map(|(_, c)| *c).min().unwrap();
            assert!(max - min <= 1, "n={}: max={} min={}", n, max, min);
        }
    }

    #[test]
    fn test_allocation_is_idempotent() {
        let set = set_with(
            &["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4"],
            &[true, false, true, false],
        );
        assert_eq!(allocate(&set).unwrap(), allocate(&set).unwrap());
    }

    #[test]
    fn test_resize_is_independent_of_previous_table() {
        // 3 entries, then the config shrinks to 2: the new table is
        // lcm(1..2) = 2 slots, no residue from the old 6-slot table.
        let before = set_with(
            &["10.0.0.1", "10.0.0.2", "10.0.0.3"],
            &[true, true, true],
        );
        assert_eq!(allocate(&before).unwrap().unwrap().len(), 6);

        let after = set_with(&["10.0.0.1", "10.0.0.2"], &[true, true]);
        let assignment = allocate(&after).unwrap().unwrap();
        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment.slot(0), Some(ip("10.0.0.1")));
        assert_eq!(assignment.slot(1), Some(ip("10.0.0.2")));
    }

    #[test]
    fn test_backfill_sequence_is_deduplicated() {
        // Two entries share address .1; the backfill cycle is the distinct
        // reachable addresses [.1, .2], not the raw visitation sequence
        // [.1, .1, .2, ...] that would bias toward .1.
        let set = set_with(
            &["10.0.0.1", "10.0.0.1", "10.0.0.2", "10.0.0.3"],
            &[true, true, true, false],
        );
        let assignment = allocate(&set).unwrap().unwrap();

        // L = 12, pending home slots of entry 3 are 3, 7, 11.
        assert_eq!(assignment.len(), 12);
        assert_eq!(assignment.slot(3), Some(ip("10.0.0.1")));
        assert_eq!(assignment.slot(7), Some(ip("10.0.0.2")));
        assert_eq!(assignment.slot(11), Some(ip("10.0.0.1")));
    }

    #[test]
    fn test_malformed_address_excluded_from_participation() {
        // A reachable flag on a malformed address cannot happen after a
        // refresh, but the allocator still treats it as unreachable.
        let set = set_with(&["10.0.0.1", "not-an-ip"], &[true, true]);
        let assignment = allocate(&set).unwrap().unwrap();

        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment.slot(0), Some(ip("10.0.0.1")));
        assert_eq!(assignment.slot(1), Some(ip("10.0.0.1")));
    }

    #[test]
    fn test_ipv6_nexthops() {
        let set = set_with(&["2001:db8::1", "2001:db8::2"], &[true, false]);
        let assignment = allocate(&set).unwrap().unwrap();

        assert_eq!(assignment.slots(), &[ip("2001:db8::1"), ip("2001:db8::1")]);
    }
}
