//! Maximum common substructure mapper.
//!
//! Finds the largest connected set of atom pairs whose induced bond graphs
//! agree in both molecules. The search grows a mapping from every compatible
//! seed pair, branching on the lowest-indexed frontier atom of molecule A
//! (map it to each compatible neighbour in B, or exclude it). Seeds are
//! searched in parallel and share the best size found so far for pruning.

use super::{AtomMapper, AtomMapping};
use crate::error::{MappingError, Result};
use crate::molecule::Molecule;
use rayon::prelude::*;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default search time limit.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Configuration for [`McsMapper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McsOptions {
    /// Allow heavy atoms of different elements to map onto each other.
    /// Hydrogens only ever map to hydrogens.
    pub element_change: bool,

    /// Require mapped bonds to have the same bond order.
    pub match_bond_order: bool,

    /// Ring atoms and bonds only map to ring atoms and bonds.
    pub ring_matches_ring_only: bool,

    /// Drop ring atoms that do not lie on a fully mapped cycle.
    pub complete_rings_only: bool,

    /// Search time limit. On expiry the best mapping found so far is used.
    pub timeout: Duration,
}

impl Default for McsOptions {
    fn default() -> Self {
        Self {
            element_change: true,
            match_bond_order: false,
            ring_matches_ring_only: true,
            complete_rings_only: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl McsOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether elements may change.
    #[must_use]
    pub const fn element_change(mut self, allow: bool) -> Self {
        self.element_change = allow;
        self
    }

    /// Sets whether bond orders must match.
    #[must_use]
    pub const fn match_bond_order(mut self, required: bool) -> Self {
        self.match_bond_order = required;
        self
    }

    /// Sets whether ring atoms only match ring atoms.
    #[must_use]
    pub const fn ring_matches_ring_only(mut self, required: bool) -> Self {
        self.ring_matches_ring_only = required;
        self
    }

    /// Sets whether partial rings are removed.
    #[must_use]
    pub const fn complete_rings_only(mut self, required: bool) -> Self {
        self.complete_rings_only = required;
        self
    }

    /// Sets the search time limit.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// MCS-based atom mapper. Suggests one mapping, or none when the molecules
/// share no atoms under the configured rules.
#[derive(Debug, Clone, Default)]
pub struct McsMapper {
    options: McsOptions,
}

impl McsMapper {
    /// Creates a mapper with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mapper with the given options.
    #[must_use]
    pub const fn with_options(options: McsOptions) -> Self {
        Self { options }
    }

    /// Returns the options.
    #[must_use]
    pub const fn options(&self) -> &McsOptions {
        &self.options
    }

    /// Computes the mapped `(a, b)` pairs, sorted by A index.
    fn common_substructure(&self, mol_a: &Molecule, mol_b: &Molecule) -> Vec<(usize, usize)> {
        let search = Search::new(mol_a, mol_b, &self.options);

        let seeds: Vec<(usize, usize)> = (0..mol_a.atom_count())
            .flat_map(|i| (0..mol_b.atom_count()).map(move |j| (i, j)))
            .filter(|&(i, j)| search.atoms_compatible(i, j))
            .collect();
        debug!(seeds = seeds.len(), "searching common substructure");

        let best = seeds
            .par_iter()
            .enumerate()
            .map(|(rank, &(i, j))| (rank, search.grow_from(i, j)))
            .reduce_with(|x, y| {
                if y.1.len() > x.1.len() || (y.1.len() == x.1.len() && y.0 < x.0) {
                    y
                } else {
                    x
                }
            })
            .map(|(_, pairs)| pairs)
            .unwrap_or_default();

        if search.timed_out.load(Ordering::Relaxed) {
            warn!(
                timeout_secs = self.options.timeout.as_secs_f64(),
                size = best.len(),
                "MCS search timed out, using best mapping found"
            );
        }

        let mut pairs = if self.options.complete_rings_only {
            search.complete_rings(best)
        } else {
            best
        };
        pairs = search.largest_fragment(pairs);
        pairs.sort_unstable();
        pairs
    }
}

impl AtomMapper for McsMapper {
    fn suggest_mappings(&self, mol_a: &Molecule, mol_b: &Molecule) -> Result<Vec<AtomMapping>> {
        if self.options.timeout.is_zero() {
            return Err(MappingError::InvalidConfig {
                reason: "timeout must be > 0".to_string(),
            }
            .into());
        }

        let pairs = self.common_substructure(mol_a, mol_b);
        debug!(
            mol_a = mol_a.name(),
            mol_b = mol_b.name(),
            mapped = pairs.len(),
            "MCS mapping complete"
        );
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![AtomMapping::new(mol_a, mol_b, pairs)?])
    }

    fn name(&self) -> &'static str {
        "mcs"
    }

    fn description(&self) -> &'static str {
        "Maximum common connected substructure over the bond graph"
    }
}

/// Shared, read-only search context.
struct Search<'a> {
    mol_a: &'a Molecule,
    mol_b: &'a Molecule,
    options: &'a McsOptions,
    adj_a: Vec<Vec<usize>>,
    adj_b: Vec<Vec<usize>>,
    ring_atoms_a: Vec<bool>,
    ring_atoms_b: Vec<bool>,
    ring_bonds_a: HashSet<(usize, usize)>,
    ring_bonds_b: HashSet<(usize, usize)>,
    deadline: Instant,
    best_size: AtomicUsize,
    timed_out: AtomicBool,
}

/// Per-seed mutable state.
struct State {
    a_to_b: Vec<Option<usize>>,
    b_to_a: Vec<Option<usize>>,
    excluded: Vec<bool>,
    pairs: Vec<(usize, usize)>,
}

impl State {
    fn push(&mut self, i: usize, j: usize) {
        self.a_to_b[i] = Some(j);
        self.b_to_a[j] = Some(i);
        self.pairs.push((i, j));
    }

    fn pop(&mut self) {
        if let Some((i, j)) = self.pairs.pop() {
            self.a_to_b[i] = None;
            self.b_to_a[j] = None;
        }
    }
}

fn adjacency(mol: &Molecule) -> Vec<Vec<usize>> {
    (0..mol.atom_count())
        .map(|i| {
            let mut n: Vec<usize> = mol.neighbors(i).collect();
            n.sort_unstable();
            n
        })
        .collect()
}

fn ring_bond_set(mol: &Molecule) -> HashSet<(usize, usize)> {
    mol.bonds()
        .zip(mol.ring_bonds())
        .filter(|(_, ring)| *ring)
        .map(|((a, b, _), _)| (a.min(b), a.max(b)))
        .collect()
}

/// Counts atoms reachable from `mapped` atoms through atoms for which
/// `open` holds, excluding the mapped atoms themselves.
fn reachable(adj: &[Vec<usize>], mapped: impl Fn(usize) -> bool, open: impl Fn(usize) -> bool) -> usize {
    let mut seen = vec![false; adj.len()];
    let mut queue: VecDeque<usize> = (0..adj.len()).filter(|&i| mapped(i)).collect();
    let mut count = 0;
    while let Some(current) = queue.pop_front() {
        for &next in &adj[current] {
            if !seen[next] && !mapped(next) && open(next) {
                seen[next] = true;
                count += 1;
                queue.push_back(next);
            }
        }
    }
    count
}

/// Whether `i` lies on a cycle of the subgraph induced by `members`.
fn on_member_cycle(adj: &[Vec<usize>], members: &[bool], i: usize) -> bool {
    adj[i].iter().filter(|&&x| members[x]).any(|&x| {
        let mut seen = vec![false; adj.len()];
        seen[i] = true;
        let mut queue = VecDeque::new();
        for &y in &adj[i] {
            if y != x && members[y] {
                seen[y] = true;
                queue.push_back(y);
            }
        }
        while let Some(current) = queue.pop_front() {
            if current == x {
                return true;
            }
            for &next in &adj[current] {
                if members[next] && !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    })
}

impl<'a> Search<'a> {
    fn new(mol_a: &'a Molecule, mol_b: &'a Molecule, options: &'a McsOptions) -> Self {
        Self {
            mol_a,
            mol_b,
            options,
            adj_a: adjacency(mol_a),
            adj_b: adjacency(mol_b),
            ring_atoms_a: mol_a.ring_atoms(),
            ring_atoms_b: mol_b.ring_atoms(),
            ring_bonds_a: ring_bond_set(mol_a),
            ring_bonds_b: ring_bond_set(mol_b),
            deadline: Instant::now() + options.timeout,
            best_size: AtomicUsize::new(0),
            timed_out: AtomicBool::new(false),
        }
    }

    fn atoms_compatible(&self, i: usize, j: usize) -> bool {
        let (Some(x), Some(y)) = (self.mol_a.atom(i), self.mol_b.atom(j)) else {
            return false;
        };
        if x.element.is_hydrogen() || y.element.is_hydrogen() {
            return x.element == y.element;
        }
        if !self.options.element_change && x.element != y.element {
            return false;
        }
        !self.options.ring_matches_ring_only || self.ring_atoms_a[i] == self.ring_atoms_b[j]
    }

    fn bonds_compatible(&self, (a1, a2): (usize, usize), (b1, b2): (usize, usize)) -> bool {
        let (Some(x), Some(y)) = (self.mol_a.bond_between(a1, a2), self.mol_b.bond_between(b1, b2))
        else {
            return false;
        };
        if self.options.match_bond_order && x.order != y.order {
            return false;
        }
        !self.options.ring_matches_ring_only
            || self.ring_bonds_a.contains(&(a1.min(a2), a1.max(a2)))
                == self.ring_bonds_b.contains(&(b1.min(b2), b1.max(b2)))
    }

    /// Whether adding `(i, j)` keeps the induced bond graphs identical.
    fn extends(&self, state: &State, i: usize, j: usize) -> bool {
        for &x in &self.adj_a[i] {
            if let Some(y) = state.a_to_b[x]
                && !self.bonds_compatible((i, x), (j, y))
            {
                return false;
            }
        }
        for &y in &self.adj_b[j] {
            if let Some(x) = state.b_to_a[y]
                && self.mol_a.bond_between(i, x).is_none()
            {
                return false;
            }
        }
        true
    }

    /// Best mapping whose lowest A index is `i`, seeded with `(i, j)`.
    fn grow_from(&self, i: usize, j: usize) -> Vec<(usize, usize)> {
        let mut state = State {
            a_to_b: vec![None; self.mol_a.atom_count()],
            b_to_a: vec![None; self.mol_b.atom_count()],
            excluded: (0..self.mol_a.atom_count()).map(|k| k < i).collect(),
            pairs: Vec::new(),
        };
        state.push(i, j);
        let mut best = Vec::new();
        self.extend(&mut state, &mut best);
        best
    }

    fn extend(&self, state: &mut State, best: &mut Vec<(usize, usize)>) {
        if Instant::now() >= self.deadline {
            self.timed_out.store(true, Ordering::Relaxed);
            return;
        }

        if state.pairs.len() > best.len() {
            best.clone_from(&state.pairs);
            self.best_size.fetch_max(best.len(), Ordering::Relaxed);
        }

        let reach_a = reachable(
            &self.adj_a,
            |k| state.a_to_b[k].is_some(),
            |k| !state.excluded[k],
        );
        let reach_b = reachable(&self.adj_b, |k| state.b_to_a[k].is_some(), |_| true);
        let bound = state.pairs.len() + reach_a.min(reach_b);
        if bound <= best.len() || bound < self.best_size.load(Ordering::Relaxed) {
            return;
        }

        let frontier = (0..self.mol_a.atom_count()).find(|&k| {
            state.a_to_b[k].is_none()
                && !state.excluded[k]
                && self.adj_a[k].iter().any(|&x| state.a_to_b[x].is_some())
        });
        let Some(next) = frontier else {
            return;
        };

        // Any mapped neighbour's partner anchors the candidates in B.
        let anchor = self.adj_a[next].iter().find_map(|&x| state.a_to_b[x]);
        if let Some(anchor) = anchor {
            for &candidate in &self.adj_b[anchor] {
                if state.b_to_a[candidate].is_none()
                    && self.atoms_compatible(next, candidate)
                    && self.extends(state, next, candidate)
                {
                    state.push(next, candidate);
                    self.extend(state, best);
                    state.pop();
                }
            }
        }

        state.excluded[next] = true;
        self.extend(state, best);
        state.excluded[next] = false;
    }

    /// Removes ring atoms that are not on a cycle of the mapped subgraph.
    fn complete_rings(&self, mut pairs: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
        let mut members = vec![false; self.mol_a.atom_count()];
        for &(i, _) in &pairs {
            members[i] = true;
        }

        loop {
            let broken: Vec<usize> = (0..members.len())
                .filter(|&i| {
                    members[i] && self.ring_atoms_a[i] && !on_member_cycle(&self.adj_a, &members, i)
                })
                .collect();
            if broken.is_empty() {
                break;
            }
            for i in broken {
                members[i] = false;
            }
        }

        pairs.retain(|&(i, _)| members[i]);
        pairs
    }

    /// Keeps the largest connected fragment of the mapping (by A bonds).
    fn largest_fragment(&self, pairs: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
        let mut members = vec![false; self.mol_a.atom_count()];
        for &(i, _) in &pairs {
            members[i] = true;
        }

        let mut component = vec![usize::MAX; members.len()];
        let mut sizes = Vec::new();
        for start in 0..members.len() {
            if !members[start] || component[start] != usize::MAX {
                continue;
            }
            let id = sizes.len();
            let mut size = 0;
            let mut queue = VecDeque::from([start]);
            component[start] = id;
            while let Some(current) = queue.pop_front() {
                size += 1;
                for &next in &self.adj_a[current] {
                    if members[next] && component[next] == usize::MAX {
                        component[next] = id;
                        queue.push_back(next);
                    }
                }
            }
            sizes.push(size);
        }

        // First maximum wins, i.e. the fragment holding the lowest index.
        let Some(keep) = sizes
            .iter()
            .enumerate()
            .fold(None, |acc: Option<(usize, usize)>, (id, &size)| match acc {
                Some((_, best)) if best >= size => acc,
                _ => Some((id, size)),
            })
            .map(|(id, _)| id)
        else {
            return Vec::new();
        };

        pairs
            .into_iter()
            .filter(|&(i, _)| component[i] == keep)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::{Element, parse_smiles};
    use proptest::prelude::*;

    fn map(a: &str, b: &str) -> Vec<AtomMapping> {
        McsMapper::new()
            .suggest_mappings(&parse_smiles(a).unwrap(), &parse_smiles(b).unwrap())
            .unwrap()
    }

    fn map_with(options: McsOptions, a: &str, b: &str) -> Vec<AtomMapping> {
        McsMapper::with_options(options)
            .suggest_mappings(&parse_smiles(a).unwrap(), &parse_smiles(b).unwrap())
            .unwrap()
    }

    #[test]
    fn test_identical_molecules_map_fully() {
        let mappings = map("c1ccccc1CC(=O)O", "c1ccccc1CC(=O)O");
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].len(), 10);
    }

    #[test]
    fn test_substituent_change() {
        // phenol -> aniline: element change allowed by default
        let mappings = map("c1ccccc1O", "c1ccccc1N");
        assert_eq!(mappings[0].len(), 7);

        let strict = McsOptions::new().element_change(false);
        let mappings = map_with(strict, "c1ccccc1O", "c1ccccc1N");
        assert_eq!(mappings[0].len(), 6);
    }

    #[test]
    fn test_chain_extension() {
        let mappings = map("CCO", "CCCO");
        assert_eq!(mappings[0].len(), 3);
    }

    #[test]
    fn test_mapping_preserves_bonds() {
        let a = parse_smiles("Cc1ccc(O)cc1").unwrap();
        let b = parse_smiles("c1cc(N)ccc1CC").unwrap();
        let mappings = McsMapper::new().suggest_mappings(&a, &b).unwrap();
        let mapping = &mappings[0];
        for (&i, &j) in mapping.mol_a_to_mol_b() {
            for (&k, &l) in mapping.mol_a_to_mol_b() {
                assert_eq!(
                    a.bond_between(i, k).is_some(),
                    b.bond_between(j, l).is_some(),
                    "bond {i}-{k} vs {j}-{l}"
                );
            }
        }
    }

    #[test]
    fn test_ring_does_not_map_to_chain() {
        // cyclohexane vs hexane share nothing when rings only match rings
        let mappings = map("C1CCCCC1", "CCCCCC");
        assert!(mappings.is_empty());

        let loose = McsOptions::new()
            .ring_matches_ring_only(false)
            .complete_rings_only(false);
        // the ring closure bond has no partner, so five atoms is the most
        let mappings = map_with(loose, "C1CCCCC1", "CCCCCC");
        assert_eq!(mappings[0].len(), 5);
    }

    #[test]
    fn test_partial_ring_is_dropped() {
        // benzene vs pyridine with no element change: the carbon arc is
        // not a complete ring and is removed
        let strict = McsOptions::new().element_change(false);
        let mappings = map_with(strict.clone(), "c1ccccc1", "c1ccncc1");
        assert!(mappings.is_empty());

        let mappings = map_with(strict.complete_rings_only(false), "c1ccccc1", "c1ccncc1");
        assert_eq!(mappings[0].len(), 5);
    }

    #[test]
    fn test_fused_ring_keeps_whole_ring() {
        let mappings = map("c1ccccc1", "c1ccc2ccccc2c1");
        assert_eq!(mappings[0].len(), 6);
    }

    #[test]
    fn test_bond_order_matching() {
        let strict = McsOptions::new().match_bond_order(true);
        let mappings = map_with(strict, "C=CC", "CCC");
        assert_eq!(mappings[0].len(), 2);
        assert_eq!(map("C=CC", "CCC")[0].len(), 3);
    }

    #[test]
    fn test_hydrogens_only_map_to_hydrogens() {
        let mappings = map("[H]", "C");
        assert!(mappings.is_empty());
        assert_eq!(map("[H]", "[H]")[0].len(), 1);
    }

    #[test]
    fn test_deterministic_result() {
        let first = map("c1ccccc1C(=O)N", "c1ccccc1C(=O)NC");
        for _ in 0..5 {
            assert_eq!(map("c1ccccc1C(=O)N", "c1ccccc1C(=O)NC"), first);
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mapper = McsMapper::with_options(McsOptions::new().timeout(Duration::ZERO));
        let a = parse_smiles("C").unwrap();
        assert!(mapper.suggest_mappings(&a, &a).is_err());
    }

    #[test]
    fn test_mapper_metadata() {
        let mapper = McsMapper::new();
        assert_eq!(mapper.name(), "mcs");
        assert!(!mapper.description().is_empty());
        assert_eq!(mapper.options(), &McsOptions::default());
        assert_eq!(mapper.options().timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_element_change_keeps_hetero_position() {
        let a = parse_smiles("CCO").unwrap();
        let b = parse_smiles("CCS").unwrap();
        let mapping = &McsMapper::new().suggest_mappings(&a, &b).unwrap()[0];
        let o = mapping.get(2).unwrap();
        assert_eq!(b.atom(o).unwrap().element, Element::S);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn mappings_are_injective_and_connected(
            a in "C{1,3}(C(=O)|N|O|c1ccccc1){1,2}C{0,2}",
            b in "C{1,3}(C(=O)|N|O|c1ccccc1){1,2}C{0,2}",
        ) {
            let mol_a = parse_smiles(&a).unwrap();
            let mol_b = parse_smiles(&b).unwrap();
            let mappings = McsMapper::new().suggest_mappings(&mol_a, &mol_b).unwrap();
            prop_assert!(mappings.len() <= 1);
            if let Some(mapping) = mappings.first() {
                let inverse = mapping.mol_b_to_mol_a();
                prop_assert_eq!(inverse.len(), mapping.len());
                prop_assert!(mapping.len() <= mol_a.atom_count().min(mol_b.atom_count()));
            }
        }
    }
}
