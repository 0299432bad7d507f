//! Ordered collections of eigenstates with set-like composition and filtering.

use std::{ cmp::Ordering, ops::Add };
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::eigenstate::{ Eigenstate, Parity, StateKind };

/// Relative tolerance on wavenumbers under which two states of the same kind
/// and parity are considered the same state.
pub const SAME_STATE_RTOL: f64 = 1e-8;

/// Return `true` if `a` and `b` describe the same state.
pub fn same_state<S, T>(a: &S, b: &T) -> bool
where
    S: Eigenstate,
    T: Eigenstate,
{
    let (ka, kb) = (a.wavenumber(), b.wavenumber());
    a.kind() == b.kind()
        && a.parity() == b.parity()
        && (ka - kb).norm() <= SAME_STATE_RTOL * ka.norm().max(kb.norm()).max(1.0)
}

/// An ordered set of eigenstates.
///
/// Adding two sets produces their union: states of the right-hand set that
/// duplicate (see [`same_state`]) a state already present are dropped.
#[derive(Clone, Debug)]
pub struct BasisSet<S> {
    states: Vec<S>,
}

impl<S> Default for BasisSet<S> {
    fn default() -> Self { Self { states: Vec::new() } }
}

impl<S> BasisSet<S> {
    /// Create an empty set.
    pub fn new() -> Self { Self::default() }

    // wrap states that are known to be distinct, e.g. the eigenpairs of a
    // single diagonalization, without the duplicate check
    pub(crate) fn from_vec(states: Vec<S>) -> Self { Self { states } }

    pub fn len(&self) -> usize { self.states.len() }

    pub fn is_empty(&self) -> bool { self.states.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, S> { self.states.iter() }

    pub fn states(&self) -> &[S] { &self.states }

    pub fn into_states(self) -> Vec<S> { self.states }

    pub fn get(&self, idx: usize) -> Option<&S> { self.states.get(idx) }
}

impl<S> BasisSet<S>
where S: Eigenstate + Clone
{
    /// Append a state unless it duplicates one already present. Returns
    /// `true` if the state was added.
    pub fn insert(&mut self, state: S) -> bool {
        if self.states.iter().any(|s| same_state(s, &state)) {
            false
        } else {
            self.states.push(state);
            true
        }
    }

    /// Return a new set holding only the states satisfying `pred`.
    pub fn filter<P>(&self, mut pred: P) -> Self
    where P: FnMut(&S) -> bool
    {
        self.states.iter().filter(|s| pred(s)).cloned().collect()
    }

    /// Return a new set holding only states of the given kind.
    pub fn of_kind(&self, kind: StateKind) -> Self {
        self.filter(|s| s.kind() == kind)
    }

    pub fn bounds(&self) -> Self { self.of_kind(StateKind::Bound) }

    pub fn antibounds(&self) -> Self { self.of_kind(StateKind::AntiBound) }

    pub fn resonants(&self) -> Self { self.of_kind(StateKind::Resonant) }

    pub fn antiresonants(&self) -> Self {
        self.of_kind(StateKind::AntiResonant)
    }

    pub fn continuum(&self) -> Self { self.of_kind(StateKind::Continuum) }

    pub fn unknown(&self) -> Self { self.of_kind(StateKind::Unknown) }

    /// Bound, antibound, resonant, and antiresonant states.
    pub fn siegerts(&self) -> Self { self.filter(|s| s.kind().is_siegert()) }

    pub fn with_parity(&self, parity: Parity) -> Self {
        self.filter(|s| s.parity() == Some(parity))
    }

    pub fn even(&self) -> Self { self.with_parity(Parity::Even) }

    pub fn odd(&self) -> Self { self.with_parity(Parity::Odd) }

    /// Wavenumbers of all states, in order.
    pub fn wavenumbers(&self) -> nd::Array1<C64> {
        self.states.iter().map(|s| s.wavenumber()).collect()
    }

    /// Energies of all states, in order.
    pub fn energies(&self) -> nd::Array1<C64> {
        self.states.iter().map(|s| s.energy()).collect()
    }

    /// Sort states by the real, then imaginary, part of their wavenumbers.
    pub fn sort_by_wavenumber(&mut self) {
        self.states.sort_by(|l, r| {
            let (kl, kr) = (l.wavenumber(), r.wavenumber());
            kl.re.partial_cmp(&kr.re).unwrap_or(Ordering::Equal)
                .then_with(|| {
                    kl.im.partial_cmp(&kr.im).unwrap_or(Ordering::Equal)
                })
        });
    }
}

impl<S> Add for BasisSet<S>
where S: Eigenstate + Clone
{
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.extend(rhs);
        self
    }
}

impl<'a, S> Add<&'a BasisSet<S>> for &'a BasisSet<S>
where S: Eigenstate + Clone
{
    type Output = BasisSet<S>;

    fn add(self, rhs: &'a BasisSet<S>) -> BasisSet<S> {
        self.clone() + rhs.clone()
    }
}

impl<S> Extend<S> for BasisSet<S>
where S: Eigenstate + Clone
{
    fn extend<I>(&mut self, iter: I)
    where I: IntoIterator<Item = S>
    {
        iter.into_iter().for_each(|s| { self.insert(s); });
    }
}

impl<S> FromIterator<S> for BasisSet<S>
where S: Eigenstate + Clone
{
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = S>
    {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S> IntoIterator for BasisSet<S> {
    type Item = S;
    type IntoIter = std::vec::IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter { self.states.into_iter() }
}

impl<'a, S> IntoIterator for &'a BasisSet<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter { self.states.iter() }
}
