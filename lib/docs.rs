//! Theoretical background.
//!
//! # Contents
//! - [Siegert states](#siegert-states)
//! - [The square well](#the-square-well)
//! - [Complex scaling](#complex-scaling)
//! - [Expansions](#expansions)
//! - [Time dependence](#time-dependence)
//!
//! # Siegert states
//! All quantities here are in units where *ħ* = *m* = 1, so that the
//! one-dimensional Hamiltonian is
//! ```text
//!       1 ∂²
//! H = - - --- + V(x),   E = k² / 2
//!       2 ∂x²
//! ```
//! For a potential that vanishes outside some region |*x*| ≤ *a*, Siegert
//! states[^1] are the solutions of the time-independent Schrödinger equation
//! that are purely outgoing beyond it,
//! ```text
//! u(x) ∝ e^{ik|x|},   |x| > a
//! ```
//! This boundary condition can only be met at a discrete set of complex
//! wavenumbers *k*<sub>*n*</sub>, which are sorted into four families by their
//! location in the complex *k*-plane:
//! - bound states on the positive imaginary axis;
//! - antibound (virtual) states on the negative imaginary axis;
//! - resonances in the fourth quadrant, with energies
//!   *E* = *E*<sub>r</sub> - *i* Γ/2;
//! - antiresonances in the third quadrant, at -*k*<sub>*n*</sub><sup>*</sup>
//!   for every resonance *k*<sub>*n*</sub>.
//!
//! Except for bound states, Siegert states grow exponentially outside the
//! potential and cannot be normalized in the usual sense. They are instead
//! normalized with respect to the c-product (no complex conjugation) with a
//! surface term that regularizes the divergent exterior integral,
//! ```text
//!  a                  u(a)² + u(-a)²
//!  ∫ u(x)² dx + i -------------- = 1
//! -a                    2k
//! ```
//! which reduces to the ordinary normalization for bound states.
//!
//! # The square well
//! For a well of depth *V*<sub>0</sub> on |*x*| ≤ *a*, the interior
//! wavenumber is *q* = √(*k*² + 2 *V*<sub>0</sub>) and the interior solutions
//! are cos(*qx*) or sin(*qx*). Matching logarithmic derivatives against
//! e<sup>*ik*|*x*|</sup> at *x* = *a* gives the Siegert conditions
//! ```text
//! even: q sin(qa) + i k cos(qa) = 0
//! odd:  cos(qa) - i k sin(qa) / q = 0
//! ```
//! Both are even functions of *q*, so they are entire functions of *k* and the
//! choice of square-root branch is immaterial. On the imaginary axis
//! *k* = *iκ* they are real, and bound and antibound states are found by
//! bracketing sign changes. Resonances are found by the [secant method] from a
//! grid of starting points, supplemented by the large-*k* asymptotic form
//! ```text
//! k_m ≈ (π m - i ln(2 (π m / l)² / V₀)) / l,   l = 2a
//! ```
//!
//! Continuum states at real *k* > 0 are normalized to *δ*(*k* - *k'*), which
//! fixes their exterior amplitude at 1/√π:
//! ```text
//! even: cos(k|x| + δ) / √π,   odd: sign(x) sin(k|x| + δ) / √π
//! ```
//!
//! # Complex scaling
//! For potentials without analytic Siegert conditions, Siegert states are
//! computed as eigenstates of a complex-scaled Hamiltonian[^2]. The real
//! coordinate is replaced by a contour *z* = *F*(*x*) that leaves the
//! interaction region untouched and is rotated into the complex plane by an
//! angle *θ* beyond it. Outgoing waves e<sup>*ikz*</sup> then decay along the
//! contour for all resonances with arg(*k*) > -*θ*, so that these can be
//! represented on a finite grid with vanishing boundary conditions, while the
//! continuum is rotated down by an angle 2*θ* in the complex energy plane.
//!
//! With *g*(*x*) = *F'*(*x*), the Hamiltonian becomes
//! ```text
//!         1  1  ∂   1  ∂
//! H_θ = - - --- -- --- -- + V(F(x))
//!         2  g  ∂x  g  ∂x
//! ```
//! which, in terms of *w* = √*g* *u* and a staggered finite-difference
//! derivative *D*, is represented by the complex-symmetric matrix
//! ```text
//! A = G^{-1/2} (½ Dᵀ G_½⁻¹ D) G^{-1/2} + V(F(x))
//! ```
//! Eigenvalues of true Siegert states are independent of *θ* while those of
//! the rotated continuum move with it, so the virial |∂*E*/∂*θ*| distinguishes
//! the two.
//!
//! # Expansions
//! Inside the potential region, the Siegert states satisfy the completeness
//! relation and sum rule
//! ```text
//! ½ Σ_n u_n(x) u_n(x') = δ(x - x'),   Σ_n u_n(x) u_n(x') / k_n = 0
//! ```
//! which lead to the Mittag-Leffler expansion (MLE) of the outgoing Green's
//! function,
//! ```text
//!                  u_n(x) u_n(x')
//! G(x, x'; k) = Σ ---------------
//!               n  k_n (k - k_n)
//! ```
//! The strength function of a test state *φ* per unit energy is
//! ```text
//! S(E) = Σ_p |<ψ_{k,p}|φ>|² / k = -(1/π) Im <φ|G(k)|φ>
//! ```
//! where the left-hand form integrates over the continuum and the right-hand
//! form is evaluated through the MLE.
//!
//! The complex-scaled eigenstates instead form a Berggren basis[^3], complete
//! along the scaled contour, which gives the analogous
//! ```text
//!                         (u_n|φ̄) (u_n|φ)
//! S(E) = -(1/π) Im Σ_n ---------------
//!                           E - E_n
//! ```
//!
//! # Time dependence
//! Inserting the MLE into the spectral representation of the propagator
//! and integrating over *k* analytically gives the exact Siegert
//! propagation[^4]
//! ```text
//! ψ(x, t) = Σ_n u_n(x) (u_n|φ) M(k_n, t)
//!
//! M(k, t) = ± ½ w(± k e^{iπ/4} √(t/2)) [+ e^{-iEt}]
//! ```
//! where *w*(*z*) = e<sup>-*z*²</sup> erfc(-*iz*) is the Faddeeva function.
//! The signs are chosen so that *w* is only ever evaluated in the upper
//! half-plane, and a pole term e<sup>-*iEt*</sup> is added when the
//! integration contour has to be deformed across *k*<sub>*n*</sub>, as is the
//! case for bound states. At *t* = 0, *M* = ½ for every state, recovering the
//! completeness relation.
//!
//! As a direct reference, wavepackets are also evolved with the split-step
//! method. Sandwiching a kinetic step between two half-sized potential steps
//! gives
//! ```text
//!               -i V dt/2  -i p² dt/2  -i V dt/2
//! ψ(t + dt) = [e          e           e         ] ψ(t) + O(dt³)
//! ```
//! where the potential factors are applied pointwise in position space and the
//! kinetic factor pointwise in momentum space, reached by the (fast) Fourier
//! transform.
//!
//! [^1]: A. J. F. Siegert, "On the derivation of the dispersion formula for
//! nuclear reactions." Physical Review **56** 750 (1939).
//!
//! [^2]: N. Moiseyev, "Quantum theory of resonances: calculating energies,
//! widths and cross-sections by complex scaling." Physics Reports **302**
//! 212-293 (1998).
//!
//! [^3]: T. Berggren, "On the use of resonant states in eigenfunction
//! expansions of scattering and reaction amplitudes." Nuclear Physics A
//! **109** 265-287 (1968).
//!
//! [^4]: G. García-Calderón and R. Peierls, "Resonant states and their uses."
//! Nuclear Physics A **265** 443-460 (1976).
//!
//! [secant method]: https://en.wikipedia.org/wiki/Secant_method
