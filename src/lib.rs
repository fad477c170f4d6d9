#![warn(clippy::all)]
#![warn(missing_docs)]

//! Numerical core of a classical atomistic structure-refinement engine.
//!
//! This crate reconciles computed pair-correlation functions of a
//! condensed-phase molecular system with experimental scattering data by
//! iteratively perturbing an empirical pair potential. It owns the four
//! tightly-coupled numerical subsystems that make that loop work:
//! tabulated pair potentials ([`potential`]), one-dimensional data and
//! interpolation ([`xy`], [`interpolation`]), Fourier transformation
//! between real and reciprocal space ([`transform`]), and empirical
//! potential generation by basis-function fitting ([`basis_fit`],
//! [`minimiser`]). Configuration/box geometry, cell decomposition,
//! molecule ownership, file parsing, CLI/GUI and the process-pool
//! transport itself are external collaborators; this crate only defines
//! the trait boundaries it needs from them ([`boundary`], [`process_pool`]).

pub mod basis_fit;
pub mod boundary;
pub mod compare;
pub mod error;
pub mod histogram;
pub mod interpolation;
pub mod minimiser;
pub mod peaks;
pub mod potential;
pub mod potential_map;
pub mod process_pool;
pub mod transform;
pub mod xy;

pub use error::{Error, Result};
