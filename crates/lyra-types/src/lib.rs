//! Type representation and variance-aware substitution.
//!
//! This crate owns the type side of Lyra's generic-instantiation machinery:
//!
//! - **Interned types**: structural `TypeData` hash-consed into `TypeId`
//!   handles, so type equality is an integer comparison
//! - **Projections**: a type plus a use-site variance (`in`, `out`,
//!   invariant, or `*`)
//! - **Substitution**: forward application of a parameter-to-projection map,
//!   with "projected out" as a first-class failure instead of an exception
//!
//! The member-level specialization engine lives in `lyra-members` and drives
//! everything here through [`Substitutor`] and
//! [`substitute_type_parameters`].

pub mod params;
pub mod store;
pub mod substitute;
pub mod substitution;
pub mod types;

pub use params::substitute_type_parameters;
pub use store::{BoundList, ClassData, ClassId, DeclId, ProjectionListId, TypeParamId, TypeStore};
pub use substitute::{ProjectedOut, Substitutor};
pub use substitution::TypeSubstitution;
pub use types::{IntrinsicKind, ProjectionKind, TypeData, TypeId, TypeProjection, Variance};
