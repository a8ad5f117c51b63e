//! Variance-aware application of a substitution to a type.
//!
//! The substitutor applies an already-computed [`TypeSubstitution`]; it never
//! derives one. Failure is a first-class result: substituting a parameter
//! occurrence with a projection the position cannot represent yields
//! [`ProjectedOut`], and callers must check it.
//!
//! Positions follow declaration-site variance rules: a member's declared type
//! is read at `Out` (the getter surface), written at `In` (the setter
//! surface), and receivers are consumed, so they substitute at `In`.

use crate::store::{TypeParamId, TypeStore};
use crate::substitution::TypeSubstitution;
use crate::types::{ProjectionKind, TypeData, TypeId, TypeProjection, Variance};
use thiserror::Error;
use tracing::trace;

/// A generic instantiation failed: the projection supplied for a type
/// parameter is incompatible with the variance required at a use site, so the
/// specialized entity cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("type parameter {param:?} is projected out: {projection} projection at {position} position")]
pub struct ProjectedOut {
    /// The parameter whose occurrence could not be substituted.
    pub param: TypeParamId,
    /// The variance the use site requires.
    pub position: Variance,
    /// The projection the substitution supplied.
    pub projection: ProjectionKind,
}

/// Applies a substitution to types, tracking use-site variance.
pub struct Substitutor<'a> {
    store: &'a TypeStore,
    substitution: &'a TypeSubstitution,
}

impl<'a> Substitutor<'a> {
    pub fn new(store: &'a TypeStore, substitution: &'a TypeSubstitution) -> Self {
        Self {
            store,
            substitution,
        }
    }

    pub fn store(&self) -> &'a TypeStore {
        self.store
    }

    pub fn substitution(&self) -> &'a TypeSubstitution {
        self.substitution
    }

    /// Substitute a type at the given position.
    ///
    /// Unmapped parameter occurrences pass through unchanged. Hash-consing
    /// guarantees that a substitution that replaces nothing returns the input
    /// id itself.
    pub fn substitute(&self, ty: TypeId, position: Variance) -> Result<TypeId, ProjectedOut> {
        match self.store.type_data(ty) {
            TypeData::Intrinsic(_) => Ok(ty),
            TypeData::Nullable(inner) => {
                let substituted = self.substitute(inner, position)?;
                Ok(self.store.nullable(substituted))
            }
            TypeData::Parameter(param) => match self.substitution.get(param) {
                None => Ok(ty),
                Some(replacement) => self.replace_direct(param, replacement, position),
            },
            TypeData::Applied { class, args } => {
                let params = self.store.class_params(class);
                let projections = self.store.projections(args);
                debug_assert_eq!(
                    params.len(),
                    projections.len(),
                    "argument count does not match class parameter count"
                );
                let mut substituted = Vec::with_capacity(projections.len());
                for (arg, &slot) in projections.iter().zip(params.iter()) {
                    let declared = self.store.param_variance(slot);
                    substituted.push(self.substitute_argument(*arg, declared, Some(slot))?);
                }
                Ok(self.store.applied(class, substituted))
            }
        }
    }

    /// Substitute a standalone projection (no surrounding argument slot).
    ///
    /// Used when pushing one substitution through another and when copying
    /// receiver-free projection values around.
    pub fn substitute_projection(
        &self,
        projection: TypeProjection,
    ) -> Result<TypeProjection, ProjectedOut> {
        self.substitute_argument(projection, Variance::Invariant, None)
    }

    /// A direct parameter occurrence at `position`, replaced by `replacement`.
    ///
    /// This is the only place a substitution can be projected out: an
    /// argument inside an `Applied` slot carries its projection into the
    /// result instead.
    fn replace_direct(
        &self,
        param: TypeParamId,
        replacement: TypeProjection,
        position: Variance,
    ) -> Result<TypeId, ProjectedOut> {
        let legal = match replacement.kind {
            ProjectionKind::Invariant => true,
            ProjectionKind::Out => position == Variance::Out,
            ProjectionKind::In => position == Variance::In,
            // A star's recorded bound is an upper bound: reads erase to it,
            // writes have nothing to erase to.
            ProjectionKind::Star => position == Variance::Out,
        };
        if legal {
            Ok(replacement.ty)
        } else {
            let failure = ProjectedOut {
                param,
                position,
                projection: replacement.kind,
            };
            trace!(param = param.0, %failure, "Substitutor::replace_direct");
            Err(failure)
        }
    }

    /// Substitute one argument of an applied class type.
    ///
    /// `declared` is the declaration-site variance of the slot's parameter;
    /// `slot` identifies it when known (its erased bound backs conflict
    /// erasure).
    fn substitute_argument(
        &self,
        arg: TypeProjection,
        declared: Variance,
        slot: Option<TypeParamId>,
    ) -> Result<TypeProjection, ProjectedOut> {
        // An erased slot stays erased; only its recorded bound substitutes.
        if arg.kind == ProjectionKind::Star {
            let bound = self.substitute(arg.ty, Variance::Out)?;
            return Ok(TypeProjection::star(bound));
        }

        // A written projection that contradicts the slot's declared variance
        // erases the slot instead of failing the whole type.
        let Some(effective) = effective_slot_kind(arg.kind, declared) else {
            return self.erase_slot(slot);
        };

        // A parameter occurrence inside an argument slot carries the
        // replacement's projection into the slot rather than failing:
        // Box<T> under T := out Int becomes Box<out Int>.
        if let TypeData::Parameter(param) = self.store.type_data(arg.ty) {
            if let Some(replacement) = self.substitution.get(param) {
                return match combine_projections(effective, replacement.kind) {
                    Some(kind) => Ok(TypeProjection {
                        kind,
                        ty: replacement.ty,
                    }),
                    None => self.erase_slot(slot),
                };
            }
        }

        let position = effective.variance().unwrap_or(Variance::Invariant);
        let ty = self.substitute(arg.ty, position)?;
        Ok(TypeProjection { kind: arg.kind, ty })
    }

    /// Conflict erasure: degrade an argument slot to `*`, bounded by the
    /// slot parameter's erased upper bound.
    fn erase_slot(&self, slot: Option<TypeParamId>) -> Result<TypeProjection, ProjectedOut> {
        let bound = match slot {
            Some(param) => self.store.param_erased_bound(param),
            None => TypeId::ANY,
        };
        let bound = self.substitute(bound, Variance::Out)?;
        Ok(TypeProjection::star(bound))
    }
}

/// Combine a written use-site projection with the slot's declared variance.
/// `None` means the two contradict each other and the slot must erase.
fn effective_slot_kind(written: ProjectionKind, declared: Variance) -> Option<ProjectionKind> {
    match (declared, written) {
        (Variance::Invariant, kind) => Some(kind),
        (variance, ProjectionKind::Invariant) => Some(ProjectionKind::from(variance)),
        (Variance::Out, ProjectionKind::Out) => Some(ProjectionKind::Out),
        (Variance::In, ProjectionKind::In) => Some(ProjectionKind::In),
        _ => None,
    }
}

/// Combine an argument slot's effective variance with the projection of the
/// replacement substituted into it. `None` means the two are in conflict and
/// the slot must erase.
fn combine_projections(
    effective: ProjectionKind,
    replacement: ProjectionKind,
) -> Option<ProjectionKind> {
    match (effective, replacement) {
        (_, ProjectionKind::Star) => Some(ProjectionKind::Star),
        (ProjectionKind::Invariant, kind) => Some(kind),
        (_, ProjectionKind::Invariant) => Some(ProjectionKind::Invariant),
        // A projection matching the slot's own variance is redundant and
        // folds away.
        (ProjectionKind::Out, ProjectionKind::Out) | (ProjectionKind::In, ProjectionKind::In) => {
            Some(ProjectionKind::Invariant)
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/substitute_tests.rs"]
mod tests;
