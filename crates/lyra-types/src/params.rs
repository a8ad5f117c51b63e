//! Copying a type-parameter list under a substitution.

use crate::store::{BoundList, DeclId, TypeParamId, TypeStore};
use crate::substitute::{ProjectedOut, Substitutor};
use crate::substitution::TypeSubstitution;
use crate::types::{TypeProjection, Variance};
use tracing::trace;

/// Copy `params` under `substitution`, re-binding each copy to `new_owner`,
/// and return the fresh parameter list together with the **derived
/// substitution**: the incoming one extended with `old → new` renamings.
///
/// Bounds may reference sibling parameters of the same list, so this runs in
/// two passes: the first allocates every fresh identity (bounds unset), the
/// second substitutes each original bound through the derived substitution;
/// by then a sibling reference resolves to the *new* sibling, not the old
/// owner's. Renamings win over incoming entries for the same parameter.
///
/// Bounds substitute at `Out`: a bound is an upper limit and is only ever
/// read. A bound that is projected out fails the whole copy.
pub fn substitute_type_parameters(
    store: &TypeStore,
    params: &[TypeParamId],
    substitution: &TypeSubstitution,
    new_owner: DeclId,
) -> Result<(Vec<TypeParamId>, TypeSubstitution), ProjectedOut> {
    let mut derived = substitution.clone();
    let mut fresh = Vec::with_capacity(params.len());
    for &param in params {
        let copy = store.alloc_param(
            store.param_name(param),
            store.param_variance(param),
            new_owner,
            store.param_index(param),
        );
        derived.insert(param, TypeProjection::invariant(store.parameter(copy)));
        fresh.push(copy);
        trace!(old = param.0, new = copy.0, owner = new_owner.0, "type parameter re-bound");
    }

    let substitutor = Substitutor::new(store, &derived);
    for (&param, &copy) in params.iter().zip(&fresh) {
        let mut bounds = BoundList::new();
        for &bound in store.param_bounds(param).iter() {
            bounds.push(substitutor.substitute(bound, Variance::Out)?);
        }
        store.set_bounds(copy, bounds);
    }

    Ok((fresh, derived))
}

#[cfg(test)]
#[path = "../tests/params_tests.rs"]
mod tests;
