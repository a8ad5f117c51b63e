//! The type-parameter-to-projection map.

use crate::store::{TypeParamId, TypeStore};
use crate::substitute::{ProjectedOut, Substitutor};
use crate::types::{TypeId, TypeProjection};
use rustc_hash::FxHashMap;

/// An immutable-in-use mapping from type-parameter identity to a projection.
///
/// The empty map is the identity substitution: applying it changes nothing,
/// and member-level `substitute` short-circuits on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeSubstitution {
    map: FxHashMap<TypeParamId, TypeProjection>,
}

impl TypeSubstitution {
    /// The identity substitution.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Build a substitution mapping each parameter to the corresponding type
    /// argument, invariantly. Panics if the lists differ in length; handing
    /// a mismatched argument list to instantiation is a caller bug.
    pub fn from_type_arguments(params: &[TypeParamId], args: &[TypeId]) -> Self {
        assert_eq!(
            params.len(),
            args.len(),
            "type argument count {} does not match parameter count {}",
            args.len(),
            params.len()
        );
        let mut subst = Self::new();
        for (&param, &arg) in params.iter().zip(args) {
            subst.insert(param, TypeProjection::invariant(arg));
        }
        subst
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn insert(&mut self, param: TypeParamId, projection: TypeProjection) {
        self.map.insert(param, projection);
    }

    pub fn get(&self, param: TypeParamId) -> Option<TypeProjection> {
        self.map.get(&param).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeParamId, TypeProjection)> + '_ {
        self.map.iter().map(|(&param, &projection)| (param, projection))
    }

    /// Compose with a second substitution: applying the result once is
    /// equivalent to applying `self`, then `then`.
    ///
    /// Entries of `self` are pushed through `then`; entries of `then` whose
    /// parameters `self` does not mention are kept as-is. Composition can
    /// itself project a parameter out, which is a failure exactly as if the
    /// two substitutions had been applied in sequence.
    pub fn compose(
        &self,
        store: &TypeStore,
        then: &TypeSubstitution,
    ) -> Result<TypeSubstitution, ProjectedOut> {
        let substitutor = Substitutor::new(store, then);
        let mut composed = then.clone();
        for (param, projection) in self.iter() {
            composed.insert(param, substitutor.substitute_projection(projection)?);
        }
        Ok(composed)
    }
}

impl FromIterator<(TypeParamId, TypeProjection)> for TypeSubstitution {
    fn from_iter<I: IntoIterator<Item = (TypeParamId, TypeProjection)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/substitution_tests.rs"]
mod tests;
