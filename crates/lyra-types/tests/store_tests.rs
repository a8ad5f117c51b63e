use super::*;
use crate::types::{IntrinsicKind, TypeData, TypeId, TypeProjection, Variance};
use lyra_common::Interner;

#[test]
fn intern_is_hash_consed() {
    let store = TypeStore::new();
    let decl = store.fresh_decl();
    let param = store.alloc_param(lyra_common::Atom(1), Variance::Invariant, decl, 0);

    let a = store.intern(TypeData::Parameter(param));
    let b = store.intern(TypeData::Parameter(param));
    assert_eq!(a, b);

    let c = store.nullable(a);
    assert_ne!(a, c);
    assert_eq!(store.type_data(c), TypeData::Nullable(a));
}

#[test]
fn intrinsics_have_fixed_ids() {
    let store = TypeStore::new();
    assert_eq!(store.intern(TypeData::Intrinsic(IntrinsicKind::Any)), TypeId::ANY);
    assert_eq!(store.intern(TypeData::Intrinsic(IntrinsicKind::Nothing)), TypeId::NOTHING);
    assert_eq!(store.intern(TypeData::Intrinsic(IntrinsicKind::String)), TypeId::STRING);
    assert_eq!(store.type_data(TypeId::INT), TypeData::Intrinsic(IntrinsicKind::Int));
}

#[test]
fn nullable_is_idempotent() {
    let store = TypeStore::new();
    let once = store.nullable(TypeId::INT);
    let twice = store.nullable(once);
    assert_eq!(once, twice);
}

#[test]
fn projection_lists_are_interned() {
    let store = TypeStore::new();
    let a = store.intern_projections(vec![TypeProjection::invariant(TypeId::INT)]);
    let b = store.intern_projections(vec![TypeProjection::invariant(TypeId::INT)]);
    let c = store.intern_projections(vec![TypeProjection::covariant(TypeId::INT)]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(store.projections(a).as_ref(), &[TypeProjection::invariant(TypeId::INT)]);
}

#[test]
fn class_registry_roundtrip() {
    let mut interner = Interner::new();
    let store = TypeStore::new();
    let decl = store.fresh_decl();
    let t = store.alloc_param(interner.intern("T"), Variance::Invariant, decl, 0);
    store.set_bounds(t, [TypeId::ANY]);

    let class = store.register_class(interner.intern("Box"), decl, vec![t]);
    let data = store.class(class);
    assert_eq!(data.decl, decl);
    assert_eq!(data.params, vec![t]);
    assert_eq!(store.class_params(class), vec![t]);
}

#[test]
fn param_two_phase_completion() {
    let mut interner = Interner::new();
    let store = TypeStore::new();
    let decl = store.fresh_decl();
    let t = store.alloc_param(interner.intern("T"), Variance::Out, decl, 0);

    assert_eq!(store.param_variance(t), Variance::Out);
    assert_eq!(store.param_owner(t), decl);
    assert_eq!(store.try_param_bounds(t), None);
    // Erasure tolerates an unsealed parameter.
    assert_eq!(store.param_erased_bound(t), TypeId::ANY);

    store.set_bounds(t, [TypeId::STRING]);
    assert_eq!(store.param_bounds(t).as_slice(), &[TypeId::STRING]);
    assert_eq!(store.param_erased_bound(t), TypeId::STRING);
}

#[test]
#[should_panic(expected = "already set")]
fn sealing_bounds_twice_panics() {
    let store = TypeStore::new();
    let decl = store.fresh_decl();
    let t = store.alloc_param(lyra_common::Atom(1), Variance::Invariant, decl, 0);
    store.set_bounds(t, [TypeId::ANY]);
    store.set_bounds(t, [TypeId::STRING]);
}

#[test]
#[should_panic(expected = "queried before being set")]
fn querying_unsealed_bounds_panics() {
    let store = TypeStore::new();
    let decl = store.fresh_decl();
    let t = store.alloc_param(lyra_common::Atom(1), Variance::Invariant, decl, 0);
    let _ = store.param_bounds(t);
}
