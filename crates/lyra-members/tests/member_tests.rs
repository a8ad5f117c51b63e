use super::*;
use crate::accessor::{GetterInfo, ValueParam};
use crate::meta::{no_annotations, AccessorFlags, MemberKind, Modality, SourceId, Visibility};
use lyra_common::Interner;
use lyra_types::{TypeId, TypeStore};

fn seed(types: &TypeStore, interner: &mut Interner, name: &str) -> MemberSeed {
    MemberSeed {
        decl: types.fresh_decl(),
        owner: types.fresh_decl(),
        name: interner.intern(name),
        annotations: no_annotations(),
        modality: Modality::Final,
        visibility: Visibility::Public,
        kind: MemberKind::Declaration,
        flags: MemberFlags::empty(),
        source: SourceId(1),
        const_value: None,
    }
}

fn signature(return_type: TypeId) -> MemberSignature {
    MemberSignature {
        return_type,
        type_params: Vec::new(),
        dispatch_receiver: None,
        extension_receiver: None,
        additional_receivers: SmallVec::new(),
    }
}

fn getter(return_type: TypeId) -> GetterInfo {
    GetterInfo {
        modality: Modality::Final,
        visibility: Visibility::Public,
        flags: AccessorFlags::DEFAULT,
        kind: MemberKind::Declaration,
        return_type,
        initial: None,
        annotations: no_annotations(),
    }
}

#[test]
fn register_then_complete_in_phases() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();

    let member = members.register(seed(&types, &mut interner, "size"));
    assert_eq!(members.name(member), interner.intern("size"));
    assert_eq!(members.kind(member), MemberKind::Declaration);
    assert_eq!(members.original(member), member);
    assert_eq!(members.root_original(member), member);
    assert!(!members.is_mutable(member));

    members.set_signature(member, signature(TypeId::INT));
    assert_eq!(members.return_type(member), TypeId::INT);
    assert!(members.type_parameters(member).is_empty());
    assert!(members.dispatch_receiver(member).is_none());

    members.initialize(
        member,
        MemberAccessors {
            getter: Some(getter(TypeId::INT)),
            ..MemberAccessors::default()
        },
    );
    let (g, s) = members.accessors(member);
    assert!(g.is_some());
    assert!(s.is_none());
    assert!(!members.is_setter_projected_out(member));
}

#[test]
#[should_panic(expected = "queried before set_signature")]
fn signature_query_before_set_panics() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let member = members.register(seed(&types, &mut interner, "size"));
    let _ = members.return_type(member);
}

#[test]
#[should_panic(expected = "already set")]
fn double_set_signature_panics() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let member = members.register(seed(&types, &mut interner, "size"));
    members.set_signature(member, signature(TypeId::INT));
    members.set_signature(member, signature(TypeId::STRING));
}

#[test]
#[should_panic(expected = "initialized before set_signature")]
fn initialize_before_signature_panics() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let member = members.register(seed(&types, &mut interner, "size"));
    members.initialize(member, MemberAccessors::default());
}

#[test]
#[should_panic(expected = "already initialized")]
fn double_initialize_panics() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let member = members.register(seed(&types, &mut interner, "size"));
    members.set_signature(member, signature(TypeId::INT));
    members.initialize(member, MemberAccessors::default());
    members.initialize(member, MemberAccessors::default());
}

#[test]
#[should_panic(expected = "queried before initialize")]
fn accessor_query_before_initialize_panics() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let member = members.register(seed(&types, &mut interner, "size"));
    members.set_signature(member, signature(TypeId::INT));
    let _ = members.getter(member);
}

#[test]
#[should_panic(expected = "without a setter")]
fn projected_out_flag_requires_setter() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let member = members.register(seed(&types, &mut interner, "size"));
    members.set_signature(member, signature(TypeId::INT));
    members.initialize(
        member,
        MemberAccessors {
            setter_projected_out: true,
            ..MemberAccessors::default()
        },
    );
}

#[test]
#[should_panic(expected = "exactly one value parameter")]
fn setter_with_wrong_parameter_count_panics() {
    let mut interner = Interner::new();
    let value = |name: &mut Interner| ValueParam {
        name: name.intern("value"),
        ty: TypeId::INT,
        annotations: no_annotations(),
    };
    let params = vec![value(&mut interner), value(&mut interner)];
    let _ = crate::accessor::SetterInfo::from_params(
        Modality::Final,
        Visibility::Public,
        AccessorFlags::DEFAULT,
        MemberKind::Declaration,
        params,
        no_annotations(),
    );
}

#[test]
fn overridden_set_is_empty_until_assigned_and_deduplicates() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let member = members.register(seed(&types, &mut interner, "size"));
    let a = members.register(seed(&types, &mut interner, "size"));
    let b = members.register(seed(&types, &mut interner, "size"));

    assert!(members.overridden(member).is_empty());
    members.set_overridden(member, [a, a, b, a]);
    assert_eq!(members.overridden(member), vec![a, b]);
}

#[test]
#[should_panic(expected = "already assigned")]
fn double_overridden_assignment_panics() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let member = members.register(seed(&types, &mut interner, "size"));
    let a = members.register(seed(&types, &mut interner, "size"));
    members.set_overridden(member, [a]);
    members.set_overridden(member, [a]);
}

#[test]
fn root_original_follows_the_copy_chain() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let root = members.register(seed(&types, &mut interner, "size"));
    let first = members.register_copy(seed(&types, &mut interner, "size"), Some(root));
    let second = members.register_copy(seed(&types, &mut interner, "size"), Some(first));

    assert_eq!(members.original(second), first);
    assert_eq!(members.root_original(second), root);
    assert_eq!(members.root_original(root), root);
}
