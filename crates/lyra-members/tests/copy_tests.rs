use super::*;
use crate::accessor::GetterInfo;
use crate::member::{MemberAccessors, MemberId, MemberSeed, MemberSignature, MemberStore};
use crate::meta::{
    no_annotations, AccessorFlags, MemberFlags, MemberKind, Modality, SourceId, Visibility,
};
use crate::receiver::{ReceiverInfo, ReceiverKind};
use lyra_common::Interner;
use lyra_types::{DeclId, TypeId, TypeStore};
use smallvec::SmallVec;

fn simple_member(
    types: &TypeStore,
    members: &MemberStore,
    interner: &mut Interner,
) -> (MemberId, DeclId) {
    let owner = types.fresh_decl();
    let member = members.register(MemberSeed {
        decl: types.fresh_decl(),
        owner,
        name: interner.intern("size"),
        annotations: no_annotations(),
        modality: Modality::Open,
        visibility: Visibility::Internal,
        kind: MemberKind::Declaration,
        flags: MemberFlags::MUTABLE,
        source: SourceId(3),
        const_value: None,
    });
    members.set_signature(
        member,
        MemberSignature {
            return_type: TypeId::INT,
            type_params: Vec::new(),
            dispatch_receiver: Some(ReceiverInfo::new(
                ReceiverKind::Dispatch,
                TypeId::STRING,
                member,
            )),
            extension_receiver: None,
            additional_receivers: SmallVec::new(),
        },
    );
    members.initialize(
        member,
        MemberAccessors {
            getter: Some(GetterInfo {
                modality: Modality::Open,
                visibility: Visibility::Internal,
                flags: AccessorFlags::DEFAULT,
                kind: MemberKind::Declaration,
                return_type: TypeId::INT,
                initial: None,
                annotations: no_annotations(),
            }),
            ..MemberAccessors::default()
        },
    );
    (member, owner)
}

#[test]
fn defaults_equal_the_source_member() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let (member, owner) = simple_member(&types, &members, &mut interner);

    // An unmodified configuration builds a field-for-field twin.
    let copy = members.new_copy_builder(member).build(&types).unwrap();
    assert_ne!(copy, member);
    assert_eq!(members.owner(copy), owner);
    assert_eq!(members.name(copy), members.name(member));
    assert_eq!(members.modality(copy), Modality::Open);
    assert_eq!(members.visibility(copy), Visibility::Internal);
    assert_eq!(members.kind(copy), MemberKind::Declaration);
    assert_eq!(members.return_type(copy), TypeId::INT);
    assert_eq!(members.flags(copy), MemberFlags::MUTABLE);
    assert_eq!(
        members.dispatch_receiver(copy).unwrap().ty,
        TypeId::STRING
    );
    // Unless an original is configured, the copy is its own root.
    assert_eq!(members.root_original(copy), copy);
}

#[test]
fn builder_overrides_take_effect() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let (member, _) = simple_member(&types, &members, &mut interner);

    let new_owner = types.fresh_decl();
    let new_name = interner.intern("renamed");
    let copy = members
        .new_copy_builder(member)
        .with_owner(new_owner)
        .with_name(new_name)
        .with_modality(Modality::Final)
        .with_visibility(Visibility::Public)
        .with_kind(MemberKind::Synthesized)
        .with_return_type(TypeId::BOOLEAN)
        .with_dispatch_receiver(None)
        .build(&types)
        .unwrap();

    assert_eq!(members.owner(copy), new_owner);
    assert_eq!(members.name(copy), new_name);
    assert_eq!(members.modality(copy), Modality::Final);
    assert_eq!(members.visibility(copy), Visibility::Public);
    assert_eq!(members.kind(copy), MemberKind::Synthesized);
    assert_eq!(members.return_type(copy), TypeId::BOOLEAN);
    assert!(members.dispatch_receiver(copy).is_none());
    // Accessors inherit the configured modality and kind.
    let getter = members.getter(copy).unwrap();
    assert_eq!(getter.modality, Modality::Final);
    assert_eq!(getter.kind, MemberKind::Synthesized);
}

#[test]
fn copy_becomes_its_own_root() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let (member, _) = simple_member(&types, &members, &mut interner);

    let new_owner = types.fresh_decl();
    let copy = members
        .copy(
            &types,
            member,
            new_owner,
            Modality::Final,
            Visibility::Public,
            MemberKind::Delegation,
            false,
        )
        .unwrap();
    assert_eq!(members.original(copy), copy);
    assert_eq!(members.root_original(copy), copy);
    assert_eq!(members.owner(copy), new_owner);
    assert_eq!(members.kind(copy), MemberKind::Delegation);
    assert!(members.overridden(copy).is_empty());
}

#[test]
fn with_original_links_the_copy_chain() {
    let mut interner = Interner::new();
    let types = TypeStore::new();
    let members = MemberStore::new();
    let (member, _) = simple_member(&types, &members, &mut interner);

    let copy = members
        .new_copy_builder(member)
        .with_original(member)
        .build(&types)
        .unwrap();
    assert_eq!(members.original(copy), member);
    assert_eq!(members.root_original(copy), member);
}
