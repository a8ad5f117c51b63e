use super::*;

#[test]
fn invisible_fake_normalizes_to_private() {
    assert_eq!(Visibility::InvisibleFake.normalize(), Visibility::Private);
    assert!(Visibility::InvisibleFake.is_private_like());
    assert!(Visibility::Private.is_private_like());
    assert!(!Visibility::Internal.is_private_like());
    assert_eq!(Visibility::Public.normalize(), Visibility::Public);
}

#[test]
fn member_flags_are_independent_bits() {
    let flags = MemberFlags::MUTABLE | MemberFlags::CONST;
    assert!(flags.contains(MemberFlags::MUTABLE));
    assert!(flags.contains(MemberFlags::CONST));
    assert!(!flags.contains(MemberFlags::LATEINIT));
    assert!(!flags.contains(MemberFlags::DELEGATED));
}

#[test]
fn no_annotations_is_empty() {
    assert!(no_annotations().is_empty());
}

#[test]
fn source_none_sentinel() {
    assert!(SourceId::NONE.is_none());
    assert!(!SourceId(3).is_none());
}
