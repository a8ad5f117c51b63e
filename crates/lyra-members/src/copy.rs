//! Specialization request configuration.

use crate::member::{MemberId, MemberStore};
use crate::meta::{MemberKind, Modality, Visibility};
use crate::substitute::do_substitute;
use lyra_common::Atom;
use lyra_types::{DeclId, ProjectedOut, TypeId, TypeParamId, TypeStore, TypeSubstitution};

/// A single-use specialization request against one member.
///
/// Created by `MemberStore::new_copy_builder`, so every default equals the
/// source member's own field: building an unmodified configuration with a
/// substitution is exactly "this member, under that substitution". The
/// terminal [`build`](Self::build) consumes the configuration and returns a
/// fully built member or a failure, never a partially initialized record.
#[derive(Clone)]
pub struct CopyConfig<'a> {
    pub(crate) members: &'a MemberStore,
    pub(crate) member: MemberId,
    pub(crate) owner: DeclId,
    pub(crate) modality: Modality,
    pub(crate) visibility: Visibility,
    pub(crate) kind: MemberKind,
    pub(crate) name: Atom,
    pub(crate) return_type: TypeId,
    pub(crate) dispatch_receiver: Option<TypeId>,
    pub(crate) type_parameters: Option<Vec<TypeParamId>>,
    pub(crate) substitution: TypeSubstitution,
    pub(crate) original: Option<MemberId>,
    pub(crate) copy_overrides: bool,
    pub(crate) preserve_source: bool,
}

impl<'a> CopyConfig<'a> {
    pub(crate) fn for_member(members: &'a MemberStore, member: MemberId) -> Self {
        Self {
            members,
            member,
            owner: members.owner(member),
            modality: members.modality(member),
            visibility: members.visibility(member),
            kind: members.kind(member),
            name: members.name(member),
            return_type: members.return_type(member),
            dispatch_receiver: members.dispatch_receiver(member).map(|receiver| receiver.ty),
            type_parameters: None,
            substitution: TypeSubstitution::empty(),
            original: None,
            copy_overrides: true,
            preserve_source: false,
        }
    }

    /// Containing declaration of the copy.
    pub fn with_owner(mut self, owner: DeclId) -> Self {
        self.owner = owner;
        self
    }

    /// The member the copy records as its original. `None` (the default)
    /// makes the copy its own root.
    pub fn with_original(mut self, original: MemberId) -> Self {
        self.original = Some(original);
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_kind(mut self, kind: MemberKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_name(mut self, name: Atom) -> Self {
        self.name = name;
        self
    }

    /// Override the declared type the copy starts from.
    pub fn with_return_type(mut self, return_type: TypeId) -> Self {
        self.return_type = return_type;
        self
    }

    /// Override the type-parameter list to copy instead of the member's own.
    pub fn with_type_parameters(mut self, params: Vec<TypeParamId>) -> Self {
        self.type_parameters = Some(params);
        self
    }

    /// Override (or remove) the dispatch receiver of the copy.
    pub fn with_dispatch_receiver(mut self, receiver: Option<TypeId>) -> Self {
        self.dispatch_receiver = receiver;
        self
    }

    pub fn with_substitution(mut self, substitution: TypeSubstitution) -> Self {
        self.substitution = substitution;
        self
    }

    /// Whether the copy re-derives the overridden-member set (default true).
    pub fn with_copy_overrides(mut self, copy_overrides: bool) -> Self {
        self.copy_overrides = copy_overrides;
        self
    }

    /// Keep the original's source element on the copy instead of dropping
    /// it.
    pub fn preserving_source_element(mut self) -> Self {
        self.preserve_source = true;
        self
    }

    /// Run the substitution engine.
    pub fn build(self, types: &TypeStore) -> Result<MemberId, ProjectedOut> {
        do_substitute(types, self)
    }
}

#[cfg(test)]
#[path = "../tests/copy_tests.rs"]
mod tests;
