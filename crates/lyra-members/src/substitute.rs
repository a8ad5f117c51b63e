//! The member substitution engine.
//!
//! Consumes a source member plus a [`CopyConfig`] and produces a complete
//! specialized member, or fails with `ProjectedOut`. Positions follow the
//! member's read/write surfaces:
//!
//! | Part | Position | On failure |
//! |------|----------|------------|
//! | declared type, getter return | `Out` | abort |
//! | dispatch / extension / additional receiver | `In` | abort |
//! | setter value parameter | `In` | degrade: mark projected-out, bottom placeholder |
//! | type-parameter bounds | `Out` | abort |
//! | accessor initial signature | as above | drop the snapshot |
//! | overridden member | (whole-member) | drop the entry |
//!
//! Receiver failures abort uniformly; a member with a receiver that cannot
//! exist under the substitution does not exist under it either.

use crate::accessor::{GetterInfo, InitialSignature, SetterInfo, ValueParam};
use crate::copy::CopyConfig;
use crate::member::{MemberAccessors, MemberId, MemberSeed, MemberSignature, MemberStore};
use crate::meta::{FieldInfo, MemberFlags, MemberKind, SourceId, Visibility};
use crate::receiver::{ReceiverInfo, ReceiverKind};
use lyra_types::{
    substitute_type_parameters, ProjectedOut, Substitutor, TypeId, TypeStore, Variance,
};
use smallvec::SmallVec;
use tracing::debug;

pub(crate) fn do_substitute(
    types: &TypeStore,
    config: CopyConfig<'_>,
) -> Result<MemberId, ProjectedOut> {
    let members = config.members;
    let member = config.member;

    // Type parameters re-bind to a fresh declaration identity, so bounds
    // referencing sibling parameters resolve against the copy. The derived
    // substitution carries the renaming on top of the configured one.
    let copy_decl = types.fresh_decl();
    let source_params = match &config.type_parameters {
        Some(params) => params.clone(),
        None => members.type_parameters(member),
    };
    let (type_params, derived) =
        substitute_type_parameters(types, &source_params, &config.substitution, copy_decl)?;
    let substitutor = Substitutor::new(types, &derived);

    // The declared type is the member's read surface. If it is projected
    // out, the specialization does not exist.
    let return_type = substitutor.substitute(config.return_type, Variance::Out)?;

    // Receivers are consumed, so they substitute contravariantly; any
    // receiver that is projected out aborts the whole specialization.
    let dispatch_ty = config
        .dispatch_receiver
        .map(|ty| substitutor.substitute(ty, Variance::In))
        .transpose()?;
    let extension_ty = members
        .extension_receiver(member)
        .map(|receiver| substitutor.substitute(receiver.ty, Variance::In))
        .transpose()?;
    let additional_tys = members
        .additional_receivers(member)
        .iter()
        .map(|receiver| substitutor.substitute(receiver.ty, Variance::In))
        .collect::<Result<SmallVec<[TypeId; 1]>, _>>()?;

    // Accessors inherit the configured modality and kind; visibility goes
    // through fake-override normalization. The getter's own return type can
    // differ from the member type, so it substitutes separately.
    let getter = match members.getter(member) {
        None => None,
        Some(getter) => {
            let accessor_return = substitutor.substitute(getter.return_type, Variance::Out)?;
            Some(GetterInfo {
                modality: config.modality,
                visibility: normalize_fake_override_visibility(getter.visibility, config.kind),
                flags: getter.flags,
                kind: config.kind,
                return_type: accessor_return,
                initial: getter
                    .initial
                    .as_ref()
                    .and_then(|initial| substitute_initial(&substitutor, initial)),
                annotations: getter.annotations,
            })
        }
    };

    let mut setter_projected_out = false;
    let setter = match members.setter(member) {
        None => None,
        Some(setter) => {
            let value_param = match substitutor.substitute(setter.value_param.ty, Variance::In) {
                Ok(ty) => ValueParam {
                    name: setter.value_param.name,
                    ty,
                    annotations: setter.value_param.annotations.clone(),
                },
                Err(failure) => {
                    // The member stays usable read-only. The placeholder is
                    // typed with the bottom type, so the setter keeps its
                    // shape for tooling but is uncallable in practice.
                    debug!(member = member.0, %failure, "setter projected out");
                    setter_projected_out = true;
                    ValueParam {
                        name: setter.value_param.name,
                        ty: TypeId::NOTHING,
                        annotations: setter.value_param.annotations.clone(),
                    }
                }
            };
            Some(SetterInfo {
                modality: config.modality,
                visibility: normalize_fake_override_visibility(setter.visibility, config.kind),
                flags: setter.flags,
                kind: config.kind,
                value_param,
                initial: setter
                    .initial
                    .as_ref()
                    .and_then(|initial| substitute_initial(&substitutor, initial)),
                annotations: setter.annotations,
            })
        }
    };

    // Everything fallible has succeeded; allocate the copy and attach.
    let flags = members.flags(member);
    let seed = MemberSeed {
        decl: copy_decl,
        owner: config.owner,
        name: config.name,
        annotations: members.annotations(member),
        modality: config.modality,
        visibility: normalize_fake_override_visibility(config.visibility, config.kind),
        kind: config.kind,
        flags,
        source: source_for_copy(members, member, &config),
        // Constants are substitution-invariant; the resolved value carries
        // over unchanged.
        const_value: if flags.contains(MemberFlags::CONST) {
            members.const_value(member)
        } else {
            None
        },
    };
    let id = members.register_copy(seed, config.original);

    members.set_signature(
        id,
        MemberSignature {
            return_type,
            type_params,
            dispatch_receiver: dispatch_ty
                .map(|ty| ReceiverInfo::new(ReceiverKind::Dispatch, ty, id)),
            extension_receiver: extension_ty
                .map(|ty| ReceiverInfo::new(ReceiverKind::Extension, ty, id)),
            additional_receivers: additional_tys
                .into_iter()
                .map(|ty| ReceiverInfo::new(ReceiverKind::Additional, ty, id))
                .collect(),
        },
    );

    // Field markers are fresh per copy, referencing the copy.
    members.initialize(
        id,
        MemberAccessors {
            getter,
            setter,
            backing_field: members.backing_field(member).map(|field| FieldInfo {
                owner: id,
                annotations: field.annotations,
            }),
            delegate_field: members.delegate_field(member).map(|field| FieldInfo {
                owner: id,
                annotations: field.annotations,
            }),
            setter_projected_out,
        },
    );

    if config.copy_overrides {
        let mut overridden = Vec::new();
        for ancestor in members.overridden(member) {
            // An ancestor that does not exist under this substitution cannot
            // be overridden; it drops out of the set.
            match members.substitute(types, ancestor, &derived) {
                Ok(substituted) => overridden.push(substituted),
                Err(failure) => {
                    debug!(
                        member = member.0,
                        ancestor = ancestor.0,
                        %failure,
                        "overridden member dropped"
                    );
                }
            }
        }
        members.set_overridden(id, overridden);
    }

    debug!(member = member.0, copy = id.0, "member specialized");
    Ok(id)
}

/// A private member must not be reachable through inherited-member lookup:
/// a fake-override copy of one gets the dedicated marker, never plain
/// `Private`.
pub(crate) fn normalize_fake_override_visibility(
    previous: Visibility,
    kind: MemberKind,
) -> Visibility {
    if kind == MemberKind::FakeOverride && previous.normalize() == Visibility::Private {
        Visibility::InvisibleFake
    } else {
        previous
    }
}

/// Source element for a copy: the original's source when asked to preserve
/// it, otherwise none.
fn source_for_copy(members: &MemberStore, member: MemberId, config: &CopyConfig<'_>) -> SourceId {
    if config.preserve_source {
        let from = config
            .original
            .unwrap_or_else(|| members.root_original(member));
        members.source(from)
    } else {
        SourceId::NONE
    }
}

/// Substitute an initial-signature snapshot. The snapshot is recovery
/// metadata; if it cannot be expressed under the substitution, it is
/// dropped rather than failing the member.
fn substitute_initial(
    substitutor: &Substitutor<'_>,
    initial: &InitialSignature,
) -> Option<InitialSignature> {
    let return_type = substitutor
        .substitute(initial.return_type, Variance::Out)
        .ok()?;
    let value_param = match &initial.value_param {
        None => None,
        Some(param) => Some(ValueParam {
            name: param.name,
            ty: substitutor.substitute(param.ty, Variance::In).ok()?,
            annotations: param.annotations.clone(),
        }),
    };
    Some(InitialSignature {
        return_type,
        value_param,
    })
}

#[cfg(test)]
#[path = "../tests/substitute_tests.rs"]
mod tests;
