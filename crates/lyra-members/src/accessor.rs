//! Getter and setter records.

use crate::meta::{AccessorFlags, Annotations, MemberKind, Modality, Visibility};
use lyra_common::Atom;
use lyra_types::TypeId;

/// The single value parameter of a setter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueParam {
    pub name: Atom,
    pub ty: TypeId,
    pub annotations: Annotations,
}

/// A value snapshot of the accessor signature a copy was specialized from.
///
/// Kept across rounds of substitution so tooling can recover the original
/// parameter names and annotations of a many-times-specialized accessor.
/// Being a plain value, it substitutes directly, without recursing into
/// other member records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitialSignature {
    pub return_type: TypeId,
    /// Present for setters only.
    pub value_param: Option<ValueParam>,
}

/// A property getter.
///
/// The return type is tracked separately from the owning member's declared
/// type: synthesized members may give the getter its own type.
#[derive(Clone, Debug)]
pub struct GetterInfo {
    pub modality: Modality,
    pub visibility: Visibility,
    pub flags: AccessorFlags,
    pub kind: MemberKind,
    pub return_type: TypeId,
    pub initial: Option<InitialSignature>,
    pub annotations: Annotations,
}

/// A property setter. Carries exactly one value parameter.
#[derive(Clone, Debug)]
pub struct SetterInfo {
    pub modality: Modality,
    pub visibility: Visibility,
    pub flags: AccessorFlags,
    pub kind: MemberKind,
    pub value_param: ValueParam,
    pub initial: Option<InitialSignature>,
    pub annotations: Annotations,
}

impl SetterInfo {
    /// Build a setter from a parameter list. A list that is not exactly one
    /// parameter long is a caller bug, not user input.
    pub fn from_params(
        modality: Modality,
        visibility: Visibility,
        flags: AccessorFlags,
        kind: MemberKind,
        mut params: Vec<ValueParam>,
        annotations: Annotations,
    ) -> Self {
        assert!(
            params.len() == 1,
            "a setter takes exactly one value parameter, got {}",
            params.len()
        );
        Self {
            modality,
            visibility,
            flags,
            kind,
            value_param: params.remove(0),
            initial: None,
            annotations,
        }
    }
}
