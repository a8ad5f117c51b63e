//! Receiver parameters of a member.

use crate::member::MemberId;
use lyra_types::TypeId;

/// Which receiver slot a receiver parameter fills.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    /// The instance the member is dispatched on (`this` of the containing
    /// class).
    Dispatch,

    /// The extension receiver of an extension member.
    Extension,

    /// Context-style extra receivers; a member may carry zero or more.
    Additional,
}

/// A receiver parameter: a consumed value, so its type substitutes
/// contravariantly.
///
/// `owner` is a back-reference to the declaration the receiver belongs to:
/// a lookup relation, not ownership.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReceiverInfo {
    pub kind: ReceiverKind,
    pub ty: TypeId,
    pub owner: MemberId,
}

impl ReceiverInfo {
    pub fn new(kind: ReceiverKind, ty: TypeId, owner: MemberId) -> Self {
        Self { kind, ty, owner }
    }
}
