//! Vocabulary of the member model: kinds, modality, visibility, flag words,
//! constant values.

use bitflags::bitflags;
use lyra_common::Atom;
use std::sync::Arc;

/// How a member came to be in a declaration's member list.
///
/// Kinds are mutually exclusive, not combinable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Written in source.
    Declaration,

    /// Present only to represent an inherited member in a subtype's member
    /// list; the subtype does not redeclare it.
    FakeOverride,

    /// Implemented by delegation.
    Delegation,

    /// Produced by the compiler (e.g. data-class components).
    Synthesized,
}

/// Openness of a member for overriding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Modality {
    Final,
    Open,
    Abstract,
    Sealed,
}

/// Member visibility.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Private,
    Protected,
    Internal,
    Public,

    /// A private ancestor member seen through a fake override. Distinct from
    /// `Private` so "privately declared here" and "private in an ancestor,
    /// invisible here" never read the same; inherited-member lookup skips it.
    InvisibleFake,
}

impl Visibility {
    /// Collapse the fake-override marker for queries that only care about
    /// the effective access level.
    pub fn normalize(self) -> Visibility {
        match self {
            Visibility::InvisibleFake => Visibility::Private,
            other => other,
        }
    }

    pub fn is_private_like(self) -> bool {
        self.normalize() == Visibility::Private
    }
}

bitflags! {
    /// Boolean facts about a member, fixed at construction.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct MemberFlags: u8 {
        /// Declared `var` (a setter surface exists).
        const MUTABLE   = 1 << 0;
        const LATEINIT  = 1 << 1;
        const CONST     = 1 << 2;
        const EXPECT    = 1 << 3;
        const ACTUAL    = 1 << 4;
        const EXTERNAL  = 1 << 5;
        const DELEGATED = 1 << 6;
    }
}

bitflags! {
    /// Boolean facts about an accessor.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct AccessorFlags: u8 {
        /// Compiler-generated default accessor (no body in source).
        const DEFAULT  = 1 << 0;
        const EXTERNAL = 1 << 1;
        const INLINE   = 1 << 2;
    }
}

/// A resolved compile-time constant. Substitution-invariant: specialized
/// copies carry the value unchanged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstValue {
    Int(i64),
    Boolean(bool),
    Str(Atom),
}

/// Opaque handle to a source element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(pub u32);

impl SourceId {
    /// Copies get no source unless explicitly asked to preserve it.
    pub const NONE: Self = Self(0);

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// Annotation names attached to a member, accessor, parameter, or field
/// marker. Immutable and shared across specialized copies.
pub type Annotations = Arc<[Atom]>;

/// The empty annotation set.
pub fn no_annotations() -> Annotations {
    Vec::new().into()
}

/// A backing-field or delegate-field marker. Every specialized copy gets a
/// fresh marker referencing the copy, never shared with the original.
#[derive(Clone, Debug)]
pub struct FieldInfo {
    pub owner: crate::member::MemberId,
    pub annotations: Annotations,
}

#[cfg(test)]
#[path = "../tests/meta_tests.rs"]
mod tests;
