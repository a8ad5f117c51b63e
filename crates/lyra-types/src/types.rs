//! Structural type representation.
//!
//! Types are hash-consed: structurally equal `TypeData` always maps to the
//! same `TypeId`, so equality checks are integer comparisons and substitution
//! can return its input unchanged when nothing was replaced.

use crate::store::{ClassId, ProjectionListId, TypeParamId};
use serde::Serialize;
use std::fmt;

/// Interned type handle.
///
/// Intrinsic types get fixed ids allocated by `TypeStore::new`, so they can
/// be named as constants without a store lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Sentinel value for an invalid `TypeId`.
    pub const INVALID: Self = Self(0);

    /// `Any`, the top type.
    pub const ANY: Self = Self(1);
    /// `Nothing`, the bottom type, a subtype of everything. Used as the
    /// placeholder parameter type of a projected-out setter.
    pub const NOTHING: Self = Self(2);
    /// `Unit`.
    pub const UNIT: Self = Self(3);
    /// `Boolean`.
    pub const BOOLEAN: Self = Self(4);
    /// `Int`.
    pub const INT: Self = Self(5);
    /// `String`.
    pub const STRING: Self = Self(6);

    /// First id handed out for non-intrinsic types.
    pub(crate) const FIRST_DYNAMIC: u32 = 7;

    /// Check if this `TypeId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Builtin type kinds with fixed `TypeId`s.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IntrinsicKind {
    Any,
    Nothing,
    Unit,
    Boolean,
    Int,
    String,
}

impl IntrinsicKind {
    /// All intrinsics, in `TypeId` allocation order.
    pub(crate) const ALL: [IntrinsicKind; 6] = [
        IntrinsicKind::Any,
        IntrinsicKind::Nothing,
        IntrinsicKind::Unit,
        IntrinsicKind::Boolean,
        IntrinsicKind::Int,
        IntrinsicKind::String,
    ];
}

/// Structural type data, interned by `TypeStore`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// A builtin type.
    Intrinsic(IntrinsicKind),

    /// A free occurrence of a type parameter.
    Parameter(TypeParamId),

    /// The nullable form of a type (`T?`).
    Nullable(TypeId),

    /// A class constructor applied to projection arguments
    /// (`Box<out Int>`, `Map<K, V>`).
    Applied {
        class: ClassId,
        args: ProjectionListId,
    },
}

/// Declaration-site variance of a type parameter, and the position polarity
/// tracked during substitution.
///
/// | Variance | Position | Example |
/// |-----------|----------|---------|
/// | `Out` | read-only safe (getter return) | `class Producer<out E>` |
/// | `In` | write-only safe (setter value, receivers) | `class Consumer<in E>` |
/// | `Invariant` | both reads and writes | `class Box<T>` |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Variance {
    Invariant,
    In,
    Out,
}

impl Variance {
    /// Compose this position with a nested position.
    ///
    /// An invariant position absorbs everything; two contravariant hops
    /// cancel out (`In ∘ In = Out`).
    pub fn compose(self, inner: Variance) -> Variance {
        match (self, inner) {
            (Variance::Invariant, _) | (_, Variance::Invariant) => Variance::Invariant,
            (Variance::Out, v) => v,
            (Variance::In, Variance::Out) => Variance::In,
            (Variance::In, Variance::In) => Variance::Out,
        }
    }

    /// The flipped polarity.
    pub fn opposite(self) -> Variance {
        match self {
            Variance::Invariant => Variance::Invariant,
            Variance::In => Variance::Out,
            Variance::Out => Variance::In,
        }
    }

    /// Source-level keyword, empty for invariant.
    pub fn label(self) -> &'static str {
        match self {
            Variance::Invariant => "",
            Variance::In => "in",
            Variance::Out => "out",
        }
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variance::Invariant => f.write_str("invariant"),
            other => f.write_str(other.label()),
        }
    }
}

/// Use-site variance of a type argument.
///
/// `Star` is the erased/unknown argument (`Box<*>`): readable at its upper
/// bound, unwritable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ProjectionKind {
    Invariant,
    In,
    Out,
    Star,
}

impl ProjectionKind {
    /// The declaration-site variance this projection corresponds to, if any.
    pub fn variance(self) -> Option<Variance> {
        match self {
            ProjectionKind::Invariant => Some(Variance::Invariant),
            ProjectionKind::In => Some(Variance::In),
            ProjectionKind::Out => Some(Variance::Out),
            ProjectionKind::Star => None,
        }
    }
}

impl From<Variance> for ProjectionKind {
    fn from(variance: Variance) -> Self {
        match variance {
            Variance::Invariant => ProjectionKind::Invariant,
            Variance::In => ProjectionKind::In,
            Variance::Out => ProjectionKind::Out,
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionKind::Invariant => f.write_str("invariant"),
            ProjectionKind::In => f.write_str("in"),
            ProjectionKind::Out => f.write_str("out"),
            ProjectionKind::Star => f.write_str("*"),
        }
    }
}

/// A type argument: a type plus its use-site variance.
///
/// For a `Star` projection, `ty` records the erased upper bound of the
/// corresponding parameter; that is what a read at the erased slot produces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeProjection {
    pub kind: ProjectionKind,
    pub ty: TypeId,
}

impl TypeProjection {
    /// An invariant argument (`Box<Int>`).
    pub fn invariant(ty: TypeId) -> Self {
        Self {
            kind: ProjectionKind::Invariant,
            ty,
        }
    }

    /// An `in`-projected argument (`Box<in Int>`).
    pub fn contravariant(ty: TypeId) -> Self {
        Self {
            kind: ProjectionKind::In,
            ty,
        }
    }

    /// An `out`-projected argument (`Box<out Int>`).
    pub fn covariant(ty: TypeId) -> Self {
        Self {
            kind: ProjectionKind::Out,
            ty,
        }
    }

    /// A star projection whose reads erase to `upper_bound`.
    pub fn star(upper_bound: TypeId) -> Self {
        Self {
            kind: ProjectionKind::Star,
            ty: upper_bound,
        }
    }

    pub fn is_star(self) -> bool {
        self.kind == ProjectionKind::Star
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
