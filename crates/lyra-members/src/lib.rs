//! Member declaration model and the specialization engine.
//!
//! A property-like member (declared type, optional accessor pair, type
//! parameters, receivers) is modeled as an immutable-after-initialization
//! record in a [`MemberStore`]. Specializing one under a type substitution
//! goes through [`CopyConfig`]: a single-use configuration whose terminal
//! `build` either produces a complete new member or fails with
//! `ProjectedOut`. Originals are never mutated; every specialization is a
//! disjoint new record.
//!
//! ```ignore
//! let copy = members
//!     .new_copy_builder(member)
//!     .with_substitution(substitution)
//!     .with_original(members.root_original(member))
//!     .build(&types)?;
//! ```

pub mod accessor;
pub mod copy;
pub mod member;
pub mod meta;
pub mod receiver;
pub mod substitute;

pub use accessor::{GetterInfo, InitialSignature, SetterInfo, ValueParam};
pub use copy::CopyConfig;
pub use member::{MemberAccessors, MemberId, MemberSeed, MemberSignature, MemberStore};
pub use meta::{
    AccessorFlags, Annotations, ConstValue, FieldInfo, MemberFlags, MemberKind, Modality,
    SourceId, Visibility, no_annotations,
};
pub use receiver::{ReceiverInfo, ReceiverKind};
