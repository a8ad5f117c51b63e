//! The member declaration store.
//!
//! Members are immutable after initialization and referenced by `MemberId`;
//! the store is the single owner of all member records. Completion happens
//! in two write-once phases, mirroring how the front end produces a member:
//!
//! 1. `register`: identity fields (owner, name, kind, visibility, flags, …)
//! 2. `set_signature`: declared type, type parameters, receivers
//! 3. `initialize`: accessor pair and field markers
//!
//! Re-running a phase, or querying data a phase has not attached yet, is a
//! contract violation and panics: it indicates a bug in the caller, not bad
//! user input. The overridden-member set is likewise assignable exactly
//! once.
//!
//! Specialized copies are produced by the engine in `substitute`; an
//! original is never mutated, so concurrent callers may substitute the same
//! member under different substitutions in parallel.

use crate::accessor::{GetterInfo, SetterInfo};
use crate::copy::CopyConfig;
use crate::meta::{
    Annotations, ConstValue, FieldInfo, MemberFlags, MemberKind, Modality, SourceId, Visibility,
};
use crate::receiver::ReceiverInfo;
use dashmap::DashMap;
use indexmap::IndexSet;
use lyra_common::Atom;
use lyra_types::{DeclId, ProjectedOut, TypeId, TypeParamId, TypeStore, TypeSubstitution};
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

/// Handle to a member record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub u32);

impl MemberId {
    /// Sentinel value for an invalid `MemberId`.
    pub const INVALID: Self = Self(0);

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Identity fields of a member, supplied at registration.
#[derive(Clone, Debug)]
pub struct MemberSeed {
    /// The member's own identity in the type world (owner of its type
    /// parameters).
    pub decl: DeclId,
    /// The containing declaration.
    pub owner: DeclId,
    pub name: Atom,
    pub annotations: Annotations,
    pub modality: Modality,
    pub visibility: Visibility,
    pub kind: MemberKind,
    pub flags: MemberFlags,
    pub source: SourceId,
    /// Resolved compile-time constant; only meaningful with
    /// `MemberFlags::CONST`.
    pub const_value: Option<ConstValue>,
}

/// Type-dependent data attached by `set_signature`.
#[derive(Clone, Debug)]
pub struct MemberSignature {
    pub return_type: TypeId,
    pub type_params: Vec<TypeParamId>,
    pub dispatch_receiver: Option<ReceiverInfo>,
    pub extension_receiver: Option<ReceiverInfo>,
    pub additional_receivers: SmallVec<[ReceiverInfo; 1]>,
}

/// Accessor data attached by `initialize`.
#[derive(Clone, Debug, Default)]
pub struct MemberAccessors {
    pub getter: Option<GetterInfo>,
    pub setter: Option<SetterInfo>,
    pub backing_field: Option<FieldInfo>,
    pub delegate_field: Option<FieldInfo>,
    /// The setter exists but its value parameter could not be typed under
    /// the substitution; the member is effectively read-only.
    pub setter_projected_out: bool,
}

#[derive(Clone, Debug)]
struct MemberData {
    decl: DeclId,
    owner: DeclId,
    /// The untransformed root of the copied-from chain; `self` for a root.
    original: MemberId,
    name: Atom,
    annotations: Annotations,
    modality: Modality,
    visibility: Visibility,
    kind: MemberKind,
    flags: MemberFlags,
    source: SourceId,
    const_value: Option<ConstValue>,
    signature: Option<MemberSignature>,
    accessors: Option<MemberAccessors>,
    overridden: Option<IndexSet<MemberId, FxBuildHasher>>,
}

/// Thread-safe storage for member declarations.
pub struct MemberStore {
    members: DashMap<MemberId, MemberData>,
    next_id: AtomicU32,
}

impl Default for MemberStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberStore {
    pub fn new() -> Self {
        Self {
            members: DashMap::new(),
            next_id: AtomicU32::new(1),
        }
    }

    // =========================================================================
    // Registration and completion
    // =========================================================================

    /// Register a root declaration. The new member is its own original.
    pub fn register(&self, seed: MemberSeed) -> MemberId {
        self.register_copy(seed, None)
    }

    /// Register a member record; `original` is the member this one was
    /// copied from, or `None` for a record that is its own root.
    pub(crate) fn register_copy(&self, seed: MemberSeed, original: Option<MemberId>) -> MemberId {
        let id = MemberId(self.next_id.fetch_add(1, Ordering::SeqCst));
        trace!(
            member_id = id.0,
            kind = ?seed.kind,
            original = original.map(|o| o.0),
            "MemberStore::register"
        );
        self.members.insert(
            id,
            MemberData {
                decl: seed.decl,
                owner: seed.owner,
                original: original.unwrap_or(id),
                name: seed.name,
                annotations: seed.annotations,
                modality: seed.modality,
                visibility: seed.visibility,
                kind: seed.kind,
                flags: seed.flags,
                source: seed.source,
                const_value: seed.const_value,
                signature: None,
                accessors: None,
                overridden: None,
            },
        );
        id
    }

    /// Attach the declared type, type parameters, and receivers.
    ///
    /// # Panics
    /// If the signature was already set.
    pub fn set_signature(&self, id: MemberId, signature: MemberSignature) {
        let mut entry = self.entry_mut(id);
        assert!(
            entry.signature.is_none(),
            "signature of MemberId({}) was already set",
            id.0
        );
        entry.signature = Some(signature);
    }

    /// Attach the accessor pair and field markers.
    ///
    /// # Panics
    /// If called before `set_signature`, called twice, or handed a
    /// `setter_projected_out` flag without a setter.
    pub fn initialize(&self, id: MemberId, accessors: MemberAccessors) {
        let mut entry = self.entry_mut(id);
        assert!(
            entry.signature.is_some(),
            "MemberId({}) was initialized before set_signature",
            id.0
        );
        assert!(
            entry.accessors.is_none(),
            "accessors of MemberId({}) were already initialized",
            id.0
        );
        assert!(
            !accessors.setter_projected_out || accessors.setter.is_some(),
            "MemberId({}) marked setter-projected-out without a setter",
            id.0
        );
        entry.accessors = Some(accessors);
    }

    /// Assign the overridden-member set. Duplicates collapse by identity.
    ///
    /// # Panics
    /// If the set was already assigned.
    pub fn set_overridden(&self, id: MemberId, overridden: impl IntoIterator<Item = MemberId>) {
        let mut entry = self.entry_mut(id);
        assert!(
            entry.overridden.is_none(),
            "overridden set of MemberId({}) was already assigned",
            id.0
        );
        entry.overridden = Some(overridden.into_iter().collect());
    }

    // =========================================================================
    // Identity queries
    // =========================================================================

    pub fn decl(&self, id: MemberId) -> DeclId {
        self.with_data(id, |data| data.decl)
    }

    pub fn owner(&self, id: MemberId) -> DeclId {
        self.with_data(id, |data| data.owner)
    }

    pub fn name(&self, id: MemberId) -> Atom {
        self.with_data(id, |data| data.name)
    }

    pub fn annotations(&self, id: MemberId) -> Annotations {
        self.with_data(id, |data| data.annotations.clone())
    }

    pub fn modality(&self, id: MemberId) -> Modality {
        self.with_data(id, |data| data.modality)
    }

    pub fn visibility(&self, id: MemberId) -> Visibility {
        self.with_data(id, |data| data.visibility)
    }

    pub fn kind(&self, id: MemberId) -> MemberKind {
        self.with_data(id, |data| data.kind)
    }

    pub fn flags(&self, id: MemberId) -> MemberFlags {
        self.with_data(id, |data| data.flags)
    }

    pub fn source(&self, id: MemberId) -> SourceId {
        self.with_data(id, |data| data.source)
    }

    pub fn const_value(&self, id: MemberId) -> Option<ConstValue> {
        self.with_data(id, |data| data.const_value)
    }

    pub fn is_mutable(&self, id: MemberId) -> bool {
        self.flags(id).contains(MemberFlags::MUTABLE)
    }

    pub fn is_const(&self, id: MemberId) -> bool {
        self.flags(id).contains(MemberFlags::CONST)
    }

    /// The member this one was directly copied from (`id` itself for roots).
    pub fn original(&self, id: MemberId) -> MemberId {
        self.with_data(id, |data| data.original)
    }

    /// Follow the copied-from relation to the untransformed root. The
    /// relation is acyclic by construction, so this terminates.
    pub fn root_original(&self, id: MemberId) -> MemberId {
        let mut current = id;
        loop {
            let original = self.original(current);
            if original == current {
                return current;
            }
            current = original;
        }
    }

    // =========================================================================
    // Signature queries (panic before `set_signature`)
    // =========================================================================

    pub fn return_type(&self, id: MemberId) -> TypeId {
        self.with_signature(id, |signature| signature.return_type)
    }

    pub fn type_parameters(&self, id: MemberId) -> Vec<TypeParamId> {
        self.with_signature(id, |signature| signature.type_params.clone())
    }

    pub fn dispatch_receiver(&self, id: MemberId) -> Option<ReceiverInfo> {
        self.with_signature(id, |signature| signature.dispatch_receiver)
    }

    pub fn extension_receiver(&self, id: MemberId) -> Option<ReceiverInfo> {
        self.with_signature(id, |signature| signature.extension_receiver)
    }

    pub fn additional_receivers(&self, id: MemberId) -> SmallVec<[ReceiverInfo; 1]> {
        self.with_signature(id, |signature| signature.additional_receivers.clone())
    }

    // =========================================================================
    // Accessor queries (panic before `initialize`)
    // =========================================================================

    pub fn getter(&self, id: MemberId) -> Option<GetterInfo> {
        self.with_accessors(id, |accessors| accessors.getter.clone())
    }

    pub fn setter(&self, id: MemberId) -> Option<SetterInfo> {
        self.with_accessors(id, |accessors| accessors.setter.clone())
    }

    /// The accessor pair that exists on this member.
    pub fn accessors(&self, id: MemberId) -> (Option<GetterInfo>, Option<SetterInfo>) {
        self.with_accessors(id, |accessors| {
            (accessors.getter.clone(), accessors.setter.clone())
        })
    }

    pub fn backing_field(&self, id: MemberId) -> Option<FieldInfo> {
        self.with_accessors(id, |accessors| accessors.backing_field.clone())
    }

    pub fn delegate_field(&self, id: MemberId) -> Option<FieldInfo> {
        self.with_accessors(id, |accessors| accessors.delegate_field.clone())
    }

    /// True when the setter exists only as an uncallable bottom-typed
    /// placeholder; consumers must treat the member as read-only even though
    /// it is declared mutable.
    pub fn is_setter_projected_out(&self, id: MemberId) -> bool {
        self.with_accessors(id, |accessors| accessors.setter_projected_out)
    }

    // =========================================================================
    // Overridden members
    // =========================================================================

    /// Members this one overrides, in assignment order; empty until the set
    /// is assigned.
    pub fn overridden(&self, id: MemberId) -> Vec<MemberId> {
        self.with_data(id, |data| {
            data.overridden
                .as_ref()
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default()
        })
    }

    // =========================================================================
    // Specialization
    // =========================================================================

    /// Start a specialization request. Defaults equal the member's own
    /// fields; the member must have a signature.
    pub fn new_copy_builder(&self, id: MemberId) -> CopyConfig<'_> {
        CopyConfig::for_member(self, id)
    }

    /// Specialize a member under a substitution, keeping its root original.
    ///
    /// The empty substitution is the identity: the member itself is
    /// returned, not a copy.
    pub fn substitute(
        &self,
        types: &TypeStore,
        id: MemberId,
        substitution: &TypeSubstitution,
    ) -> Result<MemberId, ProjectedOut> {
        if substitution.is_empty() {
            return Ok(id);
        }
        self.new_copy_builder(id)
            .with_substitution(substitution.clone())
            .with_original(self.root_original(id))
            .build(types)
    }

    /// Copy a member to a new owner with new modality/visibility/kind. The
    /// copy becomes its own root original.
    pub fn copy(
        &self,
        types: &TypeStore,
        id: MemberId,
        new_owner: DeclId,
        modality: Modality,
        visibility: Visibility,
        kind: MemberKind,
        copy_overrides: bool,
    ) -> Result<MemberId, ProjectedOut> {
        self.new_copy_builder(id)
            .with_owner(new_owner)
            .with_modality(modality)
            .with_visibility(visibility)
            .with_kind(kind)
            .with_copy_overrides(copy_overrides)
            .build(types)
    }

    // =========================================================================
    // Internal access
    // =========================================================================

    fn with_data<R>(&self, id: MemberId, read: impl FnOnce(&MemberData) -> R) -> R {
        let entry = self
            .members
            .get(&id)
            .unwrap_or_else(|| panic!("MemberId({}) was not registered in this store", id.0));
        read(&entry)
    }

    fn with_signature<R>(&self, id: MemberId, read: impl FnOnce(&MemberSignature) -> R) -> R {
        self.with_data(id, |data| {
            let signature = data.signature.as_ref().unwrap_or_else(|| {
                panic!("signature of MemberId({}) was queried before set_signature", id.0)
            });
            read(signature)
        })
    }

    fn with_accessors<R>(&self, id: MemberId, read: impl FnOnce(&MemberAccessors) -> R) -> R {
        self.with_data(id, |data| {
            let accessors = data.accessors.as_ref().unwrap_or_else(|| {
                panic!("accessors of MemberId({}) were queried before initialize", id.0)
            });
            read(accessors)
        })
    }

    fn entry_mut(&self, id: MemberId) -> dashmap::mapref::one::RefMut<'_, MemberId, MemberData> {
        self.members
            .get_mut(&id)
            .unwrap_or_else(|| panic!("MemberId({}) was not registered in this store", id.0))
    }
}

#[cfg(test)]
#[path = "../tests/member_tests.rs"]
mod tests;
