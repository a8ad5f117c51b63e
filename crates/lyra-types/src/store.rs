//! Interning store for types, type parameters, and classes.
//!
//! `TypeStore` is the single owner of all type-side identity:
//!
//! - hash-consed `TypeData` (equal data, equal `TypeId`, O(1) equality)
//! - interned projection argument lists
//! - the type-parameter registry, with a two-phase bound protocol: a
//!   parameter is allocated first and its bounds are sealed later, so bounds
//!   that reference sibling parameters of the same declaration can be built
//!   against identities that already exist
//! - the class registry and `DeclId` allocation
//!
//! Everything is `&self` and thread-safe; concurrent substitutions may share
//! one store.

use crate::types::{IntrinsicKind, TypeData, TypeId, TypeProjection, Variance};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use lyra_common::Atom;
use serde::Serialize;
use smallvec::SmallVec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

/// Identity of a declaration that can own type parameters (a class or a
/// member). Opaque: the store only hands out fresh ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
pub struct DeclId(pub u32);

impl DeclId {
    /// Sentinel value for an invalid `DeclId`.
    pub const INVALID: Self = Self(0);

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Identity of a type parameter.
///
/// A substituted copy of a declaration allocates *fresh* parameter ids bound
/// to the new owner; two parameters with the same name on different copies
/// never compare equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
pub struct TypeParamId(pub u32);

impl TypeParamId {
    pub const INVALID: Self = Self(0);

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Identity of a class definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    pub const INVALID: Self = Self(0);

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Interned projection argument list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectionListId(pub u32);

/// Upper-bound list of a type parameter.
pub type BoundList = SmallVec<[TypeId; 2]>;

#[derive(Clone, Debug)]
struct TypeParamData {
    name: Atom,
    variance: Variance,
    owner: DeclId,
    index: u16,
    /// `None` until `set_bounds` seals the parameter.
    bounds: Option<BoundList>,
}

/// A registered class: name, owning declaration identity, and declared type
/// parameters in declaration order.
#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: Atom,
    pub decl: DeclId,
    pub params: Vec<TypeParamId>,
}

/// Thread-safe store for the type side of the front end.
pub struct TypeStore {
    type_ids: DashMap<TypeData, TypeId>,
    type_data: DashMap<TypeId, TypeData>,

    projection_ids: DashMap<Arc<[TypeProjection]>, ProjectionListId>,
    projection_lists: DashMap<ProjectionListId, Arc<[TypeProjection]>>,

    params: DashMap<TypeParamId, TypeParamData>,
    classes: DashMap<ClassId, ClassData>,

    next_type: AtomicU32,
    next_projection_list: AtomicU32,
    next_param: AtomicU32,
    next_class: AtomicU32,
    next_decl: AtomicU32,
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeStore {
    /// Create a store with all intrinsic types pre-interned at their fixed
    /// `TypeId`s.
    pub fn new() -> Self {
        let store = Self {
            type_ids: DashMap::new(),
            type_data: DashMap::new(),
            projection_ids: DashMap::new(),
            projection_lists: DashMap::new(),
            params: DashMap::new(),
            classes: DashMap::new(),
            next_type: AtomicU32::new(1),
            next_projection_list: AtomicU32::new(1),
            next_param: AtomicU32::new(1),
            next_class: AtomicU32::new(1),
            next_decl: AtomicU32::new(1),
        };
        for kind in IntrinsicKind::ALL {
            let id = store.intern(TypeData::Intrinsic(kind));
            debug_assert!(id.0 < TypeId::FIRST_DYNAMIC);
        }
        store
    }

    // =========================================================================
    // Type interning
    // =========================================================================

    /// Intern structural type data, returning its stable `TypeId`.
    pub fn intern(&self, data: TypeData) -> TypeId {
        match self.type_ids.entry(data) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = TypeId(self.next_type.fetch_add(1, Ordering::SeqCst));
                trace!(type_id = id.0, ?data, "TypeStore::intern");
                self.type_data.insert(id, data);
                entry.insert(id);
                id
            }
        }
    }

    /// Look up the structural data behind a `TypeId`.
    ///
    /// Panics on an id this store never handed out; that is a caller bug,
    /// not a recoverable condition.
    pub fn type_data(&self, id: TypeId) -> TypeData {
        *self
            .type_data
            .get(&id)
            .unwrap_or_else(|| panic!("TypeId({}) was not interned in this store", id.0))
    }

    /// `T?`, the nullable form of a type. Nullability is idempotent.
    pub fn nullable(&self, inner: TypeId) -> TypeId {
        if matches!(self.type_data(inner), TypeData::Nullable(_)) {
            return inner;
        }
        self.intern(TypeData::Nullable(inner))
    }

    /// A free occurrence of a type parameter.
    pub fn parameter(&self, param: TypeParamId) -> TypeId {
        self.intern(TypeData::Parameter(param))
    }

    /// A class constructor applied to projection arguments.
    pub fn applied(&self, class: ClassId, args: Vec<TypeProjection>) -> TypeId {
        let list = self.intern_projections(args);
        self.intern(TypeData::Applied { class, args: list })
    }

    /// Intern a projection argument list.
    pub fn intern_projections(&self, args: Vec<TypeProjection>) -> ProjectionListId {
        let key: Arc<[TypeProjection]> = Arc::from(args);
        match self.projection_ids.entry(key.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = ProjectionListId(self.next_projection_list.fetch_add(1, Ordering::SeqCst));
                self.projection_lists.insert(id, key);
                entry.insert(id);
                id
            }
        }
    }

    /// The projections behind an interned list id.
    pub fn projections(&self, id: ProjectionListId) -> Arc<[TypeProjection]> {
        self.projection_lists
            .get(&id)
            .map(|entry| entry.clone())
            .unwrap_or_else(|| panic!("ProjectionListId({}) was not interned in this store", id.0))
    }

    // =========================================================================
    // Declarations and type parameters
    // =========================================================================

    /// Allocate a fresh declaration identity.
    pub fn fresh_decl(&self) -> DeclId {
        let id = DeclId(self.next_decl.fetch_add(1, Ordering::SeqCst));
        trace!(decl_id = id.0, "TypeStore::fresh_decl");
        id
    }

    /// Allocate a type parameter with bounds unset.
    ///
    /// The parameter is unusable for bound queries until `set_bounds` seals
    /// it; allocation and sealing are split so bounds referencing sibling
    /// parameters can be substituted against identities that already exist.
    pub fn alloc_param(
        &self,
        name: Atom,
        variance: Variance,
        owner: DeclId,
        index: u16,
    ) -> TypeParamId {
        let id = TypeParamId(self.next_param.fetch_add(1, Ordering::SeqCst));
        trace!(param_id = id.0, owner = owner.0, index, "TypeStore::alloc_param");
        self.params.insert(
            id,
            TypeParamData {
                name,
                variance,
                owner,
                index,
                bounds: None,
            },
        );
        id
    }

    /// Seal a parameter's upper bounds. Calling this twice on the same
    /// parameter is a contract violation.
    pub fn set_bounds(&self, param: TypeParamId, bounds: impl IntoIterator<Item = TypeId>) {
        let mut entry = self
            .params
            .get_mut(&param)
            .unwrap_or_else(|| panic!("TypeParamId({}) was not allocated in this store", param.0));
        assert!(
            entry.bounds.is_none(),
            "bounds of TypeParamId({}) were already set",
            param.0
        );
        entry.bounds = Some(bounds.into_iter().collect());
    }

    pub fn param_name(&self, param: TypeParamId) -> Atom {
        self.param_data(param).name
    }

    pub fn param_variance(&self, param: TypeParamId) -> Variance {
        self.param_data(param).variance
    }

    pub fn param_owner(&self, param: TypeParamId) -> DeclId {
        self.param_data(param).owner
    }

    pub fn param_index(&self, param: TypeParamId) -> u16 {
        self.param_data(param).index
    }

    /// Upper bounds of a parameter. Panics if the parameter was never sealed
    /// with `set_bounds`; querying an unfinished parameter is a caller bug.
    pub fn param_bounds(&self, param: TypeParamId) -> BoundList {
        self.try_param_bounds(param).unwrap_or_else(|| {
            panic!("bounds of TypeParamId({}) were queried before being set", param.0)
        })
    }

    /// Upper bounds of a parameter, or `None` if not yet sealed.
    pub fn try_param_bounds(&self, param: TypeParamId) -> Option<BoundList> {
        self.param_data(param).bounds
    }

    /// The erased upper bound of a parameter: its first bound, or `Any`.
    /// Tolerates unsealed parameters, since erasure can be needed mid-copy.
    pub fn param_erased_bound(&self, param: TypeParamId) -> TypeId {
        self.try_param_bounds(param)
            .and_then(|bounds| bounds.first().copied())
            .unwrap_or(TypeId::ANY)
    }

    fn param_data(&self, param: TypeParamId) -> TypeParamData {
        self.params
            .get(&param)
            .map(|entry| entry.clone())
            .unwrap_or_else(|| panic!("TypeParamId({}) was not allocated in this store", param.0))
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Register a class definition and return its `ClassId`.
    pub fn register_class(&self, name: Atom, decl: DeclId, params: Vec<TypeParamId>) -> ClassId {
        let id = ClassId(self.next_class.fetch_add(1, Ordering::SeqCst));
        trace!(class_id = id.0, decl = decl.0, "TypeStore::register_class");
        self.classes.insert(id, ClassData { name, decl, params });
        id
    }

    /// Full data of a registered class.
    pub fn class(&self, id: ClassId) -> ClassData {
        self.classes
            .get(&id)
            .map(|entry| entry.clone())
            .unwrap_or_else(|| panic!("ClassId({}) was not registered in this store", id.0))
    }

    /// Declared type parameters of a class, in declaration order.
    pub fn class_params(&self, id: ClassId) -> Vec<TypeParamId> {
        self.class(id).params
    }
}

#[cfg(test)]
#[path = "../tests/store_tests.rs"]
mod tests;
