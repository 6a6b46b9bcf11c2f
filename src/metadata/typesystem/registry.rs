//! Token-indexed storage of the types of a module.
//!
//! The [`TypeRegistry`] is the arena of the metadata graph: it exclusively owns every
//! [`CilType`] of a module, while everything else (base type references, declaring types)
//! refers to types by token and goes through the registry to reach them. A lookup that
//! fails is an ordinary outcome, since modules routinely reference assemblies that were not
//! loaded.
//!
//! # Thread Safety
//!
//! Primary storage is a lock-free [`SkipMap`] keyed by token, the name index a [`DashMap`].
//! Both allow the registry to be populated and queried through `&self` from several threads.
//! Iteration follows token order, which is declaration order for `TypeDef` tokens.

use std::{collections::HashSet, sync::Arc};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use tracing::trace;

use crate::{
    metadata::{
        token::Token,
        typesystem::{CilType, CilTypeRc, CilTypeReference},
    },
    Error::TypeInsert,
    Result,
};

/// Central registry of all types defined by one module.
///
/// # Examples
///
/// ```rust
/// use dotlint::metadata::{token::Token, typesystem::{TypeBuilder, TypeRegistry}};
///
/// let registry = TypeRegistry::new();
/// let utils = TypeBuilder::class("Acme", "Utils")
///     .token(Token::typedef(1))
///     .extends_object()
///     .build()?;
/// registry.insert(utils)?;
///
/// assert!(registry.get(&Token::typedef(1)).is_some());
/// assert!(registry.get_by_fullname("Acme.Utils").is_some());
/// # Ok::<(), dotlint::Error>(())
/// ```
pub struct TypeRegistry {
    /// Lock-free concurrent map storing all types by token
    types: SkipMap<Token, CilTypeRc>,
    /// Index by full name (Namespace.Name)
    types_by_fullname: DashMap<String, Vec<Token>>,
    /// Registries of other assemblies, keyed by assembly name, used for `TypeRef` resolution
    external_registries: DashMap<String, Arc<TypeRegistry>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a new, empty registry
    #[must_use]
    pub fn new() -> Self {
        TypeRegistry {
            types: SkipMap::new(),
            types_by_fullname: DashMap::new(),
            external_registries: DashMap::new(),
        }
    }

    /// Register a type
    ///
    /// ## Arguments
    /// * 'new_type' - The type to register, its token must be unique within the registry
    ///
    /// Safe to call concurrently: of several inserts with the same token exactly one
    /// succeeds, and only that one enters the name index.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if a type with the same token is already
    /// registered, or a malformed error if the token does not belong to the `TypeDef` table.
    pub fn insert(&self, new_type: CilType) -> Result<CilTypeRc> {
        let token = new_type.token;
        if token.table() != Token::TABLE_TYPEDEF || token.row() == 0 {
            return Err(malformed_error!(
                "Type '{}' has invalid TypeDef token {}",
                new_type.fullname(),
                token
            ));
        }

        let new_type = Arc::new(new_type);
        let entry = self.types.get_or_insert(token, new_type.clone());
        if !Arc::ptr_eq(entry.value(), &new_type) {
            return Err(TypeInsert(token));
        }

        self.types_by_fullname
            .entry(new_type.fullname())
            .or_default()
            .push(token);

        Ok(new_type)
    }

    /// Make the types of another assembly reachable for `TypeRef` resolution
    ///
    /// ## Arguments
    /// * 'assembly' - The assembly name `TypeRef` scopes use to refer to it
    /// * 'registry' - The registry holding that assembly's types
    pub fn register_external(&self, assembly: &str, registry: Arc<TypeRegistry>) {
        self.external_registries
            .insert(assembly.to_string(), registry);
    }

    /// Get a type by its token
    pub fn get(&self, token: &Token) -> Option<CilTypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Get the first type (in token order) with the given full name
    pub fn get_by_fullname(&self, fullname: &str) -> Option<CilTypeRc> {
        let first = self
            .types_by_fullname
            .get(fullname)
            .and_then(|tokens| tokens.iter().min().copied())?;
        self.get(&first)
    }

    /// Locate the definition a type reference points to.
    ///
    /// - `TypeDef` references are looked up by token in this registry
    /// - `TypeRef` references are looked up by full name in the registry of their scope
    /// - `TypeSpec` references (generic instantiations) are looked up by full name locally
    ///
    /// Returns `None` when the target is not available, e.g. because its assembly was never
    /// registered through [`TypeRegistry::register_external`].
    pub fn resolve(&self, reference: &CilTypeReference) -> Option<CilTypeRc> {
        self.resolve_with_owner(reference).map(|(cil_type, _)| cil_type)
    }

    /// Locate the definition a type reference points to, together with the registry owning
    /// it.
    ///
    /// The owner is `None` if the definition lives in this registry. Tokens of the returned
    /// type, including the `TypeDef` tokens of its own base type, are only meaningful within
    /// its owner, so walks leaving the module must continue there.
    pub fn resolve_with_owner(
        &self,
        reference: &CilTypeReference,
    ) -> Option<(CilTypeRc, Option<Arc<TypeRegistry>>)> {
        let resolved = match reference.token.table() {
            Token::TABLE_TYPEDEF => self.get(&reference.token).map(|found| (found, None)),
            Token::TABLE_TYPEREF => reference.scope.as_ref().and_then(|scope| {
                let external = self.external_registries.get(scope)?.value().clone();
                let found = external.get_by_fullname(&reference.fullname())?;
                Some((found, Some(external)))
            }),
            Token::TABLE_TYPESPEC => self
                .get_by_fullname(&reference.fullname())
                .map(|found| (found, None)),
            _ => None,
        };

        if resolved.is_none() {
            trace!(
                token = %reference.token,
                name = %reference.fullname(),
                scope = ?reference.scope,
                "unresolved type reference"
            );
        }

        resolved
    }

    /// Returns true if the type, or any type enclosing it, is compiler generated.
    ///
    /// Declaring types are followed through the registry; a nesting chain that loops back on
    /// itself or leaves the registry ends the search.
    pub fn is_compiler_generated(&self, cil_type: &CilType) -> bool {
        if cil_type.is_self_generated() {
            return true;
        }

        let mut visited = HashSet::from([cil_type.token]);
        let mut next = cil_type.declaring_type;
        while let Some(token) = next {
            if !visited.insert(token) {
                return false;
            }

            let Some(enclosing) = self.get(&token) else {
                return false;
            };
            if enclosing.is_self_generated() {
                return true;
            }
            next = enclosing.declaring_type;
        }

        false
    }

    /// Get all types in token order
    pub fn all_types(&self) -> Vec<CilTypeRc> {
        self.types.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no type was registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all types in token order
    pub fn iter(&self) -> crossbeam_skiplist::map::Iter<'_, Token, CilTypeRc> {
        self.types.iter()
    }
}
