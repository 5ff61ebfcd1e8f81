//! Type-graph exploration
//!
//! Starting from the descriptors of endpoint parameters and responses, the
//! explorer walks fields, generic bindings, array items and interface accessors
//! depth-first and collects every schema-eligible type exactly once. A
//! signature is marked explored before its members are walked, which is what
//! terminates exploration on self-referential type graphs.

use std::collections::HashSet;

use apiscout_core::{Classification, Tag, TypeDescriptor, TypeIdentity, TypeRegistry};
use tracing::{debug, trace};

use crate::members::documented_members;

/// Result of one exploration run
#[derive(Debug, Clone)]
pub struct Exploration {
    /// Schema-eligible descriptors, in discovery order, unique by identity
    pub schemas: Vec<TypeDescriptor>,
    /// Every signature the run visited
    pub explored: HashSet<String>,
}

/// Per-run exploration state
pub struct SchemaExplorer<'r> {
    registry: &'r TypeRegistry,
    explored: HashSet<String>,
    schemas: Vec<TypeDescriptor>,
    schema_identities: HashSet<TypeIdentity>,
    member_walks: usize,
}

impl<'r> SchemaExplorer<'r> {
    #[must_use]
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            explored: HashSet::new(),
            schemas: Vec::new(),
            schema_identities: HashSet::new(),
            member_walks: 0,
        }
    }

    /// Explore the response and every parameter of each endpoint in `tag`
    pub fn register_endpoint_group(&mut self, tag: &Tag) {
        debug!(tag = %tag.name, endpoints = tag.endpoints.len(), "exploring tag");
        for endpoint in &tag.endpoints {
            if let Some(response) = &endpoint.response {
                self.explore(response);
            }
            for parameter in &endpoint.parameters {
                self.explore(&parameter.descriptor);
            }
        }
    }

    /// Explore a type no endpoint signature reaches
    pub fn register_extra(&mut self, identity: TypeIdentity) {
        let descriptor = TypeDescriptor::of(identity, self.registry);
        self.explore(&descriptor);
    }

    pub fn explore(&mut self, descriptor: &TypeDescriptor) {
        let signature = descriptor.signature();
        if self.explored.contains(&signature) {
            trace!(%signature, "already explored");
            return;
        }
        trace!(%signature, "exploring");
        self.explored.insert(signature);

        match descriptor.classification() {
            Classification::Reference => {
                if self.add_schema(descriptor) {
                    self.walk_members(descriptor);
                }
            }
            Classification::Enum => {
                self.add_schema(descriptor);
            }
            Classification::Generic => {
                for (_, bound) in descriptor.generic_bindings().unwrap_or_default() {
                    self.explore(bound);
                }
                self.walk_members(descriptor);
            }
            Classification::Array => {
                if let Some(item) = descriptor.item_type() {
                    self.explore(item);
                }
            }
            Classification::Primitive => {}
        }
    }

    /// Returns `true` on first addition of the descriptor's identity
    fn add_schema(&mut self, descriptor: &TypeDescriptor) -> bool {
        if !self.schema_identities.insert(descriptor.identity().clone()) {
            return false;
        }
        debug!(identity = %descriptor.identity(), "schema added");
        self.schemas.push(descriptor.clone());
        true
    }

    fn walk_members(&mut self, descriptor: &TypeDescriptor) {
        self.member_walks += 1;
        for member in documented_members(descriptor, self.registry) {
            self.explore(&member.descriptor);
        }
    }

    #[must_use]
    pub fn schemas(&self) -> &[TypeDescriptor] {
        &self.schemas
    }

    #[must_use]
    pub fn explored_signatures(&self) -> &HashSet<String> {
        &self.explored
    }

    /// End the run and hand over its results
    #[must_use]
    pub fn finish(self) -> Exploration {
        debug!(
            schemas = self.schemas.len(),
            explored = self.explored.len(),
            member_walks = self.member_walks,
            "exploration finished"
        );
        Exploration {
            schemas: self.schemas,
            explored: self.explored,
        }
    }
}
