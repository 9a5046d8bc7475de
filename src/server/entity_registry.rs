//! Entity registry: each marketplace entity contributes its own routes

use axum::Router;
use std::collections::BTreeMap;

/// How an entity exposes itself over HTTP
///
/// Descriptors own the state their handlers need, so `build_routes` returns a
/// `Router` with the state already applied.
pub trait EntityDescriptor: Send + Sync {
    /// Registry key, e.g. "order"
    fn entity_type(&self) -> &str;

    fn build_routes(&self) -> Router;
}

/// All registered descriptors, keyed by entity type
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: BTreeMap::new(),
        }
    }

    /// Register a descriptor; a second one for the same type replaces the first.
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        if self.descriptors.insert(entity_type.clone(), descriptor).is_some() {
            tracing::warn!("Entity '{}' registered twice, keeping the last", entity_type);
        }
    }

    /// Merge the routes of every descriptor
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}
