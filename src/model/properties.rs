//! Property and extensor storage shared by every model node.
//!
//! Each node embeds one [`Extensions`] value and exposes it through the
//! [`PropertiesHolder`] trait. The store holds three kinds of metadata:
//!
//! - **Properties**: string key → opaque value, used as a generic annotation
//!   mechanism by the layers that read the model.
//! - **Extensors**: an unordered bag of typed objects (protocol extensions,
//!   annotations) looked up by concrete type.
//! - **Extension attributes**: foreign-namespace attributes of the original
//!   contract element, keyed by qualified name.
//!
//! ## Concurrency
//!
//! Nothing is allocated until the first write. The property and attribute
//! maps are created on demand through `OnceLock` and guarded by a
//! `parking_lot::RwLock`. The extensor bag is an immutable snapshot behind an
//! `ArcSwapOption`: readers load the current snapshot without locking, and
//! writers copy it, append, and publish with compare-and-swap, retrying from
//! the latest snapshot whenever another writer won first.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwapOption;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::base::QName;

/// An opaque value stored on a model node.
pub type Value = Arc<dyn Any + Send + Sync>;

type Snapshot = Option<Arc<Vec<Value>>>;

/// Lazily allocated metadata storage embedded in every model node.
#[derive(Default)]
pub struct Extensions {
    properties: OnceLock<RwLock<FxHashMap<String, Value>>>,
    extensors: ArcSwapOption<Vec<Value>>,
    attributes: OnceLock<RwLock<IndexMap<QName, Value>>>,
    documentation: RwLock<Option<String>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Properties ───────────────────────────────────────────────────

    /// Get a property value by its (case-sensitive) key.
    pub fn property(&self, name: &str) -> Option<Value> {
        self.properties.get()?.read().get(name).cloned()
    }

    /// Get a property value downcast to `T`.
    ///
    /// Returns `None` if the key is absent or holds a different type.
    pub fn property_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.property(name)?.downcast::<T>().ok()
    }

    /// Set a property. Passing `None` removes the key.
    pub fn set_property(&self, name: impl Into<String>, value: Option<Value>) {
        let name = name.into();
        match value {
            Some(value) => {
                self.properties
                    .get_or_init(Default::default)
                    .write()
                    .insert(name, value);
            }
            None => {
                if let Some(map) = self.properties.get() {
                    map.write().remove(&name);
                }
            }
        }
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties
            .get()
            .is_some_and(|map| map.read().contains_key(name))
    }

    /// Keys of all properties currently set.
    pub fn property_names(&self) -> Vec<String> {
        self.properties
            .get()
            .map(|map| map.read().keys().cloned().collect())
            .unwrap_or_default()
    }

    // ── Extensors ────────────────────────────────────────────────────

    /// Append an extensor to the bag.
    pub fn add_extensor(&self, extensor: Value) {
        loop {
            let current = self.extensors.load_full();
            let mut next = current.as_deref().cloned().unwrap_or_default();
            next.push(Arc::clone(&extensor));
            let prev = self
                .extensors
                .compare_and_swap(&current, Some(Arc::new(next)));
            if same_snapshot(&prev, &current) {
                return;
            }
        }
    }

    /// The first extensor of type `T`.
    pub fn extensor<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let snapshot = self.extensors.load_full()?;
        snapshot
            .iter()
            .find_map(|e| Arc::clone(e).downcast::<T>().ok())
    }

    /// All extensors of type `T`, in insertion order.
    ///
    /// Returns `None` when no extensor was ever added to this node, and
    /// `Some` (possibly empty) once the bag exists. Callers treat both the
    /// same way.
    pub fn extensors<T: Any + Send + Sync>(&self) -> Option<Vec<Arc<T>>> {
        let snapshot = self.extensors.load_full()?;
        Some(
            snapshot
                .iter()
                .filter_map(|e| Arc::clone(e).downcast::<T>().ok())
                .collect(),
        )
    }

    /// The current extensor snapshot, untyped.
    pub fn all_extensors(&self) -> Option<Arc<Vec<Value>>> {
        self.extensors.load_full()
    }

    // ── Extension attributes ─────────────────────────────────────────

    pub fn extension_attribute(&self, name: &QName) -> Option<Value> {
        self.attributes.get()?.read().get(name).cloned()
    }

    pub fn add_extension_attribute(&self, name: QName, value: Value) {
        self.attributes
            .get_or_init(Default::default)
            .write()
            .insert(name, value);
    }

    /// Replace every extension attribute at once.
    pub fn set_extension_attributes(&self, attributes: IndexMap<QName, Value>) {
        *self.attributes.get_or_init(Default::default).write() = attributes;
    }

    /// All extension attributes in declaration order.
    pub fn extension_attributes(&self) -> Vec<(QName, Value)> {
        self.attributes
            .get()
            .map(|map| {
                map.read()
                    .iter()
                    .map(|(k, v)| (k.clone(), Arc::clone(v)))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ── Documentation ────────────────────────────────────────────────

    pub fn documentation(&self) -> Option<String> {
        self.documentation.read().clone()
    }

    pub fn set_documentation(&self, documentation: Option<String>) {
        *self.documentation.write() = documentation;
    }
}

fn same_snapshot(a: &Snapshot, b: &Snapshot) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("properties", &self.property_names())
            .field("extensors", &self.extensors.load_full().map(|v| v.len()))
            .field(
                "attributes",
                &self
                    .extension_attributes()
                    .into_iter()
                    .map(|(k, _)| k)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Access to the metadata store of a model node.
///
/// Implementors only supply [`extensions`](Self::extensions); everything else
/// forwards to it. A node whose metadata belongs to another node (the
/// unwrapped view of an operation) returns the other node's store, so both
/// observe the same properties and extensors.
pub trait PropertiesHolder {
    fn extensions(&self) -> &Extensions;

    fn property(&self, name: &str) -> Option<Value> {
        self.extensions().property(name)
    }

    fn property_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.extensions().property_as(name)
    }

    /// Set a property. Passing `None` removes the key.
    fn set_property(&self, name: impl Into<String>, value: Option<Value>) {
        self.extensions().set_property(name, value)
    }

    fn has_property(&self, name: &str) -> bool {
        self.extensions().has_property(name)
    }

    fn add_extensor(&self, extensor: Value) {
        self.extensions().add_extensor(extensor)
    }

    fn extensor<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.extensions().extensor()
    }

    fn extensors<T: Any + Send + Sync>(&self) -> Option<Vec<Arc<T>>> {
        self.extensions().extensors()
    }

    /// Find an extensor of type `T`, widening the search through enclosing
    /// scopes where the node has any, and fall back to `default`.
    ///
    /// Most nodes only look at themselves. Endpoints continue with their
    /// binding and then their service.
    fn traversed_extensor<T: Any + Send + Sync>(&self, default: Option<Arc<T>>) -> Option<Arc<T>> {
        self.extensor::<T>().or(default)
    }

    fn extension_attribute(&self, name: &QName) -> Option<Value> {
        self.extensions().extension_attribute(name)
    }

    fn add_extension_attribute(&self, name: QName, value: Value) {
        self.extensions().add_extension_attribute(name, value)
    }

    fn extension_attributes(&self) -> Vec<(QName, Value)> {
        self.extensions().extension_attributes()
    }

    fn documentation(&self) -> Option<String> {
        self.extensions().documentation()
    }

    fn set_documentation(&self, documentation: Option<String>) {
        self.extensions().set_documentation(documentation)
    }
}

impl PropertiesHolder for Extensions {
    fn extensions(&self) -> &Extensions {
        self
    }
}
