use std::ops::Deref;
use std::ops::DerefMut;
use std::sync::Arc;

use opentracingrust::SpanContext;
use opentracingrust::Tracer;
use prometheus::Registry;
use serde_json::Value;
use slog::Logger;

use crate::field_path::Patch;
use crate::store::batch::Write;
use crate::store::collection::CollectionAttributes;
use crate::store::document::DocumentAttributes;
use crate::Config;
use crate::Result;

mod mongo;

/// Instantiate a new storage backend based on the given configuration.
pub fn backend_factory<T>(config: Config, logger: Logger, tracer: T) -> Result<StoreImpl>
where
    T: Into<Option<Arc<Tracer>>>,
{
    let store = match config {
        Config::MongoDB(config) => {
            let store = self::mongo::Store::make(config, logger, tracer)?;
            StoreImpl::new(store)
        }
    };
    Ok(store)
}

/// Register backend metrics with the given registry.
pub fn register_metrics(logger: &Logger, registry: &Registry) {
    self::mongo::register_metrics(logger, registry);
}

// Macro definition to generate an interface trait with a wrapping wrapper
// for dynamic dispatch to Send + Sync + 'static implementations.
macro_rules! arc_interface {
    (
        $(#[$struct_meta:meta])*
        struct $struct_name:ident,
        $(#[$trait_meta:meta])*
        trait $trait_name:ident,
        interface $trait_def:tt
    ) => {
        $(#[$trait_meta])*
        pub trait $trait_name: Send + Sync $trait_def

        $(#[$struct_meta])*
        #[derive(Clone)]
        pub struct $struct_name(Arc<dyn $trait_name>);

        impl $struct_name {
            pub fn new<I: $trait_name + 'static>(interface: I) -> Self {
                Self(Arc::new(interface))
            }
        }

        impl Deref for $struct_name {
            type Target = dyn $trait_name + 'static;
            fn deref(&self) -> &(dyn $trait_name + 'static) {
                self.0.deref()
            }
        }
    }
}

macro_rules! box_interface {
    (
        $(#[$struct_meta:meta])*
        struct $struct_name:ident,
        $(#[$trait_meta:meta])*
        trait $trait_name:ident,
        interface $trait_def:tt
    ) => {
        $(#[$trait_meta])*
        pub trait $trait_name: Send $trait_def

        $(#[$struct_meta])*
        pub struct $struct_name(Box<dyn $trait_name>);

        impl $struct_name {
            pub fn new<I: $trait_name + 'static>(interface: I) -> Self {
                Self(Box::new(interface))
            }
        }

        impl Deref for $struct_name {
            type Target = dyn $trait_name + 'static;
            fn deref(&self) -> &(dyn $trait_name + 'static) {
                self.0.deref()
            }
        }

        impl DerefMut for $struct_name {
            fn deref_mut(&mut self) -> &mut (dyn $trait_name + 'static) {
                self.0.deref_mut()
            }
        }
    };
}

arc_interface! {
    /// Dynamic dispatch all operations to a backend-specific implementation.
    struct StoreImpl,

    /// Definition of top level store operations.
    ///
    /// Mainly a way to return interfaces to grouped store operations.
    ///
    /// See `store::Store` for descriptions of methods.
    trait StoreInterface,

    interface {
        fn batch(&self) -> BatchImpl;
        fn collection(&self) -> CollectionImpl;
        fn document(&self) -> DocumentImpl;
    }
}

box_interface! {
    /// Dynamic dispatch batch commits to a backend-specific implementation.
    struct BatchImpl,

    /// Definition of supported operations on a `Batch` of writes.
    ///
    /// See `store::batch::Batch` for descriptions of methods.
    trait BatchInterface,

    interface {
        fn commit(&mut self, writes: Vec<Write>, span: Option<SpanContext>) -> Result<()>;
    }
}

arc_interface! {
    /// Dynamic dispatch collection operations to a backend-specific implementation.
    struct CollectionImpl,

    /// Definition of supported operations on `Collection`s.
    ///
    /// See `store::collection::Collection` for descriptions of methods.
    trait CollectionInterface,

    interface {
        fn open(&self, attrs: &CollectionAttributes);
    }
}

arc_interface! {
    /// Dynamic dispatch document operations to a backend-specific implementation.
    struct DocumentImpl,

    /// Definition of supported operations on `Document`s.
    ///
    /// See `store::document::Document` for descriptions of methods.
    trait DocumentInterface,

    interface {
        fn delete(&self, attrs: &DocumentAttributes, span: Option<SpanContext>) -> Result<()>;
        fn get(&self, attrs: &DocumentAttributes, span: Option<SpanContext>)
            -> Result<Option<Value>>;
        fn merge(
            &self,
            attrs: &DocumentAttributes,
            value: Value,
            span: Option<SpanContext>,
        ) -> Result<()>;
        fn open(&self, attrs: &DocumentAttributes);
        fn set(
            &self,
            attrs: &DocumentAttributes,
            value: Value,
            span: Option<SpanContext>,
        ) -> Result<()>;
        fn update(
            &self,
            attrs: &DocumentAttributes,
            patches: Vec<Patch>,
            span: Option<SpanContext>,
        ) -> Result<()>;
    }
}
