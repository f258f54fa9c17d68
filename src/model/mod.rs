//! The service model graph.
//!
//! Construction runs top-down in one pass: service, interface, operations,
//! messages and parts, then bindings, endpoints and schemas. After that the
//! graph is read-mostly; property and extensor writes and the lazily built
//! indexes are the only runtime mutations.

mod binding;
pub(crate) mod cache;
mod container;
mod description;
mod endpoint;
mod error;
mod interface;
mod message;
mod operation;
mod part;
mod properties;
mod schema;
mod service;

pub use binding::{BindingFaultInfo, BindingInfo, BindingMessageInfo, BindingOperationInfo};
pub use container::{MessageContainer, MessagePartContainer};
pub use description::DescriptionInfo;
pub use endpoint::EndpointInfo;
pub use error::{ModelError, Result};
pub use interface::InterfaceInfo;
pub use message::{FaultInfo, MessageDirection, MessageInfo};
pub use operation::OperationInfo;
pub use part::{MessagePartInfo, PartOwner};
pub use properties::{Extensions, PropertiesHolder, Value};
pub use schema::{CompiledSchema, FormDefault, SchemaElement, SchemaInfo};
pub use service::{MessageIndex, ServiceInfo};
pub(crate) use service::WrapperIndex;
