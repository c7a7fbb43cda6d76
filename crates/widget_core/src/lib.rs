//! Widget property synchronization and command dispatch for dashboard
//! controls.
//!
//! An [`EditorSession`] owns a [`WidgetRegistry`], a [`CommandDispatcher`] and
//! the host collaborators. Placing a control registers a cache-backed
//! contract immediately and a live one once its view has mounted.

pub mod coerce;
pub mod config;
pub mod contract;
pub mod control;
pub mod controls;
pub mod dispatcher;
pub mod error;
pub mod gesture;
pub mod host;
pub mod mapper;
pub mod push;
pub mod registry;
pub mod session;
pub mod view;

pub use config::{load_session_config, SessionConfig};
pub use contract::{PropertySet, PropsPatch, WidgetContract, WidgetProps};
pub use control::{Control, ControlState, Phase};
pub use dispatcher::{
    CommandDispatcher, CommandOutcome, CommandTransport, HttpCommandTransport,
    MissingCommandTransport,
};
pub use error::WidgetError;
pub use host::{
    ContainerFactory, GridContainers, HttpTemplateLoader, MountState, StaticTemplates,
    TemplateLoader,
};
pub use push::PushChannel;
pub use registry::WidgetRegistry;
pub use session::{AnyControl, EditorSession, WidgetServices};
pub use view::{Rendered, ViewModel};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
