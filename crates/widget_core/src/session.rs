use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use shared::domain::{ControlKind, NodeId, Placement};
use tracing::{debug, info};

use crate::{
    config::SessionConfig,
    contract::{PropertySet, PropsPatch},
    control::{Control, ControlState},
    controls::{
        button::ButtonState, checkbox::CheckboxState, divider::DividerState,
        divider::VerticalDividerState, input::InputState, knob::KnobState, label::LabelState,
        slider::SliderState, switch::SwitchState, toggle::ToggleState,
    },
    dispatcher::CommandDispatcher,
    gesture::HostListeners,
    host::{ContainerFactory, GridContainers, HttpTemplateLoader, TemplateLoader},
    push::PushChannel,
    registry::WidgetRegistry,
    view::Rendered,
};

/// Collaborators shared by every control of one session.
#[derive(Clone)]
pub struct WidgetServices {
    pub registry: WidgetRegistry,
    pub dispatcher: Arc<CommandDispatcher>,
    pub containers: Arc<dyn ContainerFactory>,
    pub templates: Arc<dyn TemplateLoader>,
    pub listeners: HostListeners,
    pub push: PushChannel,
    pub default_address: String,
}

impl WidgetServices {
    pub fn new(
        dispatcher: Arc<CommandDispatcher>,
        containers: Arc<dyn ContainerFactory>,
        templates: Arc<dyn TemplateLoader>,
    ) -> Self {
        Self {
            registry: WidgetRegistry::new(),
            dispatcher,
            containers,
            templates,
            listeners: HostListeners::new(),
            push: PushChannel::default(),
            default_address: shared::domain::DEFAULT_ADDRESS.to_string(),
        }
    }

    pub fn with_push(mut self, push: PushChannel) -> Self {
        self.push = push;
        self
    }
}

macro_rules! any_control {
    ($($variant:ident($state:ty) => $accessor:ident;)*) => {
        /// A placed control of any kind.
        #[derive(Clone)]
        pub enum AnyControl {
            $($variant(Arc<Control<$state>>),)*
        }

        impl AnyControl {
            pub fn node(&self) -> NodeId {
                match self {
                    $(Self::$variant(control) => control.node(),)*
                }
            }

            pub fn kind(&self) -> ControlKind {
                match self {
                    $(Self::$variant(control) => control.kind(),)*
                }
            }

            pub fn render(&self) -> Rendered {
                match self {
                    $(Self::$variant(control) => control.render(),)*
                }
            }

            pub fn get_props(&self) -> PropertySet {
                match self {
                    $(Self::$variant(control) => control.get_props(),)*
                }
            }

            pub fn is_interactive(&self) -> bool {
                match self {
                    $(Self::$variant(control) => control.is_interactive(),)*
                }
            }

            async fn mount_view(&self) {
                match self {
                    $(Self::$variant(control) => control.mount_view().await,)*
                }
            }

            fn place(services: &WidgetServices, patch: &PropsPatch, placement: Placement) -> Self {
                match patch {
                    $(PropsPatch::$variant(patch) => {
                        Self::$variant(Control::<$state>::create(services.clone(), patch, placement))
                    })*
                }
            }

            $(
                pub fn $accessor(&self) -> Option<&Arc<Control<$state>>> {
                    match self {
                        Self::$variant(control) => Some(control),
                        _ => None,
                    }
                }
            )*
        }
    };
}

any_control! {
    Button(ButtonState) => as_button;
    Checkbox(CheckboxState) => as_checkbox;
    Switch(SwitchState) => as_switch;
    Toggle(ToggleState) => as_toggle;
    Slider(SliderState) => as_slider;
    Knob(KnobState) => as_knob;
    Label(LabelState) => as_label;
    Input(InputState) => as_input;
    Divider(DividerState) => as_divider;
    VerticalDivider(VerticalDividerState) => as_vertical_divider;
}

/// Owns the registry and collaborators for one editing session. Controls are
/// registered as they are placed and dropped when the session shuts down.
pub struct EditorSession {
    services: WidgetServices,
    controls: Mutex<HashMap<NodeId, AnyControl>>,
}

impl EditorSession {
    pub fn new(services: WidgetServices) -> Self {
        Self {
            services,
            controls: Mutex::new(HashMap::new()),
        }
    }

    /// Session talking to the configured server over HTTP.
    pub fn from_config(config: &SessionConfig) -> Self {
        let templates = HttpTemplateLoader::new(config.template_url(""));
        let mut services = WidgetServices::new(
            Arc::new(CommandDispatcher::http(config.command_url())),
            Arc::new(GridContainers::new()),
            Arc::new(templates),
        )
        .with_push(PushChannel::new(config.push_capacity));
        services.default_address = config.default_address.clone();
        Self::new(services)
    }

    pub fn services(&self) -> &WidgetServices {
        &self.services
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.services.registry
    }

    pub fn push(&self) -> &PushChannel {
        &self.services.push
    }

    /// Places a control of `kind` seeded from a loose property set. The
    /// control is registered before this returns; its view mounts in the
    /// background.
    pub fn place(&self, kind: ControlKind, initial: &PropertySet, placement: Placement) -> AnyControl {
        let patch = PropsPatch::from_property_set(kind, initial);
        let control = AnyControl::place(&self.services, &patch, placement);
        self.track(control.clone());
        let mounting = control.clone();
        tokio::spawn(async move { mounting.mount_view().await });
        control
    }

    /// Typed variant of [`EditorSession::place`].
    pub fn place_typed<S>(&self, initial: &S::Patch, placement: Placement) -> Arc<Control<S>>
    where
        S: ControlState,
        Arc<Control<S>>: Into<AnyControl>,
    {
        let control = Control::<S>::create(self.services.clone(), initial, placement);
        self.track(control.clone().into());
        let mounting = control.clone();
        tokio::spawn(async move { mounting.mount_view().await });
        control
    }

    fn track(&self, control: AnyControl) {
        debug!(node = %control.node(), kind = %control.kind(), "control placed");
        self.lock().insert(control.node(), control);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<NodeId, AnyControl>> {
        self.controls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn control(&self, node: NodeId) -> Option<AnyControl> {
        self.lock().get(&node).cloned()
    }

    pub fn controls(&self) -> Vec<AnyControl> {
        let mut controls: Vec<AnyControl> = self.lock().values().cloned().collect();
        controls.sort_by_key(|control| control.node());
        controls
    }

    /// Removes the node from the grid and destroys its registry entry.
    pub fn remove(&self, node: NodeId) -> bool {
        let removed = self.lock().remove(&node).is_some();
        self.services.registry.remove(node);
        self.services.containers.remove(node);
        removed
    }

    pub fn shutdown(&self) {
        let nodes: Vec<NodeId> = self.lock().drain().map(|(node, _)| node).collect();
        for node in &nodes {
            self.services.containers.remove(*node);
        }
        self.services.registry.clear();
        info!(controls = nodes.len(), "editor session shut down");
    }
}

macro_rules! into_any {
    ($($variant:ident($state:ty);)*) => {
        $(
            impl From<Arc<Control<$state>>> for AnyControl {
                fn from(control: Arc<Control<$state>>) -> Self {
                    Self::$variant(control)
                }
            }
        )*
    };
}

into_any! {
    Button(ButtonState);
    Checkbox(CheckboxState);
    Switch(SwitchState);
    Toggle(ToggleState);
    Slider(SliderState);
    Knob(KnobState);
    Label(LabelState);
    Input(InputState);
    Divider(DividerState);
    VerticalDivider(VerticalDividerState);
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
