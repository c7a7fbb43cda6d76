use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{domain::Placement, protocol::CommandMessage};
use tokio::sync::watch;

use crate::{
    control::{Control, ControlState, Phase},
    dispatcher::{CommandDispatcher, CommandTransport},
    host::{GridContainers, StaticTemplates, TemplateLoader},
    session::WidgetServices,
};

/// Records every message and answers with a canned reply.
pub struct RecordingTransport {
    sent: Mutex<Vec<CommandMessage>>,
    reply: Result<String, String>,
}

impl RecordingTransport {
    pub fn replying(body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            reply: Ok(body.into()),
        })
    }

    pub fn ok() -> Arc<Self> {
        Self::replying(r#"{"ok":true}"#)
    }

    pub fn failing(error: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            reply: Err(error.into()),
        })
    }

    pub fn sent(&self) -> Vec<CommandMessage> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl CommandTransport for RecordingTransport {
    async fn post_command(&self, message: &CommandMessage) -> Result<String> {
        self.sent.lock().expect("sent lock").push(message.clone());
        self.reply.clone().map_err(|err| anyhow!(err))
    }
}

pub fn recording_dispatcher(transport: &Arc<RecordingTransport>) -> Arc<CommandDispatcher> {
    Arc::new(CommandDispatcher::new(transport.clone()))
}

/// Serves templates only once [`GatedTemplates::open`] has been called.
pub struct GatedTemplates {
    open: watch::Sender<bool>,
}

impl GatedTemplates {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            open: watch::Sender::new(false),
        })
    }

    pub fn open(&self) {
        self.open.send_replace(true);
    }
}

#[async_trait]
impl TemplateLoader for GatedTemplates {
    async fn load(&self, template_ref: &str) -> Result<String> {
        let mut rx = self.open.subscribe();
        if rx.wait_for(|open| *open).await.is_err() {
            return Err(anyhow!("template gate dropped"));
        }
        Ok(format!("<div data-ref=\"{template_ref}\"></div>"))
    }
}

pub struct FailingTemplates;

#[async_trait]
impl TemplateLoader for FailingTemplates {
    async fn load(&self, template_ref: &str) -> Result<String> {
        Err(anyhow!("404 for {template_ref}"))
    }
}

pub fn services_with(
    transport: &Arc<RecordingTransport>,
    templates: Arc<dyn TemplateLoader>,
) -> WidgetServices {
    WidgetServices::new(
        recording_dispatcher(transport),
        Arc::new(GridContainers::new()),
        templates,
    )
}

pub fn test_services(transport: &Arc<RecordingTransport>) -> WidgetServices {
    services_with(transport, Arc::new(StaticTemplates::builtin()))
}

/// Places a control and waits for its view to mount.
pub async fn mounted<S: ControlState>(
    services: &WidgetServices,
    initial: &S::Patch,
) -> Arc<Control<S>> {
    let control = Control::<S>::create(services.clone(), initial, Placement::default());
    control.mount_view().await;
    assert_eq!(control.phase(), Phase::Interactive);
    control
}
