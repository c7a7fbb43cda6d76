use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("failed to load template {template_ref}: {reason}")]
    TemplateLoad {
        template_ref: String,
        reason: String,
    },
    #[error("command endpoint answered with status {status}")]
    Status { status: u16, body: String },
    #[error("server_url must start with http:// or https://, got {0}")]
    InvalidServerUrl(String),
    #[error("push feed connection failed: {0}")]
    PushFeed(String),
}
