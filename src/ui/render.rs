//! Message rendering
//!
//! Pure markdown → HTML conversion for displaying transcript entries

use markdown::Options;
use tracing::debug;

use crate::models::chat::ROLE_USER;
use crate::models::Message;

/// A transcript entry ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub label: String,
    pub html: String,
    pub is_user: bool,
}

/// Render message content as GitHub-flavored markdown
///
/// Raw HTML in the content is escaped, not passed through.
pub fn format_text(content: &str) -> String {
    // GFM options only fail on MDX constructs, which are never enabled here.
    // Plain CommonMark cannot fail and escapes HTML the same way.
    markdown::to_html_with_options(content, &Options::gfm()).unwrap_or_else(|e| {
        debug!("GFM rendering failed, using CommonMark: {:?}", e);
        markdown::to_html(content)
    })
}

/// Display label for a role
pub fn role_label(role: &str) -> String {
    format!("{}:", role)
}

/// Render one message; every role, not only user and assistant, goes through markdown
pub fn render_message(message: &Message) -> RenderedMessage {
    RenderedMessage {
        label: role_label(&message.role),
        html: format_text(&message.content),
        is_user: message.role == ROLE_USER,
    }
}
