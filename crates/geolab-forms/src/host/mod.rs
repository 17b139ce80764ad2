//! Integration with the page or process hosting a form.

mod access;
mod frame;
mod guard;
mod navigation;

pub use access::{Access, AccessGate, DEFAULT_CRM_LOGIN_URL};
pub use frame::{ChannelFrame, HostFrame, Standalone, receive_host_message};
pub use guard::{SessionGuard, TOKEN_REFRESH_INTERVAL};
pub use navigation::NavigationContext;
