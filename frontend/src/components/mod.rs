mod chat_input;
mod icons;
mod sidebar;
mod transcript;

pub use chat_input::ChatInputBar;
pub use icons::{SidebarClosedIcon, SidebarOpenIcon};
pub use sidebar::Sidebar;
pub use transcript::Transcript;
