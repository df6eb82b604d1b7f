mod formats;
mod list;
mod mount;
mod unmount;
mod watch;

pub use formats::run as formats;
pub use list::run as list;
pub use mount::run as mount;
pub use unmount::run as unmount;
pub use watch::run as watch;
