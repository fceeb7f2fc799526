pub mod redirect;

pub use redirect::{RedirectService, last_path_segment};
