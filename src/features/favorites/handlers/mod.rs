pub mod favorite_handler;

pub use favorite_handler::{add_favorite, list_favorites, remove_favorite, toggle_notifications};
