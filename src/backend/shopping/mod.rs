//! Shopping Lists Backend Module
//!
//! - **`db`** - Queries against the `shopping_lists` table
//! - **`handlers`** - `/api/shopping-lists` endpoints
//!
//! Items live inside the list document, so every item edit rewrites the
//! whole list.

pub mod db;
pub mod handlers;

pub use handlers::{
    add_item, add_recipe_to_list, cancel_list_invite, clear_completed, create_shopping_list,
    delete_item, delete_shopping_list, get_shopping_list, invite_to_list, list_shopping_lists,
    update_item, update_shopping_list,
};
