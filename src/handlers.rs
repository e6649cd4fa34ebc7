pub mod general;
pub mod products;

pub use general::{health_check, root, serve_css};
pub use products::{
    ProductSubmission, create_product, destroy_product, edit_product, index, list_products,
    new_product, tunneled_member_action, update_product,
};
