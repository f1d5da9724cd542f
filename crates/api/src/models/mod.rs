//! Domain types.
//!
//! These types represent validated domain objects separate from database
//! row types; conversion happens in the `db` repositories.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::CartItem;
pub use order::{Endereco, NewOrder, Order, OrderItem};
pub use product::{NewProduct, Product, ProductUpdate};
pub use user::{ProfileUpdate, User};
