//! Plain data types shared by every store: products, cart lines, users,
//! favorites, loyalty accounts and orders.

pub mod cart;
pub mod favorite;
pub mod loyalty;
pub mod order;
pub mod product;
pub mod user;

pub use cart::*;
pub use favorite::*;
pub use loyalty::*;
pub use order::*;
pub use product::*;
pub use user::*;
