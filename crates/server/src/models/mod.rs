//! Domain models for the catalog and carts.
//!
//! Models serialize with camelCase field names, matching the JSON API.
//! Input types (`*Input`) carry raw client data; the services validate them.

pub mod cart;
pub mod category;
pub mod product;

pub use cart::{AddCartItemInput, Cart, CartItem, CartLine, CartView, JoinedCartItem};
pub use category::{Category, NewCategoryInput};
pub use product::{
    NewProductInput, Product, ProductFilter, ProductPatch, ProductQuery, ProductWithCategory,
    UpdateProductInput,
};
