//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the purchase-order reporting service here.

pub mod purchase_order;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::purchase_order::Entity as PurchaseOrder;
    pub use super::user::Entity as User;
}
