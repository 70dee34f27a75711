//! Database entity models

pub mod customer;
pub mod driver;
pub mod order;
pub mod product;
pub mod serde_helpers;
pub mod store;
pub mod user;

pub use customer::{Address, Customer, CustomerCreate, CustomerUpdate};
pub use driver::{Driver, DriverCreate, DriverUpdate, GeoPoint};
pub use order::{
    CartLine, DeliveryAddress, Order, OrderCreate, OrderItem, OrderStatus, PaymentMethod,
    PaymentStatus,
};
pub use product::{Product, ProductCreate, ProductUpdate, StoreProduct, StoreProductUpdate};
pub use store::{Store, StoreAddress, StoreCreate, StoreUpdate};
pub use user::{User, UserPublic};
