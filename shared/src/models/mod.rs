//! Domain models
//!
//! Wire-level entities shared between the server and its clients. Field
//! names serialize in camelCase and enums in their display form to stay
//! compatible with the web client.

mod order;
mod payment_method;
mod restaurant;
mod user;

pub use order::{items_total, Order, OrderCreate, OrderItem, OrderStatus};
pub use payment_method::{PaymentMethod, PaymentMethodDraft, PaymentMethodKind};
pub use restaurant::{MenuItem, MenuSection, Restaurant};
pub use user::Role;
