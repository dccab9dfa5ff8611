//! In-memory resource gateway
//!
//! Backing store for tests and local development, seeded with the demo
//! catalog. Individual operations can be switched to "not implemented"
//! to exercise the 501 handling paths, and the org-wide create/delete
//! endpoints start out that way because the real upstream does not have
//! them yet.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use shared::models::{
    MenuItem, MenuSection, Order, OrderItem, OrderStatus, PaymentMethod, PaymentMethodDraft,
    PaymentMethodKind, Restaurant,
};

use super::{GatewayError, GatewayResult, PaymentScope, ResourceGateway};

#[derive(Debug, Default)]
struct Store {
    restaurants: Vec<Restaurant>,
    orders: Vec<Order>,
    user_methods: HashMap<String, Vec<PaymentMethod>>,
    global_methods: Vec<PaymentMethod>,
    next_method_id: u64,
}

/// In-memory gateway
#[derive(Debug, Default)]
pub struct MemoryGateway {
    store: Mutex<Store>,
    stubbed: Mutex<HashSet<String>>,
}

impl MemoryGateway {
    /// Empty gateway with every operation implemented
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway seeded with the demo data
    pub fn seeded() -> Self {
        let gateway = Self::new();
        {
            let mut store = gateway.store.lock().unwrap_or_else(|e| e.into_inner());
            store.restaurants = seed_restaurants();
            store.orders = seed_orders();
            store.global_methods = seed_payment_methods();
            store
                .user_methods
                .insert("user-admin".to_string(), seed_payment_methods());
            store.next_method_id = 3;
        }
        // The real upstream has no org-wide create/delete endpoints yet
        gateway.stub("payments.create.global");
        gateway.stub("payments.delete.global");
        gateway
    }

    /// Mark an operation as not implemented
    pub fn stub(&self, op: &str) {
        self.stubbed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(op.to_string());
    }

    /// Mark an operation as implemented again
    pub fn allow(&self, op: &str) {
        self.stubbed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(op);
    }

    fn check(&self, op: &str) -> GatewayResult<()> {
        if self
            .stubbed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(op)
        {
            Err(GatewayError::NotImplemented)
        } else {
            Ok(())
        }
    }

    fn check_scoped(&self, op: &str, scope: &PaymentScope) -> GatewayResult<()> {
        self.check(op)?;
        let suffix = match scope {
            PaymentScope::User(_) => "user",
            PaymentScope::Global => "global",
        };
        self.check(&format!("{}.{}", op, suffix))
    }

    fn with_store<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut store)
    }

    fn scope_methods<'a>(store: &'a mut Store, scope: &PaymentScope) -> &'a mut Vec<PaymentMethod> {
        match scope {
            PaymentScope::User(user_id) => store.user_methods.entry(user_id.clone()).or_default(),
            PaymentScope::Global => &mut store.global_methods,
        }
    }
}

#[async_trait]
impl ResourceGateway for MemoryGateway {
    async fn list_restaurants(&self) -> GatewayResult<Vec<Restaurant>> {
        self.check("restaurants.list")?;
        Ok(self.with_store(|s| s.restaurants.clone()))
    }

    async fn get_restaurant(&self, id: &str) -> GatewayResult<Restaurant> {
        self.check("restaurants.get")?;
        self.with_store(|s| s.restaurants.iter().find(|r| r.id == id).cloned())
            .ok_or(GatewayError::NotFound)
    }

    async fn list_orders(&self) -> GatewayResult<Vec<Order>> {
        self.check("orders.list")?;
        Ok(self.with_store(|s| s.orders.clone()))
    }

    async fn get_order(&self, id: &str) -> GatewayResult<Order> {
        self.check("orders.get")?;
        self.with_store(|s| s.orders.iter().find(|o| o.id == id).cloned())
            .ok_or(GatewayError::NotFound)
    }

    async fn create_order(&self, order: Order) -> GatewayResult<Order> {
        self.check("orders.create")?;
        self.with_store(|s| s.orders.push(order.clone()));
        Ok(order)
    }

    async fn set_order_status(&self, id: &str, status: OrderStatus) -> GatewayResult<Order> {
        self.check("orders.set_status")?;
        self.with_store(|s| {
            let order = s.orders.iter_mut().find(|o| o.id == id)?;
            order.status = status;
            Some(order.clone())
        })
        .ok_or(GatewayError::NotFound)
    }

    async fn list_payment_methods(
        &self,
        scope: &PaymentScope,
    ) -> GatewayResult<Vec<PaymentMethod>> {
        self.check_scoped("payments.list", scope)?;
        Ok(self.with_store(|s| Self::scope_methods(s, scope).clone()))
    }

    async fn create_payment_method(
        &self,
        scope: &PaymentScope,
        draft: PaymentMethodDraft,
    ) -> GatewayResult<PaymentMethod> {
        self.check_scoped("payments.create", scope)?;
        Ok(self.with_store(|s| {
            let id = format!("pm-{}", s.next_method_id);
            s.next_method_id += 1;
            let method = draft.into_method(id);
            Self::scope_methods(s, scope).push(method.clone());
            method
        }))
    }

    async fn update_payment_method(
        &self,
        scope: &PaymentScope,
        method: PaymentMethod,
    ) -> GatewayResult<PaymentMethod> {
        self.check_scoped("payments.update", scope)?;
        self.with_store(|s| {
            let methods = Self::scope_methods(s, scope);
            let slot = methods.iter_mut().find(|m| m.id == method.id)?;
            *slot = method.clone();
            Some(method)
        })
        .ok_or(GatewayError::NotFound)
    }

    async fn delete_payment_method(&self, scope: &PaymentScope, id: &str) -> GatewayResult<()> {
        self.check_scoped("payments.delete", scope)?;
        let removed = self.with_store(|s| {
            let methods = Self::scope_methods(s, scope);
            let before = methods.len();
            methods.retain(|m| m.id != id);
            methods.len() < before
        });
        if removed {
            Ok(())
        } else {
            Err(GatewayError::NotFound)
        }
    }
}

fn sample_menu_items() -> Vec<MenuItem> {
    let item = |id: &str, name: &str, description: &str, price: f64, category: &str| MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        category: category.to_string(),
        image_url: Some("https://placehold.co/300x200.png".to_string()),
    };

    vec![
        item("item-1", "Margherita Pizza", "Classic cheese and tomato pizza.", 12.99, "Main Courses"),
        item("item-2", "Caesar Salad", "Fresh romaine lettuce with Caesar dressing.", 8.50, "Appetizers"),
        item("item-3", "Spaghetti Carbonara", "Creamy pasta with bacon and egg.", 15.00, "Main Courses"),
        item("item-4", "Tiramisu", "Coffee-flavored Italian dessert.", 7.00, "Desserts"),
        item("item-5", "Lemonade", "Freshly squeezed lemonade.", 3.50, "Drinks"),
        item("item-6", "Bruschetta", "Grilled bread with garlic, olive oil and salt.", 6.50, "Appetizers"),
        item("item-7", "Grilled Salmon", "Served with asparagus and lemon butter sauce.", 18.99, "Main Courses"),
        item("item-8", "Chocolate Lava Cake", "Warm chocolate cake with a gooey center.", 7.50, "Desserts"),
    ]
}

/// Group items into sections by category, preserving first-seen order
fn group_items_by_category(items: Vec<MenuItem>) -> Vec<MenuSection> {
    let mut sections: Vec<MenuSection> = Vec::new();
    for item in items {
        if let Some(section) = sections.iter_mut().find(|s| s.name == item.category) {
            section.items.push(item);
        } else {
            sections.push(MenuSection {
                id: format!("section-{}", sections.len() + 1),
                name: item.category.clone(),
                items: vec![item],
            });
        }
    }
    sections
}

fn seed_restaurants() -> Vec<Restaurant> {
    let items = sample_menu_items();
    let restaurant = |id: &str, name: &str, address: &str, cuisine: &str, region: &str,
                      rating: f64, menu_items: Vec<MenuItem>| Restaurant {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        cuisine: cuisine.to_string(),
        region: region.to_string(),
        image_url: Some("https://placehold.co/600x400.png".to_string()),
        rating: Some(rating),
        menu: group_items_by_category(menu_items),
    };

    vec![
        restaurant("rest-1", "Bella Italia", "123 Main St, Northtown", "Italian", "North", 4.5, items[0..4].to_vec()),
        restaurant("rest-2", "Sushi World", "456 Oak Ave, Southville", "Japanese", "South", 4.2, items[2..6].to_vec()),
        restaurant("rest-3", "Burger Hub", "789 Pine Ln, Northtown", "American", "North", 4.0, items[4..8].to_vec()),
        restaurant("rest-4", "Taco Fiesta", "101 Maple Dr, Westcity", "Mexican", "West", 4.8, {
            let mut reversed = items[0..5].to_vec();
            reversed.reverse();
            reversed
        }),
    ]
}

fn seed_orders() -> Vec<Order> {
    let item = |id: &str, name: &str, quantity: u32, price: f64| OrderItem {
        menu_item_id: id.to_string(),
        name: name.to_string(),
        quantity,
        price,
    };

    vec![
        Order {
            id: "order-1".to_string(),
            user_id: "user-member-north".to_string(),
            user_name: Some("Member North".to_string()),
            restaurant_id: "rest-1".to_string(),
            restaurant_name: Some("Bella Italia".to_string()),
            region: "North".to_string(),
            items: vec![
                item("item-1", "Margherita Pizza", 1, 12.99),
                item("item-5", "Lemonade", 2, 3.50),
            ],
            total_amount: 19.99,
            status: OrderStatus::Delivered,
            order_date: Utc::now() - Duration::days(2),
            delivery_address: "10 North Pole, Northtown".to_string(),
            notes: Some("Extra cheese on pizza.".to_string()),
        },
        Order {
            id: "order-2".to_string(),
            user_id: "user-member-south".to_string(),
            user_name: Some("Member South".to_string()),
            restaurant_id: "rest-2".to_string(),
            restaurant_name: Some("Sushi World".to_string()),
            region: "South".to_string(),
            items: vec![item("item-3", "Spaghetti Carbonara", 1, 15.00)],
            total_amount: 15.00,
            status: OrderStatus::Preparing,
            order_date: Utc::now() - Duration::hours(1),
            delivery_address: "20 South Bay, Southville".to_string(),
            notes: None,
        },
        Order {
            id: "order-3".to_string(),
            user_id: "user-admin".to_string(),
            user_name: Some("Admin User".to_string()),
            restaurant_id: "rest-4".to_string(),
            restaurant_name: Some("Taco Fiesta".to_string()),
            region: "West".to_string(),
            items: vec![
                item("item-1", "Margherita Pizza", 2, 12.99),
                item("item-2", "Caesar Salad", 1, 8.50),
            ],
            total_amount: 34.48,
            status: OrderStatus::PendingConfirmation,
            order_date: Utc::now(),
            delivery_address: "Admin HQ, Universal City".to_string(),
            notes: Some("No spicy sauce please.".to_string()),
        },
    ]
}

fn seed_payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod {
            id: "pm-1".to_string(),
            kind: PaymentMethodKind::CreditCard,
            last4: Some("4242".to_string()),
            email: None,
            is_primary: true,
        },
        PaymentMethod {
            id: "pm-2".to_string(),
            kind: PaymentMethodKind::PayPal,
            last4: None,
            email: Some("admin@slloze.com".to_string()),
            is_primary: false,
        },
    ]
}
