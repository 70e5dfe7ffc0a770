pub mod categories;
pub mod common;
pub mod customers;
pub mod health;
pub mod order_details;
pub mod orders;
pub mod products;
pub mod suppliers;

use std::sync::Arc;

use crate::db::DbPool;
use crate::services::{
    categories::CategoryService, customers::CustomerService, order_details::OrderDetailService,
    orders::OrderService, products::ProductService, suppliers::SupplierService,
};

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub customers: Arc<CustomerService>,
    pub categories: Arc<CategoryService>,
    pub suppliers: Arc<SupplierService>,
    pub products: Arc<ProductService>,
    pub orders: Arc<OrderService>,
    pub order_details: Arc<OrderDetailService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            customers: Arc::new(CustomerService::new(db.clone())),
            categories: Arc::new(CategoryService::new(db.clone())),
            suppliers: Arc::new(SupplierService::new(db.clone())),
            products: Arc::new(ProductService::new(db.clone())),
            orders: Arc::new(OrderService::new(db.clone())),
            order_details: Arc::new(OrderDetailService::new(db)),
        }
    }
}
