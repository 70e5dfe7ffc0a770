use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::OrderStatus;
use crate::handlers::{
    categories::CategoryRequest,
    customers::CustomerRequest,
    order_details::OrderDetailRequest,
    orders::{CreateOrderRequest, OrderLineRequest, UpdateOrderRequest},
    products::ProductRequest,
    suppliers::SupplierRequest,
};
use crate::notifications::{NotificationKind, NotificationResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Orbit IMS API",
        description = r#"
Inventory management API for customers, suppliers, products, categories,
orders and order lines.

Every endpoint answers with the notification envelope:

```json
{
  "success": true,
  "message": "Customer created successfully",
  "data": { },
  "notificationType": "success"
}
```

Line totals and order totals are derived server side on every write;
client-supplied values are ignored. List endpoints paginate with `page`
and `per_page` query parameters.
"#
    ),
    components(schemas(
        NotificationResponse,
        NotificationKind,
        CustomerRequest,
        CategoryRequest,
        SupplierRequest,
        ProductRequest,
        CreateOrderRequest,
        UpdateOrderRequest,
        OrderLineRequest,
        OrderDetailRequest,
        OrderStatus,
    )),
    tags(
        (name = "customers", description = "Customer management"),
        (name = "categories", description = "Product categories"),
        (name = "suppliers", description = "Supplier management"),
        (name = "products", description = "Product catalog"),
        (name = "orders", description = "Orders and their lines"),
        (name = "order-details", description = "Order lines addressed individually")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the document at
/// `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
