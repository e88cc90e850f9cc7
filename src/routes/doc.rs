use utoipa::{
    Modify, OpenApi,
    openapi::{
        self, OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AdminStats, LoginRequest, LoginResponse, Me, RegisterRequest, RegisteredUser, UserList},
        cart::{CartMessage, CartView},
        catalog::{CategoryList, CreateCategoryRequest, ProductList, ProductRequest},
        orders::{
            CreateOrderRequest, OrderLineRequest, OrderList, OrderPlaced, PaymentResult,
            ShippingDetails, StatusChanged,
        },
    },
    models::{CartLine, Category, Order, OrderItem, OrderStatus, Product, Role, UserSummary},
    response::{ApiResponse, Meta},
    routes::{auth, cart, categories, dashboard, health, orders, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::set_role,
        auth::list_users,
        dashboard::me,
        dashboard::admin_stats,
        categories::list_categories,
        categories::create_category,
        categories::delete_category,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::clear_cart,
        cart::checkout,
        orders::create_order,
        orders::my_orders,
        orders::list_all_orders,
        orders::pay_order,
        orders::update_order_status
    ),
    components(
        schemas(
            Role,
            OrderStatus,
            UserSummary,
            Category,
            Product,
            CartLine,
            Order,
            OrderItem,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            RegisteredUser,
            UserList,
            Me,
            AdminStats,
            CreateCategoryRequest,
            CategoryList,
            ProductRequest,
            ProductList,
            CartView,
            CartMessage,
            ShippingDetails,
            OrderLineRequest,
            CreateOrderRequest,
            OrderPlaced,
            PaymentResult,
            StatusChanged,
            OrderList,
            params::AddToCartQuery,
            params::StatusQuery,
            params::RoleQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<OrderPlaced>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and account roles"),
        (name = "Dashboard", description = "Current account and store totals"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Cart", description = "Cart and checkout endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
