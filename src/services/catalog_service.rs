use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use crate::{
    audit,
    db::conflict_on_unique,
    dto::catalog::{CategoryList, CreateCategoryRequest, ProductList, ProductRequest},
    entity::{
        categories::{
            ActiveModel as CategoryActive, Column as CatCol, Entity as Categories,
            Model as CategoryModel,
        },
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Product},
    response::{ApiResponse, Meta},
    state::AppState,
};

const MIN_NAME_LEN: usize = 2;

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<Category> = Categories::find()
        .order_by_asc(CatCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Categories", CategoryList { items }, Some(meta)))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let name = validate_name(&payload.name)?;

    let exists = Categories::find()
        .filter(Expr::expr(Func::lower(Expr::col(CatCol::Name))).eq(name.to_lowercase()))
        .one(&state.orm)
        .await?
        .is_some();
    if exists {
        return Err(AppError::Conflict("Category already exists.".into()));
    }

    let now = state.clock.now();
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        created_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await
    .map_err(conflict_on_unique("Category already exists."))?;

    tracing::info!(category_id = %category.id, name = %category.name, "category created");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id }),
        now,
    )
    .await;

    Ok(ApiResponse::success(
        "Category created",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

/// Deleting a category removes its products as well.
pub async fn delete_category(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(user)?;
    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.orm,
        Some(user.user_id),
        "category_delete",
        "categories",
        serde_json::json!({ "category_id": id }),
        state.clock.now(),
    )
    .await;

    Ok(())
}

/// Public listing: active products only, newest first.
pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    let items: Vec<Product> = Products::find()
        .filter(ProdCol::IsActive.eq(true))
        .order_by_desc(ProdCol::CreatedAt)
        .find_also_related(Categories)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(product, category)| product_from_entity(product, category))
        .collect();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let (product, category) = Products::find_by_id(id)
        .find_also_related(Categories)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Product",
        product_from_entity(product, category),
        None,
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: ProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let name = validate_product(&payload)?;
    let category = find_category(state, payload.category_id).await?;

    let now = state.clock.now();
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(payload.description),
        price: Set(payload.price),
        stock_qty: Set(payload.stock_qty),
        image_url: Set(payload.image_url),
        is_active: Set(payload.is_active),
        category_id: Set(category.id),
        created_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(product_id = %product.id, stock = product.stock_qty, "product created");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
        now,
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product, Some(category)),
        Some(Meta::empty()),
    ))
}

/// Full replacement of the editable product fields.
pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let name = validate_product(&payload)?;
    let category = find_category(state, payload.category_id).await?;

    let mut active: ProductActive = existing.into();
    active.name = Set(name);
    active.description = Set(payload.description);
    active.price = Set(payload.price);
    active.stock_qty = Set(payload.stock_qty);
    active.image_url = Set(payload.image_url);
    active.category_id = Set(category.id);
    active.is_active = Set(payload.is_active);
    let product = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
        state.clock.now(),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product, Some(category)),
        Some(Meta::empty()),
    ))
}

/// Cart and order rows keep pointing at the removed id.
pub async fn delete_product(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
        state.clock.now(),
    )
    .await;

    Ok(())
}

async fn find_category(state: &AppState, id: Uuid) -> AppResult<CategoryModel> {
    Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::validation("CategoryId does not exist."))
}

fn validate_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required."));
    }
    if name.chars().count() < MIN_NAME_LEN {
        return Err(AppError::validation(format!(
            "Name must be at least {MIN_NAME_LEN} characters."
        )));
    }
    Ok(name.to_string())
}

/// Returns the trimmed product name when every field is acceptable.
fn validate_product(payload: &ProductRequest) -> AppResult<String> {
    let name = validate_name(&payload.name)?;
    if payload.price < 0 {
        return Err(AppError::validation("Price must be >= 0."));
    }
    if payload.stock_qty < 0 {
        return Err(AppError::validation("StockQty must be >= 0."));
    }
    Ok(name)
}

fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub(crate) fn product_from_entity(model: ProductModel, category: Option<CategoryModel>) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        stock_qty: model.stock_qty,
        image_url: model.image_url,
        is_active: model.is_active,
        category_id: model.category_id,
        category_name: category.map(|c| c.name),
    }
}
