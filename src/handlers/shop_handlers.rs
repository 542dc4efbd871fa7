use crate::auth::CurrentUser;
use crate::models::user::User;
use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

pub struct CatalogItem {
    pub name: &'static str,
    pub price: &'static str,
}

const CATALOG: &[CatalogItem] = &[
    CatalogItem {
        name: "Canvas tote",
        price: "$18.00",
    },
    CatalogItem {
        name: "Sketchbook",
        price: "$12.50",
    },
    CatalogItem {
        name: "Film camera strap",
        price: "$24.00",
    },
];

#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
struct ProductsTemplate {
    user: User,
    items: &'static [CatalogItem],
}

#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
struct CartTemplate {
    user: User,
}

/// GET /products
pub async fn products_page(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    ProductsTemplate {
        user,
        items: CATALOG,
    }
}

/// GET /cart
pub async fn cart_page(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    CartTemplate { user }
}
