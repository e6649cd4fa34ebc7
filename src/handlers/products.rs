use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use crate::product::{Product, ProductId, ProductParams};
use crate::resource::{Outcome, Page};
use crate::templates::{
    EditProductTemplate, IndexTemplate, NewProductTemplate, ProductForm, ProductRow,
};

/// Form body of the product pages. Field names follow the
/// `product[attribute]` convention so one form posts a nested attribute set.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProductSubmission {
    #[serde(rename = "product[code]")]
    pub code: Option<String>,
    #[serde(rename = "product[name]")]
    pub name: Option<String>,
    #[serde(rename = "product[kind]")]
    pub kind: Option<String>,
    #[serde(rename = "product[status]")]
    pub status: Option<String>,
    /// Browsers only send GET and POST; forms tunnel PUT/PATCH/DELETE here.
    #[serde(rename = "_method")]
    pub method: Option<String>,
}

impl From<ProductSubmission> for ProductParams {
    fn from(submission: ProductSubmission) -> Self {
        Self {
            code: submission.code,
            name: submission.name,
            kind: submission.kind,
            status: submission.status,
        }
    }
}

pub async fn index(State(state): State<crate::SharedAppState>) -> crate::AppResult<Response> {
    let outcome = state.products.list()?;
    Ok(respond(&state, outcome))
}

pub async fn new_product(State(state): State<crate::SharedAppState>) -> Response {
    let outcome = state.products.new_form();
    respond(&state, outcome)
}

pub async fn edit_product(
    State(state): State<crate::SharedAppState>,
    Path(id): Path<ProductId>,
) -> crate::AppResult<Response> {
    let outcome = state.products.edit(id)?;
    Ok(respond(&state, outcome))
}

pub async fn create_product(
    State(state): State<crate::SharedAppState>,
    Form(submission): Form<ProductSubmission>,
) -> crate::AppResult<Response> {
    let outcome = state.products.create(submission.into())?;
    Ok(respond(&state, outcome))
}

pub async fn update_product(
    State(state): State<crate::SharedAppState>,
    Path(id): Path<ProductId>,
    Form(submission): Form<ProductSubmission>,
) -> crate::AppResult<Response> {
    let outcome = state.products.update(id, submission.into())?;
    Ok(respond(&state, outcome))
}

pub async fn destroy_product(
    State(state): State<crate::SharedAppState>,
    Path(id): Path<ProductId>,
) -> crate::AppResult<Response> {
    let outcome = state.products.destroy(id)?;
    Ok(respond(&state, outcome))
}

/// `POST /products/:id` with a `_method` field.
pub async fn tunneled_member_action(
    State(state): State<crate::SharedAppState>,
    Path(id): Path<ProductId>,
    Form(mut submission): Form<ProductSubmission>,
) -> crate::AppResult<Response> {
    let method = submission.method.take().unwrap_or_default();
    let outcome = match method.to_ascii_lowercase().as_str() {
        "put" | "patch" => state.products.update(id, submission.into())?,
        "delete" => state.products.destroy(id)?,
        other => {
            return Err(crate::AppError::BadRequest(format!(
                "Unsupported _method: {:?}",
                other
            )));
        }
    };
    Ok(respond(&state, outcome))
}

pub async fn list_products(
    State(state): State<crate::SharedAppState>,
) -> crate::AppResult<Json<Vec<Product>>> {
    let products = state.products.store().all()?;
    Ok(Json(products))
}

fn respond(state: &crate::AppState, outcome: Outcome) -> Response {
    match outcome {
        Outcome::Redirect { location, .. } => Redirect::to(&location).into_response(),
        Outcome::Render(page) => render(state, page),
    }
}

fn render(state: &crate::AppState, page: Page) -> Response {
    let template_name = page.template();
    let project_name = state.project_name.clone();
    let app_version = state.app_version.clone();

    match page {
        Page::Index { products } => IndexTemplate {
            project_name,
            page_title: "Products".to_string(),
            app_version,
            template_name,
            products: products.iter().map(ProductRow::from_product).collect(),
        }
        .into_response(),
        Page::New { product, errors } => {
            let status = form_status(errors.is_empty());
            let template = NewProductTemplate {
                project_name,
                page_title: "New Product".to_string(),
                app_version,
                template_name,
                form: ProductForm::new(&product, &errors),
            };
            (status, template).into_response()
        }
        Page::Edit { product, errors } => {
            let status = form_status(errors.is_empty());
            let product_id = product.id.map(|id| id.to_string()).unwrap_or_default();
            let template = EditProductTemplate {
                project_name,
                page_title: format!("Edit {}", product.code),
                app_version,
                template_name,
                product_id,
                form: ProductForm::new(&product, &errors),
            };
            (status, template).into_response()
        }
    }
}

fn form_status(valid: bool) -> StatusCode {
    if valid {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}
