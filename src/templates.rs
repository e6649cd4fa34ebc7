use askama::Template;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::product::{Kind, Product, Status, ValidationErrors};

pub struct ProductRow {
    pub id: String,
    pub code: String,
    pub name: String,
    pub kind: String,
    pub status: String,
    pub status_class: String,
    pub updated: String,
}

impl ProductRow {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.map(|id| id.to_string()).unwrap_or_default(),
            code: product.code.clone(),
            name: product.name.clone(),
            kind: product.kind_label(),
            status: product.status_label(),
            status_class: product.status.clone(),
            updated: product.updated_at.map(format_timestamp).unwrap_or_default(),
        }
    }
}

fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_default()
}

pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Builds `<option>`s for `choices`, keeping an unknown `current` value as
/// its own selected option so rejected input is shown back unchanged.
fn select_options<T: ToString>(
    choices: impl IntoIterator<Item = (&'static str, T)>,
    current: &str,
) -> Vec<SelectOption> {
    let mut options: Vec<SelectOption> = choices
        .into_iter()
        .map(|(value, label)| SelectOption {
            value: value.to_string(),
            label: label.to_string(),
            selected: value == current,
        })
        .collect();

    if !current.is_empty() && !options.iter().any(|o| o.selected) {
        options.insert(
            0,
            SelectOption {
                value: current.to_string(),
                label: current.to_string(),
                selected: true,
            },
        );
    }
    options
}

/// Everything `products/_form.html` needs.
pub struct ProductForm {
    pub action: String,
    /// `post` for new products; anything else is sent as `_method`.
    pub method: &'static str,
    pub submit_label: &'static str,
    pub code: String,
    pub name: String,
    pub kinds: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub errors: Vec<String>,
    pub code_error: String,
    pub name_error: String,
    pub kind_error: String,
    pub status_error: String,
}

impl ProductForm {
    pub fn new(product: &Product, errors: &ValidationErrors) -> Self {
        let (action, method, submit_label) = match product.id {
            Some(id) => (format!("/products/{}", id), "put", "Update Product"),
            None => ("/products".to_string(), "post", "Create Product"),
        };

        Self {
            action,
            method,
            submit_label,
            code: product.code.clone(),
            name: product.name.clone(),
            kinds: select_options(Kind::ALL.map(|k| (k.as_str(), k)), &product.kind),
            statuses: select_options(Status::ALL.map(|s| (s.as_str(), s)), &product.status),
            errors: errors.full_messages(),
            code_error: errors.on("code"),
            name_error: errors.on("name"),
            kind_error: errors.on("kind"),
            status_error: errors.on("status"),
        }
    }
}

#[derive(Template)]
#[template(path = "products/index.html")]
pub struct IndexTemplate {
    pub project_name: String,
    pub page_title: String,
    pub app_version: String,
    pub template_name: &'static str,
    pub products: Vec<ProductRow>,
}

#[derive(Template)]
#[template(path = "products/new.html")]
pub struct NewProductTemplate {
    pub project_name: String,
    pub page_title: String,
    pub app_version: String,
    pub template_name: &'static str,
    pub form: ProductForm,
}

#[derive(Template)]
#[template(path = "products/edit.html")]
pub struct EditProductTemplate {
    pub project_name: String,
    pub page_title: String,
    pub app_version: String,
    pub template_name: &'static str,
    pub product_id: String,
    pub form: ProductForm,
}
