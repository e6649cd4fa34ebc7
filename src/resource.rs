//! The products resource: six actions over a [`ProductStore`], each
//! returning an [`Outcome`] instead of writing a response directly.

use std::sync::Arc;

use crate::product::{Product, ProductId, ProductParams, ValidationErrors};
use crate::store::{ProductStore, StoreError};
use crate::{AppError, AppResult};

pub const PRODUCTS_PATH: &str = "/products";

/// What the HTTP layer should render for a [`Outcome::Render`].
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Index {
        products: Vec<Product>,
    },
    New {
        product: Product,
        errors: ValidationErrors,
    },
    Edit {
        product: Product,
        errors: ValidationErrors,
    },
}

impl Page {
    pub fn template(&self) -> &'static str {
        match self {
            Page::Index { .. } => "index",
            Page::New { .. } => "new",
            Page::Edit { .. } => "edit",
        }
    }

    /// The single product exposed to a form page.
    pub fn product(&self) -> Option<&Product> {
        match self {
            Page::Index { .. } => None,
            Page::New { product, .. } | Page::Edit { product, .. } => Some(product),
        }
    }

    pub fn products(&self) -> Option<&[Product]> {
        match self {
            Page::Index { products } => Some(products),
            _ => None,
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Page::Index { .. } => None,
            Page::New { errors, .. } | Page::Edit { errors, .. } => Some(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Render(Page),
    /// `product` is the saved entity after a create or update, `None` after
    /// a destroy.
    Redirect {
        location: String,
        product: Option<Product>,
    },
}

impl Outcome {
    pub fn page(&self) -> Option<&Page> {
        match self {
            Outcome::Render(page) => Some(page),
            Outcome::Redirect { .. } => None,
        }
    }

    pub fn redirect_location(&self) -> Option<&str> {
        match self {
            Outcome::Redirect { location, .. } => Some(location),
            Outcome::Render(_) => None,
        }
    }

    /// The single product the action exposed, whether rendered or saved.
    pub fn product(&self) -> Option<&Product> {
        match self {
            Outcome::Render(page) => page.product(),
            Outcome::Redirect { product, .. } => product.as_ref(),
        }
    }

    pub fn is_redirect_to(&self, path: &str) -> bool {
        self.redirect_location() == Some(path)
    }

    pub fn renders(&self, template: &str) -> bool {
        self.page().map(Page::template) == Some(template)
    }

    fn redirect_to_products(product: Option<Product>) -> Self {
        Outcome::Redirect {
            location: PRODUCTS_PATH.to_string(),
            product,
        }
    }
}

#[derive(Clone)]
pub struct ProductResource {
    store: Arc<dyn ProductStore>,
}

impl ProductResource {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn ProductStore {
        self.store.as_ref()
    }

    pub fn list(&self) -> AppResult<Outcome> {
        let products = self.store.all()?;
        Ok(Outcome::Render(Page::Index { products }))
    }

    pub fn new_form(&self) -> Outcome {
        Outcome::Render(Page::New {
            product: Product::new(),
            errors: ValidationErrors::default(),
        })
    }

    pub fn edit(&self, id: ProductId) -> AppResult<Outcome> {
        let product = self.fetch(id)?;
        Ok(Outcome::Render(Page::Edit {
            product,
            errors: ValidationErrors::default(),
        }))
    }

    pub fn create(&self, params: ProductParams) -> AppResult<Outcome> {
        let product = Product::from_params(params);

        let errors = self.validate(&product)?;
        if !errors.is_empty() {
            tracing::info!(code = %product.code, %errors, "rejected new product");
            return Ok(Outcome::Render(Page::New { product, errors }));
        }

        match self.store.insert(product.clone()) {
            Ok(saved) => {
                tracing::info!(id = ?saved.id, code = %saved.code, "created product");
                Ok(Outcome::redirect_to_products(Some(saved)))
            }
            Err(StoreError::DuplicateCode(_)) => Ok(Outcome::Render(Page::New {
                product,
                errors: code_taken(),
            })),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update(&self, id: ProductId, params: ProductParams) -> AppResult<Outcome> {
        let mut product = self.fetch(id)?;
        params.apply_to(&mut product);

        let errors = self.validate(&product)?;
        if !errors.is_empty() {
            tracing::info!(%id, %errors, "rejected product update");
            return Ok(Outcome::Render(Page::Edit { product, errors }));
        }

        match self.store.update(product.clone()) {
            Ok(saved) => {
                tracing::info!(%id, code = %saved.code, "updated product");
                Ok(Outcome::redirect_to_products(Some(saved)))
            }
            Err(StoreError::DuplicateCode(_)) => Ok(Outcome::Render(Page::Edit {
                product,
                errors: code_taken(),
            })),
            Err(StoreError::NotFound(_)) => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn destroy(&self, id: ProductId) -> AppResult<Outcome> {
        let product = self.fetch(id)?;
        match self.store.delete(id) {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => return Err(not_found(id)),
            Err(e) => return Err(e.into()),
        }
        tracing::info!(%id, code = %product.code, "deleted product");
        Ok(Outcome::redirect_to_products(None))
    }

    fn fetch(&self, id: ProductId) -> AppResult<Product> {
        match self.store.find(id) {
            Ok(product) => Ok(product),
            Err(StoreError::NotFound(_)) => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Field rules plus code uniqueness against everything but `product`.
    fn validate(&self, product: &Product) -> AppResult<ValidationErrors> {
        let mut errors = product.validate();
        if !errors.has("code")
            && let Some(owner) = self.store.find_by_code(&product.code)?
            && owner.id != product.id
        {
            errors.add("code", "has already been taken");
        }
        Ok(errors)
    }
}

fn code_taken() -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.add("code", "has already been taken");
    errors
}

fn not_found(id: ProductId) -> AppError {
    AppError::NotFound(id.to_string())
}
