//! Product create/edit form
//!
//! Eight text fields backed by `tui_input`. Parsing and validation run
//! on submit; failures surface as per-field messages and block the
//! submission entirely — an invalid payload is never handed to the
//! client crate.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tui_input::Input;
use validator::Validate;

use shared::validation::{FieldError, field_errors};
use shared::{Product, ProductCreate, ProductUpdate};

/// Date format used by the expiry field
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// Field identifiers, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
    Price,
    StockQuantity,
    Category,
    Supplier,
    ExpiryDate,
    MinimumStockThreshold,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Description,
        Field::Price,
        Field::StockQuantity,
        Field::Category,
        Field::Supplier,
        Field::ExpiryDate,
        Field::MinimumStockThreshold,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Description => "Description",
            Self::Price => "Price",
            Self::StockQuantity => "Stock quantity",
            Self::Category => "Category",
            Self::Supplier => "Supplier",
            Self::ExpiryDate => "Expiry date (YYYY-MM-DD)",
            Self::MinimumStockThreshold => "Min. stock threshold",
        }
    }

    /// Key used by validation errors for this field
    pub fn error_key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
            Self::StockQuantity => "stock_quantity",
            Self::Category => "category",
            Self::Supplier => "supplier",
            Self::ExpiryDate => "expiry_date",
            Self::MinimumStockThreshold => "minimum_stock_threshold",
        }
    }
}

pub struct ProductForm {
    pub mode: FormMode,
    pub inputs: Vec<Input>,
    pub focused: usize,
    pub errors: Vec<FieldError>,
}

impl ProductForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            inputs: Field::ALL.iter().map(|_| Input::default()).collect(),
            focused: 0,
            errors: Vec::new(),
        }
    }

    pub fn edit(product: &Product) -> Self {
        let values = [
            product.name.clone(),
            product.description.clone().unwrap_or_default(),
            product.price.to_string(),
            product.stock_quantity.to_string(),
            product.category.clone(),
            product.supplier.clone(),
            product.expiry_date.format(DATE_FORMAT).to_string(),
            product
                .minimum_stock_threshold
                .map(|t| t.to_string())
                .unwrap_or_default(),
        ];
        Self {
            mode: FormMode::Edit(product.id),
            inputs: values.into_iter().map(Input::new).collect(),
            focused: 0,
            errors: Vec::new(),
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.inputs.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + self.inputs.len() - 1) % self.inputs.len();
    }

    pub fn focused_input_mut(&mut self) -> &mut Input {
        &mut self.inputs[self.focused]
    }

    fn value(&self, field: Field) -> &str {
        let idx = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
        self.inputs[idx].value()
    }

    /// The first error message for a field, for inline display.
    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field.error_key())
            .map(|e| e.message.as_str())
    }

    /// Parse and validate into a create payload.
    pub fn to_create(&self) -> Result<ProductCreate, Vec<FieldError>> {
        let mut errors = Vec::new();

        let price = parse_price(self.value(Field::Price), &mut errors);
        let stock_quantity = parse_quantity(self.value(Field::StockQuantity), &mut errors);
        let expiry_date = parse_date(self.value(Field::ExpiryDate), &mut errors);
        let minimum_stock_threshold =
            parse_threshold(self.value(Field::MinimumStockThreshold), &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        let description = self.value(Field::Description).trim();
        let payload = ProductCreate {
            name: self.value(Field::Name).trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            price,
            stock_quantity,
            category: self.value(Field::Category).trim().to_string(),
            supplier: self.value(Field::Supplier).trim().to_string(),
            expiry_date,
            minimum_stock_threshold,
        };

        match payload.validate() {
            Ok(()) => Ok(payload),
            Err(e) => Err(field_errors(&e)),
        }
    }

    /// Parse and validate into a full update payload.
    pub fn to_update(&self) -> Result<ProductUpdate, Vec<FieldError>> {
        let create = self.to_create()?;
        Ok(ProductUpdate {
            name: Some(create.name),
            description: create.description,
            price: Some(create.price),
            stock_quantity: Some(create.stock_quantity),
            category: Some(create.category),
            supplier: Some(create.supplier),
            expiry_date: Some(create.expiry_date),
            minimum_stock_threshold: create.minimum_stock_threshold,
        })
    }
}

fn push_error(errors: &mut Vec<FieldError>, field: Field, message: &str) {
    errors.push(FieldError {
        field: field.error_key().to_string(),
        message: message.to_string(),
    });
}

fn parse_price(raw: &str, errors: &mut Vec<FieldError>) -> Decimal {
    match Decimal::from_str(raw.trim()) {
        Ok(price) => price,
        Err(_) => {
            push_error(errors, Field::Price, "enter a decimal number");
            Decimal::ZERO
        }
    }
}

fn parse_quantity(raw: &str, errors: &mut Vec<FieldError>) -> u32 {
    match raw.trim().parse() {
        Ok(quantity) => quantity,
        Err(_) => {
            push_error(errors, Field::StockQuantity, "enter a non-negative integer");
            0
        }
    }
}

fn parse_date(raw: &str, errors: &mut Vec<FieldError>) -> NaiveDate {
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => date,
        Err(_) => {
            push_error(errors, Field::ExpiryDate, "enter a date as YYYY-MM-DD");
            NaiveDate::default()
        }
    }
}

fn parse_threshold(raw: &str, errors: &mut Vec<FieldError>) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(threshold) => Some(threshold),
        Err(_) => {
            push_error(
                errors,
                Field::MinimumStockThreshold,
                "enter a positive integer or leave blank",
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn filled_form() -> ProductForm {
        let mut form = ProductForm::create();
        let values = [
            "Ibuprofen 400mg",
            "film-coated tablets",
            "4.99",
            "25",
            "Analgesics",
            "Acme Pharma",
            "2027-03-01",
            "",
        ];
        for (input, value) in form.inputs.iter_mut().zip(values) {
            *input = Input::new(value.to_string());
        }
        form
    }

    #[test]
    fn valid_form_produces_a_payload() {
        let payload = filled_form().to_create().unwrap();
        assert_eq!(payload.name, "Ibuprofen 400mg");
        assert_eq!(payload.price, Decimal::new(499, 2));
        assert_eq!(payload.stock_quantity, 25);
        assert_eq!(payload.minimum_stock_threshold, None);
        assert_eq!(
            payload.expiry_date,
            NaiveDate::from_ymd_opt(2027, 3, 1).unwrap()
        );
    }

    #[test]
    fn zero_price_blocks_submission() {
        let mut form = filled_form();
        form.inputs[2] = Input::new("0".to_string());
        let errors = form.to_create().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "price"));
    }

    #[test]
    fn unparseable_inputs_report_their_fields() {
        let mut form = filled_form();
        form.inputs[2] = Input::new("cheap".to_string());
        form.inputs[6] = Input::new("tomorrow".to_string());
        let errors = form.to_create().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"price"));
        assert!(fields.contains(&"expiry_date"));
    }

    #[test]
    fn edit_form_prefills_from_the_product() {
        let product = Product {
            id: 9,
            name: "Vitamin D3".to_string(),
            description: None,
            price: Decimal::new(1250, 2),
            stock_quantity: 12,
            category: "Vitamins".to_string(),
            supplier: "Globex".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2026, 12, 24).unwrap(),
            minimum_stock_threshold: Some(6),
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        };
        let form = ProductForm::edit(&product);
        assert_eq!(form.mode, FormMode::Edit(9));
        assert_eq!(form.value(Field::Name), "Vitamin D3");
        assert_eq!(form.value(Field::Price), "12.50");
        assert_eq!(form.value(Field::ExpiryDate), "2026-12-24");
        assert_eq!(form.value(Field::MinimumStockThreshold), "6");

        let update = form.to_update().unwrap();
        assert_eq!(update.stock_quantity, Some(12));
        assert_eq!(update.minimum_stock_threshold, Some(6));
    }

    #[test]
    fn focus_wraps_around() {
        let mut form = ProductForm::create();
        form.focus_prev();
        assert_eq!(form.focused, form.inputs.len() - 1);
        form.focus_next();
        assert_eq!(form.focused, 0);
    }
}
