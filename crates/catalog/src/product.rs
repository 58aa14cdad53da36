use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ProductId};

use crate::validate::is_valid_date;

/// Kind-specific payload, tagged by the `kind` discriminator.
///
/// Exactly one of the two fields exists per product, selected by the variant.
/// The discriminator serializes as `"hardware"` / `"software"` alongside the
/// shared fields (internally tagged + flattened into [`Product`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProductKind {
    Hardware {
        /// Warranty in years as free text; `"0"` means "no warranty".
        warranty: String,
    },
    Software {
        /// `dd/mm/yyyy`; `31/12/2999` is the conventional "never".
        expiration_date: String,
    },
}

impl ProductKind {
    /// Discriminator value as persisted in both backends.
    pub fn label(&self) -> &'static str {
        match self {
            ProductKind::Hardware { .. } => "hardware",
            ProductKind::Software { .. } => "software",
        }
    }
}

/// A product in the inventory.
///
/// Construction is all-or-nothing: the constructors validate every field and
/// fail on the first invalid one, so no partially-valid product is ever
/// observable. The `id` is assigned at creation and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Regenerated on read when the persisted record predates id assignment.
    #[serde(default)]
    id: ProductId,
    name: String,
    price: f64,
    stock_quantity: u32,
    #[serde(flatten)]
    kind: ProductKind,
}

impl Product {
    /// Create a hardware product.
    pub fn hardware(
        name: impl Into<String>,
        price: f64,
        stock_quantity: u32,
        warranty: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::from_parts(
            ProductId::new(),
            name.into(),
            price,
            stock_quantity,
            ProductKind::Hardware {
                warranty: warranty.into(),
            },
        )
    }

    /// Create a software product.
    pub fn software(
        name: impl Into<String>,
        price: f64,
        stock_quantity: u32,
        expiration_date: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::from_parts(
            ProductId::new(),
            name.into(),
            price,
            stock_quantity,
            ProductKind::Software {
                expiration_date: expiration_date.into(),
            },
        )
    }

    /// Assemble a product from already-persisted parts.
    ///
    /// Runs the same validation as the constructors, so a corrupt row in
    /// storage surfaces as a `Validation` error at rehydration time instead
    /// of an invalid entity in memory.
    pub fn from_parts(
        id: ProductId,
        name: String,
        price: f64,
        stock_quantity: u32,
        kind: ProductKind,
    ) -> DomainResult<Self> {
        validate_name(&name)?;
        validate_price(price)?;
        match &kind {
            ProductKind::Hardware { warranty } => validate_warranty(warranty)?,
            ProductKind::Software { expiration_date } => validate_expiration(expiration_date)?,
        }
        Ok(Self {
            id,
            name,
            price,
            stock_quantity,
            kind,
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock_quantity(&self) -> u32 {
        self.stock_quantity
    }

    pub fn kind(&self) -> &ProductKind {
        &self.kind
    }

    /// Warranty text, if this is a hardware product.
    pub fn warranty(&self) -> Option<&str> {
        match &self.kind {
            ProductKind::Hardware { warranty } => Some(warranty),
            ProductKind::Software { .. } => None,
        }
    }

    /// Expiration date text, if this is a software product.
    pub fn expiration_date(&self) -> Option<&str> {
        match &self.kind {
            ProductKind::Software { expiration_date } => Some(expiration_date),
            ProductKind::Hardware { .. } => None,
        }
    }

    /// Apply a partial update in place.
    ///
    /// Absent patch fields leave the current value unchanged. All supplied
    /// values are validated before anything is written, so a failed update
    /// leaves the product exactly as it was. Kind-specific patch fields that
    /// do not match this product's kind are ignored.
    pub fn apply(&mut self, patch: &ProductPatch) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
        }
        if let ProductKind::Software { .. } = self.kind {
            if let Some(date) = &patch.expiration_date {
                // Blank means "keep current value"; a non-blank malformed
                // date aborts the whole update.
                if !date.trim().is_empty() && !is_valid_date(date) {
                    return Err(DomainError::validation(
                        "the new expiration date must be in dd/mm/yyyy format",
                    ));
                }
            }
        }

        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.stock_quantity {
            self.stock_quantity = quantity;
        }
        match &mut self.kind {
            ProductKind::Hardware { warranty } => {
                if let Some(new_warranty) = &patch.warranty {
                    // Blank warranty normalizes to "0" (no warranty).
                    *warranty = if new_warranty.trim().is_empty() {
                        "0".to_string()
                    } else {
                        new_warranty.clone()
                    };
                }
            }
            ProductKind::Software { expiration_date } => {
                if let Some(new_date) = &patch.expiration_date {
                    if !new_date.trim().is_empty() {
                        *expiration_date = new_date.clone();
                    }
                }
            }
        }
        Ok(())
    }
}

/// Partial overwrite of product fields; `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<u32>,
    pub warranty: Option<String>,
    pub expiration_date: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("the product must have a name"));
    }
    Ok(())
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(DomainError::validation(
            "the price must be a positive number",
        ));
    }
    Ok(())
}

fn validate_warranty(warranty: &str) -> DomainResult<()> {
    if warranty.trim().is_empty() {
        return Err(DomainError::validation(
            "if the product has no warranty, use \"0\"",
        ));
    }
    Ok(())
}

fn validate_expiration(date: &str) -> DomainResult<()> {
    if date.trim().is_empty() {
        return Err(DomainError::validation(
            "the expiration date must not be blank; use 31/12/2999 for \"never\"",
        ));
    }
    if !is_valid_date(date) {
        return Err(DomainError::validation(
            "the expiration date must be in dd/mm/yyyy format",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse() -> Product {
        Product::hardware("Mouse", 19.99, 10, "1").unwrap()
    }

    fn editor() -> Product {
        Product::software("Editor", 49.0, 3, "31/12/2999").unwrap()
    }

    #[test]
    fn hardware_constructor_validates_all_fields() {
        let product = mouse();
        assert_eq!(product.name(), "Mouse");
        assert_eq!(product.price(), 19.99);
        assert_eq!(product.stock_quantity(), 10);
        assert_eq!(product.warranty(), Some("1"));
        assert_eq!(product.expiration_date(), None);
        assert_eq!(product.kind().label(), "hardware");
    }

    #[test]
    fn construction_rejects_blank_name() {
        let err = Product::hardware("   ", 10.0, 1, "1").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn construction_rejects_non_positive_price() {
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = Product::software("Editor", price, 1, "31/12/2999").unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "price {price}");
        }
    }

    #[test]
    fn construction_rejects_blank_warranty() {
        let err = Product::hardware("Mouse", 19.99, 10, "  ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn construction_rejects_malformed_expiration_date() {
        for date in ["", "2024-12-31", "31/02/2024", "soon"] {
            let err = Product::software("Editor", 49.0, 3, date).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "date {date:?}");
        }
    }

    #[test]
    fn validation_reports_the_first_invalid_field() {
        // Name is checked before price, price before the kind-specific field.
        let err = Product::hardware("", -1.0, 0, "").unwrap_err();
        assert_eq!(err, DomainError::validation("the product must have a name"));

        let err = Product::hardware("Mouse", -1.0, 0, "").unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("the price must be a positive number")
        );
    }

    #[test]
    fn serialization_round_trips() {
        for product in [mouse(), editor()] {
            let json = serde_json::to_string(&product).unwrap();
            let back: Product = serde_json::from_str(&json).unwrap();
            assert_eq!(product, back);
        }
    }

    #[test]
    fn serialized_form_uses_the_kind_discriminator() {
        let value = serde_json::to_value(mouse()).unwrap();
        assert_eq!(value["kind"], "hardware");
        assert_eq!(value["warranty"], "1");
        assert!(value.get("expiration_date").is_none());

        let value = serde_json::to_value(editor()).unwrap();
        assert_eq!(value["kind"], "software");
        assert_eq!(value["expiration_date"], "31/12/2999");
    }

    #[test]
    fn missing_id_is_regenerated_on_read() {
        let json = r#"{
            "name": "Mouse",
            "price": 19.99,
            "stock_quantity": 10,
            "warranty": "1",
            "kind": "hardware"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.name(), "Mouse");
        // The generated id is a real UUID.
        assert!(product.id().to_string().parse::<ProductId>().is_ok());
    }

    #[test]
    fn price_only_patch_leaves_other_fields_alone() {
        let mut product = mouse();
        let before = product.clone();
        product
            .apply(&ProductPatch {
                price: Some(9.99),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(product.price(), 9.99);
        assert_eq!(product.id(), before.id());
        assert_eq!(product.name(), before.name());
        assert_eq!(product.stock_quantity(), before.stock_quantity());
        assert_eq!(product.warranty(), before.warranty());
    }

    #[test]
    fn blank_warranty_patch_normalizes_to_zero() {
        let mut product = mouse();
        product
            .apply(&ProductPatch {
                warranty: Some("   ".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(product.warranty(), Some("0"));
    }

    #[test]
    fn blank_date_patch_keeps_the_current_date() {
        let mut product = editor();
        product
            .apply(&ProductPatch {
                expiration_date: Some("".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(product.expiration_date(), Some("31/12/2999"));
    }

    #[test]
    fn malformed_date_patch_aborts_without_mutating() {
        let mut product = editor();
        let before = product.clone();
        let err = product
            .apply(&ProductPatch {
                price: Some(1.0),
                expiration_date: Some("31/31/2024".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(product, before, "failed update must not partially apply");
    }

    #[test]
    fn kind_mismatched_patch_fields_are_ignored() {
        let mut hardware = mouse();
        hardware
            .apply(&ProductPatch {
                expiration_date: Some("01/01/2030".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(hardware.expiration_date(), None);

        let mut software = editor();
        software
            .apply(&ProductPatch {
                warranty: Some("5".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(software.warranty(), None);
        assert_eq!(software.expiration_date(), Some("31/12/2999"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every valid input constructs, and the entity
            /// round-trips through serialization unchanged (same id, fields).
            #[test]
            fn valid_hardware_round_trips(
                name in "[A-Za-z][A-Za-z0-9 ]{0,30}",
                price in 0.01f64..100_000.0,
                quantity in 0u32..10_000,
                warranty in "[0-9]{1,2}",
            ) {
                let product = Product::hardware(name, price, quantity, warranty).unwrap();
                let json = serde_json::to_string(&product).unwrap();
                let back: Product = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(product, back);
            }

            /// Property: non-positive prices are always rejected.
            #[test]
            fn non_positive_price_never_constructs(price in -100_000.0f64..=0.0) {
                let err = Product::hardware("Mouse", price, 1, "1").unwrap_err();
                prop_assert!(matches!(err, DomainError::Validation(_)));
            }
        }
    }
}
