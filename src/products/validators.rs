use crate::products::dto::CreateProductRequest;
use crate::products::repo_types::NewProduct;
use crate::validation::{push, FieldErrors};

pub fn validate_create(req: CreateProductRequest) -> Result<NewProduct, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = match req.name {
        Some(n) if !n.is_empty() => Some(n),
        Some(_) => {
            push(&mut errors, "name", "Name must not be empty.");
            None
        }
        None => {
            push(&mut errors, "name", "Name is required.");
            None
        }
    };
    let description = match req.description {
        Some(d) => Some(d),
        None => {
            push(&mut errors, "description", "Description is required.");
            None
        }
    };
    let price = match req.price {
        Some(p) => Some(p),
        None => {
            push(&mut errors, "price", "Price is required.");
            None
        }
    };

    let mut reference = |value: Option<i32>, field: &'static str, message: &str| match value {
        Some(id) => Some(id),
        None => {
            push(&mut errors, field, message);
            None
        }
    };
    let brand_id = reference(req.brand_id, "brand_id", "Brand ID is required.");
    let category_id = reference(req.category_id, "category_id", "Category ID is required.");
    let sport_id = reference(req.sport_id, "sport_id", "Sport ID is required.");
    let gender_id = reference(req.gender_id, "gender_id", "Gender ID is required.");
    let country_id = reference(req.country_id, "country_id", "Country ID is required.");

    if !errors.is_empty() {
        return Err(errors);
    }

    match (
        name,
        description,
        price,
        brand_id,
        category_id,
        sport_id,
        gender_id,
        country_id,
    ) {
        (
            Some(name),
            Some(description),
            Some(price),
            Some(brand_id),
            Some(category_id),
            Some(sport_id),
            Some(gender_id),
            Some(country_id),
        ) => Ok(NewProduct {
            name,
            description,
            price,
            discount_price: req.discount_price,
            image_url: req.image_url,
            composition: req.composition,
            brand_id,
            category_id,
            sport_id,
            gender_id,
            country_id,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateProductRequest {
        CreateProductRequest {
            name: Some("Air Zoom".into()),
            description: Some("Running shoe".into()),
            price: Some(129.99),
            discount_price: None,
            image_url: None,
            composition: Some("Mesh".into()),
            brand_id: Some(1),
            category_id: Some(1),
            sport_id: Some(4),
            gender_id: Some(3),
            country_id: Some(2),
        }
    }

    #[test]
    fn accepts_a_complete_payload() {
        let product = validate_create(full_request()).expect("valid payload");
        assert_eq!(product.name, "Air Zoom");
        assert_eq!(product.discount_price, None);
    }

    #[test]
    fn collects_all_missing_required_fields() {
        let errors = validate_create(CreateProductRequest {
            name: None,
            description: None,
            price: None,
            discount_price: None,
            image_url: None,
            composition: None,
            brand_id: None,
            category_id: None,
            sport_id: None,
            gender_id: None,
            country_id: None,
        })
        .unwrap_err();
        for field in [
            "name",
            "description",
            "price",
            "brand_id",
            "category_id",
            "sport_id",
            "gender_id",
            "country_id",
        ] {
            assert!(errors.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn rejects_empty_name() {
        let mut req = full_request();
        req.name = Some(String::new());
        let errors = validate_create(req).unwrap_err();
        assert_eq!(errors["name"], vec!["Name must not be empty."]);
    }
}
