//! Products Data

use uuid::Uuid;

use crate::domain::products::records::ProductUuid;

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub category_uuid: Uuid,
    pub price: u64,
    pub stock: u32,
}
