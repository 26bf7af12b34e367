use rust_decimal::Decimal;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{NewProduct, Product};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub product_id: i32,
    pub product_name: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))", nullable)]
    pub unit_price: Option<Decimal>,
    pub unit_in_stock: Option<i32>,
    pub product_picture: String,
    pub category_id: i32,
    pub created_date: DateTimeWithTimeZone,
    pub modified_date: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::CategoryId"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            product_id: model.product_id,
            product_name: model.product_name,
            unit_price: model.unit_price,
            unit_in_stock: model.unit_in_stock,
            product_picture: model.product_picture,
            category_id: model.category_id,
            created_date: model.created_date.into(),
            modified_date: model.modified_date.map(Into::into),
        }
    }
}

// Serial key is assigned by the database
impl From<NewProduct> for ActiveModel {
    fn from(input: NewProduct) -> Self {
        ActiveModel {
            product_id: NotSet,
            product_name: Set(input.product_name),
            unit_price: Set(input.unit_price),
            unit_in_stock: Set(input.unit_in_stock),
            product_picture: Set(input.product_picture),
            category_id: Set(input.category_id),
            created_date: Set(input.created_date.into()),
            modified_date: Set(None),
        }
    }
}

// Full overwrite of every column
impl From<Product> for ActiveModel {
    fn from(product: Product) -> Self {
        ActiveModel {
            product_id: Set(product.product_id),
            product_name: Set(product.product_name),
            unit_price: Set(product.unit_price),
            unit_in_stock: Set(product.unit_in_stock),
            product_picture: Set(product.product_picture),
            category_id: Set(product.category_id),
            created_date: Set(product.created_date.into()),
            modified_date: Set(product.modified_date.map(Into::into)),
        }
    }
}
