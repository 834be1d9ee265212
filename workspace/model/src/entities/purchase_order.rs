use sea_orm::entity::prelude::*;

/// A purchase-order record as imported from the yearly PO spreadsheets.
/// The dashboard only ever reads this table; rows are written by the
/// import tooling (and by test seeders).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The PO reference printed on the order form.
    pub po_reference: Option<String>,
    /// Order category, e.g. "Carton", "Label".
    pub order_type: String,
    /// Date on the purchase order. Legacy imports may leave this unset,
    /// which is why the column is nullable.
    pub po_date: Option<Date>,
    pub client_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
