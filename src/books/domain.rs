use crate::core::query::Catalogued;

pub mod model;

pub(crate) trait Book: Catalogued {
    fn author(&self) -> &str;
    fn isbn(&self) -> &str;
    fn price(&self) -> f64;
}
