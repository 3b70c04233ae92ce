use crate::collection::{Record, RecordId};
use crate::domain::CartItem;

impl Record for CartItem {
    // Cart items are bought or removed, never edited.
    type Patch = ();

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn apply_patch(&mut self, _patch: ()) {}

    fn validate(&self) -> Result<(), String> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("price must be a non-negative number, got {}", self.price));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_validation() {
        assert!(CartItem::new("Pen", 10.0, "p.png").validate().is_ok());
        assert!(CartItem::new("Free", 0.0, "f.png").validate().is_ok());
        assert!(CartItem::new("Bad", -1.0, "b.png").validate().is_err());
        assert!(CartItem::new("Nan", f64::NAN, "n.png").validate().is_err());
    }

    #[test]
    fn test_mistyped_price_does_not_decode() {
        let text = r#"{"id":"c-1","name":"Pen","price":"10","image":"p.png"}"#;
        assert!(serde_json::from_str::<CartItem>(text).is_err());
    }
}
