use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;

// CartItem is one line of a shopping cart, quantity is at least 1 while the item is in a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItem {
    #[serde(rename = "bookID")]
    pub book_id: i64,
    pub title: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(book_id: i64, title: &str, price: f64) -> Self {
        Self {
            book_id,
            title: title.to_string(),
            price,
            quantity: 1,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

impl<B: Book> From<&B> for CartItem {
    fn from(book: &B) -> Self {
        CartItem::new(book.id(), book.title(), book.price())
    }
}

impl Identifiable for CartItem {
    fn id(&self) -> i64 {
        self.book_id
    }
}

// Cart keeps items in the order they were first added
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    // adding a book that is already in the cart bumps its quantity by one
    pub fn add(&mut self, item: CartItem) {
        match self.items.iter_mut().find(|c| c.book_id == item.book_id) {
            Some(existing) => existing.quantity += 1,
            None => self.items.push(CartItem { quantity: 1, ..item }),
        }
    }

    // takes one copy of the book out, the line goes away when nothing is left
    pub fn remove(&mut self, book_id: i64) {
        for item in self.items.iter_mut().filter(|c| c.book_id == book_id) {
            item.quantity = item.quantity.saturating_sub(1);
        }
        self.items.retain(|c| c.quantity > 0);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        self.items.as_slice()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|c| c.quantity).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }
}
