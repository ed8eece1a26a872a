//! Catalog context assembly for the chat handler.
//!
//! Intent detection is a keyword heuristic, kept as pure functions so it can
//! be tested without a database.

use std::fmt::Write;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{Order, Product};

const CATALOG_KEYWORDS: &[&str] = &[
    "product", "order", "buy", "purchase", "price", "stock", "customer",
];
const PRODUCT_KEYWORDS: &[&str] = &["product", "item", "buy", "price"];

const PRODUCT_LIMIT: i64 = 5;
const ORDER_LIMIT: i64 = 3;

/// Whether the message touches the catalog at all.
pub fn is_catalog_query(message: &str) -> bool {
    let lower = message.to_lowercase();
    CATALOG_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn wants_products(message: &str) -> bool {
    let lower = message.to_lowercase();
    PRODUCT_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn wants_orders(message: &str) -> bool {
    message.to_lowercase().contains("order")
}

/// Assemble a possibly-empty context string from the catalog tables.
///
/// Rows are ordered by id so the snippet is deterministic for a given
/// catalog state.
pub async fn build_context(pool: &DbPool, message: &str) -> AppResult<String> {
    if !is_catalog_query(message) {
        return Ok(String::new());
    }

    let mut sections: Vec<String> = Vec::new();

    if wants_products(message) {
        let products =
            sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY id LIMIT $1")
                .bind(PRODUCT_LIMIT)
                .fetch_all(pool)
                .await?;
        if !products.is_empty() {
            sections.push(format_products(&products));
        }
    }

    if wants_orders(message) {
        let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY id LIMIT $1")
            .bind(ORDER_LIMIT)
            .fetch_all(pool)
            .await?;
        if !orders.is_empty() {
            sections.push(format_orders(&orders));
        }
    }

    Ok(sections.join("\n\n"))
}

fn format_products(products: &[Product]) -> String {
    let mut out = String::from("Available products:");
    for product in products {
        let _ = write!(
            out,
            "\n- {}: ${} ({} in stock)",
            product.name, product.price, product.stock_quantity
        );
    }
    out
}

fn format_orders(orders: &[Order]) -> String {
    let mut out = String::from("Recent orders:");
    for order in orders {
        let _ = write!(
            out,
            "\n- Order #{}: {} items, ${}",
            order.id, order.quantity, order.total_amount
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(name: &str, price: Decimal, stock: i32) -> Product {
        Product {
            id: 1,
            name: name.to_string(),
            description: None,
            price,
            category: None,
            stock_quantity: stock,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn price_question_is_catalog_relevant() {
        assert!(is_catalog_query("What is the price of a Laptop?"));
        assert!(wants_products("What is the price of a Laptop?"));
        assert!(!wants_orders("What is the price of a Laptop?"));
    }

    #[test]
    fn greeting_is_not_catalog_relevant() {
        assert!(!is_catalog_query("hello there"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(is_catalog_query("Do you have this PRODUCT?"));
        assert!(wants_orders("Where is my ORDER?"));
    }

    #[test]
    fn order_keyword_selects_only_order_section() {
        let msg = "show me my recent orders";
        assert!(is_catalog_query(msg));
        assert!(wants_orders(msg));
        assert!(!wants_products(msg));
    }

    #[test]
    fn products_are_formatted_with_price_and_stock() {
        let products = vec![product("Laptop", Decimal::new(99999, 2), 50)];
        let section = format_products(&products);
        assert_eq!(section, "Available products:\n- Laptop: $999.99 (50 in stock)");
    }

    #[test]
    fn orders_are_formatted_with_quantity_and_total() {
        let orders = vec![Order {
            id: 7,
            customer_id: Some(1),
            product_id: Some(1),
            quantity: 2,
            total_amount: Decimal::new(199998, 2),
            order_date: Utc::now(),
            status: "pending".to_string(),
        }];
        let section = format_orders(&orders);
        assert_eq!(section, "Recent orders:\n- Order #7: 2 items, $1999.98");
    }
}
