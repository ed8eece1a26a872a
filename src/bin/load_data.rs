use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use axum_commerce_chat::{config::AppConfig, db::create_pool};

#[derive(Debug, Deserialize)]
struct ProductRecord {
    name: String,
    description: Option<String>,
    price: Decimal,
    category: Option<String>,
    stock_quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct CustomerRecord {
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderRecord {
    customer_id: i64,
    product_id: i64,
    quantity: i32,
    total_amount: Decimal,
    status: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure the schema exists before loading.
    sqlx::migrate!("./migrations").run(&pool).await?;

    load_products(&pool, "data/products.csv").await?;
    load_customers(&pool, "data/customers.csv").await?;
    load_orders(&pool, "data/orders.csv").await?;

    println!("Data loaded successfully!");
    Ok(())
}

async fn load_products(pool: &sqlx::PgPool, csv_path: &str) -> anyhow::Result<()> {
    if Path::new(csv_path).exists() {
        let mut reader = csv::Reader::from_path(csv_path)?;
        let mut count = 0usize;
        for record in reader.deserialize::<ProductRecord>() {
            let record = record?;
            insert_product(pool, &record).await?;
            count += 1;
        }
        println!("Loaded {count} products from {csv_path}");
    } else {
        let samples = [
            ProductRecord {
                name: "Laptop".into(),
                description: Some("High-performance laptop".into()),
                price: "999.99".parse()?,
                category: Some("Electronics".into()),
                stock_quantity: Some(50),
            },
            ProductRecord {
                name: "Smartphone".into(),
                description: Some("Latest smartphone".into()),
                price: "699.99".parse()?,
                category: Some("Electronics".into()),
                stock_quantity: Some(100),
            },
            ProductRecord {
                name: "Coffee Mug".into(),
                description: Some("Ceramic coffee mug".into()),
                price: "12.99".parse()?,
                category: Some("Home".into()),
                stock_quantity: Some(200),
            },
        ];
        for record in &samples {
            insert_product(pool, record).await?;
        }
        println!("No {csv_path}; seeded {} sample products", samples.len());
    }
    Ok(())
}

async fn insert_product(pool: &sqlx::PgPool, record: &ProductRecord) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO products (name, description, price, category, stock_quantity)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&record.name)
    .bind(&record.description)
    .bind(record.price)
    .bind(&record.category)
    .bind(record.stock_quantity.unwrap_or(0))
    .execute(pool)
    .await?;
    Ok(())
}

async fn load_customers(pool: &sqlx::PgPool, csv_path: &str) -> anyhow::Result<()> {
    if Path::new(csv_path).exists() {
        let mut reader = csv::Reader::from_path(csv_path)?;
        let mut count = 0usize;
        for record in reader.deserialize::<CustomerRecord>() {
            let record = record?;
            insert_customer(pool, &record).await?;
            count += 1;
        }
        println!("Loaded {count} customers from {csv_path}");
    } else {
        let samples = [
            CustomerRecord {
                name: "John Doe".into(),
                email: "john@example.com".into(),
                phone: Some("123-456-7890".into()),
                address: Some("123 Main St".into()),
            },
            CustomerRecord {
                name: "Jane Smith".into(),
                email: "jane@example.com".into(),
                phone: Some("098-765-4321".into()),
                address: Some("456 Oak Ave".into()),
            },
        ];
        for record in &samples {
            insert_customer(pool, record).await?;
        }
        println!("No {csv_path}; seeded {} sample customers", samples.len());
    }
    Ok(())
}

async fn insert_customer(pool: &sqlx::PgPool, record: &CustomerRecord) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO customers (name, email, phone, address)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(&record.name)
    .bind(&record.email)
    .bind(&record.phone)
    .bind(&record.address)
    .execute(pool)
    .await?;
    Ok(())
}

async fn load_orders(pool: &sqlx::PgPool, csv_path: &str) -> anyhow::Result<()> {
    if Path::new(csv_path).exists() {
        let mut reader = csv::Reader::from_path(csv_path)?;
        let mut count = 0usize;
        for record in reader.deserialize::<OrderRecord>() {
            let record = record?;
            sqlx::query(
                r#"
                INSERT INTO orders (customer_id, product_id, quantity, total_amount, status)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(record.customer_id)
            .bind(record.product_id)
            .bind(record.quantity)
            .bind(record.total_amount)
            .bind(record.status.as_deref().unwrap_or("pending"))
            .execute(pool)
            .await?;
            count += 1;
        }
        println!("Loaded {count} orders from {csv_path}");
    } else {
        // Sample order tying the first customer to the first product, so the
        // "Recent orders" context section has something to show.
        let ids: Option<(i64, i64, Decimal)> = sqlx::query_as(
            r#"
            SELECT c.id, p.id, p.price
            FROM customers c, products p
            ORDER BY c.id, p.id
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await?;

        match ids {
            Some((customer_id, product_id, price)) => {
                let quantity = 2;
                sqlx::query(
                    r#"
                    INSERT INTO orders (customer_id, product_id, quantity, total_amount, status)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(customer_id)
                .bind(product_id)
                .bind(quantity)
                .bind(price * Decimal::from(quantity))
                .bind("pending")
                .execute(pool)
                .await?;
                println!("No {csv_path}; seeded 1 sample order");
            }
            None => println!("No {csv_path} and no catalog rows; skipped orders"),
        }
    }
    Ok(())
}
