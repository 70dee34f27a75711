//! Demo data seeder, gated behind `SEED_DEMO_DATA=true`
//!
//! Seeds an admin, a customer, a driver and two stores with a small
//! shared catalog. Runs only against an empty user table, so restarting
//! the server never duplicates data.

use crate::auth::password;
use crate::db::models::{
    Address, CustomerCreate, DriverCreate, StoreAddress, StoreCreate,
};
use crate::db::models::product::ProductCreate;
use crate::db::repository::offering::OfferingSnapshot;
use crate::db::repository::{
    CustomerRepository, DriverRepository, OfferingRepository, ProductRepository, StoreRepository,
    UserRepository,
};
use shared::{AppError, AppResult, Role};
use std::collections::HashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub async fn seed_demo_data(db: &Surreal<Db>) -> AppResult<()> {
    let users = UserRepository::new(db.clone());
    if !users.find_all().await.map_err(AppError::from)?.is_empty() {
        tracing::info!("Demo seed skipped, database is not empty");
        return Ok(());
    }

    tracing::info!("Seeding demo data");

    let admin = users
        .create(
            "admin@market.local".to_string(),
            password::hash_password("admin1234")?,
            Role::Admin,
        )
        .await?;
    tracing::debug!(email = %admin.email, "Seeded admin user");

    // Customer with a default address
    let customers = CustomerRepository::new(db.clone());
    let customer_user = users
        .create(
            "thandi@market.local".to_string(),
            password::hash_password("customer1234")?,
            Role::Customer,
        )
        .await?;
    let customer_user_id = customer_user
        .id
        .ok_or_else(|| AppError::database("Seeded user has no id"))?;
    let customer = customers
        .create(
            customer_user_id.clone(),
            CustomerCreate {
                first_name: "Thandi".to_string(),
                last_name: "Nkosi".to_string(),
                phone_number: Some("+27 82 555 0101".to_string()),
                addresses: vec![Address {
                    street: "12 Vilakazi St".to_string(),
                    city: "Soweto".to_string(),
                    state_province: Some("Gauteng".to_string()),
                    postal_code: "1804".to_string(),
                    country: "South Africa".to_string(),
                    is_default: true,
                }],
            },
        )
        .await?;
    if let Some(profile) = customer.id {
        users.link_profile(&customer_user_id, profile).await?;
    }

    // Driver
    let drivers = DriverRepository::new(db.clone());
    let driver_user = users
        .create(
            "sipho@market.local".to_string(),
            password::hash_password("driver1234")?,
            Role::Driver,
        )
        .await?;
    let driver_user_id = driver_user
        .id
        .ok_or_else(|| AppError::database("Seeded user has no id"))?;
    let driver = drivers
        .create(
            driver_user_id.clone(),
            DriverCreate {
                first_name: "Sipho".to_string(),
                last_name: "Dlamini".to_string(),
                phone_number: "+27 82 555 0202".to_string(),
                license_number: "GP-443-221".to_string(),
                vehicle_details: Some("Honda Ace 125".to_string()),
            },
        )
        .await?;
    if let Some(profile) = driver.id {
        users.link_profile(&driver_user_id, profile).await?;
    }

    // Stores, one feed-connected and one manual
    let stores = StoreRepository::new(db.clone());
    let shoprite = stores
        .create(StoreCreate {
            name: "Shoprite Maponya Mall".to_string(),
            address: StoreAddress {
                street: "Chris Hani Rd".to_string(),
                city: "Soweto".to_string(),
                postal_code: "1818".to_string(),
                coordinates: None,
            },
            contact_email: Some("maponya@shoprite.example".to_string()),
            contact_phone: Some("+27 11 555 0303".to_string()),
            operating_hours: Some("Mon-Sun 08:00-19:00".to_string()),
            feed_format: Some("shoprite".to_string()),
            api_base_url: Some("https://feeds.shoprite.example".to_string()),
            api_key: Some("demo-key".to_string()),
            api_credentials: HashMap::new(),
        })
        .await?;
    let boxer = stores
        .create(StoreCreate {
            name: "Boxer Protea Glen".to_string(),
            address: StoreAddress {
                street: "Wild Chestnut St".to_string(),
                city: "Soweto".to_string(),
                postal_code: "1819".to_string(),
                coordinates: None,
            },
            contact_email: None,
            contact_phone: None,
            operating_hours: Some("Mon-Sun 07:00-20:00".to_string()),
            feed_format: None,
            api_base_url: None,
            api_key: None,
            api_credentials: HashMap::new(),
        })
        .await?;

    // Shared catalog so the aggregated view has something to group
    let products = ProductRepository::new(db.clone());
    let offerings = OfferingRepository::new(db.clone());
    let maize = products
        .create(ProductCreate {
            name: "White Star Super Maize Meal 5kg".to_string(),
            description: None,
            unit: Some("5kg".to_string()),
            category: Some("Staples".to_string()),
            image_url: None,
            brand: Some("White Star".to_string()),
        })
        .await?;
    let milk = products
        .create(ProductCreate {
            name: "Full Cream Milk 1L".to_string(),
            description: None,
            unit: Some("1L".to_string()),
            category: Some("Dairy".to_string()),
            image_url: None,
            brand: Some("Clover".to_string()),
        })
        .await?;

    let maize_id = maize
        .id
        .ok_or_else(|| AppError::database("Seeded product has no id"))?;
    let milk_id = milk
        .id
        .ok_or_else(|| AppError::database("Seeded product has no id"))?;
    let shoprite_id = shoprite
        .id
        .ok_or_else(|| AppError::database("Seeded store has no id"))?;
    let boxer_id = boxer
        .id
        .ok_or_else(|| AppError::database("Seeded store has no id"))?;

    offerings
        .create(
            shoprite_id.clone(),
            maize_id.clone(),
            OfferingSnapshot {
                price: 89.99,
                is_available: true,
                external_id: Some("SR-10021".to_string()),
                external_url: None,
            },
        )
        .await?;
    offerings
        .create(
            boxer_id.clone(),
            maize_id,
            OfferingSnapshot {
                price: 84.99,
                is_available: true,
                external_id: None,
                external_url: None,
            },
        )
        .await?;
    offerings
        .create(
            shoprite_id,
            milk_id.clone(),
            OfferingSnapshot {
                price: 21.5,
                is_available: true,
                external_id: Some("SR-10340".to_string()),
                external_url: None,
            },
        )
        .await?;
    offerings
        .create(
            boxer_id,
            milk_id,
            OfferingSnapshot {
                price: 22.99,
                is_available: false,
                external_id: None,
                external_url: None,
            },
        )
        .await?;

    tracing::info!("Demo seed complete");
    Ok(())
}
