pub mod store;

#[cfg(test)]
pub mod memory;

pub use store::Store;

use crate::config::AppConfig;
use crate::models::{Image, Otp, Role, UpdateProfileRequest, User};
use crate::utils::AppError;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;
use std::time::Duration;

const USERS: &str = "users";
const OTPS: &str = "otps";
const IMAGES: &str = "images";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(config: &AppConfig) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(&config.database_url).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));
        client_options.app_name = Some("astro-consult-service".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database_name);

        // Test connection
        db.run_command(doc! { "ping": 1 }).await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the queries rely on
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(USERS);

        // users(email) unique - one account per email
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // users(role, astrologerRating) - featured listing
        let rating_index = IndexModel::builder()
            .keys(doc! { "role": 1, "astrologerRating": -1 })
            .build();

        match users.create_index(rating_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(role, astrologerRating)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // users(role, astrologerPrice.chatFees) - fee listing
        let fee_index = IndexModel::builder()
            .keys(doc! { "role": 1, "astrologerPrice.chatFees": 1 })
            .build();

        match users.create_index(fee_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(role, astrologerPrice.chatFees)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let otps = self.collection::<Document>(OTPS);

        let otp_email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match otps.create_index(otp_email_index).await {
            Ok(_) => log::info!("   ✅ Index created: otps(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // TTL: the server drops codes once expiresAt has passed
        let otp_ttl_index = IndexModel::builder()
            .keys(doc! { "expiresAt": 1 })
            .options(IndexOptions::builder().expire_after(Duration::from_secs(0)).build())
            .build();

        match otps.create_index(otp_ttl_index).await {
            Ok(_) => log::info!("   ✅ Index created: otps(expiresAt) TTL"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    fn users(&self) -> Collection<User> {
        self.collection(USERS)
    }
}

fn astrologer_filter() -> Document {
    doc! { "role": Role::Astrologer.as_str() }
}

/// Astrologers whose rating, experience and both fees are non-negative
fn featured_filter() -> Document {
    doc! {
        "role": Role::Astrologer.as_str(),
        "astrologerRating": { "$gte": 0 },
        "astrologerExperience": { "$gte": 0 },
        "astrologerPrice.chatFees": { "$gte": 0 },
        "astrologerPrice.videoCallFees": { "$gte": 0 },
    }
}

fn chat_fee_sort() -> Document {
    doc! { "astrologerPrice.chatFees": 1 }
}

fn rating_sort() -> Document {
    doc! { "astrologerRating": -1 }
}

/// `$set` body holding only the fields present in `request`
fn profile_update(request: &UpdateProfileRequest) -> Result<Document, AppError> {
    let mut set = Document::new();

    if let Some(name) = &request.name {
        set.insert("name", name.trim());
    }
    if let Some(avatar) = &request.avatar {
        let avatar = mongodb::bson::to_bson(avatar)
            .map_err(|e| AppError::Internal(format!("Failed to encode avatar: {}", e)))?;
        set.insert("avatar", avatar);
    }
    if let Some(skills) = &request.astrologer_skills {
        set.insert("astrologerSkills", skills.clone());
    }
    if let Some(experience) = request.astrologer_experience {
        set.insert("astrologerExperience", experience);
    }
    if let Some(available) = request.is_available {
        set.insert("isAvailable", available);
    }
    if let Some(price) = request.astrologer_price {
        set.insert("astrologerPrice.chatFees", price.chat_fees);
        set.insert("astrologerPrice.videoCallFees", price.video_call_fees);
    }

    Ok(doc! { "$set": set })
}

fn inserted_object_id(result: mongodb::results::InsertOneResult) -> Result<ObjectId, AppError> {
    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::DatabaseError("Inserted id is not an ObjectId".to_string()))
}

#[async_trait]
impl Store for MongoDB {
    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn upsert_otp(&self, otp: Otp) -> Result<(), AppError> {
        self.collection::<Otp>(OTPS)
            .replace_one(doc! { "email": &otp.email }, &otp)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn find_otp(&self, email: &str) -> Result<Option<Otp>, AppError> {
        Ok(self.collection::<Otp>(OTPS).find_one(doc! { "email": email }).await?)
    }

    async fn delete_otp(&self, email: &str) -> Result<(), AppError> {
        self.collection::<Otp>(OTPS).delete_one(doc! { "email": email }).await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn insert_user(&self, user: User) -> Result<ObjectId, AppError> {
        let result = self.users().insert_one(&user).await?;
        inserted_object_id(result)
    }

    async fn update_astrologer(
        &self,
        id: ObjectId,
        request: &UpdateProfileRequest,
    ) -> Result<bool, AppError> {
        let mut filter = astrologer_filter();
        filter.insert("_id", id);

        let result = self
            .users()
            .update_one(filter, profile_update(request)?)
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn find_astrologer(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        let mut filter = astrologer_filter();
        filter.insert("_id", id);

        Ok(self.users().find_one(filter).await?)
    }

    async fn find_astrologers_by_chat_fee(&self, limit: i64) -> Result<Vec<User>, AppError> {
        let cursor = self
            .users()
            .find(astrologer_filter())
            .sort(chat_fee_sort())
            .limit(limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_featured_astrologers(&self, limit: i64) -> Result<Vec<User>, AppError> {
        let cursor = self
            .users()
            .find(featured_filter())
            .sort(rating_sort())
            .limit(limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_astrologers(&self) -> Result<Vec<User>, AppError> {
        let cursor = self.users().find(astrologer_filter()).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_image(&self, image: Image) -> Result<ObjectId, AppError> {
        let result = self.collection::<Image>(IMAGES).insert_one(&image).await?;
        inserted_object_id(result)
    }

    async fn find_images(&self) -> Result<Vec<Image>, AppError> {
        let cursor = self.collection::<Image>(IMAGES).find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_astrologer_filter() {
        assert_eq!(astrologer_filter(), doc! { "role": "astrologer" });
    }

    #[test]
    fn test_featured_filter() {
        let filter = featured_filter();

        assert_eq!(filter.get_str("role").unwrap(), "astrologer");
        for field in [
            "astrologerRating",
            "astrologerExperience",
            "astrologerPrice.chatFees",
            "astrologerPrice.videoCallFees",
        ] {
            assert_eq!(filter.get_document(field).unwrap(), &doc! { "$gte": 0 }, "{}", field);
        }
        assert_eq!(filter.len(), 5);
    }

    #[test]
    fn test_listing_sorts() {
        assert_eq!(chat_fee_sort(), doc! { "astrologerPrice.chatFees": 1 });
        assert_eq!(rating_sort(), doc! { "astrologerRating": -1 });
    }

    #[test]
    fn test_profile_update_sets_only_present_fields() {
        let request = UpdateProfileRequest {
            is_available: Some(true),
            ..Default::default()
        };
        assert_eq!(
            profile_update(&request).unwrap(),
            doc! { "$set": { "isAvailable": true } }
        );

        let request = UpdateProfileRequest {
            name: Some("  Lyra ".into()),
            astrologer_skills: Some(vec!["tarot".into()]),
            astrologer_price: Some(crate::models::AstrologerPrice {
                chat_fees: 12.0,
                video_call_fees: 30.0,
            }),
            ..Default::default()
        };
        let update = profile_update(&request).unwrap();
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_str("name").unwrap(), "Lyra");
        assert_eq!(set.get_f64("astrologerPrice.chatFees").unwrap(), 12.0);
        assert_eq!(set.get_f64("astrologerPrice.videoCallFees").unwrap(), 30.0);
        assert!(set.get("astrologerRating").is_none());
        assert!(set.get("isAvailable").is_none());
        assert_eq!(set.len(), 4);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let config = AppConfig::from_env().unwrap();

        let db = MongoDB::new(&config).await;
        assert!(db.is_ok());
        assert!(db.unwrap().ping().await.is_ok());
    }
}
