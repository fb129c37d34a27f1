use crate::database::Store;
use crate::models::{Image, Otp, UpdateProfileRequest, User};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    users: Vec<User>,
    otps: HashMap<String, Otp>,
    images: Vec<Image>,
}

/// [`Store`] kept in process memory, used to drive the handlers in tests
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    fn astrologers(users: &[User]) -> impl Iterator<Item = &User> {
        users.iter().filter(|u| u.is_astrologer())
    }
}

/// Mirrors the `$gte: 0` filter of the featured query
fn is_featurable(user: &User) -> bool {
    user.is_astrologer()
        && user.astrologer_rating >= 0.0
        && user.astrologer_experience >= 0.0
        && user.astrologer_price.is_non_negative()
}

/// Field-wise equivalent of the `$set` issued by the MongoDB store
fn apply_profile_update(request: &UpdateProfileRequest, user: &mut User) {
    if let Some(name) = &request.name {
        user.name = name.trim().to_string();
    }
    if let Some(avatar) = &request.avatar {
        user.avatar = Some(avatar.clone());
    }
    if let Some(skills) = &request.astrologer_skills {
        user.astrologer_skills = skills.clone();
    }
    if let Some(experience) = request.astrologer_experience {
        user.astrologer_experience = experience;
    }
    if let Some(available) = request.is_available {
        user.is_available = available;
    }
    if let Some(price) = request.astrologer_price {
        user.astrologer_price = price;
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn upsert_otp(&self, otp: Otp) -> Result<(), AppError> {
        self.state.write().await.otps.insert(otp.email.clone(), otp);
        Ok(())
    }

    async fn find_otp(&self, email: &str) -> Result<Option<Otp>, AppError> {
        Ok(self.state.read().await.otps.get(email).cloned())
    }

    async fn delete_otp(&self, email: &str) -> Result<(), AppError> {
        self.state.write().await.otps.remove(email);
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, mut user: User) -> Result<ObjectId, AppError> {
        let mut state = self.state.write().await;

        if state.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DatabaseError(format!(
                "E11000 duplicate key error: email {}",
                user.email
            )));
        }

        let id = ObjectId::new();
        user.id = Some(id);
        state.users.push(user);
        Ok(id)
    }

    async fn update_astrologer(
        &self,
        id: ObjectId,
        request: &UpdateProfileRequest,
    ) -> Result<bool, AppError> {
        let mut state = self.state.write().await;

        match state
            .users
            .iter_mut()
            .find(|u| u.is_astrologer() && u.id == Some(id))
        {
            Some(user) => {
                apply_profile_update(request, user);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_astrologer(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        let found = Self::astrologers(&state.users).find(|u| u.id == Some(id)).cloned();
        Ok(found)
    }

    async fn find_astrologers_by_chat_fee(&self, limit: i64) -> Result<Vec<User>, AppError> {
        let state = self.state.read().await;

        let mut astrologers: Vec<User> = Self::astrologers(&state.users).cloned().collect();
        astrologers.sort_by(|a, b| {
            a.astrologer_price
                .chat_fees
                .total_cmp(&b.astrologer_price.chat_fees)
        });
        astrologers.truncate(limit.max(0) as usize);

        Ok(astrologers)
    }

    async fn find_featured_astrologers(&self, limit: i64) -> Result<Vec<User>, AppError> {
        let state = self.state.read().await;

        let mut astrologers: Vec<User> = state
            .users
            .iter()
            .filter(|u| is_featurable(u))
            .cloned()
            .collect();
        astrologers.sort_by(|a, b| b.astrologer_rating.total_cmp(&a.astrologer_rating));
        astrologers.truncate(limit.max(0) as usize);

        Ok(astrologers)
    }

    async fn find_astrologers(&self) -> Result<Vec<User>, AppError> {
        let state = self.state.read().await;
        Ok(Self::astrologers(&state.users).cloned().collect())
    }

    async fn insert_image(&self, mut image: Image) -> Result<ObjectId, AppError> {
        let id = ObjectId::new();
        image.id = Some(id);
        self.state.write().await.images.push(image);
        Ok(id)
    }

    async fn find_images(&self) -> Result<Vec<Image>, AppError> {
        Ok(self.state.read().await.images.clone())
    }
}
