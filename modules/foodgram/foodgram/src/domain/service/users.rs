use std::sync::Arc;

use foodgram_auth::SecurityContext;
use foodgram_db::DBProvider;
use foodgram_sdk::{NewUser, PasswordChange, User};
use tracing::{debug, info, instrument};

use crate::domain::access::{self, Action};
use crate::domain::error::DomainError;
use crate::domain::password::{hash_password, verify_password};
use crate::domain::repos::{
    NewUserRecord, RecipesRepository, RelationsRepository, UsersRepository, Window,
};
use crate::domain::validation::{self, Errors};
use crate::domain::views::{Paged, UserView};

const MSG_EMAIL_TAKEN: &str = "A user with that email already exists.";
const MSG_USERNAME_TAKEN: &str = "A user with that username already exists.";
const MSG_WRONG_PASSWORD: &str = "Invalid password.";

pub struct UsersService<U, R, L>
where
    U: UsersRepository + 'static,
    R: RecipesRepository + 'static,
    L: RelationsRepository + 'static,
{
    pub(super) db: DBProvider<DomainError>,
    pub(super) users: Arc<U>,
    pub(super) recipes: Arc<R>,
    pub(super) relations: Arc<L>,
}

impl<U, R, L> UsersService<U, R, L>
where
    U: UsersRepository + 'static,
    R: RecipesRepository + 'static,
    L: RelationsRepository + 'static,
{
    pub fn new(
        db: DBProvider<DomainError>,
        users: Arc<U>,
        recipes: Arc<R>,
        relations: Arc<L>,
    ) -> Self {
        Self {
            db,
            users,
            recipes,
            relations,
        }
    }

    pub(super) async fn load_user(&self, id: i64) -> Result<User, DomainError> {
        self.users
            .get(self.db.conn(), id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Access part of a logged-in action, for callers that must report it
    /// ahead of payload errors.
    ///
    /// # Errors
    /// [`DomainError::Unauthenticated`] for anonymous callers and unknown users.
    pub async fn check_caller(
        &self,
        ctx: &SecurityContext,
        action: Action,
    ) -> Result<(), DomainError> {
        super::resolve_caller(self.users.as_ref(), self.db.conn(), ctx, action).await?;
        Ok(())
    }

    #[instrument(skip(self, ctx, new_user), fields(username = %new_user.username))]
    pub async fn register(
        &self,
        ctx: &SecurityContext,
        new_user: NewUser,
    ) -> Result<UserView, DomainError> {
        info!("Registering user");
        access::authenticate(ctx, Action::RegisterUser)?;
        validation::validate_new_user(&new_user)?;

        let conn = self.db.conn();
        let mut errors = Errors::default();
        if self.users.email_taken(conn, &new_user.email).await? {
            errors.add("email", MSG_EMAIL_TAKEN);
        }
        if self.users.username_taken(conn, &new_user.username).await? {
            errors.add("username", MSG_USERNAME_TAKEN);
        }
        errors.finish()?;

        let NewUser {
            email,
            username,
            first_name,
            last_name,
            password,
        } = new_user;

        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| DomainError::database(e.to_string()))??;

        let record = NewUserRecord {
            email,
            username,
            first_name,
            last_name,
            password_hash,
        };
        let Some(user) = self.users.create(conn, record).await? else {
            // Lost a race with a concurrent registration.
            return Err(DomainError::validation("username", MSG_USERNAME_TAKEN));
        };

        info!("Successfully registered user with id={}", user.id);
        Ok(UserView {
            user,
            is_subscribed: false,
        })
    }

    #[instrument(skip(self, ctx))]
    pub async fn list_users(
        &self,
        ctx: &SecurityContext,
        window: Window,
    ) -> Result<Paged<UserView>, DomainError> {
        debug!("Listing users");
        access::authenticate(ctx, Action::ListUsers)?;

        let conn = self.db.conn();
        let page = self.users.list_page(conn, window).await?;
        let ids: Vec<i64> = page.items.iter().map(|u| u.id).collect();
        let followed = super::subscribed_set(self.relations.as_ref(), conn, ctx, &ids).await?;

        Ok(page.map(|user| UserView {
            is_subscribed: followed.contains(&user.id),
            user,
        }))
    }

    #[instrument(skip(self, ctx), fields(user_id = %id))]
    pub async fn get_user(&self, ctx: &SecurityContext, id: i64) -> Result<UserView, DomainError> {
        debug!("Getting user by id");
        access::authenticate(ctx, Action::RetrieveUser)?;

        let user = self.load_user(id).await?;
        let followed =
            super::subscribed_set(self.relations.as_ref(), self.db.conn(), ctx, &[id]).await?;
        Ok(UserView {
            is_subscribed: followed.contains(&id),
            user,
        })
    }

    #[instrument(skip(self, ctx))]
    pub async fn me(&self, ctx: &SecurityContext) -> Result<UserView, DomainError> {
        let user_id = access::require_user(ctx, Action::Me)?;
        let user = self
            .users
            .get(self.db.conn(), user_id)
            .await?
            .ok_or(DomainError::Unauthenticated)?;
        Ok(UserView {
            user,
            is_subscribed: false,
        })
    }

    /// Store a new avatar and return it.
    #[instrument(skip(self, ctx, avatar))]
    pub async fn set_avatar(
        &self,
        ctx: &SecurityContext,
        avatar: Option<String>,
    ) -> Result<String, DomainError> {
        let user_id =
            super::resolve_caller(self.users.as_ref(), self.db.conn(), ctx, Action::ManageAvatar)
                .await?;

        let mut errors = Errors::default();
        match avatar.as_deref() {
            None => errors.add("avatar", validation::MSG_REQUIRED),
            Some(value) => validation::check_image(&mut errors, "avatar", value),
        }
        errors.finish()?;
        let avatar = avatar.unwrap_or_default();

        self.users
            .set_avatar(self.db.conn(), user_id, Some(avatar.clone()))
            .await?;

        info!(user_id, "Avatar updated");
        Ok(avatar)
    }

    #[instrument(skip(self, ctx))]
    pub async fn delete_avatar(&self, ctx: &SecurityContext) -> Result<(), DomainError> {
        let user_id =
            super::resolve_caller(self.users.as_ref(), self.db.conn(), ctx, Action::ManageAvatar)
                .await?;
        self.users.set_avatar(self.db.conn(), user_id, None).await?;
        info!(user_id, "Avatar removed");
        Ok(())
    }

    #[instrument(skip(self, ctx, change))]
    pub async fn set_password(
        &self,
        ctx: &SecurityContext,
        change: PasswordChange,
    ) -> Result<(), DomainError> {
        let user_id =
            super::resolve_caller(self.users.as_ref(), self.db.conn(), ctx, Action::SetPassword)
                .await?;
        validation::validate_new_password(&change.new_password)?;

        let conn = self.db.conn();
        let stored = self
            .users
            .password_hash(conn, user_id)
            .await?
            .ok_or(DomainError::Unauthenticated)?;

        let PasswordChange {
            current_password,
            new_password,
        } = change;
        let new_hash = tokio::task::spawn_blocking(move || {
            if !verify_password(&current_password, &stored) {
                return Err(DomainError::validation(
                    "current_password",
                    MSG_WRONG_PASSWORD,
                ));
            }
            hash_password(&new_password)
        })
        .await
        .map_err(|e| DomainError::database(e.to_string()))??;

        self.users.set_password_hash(conn, user_id, new_hash).await?;
        info!(user_id, "Password changed");
        Ok(())
    }
}
