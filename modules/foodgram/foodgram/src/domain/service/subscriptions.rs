use foodgram_auth::SecurityContext;
use foodgram_sdk::User;
use tracing::{debug, info, instrument};

use super::UsersService;
use crate::domain::access::Action;
use crate::domain::error::DomainError;
use crate::domain::repos::{RecipesRepository, RelationsRepository, UsersRepository, Window};
use crate::domain::views::{AuthorFeed, Paged};

const MSG_SELF_SUBSCRIPTION: &str = "You cannot subscribe to yourself";
const MSG_ALREADY_SUBSCRIBED: &str = "Already subscribed";
const MSG_NOT_SUBSCRIBED: &str = "You were not subscribed";

impl<U, R, L> UsersService<U, R, L>
where
    U: UsersRepository + 'static,
    R: RecipesRepository + 'static,
    L: RelationsRepository + 'static,
{
    async fn feeds(
        &self,
        authors: Vec<User>,
        recipes_limit: Option<u64>,
    ) -> Result<Vec<AuthorFeed>, DomainError> {
        let conn = self.db.conn();
        let ids: Vec<i64> = authors.iter().map(|a| a.id).collect();
        let counts = self.recipes.count_by_authors(conn, &ids).await?;

        let mut feeds = Vec::with_capacity(authors.len());
        for author in authors {
            let recipes = self
                .recipes
                .short_by_author(conn, author.id, recipes_limit)
                .await?;
            feeds.push(AuthorFeed {
                recipes_count: counts.get(&author.id).copied().unwrap_or(0),
                recipes,
                author,
            });
        }
        Ok(feeds)
    }

    /// Follow `author_id` and return the author's feed.
    #[instrument(skip(self, ctx), fields(author_id = %author_id))]
    pub async fn subscribe(
        &self,
        ctx: &SecurityContext,
        author_id: i64,
        recipes_limit: Option<u64>,
    ) -> Result<AuthorFeed, DomainError> {
        let user_id = super::resolve_caller(
            self.users.as_ref(),
            self.db.conn(),
            ctx,
            Action::ToggleSubscription,
        )
        .await?;
        let author = self.load_user(author_id).await?;
        if user_id == author_id {
            return Err(DomainError::conflict(MSG_SELF_SUBSCRIPTION));
        }

        if !self
            .relations
            .subscribe(self.db.conn(), user_id, author_id)
            .await?
        {
            return Err(DomainError::conflict(MSG_ALREADY_SUBSCRIBED));
        }
        info!(user_id, "Subscribed");

        let mut feeds = self.feeds(vec![author], recipes_limit).await?;
        feeds
            .pop()
            .ok_or_else(|| DomainError::not_found("User", author_id))
    }

    #[instrument(skip(self, ctx), fields(author_id = %author_id))]
    pub async fn unsubscribe(
        &self,
        ctx: &SecurityContext,
        author_id: i64,
    ) -> Result<(), DomainError> {
        let user_id = super::resolve_caller(
            self.users.as_ref(),
            self.db.conn(),
            ctx,
            Action::ToggleSubscription,
        )
        .await?;
        self.load_user(author_id).await?;
        if user_id == author_id {
            return Err(DomainError::conflict(MSG_SELF_SUBSCRIPTION));
        }

        if !self
            .relations
            .unsubscribe(self.db.conn(), user_id, author_id)
            .await?
        {
            return Err(DomainError::conflict(MSG_NOT_SUBSCRIBED));
        }
        info!(user_id, "Unsubscribed");
        Ok(())
    }

    /// Followed authors in subscription order, each with a recipe preview.
    #[instrument(skip(self, ctx))]
    pub async fn subscriptions(
        &self,
        ctx: &SecurityContext,
        window: Window,
        recipes_limit: Option<u64>,
    ) -> Result<Paged<AuthorFeed>, DomainError> {
        let user_id = super::resolve_caller(
            self.users.as_ref(),
            self.db.conn(),
            ctx,
            Action::ListSubscriptions,
        )
        .await?;
        debug!("Listing subscriptions");

        let page = self
            .relations
            .authors_page(self.db.conn(), user_id, window)
            .await?;
        let items = self.feeds(page.items, recipes_limit).await?;
        Ok(Paged {
            items,
            total: page.total,
        })
    }
}
