//! Access table: which caller role may perform which action.
//!
//! Consulted once per operation by the domain services. Object-level checks
//! (author-only mutations) run after the target has been loaded, so the error
//! order is unauthenticated, then not found, then forbidden.

use foodgram_auth::SecurityContext;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListRecipes,
    RetrieveRecipe,
    GetRecipeLink,
    CreateRecipe,
    UpdateRecipe,
    DeleteRecipe,
    ToggleFavorite,
    ToggleShoppingCart,
    DownloadShoppingList,
    ListIngredients,
    RetrieveIngredient,
    RegisterUser,
    ListUsers,
    RetrieveUser,
    Me,
    ManageAvatar,
    SetPassword,
    ToggleSubscription,
    ListSubscriptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Anonymous,
    Authenticated,
    /// Authenticated caller who owns the target object.
    Author,
}

impl Role {
    #[must_use]
    pub fn of(ctx: &SecurityContext, owner_id: Option<i64>) -> Self {
        match (ctx.user_id(), owner_id) {
            (None, _) => Self::Anonymous,
            (Some(uid), Some(owner)) if uid == owner => Self::Author,
            (Some(_), _) => Self::Authenticated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Anyone,
    LoggedIn,
    AuthorOnly,
}

const fn rule(action: Action) -> Rule {
    match action {
        Action::ListRecipes
        | Action::RetrieveRecipe
        | Action::GetRecipeLink
        | Action::ListIngredients
        | Action::RetrieveIngredient
        | Action::RegisterUser
        | Action::ListUsers
        | Action::RetrieveUser => Rule::Anyone,
        Action::CreateRecipe
        | Action::ToggleFavorite
        | Action::ToggleShoppingCart
        | Action::DownloadShoppingList
        | Action::Me
        | Action::ManageAvatar
        | Action::SetPassword
        | Action::ToggleSubscription
        | Action::ListSubscriptions => Rule::LoggedIn,
        Action::UpdateRecipe | Action::DeleteRecipe => Rule::AuthorOnly,
    }
}

#[must_use]
pub fn is_allowed(action: Action, role: Role) -> bool {
    match rule(action) {
        Rule::Anyone => true,
        Rule::LoggedIn => role != Role::Anonymous,
        Rule::AuthorOnly => role == Role::Author,
    }
}

/// Pre-lookup check: rejects anonymous callers for actions that need a user.
///
/// # Errors
/// [`DomainError::Unauthenticated`] when the action is closed to anonymous callers.
pub fn authenticate(ctx: &SecurityContext, action: Action) -> Result<Option<i64>, DomainError> {
    if ctx.is_anonymous() && rule(action) != Rule::Anyone {
        return Err(DomainError::Unauthenticated);
    }
    Ok(ctx.user_id())
}

/// Same as [`authenticate`] but returns the caller id for logged-in actions.
///
/// # Errors
/// [`DomainError::Unauthenticated`] for anonymous callers.
pub fn require_user(ctx: &SecurityContext, action: Action) -> Result<i64, DomainError> {
    authenticate(ctx, action)?;
    ctx.user_id().ok_or(DomainError::Unauthenticated)
}

/// Full check against the owner of a loaded object.
///
/// # Errors
/// [`DomainError::Unauthenticated`] for anonymous callers, [`DomainError::Forbidden`]
/// for authenticated callers lacking the role.
pub fn authorize(
    ctx: &SecurityContext,
    action: Action,
    owner_id: Option<i64>,
) -> Result<(), DomainError> {
    let role = Role::of(ctx, owner_id);
    if is_allowed(action, role) {
        return Ok(());
    }
    match role {
        Role::Anonymous => Err(DomainError::Unauthenticated),
        Role::Authenticated | Role::Author => Err(DomainError::Forbidden),
    }
}
