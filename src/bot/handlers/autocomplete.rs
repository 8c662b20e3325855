//! Autocomplete handlers for Discord slash command parameters.
//!
//! Friends are addressed by their unique number, so the friend handler matches the
//! user's partial input against both names and numbers and suggests numbers.

use crate::{bot::Context, core::friend, entities::friend as friend_entity};

/// Discord's cap on autocomplete suggestions
const MAX_SUGGESTIONS: usize = 25;

/// Friend numbers whose friend name or number contains `partial` (case-insensitive).
#[must_use]
pub fn matching_friend_numbers(friends: &[friend_entity::Model], partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();

    friends
        .iter()
        .filter(|f| {
            f.friend_name.to_lowercase().contains(&partial_lower)
                || f.friend_number.contains(&partial_lower)
        })
        .map(|f| f.friend_number.clone())
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Categories from the settings that start with `partial` (case-insensitive).
#[must_use]
pub fn matching_categories(categories: &[String], partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();

    categories
        .iter()
        .filter(|c| c.to_lowercase().starts_with(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

/// Provides autocomplete suggestions for friend numbers.
pub async fn autocomplete_friend(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let user_id = ctx.author().id.to_string();

    let Ok(friends) = friend::list_friends(&ctx.data().database, &user_id).await else {
        return Vec::new();
    };

    matching_friend_numbers(&friends, partial)
}

/// Provides autocomplete suggestions for expense and budget categories.
pub async fn autocomplete_category(ctx: Context<'_>, partial: &str) -> Vec<String> {
    matching_categories(&ctx.data().config.expense_categories, partial)
}
