//! Gift suggestion provider trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::suggestion::{GiftSuggestion, Language};

/// Produces gift ideas for a recipient.
///
/// Implementations may fail or return nothing; neither has any bearing on
/// event state.
#[async_trait]
pub trait GiftSuggester: Send + Sync {
    async fn suggest(
        &self,
        recipient_name: &str,
        wishlist: &[String],
        lang: Language,
    ) -> Result<Vec<GiftSuggestion>>;
}
