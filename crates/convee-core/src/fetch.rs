//! Collection reads routed through the session guard.
//!
//! Every caller of the backend's read call goes through here, so an
//! unauthorized response always ends the session instead of leaking out as
//! an ordinary error.

use tracing::{debug, warn};

use crate::api::{Backend, QueryOptions};
use crate::auth::{SessionError, SessionStorage, SessionStore};
use crate::models::{inquiry_query, Record, INQUIRIES_COLLECTION};

/// Read records from `name` with the current session token.
///
/// A rejected token resets the session and discards the call's data.
pub async fn fetch_collection<B, S>(
    session: &mut SessionStore<B, S>,
    name: &str,
    options: &QueryOptions,
) -> Result<Vec<Record>, SessionError>
where
    B: Backend,
    S: SessionStorage,
{
    let token = session.authorized_token()?;

    match session.backend().read_items(&token, name, options).await {
        Ok(records) => {
            debug!(collection = name, count = records.len(), "Fetched collection");
            Ok(records)
        }
        Err(e) => {
            if session.guard(&e).await {
                Err(SessionError::Unauthorized)
            } else {
                warn!(collection = name, error = %e, "Failed to fetch collection");
                Err(SessionError::Remote(e))
            }
        }
    }
}

/// Newest inquiries first, at most `limit` rows.
pub async fn fetch_inquiries<B, S>(
    session: &mut SessionStore<B, S>,
    limit: u32,
) -> Result<Vec<Record>, SessionError>
where
    B: Backend,
    S: SessionStorage,
{
    fetch_collection(session, INQUIRIES_COLLECTION, &inquiry_query(limit)).await
}
