use serde::Serialize;

use crate::error::{StoreError, UserError};
use crate::store::UserStore;
use crate::types::{generate_id, User};

/// List every user in the collection
pub async fn list_users(store: &dyn UserStore) -> Result<Vec<User>, UserError> {
    store.scan_all().await.map_err(|err| match err {
        StoreError::Unmarshal(_) => UserError::Unmarshal(err),
        _ => UserError::Scan(err),
    })
}

/// Create a user from a JSON body, assigning an id when the body has none
pub async fn create_user(store: &dyn UserStore, body: &[u8]) -> Result<User, UserError> {
    let mut user = User::from_json(body)?;
    if user.id.is_empty() {
        user.id = generate_id();
    }

    store.put(&user).await.map_err(|err| match err {
        StoreError::Marshal(_) => UserError::Marshal(err),
        _ => UserError::Create(err),
    })?;

    tracing::info!("Created user {}", user.id);
    Ok(user)
}

/// Replace the user stored under `id` with the JSON body.
///
/// The id from the route always wins over one in the body.
pub async fn update_user(
    store: &dyn UserStore,
    id: Option<&str>,
    body: &[u8],
) -> Result<User, UserError> {
    let id = required_id(id)?;
    let mut user = User::from_json(body)?;
    user.id = id.to_string();

    store.put(&user).await.map_err(|err| match err {
        StoreError::Marshal(_) => UserError::Marshal(err),
        _ => UserError::Update(err),
    })?;

    tracing::info!("Updated user {}", user.id);
    Ok(user)
}

/// Delete the user stored under `id`; deleting an unknown id succeeds
pub async fn delete_user(store: &dyn UserStore, id: Option<&str>) -> Result<(), UserError> {
    let id = required_id(id)?;
    store.delete(id).await.map_err(UserError::Delete)?;

    tracing::info!("Deleted user {}", id);
    Ok(())
}

/// Serialize a response body
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, UserError> {
    serde_json::to_string(value).map_err(UserError::Encode)
}

fn required_id(id: Option<&str>) -> Result<&str, UserError> {
    match id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(UserError::MissingId),
    }
}
