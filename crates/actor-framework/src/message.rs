//! # Generic Messages
//!
//! The request envelope exchanged between a `ResourceClient` and its `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants are the store operations every entity supports:
///
/// - **Create**: builds the entity from [`ActorEntity::Create`] and assigns the next id.
/// - **Get**: fetches one entity by id, `None` when absent.
/// - **List**: returns every stored entity in the store's native (ascending id) order.
/// - **Update**: applies an [`ActorEntity::Update`] to the stored entity.
/// - **Delete**: removes the entity; answers `false` when there was nothing to remove.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<bool>,
    },
}
